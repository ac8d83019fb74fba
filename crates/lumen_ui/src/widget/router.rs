//! Pointer routing over a list of sibling widgets.
//!
//! The host only reports raw pointer positions and button edges. The router
//! derives enter/leave per widget, sends presses to the topmost hit and
//! delivers the release to whichever widget received the press.

use lumen_core::{PointerEvent, PointerEventKind, WidgetId};

use super::core::WidgetHandle;

/// Hover and press tracking for one set of siblings.
#[derive(Debug, Default, Clone)]
pub struct PointerRouter {
    hovered: Option<WidgetId>,
    pressed: Option<WidgetId>,
}

impl PointerRouter {
    /// Creates a router with nothing hovered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the hovered widget.
    #[must_use]
    pub fn hovered(&self) -> Option<WidgetId> {
        self.hovered
    }

    /// Returns the widget holding the current press.
    #[must_use]
    pub fn pressed(&self) -> Option<WidgetId> {
        self.pressed
    }

    /// Routes one event. `targets` are in z-order, last on top.
    ///
    /// Returns true if any widget received a down or up.
    pub fn route(&mut self, event: &PointerEvent, targets: &[WidgetHandle]) -> bool {
        match event.kind {
            PointerEventKind::Leave => {
                self.set_hovered(None, event, targets);
                false
            }
            PointerEventKind::Enter | PointerEventKind::Move => {
                let hit = topmost(event, targets);
                self.set_hovered(hit, event, targets);
                if event.kind == PointerEventKind::Move {
                    if let Some(id) = self.pressed.or(self.hovered) {
                        deliver(id, event, targets);
                    }
                }
                false
            }
            PointerEventKind::Down => {
                let hit = topmost(event, targets);
                self.set_hovered(hit, event, targets);
                let Some(id) = hit else {
                    return false;
                };
                self.pressed = Some(id);
                deliver(id, event, targets)
            }
            PointerEventKind::Up => {
                let hit = topmost(event, targets);
                self.set_hovered(hit, event, targets);
                match self.pressed.take().or(hit) {
                    Some(id) => deliver(id, event, targets),
                    None => false,
                }
            }
        }
    }

    /// Forgets a widget that is being removed.
    pub fn forget(&mut self, id: WidgetId) {
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        if self.pressed == Some(id) {
            self.pressed = None;
        }
    }

    fn set_hovered(&mut self, hit: Option<WidgetId>, event: &PointerEvent, targets: &[WidgetHandle]) {
        if hit == self.hovered {
            return;
        }

        if let Some(old) = self.hovered {
            let leave = PointerEvent { kind: PointerEventKind::Leave, ..*event };
            deliver(old, &leave, targets);
        }
        if let Some(new) = hit {
            let enter = PointerEvent { kind: PointerEventKind::Enter, ..*event };
            deliver(new, &enter, targets);
        }
        tracing::trace!("pointer hover {:?} -> {:?}", self.hovered, hit);
        self.hovered = hit;
    }
}

fn topmost(event: &PointerEvent, targets: &[WidgetHandle]) -> Option<WidgetId> {
    targets.iter().rev().find_map(|target| {
        let widget = target.try_borrow().ok()?;
        widget.hit_test(event.position).then(|| widget.id())
    })
}

fn deliver(id: WidgetId, event: &PointerEvent, targets: &[WidgetHandle]) -> bool {
    let Some(target) = targets.iter().find(|t| t.try_borrow().is_ok_and(|w| w.id() == id)) else {
        return false;
    };
    match target.try_borrow_mut() {
        Ok(mut widget) => widget.handle_pointer(event),
        Err(_) => {
            tracing::warn!("widget {} busy, pointer event dropped", id);
            false
        }
    }
}
