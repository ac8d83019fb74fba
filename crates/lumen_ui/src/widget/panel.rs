//! Background container.
//!
//! A panel owns child widget handles in z-order (last on top), routes pointer
//! input to them and draws them after its background. Hidden children are
//! neither drawn nor hit. Children keep absolute bounds; moving the panel
//! does not move them, [`Panel::arrange_children`] does.

use std::rc::Rc;

use lumen_core::{
    DisplayState, InteractionMachine, Level, PointerEvent, PointerEventKind, Rect, WidgetId,
    WidgetKind,
};
use serde::Deserialize;

use super::core::{Widget, WidgetCore, WidgetHandle, WidgetState};
use super::router::PointerRouter;
use crate::config::InteractionSettings;
use crate::layout::Layout;
use crate::render::RenderCommand;
use crate::style::{Color, Theme};

/// Panel configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Fill color; the theme surface color when absent.
    pub background: Option<Color>,
    /// Clip children to the panel bounds.
    pub clip: bool,
    /// Whether hovering changes the look.
    pub hover_visual: bool,
}

impl PanelConfig {
    /// Overrides the fill color.
    #[must_use]
    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Clips children to the panel bounds.
    #[must_use]
    pub fn clip(mut self, clip: bool) -> Self {
        self.clip = clip;
        self
    }
}

/// Container of child widgets.
pub struct Panel {
    core: WidgetCore<DisplayState>,
    background: Option<Color>,
    clip: bool,
    children: Vec<WidgetHandle>,
    router: PointerRouter,
    settings: InteractionSettings,
}

impl Panel {
    /// Creates an empty panel.
    #[must_use]
    pub fn new(config: PanelConfig) -> Self {
        let machine = InteractionMachine::new()
            .with_focusable(false)
            .with_hover_visual(config.hover_visual);
        Self {
            core: WidgetCore::new(WidgetKind::Panel, machine),
            background: config.background,
            clip: config.clip,
            children: Vec::new(),
            router: PointerRouter::new(),
            settings: InteractionSettings::default(),
        }
    }

    /// Sets the bounds.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.core.state.set_bounds(bounds);
        self
    }

    /// Returns the current interaction state.
    #[must_use]
    pub fn current(&self) -> DisplayState {
        self.core.current()
    }

    /// Returns the children in z-order.
    #[must_use]
    pub fn children(&self) -> &[WidgetHandle] {
        &self.children
    }

    /// Returns the number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true if the panel has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Adds a child on top. Adding the same handle twice is a no-op.
    pub fn add_child(&mut self, child: WidgetHandle) -> bool {
        if self.children.iter().any(|c| Rc::ptr_eq(c, &child)) {
            return false;
        }
        child.borrow_mut().on_add(&self.settings);
        self.children.push(child);
        true
    }

    /// Removes a child by id and returns it.
    pub fn remove_child(&mut self, id: WidgetId) -> Option<WidgetHandle> {
        let index = self
            .children
            .iter()
            .position(|c| c.try_borrow().is_ok_and(|c| c.id() == id))?;
        let child = self.children.remove(index);
        self.router.forget(id);
        child.borrow_mut().on_remove();
        Some(child)
    }

    /// Positions the visible children with a layout inside the panel bounds,
    /// keeping each child's current size.
    pub fn arrange_children(&mut self, layout: &Layout) {
        let visible: Vec<&WidgetHandle> =
            self.children.iter().filter(|c| c.borrow().is_visible()).collect();
        let sizes: Vec<(f32, f32)> = visible
            .iter()
            .map(|c| {
                let bounds = c.borrow().bounds();
                (bounds.width, bounds.height)
            })
            .collect();

        let rects = layout.arrange(self.core.state.bounds(), &sizes);
        for (child, rect) in visible.into_iter().zip(rects) {
            child.borrow_mut().set_bounds(rect);
        }
    }
}

impl std::fmt::Debug for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Panel")
            .field("id", &self.core.state.id())
            .field("bounds", &self.core.state.bounds())
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}

impl Widget for Panel {
    fn state(&self) -> &WidgetState {
        &self.core.state
    }

    fn state_mut(&mut self) -> &mut WidgetState {
        &mut self.core.state
    }

    fn level(&self) -> Level {
        self.core.level()
    }

    fn is_enabled(&self) -> bool {
        self.core.is_enabled()
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.core.set_enabled(enabled);
    }

    fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        let hovered = self.core.hover(event);
        if !self.core.is_enabled() {
            return hovered;
        }
        let routed = match event.kind {
            // The panel's own enter doubles as a move for the children.
            PointerEventKind::Enter => {
                let moved = PointerEvent { kind: PointerEventKind::Move, ..*event };
                self.router.route(&moved, &self.children)
            }
            _ => self.router.route(event, &self.children),
        };
        hovered || routed
    }

    fn update(&mut self, dt: f32) {
        self.core.tick(dt);
        for child in &self.children {
            if let Ok(mut child) = child.try_borrow_mut() {
                child.update(dt);
            }
        }
    }

    fn render(&self, theme: &Theme, commands: &mut Vec<RenderCommand>) {
        let bounds = self.core.state.bounds();
        let color = match self.core.level() {
            Level::Disabled => theme.surface_disabled,
            Level::Hovered => theme.surface_hover,
            _ => self.background.unwrap_or(theme.surface),
        };
        commands.push(RenderCommand::Rect {
            bounds,
            color,
            corner_radius: theme.style.corner_radius,
        });

        if self.clip {
            commands.push(RenderCommand::PushClip { bounds });
        }
        for child in &self.children {
            let Ok(child) = child.try_borrow() else {
                continue;
            };
            if child.is_visible() {
                child.render(theme, commands);
            }
        }
        if self.clip {
            commands.push(RenderCommand::PopClip);
        }
    }

    fn on_add(&mut self, settings: &InteractionSettings) {
        self.settings = *settings;
        self.core.apply_settings(settings);
        for child in &self.children {
            child.borrow_mut().on_add(settings);
        }
    }

    fn on_remove(&mut self) {
        for child in &self.children {
            child.borrow_mut().on_remove();
        }
        self.router = PointerRouter::new();
        self.core.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{Button, ButtonConfig, Label, LabelConfig};
    use std::cell::RefCell;

    fn panel_with_button() -> (Panel, Rc<RefCell<Button>>) {
        let mut panel = Panel::new(PanelConfig::default()).with_bounds(Rect::new(0.0, 0.0, 200.0, 100.0));
        let button = Rc::new(RefCell::new(
            Button::new(ButtonConfig::new("Play")).with_bounds(Rect::new(10.0, 10.0, 80.0, 30.0)),
        ));
        panel.add_child(button.clone());
        (panel, button)
    }

    #[test]
    fn test_routes_click_to_child() {
        let (mut panel, button) = panel_with_button();
        let clicks = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&clicks);
        button.borrow_mut().events_mut().subscribe(move |event| {
            if event.name() == "ButtonClicked" {
                *sink.borrow_mut() += 1;
            }
        });

        for kind in [PointerEventKind::Enter, PointerEventKind::Down, PointerEventKind::Up] {
            panel.handle_pointer(&PointerEvent::new(kind, (20.0, 20.0)));
        }
        assert_eq!(*clicks.borrow(), 1);
    }

    #[test]
    fn test_hidden_child_not_hit_or_drawn() {
        let (mut panel, button) = panel_with_button();
        button.borrow_mut().set_visible(false);

        panel.handle_pointer(&PointerEvent::new(PointerEventKind::Enter, (20.0, 20.0)));
        assert!(!button.borrow().is_focused());
        assert_eq!(panel.router.hovered(), None);

        let mut commands = Vec::new();
        panel.render(&Theme::DUSK, &mut commands);
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn test_remove_child() {
        let (mut panel, button) = panel_with_button();
        let id = button.borrow().id();
        assert!(panel.remove_child(id).is_some());
        assert!(panel.is_empty());
        assert!(panel.remove_child(id).is_none());
    }

    #[test]
    fn test_duplicate_child_ignored() {
        let (mut panel, button) = panel_with_button();
        assert!(!panel.add_child(button));
        assert_eq!(panel.len(), 1);
    }

    #[test]
    fn test_arrange_children_vertically() {
        let mut panel = Panel::new(PanelConfig::default()).with_bounds(Rect::new(0.0, 0.0, 100.0, 100.0));
        for text in ["a", "b"] {
            let label = Label::new(LabelConfig::new(text)).with_bounds(Rect::new(0.0, 0.0, 50.0, 20.0));
            panel.add_child(Rc::new(RefCell::new(label)));
        }

        panel.arrange_children(&Layout::vertical().with_gap(5.0));
        let second = panel.children()[1].borrow().bounds();
        assert_eq!(second, Rect::new(0.0, 25.0, 50.0, 20.0));
    }

    #[test]
    fn test_clip_wraps_children() {
        let mut panel = Panel::new(PanelConfig::default().clip(true));
        panel.add_child(Rc::new(RefCell::new(Label::new(LabelConfig::new("x")))));
        let mut commands = Vec::new();
        panel.render(&Theme::DUSK, &mut commands);
        assert!(matches!(commands[1], RenderCommand::PushClip { .. }));
        assert_eq!(commands.last(), Some(&RenderCommand::PopClip));
    }
}
