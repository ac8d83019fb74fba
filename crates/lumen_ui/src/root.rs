//! # UI Root
//!
//! One root per screen or window. The host engine feeds it raw pointer
//! positions, key events and the frame delta; the root turns them into
//! per-widget enter/leave/down/up calls, routes keys through its
//! [`FocusManager`] and collects render commands.
//!
//! ```text
//! host input ──> UiRoot ──> PointerRouter ──> widget.handle_pointer
//!                   │
//!                   └─────> FocusManager ───> focused.handle_key
//!
//! widget events ──> EventBus ──> drain_events() in the game loop
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use lumen_core::{
    EventBus, EventSender, FocusDiagnostic, FocusHandle, FocusManager, Focusable, KeyEvent,
    MouseButton, PointerEvent, PointerEventKind, SubscriptionId, UiEvent, Vec2, WidgetId,
};

use crate::config::{InteractionSettings, UiConfig};
use crate::render::{RenderCommand, UIRenderer};
use crate::style::Theme;
use crate::widget::{PointerRouter, Widget, WidgetHandle};

struct Entry {
    widget: WidgetHandle,
    forward: SubscriptionId,
}

/// Input router and frame driver for one set of top-level widgets.
pub struct UiRoot {
    /// Top-level widgets in z-order, last on top.
    entries: Vec<Entry>,
    focus: FocusManager,
    router: PointerRouter,
    bus: EventBus,
    theme: Theme,
    settings: InteractionSettings,
    /// Last reported pointer position; `None` while outside the root.
    pointer: Option<Vec2>,
}

impl UiRoot {
    /// Creates a root from a configuration.
    #[must_use]
    pub fn new(config: &UiConfig) -> Self {
        Self {
            entries: Vec::new(),
            focus: FocusManager::new(),
            router: PointerRouter::new(),
            bus: EventBus::default(),
            theme: config.theme(),
            settings: config.interaction,
            pointer: None,
        }
    }

    /// Returns the active theme.
    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Replaces the theme.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Returns the interaction settings applied to added widgets.
    #[must_use]
    pub fn settings(&self) -> InteractionSettings {
        self.settings
    }

    /// Returns the focus manager.
    #[must_use]
    pub fn focus_manager(&self) -> &FocusManager {
        &self.focus
    }

    /// Returns the focus manager for direct registration or focus moves.
    pub fn focus_manager_mut(&mut self) -> &mut FocusManager {
        &mut self.focus
    }

    /// Returns the top-level widgets in z-order.
    #[must_use]
    pub fn widgets(&self) -> Vec<WidgetHandle> {
        self.entries.iter().map(|e| Rc::clone(&e.widget)).collect()
    }

    /// Returns the number of top-level widgets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the root has no widgets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds a widget on top and forwards its events into the root's bus.
    /// Adding the same handle twice is a no-op.
    pub fn add(&mut self, widget: WidgetHandle) -> WidgetId {
        if let Some(entry) = self.entries.iter().find(|e| Rc::ptr_eq(&e.widget, &widget)) {
            return entry.widget.borrow().id();
        }

        let (id, forward) = {
            let mut w = widget.borrow_mut();
            w.on_add(&self.settings);
            (w.id(), w.events_mut().forward_to(self.bus.sender()))
        };
        self.entries.push(Entry { widget, forward });
        id
    }

    /// Adds a widget and registers it for Tab navigation.
    ///
    /// Returns the registration diagnostic, if any.
    pub fn add_focusable<T>(&mut self, widget: &Rc<RefCell<T>>) -> Option<FocusDiagnostic>
    where
        T: Widget + Focusable + 'static,
    {
        let handle: WidgetHandle = Rc::<RefCell<T>>::clone(widget);
        self.add(handle);
        self.register_focus(widget)
    }

    /// Registers a widget owned elsewhere (a panel child, a tab header) for
    /// Tab navigation without adding it as a top-level widget.
    pub fn register_focus<T>(&mut self, widget: &Rc<RefCell<T>>) -> Option<FocusDiagnostic>
    where
        T: Focusable + 'static,
    {
        let handle: FocusHandle = Rc::<RefCell<T>>::clone(widget);
        self.focus.register(handle)
    }

    /// Removes a top-level widget. It is blurred and leaves the focus
    /// manager.
    pub fn remove(&mut self, id: WidgetId) -> bool {
        let Some(index) = self
            .entries
            .iter()
            .position(|e| e.widget.try_borrow().is_ok_and(|w| w.id() == id))
        else {
            return false;
        };

        let entry = self.entries.remove(index);
        self.router.forget(id);
        let mut widget = entry.widget.borrow_mut();
        widget.events_mut().unsubscribe(entry.forward);
        widget.on_remove();
        true
    }

    /// Sender for forwarding events of nested widgets into this root's bus.
    #[must_use]
    pub fn event_sender(&self) -> EventSender {
        self.bus.sender()
    }

    /// Takes every event emitted since the last drain, in order.
    pub fn drain_events(&self) -> Vec<UiEvent> {
        self.bus.receiver().drain()
    }

    /// Returns how many events were dropped because the bus was full.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.bus.dropped_count()
    }

    /// The pointer moved to `position`.
    pub fn pointer_moved(&mut self, position: impl Into<Vec2>) {
        let position = position.into();
        let kind = if self.pointer.is_some() {
            PointerEventKind::Move
        } else {
            PointerEventKind::Enter
        };
        self.pointer = Some(position);
        self.route(PointerEvent::new(kind, position));
    }

    /// The pointer left the root's surface.
    pub fn pointer_left(&mut self) {
        let position = self.pointer.take().unwrap_or_default();
        self.route(PointerEvent::new(PointerEventKind::Leave, position));
    }

    /// The primary button went down at `position`.
    ///
    /// Pressing where no widget is clears keyboard focus.
    pub fn pointer_down(&mut self, position: impl Into<Vec2>) {
        self.pointer_down_with(position, MouseButton::Left);
    }

    /// A button went down at `position`.
    pub fn pointer_down_with(&mut self, position: impl Into<Vec2>, button: MouseButton) {
        let position = position.into();
        self.pointer = Some(position);
        self.route(PointerEvent::new(PointerEventKind::Down, position).with_button(button));
        if self.router.pressed().is_none() {
            tracing::debug!("press on empty space at {:?}, clearing focus", position);
            self.focus.clear_focus();
        }
    }

    /// The primary button went up at `position`.
    pub fn pointer_up(&mut self, position: impl Into<Vec2>) {
        self.pointer_up_with(position, MouseButton::Left);
    }

    /// A button went up at `position`.
    pub fn pointer_up_with(&mut self, position: impl Into<Vec2>, button: MouseButton) {
        let position = position.into();
        self.pointer = Some(position);
        self.route(PointerEvent::new(PointerEventKind::Up, position).with_button(button));
    }

    /// Routes a key press. Tab and Shift+Tab move focus; other keys go to the
    /// focused widget. Returns true if consumed.
    pub fn key_down(&mut self, event: &KeyEvent) -> bool {
        self.focus.handle_key(event)
    }

    /// Routes a key release to the focused widget.
    pub fn key_up(&mut self, event: &KeyEvent) -> bool {
        self.focus.handle_key_up(event)
    }

    /// Advances every widget by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        for entry in &self.entries {
            match entry.widget.try_borrow_mut() {
                Ok(mut widget) => widget.update(dt),
                Err(_) => tracing::warn!("widget busy during update, skipped"),
            }
        }
    }

    /// Collects render commands of every visible widget, bottom to top.
    pub fn render(&self, renderer: &mut UIRenderer) {
        let mut commands = Vec::new();
        for entry in &self.entries {
            let Ok(widget) = entry.widget.try_borrow() else {
                continue;
            };
            if widget.is_visible() {
                widget.render(&self.theme, &mut commands);
            }
        }

        for command in commands {
            match command {
                RenderCommand::PushClip { bounds } => renderer.push_clip(bounds),
                RenderCommand::PopClip => renderer.pop_clip(),
                other => renderer.push(other),
            }
        }
    }

    fn route(&mut self, event: PointerEvent) {
        let targets: Vec<WidgetHandle> = self.widgets();
        self.router.route(&event, &targets);
    }
}

impl Default for UiRoot {
    fn default() -> Self {
        Self::new(&UiConfig::default())
    }
}

impl std::fmt::Debug for UiRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiRoot")
            .field("widgets", &self.entries.len())
            .field("focus", &self.focus)
            .field("pointer", &self.pointer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{Button, ButtonConfig, Label, LabelConfig, Panel, PanelConfig};
    use lumen_core::{Key, Rect};

    fn button(tab: i32, x: f32) -> Rc<RefCell<Button>> {
        Rc::new(RefCell::new(
            Button::new(ButtonConfig::new("b").tab_stop(tab)).with_bounds(Rect::new(x, 0.0, 50.0, 20.0)),
        ))
    }

    #[test]
    fn test_click_reaches_bus() {
        let mut root = UiRoot::default();
        let play = button(0, 0.0);
        root.add_focusable(&play);

        root.pointer_moved((10.0, 10.0));
        root.pointer_down((10.0, 10.0));
        root.pointer_up((10.0, 10.0));

        let names: Vec<String> = root.drain_events().iter().map(UiEvent::name).collect();
        assert_eq!(
            names,
            ["ButtonHovered", "ButtonDown", "ButtonFocused", "ButtonUp", "ButtonClicked"]
        );
        assert!(root.drain_events().is_empty());
    }

    #[test]
    fn test_empty_press_clears_focus() {
        let mut root = UiRoot::default();
        let play = button(0, 0.0);
        root.add_focusable(&play);

        root.pointer_down((10.0, 10.0));
        assert!(play.borrow().is_focused());

        root.pointer_up((10.0, 10.0));
        root.pointer_down((500.0, 500.0));
        assert!(!play.borrow().is_focused());
        assert!(root.focus_manager().focused().is_none());
    }

    #[test]
    fn test_tab_moves_between_widgets() {
        let mut root = UiRoot::default();
        let a = button(0, 0.0);
        let b = button(1, 60.0);
        root.add_focusable(&a);
        root.add_focusable(&b);

        assert!(root.key_down(&KeyEvent::new(Key::Tab)));
        assert!(a.borrow().is_focused());
        root.key_down(&KeyEvent::new(Key::Tab));
        assert!(b.borrow().is_focused());
        assert!(!a.borrow().is_focused());
    }

    #[test]
    fn test_remove_unregisters() {
        let mut root = UiRoot::default();
        let play = button(3, 0.0);
        root.add_focusable(&play);
        play.borrow_mut().focus();

        let id = play.borrow().id();
        assert!(root.remove(id));
        assert!(!play.borrow().is_focused());
        assert!(root.focus_manager().is_empty());
        assert!(!root.remove(id));
    }

    #[test]
    fn test_render_skips_hidden_and_balances_clips() {
        let mut root = UiRoot::default();
        let label = Rc::new(RefCell::new(Label::new(LabelConfig::new("hidden"))));
        label.borrow_mut().set_visible(false);
        root.add(label);

        let panel = Rc::new(RefCell::new(
            Panel::new(PanelConfig::default().clip(true)).with_bounds(Rect::new(0.0, 0.0, 10.0, 10.0)),
        ));
        root.add(panel);

        let mut renderer = UIRenderer::new();
        renderer.begin_frame();
        root.render(&mut renderer);
        assert_eq!(renderer.command_count(), 3);
        assert_eq!(renderer.current_clip(), None);
    }
}
