//! Push button.

use lumen_core::{
    ButtonState, FocusLink, Focusable, Interaction, InteractionMachine, KeyEvent, Level,
    PointerEvent, Rect, Trigger, WidgetKind, NO_TAB_STOP,
};
use serde::Deserialize;

use super::core::{draw_frame, draw_text, Widget, WidgetCore, WidgetState};
use crate::config::InteractionSettings;
use crate::render::RenderCommand;
use crate::style::Theme;

/// Button configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ButtonConfig {
    /// Caption.
    pub label: String,
    /// Position in Tab order.
    pub tab_stop_index: i32,
    /// Initial enabled state.
    pub enabled: bool,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            tab_stop_index: NO_TAB_STOP,
            enabled: true,
        }
    }
}

impl ButtonConfig {
    /// Creates a config with a caption.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Sets the tab stop.
    #[must_use]
    pub fn tab_stop(mut self, tab_stop_index: i32) -> Self {
        self.tab_stop_index = tab_stop_index;
        self
    }

    /// Sets the initial enabled state.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Push button. Emits `ButtonClicked` on pointer or keyboard activation.
#[derive(Debug)]
pub struct Button {
    core: WidgetCore<ButtonState>,
    label: String,
    /// Persistent highlight, used by tab headers.
    selected: bool,
}

impl Button {
    /// Creates a button.
    #[must_use]
    pub fn new(config: ButtonConfig) -> Self {
        let mut core = WidgetCore::new(WidgetKind::Button, InteractionMachine::new());
        core.state.set_tab_stop_index(config.tab_stop_index);
        core.machine.set_enabled(config.enabled);
        Self {
            core,
            label: config.label,
            selected: false,
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
    pub fn current(&self) -> ButtonState {
        self.core.current()
    }

    /// Returns the caption.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replaces the caption.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Returns the persistent highlight.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Sets the persistent highlight.
    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Returns true if enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.core.is_enabled()
    }

    /// Enables or disables the button.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.core.set_enabled(enabled);
    }

    /// Returns true while focused.
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.core.is_focused()
    }

    /// Takes keyboard focus.
    pub fn focus(&mut self) {
        self.core.focus(Trigger::Programmatic);
    }

    /// Gives up keyboard focus.
    pub fn lose_focus(&mut self) {
        self.core.blur(Trigger::Programmatic);
    }
}

impl Widget for Button {
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
        let out = self.core.pointer(event);
        if out.contains(&Interaction::Down) {
            self.core.focus(Trigger::Pointer(*event));
        }
        !out.is_empty()
    }

    fn update(&mut self, dt: f32) {
        self.core.tick(dt);
    }

    fn render(&self, theme: &Theme, commands: &mut Vec<RenderCommand>) {
        let bounds = self.core.state.bounds();
        let level = self.core.level();
        draw_frame(theme, bounds, level, self.core.is_focused(), commands);

        if self.selected {
            let bar = theme.style.focus_ring_width;
            commands.push(RenderCommand::Rect {
                bounds: Rect::new(bounds.x, bounds.bottom() - bar, bounds.width, bar),
                color: theme.accent_for(level),
                corner_radius: 0.0,
            });
        }

        draw_text(theme, bounds, &self.label, theme.text_for(level), commands);
    }

    fn on_add(&mut self, settings: &InteractionSettings) {
        self.core.apply_settings(settings);
    }

    fn on_remove(&mut self) {
        self.core.detach();
    }
}

impl Focusable for Button {
    fn tab_stop_index(&self) -> i32 {
        self.core.state.tab_stop_index()
    }

    fn is_focused(&self) -> bool {
        self.core.is_focused()
    }

    fn is_enabled(&self) -> bool {
        self.core.is_enabled()
    }

    fn focus(&mut self) {
        self.core.focus(Trigger::Programmatic);
    }

    fn lose_focus(&mut self) {
        self.core.blur(Trigger::Programmatic);
    }

    fn set_focus_link(&mut self, link: Option<FocusLink>) {
        self.core.state.set_focus_link(link);
    }

    fn handle_key(&mut self, event: &KeyEvent) -> bool {
        !self.core.key_down(event).is_empty()
    }

    fn handle_key_up(&mut self, event: &KeyEvent) -> bool {
        !self.core.key_up(event).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{EventKind, Key, PointerEventKind};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn pointer(kind: PointerEventKind) -> PointerEvent {
        PointerEvent::new(kind, (5.0, 5.0))
    }

    fn clicks(button: &mut Button) -> Rc<RefCell<usize>> {
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        button.events_mut().subscribe(move |event| {
            if event.kind == EventKind::Clicked {
                *sink.borrow_mut() += 1;
            }
        });
        count
    }

    #[test]
    fn test_click_requires_hover_at_release() {
        let mut button = Button::new(ButtonConfig::new("OK"));
        let count = clicks(&mut button);

        button.handle_pointer(&pointer(PointerEventKind::Enter));
        button.handle_pointer(&pointer(PointerEventKind::Down));
        button.handle_pointer(&pointer(PointerEventKind::Leave));
        button.handle_pointer(&pointer(PointerEventKind::Up));
        assert_eq!(*count.borrow(), 0);
        // Still focused from the press.
        assert_eq!(button.current(), ButtonState::Hovered);

        button.handle_pointer(&pointer(PointerEventKind::Enter));
        button.handle_pointer(&pointer(PointerEventKind::Down));
        button.handle_pointer(&pointer(PointerEventKind::Up));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_disabled_ignores_pointer() {
        let mut button = Button::new(ButtonConfig::new("OK").enabled(false));
        let count = clicks(&mut button);

        assert!(!button.handle_pointer(&pointer(PointerEventKind::Enter)));
        assert!(!button.handle_pointer(&pointer(PointerEventKind::Down)));
        assert_eq!(button.current(), ButtonState::Disabled);
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_pointer_down_focuses() {
        let mut button = Button::new(ButtonConfig::new("OK").tab_stop(0));
        button.handle_pointer(&pointer(PointerEventKind::Enter));
        button.handle_pointer(&pointer(PointerEventKind::Down));
        assert!(button.is_focused());
        assert_eq!(button.current(), ButtonState::Pressed);
    }

    #[test]
    fn test_keyboard_click_when_focused() {
        let mut button = Button::new(ButtonConfig::new("OK"));
        let count = clicks(&mut button);

        assert!(!button.handle_key(&KeyEvent::new(Key::Space)));

        button.focus();
        assert!(button.handle_key(&KeyEvent::new(Key::Enter)));
        assert_eq!(button.current(), ButtonState::Pressed);
        assert!(button.handle_key_up(&KeyEvent::new(Key::Enter)));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_render_includes_focus_ring_and_label() {
        let mut button = Button::new(ButtonConfig::new("OK")).with_bounds(Rect::new(0.0, 0.0, 80.0, 24.0));
        let mut commands = Vec::new();
        button.render(&Theme::DUSK, &mut commands);
        assert_eq!(commands.len(), 3);

        button.focus();
        commands.clear();
        button.render(&Theme::DUSK, &mut commands);
        assert_eq!(commands.len(), 4);
        assert!(matches!(&commands[3], RenderCommand::Text { text, .. } if text == "OK"));
    }
}
