//! Checkbox.

use lumen_core::{
    ButtonState, EventKind, FocusLink, Focusable, Interaction, InteractionMachine, KeyEvent,
    Level, PointerEvent, Rect, Trigger, Value, WidgetKind, NO_TAB_STOP,
};
use serde::Deserialize;

use super::core::{draw_frame, draw_text, Widget, WidgetCore, WidgetState};
use super::toggle::{ChangeGuard, Toggle, ToggleValue};
use crate::config::InteractionSettings;
use crate::render::RenderCommand;
use crate::style::Theme;

/// Checkbox configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CheckboxConfig {
    /// Text shown next to the box.
    pub label: String,
    /// Initial value.
    pub checked: bool,
    /// Position in Tab order.
    pub tab_stop_index: i32,
    /// Initial enabled state.
    pub enabled: bool,
}

impl Default for CheckboxConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            checked: false,
            tab_stop_index: NO_TAB_STOP,
            enabled: true,
        }
    }
}

impl CheckboxConfig {
    /// Creates a config with a label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Sets the initial value.
    #[must_use]
    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
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

/// Checkbox. Each activation flips the value and emits `CheckboxChanged`.
#[derive(Debug)]
pub struct Checkbox {
    core: WidgetCore<ButtonState>,
    label: String,
    value: ToggleValue,
}

impl Checkbox {
    /// Creates a checkbox.
    #[must_use]
    pub fn new(config: CheckboxConfig) -> Self {
        let mut core = WidgetCore::new(WidgetKind::Checkbox, InteractionMachine::new());
        core.state.set_tab_stop_index(config.tab_stop_index);
        core.machine.set_enabled(config.enabled);
        Self {
            core,
            label: config.label,
            value: ToggleValue::new(config.checked),
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

    /// Returns the label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns true if enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.core.is_enabled()
    }

    /// Enables or disables the checkbox.
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

    fn toggle(&mut self, trigger: Trigger) {
        let previous = self.value.get();
        if self.value.request(!previous) {
            self.emit_changed(previous, trigger);
        }
    }

    fn emit_changed(&mut self, previous: bool, trigger: Trigger) {
        self.core.state.emit(
            EventKind::Changed {
                previous: Value::Bool(previous),
                current: Value::Bool(self.value.get()),
            },
            trigger,
        );
    }
}

impl Toggle for Checkbox {
    fn is_checked(&self) -> bool {
        self.value.get()
    }

    fn set_checked(&mut self, checked: bool) -> bool {
        let previous = self.value.get();
        let changed = self.value.request(checked);
        if changed {
            self.emit_changed(previous, Trigger::Programmatic);
        }
        changed
    }

    fn force_checked(&mut self, checked: bool) {
        let previous = self.value.get();
        if self.value.force(checked) {
            self.emit_changed(previous, Trigger::Programmatic);
        }
    }

    fn set_change_guard(&mut self, guard: Option<ChangeGuard>) {
        self.value.set_guard(guard);
    }
}

impl Widget for Checkbox {
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
        if out.contains(&Interaction::Clicked) {
            self.toggle(Trigger::Pointer(*event));
        }
        !out.is_empty()
    }

    fn update(&mut self, dt: f32) {
        self.core.tick(dt);
    }

    fn render(&self, theme: &Theme, commands: &mut Vec<RenderCommand>) {
        let bounds = self.core.state.bounds();
        let level = self.core.level();
        let side = bounds.height;
        let check_box = Rect::new(bounds.x, bounds.y, side, side);

        draw_frame(theme, check_box, level, self.core.is_focused(), commands);
        if self.value.get() {
            commands.push(RenderCommand::Rect {
                bounds: check_box.shrink(side * 0.25),
                color: theme.accent_for(level),
                corner_radius: theme.style.corner_radius * 0.5,
            });
        }

        let text_area = Rect::new(bounds.x + side, bounds.y, (bounds.width - side).max(0.0), side);
        draw_text(theme, text_area, &self.label, theme.text_for(level), commands);
    }

    fn on_add(&mut self, settings: &InteractionSettings) {
        self.core.apply_settings(settings);
    }

    fn on_remove(&mut self) {
        self.core.detach();
    }
}

impl Focusable for Checkbox {
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
        let out = self.core.key_up(event);
        if out.contains(&Interaction::Clicked) {
            self.toggle(Trigger::Key(*event));
        }
        !out.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{Key, PointerEventKind, UiEvent};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn changes(checkbox: &mut Checkbox) -> Rc<RefCell<Vec<UiEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        checkbox.events_mut().subscribe(move |event| {
            if matches!(event.kind, EventKind::Changed { .. }) {
                sink.borrow_mut().push(event.clone());
            }
        });
        events
    }

    fn click(checkbox: &mut Checkbox) {
        for kind in [PointerEventKind::Enter, PointerEventKind::Down, PointerEventKind::Up] {
            checkbox.handle_pointer(&PointerEvent::new(kind, (1.0, 1.0)));
        }
    }

    #[test]
    fn test_click_toggles() {
        let mut checkbox = Checkbox::new(CheckboxConfig::new("Music"));
        let events = changes(&mut checkbox);

        click(&mut checkbox);
        assert!(checkbox.is_checked());
        click(&mut checkbox);
        assert!(!checkbox.is_checked());

        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name(), "CheckboxChanged");
        assert_eq!(
            events[0].kind,
            EventKind::Changed {
                previous: Value::Bool(false),
                current: Value::Bool(true),
            }
        );
    }

    #[test]
    fn test_space_toggles_when_focused() {
        let mut checkbox = Checkbox::new(CheckboxConfig::new("Music").checked(true));
        checkbox.focus();

        let space = KeyEvent::new(Key::Space);
        checkbox.handle_key(&space);
        checkbox.handle_key_up(&space);
        assert!(!checkbox.is_checked());
    }

    #[test]
    fn test_guard_refuses_change() {
        let mut checkbox = Checkbox::new(CheckboxConfig::new("Locked").checked(true));
        let events = changes(&mut checkbox);
        checkbox.set_change_guard(Some(Box::new(|checked| checked)));

        click(&mut checkbox);
        assert!(checkbox.is_checked());
        assert!(!checkbox.set_checked(false));
        assert!(events.borrow().is_empty());

        checkbox.force_checked(false);
        assert!(!checkbox.is_checked());
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_disabled_click_does_not_toggle() {
        let mut checkbox = Checkbox::new(CheckboxConfig::new("Music").enabled(false));
        click(&mut checkbox);
        assert!(!checkbox.is_checked());
    }
}
