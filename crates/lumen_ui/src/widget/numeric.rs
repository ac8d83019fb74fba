//! Numeric entry field.
//!
//! Same commit model as the text input: typing edits a buffer, Enter or blur
//! parses it, Escape restores the committed value. A buffer that does not
//! parse is thrown away.

use lumen_core::{
    EditState, EventKind, FocusLink, Focusable, Interaction, InteractionMachine, Key, KeyEvent,
    Level, PointerEvent, Rect, Trigger, Value, WidgetKind, NO_TAB_STOP,
};
use serde::Deserialize;

use super::core::{draw_frame, draw_text, Widget, WidgetCore, WidgetState};
use super::edit::EditBuffer;
use crate::config::InteractionSettings;
use crate::error::{UiError, UiResult};
use crate::render::RenderCommand;
use crate::style::Theme;

/// Numeric input configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NumericConfig {
    /// Initial value.
    pub value: f64,
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
    /// Up/Down increment.
    pub step: f64,
    /// Digits after the decimal point.
    pub decimals: usize,
    /// Position in Tab order.
    pub tab_stop_index: i32,
    /// Initial enabled state.
    pub enabled: bool,
}

impl Default for NumericConfig {
    fn default() -> Self {
        Self {
            value: 0.0,
            min: f64::MIN,
            max: f64::MAX,
            step: 1.0,
            decimals: 0,
            tab_stop_index: NO_TAB_STOP,
            enabled: true,
        }
    }
}

impl NumericConfig {
    /// Sets the initial value.
    #[must_use]
    pub fn value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    /// Sets the allowed range.
    #[must_use]
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Sets the Up/Down increment.
    #[must_use]
    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Sets the number of decimals.
    #[must_use]
    pub fn decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    /// Sets the tab stop.
    #[must_use]
    pub fn tab_stop(mut self, tab_stop_index: i32) -> Self {
        self.tab_stop_index = tab_stop_index;
        self
    }
}

/// Parses user text as a number.
///
/// # Errors
///
/// Returns [`UiError::InvalidNumber`] for empty, malformed or non-finite input.
pub fn parse_number(text: &str) -> UiResult<f64> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(UiError::InvalidNumber(trimmed.to_owned())),
    }
}

/// Numeric field. Emits `NumericChanged`, `NumericSubmitted` and
/// `NumericCanceled`.
#[derive(Debug)]
pub struct NumericInput {
    core: WidgetCore<EditState>,
    value: f64,
    min: f64,
    max: f64,
    step: f64,
    decimals: usize,
    buffer: EditBuffer,
}

impl NumericInput {
    /// Creates a numeric input. Swapped bounds are reordered; non-finite
    /// bounds fall back to the widest finite range.
    #[must_use]
    pub fn new(config: NumericConfig) -> Self {
        let mut core = WidgetCore::new(WidgetKind::Numeric, InteractionMachine::new());
        core.state.set_tab_stop_index(config.tab_stop_index);
        core.machine.set_enabled(config.enabled);

        let min = finite_or(config.min, f64::MIN);
        let max = finite_or(config.max, f64::MAX);
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let value = finite_or(config.value, 0.0);
        Self {
            core,
            value: value.clamp(min, max),
            min,
            max,
            step: finite_or(config.step, 1.0).abs(),
            decimals: config.decimals,
            buffer: EditBuffer::new(),
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
    pub fn current(&self) -> EditState {
        self.core.current()
    }

    /// Returns the committed value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the committed value formatted with the configured decimals.
    #[must_use]
    pub fn formatted(&self) -> String {
        self.format(self.value)
    }

    /// Returns the text being edited (the formatted value when not focused).
    #[must_use]
    pub fn edit_text(&self) -> String {
        if self.core.is_focused() {
            self.buffer.text().to_owned()
        } else {
            self.formatted()
        }
    }

    /// Sets the committed value (clamped). Emits `NumericChanged` if it moved.
    pub fn set_value(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.replace_value(value, Trigger::Programmatic);
        if self.core.is_focused() {
            self.buffer.load(&self.formatted());
        }
    }

    /// Returns true if enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.core.is_enabled()
    }

    /// Enables or disables the field. A focused field commits first.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.blur_with(Trigger::Programmatic);
        }
        self.core.set_enabled(enabled);
    }

    /// Returns true while focused.
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.core.is_focused()
    }

    /// Starts editing.
    pub fn focus(&mut self) {
        self.focus_with(Trigger::Programmatic);
    }

    /// Stops editing and commits.
    pub fn lose_focus(&mut self) {
        self.blur_with(Trigger::Programmatic);
    }

    fn format(&self, value: f64) -> String {
        format!("{:.*}", self.decimals, value)
    }

    fn focus_with(&mut self, trigger: Trigger) {
        if self.core.focus(trigger) {
            self.buffer.load(&self.formatted());
        }
    }

    fn blur_with(&mut self, trigger: Trigger) {
        if !self.core.is_focused() {
            return;
        }
        self.commit(trigger.clone());
        self.core.blur(trigger);
    }

    /// Drops the edit and blurs without committing.
    fn cancel(&mut self, trigger: Trigger) {
        self.buffer.load(&self.formatted());
        self.core.state.emit(EventKind::Canceled, trigger.clone());
        self.core.blur(trigger);
    }

    /// Parses the buffer into the committed value. Invalid text restores the
    /// previous value. An untouched buffer keeps the exact committed value,
    /// even when the display rounds it.
    fn commit(&mut self, trigger: Trigger) {
        let formatted = self.formatted();
        if self.buffer.text() == formatted {
            return;
        }
        match parse_number(self.buffer.text()) {
            Ok(parsed) => self.replace_value(parsed, trigger),
            Err(err) => tracing::debug!("numeric {} kept {}: {}", self.core.state.id(), self.value, err),
        }
        self.buffer.load(&self.formatted());
    }

    fn replace_value(&mut self, value: f64, trigger: Trigger) {
        let value = value.clamp(self.min, self.max);
        if (value - self.value).abs() < f64::EPSILON {
            return;
        }
        let previous = self.value;
        self.value = value;
        self.core.state.emit(
            EventKind::Changed {
                previous: Value::Number(previous),
                current: Value::Number(value),
            },
            trigger,
        );
    }

    fn step_by(&mut self, direction: f64, trigger: Trigger) {
        self.replace_value(self.value + self.step * direction, trigger);
        self.buffer.load(&self.formatted());
    }

    fn accepts(c: char) -> bool {
        c.is_ascii_digit() || c == '-' || c == '.'
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

impl Widget for NumericInput {
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
        NumericInput::set_enabled(self, enabled);
    }

    fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        let out = self.core.pointer(event);
        if out.contains(&Interaction::Down) {
            self.focus_with(Trigger::Pointer(*event));
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
        draw_text(theme, bounds, &self.edit_text(), theme.text_for(level), commands);
    }

    fn on_add(&mut self, settings: &InteractionSettings) {
        self.core.apply_settings(settings);
    }

    fn on_remove(&mut self) {
        self.blur_with(Trigger::Programmatic);
        self.core.detach();
    }
}

impl Focusable for NumericInput {
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
        self.focus_with(Trigger::Programmatic);
    }

    fn lose_focus(&mut self) {
        self.blur_with(Trigger::Programmatic);
    }

    fn set_focus_link(&mut self, link: Option<FocusLink>) {
        self.core.state.set_focus_link(link);
    }

    fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if !self.core.is_enabled() || !self.core.is_focused() {
            return false;
        }

        let trigger = Trigger::Key(*event);
        match event.key {
            Key::Enter => {
                self.commit(trigger.clone());
                let value = Value::Number(self.value);
                self.core.state.emit(EventKind::Submitted { value }, trigger);
                true
            }
            Key::Escape => {
                self.cancel(trigger);
                true
            }
            Key::Up => {
                self.step_by(1.0, trigger);
                true
            }
            Key::Down => {
                self.step_by(-1.0, trigger);
                true
            }
            Key::Backspace => self.buffer.delete_backward(),
            Key::Delete => self.buffer.delete_forward(),
            Key::Left => {
                self.buffer.move_left();
                true
            }
            Key::Right => {
                self.buffer.move_right();
                true
            }
            Key::Home => {
                self.buffer.move_to_start();
                true
            }
            Key::End => {
                self.buffer.move_to_end();
                true
            }
            _ => match event.character {
                Some(c) if Self::accepts(c) => self.buffer.insert(c, None),
                _ => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::UiEvent;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn record(input: &mut NumericInput) -> Rc<RefCell<Vec<UiEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        input
            .events_mut()
            .subscribe(move |event| sink.borrow_mut().push(event.clone()));
        events
    }

    fn type_text(input: &mut NumericInput, text: &str) {
        for c in text.chars() {
            input.handle_key(&KeyEvent::character(c));
        }
    }

    #[test]
    fn test_escape_restores_and_enter_commits_once() {
        let mut input = NumericInput::new(NumericConfig::default().range(0.0, 10_000.0).value(42.0));
        let events = record(&mut input);

        input.focus();
        type_text(&mut input, "99");
        assert_eq!(input.edit_text(), "4299");
        input.handle_key(&KeyEvent::new(Key::Escape));
        assert!((input.value() - 42.0).abs() < f64::EPSILON);
        assert!(!input.is_focused());
        assert!(!events
            .borrow()
            .iter()
            .any(|e| matches!(e.kind, EventKind::Changed { .. })));

        events.borrow_mut().clear();
        input.focus();
        type_text(&mut input, "99");
        input.handle_key(&KeyEvent::new(Key::Enter));
        assert!((input.value() - 4299.0).abs() < f64::EPSILON);

        let names: Vec<String> = events.borrow().iter().map(UiEvent::name).collect();
        assert_eq!(names, ["NumericFocused", "NumericChanged", "NumericSubmitted"]);
    }

    #[test]
    fn test_escape_keeps_value_finer_than_display() {
        let mut input = NumericInput::new(NumericConfig::default().value(0.125).decimals(1));
        let events = record(&mut input);

        input.focus();
        assert_eq!(input.edit_text(), "0.1");
        type_text(&mut input, "9");
        input.handle_key(&KeyEvent::new(Key::Escape));

        assert!((input.value() - 0.125).abs() < f64::EPSILON);
        let names: Vec<String> = events.borrow().iter().map(UiEvent::name).collect();
        assert_eq!(names, ["NumericFocused", "NumericCanceled", "NumericBlurred"]);
    }

    #[test]
    fn test_blur_without_edits_keeps_value() {
        let mut input = NumericInput::new(NumericConfig::default().value(0.125).decimals(1));
        let events = record(&mut input);

        input.focus();
        input.lose_focus();
        input.focus();
        input.handle_key(&KeyEvent::new(Key::Enter));

        assert!((input.value() - 0.125).abs() < f64::EPSILON);
        assert!(!events
            .borrow()
            .iter()
            .any(|e| matches!(e.kind, EventKind::Changed { .. })));
    }

    #[test]
    fn test_non_finite_bounds_fall_back() {
        let config = NumericConfig {
            min: f64::NAN,
            max: f64::INFINITY,
            step: f64::NAN,
            ..NumericConfig::default()
        }
        .value(5.0);
        let mut input = NumericInput::new(config);
        assert!((input.value() - 5.0).abs() < f64::EPSILON);

        input.focus();
        input.handle_key(&KeyEvent::new(Key::Up));
        assert!((input.value() - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_number() {
        assert!((parse_number(" 4.5 ").unwrap() - 4.5).abs() < f64::EPSILON);
        assert!(matches!(parse_number("4.5.1"), Err(UiError::InvalidNumber(_))));
        assert!(parse_number("").is_err());
        assert!(parse_number("inf").is_err());
    }

    #[test]
    fn test_invalid_text_restores_value() {
        let mut input = NumericInput::new(NumericConfig::default().value(7.0));
        let events = record(&mut input);
        input.focus();
        input.handle_key(&KeyEvent::new(Key::Backspace));
        type_text(&mut input, "--");
        input.lose_focus();

        assert!((input.value() - 7.0).abs() < f64::EPSILON);
        assert!(!events
            .borrow()
            .iter()
            .any(|e| matches!(e.kind, EventKind::Changed { .. })));
    }

    #[test]
    fn test_letters_rejected() {
        let mut input = NumericInput::new(NumericConfig::default());
        input.focus();
        assert!(!input.handle_key(&KeyEvent::character('x')));
        assert_eq!(input.edit_text(), "0");
    }

    #[test]
    fn test_commit_clamps_and_formats() {
        let mut input = NumericInput::new(NumericConfig::default().range(0.0, 10.0).decimals(2));
        assert_eq!(input.formatted(), "0.00");

        input.focus();
        input.handle_key(&KeyEvent::new(Key::Home));
        type_text(&mut input, "25");
        input.handle_key(&KeyEvent::new(Key::Enter));

        assert!((input.value() - 10.0).abs() < f64::EPSILON);
        assert_eq!(input.edit_text(), "10.00");
    }

    #[test]
    fn test_arrow_keys_step() {
        let mut input = NumericInput::new(NumericConfig::default().range(0.0, 3.0).value(2.0));
        input.focus();
        input.handle_key(&KeyEvent::new(Key::Up));
        input.handle_key(&KeyEvent::new(Key::Up));
        assert!((input.value() - 3.0).abs() < f64::EPSILON);
        input.handle_key(&KeyEvent::new(Key::Down));
        assert!((input.value() - 2.0).abs() < f64::EPSILON);
        assert_eq!(input.edit_text(), "2");
    }
}
