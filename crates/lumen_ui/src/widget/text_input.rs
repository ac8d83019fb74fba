//! Single-line text field.
//!
//! Keystrokes edit a private buffer. The committed text only changes on
//! Enter or when focus leaves; Escape throws the edit away.

use lumen_core::{
    EditState, EventKind, FocusLink, Focusable, Interaction, InteractionMachine, Key, KeyEvent,
    Level, PointerEvent, Rect, Trigger, Value, WidgetKind, NO_TAB_STOP,
};
use serde::Deserialize;

use super::core::{draw_frame, draw_text, Widget, WidgetCore, WidgetState};
use super::edit::EditBuffer;
use crate::config::InteractionSettings;
use crate::render::RenderCommand;
use crate::style::Theme;

/// Cursor blink half-period in seconds.
pub const CURSOR_BLINK_SECS: f32 = 0.53;

/// Character drawn instead of each password character.
const MASK_CHAR: char = '•';

/// Text input configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TextInputConfig {
    /// Initial committed text.
    pub text: String,
    /// Hint shown while empty.
    pub placeholder: String,
    /// Maximum length in characters.
    pub max_length: Option<usize>,
    /// Mask the displayed text.
    pub password: bool,
    /// Position in Tab order.
    pub tab_stop_index: i32,
    /// Initial enabled state.
    pub enabled: bool,
}

impl Default for TextInputConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            placeholder: String::new(),
            max_length: None,
            password: false,
            tab_stop_index: NO_TAB_STOP,
            enabled: true,
        }
    }
}

impl TextInputConfig {
    /// Sets the initial text.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Sets the placeholder.
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Limits the length in characters.
    #[must_use]
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Masks the displayed text.
    #[must_use]
    pub fn password(mut self) -> Self {
        self.password = true;
        self
    }

    /// Sets the tab stop.
    #[must_use]
    pub fn tab_stop(mut self, tab_stop_index: i32) -> Self {
        self.tab_stop_index = tab_stop_index;
        self
    }
}

/// Single-line text field. Emits `TextInputChanged`, `TextInputSubmitted`
/// and `TextInputCanceled`.
#[derive(Debug)]
pub struct TextInput {
    core: WidgetCore<EditState>,
    committed: String,
    buffer: EditBuffer,
    placeholder: String,
    max_length: Option<usize>,
    password: bool,
    blink_elapsed: f32,
    cursor_visible: bool,
}

impl TextInput {
    /// Creates a text input.
    #[must_use]
    pub fn new(config: TextInputConfig) -> Self {
        let mut core = WidgetCore::new(WidgetKind::TextInput, InteractionMachine::new());
        core.state.set_tab_stop_index(config.tab_stop_index);
        core.machine.set_enabled(config.enabled);

        let committed: String = match config.max_length {
            Some(max) => config.text.chars().take(max).collect(),
            None => config.text,
        };
        Self {
            core,
            committed,
            buffer: EditBuffer::new(),
            placeholder: config.placeholder,
            max_length: config.max_length,
            password: config.password,
            blink_elapsed: 0.0,
            cursor_visible: true,
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

    /// Returns the committed text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.committed
    }

    /// Returns the text being edited (the committed text when not focused).
    #[must_use]
    pub fn edit_text(&self) -> &str {
        if self.core.is_focused() {
            self.buffer.text()
        } else {
            &self.committed
        }
    }

    /// Returns the cursor position in characters.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.buffer.cursor()
    }

    /// Returns true while the blinking cursor is in its visible phase.
    #[must_use]
    pub fn is_cursor_visible(&self) -> bool {
        self.core.is_focused() && self.cursor_visible
    }

    /// Returns the text as displayed, masked for password fields.
    #[must_use]
    pub fn display_text(&self) -> String {
        let text = self.edit_text();
        if self.password {
            std::iter::repeat(MASK_CHAR).take(text.chars().count()).collect()
        } else {
            text.to_owned()
        }
    }

    /// Replaces the committed text. Emits `TextInputChanged` if it differs.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text: String = text.into();
        let text = match self.max_length {
            Some(max) => text.chars().take(max).collect(),
            None => text,
        };
        if self.core.is_focused() {
            self.buffer.load(&text);
        }
        self.replace_committed(text, Trigger::Programmatic);
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

    fn focus_with(&mut self, trigger: Trigger) {
        if self.core.focus(trigger) {
            self.buffer.load(&self.committed);
            self.reset_blink();
        }
    }

    fn blur_with(&mut self, trigger: Trigger) {
        if !self.core.is_focused() {
            return;
        }
        self.commit(trigger.clone());
        self.core.blur(trigger);
    }

    fn commit(&mut self, trigger: Trigger) {
        let edited = self.buffer.text().to_owned();
        self.replace_committed(edited, trigger);
    }

    fn replace_committed(&mut self, text: String, trigger: Trigger) {
        if text == self.committed {
            return;
        }
        let previous = std::mem::replace(&mut self.committed, text);
        self.core.state.emit(
            EventKind::Changed {
                previous: Value::Text(previous),
                current: Value::Text(self.committed.clone()),
            },
            trigger,
        );
    }

    fn reset_blink(&mut self) {
        self.blink_elapsed = 0.0;
        self.cursor_visible = true;
    }
}

impl Widget for TextInput {
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
        TextInput::set_enabled(self, enabled);
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
        if !self.core.is_focused() {
            return;
        }

        self.blink_elapsed += dt;
        while self.blink_elapsed >= CURSOR_BLINK_SECS {
            self.blink_elapsed -= CURSOR_BLINK_SECS;
            self.cursor_visible = !self.cursor_visible;
        }
    }

    fn render(&self, theme: &Theme, commands: &mut Vec<RenderCommand>) {
        let bounds = self.core.state.bounds();
        let level = self.core.level();
        let focused = self.core.is_focused();
        draw_frame(theme, bounds, level, focused, commands);

        let display = self.display_text();
        if display.is_empty() && !focused {
            draw_text(theme, bounds, &self.placeholder, theme.text_muted, commands);
        } else {
            draw_text(theme, bounds, &display, theme.text_for(level), commands);
        }

        if self.is_cursor_visible() {
            let style = &theme.style;
            let advance = style.font_size * 0.5;
            let x = bounds.x + style.padding + advance * self.buffer.cursor() as f32;
            commands.push(RenderCommand::Rect {
                bounds: Rect::new(x, bounds.y + style.padding, 1.0, bounds.height - style.padding * 2.0),
                color: theme.text,
                corner_radius: 0.0,
            });
        }
    }

    fn on_add(&mut self, settings: &InteractionSettings) {
        self.core.apply_settings(settings);
    }

    fn on_remove(&mut self) {
        self.blur_with(Trigger::Programmatic);
        self.core.detach();
    }
}

impl Focusable for TextInput {
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
        let handled = match event.key {
            Key::Enter => {
                self.commit(trigger.clone());
                let value = Value::Text(self.committed.clone());
                self.core.state.emit(EventKind::Submitted { value }, trigger);
                true
            }
            Key::Escape => {
                self.buffer.load(&self.committed);
                self.core.state.emit(EventKind::Canceled, trigger.clone());
                self.blur_with(trigger);
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
                Some(c) if !c.is_control() && !event.modifiers.ctrl => {
                    self.buffer.insert(c, self.max_length)
                }
                _ => false,
            },
        };

        if handled {
            self.reset_blink();
        }
        handled
    }
}
