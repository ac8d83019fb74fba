//! # Interaction State Machine
//!
//! One generic machine shared by every widget family. It owns the raw flags
//! (`enabled`, `hovered`, `pressed`, `focused`), resolves them into exactly one
//! [`Level`] by fixed precedence, and maps that level into the family's own
//! state enum through [`StateTable`].
//!
//! ## Precedence (highest first)
//!
//! ```text
//! Disabled > Pressed > Focused > Hovered > Idle
//! ```
//!
//! Every operation returns the [`Interaction`]s it produced, in order. The
//! owning widget turns them into [`UiEvent`](crate::events::UiEvent)s.

use std::fmt::Debug;

use crate::events::EventKind;
use crate::input::Key;

/// Window after a pointer-up during which a pointer-leave is deferred.
///
/// Input layers commonly deliver a synthetic leave right after the up that
/// ends a click. Applying it immediately would flip the widget back to idle
/// before its click is fully processed.
pub const UNHOVER_DEBOUNCE_SECS: f32 = 0.05;

/// Interaction flags (bitfield).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetFlags(u32);

impl WidgetFlags {
    /// Widget accepts interaction.
    pub const ENABLED: u32 = 1 << 0;
    /// Pointer is over the widget.
    pub const HOVERED: u32 = 1 << 1;
    /// Pointer button or activation key is held on the widget.
    pub const PRESSED: u32 = 1 << 2;
    /// Widget owns keyboard focus.
    pub const FOCUSED: u32 = 1 << 3;

    /// Default flags for a new widget.
    pub const DEFAULT: Self = Self(Self::ENABLED);

    /// Creates new flags with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Returns true if the flag is set.
    #[inline]
    #[must_use]
    pub const fn has(self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }

    /// Sets a flag.
    #[inline]
    pub fn set(&mut self, flag: u32) {
        self.0 |= flag;
    }

    /// Clears a flag.
    #[inline]
    pub fn clear(&mut self, flag: u32) {
        self.0 &= !flag;
    }

    /// Sets or clears a flag.
    #[inline]
    pub fn assign(&mut self, flag: u32, on: bool) {
        if on {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }
}

impl Default for WidgetFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Family-independent interaction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Widget is disabled.
    Disabled,
    /// Widget is pressed (or editing).
    Pressed,
    /// Widget owns keyboard focus.
    Focused,
    /// Pointer is over the widget.
    Hovered,
    /// Nothing is happening.
    Idle,
}

impl Level {
    /// Resolves flags into a level by precedence.
    ///
    /// With `hover_visual` off, hovering never raises the level above idle.
    #[must_use]
    pub const fn resolve(flags: WidgetFlags, hover_visual: bool) -> Self {
        if !flags.has(WidgetFlags::ENABLED) {
            Self::Disabled
        } else if flags.has(WidgetFlags::PRESSED) {
            Self::Pressed
        } else if flags.has(WidgetFlags::FOCUSED) {
            Self::Focused
        } else if hover_visual && flags.has(WidgetFlags::HOVERED) {
            Self::Hovered
        } else {
            Self::Idle
        }
    }
}

/// Maps a [`Level`] into a widget family's state enum.
pub trait StateTable: Copy + Eq + Debug {
    /// Returns the family state for a level.
    fn from_level(level: Level) -> Self;
}

/// States of activatable widgets (button, checkbox, switch, slider).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonState {
    /// Resting.
    #[default]
    Idle,
    /// Hovered or keyboard-focused.
    Hovered,
    /// Held down.
    Pressed,
    /// Not interactive.
    Disabled,
}

impl StateTable for ButtonState {
    fn from_level(level: Level) -> Self {
        match level {
            Level::Disabled => Self::Disabled,
            Level::Pressed => Self::Pressed,
            Level::Focused | Level::Hovered => Self::Hovered,
            Level::Idle => Self::Idle,
        }
    }
}

/// States of display-only widgets (label, image, panel, progress bar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayState {
    /// Resting.
    #[default]
    Idle,
    /// Hovered (only when hover visuals are enabled).
    Hovered,
    /// Not interactive.
    Disabled,
}

impl StateTable for DisplayState {
    fn from_level(level: Level) -> Self {
        match level {
            Level::Disabled => Self::Disabled,
            Level::Pressed | Level::Hovered => Self::Hovered,
            Level::Focused | Level::Idle => Self::Idle,
        }
    }
}

/// States of value-editing widgets (text input, numeric input).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EditState {
    /// Showing the committed value.
    #[default]
    Normal,
    /// Editing.
    Focused,
    /// Not interactive.
    Disabled,
}

impl StateTable for EditState {
    fn from_level(level: Level) -> Self {
        match level {
            Level::Disabled => Self::Disabled,
            Level::Pressed | Level::Focused => Self::Focused,
            Level::Hovered | Level::Idle => Self::Normal,
        }
    }
}

/// Externally meaningful transition produced by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interaction {
    /// Re-enabled.
    Enabled,
    /// Disabled.
    Disabled,
    /// Pointer entered.
    Hovered,
    /// Pointer left.
    Unhovered,
    /// Press started.
    Down,
    /// Press ended.
    Up,
    /// Press ended in a way that activates the widget.
    Clicked,
    /// Focus gained.
    Focused,
    /// Focus lost.
    Blurred,
}

impl Interaction {
    /// Converts into the event kind the widget emits.
    #[must_use]
    pub const fn event_kind(self) -> EventKind {
        match self {
            Self::Enabled => EventKind::Enabled,
            Self::Disabled => EventKind::Disabled,
            Self::Hovered => EventKind::Hovered,
            Self::Unhovered => EventKind::Unhovered,
            Self::Down => EventKind::Down,
            Self::Up => EventKind::Up,
            Self::Clicked => EventKind::Clicked,
            Self::Focused => EventKind::Focused,
            Self::Blurred => EventKind::Blurred,
        }
    }
}

/// What started the current press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressSource {
    /// A pointer button.
    Pointer,
    /// An activation key held while focused.
    Keyboard(Key),
}

/// Generic interaction state machine.
#[derive(Debug, Clone)]
pub struct InteractionMachine<S: StateTable> {
    /// Raw flags.
    flags: WidgetFlags,
    /// Resolved state, recomputed after every flag change.
    state: S,
    /// Whether hovering changes the resolved state.
    hover_visual: bool,
    /// Whether the widget can own keyboard focus.
    focusable: bool,
    /// Origin of the current press.
    press_source: Option<PressSource>,
    /// Seconds since the last pointer-up, while inside the debounce window.
    since_release: Option<f32>,
    /// A leave arrived inside the debounce window.
    unhover_pending: bool,
    /// Debounce window length in seconds.
    debounce: f32,
}

impl<S: StateTable> InteractionMachine<S> {
    /// Creates an enabled, focusable machine with hover visuals on.
    #[must_use]
    pub fn new() -> Self {
        let flags = WidgetFlags::DEFAULT;
        Self {
            flags,
            state: S::from_level(Level::resolve(flags, true)),
            hover_visual: true,
            focusable: true,
            press_source: None,
            since_release: None,
            unhover_pending: false,
            debounce: UNHOVER_DEBOUNCE_SECS,
        }
    }

    /// Sets whether hovering affects the resolved state.
    #[must_use]
    pub fn with_hover_visual(mut self, hover_visual: bool) -> Self {
        self.hover_visual = hover_visual;
        self.recompute();
        self
    }

    /// Sets whether the machine accepts focus.
    #[must_use]
    pub fn with_focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    /// Sets the unhover debounce window in seconds.
    #[must_use]
    pub fn with_debounce(mut self, seconds: f32) -> Self {
        self.debounce = seconds.max(0.0);
        self
    }

    /// Changes the unhover debounce window in seconds.
    pub fn set_debounce(&mut self, seconds: f32) {
        self.debounce = seconds.max(0.0);
    }

    /// Returns the unhover debounce window in seconds.
    #[must_use]
    pub fn debounce(&self) -> f32 {
        self.debounce
    }

    /// Returns the resolved state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> S {
        self.state
    }

    /// Returns the resolved level.
    #[must_use]
    pub fn level(&self) -> Level {
        Level::resolve(self.flags, self.hover_visual)
    }

    /// Returns the raw flags.
    #[must_use]
    pub fn flags(&self) -> WidgetFlags {
        self.flags
    }

    /// Returns true if enabled.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.flags.has(WidgetFlags::ENABLED)
    }

    /// Returns true if hovered.
    #[inline]
    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.flags.has(WidgetFlags::HOVERED)
    }

    /// Returns true if pressed.
    #[inline]
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.flags.has(WidgetFlags::PRESSED)
    }

    /// Returns true if focused.
    #[inline]
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.flags.has(WidgetFlags::FOCUSED)
    }

    /// Returns true if the machine accepts focus.
    #[must_use]
    pub fn is_focusable(&self) -> bool {
        self.focusable
    }

    /// Returns the origin of the current press.
    #[must_use]
    pub fn press_source(&self) -> Option<PressSource> {
        self.press_source
    }

    /// Returns true while a deferred leave is waiting for the debounce window.
    #[must_use]
    pub fn is_unhover_pending(&self) -> bool {
        self.unhover_pending
    }

    /// Enables or disables the widget.
    ///
    /// Disabling clears hover, press and focus. Re-enabling lands on the
    /// default state.
    pub fn set_enabled(&mut self, enabled: bool) -> Vec<Interaction> {
        if enabled == self.is_enabled() {
            return Vec::new();
        }

        let out = if enabled {
            self.flags.set(WidgetFlags::ENABLED);
            vec![Interaction::Enabled]
        } else {
            self.flags = WidgetFlags(0);
            self.press_source = None;
            self.since_release = None;
            self.unhover_pending = false;
            vec![Interaction::Disabled]
        };

        self.recompute();
        out
    }

    /// Pointer entered the widget.
    pub fn pointer_enter(&mut self) -> Vec<Interaction> {
        if !self.is_enabled() {
            return Vec::new();
        }

        if self.unhover_pending {
            // Re-entered inside the debounce window: the deferred leave never happened.
            self.unhover_pending = false;
            return Vec::new();
        }
        if self.is_hovered() {
            return Vec::new();
        }

        self.flags.set(WidgetFlags::HOVERED);
        self.recompute();
        vec![Interaction::Hovered]
    }

    /// Pointer left the widget.
    pub fn pointer_leave(&mut self) -> Vec<Interaction> {
        if !self.is_enabled() || !self.is_hovered() {
            return Vec::new();
        }

        if self.since_release.is_some() {
            self.unhover_pending = true;
            return Vec::new();
        }

        self.flags.clear(WidgetFlags::HOVERED);
        self.recompute();
        vec![Interaction::Unhovered]
    }

    /// Pointer button pressed over the widget.
    pub fn pointer_down(&mut self) -> Vec<Interaction> {
        if !self.is_enabled() {
            return Vec::new();
        }

        self.flags.set(WidgetFlags::PRESSED);
        self.press_source = Some(PressSource::Pointer);
        self.recompute();
        vec![Interaction::Down]
    }

    /// Pointer button released.
    ///
    /// Always yields `Up` while enabled. Yields `Clicked` only if this widget
    /// was pressed by the pointer and the pointer is still over it.
    pub fn pointer_up(&mut self) -> Vec<Interaction> {
        if !self.is_enabled() {
            return Vec::new();
        }

        let mut out = vec![Interaction::Up];
        if self.press_source == Some(PressSource::Pointer) {
            if self.is_hovered() {
                out.push(Interaction::Clicked);
            }
            self.flags.clear(WidgetFlags::PRESSED);
            self.press_source = None;
        }

        self.since_release = Some(0.0);
        self.unhover_pending = false;
        self.recompute();
        out
    }

    /// Key pressed while the widget may own focus.
    ///
    /// Space and Enter start a keyboard press on a focused widget.
    pub fn key_down(&mut self, key: Key) -> Vec<Interaction> {
        if !self.is_enabled() || !self.is_focused() || !key.is_activation() || self.is_pressed() {
            return Vec::new();
        }

        self.flags.set(WidgetFlags::PRESSED);
        self.press_source = Some(PressSource::Keyboard(key));
        self.recompute();
        vec![Interaction::Down]
    }

    /// Key released. Completes a keyboard press started by the same key.
    pub fn key_up(&mut self, key: Key) -> Vec<Interaction> {
        if self.press_source != Some(PressSource::Keyboard(key)) {
            return Vec::new();
        }

        self.flags.clear(WidgetFlags::PRESSED);
        self.press_source = None;
        self.recompute();
        vec![Interaction::Up, Interaction::Clicked]
    }

    /// Gains keyboard focus.
    pub fn focus(&mut self) -> Vec<Interaction> {
        if !self.is_enabled() || !self.focusable || self.is_focused() {
            return Vec::new();
        }

        self.flags.set(WidgetFlags::FOCUSED);
        self.recompute();
        vec![Interaction::Focused]
    }

    /// Loses keyboard focus. A keyboard press in progress is abandoned.
    pub fn blur(&mut self) -> Vec<Interaction> {
        if !self.is_focused() {
            return Vec::new();
        }

        self.flags.clear(WidgetFlags::FOCUSED);
        if matches!(self.press_source, Some(PressSource::Keyboard(_))) {
            self.flags.clear(WidgetFlags::PRESSED);
            self.press_source = None;
        }
        self.recompute();
        vec![Interaction::Blurred]
    }

    /// Advances time. Applies a deferred leave once the debounce window closes.
    pub fn tick(&mut self, dt: f32) -> Vec<Interaction> {
        let Some(elapsed) = self.since_release else {
            return Vec::new();
        };

        let elapsed = elapsed + dt;
        if elapsed < self.debounce {
            self.since_release = Some(elapsed);
            return Vec::new();
        }

        self.since_release = None;
        if !std::mem::take(&mut self.unhover_pending) || !self.is_hovered() {
            return Vec::new();
        }

        self.flags.clear(WidgetFlags::HOVERED);
        self.recompute();
        vec![Interaction::Unhovered]
    }

    fn recompute(&mut self) {
        self.state = S::from_level(Level::resolve(self.flags, self.hover_visual));
    }
}

impl<S: StateTable> Default for InteractionMachine<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Button = InteractionMachine<ButtonState>;

    #[test]
    fn test_precedence_order() {
        let mut flags = WidgetFlags::new();
        flags.set(WidgetFlags::HOVERED);
        flags.set(WidgetFlags::FOCUSED);
        assert_eq!(Level::resolve(flags, true), Level::Focused);

        flags.set(WidgetFlags::PRESSED);
        assert_eq!(Level::resolve(flags, true), Level::Pressed);

        flags.clear(WidgetFlags::ENABLED);
        assert_eq!(Level::resolve(flags, true), Level::Disabled);
    }

    #[test]
    fn test_hover_visual_off_stays_idle() {
        let mut machine = InteractionMachine::<DisplayState>::new().with_hover_visual(false);
        assert_eq!(machine.pointer_enter(), vec![Interaction::Hovered]);
        assert_eq!(machine.state(), DisplayState::Idle);
    }

    #[test]
    fn test_disabled_overrides_all() {
        let mut machine = Button::new();
        machine.pointer_enter();
        machine.pointer_down();
        assert_eq!(machine.state(), ButtonState::Pressed);

        assert_eq!(machine.set_enabled(false), vec![Interaction::Disabled]);
        assert_eq!(machine.state(), ButtonState::Disabled);
        assert!(!machine.is_hovered());
        assert!(!machine.is_pressed());

        assert!(machine.pointer_down().is_empty());
        assert!(machine.pointer_enter().is_empty());
        assert!(machine.focus().is_empty());
        assert_eq!(machine.state(), ButtonState::Disabled);
    }

    #[test]
    fn test_reenable_lands_on_default() {
        let mut machine = Button::new();
        machine.pointer_enter();
        machine.set_enabled(false);

        assert_eq!(machine.set_enabled(true), vec![Interaction::Enabled]);
        assert_eq!(machine.state(), ButtonState::Idle);
        assert!(machine.set_enabled(true).is_empty());
    }

    #[test]
    fn test_click_requires_hover_at_release() {
        let mut machine = Button::new();
        machine.pointer_enter();
        machine.pointer_down();
        machine.pointer_leave();
        assert_eq!(machine.pointer_up(), vec![Interaction::Up]);

        let mut machine = Button::new();
        machine.pointer_enter();
        assert_eq!(machine.pointer_down(), vec![Interaction::Down]);
        assert_eq!(machine.pointer_up(), vec![Interaction::Up, Interaction::Clicked]);
    }

    #[test]
    fn test_up_without_press_does_not_click() {
        let mut machine = Button::new();
        machine.pointer_enter();
        assert_eq!(machine.pointer_up(), vec![Interaction::Up]);
    }

    #[test]
    fn test_keyboard_activation_sequence() {
        let mut machine = Button::new();
        assert!(machine.key_down(Key::Space).is_empty(), "unfocused widget ignores keys");

        machine.focus();
        assert_eq!(machine.key_down(Key::Enter), vec![Interaction::Down]);
        assert_eq!(machine.state(), ButtonState::Pressed);
        assert!(machine.key_up(Key::Space).is_empty(), "other key does not release");
        assert_eq!(
            machine.key_up(Key::Enter),
            vec![Interaction::Up, Interaction::Clicked]
        );
        assert_eq!(machine.state(), ButtonState::Hovered);
    }

    #[test]
    fn test_blur_cancels_keyboard_press() {
        let mut machine = Button::new();
        machine.focus();
        machine.key_down(Key::Space);

        assert_eq!(machine.blur(), vec![Interaction::Blurred]);
        assert!(!machine.is_pressed());
        assert!(machine.key_up(Key::Space).is_empty());
    }

    #[test]
    fn test_unhover_debounced_after_release() {
        let mut machine = Button::new();
        machine.pointer_enter();
        machine.pointer_down();
        machine.pointer_up();

        assert!(machine.pointer_leave().is_empty());
        assert!(machine.is_hovered());
        assert!(machine.is_unhover_pending());

        assert!(machine.tick(0.02).is_empty());
        assert!(machine.is_hovered());
        assert_eq!(machine.tick(0.04), vec![Interaction::Unhovered]);
        assert_eq!(machine.state(), ButtonState::Idle);

        // Window closed: leaves apply immediately again.
        machine.pointer_enter();
        assert_eq!(machine.pointer_leave(), vec![Interaction::Unhovered]);
    }

    #[test]
    fn test_reenter_cancels_pending_unhover() {
        let mut machine = Button::new();
        machine.pointer_enter();
        machine.pointer_down();
        machine.pointer_up();
        machine.pointer_leave();

        assert!(machine.pointer_enter().is_empty());
        assert!(machine.tick(1.0).is_empty());
        assert!(machine.is_hovered());
    }

    #[test]
    fn test_edit_state_mapping() {
        let mut machine = InteractionMachine::<EditState>::new();
        machine.pointer_enter();
        assert_eq!(machine.state(), EditState::Normal);
        machine.focus();
        assert_eq!(machine.state(), EditState::Focused);
        machine.set_enabled(false);
        assert_eq!(machine.state(), EditState::Disabled);
        assert!(!machine.is_focused());
    }

    #[test]
    fn test_non_focusable_ignores_focus() {
        let mut machine = InteractionMachine::<DisplayState>::new().with_focusable(false);
        assert!(machine.focus().is_empty());
        assert!(!machine.is_focused());
    }
}
