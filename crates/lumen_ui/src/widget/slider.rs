//! Horizontal value slider.

use lumen_core::{
    ButtonState, EventKind, FocusLink, Focusable, Interaction, InteractionMachine, Key, KeyEvent,
    Level, PointerEvent, PointerEventKind, PressSource, Rect, Trigger, Value, WidgetKind,
    NO_TAB_STOP,
};
use serde::Deserialize;

use super::core::{draw_frame, Widget, WidgetCore, WidgetState};
use crate::config::InteractionSettings;
use crate::render::RenderCommand;
use crate::style::Theme;

/// Page Up / Page Down move this many steps.
const PAGE_STEPS: f64 = 10.0;

/// Slider configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
    /// Snap increment; 0 means continuous.
    pub step: f64,
    /// Initial value.
    pub value: f64,
    /// Position in Tab order.
    pub tab_stop_index: i32,
    /// Initial enabled state.
    pub enabled: bool,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            step: 0.0,
            value: 0.0,
            tab_stop_index: NO_TAB_STOP,
            enabled: true,
        }
    }
}

impl SliderConfig {
    /// Creates a config for a range.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            value: min,
            ..Self::default()
        }
    }

    /// Sets the snap increment.
    #[must_use]
    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Sets the initial value.
    #[must_use]
    pub fn value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    /// Sets the tab stop.
    #[must_use]
    pub fn tab_stop(mut self, tab_stop_index: i32) -> Self {
        self.tab_stop_index = tab_stop_index;
        self
    }
}

/// Horizontal slider. Emits `SliderChanged` whenever the value moves.
#[derive(Debug)]
pub struct Slider {
    core: WidgetCore<ButtonState>,
    min: f64,
    max: f64,
    step: f64,
    value: f64,
}

impl Slider {
    /// Creates a slider. Swapped bounds are reordered; a non-finite bound
    /// falls back to the default range's.
    #[must_use]
    pub fn new(config: SliderConfig) -> Self {
        let mut core = WidgetCore::new(WidgetKind::Slider, InteractionMachine::new());
        core.state.set_tab_stop_index(config.tab_stop_index);
        core.machine.set_enabled(config.enabled);

        let defaults = SliderConfig::default();
        let min = if config.min.is_finite() { config.min } else { defaults.min };
        let max = if config.max.is_finite() { config.max } else { defaults.max };
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let step = if config.step.is_finite() { config.step.max(0.0) } else { 0.0 };
        let mut slider = Self {
            core,
            min,
            max,
            step,
            value: min,
        };
        slider.value = slider.snap(config.value);
        slider
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

    /// Returns the value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the value mapped to 0-1.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            0.0
        } else {
            (self.value - self.min) / span
        }
    }

    /// Sets the value (clamped and snapped). Emits `SliderChanged` if it moved.
    pub fn set_value(&mut self, value: f64) {
        self.apply(value, Trigger::Programmatic);
    }

    /// Returns true if enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.core.is_enabled()
    }

    /// Enables or disables the slider.
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

    fn snap(&self, value: f64) -> f64 {
        let value = if value.is_finite() { value } else { self.min };
        let snapped = if self.step > 0.0 {
            self.min + ((value - self.min) / self.step).round() * self.step
        } else {
            value
        };
        snapped.clamp(self.min, self.max)
    }

    fn apply(&mut self, value: f64, trigger: Trigger) -> bool {
        let value = self.snap(value);
        if (value - self.value).abs() < f64::EPSILON {
            return false;
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
        true
    }

    fn value_at(&self, x: f32) -> f64 {
        let bounds = self.core.state.bounds();
        if bounds.width <= 0.0 {
            return self.value;
        }
        let t = f64::from(((x - bounds.x) / bounds.width).clamp(0.0, 1.0));
        self.min + (self.max - self.min) * t
    }

    fn increment(&self) -> f64 {
        if self.step > 0.0 {
            self.step
        } else {
            (self.max - self.min) / 100.0
        }
    }
}

impl Widget for Slider {
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
        let trigger = Trigger::Pointer(*event);
        let out = self.core.pointer(event);

        if out.contains(&Interaction::Down) {
            self.core.focus(trigger.clone());
            self.apply(self.value_at(event.position.x), trigger);
            return true;
        }

        // Drag while the pointer holds the thumb.
        if event.kind == PointerEventKind::Move
            && self.core.machine.press_source() == Some(PressSource::Pointer)
        {
            return self.apply(self.value_at(event.position.x), trigger);
        }

        !out.is_empty()
    }

    fn update(&mut self, dt: f32) {
        self.core.tick(dt);
    }

    fn render(&self, theme: &Theme, commands: &mut Vec<RenderCommand>) {
        let bounds = self.core.state.bounds();
        let level = self.core.level();
        let track_height = (bounds.height * 0.25).max(1.0);
        let track = Rect::new(
            bounds.x,
            bounds.y + (bounds.height - track_height) * 0.5,
            bounds.width,
            track_height,
        );
        draw_frame(theme, track, level, self.core.is_focused(), commands);

        let filled = (bounds.width as f64 * self.fraction()) as f32;
        commands.push(RenderCommand::Rect {
            bounds: Rect::new(track.x, track.y, filled, track.height),
            color: theme.accent_for(level),
            corner_radius: theme.style.corner_radius,
        });

        let thumb = bounds.height;
        commands.push(RenderCommand::Rect {
            bounds: Rect::new(bounds.x + filled - thumb * 0.5, bounds.y, thumb, thumb),
            color: theme.text_for(level),
            corner_radius: thumb * 0.5,
        });
    }

    fn on_add(&mut self, settings: &InteractionSettings) {
        self.core.apply_settings(settings);
    }

    fn on_remove(&mut self) {
        self.core.detach();
    }
}

impl Focusable for Slider {
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
        if !self.core.is_enabled() || !self.core.is_focused() {
            return false;
        }

        let target = match event.key {
            Key::Left | Key::Down => self.value - self.increment(),
            Key::Right | Key::Up => self.value + self.increment(),
            Key::PageDown => self.value - self.increment() * PAGE_STEPS,
            Key::PageUp => self.value + self.increment() * PAGE_STEPS,
            Key::Home => self.min,
            Key::End => self.max,
            _ => return false,
        };
        self.apply(target, Trigger::Key(*event));
        true
    }
}
