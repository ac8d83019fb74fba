//! Progress indicator with a smoothed fill.

use lumen_core::{
    DisplayState, EventKind, InteractionMachine, Level, PointerEvent, Rect, Trigger, Value,
    WidgetKind,
};
use serde::Deserialize;

use super::core::{draw_frame, draw_text, Widget, WidgetCore, WidgetState};
use crate::animation::Glide;
use crate::config::InteractionSettings;
use crate::render::RenderCommand;
use crate::style::Theme;

/// Progress bar configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProgressBarConfig {
    /// Initial value in `[0, 1]`.
    pub value: f64,
    /// Seconds the fill takes to catch up with a new value.
    pub smoothing_secs: f32,
    /// Draw the percentage as text.
    pub show_percentage: bool,
    /// Whether hovering changes the look.
    pub hover_visual: bool,
}

impl Default for ProgressBarConfig {
    fn default() -> Self {
        Self {
            value: 0.0,
            smoothing_secs: 0.25,
            show_percentage: false,
            hover_visual: false,
        }
    }
}

impl ProgressBarConfig {
    /// Sets the initial value.
    #[must_use]
    pub fn value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    /// Draws the percentage.
    #[must_use]
    pub fn show_percentage(mut self, show: bool) -> Self {
        self.show_percentage = show;
        self
    }
}

/// Progress bar. Emits `ProgressBarChanged` and, on reaching 1,
/// `ProgressBarCompleted`.
#[derive(Debug)]
pub struct ProgressBar {
    core: WidgetCore<DisplayState>,
    value: f64,
    display: Glide,
    show_percentage: bool,
}

impl ProgressBar {
    /// Creates a progress bar.
    #[must_use]
    pub fn new(config: ProgressBarConfig) -> Self {
        let machine = InteractionMachine::new()
            .with_focusable(false)
            .with_hover_visual(config.hover_visual);
        let value = clamp_unit(config.value);
        Self {
            core: WidgetCore::new(WidgetKind::ProgressBar, machine),
            value,
            display: Glide::at_rest(value as f32, config.smoothing_secs),
            show_percentage: config.show_percentage,
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

    /// Returns the value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the fill fraction currently drawn.
    #[must_use]
    pub fn displayed(&self) -> f32 {
        self.display.value()
    }

    /// Returns true once the value is 1.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.value >= 1.0
    }

    /// Sets the value, clamped to `[0, 1]`.
    pub fn set_value(&mut self, value: f64) {
        let value = clamp_unit(value);
        if (value - self.value).abs() < f64::EPSILON {
            return;
        }

        let previous = self.value;
        self.value = value;
        self.display.retarget(value as f32);
        self.core.state.emit(
            EventKind::Changed {
                previous: Value::Number(previous),
                current: Value::Number(value),
            },
            Trigger::Programmatic,
        );
        if value >= 1.0 {
            self.core.state.emit(EventKind::Completed, Trigger::Programmatic);
        }
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

impl Widget for ProgressBar {
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
        self.core.hover(event)
    }

    fn update(&mut self, dt: f32) {
        self.core.tick(dt);
        self.display.advance(dt);
    }

    fn render(&self, theme: &Theme, commands: &mut Vec<RenderCommand>) {
        let bounds = self.core.state.bounds();
        let level = self.core.level();
        draw_frame(theme, bounds, level, false, commands);

        let filled = bounds.width * self.display.value().clamp(0.0, 1.0);
        if filled > 0.0 {
            commands.push(RenderCommand::Rect {
                bounds: Rect::new(bounds.x, bounds.y, filled, bounds.height),
                color: theme.accent_for(level),
                corner_radius: theme.style.corner_radius,
            });
        }
        if self.show_percentage {
            let text = format!("{:.0}%", self.value * 100.0);
            draw_text(theme, bounds, &text, theme.text_for(level), commands);
        }
    }

    fn on_add(&mut self, settings: &InteractionSettings) {
        self.core.apply_settings(settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_completed_once_at_full() {
        let mut bar = ProgressBar::new(ProgressBarConfig::default());
        let names = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&names);
        bar.events_mut()
            .subscribe(move |event| sink.borrow_mut().push(event.name()));

        bar.set_value(0.5);
        bar.set_value(1.7);
        bar.set_value(1.0);

        assert!(bar.is_complete());
        assert_eq!(
            *names.borrow(),
            ["ProgressBarChanged", "ProgressBarChanged", "ProgressBarCompleted"]
        );
    }

    #[test]
    fn test_display_catches_up() {
        let mut bar = ProgressBar::new(ProgressBarConfig::default());
        bar.set_value(0.8);
        assert!(bar.displayed() < 0.01);

        for _ in 0..30 {
            bar.update(0.016);
        }
        assert!((bar.displayed() - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_percentage_text() {
        let bar = ProgressBar::new(ProgressBarConfig::default().value(0.25).show_percentage(true))
            .with_bounds(Rect::new(0.0, 0.0, 100.0, 10.0));
        let mut commands = Vec::new();
        bar.render(&Theme::DUSK, &mut commands);
        assert!(commands
            .iter()
            .any(|c| matches!(c, RenderCommand::Text { text, .. } if text == "25%")));
    }
}
