//! Static text.

use lumen_core::{DisplayState, InteractionMachine, Level, PointerEvent, Rect, WidgetKind};
use serde::Deserialize;

use super::core::{draw_text, Widget, WidgetCore, WidgetState};
use crate::config::InteractionSettings;
use crate::render::RenderCommand;
use crate::style::{Color, Theme};

/// Label configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Text content.
    pub text: String,
    /// Text color; the theme text color when absent.
    pub color: Option<Color>,
    /// Whether hovering changes the look.
    pub hover_visual: bool,
}

impl LabelConfig {
    /// Creates a config with text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Overrides the text color.
    #[must_use]
    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// Static text.
#[derive(Debug)]
pub struct Label {
    core: WidgetCore<DisplayState>,
    text: String,
    color: Option<Color>,
}

impl Label {
    /// Creates a label.
    #[must_use]
    pub fn new(config: LabelConfig) -> Self {
        let machine = InteractionMachine::new()
            .with_focusable(false)
            .with_hover_visual(config.hover_visual);
        Self {
            core: WidgetCore::new(WidgetKind::Label, machine),
            text: config.text,
            color: config.color,
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

    /// Returns the text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Widget for Label {
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
    }

    fn render(&self, theme: &Theme, commands: &mut Vec<RenderCommand>) {
        if self.text.is_empty() {
            return;
        }
        let level = self.core.level();
        let color = match (self.color, level) {
            (Some(color), Level::Idle | Level::Hovered) => color,
            _ => theme.text_for(level),
        };
        draw_text(theme, self.core.state.bounds(), &self.text, color, commands);
    }

    fn on_add(&mut self, settings: &InteractionSettings) {
        self.core.apply_settings(settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::PointerEventKind;

    #[test]
    fn test_ignores_presses() {
        let mut label = Label::new(LabelConfig::new("Score"));
        assert!(label.handle_pointer(&PointerEvent::new(PointerEventKind::Enter, (0.0, 0.0))));
        assert!(!label.handle_pointer(&PointerEvent::new(PointerEventKind::Down, (0.0, 0.0))));
        assert_eq!(label.current(), DisplayState::Idle);
    }

    #[test]
    fn test_hover_visual() {
        let mut label = Label::new(LabelConfig {
            hover_visual: true,
            ..LabelConfig::new("Score")
        });
        label.handle_pointer(&PointerEvent::new(PointerEventKind::Enter, (0.0, 0.0)));
        assert_eq!(label.current(), DisplayState::Hovered);
    }

    #[test]
    fn test_render_text() {
        let mut label = Label::new(LabelConfig::new("Score"));
        let mut commands = Vec::new();
        label.render(&Theme::DUSK, &mut commands);
        assert!(matches!(&commands[..], [RenderCommand::Text { text, .. }] if text == "Score"));

        label.set_text("");
        commands.clear();
        label.render(&Theme::DUSK, &mut commands);
        assert!(commands.is_empty());
    }
}
