//! Static textured quad.

use lumen_core::{DisplayState, InteractionMachine, Level, PointerEvent, Rect, WidgetKind};
use serde::Deserialize;

use super::core::{Widget, WidgetCore, WidgetState};
use crate::config::InteractionSettings;
use crate::render::RenderCommand;
use crate::style::{Color, Theme};

/// Full texture coordinates.
pub const FULL_UV: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

/// Image configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Engine texture id.
    pub texture_id: u32,
    /// UV rectangle (u0, v0, u1, v1).
    pub uv: [f32; 4],
    /// Tint multiplied into the texture.
    pub tint: Color,
    /// Whether hovering changes the look.
    pub hover_visual: bool,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            texture_id: 0,
            uv: FULL_UV,
            tint: Color::WHITE,
            hover_visual: false,
        }
    }
}

impl ImageConfig {
    /// Creates a config for a texture.
    #[must_use]
    pub fn new(texture_id: u32) -> Self {
        Self {
            texture_id,
            ..Self::default()
        }
    }

    /// Uses a sub-rectangle of the texture.
    #[must_use]
    pub fn uv(mut self, uv: [f32; 4]) -> Self {
        self.uv = uv;
        self
    }

    /// Sets the tint.
    #[must_use]
    pub fn tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }
}

/// Static image.
#[derive(Debug)]
pub struct Image {
    core: WidgetCore<DisplayState>,
    texture_id: u32,
    uv: [f32; 4],
    tint: Color,
}

impl Image {
    /// Creates an image.
    #[must_use]
    pub fn new(config: ImageConfig) -> Self {
        let machine = InteractionMachine::new()
            .with_focusable(false)
            .with_hover_visual(config.hover_visual);
        Self {
            core: WidgetCore::new(WidgetKind::Image, machine),
            texture_id: config.texture_id,
            uv: config.uv,
            tint: config.tint,
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

    /// Returns the texture id.
    #[must_use]
    pub fn texture_id(&self) -> u32 {
        self.texture_id
    }

    /// Switches texture and UV rectangle.
    pub fn set_texture(&mut self, texture_id: u32, uv: [f32; 4]) {
        self.texture_id = texture_id;
        self.uv = uv;
    }

    /// Sets the tint.
    pub fn set_tint(&mut self, tint: Color) {
        self.tint = tint;
    }

    fn display_tint(&self) -> Color {
        match self.core.level() {
            Level::Disabled => self.tint.with_alpha(self.tint.a * 0.4),
            Level::Hovered => self.tint.lerp(Color::WHITE, 0.2),
            _ => self.tint,
        }
    }
}

impl Widget for Image {
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

    fn render(&self, _theme: &Theme, commands: &mut Vec<RenderCommand>) {
        commands.push(RenderCommand::Texture {
            bounds: self.core.state.bounds(),
            texture_id: self.texture_id,
            uv: self.uv,
            color: self.display_tint(),
        });
    }

    fn on_add(&mut self, settings: &InteractionSettings) {
        self.core.apply_settings(settings);
    }
}
