//! Themes and per-state colors.
//!
//! Widgets never store colors. They resolve their interaction level and ask
//! the active [`Theme`] for the matching fill, text and border colors.

use lumen_core::Level;
use serde::Deserialize;

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Color {
    /// Red component (0-1).
    pub r: f32,
    /// Green component (0-1).
    pub g: f32,
    /// Blue component (0-1).
    pub b: f32,
    /// Alpha component (0-1).
    #[serde(default = "opaque")]
    pub a: f32,
}

const fn opaque() -> f32 {
    1.0
}

impl Color {
    /// Transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Solid black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Solid white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from RGBA values (0-1).
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from RGB values (0-1) with full alpha.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Creates a color from hex value (0xRRGGBBAA).
    #[must_use]
    pub const fn hex(hex: u32) -> Self {
        let r = ((hex >> 24) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let b = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let a = (hex & 0xFF) as f32 / 255.0;
        Self::rgba(r, g, b, a)
    }

    /// Returns a new color with different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Linearly interpolates between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::rgba(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Converts to array format.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Shared widget metrics.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Border width.
    pub border_width: f32,
    /// Width of the focus ring drawn around the focused widget.
    pub focus_ring_width: f32,
    /// Corner radius.
    pub corner_radius: f32,
    /// Inner padding.
    pub padding: f32,
    /// Font size.
    pub font_size: f32,
}

impl Style {
    /// Default metrics.
    pub const DEFAULT: Self = Self {
        border_width: 1.0,
        focus_ring_width: 2.0,
        corner_radius: 4.0,
        padding: 6.0,
        font_size: 14.0,
    };
}

impl Default for Style {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Complete color theme.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Root background.
    pub background: Color,
    /// Widget surface at rest.
    pub surface: Color,
    /// Widget surface under the pointer.
    pub surface_hover: Color,
    /// Widget surface while pressed.
    pub surface_pressed: Color,
    /// Widget surface while disabled.
    pub surface_disabled: Color,
    /// Accent for checked, filled and selected parts.
    pub accent: Color,
    /// Primary text.
    pub text: Color,
    /// Placeholder and secondary text.
    pub text_muted: Color,
    /// Text on disabled widgets.
    pub text_disabled: Color,
    /// Widget borders.
    pub border: Color,
    /// Focus ring.
    pub focus_ring: Color,
    /// Metrics.
    pub style: Style,
}

impl Theme {
    /// Dark theme.
    pub const DUSK: Self = Self {
        background: Color::rgba(0.06, 0.06, 0.09, 1.0),
        surface: Color::rgba(0.14, 0.15, 0.20, 1.0),
        surface_hover: Color::rgba(0.20, 0.22, 0.29, 1.0),
        surface_pressed: Color::rgba(0.10, 0.11, 0.15, 1.0),
        surface_disabled: Color::rgba(0.12, 0.12, 0.14, 0.6),
        accent: Color::rgba(0.35, 0.62, 1.0, 1.0),
        text: Color::rgba(0.92, 0.93, 0.96, 1.0),
        text_muted: Color::rgba(0.55, 0.57, 0.64, 1.0),
        text_disabled: Color::rgba(0.40, 0.40, 0.44, 1.0),
        border: Color::rgba(0.28, 0.30, 0.38, 1.0),
        focus_ring: Color::rgba(1.0, 0.78, 0.25, 1.0),
        style: Style::DEFAULT,
    };

    /// Light theme.
    pub const DAYLIGHT: Self = Self {
        background: Color::rgba(0.96, 0.96, 0.97, 1.0),
        surface: Color::rgba(1.0, 1.0, 1.0, 1.0),
        surface_hover: Color::rgba(0.91, 0.93, 0.97, 1.0),
        surface_pressed: Color::rgba(0.82, 0.85, 0.92, 1.0),
        surface_disabled: Color::rgba(0.93, 0.93, 0.93, 0.8),
        accent: Color::rgba(0.10, 0.42, 0.90, 1.0),
        text: Color::rgba(0.10, 0.11, 0.14, 1.0),
        text_muted: Color::rgba(0.45, 0.47, 0.52, 1.0),
        text_disabled: Color::rgba(0.65, 0.65, 0.68, 1.0),
        border: Color::rgba(0.75, 0.77, 0.82, 1.0),
        focus_ring: Color::rgba(0.10, 0.42, 0.90, 1.0),
        style: Style::DEFAULT,
    };

    /// Returns the surface color for an interaction level.
    #[must_use]
    pub const fn fill(&self, level: Level) -> Color {
        match level {
            Level::Disabled => self.surface_disabled,
            Level::Pressed => self.surface_pressed,
            Level::Hovered => self.surface_hover,
            Level::Focused | Level::Idle => self.surface,
        }
    }

    /// Returns the text color for an interaction level.
    #[must_use]
    pub const fn text_for(&self, level: Level) -> Color {
        match level {
            Level::Disabled => self.text_disabled,
            _ => self.text,
        }
    }

    /// Returns the accent color, dimmed when disabled.
    #[must_use]
    pub const fn accent_for(&self, level: Level) -> Color {
        match level {
            Level::Disabled => self.accent.with_alpha(0.4),
            _ => self.accent,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::DUSK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_lerp() {
        let mid = Color::BLACK.lerp(Color::WHITE, 0.5);

        assert!((mid.r - 0.5).abs() < 0.01);
        assert!((mid.g - 0.5).abs() < 0.01);
        assert!((mid.b - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_color_hex() {
        let color = Color::hex(0xFF00_00FF);
        assert!((color.r - 1.0).abs() < 0.01);
        assert!(color.g.abs() < 0.01);
        assert!((color.a - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_fill_follows_level() {
        let theme = Theme::DUSK;
        assert_eq!(theme.fill(Level::Disabled), theme.surface_disabled);
        assert_eq!(theme.fill(Level::Pressed), theme.surface_pressed);
        assert_eq!(theme.fill(Level::Focused), theme.surface);
        assert_eq!(theme.text_for(Level::Disabled), theme.text_disabled);
    }
}
