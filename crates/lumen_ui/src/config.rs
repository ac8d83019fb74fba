//! # UI Configuration
//!
//! One TOML file configures a UI root: the theme, the interaction timings
//! and the default tab header geometry.
//!
//! ```toml
//! preset = "daylight"
//!
//! [interaction]
//! unhover_debounce_ms = 50
//!
//! [tabs]
//! edge = "left"
//! spacing = 4.0
//! header_width = 120.0
//! header_height = 28.0
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{UiError, UiResult};
use crate::style::Theme;
use crate::tabs::TabEdge;

/// Built-in theme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreset {
    /// [`Theme::DUSK`].
    #[default]
    Dusk,
    /// [`Theme::DAYLIGHT`].
    Daylight,
}

/// Interaction timings applied to every widget added to a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Window after a pointer-up during which a pointer-leave is deferred.
    pub unhover_debounce_ms: u32,
}

impl InteractionSettings {
    /// Returns the debounce window in seconds.
    #[must_use]
    pub fn unhover_debounce_secs(&self) -> f32 {
        self.unhover_debounce_ms as f32 / 1000.0
    }
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            unhover_debounce_ms: 50,
        }
    }
}

/// Default tab header geometry.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TabSettings {
    /// Edge the headers are attached to.
    pub edge: TabEdge,
    /// Gap between consecutive headers.
    pub spacing: f32,
    /// Header width.
    pub header_width: f32,
    /// Header height.
    pub header_height: f32,
}

impl Default for TabSettings {
    fn default() -> Self {
        Self {
            edge: TabEdge::Top,
            spacing: 2.0,
            header_width: 96.0,
            header_height: 28.0,
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Built-in theme used when no explicit theme table is given.
    pub preset: ThemePreset,
    /// Explicit theme; missing colors fall back to [`Theme::DUSK`].
    pub theme: Option<Theme>,
    /// Interaction timings.
    pub interaction: InteractionSettings,
    /// Tab header geometry.
    pub tabs: TabSettings,
}

impl UiConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::Parse`] for malformed TOML and
    /// [`UiError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> UiResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::Io`] if the file cannot be read, otherwise the
    /// errors of [`UiConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> UiResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| UiError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!("loaded UI config from {}", path.display());
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> UiResult<()> {
        let tabs = &self.tabs;
        if !(tabs.spacing >= 0.0 && tabs.spacing.is_finite()) {
            return Err(UiError::InvalidConfig(format!(
                "tabs.spacing must be a non-negative number, got {}",
                tabs.spacing
            )));
        }
        if !(tabs.header_width > 0.0 && tabs.header_height > 0.0) {
            return Err(UiError::InvalidConfig(format!(
                "tab headers need a positive size, got {}x{}",
                tabs.header_width, tabs.header_height
            )));
        }
        if self.interaction.unhover_debounce_ms > 1000 {
            return Err(UiError::InvalidConfig(format!(
                "interaction.unhover_debounce_ms must be at most 1000, got {}",
                self.interaction.unhover_debounce_ms
            )));
        }
        Ok(())
    }

    /// Returns the theme in effect.
    #[must_use]
    pub fn theme(&self) -> Theme {
        match (&self.theme, self.preset) {
            (Some(theme), _) => theme.clone(),
            (None, ThemePreset::Dusk) => Theme::DUSK,
            (None, ThemePreset::Daylight) => Theme::DAYLIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = UiConfig::from_toml_str("").unwrap();
        assert_eq!(config, UiConfig::default());
        assert_eq!(config.theme(), Theme::DUSK);
        assert!((config.interaction.unhover_debounce_secs() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_preset_and_tabs() {
        let config = UiConfig::from_toml_str(
            r#"
            preset = "daylight"

            [tabs]
            edge = "left"
            spacing = 6.0
            "#,
        )
        .unwrap();

        assert_eq!(config.theme(), Theme::DAYLIGHT);
        assert_eq!(config.tabs.edge, TabEdge::Left);
        assert!((config.tabs.spacing - 6.0).abs() < f32::EPSILON);
        assert!((config.tabs.header_height - 28.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_explicit_theme_overrides_preset() {
        let config = UiConfig::from_toml_str(
            r"
            preset = 'daylight'

            [theme.accent]
            r = 1.0
            g = 0.0
            b = 0.0
            ",
        )
        .unwrap();

        let theme = config.theme();
        assert_eq!(theme.accent.r, 1.0);
        assert_eq!(theme.accent.a, 1.0);
        assert_eq!(theme.surface, Theme::DUSK.surface);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = UiConfig::from_toml_str("[tabs]\nspacing = -1.0").unwrap_err();
        assert!(matches!(err, UiError::InvalidConfig(_)));

        let err = UiConfig::from_toml_str("preset = 'neon'").unwrap_err();
        assert!(matches!(err, UiError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = UiConfig::load("/nonexistent/lumen.toml").unwrap_err();
        assert!(matches!(err, UiError::Io { .. }));
    }
}
