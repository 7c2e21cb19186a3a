//! Quill Sign configuration system
//!
//! Loads settings from `quill.toml` as an alternative to environment
//! variables; env vars take precedence for temporary overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Quill Sign
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct QuillConfig {
    /// Stroke appearance settings
    pub stroke: StrokeSection,
    /// Gesture recognition settings
    pub gesture: GestureSection,
}

/// Stroke appearance configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeSection {
    /// Stroke color as `#rrggbb` or `#rrggbbaa` (sRGB)
    pub color: Option<String>,
    /// Minimum stroke width (full thickness, logical px)
    pub width_min: Option<f32>,
    /// Maximum stroke width (full thickness, logical px)
    pub width_max: Option<f32>,
}

/// Gesture recognition configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureSection {
    /// Distance (logical px) the pointer must travel before a stroke starts
    pub distance_to_recognize: Option<f32>,
    /// Erase the signature when a long press is recognized
    pub erase_on_long_press: bool,
}

impl Default for StrokeSection {
    fn default() -> Self {
        Self {
            color: None,
            width_min: None,
            width_max: None,
        }
    }
}

impl Default for GestureSection {
    fn default() -> Self {
        Self {
            distance_to_recognize: None,
            erase_on_long_press: false,
        }
    }
}

impl QuillConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Load configuration from `quill.toml` in the current directory, or
    /// return default configuration if the file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file("quill.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        if let Ok(color) = std::env::var("QUILL_STROKE_COLOR") {
            self.stroke.color = Some(color);
        }
        if let Ok(val) = std::env::var("QUILL_STROKE_WIDTH_MIN") {
            if let Ok(w) = val.parse::<f32>() {
                self.stroke.width_min = Some(w);
            }
        }
        if let Ok(val) = std::env::var("QUILL_STROKE_WIDTH_MAX") {
            if let Ok(w) = val.parse::<f32>() {
                self.stroke.width_max = Some(w);
            }
        }
        if let Ok(val) = std::env::var("QUILL_DISTANCE_TO_RECOGNIZE") {
            if let Ok(d) = val.parse::<f32>() {
                self.gesture.distance_to_recognize = Some(d);
            }
        }
        if let Ok(val) = std::env::var("QUILL_ERASE_ON_LONG_PRESS") {
            self.gesture.erase_on_long_press = val == "1" || val.eq_ignore_ascii_case("true");
        }
    }

    /// Load configuration with environment variable overrides:
    /// 1. Load from quill.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QuillConfig::default();
        assert!(config.stroke.color.is_none());
        assert!(!config.gesture.erase_on_long_press);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = QuillConfig::default();
        config.stroke.color = Some("#102030".into());
        config.stroke.width_max = Some(8.0);
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: QuillConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.stroke.color.as_deref(), Some("#102030"));
        assert_eq!(parsed.stroke.width_max, Some(8.0));
    }

    #[test]
    fn test_parse_partial_toml() {
        let parsed: QuillConfig = toml::from_str(
            r#"
            [gesture]
            distance_to_recognize = 12.5
            erase_on_long_press = true
            "#,
        )
        .unwrap();
        assert_eq!(parsed.gesture.distance_to_recognize, Some(12.5));
        assert!(parsed.gesture.erase_on_long_press);
        assert!(parsed.stroke.width_min.is_none());
    }

    #[test]
    fn test_load_or_default() {
        // Should not panic even if quill.toml doesn't exist
        let config = QuillConfig::load_or_default();
        assert!(config.stroke.width_min.is_none());
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("QUILL_STROKE_COLOR", "#ff00ff");
            std::env::set_var("QUILL_ERASE_ON_LONG_PRESS", "true");
        }

        let mut config = QuillConfig::default();
        config.merge_with_env();

        assert_eq!(config.stroke.color.as_deref(), Some("#ff00ff"));
        assert!(config.gesture.erase_on_long_press);

        unsafe {
            std::env::remove_var("QUILL_STROKE_COLOR");
            std::env::remove_var("QUILL_ERASE_ON_LONG_PRESS");
        }
    }
}
