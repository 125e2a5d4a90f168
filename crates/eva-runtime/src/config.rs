//! Runtime Configuration

use serde::Deserialize;

use crate::RuntimeError;

/// Runtime configuration options
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Locale active before the application picks one
    pub default_locale: String,

    /// Delay before a hovered menubar menu opens (ms)
    pub hover_open_delay_ms: u64,

    /// Quiet window before a live region publishes its last message (ms)
    pub announce_debounce_ms: u64,

    /// Carousel auto-advance period when `interval` is absent (ms)
    pub carousel_interval_ms: u64,

    /// Gap between a popup and its anchor (px)
    pub popup_offset: f64,

    /// Popup width used until layout reports a real size (px)
    pub popup_min_width: f64,

    /// Per-item popup height used until layout reports a real size (px)
    pub popup_item_height: f64,

    /// Initial viewport size (px)
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            hover_open_delay_ms: 150,
            announce_debounce_ms: 300,
            carousel_interval_ms: 5000,
            popup_offset: 4.0,
            popup_min_width: 160.0,
            popup_item_height: 32.0,
            viewport_width: 1280.0,
            viewport_height: 800.0,
        }
    }
}

impl Config {
    /// Parse a JSON config; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, RuntimeError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json() {
        let config = Config::from_json(r#"{"default_locale": "fr", "hover_open_delay_ms": 50}"#).unwrap();
        assert_eq!(config.default_locale, "fr");
        assert_eq!(config.hover_open_delay_ms, 50);
        assert_eq!(config.announce_debounce_ms, Config::default().announce_debounce_ms);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(Config::from_json("[1, 2]"), Err(RuntimeError::Config(_))));
    }
}
