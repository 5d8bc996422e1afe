use crate::sketch::raster::Rgba;
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_pen_color() -> String {
    "#1e293b".to_string()
}

fn default_background_color() -> String {
    "#ffffff".to_string()
}

fn default_line_width() -> u32 {
    3
}

fn default_history_limit() -> usize {
    10
}

fn default_toasts() -> bool {
    true
}

fn default_toast_duration() -> f32 {
    3.5
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    /// Base URL of the hosted model API.
    #[serde(default = "default_endpoint")]
    pub api_endpoint: String,
    /// API key. When absent the `GEMINI_API_KEY` environment variable is
    /// consulted instead.
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    /// Solve requests are abandoned after this many seconds.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Pen color as a `#rrggbb` hex string.
    #[serde(default = "default_pen_color")]
    pub pen_color: String,
    /// Canvas background (and eraser) color as a `#rrggbb` hex string.
    #[serde(default = "default_background_color")]
    pub background_color: String,
    /// Initial stroke width; adjustable from the toolbar within 1..=10.
    #[serde(default = "default_line_width")]
    pub line_width: u32,
    /// Maximum number of past solutions kept in the history list.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Enable toast notifications in the UI.
    #[serde(default = "default_toasts")]
    pub enable_toasts: bool,
    /// Duration of toast notifications in seconds.
    #[serde(default = "default_toast_duration")]
    pub toast_duration: f32,
    /// Last known window size. If absent, a default size is used.
    #[serde(default)]
    pub window_size: Option<(f32, f32)>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            request_timeout_secs: default_timeout_secs(),
            pen_color: default_pen_color(),
            background_color: default_background_color(),
            line_width: default_line_width(),
            history_limit: default_history_limit(),
            debug_logging: false,
            enable_toasts: default_toasts(),
            toast_duration: default_toast_duration(),
            window_size: None,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok().filter(|key| !key.is_empty()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn pen_rgba(&self) -> Rgba {
        parse_color_or(&self.pen_color, Rgba::INK)
    }

    pub fn background_rgba(&self) -> Rgba {
        parse_color_or(&self.background_color, Rgba::WHITE)
    }
}

fn parse_color_or(hex: &str, fallback: Rgba) -> Rgba {
    match Rgba::from_hex(hex) {
        Some(color) => color,
        None => {
            tracing::warn!("invalid color '{}' in settings; using the default", hex);
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_settings_parse_to_defaults() {
        let settings: Settings = serde_json::from_str("{}").expect("settings");
        assert_eq!(settings.history_limit, 10);
        assert_eq!(settings.line_width, 3);
        assert_eq!(settings.request_timeout_secs, 30);
        assert_eq!(settings.pen_rgba(), Rgba::INK);
        assert_eq!(settings.background_rgba(), Rgba::WHITE);
    }

    #[test]
    fn invalid_colors_fall_back_to_defaults() {
        let settings: Settings =
            serde_json::from_str(r##"{"pen_color": "blue", "background_color": "#xyzxyz"}"##)
                .expect("settings");
        assert_eq!(settings.pen_rgba(), Rgba::INK);
        assert_eq!(settings.background_rgba(), Rgba::WHITE);
    }

    #[test]
    fn settings_round_trip_through_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        let path = path.to_str().expect("utf-8 path");

        let mut settings = Settings::default();
        settings.history_limit = 4;
        settings.pen_color = "#ff0000".into();
        settings.save(path).expect("save");

        let loaded = Settings::load(path).expect("load");
        assert_eq!(loaded.history_limit, 4);
        assert_eq!(loaded.pen_rgba(), Rgba::rgb(255, 0, 0));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let settings = Settings::load("does_not_exist.json").expect("defaults");
        assert_eq!(settings.model, default_model());
    }
}
