//! Tour options and their defaults.

use serde::Deserialize;

use crate::error::Result;
use crate::geometry::Size;
use crate::model::Step;

pub const DEFAULT_FILL_COLOR: &str = "#000000";
pub const DEFAULT_FILL_OPACITY: f64 = 0.25;
pub const DEFAULT_NEXT_LABEL: &str = "Next";
pub const DEFAULT_ANIMATION_DURATION_MS: u64 = 200;
pub const DEFAULT_WINDOW_WIDTH: f64 = 400.0;
pub const DEFAULT_ARROW_SIZE: Size = Size::new(48.0, 48.0);
pub const DEFAULT_RESIZE_QUIET_MS: u64 = 150;

/// Caller-facing options. Per-step overrides on [`Step`] win over these.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TourOptions {
    pub fill_color: String,
    pub fill_opacity: f64,
    pub next_label: String,
    pub window_class_name: Option<String>,
    pub animation_duration_ms: u64,
    pub window_width: f64,
    pub arrow_size: Size,
    pub resize_quiet_ms: u64,
    pub steps: Vec<Step>,
}

impl Default for TourOptions {
    fn default() -> Self {
        Self {
            fill_color: DEFAULT_FILL_COLOR.to_string(),
            fill_opacity: DEFAULT_FILL_OPACITY,
            next_label: DEFAULT_NEXT_LABEL.to_string(),
            window_class_name: None,
            animation_duration_ms: DEFAULT_ANIMATION_DURATION_MS,
            window_width: DEFAULT_WINDOW_WIDTH,
            arrow_size: DEFAULT_ARROW_SIZE,
            resize_quiet_ms: DEFAULT_RESIZE_QUIET_MS,
            steps: Vec::new(),
        }
    }
}

impl TourOptions {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_constants() {
        let options = TourOptions::default();
        assert_eq!(options.fill_color, "#000000");
        assert_eq!(options.fill_opacity, 0.25);
        assert_eq!(options.window_width, 400.0);
        assert_eq!(options.next_label, "Next");
    }

    #[test]
    fn options_parse_from_json_with_partial_fields() {
        let options = TourOptions::from_json(
            r##"{
                "fill_opacity": 0.5,
                "steps": [
                    {"selector": ".menu", "title": "Menu", "body": "Open here."},
                    {"title": "Done"}
                ]
            }"##,
        )
        .unwrap();
        assert_eq!(options.fill_opacity, 0.5);
        assert_eq!(options.fill_color, "#000000");
        assert_eq!(options.steps.len(), 2);
        assert_eq!(options.steps[0].selector.as_deref(), Some(".menu"));
        assert_eq!(options.steps[1].selector, None);
    }

    #[test]
    fn malformed_json_surfaces_a_config_error() {
        let err = TourOptions::from_json("{nope").unwrap_err();
        assert!(matches!(err, crate::error::TourError::Config(_)));
    }
}
