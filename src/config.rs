use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CanvasResult;

/// Environment variable naming an optional JSON config file
pub const CONFIG_ENV_VAR: &str = "SKETCH_CONFIG";

/// Startup configuration. Every field has a default, so a config file only
/// needs to list what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Maximum number of undo snapshots kept
    pub history_depth: usize,
    /// Optional cap on the total encoded size of the undo stack, in bytes
    pub history_byte_budget: Option<usize>,
    /// Spacing of the alignment grid in logical pixels
    pub grid_step: f32,
    /// Quality factor used for JPEG export (1-100)
    pub jpeg_quality: u8,
    /// Offset of the floating text editor from its anchor
    pub text_overlay_margin: f32,
    pub pen_color: String,
    pub background_color: String,
    pub brush_width: f32,
    pub font_size: f32,
    /// Logical canvas size used until the first layout pass
    pub canvas_size: [f32; 2],
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            history_depth: crate::history::DEFAULT_HISTORY_DEPTH,
            history_byte_budget: None,
            grid_step: 25.0,
            jpeg_quality: 95,
            text_overlay_margin: 12.0,
            pen_color: "#000000".to_owned(),
            background_color: "#ffffff".to_owned(),
            brush_width: 4.0,
            font_size: 24.0,
            canvas_size: [960.0, 640.0],
        }
    }
}

impl SketchConfig {
    /// Parse a config from JSON text
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        // Surface bad colors at load time rather than on first use
        crate::style::StyleState::from_config(&config)?;
        Ok(config)
    }

    /// Read a config file from disk
    pub fn load(path: &Path) -> CanvasResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load the file named by `SKETCH_CONFIG`, falling back to defaults when
    /// the variable is unset or the file cannot be used.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        let path = Path::new(&path);
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(err) => {
                log::error!("Ignoring config {}: {}", path.display(), err);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = SketchConfig::from_json(r##"{ "history_depth": 10, "pen_color": "#ff0000" }"##)
            .unwrap();
        assert_eq!(config.history_depth, 10);
        assert_eq!(config.pen_color, "#ff0000");
        assert_eq!(config.grid_step, 25.0);
        assert_eq!(config.jpeg_quality, 95);
    }

    #[test]
    fn test_bad_color_is_rejected() {
        let result = SketchConfig::from_json(r#"{ "background_color": "white" }"#);
        assert!(matches!(result, Err(crate::CanvasError::InvalidColor(_))));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(
            SketchConfig::from_json("{ history_depth: "),
            Err(crate::CanvasError::ConfigParse(_))
        ));
    }
}
