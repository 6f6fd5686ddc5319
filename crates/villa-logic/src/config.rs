//! Viewer configuration.
//!
//! Every section and field is `#[serde(default)]`: an empty JSON object is a
//! complete config, and a partial file only overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::camera::RigSettings;
use crate::constants::DEFAULT_EXPLODE_SLIDER;
use crate::error::ConfigError;
use crate::view::{ViewFilter, ViewMode, ViewState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Villa Viewer".into(),
            width: 1280.0,
            height: 800.0,
        }
    }
}

/// Initial UI state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewDefaults {
    pub mode: ViewMode,
    pub view: ViewFilter,
    /// Explode slider position, 0–100.
    pub explode: f32,
    pub show_walls: bool,
    pub show_ceiling: bool,
    pub show_labels: bool,
}

impl Default for ViewDefaults {
    fn default() -> Self {
        Self {
            mode: ViewMode::Stack,
            view: ViewFilter::All,
            explode: DEFAULT_EXPLODE_SLIDER,
            show_walls: true,
            show_ceiling: false,
            show_labels: true,
        }
    }
}

impl ViewDefaults {
    pub fn to_view_state(&self) -> ViewState {
        let mut view = ViewState {
            mode: self.mode,
            filter: self.view,
            show_walls: self.show_walls,
            show_ceiling: self.show_ceiling,
            show_labels: self.show_labels,
            ..ViewState::default()
        };
        view.set_explode_slider(self.explode);
        view
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweenSettings {
    /// Seconds for the room-focus transition.
    pub focus_seconds: f32,
}

impl Default for TweenSettings {
    fn default() -> Self {
        Self {
            focus_seconds: 0.65,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowSettings,
    pub rig: RigSettings,
    pub view: ViewDefaults,
    pub tween: TweenSettings,
}

impl ViewerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::info!("Loaded viewer config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let rig = &self.rig;
        if !(rig.min_radius > 0.0 && rig.min_radius <= rig.max_radius) {
            return Err(ConfigError::InvalidValue {
                field: "rig.min_radius",
                value: format!("{}..{}", rig.min_radius, rig.max_radius),
            });
        }
        if !(0.0..1.0).contains(&rig.damping) {
            return Err(ConfigError::InvalidValue {
                field: "rig.damping",
                value: rig.damping.to_string(),
            });
        }
        if !(rig.fov_degrees > 0.0 && rig.fov_degrees < 180.0) {
            return Err(ConfigError::InvalidValue {
                field: "rig.fov_degrees",
                value: rig.fov_degrees.to_string(),
            });
        }
        if !(rig.pan_radius_divisor > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "rig.pan_radius_divisor",
                value: rig.pan_radius_divisor.to_string(),
            });
        }
        if !(self.tween.focus_seconds >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "tween.focus_seconds",
                value: self.tween.focus_seconds.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_all_defaults() {
        let c = ViewerConfig::from_json_str("{}").unwrap();
        assert_eq!(c, ViewerConfig::default());
        let v = c.view.to_view_state();
        assert_eq!(v, ViewState::default());
    }

    #[test]
    fn partial_override() {
        let c = ViewerConfig::from_json_str(
            r#"{ "rig": { "damping": 0.2 }, "view": { "mode": "interior", "view": "floor3", "explode": 0 } }"#,
        )
        .unwrap();
        assert!((c.rig.damping - 0.2).abs() < 1e-6);
        assert_eq!(c.rig.max_radius, 900.0);
        let v = c.view.to_view_state();
        assert_eq!(v.mode, ViewMode::Interior);
        assert_eq!(v.filter, ViewFilter::Floor(2));
        assert_eq!(v.explode_amount, 0.0);
        assert!(v.show_walls);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{ "rig": { "min_radius": 1000 } }"#),
            Err(ConfigError::InvalidValue { field: "rig.min_radius", .. })
        ));
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{ "rig": { "damping": 1.5 } }"#),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{ "view": { "view": "attic" } }"#),
            Err(ConfigError::Json(_))
        ));
    }
}
