//! Viewer configuration
//!
//! Every field has a compiled-in default matching the shipped page layout, so
//! an override file only needs the values it changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub host: HostConfig,
    #[serde(default)]
    pub asset: AssetConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub lighting: LightingConfig,
}

/// Host page element ids
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Render container element
    pub container_id: String,
    /// Canvas created inside the container
    pub canvas_id: String,
    pub title_id: String,
    pub description_id: String,
    /// Max log level: trace, debug, info, warn, error
    pub log_level: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            container_id: "boat-3d".to_string(),
            canvas_id: "boat-3d-canvas".to_string(),
            title_id: "boat-part-title".to_string(),
            description_id: "boat-part-description".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Model path relative to the page
    pub path: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            path: "models/boat.glb".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Camera position before the asset is framed
    pub initial_position: [f32; 3],
    /// Margin multiplier applied to the fit distance
    pub fit_padding: f32,
    /// Vertical share of the fit offset
    pub fit_elevation: f32,
    /// Orbit inertia; fraction of the pending motion applied per update
    pub damping_factor: f32,
    /// Duration of the part focus transition
    pub transition_secs: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
            initial_position: [6.0, 3.0, 8.0],
            fit_padding: 1.3,
            fit_elevation: 0.3,
            damping_factor: 0.05,
            transition_secs: 1.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub background: String,
    /// Emissive color of the selected part
    pub highlight: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            background: "#f3f4f6".to_string(),
            highlight: "#ffa500".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub sky_color: String,
    pub ground_color: String,
    pub fill_intensity: f32,
    pub fill_position: [f32; 3],
    pub sun_color: String,
    pub sun_intensity: f32,
    pub sun_position: [f32; 3],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            sky_color: "#ffffff".to_string(),
            ground_color: "#444444".to_string(),
            fill_intensity: 0.9,
            fill_position: [0.0, 20.0, 0.0],
            sun_color: "#ffffff".to_string(),
            sun_intensity: 0.8,
            sun_position: [5.0, 10.0, 7.0],
        }
    }
}

impl ViewerConfig {
    /// Parse and validate configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the viewer can't render with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;

        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(invalid("camera.fov_degrees", "must be in (0, 180)"));
        }
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(invalid("camera.near", "need 0 < near < far"));
        }
        if !(camera.damping_factor > 0.0 && camera.damping_factor <= 1.0) {
            return Err(invalid("camera.damping_factor", "must be in (0, 1]"));
        }
        if !(camera.fit_padding > 0.0) {
            return Err(invalid("camera.fit_padding", "must be positive"));
        }
        if !(camera.transition_secs > 0.0) {
            return Err(invalid("camera.transition_secs", "must be positive"));
        }
        if self.asset.path.trim().is_empty() {
            return Err(invalid("asset.path", "must not be empty"));
        }

        for color in [
            &self.scene.background,
            &self.scene.highlight,
            &self.lighting.sky_color,
            &self.lighting.ground_color,
            &self.lighting.sun_color,
        ] {
            parse_hex_color(color)?;
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}

/// Parse `#rrggbb` (or `rrggbb`) into sRGB components in 0.0-1.0
pub fn parse_hex_color(s: &str) -> Result<[f32; 3], ConfigError> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(ConfigError::InvalidColor(s.to_string()));
    }

    let mut rgb = [0.0; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        let byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
            .map_err(|_| ConfigError::InvalidColor(s.to_string()))?;
        *channel = byte as f32 / 255.0;
    }
    Ok(rgb)
}
