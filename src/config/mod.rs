mod loader;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::camera::{Eye, DEFAULT_FOCAL_LENGTH};
use crate::math::Point3;
use crate::{BOUNCE_LIMIT, MAX_BOUNCES};

pub use loader::load_config;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub driver: DriverConfig,
}

/// What each pixel computes
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Refractive sphere tracer
    #[default]
    Glass,
    /// Single plane hit mask pulsing with the frame clock
    Probe,
}

/// Framebuffer and kernel settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RenderConfig {
    /// Batch render width in pixels (interactive mode follows the terminal)
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default)]
    pub mode: RenderMode,
    #[serde(default = "default_max_bounces")]
    pub max_bounces: u32,
    #[serde(default = "default_focal_length")]
    pub focal_length: f32,
}

fn default_width() -> usize {
    120
}

fn default_height() -> usize {
    72
}

fn default_max_bounces() -> u32 {
    MAX_BOUNCES
}

fn default_focal_length() -> f32 {
    DEFAULT_FOCAL_LENGTH
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            mode: RenderMode::default(),
            max_bounces: default_max_bounces(),
            focal_length: default_focal_length(),
        }
    }
}

/// Initial eye pose and keyboard movement
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CameraConfig {
    #[serde(default)]
    pub origin: [f32; 3],
    /// World units moved per frame while a key is held
    #[serde(default = "default_move_step")]
    pub move_step: f32,
}

fn default_move_step() -> f32 {
    0.2
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            origin: [0.0; 3],
            move_step: default_move_step(),
        }
    }
}

impl CameraConfig {
    pub fn eye(&self) -> Eye {
        let [x, y, z] = self.origin;
        Eye::at(Point3::new(x, y, z))
    }
}

/// Frame pacing and batch output
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DriverConfig {
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: u64,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_frame_interval() -> u64 {
    100
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("frames")
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval(),
            output_dir: default_output_dir(),
        }
    }
}

/// Files tried, in order, when no path is given
pub const DEFAULT_CONFIG_PATHS: [&str; 3] = ["glass_rt.yaml", "glass_rt.yml", "./config/glass_rt.yaml"];

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        load_config(path)
    }

    /// Load an explicit file, or the first default path that exists, or the built-in defaults
    pub fn load_or_default(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        match config_path {
            Some(path) => Self::from_file(path),
            None => {
                for p in DEFAULT_CONFIG_PATHS {
                    let path = Path::new(p);
                    if path.exists() {
                        return Self::from_file(path);
                    }
                }
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let render = &self.render;
        if render.width == 0 || render.height == 0 {
            return Err(ConfigError::Validation(format!(
                "render size must be non-zero, got {}x{}",
                render.width, render.height
            )));
        }
        if !(1..=BOUNCE_LIMIT).contains(&render.max_bounces) {
            return Err(ConfigError::Validation(format!(
                "max_bounces must be between 1 and {}, got {}",
                BOUNCE_LIMIT, render.max_bounces
            )));
        }
        if !(render.focal_length.is_finite() && render.focal_length > 0.0) {
            return Err(ConfigError::Validation(format!(
                "focal_length must be positive, got {}",
                render.focal_length
            )));
        }
        if !self.camera.origin.iter().all(|c| c.is_finite()) {
            return Err(ConfigError::Validation("camera origin must be finite".to_string()));
        }
        if !(self.camera.move_step.is_finite() && self.camera.move_step >= 0.0) {
            return Err(ConfigError::Validation(format!(
                "move_step must be non-negative, got {}",
                self.camera.move_step
            )));
        }
        if self.driver.frame_interval_ms == 0 {
            return Err(ConfigError::Validation("frame_interval_ms must be non-zero".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.render.max_bounces, MAX_BOUNCES);
        assert_eq!(config.render.mode, RenderMode::Glass);
        assert_eq!(config.camera.eye(), Eye::default());
    }

    #[test]
    fn test_validate_rejects_zero_size() {
        let mut config = AppConfig::default();
        config.render.width = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_bounce_range() {
        let mut config = AppConfig::default();
        config.render.max_bounces = 0;
        assert!(config.validate().is_err());
        config.render.max_bounces = BOUNCE_LIMIT + 1;
        assert!(config.validate().is_err());
        config.render.max_bounces = BOUNCE_LIMIT;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_focal_length() {
        let mut config = AppConfig::default();
        config.render.focal_length = 0.0;
        assert!(config.validate().is_err());
        config.render.focal_length = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = AppConfig::default();
        config.driver.frame_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_camera_eye_from_origin() {
        let camera = CameraConfig { origin: [0.0, 1.0, 5.0], move_step: 0.1 };
        assert_eq!(camera.eye().origin, Point3::new(0.0, 1.0, 5.0));
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let result = AppConfig::load_or_default(Some(Path::new("/nonexistent/glass_rt.yaml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_render_mode_serde() {
        let mode: RenderMode = serde_yaml::from_str("probe").unwrap();
        assert_eq!(mode, RenderMode::Probe);
        assert_eq!(serde_yaml::to_string(&RenderMode::Glass).unwrap().trim(), "glass");
    }
}
