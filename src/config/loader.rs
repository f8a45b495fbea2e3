use std::path::Path;

use super::{AppConfig, ConfigError};

/// Load and validate configuration from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderMode;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_missing_config() {
        let result = load_config("/nonexistent/glass_rt.yaml");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_config_invalid_yaml() {
        let file = write_temp("render: [width: 3");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_valid() {
        let file = write_temp(
            r#"
render:
  width: 64
  height: 32
  mode: probe
  max_bounces: 5
  focal_length: 1.5

camera:
  origin: [0.0, 0.5, -2.0]
  move_step: 0.1

driver:
  frame_interval_ms: 16
  output_dir: "out"
"#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.render.width, 64);
        assert_eq!(config.render.height, 32);
        assert_eq!(config.render.mode, RenderMode::Probe);
        assert_eq!(config.render.max_bounces, 5);
        assert!((config.render.focal_length - 1.5).abs() < 1e-6);
        assert_eq!(config.camera.origin, [0.0, 0.5, -2.0]);
        assert_eq!(config.driver.frame_interval_ms, 16);
        assert_eq!(config.driver.output_dir, std::path::PathBuf::from("out"));
    }

    #[test]
    fn test_load_config_minimal() {
        let file = write_temp("render:\n  width: 40\n");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.render.width, 40);
        assert_eq!(config.render.height, 72);
        assert_eq!(config.render.max_bounces, crate::MAX_BOUNCES);
    }

    #[test]
    fn test_load_config_runs_validation() {
        let file = write_temp("render:\n  max_bounces: 0\n");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_config_from_file() {
        let result = AppConfig::from_file("/nonexistent/path.yaml");
        assert!(result.is_err());
    }
}
