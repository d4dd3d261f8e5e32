use ember_physics::PhysicsConfig;
use ember_render::{CameraConfig, RendererConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Engine settings, read from YAML at startup. Missing keys take defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub renderer: RendererConfig,
    pub camera: CameraConfig,
    pub physics: PhysicsConfig,
}

impl EngineConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = EngineConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.renderer.fov_degrees, 45.0);
        assert_eq!(config.physics.gravity, [0.0, -0.25, 0.0]);
    }

    #[test]
    fn partial_sections_override_only_named_keys() {
        let config = EngineConfig::from_yaml_str(
            "renderer:\n  uniform_slots: 8\nphysics:\n  enabled: false\n",
        )
        .unwrap();
        assert_eq!(config.renderer.uniform_slots, 8);
        assert_eq!(config.renderer.far, 1000.0);
        assert!(!config.physics.enabled);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn load_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.yaml");
        let mut config = EngineConfig::default();
        config.camera.position = [1.0, 2.0, 3.0];
        std::fs::write(&path, config.to_yaml().unwrap()).unwrap();
        assert_eq!(EngineConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            EngineConfig::load(dir.path().join("absent.yaml")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn malformed_yaml_is_yaml_error() {
        assert!(matches!(
            EngineConfig::from_yaml_str("renderer: [1, 2"),
            Err(ConfigError::Yaml(_))
        ));
    }
}
