//! Configuration system

pub use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_str_with_format(&contents, path)
    }

    /// Parse configuration text, picking the format from `path`'s extension
    fn from_str_with_format(contents: &str, path: &str) -> Result<Self, ConfigError> {
        if path.ends_with(".toml") {
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Defaults applied to newly created character colliders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Gravity scalar carried by the component. The sweep itself consumes a
    /// velocity that already includes gravity.
    pub gravity: f32,
    /// Ellipsoid radii
    pub radius: Vec3,
    /// Group names the character collides with (empty = every group)
    pub include: Vec<String>,
    /// Group names the character never collides with
    pub exclude: Vec<String>,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            radius: Vec3::new(0.5, 1.0, 0.5),
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

/// Collision settings for a scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Collision group names, registered in this order
    pub groups: Vec<String>,
    /// Character collider defaults
    pub character: CharacterConfig,
}

impl Config for CollisionConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_config_from_toml() {
        let text = r#"
            groups = ["world", "props", "triggers"]

            [character]
            gravity = 20.0
            radius = [0.4, 0.9, 0.4]
            exclude = ["triggers"]
        "#;

        let config = CollisionConfig::from_str_with_format(text, "scene.toml").unwrap();

        assert_eq!(config.groups, vec!["world", "props", "triggers"]);
        assert_eq!(config.character.gravity, 20.0);
        assert_eq!(config.character.radius, Vec3::new(0.4, 0.9, 0.4));
        assert!(config.character.include.is_empty());
        assert_eq!(config.character.exclude, vec!["triggers"]);
    }

    #[test]
    fn test_collision_config_from_ron_uses_defaults() {
        let config = CollisionConfig::from_str_with_format("(groups: [\"world\"])", "scene.ron").unwrap();
        assert_eq!(config.groups, vec!["world"]);
        assert_eq!(config.character, CharacterConfig::default());
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let result = CollisionConfig::from_str_with_format("{}", "scene.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let path = std::env::temp_dir().join(format!("scene_engine_config_{}.ron", std::process::id()));
        let path = path.to_string_lossy().to_string();

        let mut config = CollisionConfig::default();
        config.groups.push("world".to_string());
        config.save_to_file(&path).unwrap();

        let loaded = CollisionConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }
}
