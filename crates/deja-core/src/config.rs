use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{DejaError, Result};

/// Top-level configuration for the deja application.
///
/// Loaded from `~/.deja/config.toml` by default. Each section corresponds
/// to one collaborator of the answer workflow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DejaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl DejaConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: DejaConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| DejaError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory for the SQLite database.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.deja/data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Language model service settings.
///
/// The API key itself is never written to disk; only the name of the
/// environment variable that holds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Model identifier sent to the service.
    pub model: String,
    /// Base URL of the generative language endpoint.
    pub endpoint: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GEMINI_API_KEY".to_string(),
            model: "gemini-2.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

/// Retrieval heuristic settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Minimum noun-overlap ratio for a stored record to count as a match.
    pub overlap_threshold: f64,
    /// Minimum token length (in characters) kept by the noun extractor.
    pub min_token_chars: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            overlap_threshold: 0.8,
            min_token_chars: 2,
        }
    }
}

/// Storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Maximum answer length (in characters) the store accepts.
    pub answer_capacity: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            answer_capacity: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = DejaConfig::default();
        assert_eq!(config.general.data_dir, "~/.deja/data");
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.model.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.model.model, "gemini-2.5-flash");
        assert!((config.retrieval.overlap_threshold - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.retrieval.min_token_chars, 2);
        assert_eq!(config.storage.answer_capacity, 2000);
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
data_dir = "/custom/data"
log_level = "debug"

[model]
api_key_env = "MY_KEY"
model = "gemini-2.0-pro"

[retrieval]
overlap_threshold = 0.6
min_token_chars = 3

[storage]
answer_capacity = 4000
"#;
        let file = create_temp_config(content);
        let config = DejaConfig::load(file.path()).unwrap();
        assert_eq!(config.general.data_dir, "/custom/data");
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.model.api_key_env, "MY_KEY");
        assert_eq!(config.model.model, "gemini-2.0-pro");
        assert!((config.retrieval.overlap_threshold - 0.6).abs() < f64::EPSILON);
        assert_eq!(config.retrieval.min_token_chars, 3);
        assert_eq!(config.storage.answer_capacity, 4000);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[general]
log_level = "warn"
"#;
        let file = create_temp_config(content);
        let config = DejaConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "warn");
        // Remaining fields use defaults
        assert_eq!(config.general.data_dir, "~/.deja/data");
        assert!((config.retrieval.overlap_threshold - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.storage.answer_capacity, 2000);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = DejaConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.general.data_dir, "~/.deja/data");
        assert_eq!(config.model.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_load_invalid_toml() {
        let content = "this is {{ not valid TOML";
        let file = create_temp_config(content);
        assert!(DejaConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = DejaConfig::default();
        config.save(&path).unwrap();

        let reloaded = DejaConfig::load(&path).unwrap();
        assert_eq!(reloaded.general.data_dir, config.general.data_dir);
        assert_eq!(reloaded.model.model, config.model.model);
        assert_eq!(
            reloaded.storage.answer_capacity,
            config.storage.answer_capacity
        );
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("dir").join("config.toml");

        DejaConfig::default().save(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_config_never_contains_credential() {
        // The serialized form carries the env var NAME, not a key value.
        let config = DejaConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("api_key_env"));
        assert!(!toml_str.to_lowercase().contains("aiza"));
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = DejaConfig::load(file.path()).unwrap();
        assert_eq!(config.general.data_dir, "~/.deja/data");
        assert_eq!(config.retrieval.min_token_chars, 2);
    }
}
