use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::file::DEFAULT_BLOCK_SIZE;
use crate::wal::MIN_LOG_BLOCK_SIZE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings of one storage directory, fixed for the lifetime of an instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub directory: PathBuf,
    pub block_size: usize,
    pub log_file: String,
    pub sync_writes: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("blocklog.db"),
            block_size: DEFAULT_BLOCK_SIZE,
            log_file: "blocklog.log".to_string(),
            sync_writes: true,
        }
    }
}

impl StorageConfig {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_log_file(mut self, log_file: impl Into<String>) -> Self {
        self.log_file = log_file.into();
        self
    }

    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(&self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.block_size < MIN_LOG_BLOCK_SIZE {
            return Err(ConfigError::Invalid(format!(
                "block_size {} is below the minimum of {}",
                self.block_size, MIN_LOG_BLOCK_SIZE
            )));
        }
        if i32::try_from(self.block_size).is_err() {
            return Err(ConfigError::Invalid(format!(
                "block_size {} does not fit in a 4-byte offset",
                self.block_size
            )));
        }
        if self.log_file.is_empty() {
            return Err(ConfigError::Invalid("log_file is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = StorageConfig::new("/tmp/db");
        assert_eq!(config.directory, PathBuf::from("/tmp/db"));
        assert_eq!(config.block_size, 400);
        assert_eq!(config.log_file, "blocklog.log");
        assert!(config.sync_writes);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        let config = StorageConfig::new(temp_dir.path().join("db"))
            .with_block_size(4096)
            .with_log_file("wal")
            .with_sync_writes(false);

        config.save(&path).unwrap();
        assert_eq!(StorageConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{ "directory": "data", "block_size": 1024 }"#).unwrap();

        let config = StorageConfig::load(&path).unwrap();
        assert_eq!(config.directory, PathBuf::from("data"));
        assert_eq!(config.block_size, 1024);
        assert_eq!(config.log_file, "blocklog.log");
        assert!(config.sync_writes);
    }

    #[test]
    fn test_invalid_values() {
        let tiny = StorageConfig::new("db").with_block_size(7);
        assert!(matches!(tiny.validate(), Err(ConfigError::Invalid(_))));

        let huge = StorageConfig::new("db").with_block_size(i32::MAX as usize + 1);
        assert!(matches!(huge.validate(), Err(ConfigError::Invalid(_))));

        let unnamed = StorageConfig::new("db").with_log_file("");
        assert!(matches!(unnamed.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            StorageConfig::load(&path),
            Err(ConfigError::JsonError(_))
        ));
    }
}
