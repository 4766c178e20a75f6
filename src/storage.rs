use std::sync::Arc;
use thiserror::Error;

use crate::config::{ConfigError, StorageConfig};
use crate::file::{FileError, FileManager};
use crate::wal::{LogError, LogManager};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("File error: {0}")]
    File(#[from] FileError),

    #[error("Log error: {0}")]
    Log(#[from] LogError),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A storage directory with its file manager and write-ahead log
pub struct Storage {
    file_manager: Arc<FileManager>,
    log_manager: LogManager,
}

impl Storage {
    pub fn open(config: &StorageConfig) -> StorageResult<Self> {
        config.validate()?;
        let file_manager = Arc::new(FileManager::with_sync(
            &config.directory,
            config.block_size,
            config.sync_writes,
        )?);
        let log_manager = LogManager::new(Arc::clone(&file_manager), config.log_file.as_str())?;
        Ok(Self {
            file_manager,
            log_manager,
        })
    }

    pub fn file_manager(&self) -> Arc<FileManager> {
        Arc::clone(&self.file_manager)
    }

    pub fn log_manager(&self) -> &LogManager {
        &self.log_manager
    }
}
