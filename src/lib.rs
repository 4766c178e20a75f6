pub mod config;
pub mod failpoint;
pub mod file;
pub mod storage;
pub mod wal;

pub use config::{ConfigError, ConfigResult, StorageConfig};
pub use file::{
    BlockId, DEFAULT_BLOCK_SIZE, FileError, FileManager, FileResult, FileStats, Page,
    TEMP_FILE_PREFIX,
};
pub use storage::{Storage, StorageError, StorageResult};
pub use wal::{LogError, LogIterator, LogManager, LogResult, Lsn};
