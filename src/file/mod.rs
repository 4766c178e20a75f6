mod block_id;
mod error;
mod file_manager;
mod page;
mod stats;

pub use block_id::BlockId;
pub use error::{FileError, FileResult};
pub use file_manager::FileManager;
pub use page::Page;
pub use stats::FileStats;

/// Default block size in bytes
pub const DEFAULT_BLOCK_SIZE: usize = 400;

/// Files whose name starts with this prefix are removed at startup
pub const TEMP_FILE_PREFIX: &str = "temp";
