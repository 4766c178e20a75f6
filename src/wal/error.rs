use thiserror::Error;

use crate::file::{BlockId, FileError};

#[derive(Debug, Error)]
pub enum LogError {
    #[error("File error: {0}")]
    File(#[from] FileError),

    #[error("Log record of {size} bytes does not fit in a {capacity}-byte block")]
    RecordTooLarge { size: usize, capacity: usize },

    #[error("Invalid log block size: {0}")]
    InvalidBlockSize(usize),

    #[error("Corrupt log block {block} at offset {offset}: {reason}")]
    Corrupt {
        block: BlockId,
        offset: usize,
        reason: String,
    },
}

pub type LogResult<T> = Result<T, LogError>;
