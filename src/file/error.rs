use std::io;
use std::path::PathBuf;
use thiserror::Error;

use super::BlockId;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("cannot read block {block}: {source}")]
    Read {
        block: BlockId,
        #[source]
        source: io::Error,
    },

    #[error("cannot write block {block}: {source}")]
    Write {
        block: BlockId,
        #[source]
        source: io::Error,
    },

    #[error("cannot append block to {file}: {source}")]
    Append {
        file: String,
        #[source]
        source: io::Error,
    },

    #[error("cannot access {file}: {source}")]
    Access {
        file: String,
        #[source]
        source: io::Error,
    },

    #[error("cannot prepare directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid block size: {0}")]
    InvalidBlockSize(usize),

    #[error("Invalid page size: expected {expected}, got {actual}")]
    InvalidPageSize { expected: usize, actual: usize },

    #[error("Out of bounds: offset={offset}, len={len}, capacity={capacity}")]
    OutOfBounds {
        offset: usize,
        len: usize,
        capacity: usize,
    },

    #[error("Invalid length header at offset {offset}: {len}")]
    InvalidLength { offset: usize, len: i32 },

    #[error("Invalid UTF-8 string at offset {offset}")]
    InvalidString { offset: usize },
}

pub type FileResult<T> = Result<T, FileError>;
