mod error;
mod iterator;
mod log_manager;


pub use error::{LogError, LogResult};
pub use iterator::LogIterator;
pub use log_manager::LogManager;

use crate::file::{BlockId, Page};

/// Log sequence number. The first appended record gets 1.
pub type Lsn = u64;

/// Size of the boundary header and of each record's length header
const INT_SIZE: usize = 4;

/// Offset of the boundary pointer inside every log block
const BOUNDARY_OFFSET: usize = 0;

/// Smallest block that can hold the boundary plus one empty record
pub const MIN_LOG_BLOCK_SIZE: usize = 2 * INT_SIZE;

/// Read and validate the boundary of a log block.
///
/// A block that was appended but never had its boundary written is all
/// zeros; it holds no records and reads as empty.
fn read_boundary(page: &Page, block: &BlockId) -> LogResult<usize> {
    let raw = page.get_int(BOUNDARY_OFFSET)?;
    if raw == 0 {
        return Ok(page.size());
    }
    match usize::try_from(raw) {
        Ok(boundary) if (INT_SIZE..=page.size()).contains(&boundary) => Ok(boundary),
        _ => Err(LogError::Corrupt {
            block: block.clone(),
            offset: BOUNDARY_OFFSET,
            reason: format!("boundary {} outside [{}, {}]", raw, INT_SIZE, page.size()),
        }),
    }
}
