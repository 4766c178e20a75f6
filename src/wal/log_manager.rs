use std::sync::Arc;

use log::{debug, info, warn};
use parking_lot::Mutex;

use super::error::{LogError, LogResult};
use super::iterator::LogIterator;
use super::{BOUNDARY_OFFSET, INT_SIZE, Lsn, MIN_LOG_BLOCK_SIZE, read_boundary};
use crate::failpoint;
use crate::file::{BlockId, FileError, FileManager, Page};

/// In-memory state of the last log block
struct LogTail {
    current_block: BlockId,
    /// Always holds the in-memory contents of `current_block`
    page: Page,
    latest_lsn: Lsn,
    last_flushed_lsn: Lsn,
}

/// Append-only log of opaque byte records stored in one file.
///
/// Records are packed into a block-sized tail buffer from the high end
/// downward, each as a 4-byte length followed by the bytes. Offset 0 of the
/// block holds the boundary: the offset of the most recently appended record,
/// or the block size when the block is empty. A forward scan from the
/// boundary therefore visits records newest first.
///
/// The tail buffer only reaches disk when it is full and the log moves on to
/// a new block, or when a flush is requested.
pub struct LogManager {
    file_manager: Arc<FileManager>,
    log_file: String,
    tail: Mutex<LogTail>,
}

impl LogManager {
    /// Open the log stored in `log_file`, creating its first block if the
    /// file is empty
    pub fn new(file_manager: Arc<FileManager>, log_file: impl Into<String>) -> LogResult<Self> {
        let log_file = log_file.into();
        let block_size = file_manager.block_size();
        if block_size < MIN_LOG_BLOCK_SIZE || i32::try_from(block_size).is_err() {
            return Err(LogError::InvalidBlockSize(block_size));
        }

        let log_size = file_manager.length(&log_file)?;
        let (current_block, page) = if log_size == 0 {
            let (block, page) = append_new_block(&file_manager, &log_file)?;
            info!("created log {} at {}", log_file, block);
            (block, page)
        } else {
            let mut page = Page::new(block_size);
            let block = BlockId::new(log_file.as_str(), log_size - 1);
            file_manager.read(&block, &mut page)?;
            if page.get_int(BOUNDARY_OFFSET)? == 0 {
                warn!("log block {} has no boundary, treating it as empty", block);
                page.set_int(BOUNDARY_OFFSET, block_size as i32)?;
                file_manager.write(&block, &page)?;
            }
            read_boundary(&page, &block)?;
            info!("opened log {} at {}", log_file, block);
            (block, page)
        };

        Ok(Self {
            file_manager,
            log_file,
            tail: Mutex::new(LogTail {
                current_block,
                page,
                latest_lsn: 0,
                last_flushed_lsn: 0,
            }),
        })
    }

    /// Append a record to the tail buffer and return its LSN
    ///
    /// The record is durable only after a flush covering the returned LSN.
    pub fn append(&self, record: &[u8]) -> LogResult<Lsn> {
        let block_size = self.file_manager.block_size();
        let bytes_needed = record.len() + INT_SIZE;
        if bytes_needed + INT_SIZE > block_size {
            return Err(LogError::RecordTooLarge {
                size: record.len(),
                capacity: block_size,
            });
        }

        let mut guard = self.tail.lock();
        let tail = &mut *guard;

        let mut boundary = read_boundary(&tail.page, &tail.current_block)?;
        if boundary < bytes_needed + INT_SIZE {
            self.flush_tail(tail)?;
            // The tail keeps the sealed block until the new one is on disk
            let (block, page) = append_new_block(&self.file_manager, &self.log_file)?;
            debug!("log rotated from {} to {}", tail.current_block, block);
            tail.current_block = block;
            tail.page = page;
            boundary = block_size;
        }

        let record_pos = boundary - bytes_needed;
        tail.page.set_bytes(record_pos, record)?;
        tail.page.set_int(BOUNDARY_OFFSET, record_pos as i32)?;
        tail.latest_lsn += 1;
        Ok(tail.latest_lsn)
    }

    /// Make every appended record durable if `lsn` is not yet covered
    ///
    /// The whole tail buffer is written, not just the records up to `lsn`.
    pub fn flush(&self, lsn: Lsn) -> LogResult<()> {
        let mut tail = self.tail.lock();
        if lsn >= tail.last_flushed_lsn {
            self.flush_tail(&mut tail)?;
        }
        Ok(())
    }

    /// Flush the log, then return its records newest first
    pub fn iterator(&self) -> LogResult<LogIterator> {
        let mut tail = self.tail.lock();
        self.flush_tail(&mut tail)?;
        LogIterator::new(Arc::clone(&self.file_manager), tail.current_block.clone())
    }

    /// LSN of the most recently appended record, 0 before any append
    pub fn latest_lsn(&self) -> Lsn {
        self.tail.lock().latest_lsn
    }

    /// Highest LSN known to be on disk
    pub fn last_flushed_lsn(&self) -> Lsn {
        self.tail.lock().last_flushed_lsn
    }

    pub fn current_block(&self) -> BlockId {
        self.tail.lock().current_block.clone()
    }

    pub fn log_file(&self) -> &str {
        &self.log_file
    }

    fn flush_tail(&self, tail: &mut LogTail) -> LogResult<()> {
        self.file_manager.write(&tail.current_block, &tail.page)?;
        tail.last_flushed_lsn = tail.latest_lsn;
        debug!(
            "flushed log block {} up to lsn {}",
            tail.current_block, tail.last_flushed_lsn
        );
        Ok(())
    }
}

/// Allocate a log block and persist it with an empty boundary
fn append_new_block(file_manager: &FileManager, log_file: &str) -> LogResult<(BlockId, Page)> {
    let block = file_manager.append(log_file)?;
    let mut page = Page::new(file_manager.block_size());
    page.set_int(BOUNDARY_OFFSET, file_manager.block_size() as i32)?;
    failpoint::maybe_fail(failpoint::LOG_INIT_BLOCK).map_err(|source| FileError::Write {
        block: block.clone(),
        source,
    })?;
    file_manager.write(&block, &page)?;
    Ok((block, page))
}
