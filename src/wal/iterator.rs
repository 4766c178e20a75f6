use std::sync::Arc;

use log::trace;

use super::error::{LogError, LogResult};
use super::{INT_SIZE, read_boundary};
use crate::file::{BlockId, FileManager, Page};

/// Single-pass walk over log records, newest first.
///
/// Starts at the boundary of the given block and scans forward through it,
/// then moves to the preceding block until block 0 is exhausted. Blocks are
/// read through the file manager as the walk reaches them. After an error
/// the iterator yields nothing more.
pub struct LogIterator {
    file_manager: Arc<FileManager>,
    block: BlockId,
    page: Page,
    current_pos: usize,
    done: bool,
}

impl LogIterator {
    pub(super) fn new(file_manager: Arc<FileManager>, block: BlockId) -> LogResult<Self> {
        let page = Page::new(file_manager.block_size());
        let mut iter = Self {
            file_manager,
            block: block.clone(),
            page,
            current_pos: 0,
            done: false,
        };
        iter.move_to_block(block)?;
        Ok(iter)
    }

    fn move_to_block(&mut self, block: BlockId) -> LogResult<()> {
        self.file_manager.read(&block, &mut self.page)?;
        self.current_pos = read_boundary(&self.page, &block)?;
        trace!("log iterator at {} from offset {}", block, self.current_pos);
        self.block = block;
        Ok(())
    }

    fn next_record(&mut self) -> LogResult<Option<Vec<u8>>> {
        while self.current_pos >= self.page.size() {
            if self.block.number() == 0 {
                return Ok(None);
            }
            let prev = BlockId::new(self.block.file_name(), self.block.number() - 1);
            self.move_to_block(prev)?;
        }

        let record = self
            .page
            .get_bytes(self.current_pos)
            .map_err(|e| LogError::Corrupt {
                block: self.block.clone(),
                offset: self.current_pos,
                reason: e.to_string(),
            })?;
        self.current_pos += INT_SIZE + record.len();
        Ok(Some(record))
    }
}

impl Iterator for LogIterator {
    type Item = LogResult<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
