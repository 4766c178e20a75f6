use std::sync::atomic::{AtomicU64, Ordering};

/// Block I/O counters of a file manager.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileStats {
    pub blocks_read: u64,
    pub blocks_written: u64,
    pub blocks_appended: u64,
}

impl FileStats {
    pub fn sub(&self, o: &FileStats) -> FileStats {
        FileStats {
            blocks_read: self.blocks_read.saturating_sub(o.blocks_read),
            blocks_written: self.blocks_written.saturating_sub(o.blocks_written),
            blocks_appended: self.blocks_appended.saturating_sub(o.blocks_appended),
        }
    }
}

#[derive(Debug, Default)]
pub(super) struct Counter(AtomicU64);

impl Counter {
    pub(super) fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub(super) fn inc(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

#[derive(Debug, Default)]
pub(super) struct AtomicFileStats {
    pub(super) blocks_read: Counter,
    pub(super) blocks_written: Counter,
    pub(super) blocks_appended: Counter,
}

impl AtomicFileStats {
    pub(super) fn snapshot(&self) -> FileStats {
        FileStats {
            blocks_read: self.blocks_read.get(),
            blocks_written: self.blocks_written.get(),
            blocks_appended: self.blocks_appended.get(),
        }
    }
}
