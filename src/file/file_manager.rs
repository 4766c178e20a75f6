use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use ahash::AHashMap;
use log::{info, trace};
use parking_lot::Mutex;

use super::error::{FileError, FileResult};
use super::stats::AtomicFileStats;
use super::{BlockId, FileStats, Page, TEMP_FILE_PREFIX};

/// Block-addressed access to the files of one storage directory.
///
/// Every file is a flat sequence of `block_size` blocks. Handles are opened
/// lazily on first use and stay open until the manager is dropped. All block
/// transfers run under one lock, since a seek followed by a read or write on
/// a shared handle is not atomic.
pub struct FileManager {
    directory: PathBuf,
    block_size: usize,
    is_new: bool,
    /// Followed by `sync_data` after every write and append when set
    sync_writes: bool,
    /// Map from file names to open handles
    open_files: Mutex<AHashMap<String, File>>,
    stats: AtomicFileStats,
}

impl FileManager {
    /// Open (or create) a storage directory with synchronous writes
    pub fn new<P: AsRef<Path>>(directory: P, block_size: usize) -> FileResult<Self> {
        Self::with_sync(directory, block_size, true)
    }

    /// Open (or create) a storage directory
    ///
    /// Files whose name starts with [`TEMP_FILE_PREFIX`] are left over from
    /// temporary tables of an earlier run and are deleted here.
    pub fn with_sync<P: AsRef<Path>>(
        directory: P,
        block_size: usize,
        sync_writes: bool,
    ) -> FileResult<Self> {
        if block_size == 0 {
            return Err(FileError::InvalidBlockSize(block_size));
        }
        let directory = directory.as_ref().to_path_buf();
        let dir_error = |source| FileError::Directory {
            path: directory.clone(),
            source,
        };

        let is_new = !directory.exists();
        if is_new {
            fs::create_dir_all(&directory).map_err(dir_error)?;
            info!("created storage directory {}", directory.display());
        }

        for entry in fs::read_dir(&directory).map_err(dir_error)? {
            let entry = entry.map_err(dir_error)?;
            let is_temp = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(TEMP_FILE_PREFIX));
            if is_temp && entry.file_type().map_err(dir_error)?.is_file() {
                fs::remove_file(entry.path()).map_err(dir_error)?;
                info!("removed leftover temporary file {}", entry.path().display());
            }
        }

        Ok(Self {
            directory,
            block_size,
            is_new,
            sync_writes,
            open_files: Mutex::new(AHashMap::new()),
            stats: AtomicFileStats::default(),
        })
    }

    /// Read one block into `page`
    pub fn read(&self, block: &BlockId, page: &mut Page) -> FileResult<()> {
        self.check_page(page)?;
        let mut open_files = self.open_files.lock();

        let result = self.offset_of(block).and_then(|offset| {
            let file = self.file(&mut open_files, block.file_name())?;
            file.seek(SeekFrom::Start(offset))?;
            file.read_exact(page.contents_mut())
        });
        result.map_err(|source| FileError::Read {
            block: block.clone(),
            source,
        })?;

        self.stats.blocks_read.inc();
        trace!("read block {}", block);
        Ok(())
    }

    /// Write `page` to one block
    pub fn write(&self, block: &BlockId, page: &Page) -> FileResult<()> {
        self.check_page(page)?;
        let mut open_files = self.open_files.lock();
        let sync_writes = self.sync_writes;

        let result = self.offset_of(block).and_then(|offset| {
            let file = self.file(&mut open_files, block.file_name())?;
            file.seek(SeekFrom::Start(offset))?;
            file.write_all(page.contents())?;
            if sync_writes {
                file.sync_data()?;
            }
            Ok(())
        });
        result.map_err(|source| FileError::Write {
            block: block.clone(),
            source,
        })?;

        self.stats.blocks_written.inc();
        trace!("wrote block {}", block);
        Ok(())
    }

    /// Extend a file by one zero-filled block and return its id
    pub fn append(&self, file_name: &str) -> FileResult<BlockId> {
        let mut open_files = self.open_files.lock();
        let block_size = self.block_size;
        let sync_writes = self.sync_writes;

        let number = self
            .file(&mut open_files, file_name)
            .and_then(|file| {
                let number = (file.metadata()?.len() / block_size as u64) as usize;
                file.seek(SeekFrom::Start(number as u64 * block_size as u64))?;
                file.write_all(&vec![0u8; block_size])?;
                if sync_writes {
                    file.sync_data()?;
                }
                Ok(number)
            })
            .map_err(|source| FileError::Append {
                file: file_name.to_string(),
                source,
            })?;

        self.stats.blocks_appended.inc();
        let block = BlockId::new(file_name, number);
        trace!("appended block {}", block);
        Ok(block)
    }

    /// Number of whole blocks in a file; a missing file is created empty
    pub fn length(&self, file_name: &str) -> FileResult<usize> {
        let mut open_files = self.open_files.lock();
        let len = self
            .file(&mut open_files, file_name)
            .and_then(|file| file.metadata())
            .map_err(|source| FileError::Access {
                file: file_name.to_string(),
                source,
            })?
            .len();
        Ok((len / self.block_size as u64) as usize)
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Number of file handles currently cached
    pub fn open_file_count(&self) -> usize {
        self.open_files.lock().len()
    }

    pub fn stats(&self) -> FileStats {
        self.stats.snapshot()
    }

    fn offset_of(&self, block: &BlockId) -> io::Result<u64> {
        (block.number() as u64)
            .checked_mul(self.block_size as u64)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("block number {} is beyond the addressable range", block.number()),
                )
            })
    }

    fn check_page(&self, page: &Page) -> FileResult<()> {
        if page.size() != self.block_size {
            return Err(FileError::InvalidPageSize {
                expected: self.block_size,
                actual: page.size(),
            });
        }
        Ok(())
    }

    /// Look up the handle for `file_name`, opening it on first use
    fn file<'a>(
        &self,
        open_files: &'a mut AHashMap<String, File>,
        file_name: &str,
    ) -> io::Result<&'a mut File> {
        if !open_files.contains_key(file_name) {
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(self.directory.join(file_name))?;
            open_files.insert(file_name.to_string(), file);
        }
        open_files
            .get_mut(file_name)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, file_name.to_string()))
    }
}
