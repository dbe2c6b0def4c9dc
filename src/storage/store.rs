//! File-backed sequence of fixed-size records
//!
//! - Append-only growth; records are never removed or reordered
//! - In-place rewrite of exactly one block by positional index
//! - Every mutation is fsynced before returning
//! - No locking: a second process writing the same file is unsupported
//!
//! Record `i` lives at byte offset `i * R::SIZE`; the record count is
//! always `file_size / R::SIZE`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageErrorCode, StorageResult};
use super::reader::{read_block, RecordScan};
use super::record::{ActiveFlag, FixedRecord};
use crate::crash_point::{maybe_crash, points};

/// Record store bound to one file and one record type.
///
/// Holds no open handle: each operation opens the file, so a store is
/// cheap to clone and never observes a stale cursor.
#[derive(Debug, Clone)]
pub struct RecordStore<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R: FixedRecord> RecordStore<R> {
    /// Binds a store to `path`, creating the file (and its parent
    /// directory) if absent.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let store = Self {
            path: path.into(),
            _record: PhantomData,
        };
        store.ensure()?;
        Ok(store)
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Guarantees the backing file exists. An existing file is untouched.
    pub fn ensure(&self) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    StorageError::at(
                        StorageErrorCode::ShelfStorageIoError,
                        "failed to create data directory for",
                        &self.path,
                        e,
                    )
                })?;
            }
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map(|_| ())
            .map_err(|e| self.io_err("failed to create", e))
    }

    /// Starts a fresh scan from record 0.
    pub fn scan(&self) -> StorageResult<RecordScan<R>> {
        self.ensure()?;
        let file = File::open(&self.path).map_err(|e| {
            StorageError::at(
                StorageErrorCode::ShelfStorageReadFailed,
                "failed to open",
                &self.path,
                e,
            )
        })?;
        Ok(RecordScan::new(&self.path, file))
    }

    /// Collects a full scan.
    pub fn read_all(&self) -> StorageResult<Vec<(u64, R)>> {
        self.scan()?.collect()
    }

    /// Number of complete records in the file.
    pub fn len(&self) -> StorageResult<u64> {
        Ok(self.file_size()? / R::SIZE as u64)
    }

    /// Whether the file holds no complete record.
    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    /// First record matching `pred`, with its positional index.
    pub fn find<P>(&self, mut pred: P) -> StorageResult<Option<(u64, R)>>
    where
        P: FnMut(&R) -> bool,
    {
        for item in self.scan()? {
            let (index, record) = item?;
            if pred(&record) {
                return Ok(Some((index, record)));
            }
        }
        Ok(None)
    }

    /// First record carrying `id`, active or not.
    pub fn find_by_id(&self, id: u32) -> StorageResult<Option<(u64, R)>> {
        self.find(|r| r.id() == id)
    }

    /// Appends one record and fsyncs. Returns the index it landed at.
    pub fn append(&self, record: &R) -> StorageResult<u64> {
        self.append_block(&record.encode())
    }

    /// Appends one pre-encoded block and fsyncs.
    ///
    /// A block that is not exactly `R::SIZE` bytes is rejected before the
    /// file is touched.
    pub fn append_block(&self, block: &[u8]) -> StorageResult<u64> {
        self.check_block(block)?;
        self.ensure()?;

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| self.write_err("failed to open for append", e))?;

        let index = file
            .metadata()
            .map_err(|e| self.io_err("failed to stat", e))?
            .len()
            / R::SIZE as u64;

        file.write_all(block)
            .map_err(|e| self.write_err("failed to append to", e))?;
        self.sync(&mut file)?;

        Ok(index)
    }

    /// Overwrites record `index` in place and fsyncs.
    ///
    /// The caller supplies a previously assigned index. An index past the
    /// end extends the file the way the filesystem handles a sparse
    /// seek-write; this is not guarded.
    pub fn write_at(&self, index: u64, record: &R) -> StorageResult<()> {
        self.write_block_at(index, &record.encode())
    }

    /// Overwrites record `index` with a pre-encoded block and fsyncs.
    pub fn write_block_at(&self, index: u64, block: &[u8]) -> StorageResult<()> {
        self.check_block(block)?;
        self.ensure()?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| self.write_err("failed to open for update", e))?;

        file.seek(SeekFrom::Start(index * R::SIZE as u64))
            .map_err(|e| self.io_err("failed to seek in", e))?;
        file.write_all(block)
            .map_err(|e| self.write_err("failed to rewrite record in", e))?;
        self.sync(&mut file)
    }

    /// Identifier for the next appended record: 1 for an empty file,
    /// otherwise the last complete record's identifier plus one.
    ///
    /// Only monotonic because records are appended in identifier order and
    /// never reordered.
    pub fn next_identifier(&self) -> StorageResult<u32> {
        let count = self.len()?;
        if count == 0 {
            return Ok(1);
        }

        let mut file = File::open(&self.path).map_err(|e| {
            StorageError::at(
                StorageErrorCode::ShelfStorageReadFailed,
                "failed to open",
                &self.path,
                e,
            )
        })?;
        file.seek(SeekFrom::Start((count - 1) * R::SIZE as u64))
            .map_err(|e| self.io_err("failed to seek in", e))?;

        let mut block = vec![0u8; R::SIZE];
        let n = read_block(&mut file, &mut block).map_err(|e| {
            StorageError::at(
                StorageErrorCode::ShelfStorageReadFailed,
                "failed to read last record of",
                &self.path,
                e,
            )
        })?;
        if n < R::SIZE {
            // File shrank between stat and read
            return Ok(1);
        }

        R::decode(&block).id().checked_add(1).ok_or_else(|| {
            self.io_err(
                "identifier space exhausted in",
                io::Error::new(io::ErrorKind::InvalidData, "u32 identifier overflow"),
            )
        })
    }

    fn check_block(&self, block: &[u8]) -> StorageResult<()> {
        if block.len() == R::SIZE {
            return Ok(());
        }
        Err(self.write_err(
            "refusing misaligned block for",
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("block is {} bytes, record size is {}", block.len(), R::SIZE),
            ),
        ))
    }

    fn file_size(&self) -> StorageResult<u64> {
        self.ensure()?;
        fs::metadata(&self.path)
            .map(|m| m.len())
            .map_err(|e| self.io_err("failed to stat", e))
    }

    fn sync(&self, file: &mut File) -> StorageResult<()> {
        file.flush()
            .map_err(|e| self.write_err("failed to flush", e))?;
        maybe_crash(points::STORE_BEFORE_SYNC);
        file.sync_all()
            .map_err(|e| self.write_err("fsync failed for", e))
    }

    fn io_err(&self, action: &str, e: io::Error) -> StorageError {
        StorageError::at(StorageErrorCode::ShelfStorageIoError, action, &self.path, e)
    }

    fn write_err(&self, action: &str, e: io::Error) -> StorageError {
        StorageError::at(
            StorageErrorCode::ShelfStorageWriteFailed,
            action,
            &self.path,
            e,
        )
    }
}

impl<R: FixedRecord + ActiveFlag> RecordStore<R> {
    /// Every record in file order, skipping soft-deleted ones unless
    /// `include_inactive` is set.
    pub fn list(&self, include_inactive: bool) -> StorageResult<Vec<R>> {
        let mut out = Vec::new();
        for item in self.scan()? {
            let (_, record) = item?;
            if include_inactive || record.is_active() {
                out.push(record);
            }
        }
        Ok(out)
    }

    /// Record carrying `id` only if it is still active.
    pub fn find_active(&self, id: u32) -> StorageResult<Option<(u64, R)>> {
        self.find(|r| r.id() == id && r.is_active())
    }
}
