//! Lazy sequential scan over a fixed-record file
//!
//! A scan owns its own file handle, so every call to
//! [`RecordStore::scan`](super::RecordStore::scan) starts from index 0 with
//! no shared cursor. A short trailing chunk ends the scan silently: a torn
//! final append is dropped rather than reported.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageErrorCode, StorageResult};
use super::record::FixedRecord;

/// Iterator of `(index, record)` in file order.
pub struct RecordScan<R> {
    path: PathBuf,
    reader: BufReader<File>,
    block: Vec<u8>,
    next_index: u64,
    done: bool,
    _record: PhantomData<R>,
}

impl<R: FixedRecord> RecordScan<R> {
    pub(crate) fn new(path: &Path, file: File) -> Self {
        Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            block: vec![0u8; R::SIZE],
            next_index: 0,
            done: false,
            _record: PhantomData,
        }
    }
}

impl<R: FixedRecord> Iterator for RecordScan<R> {
    type Item = StorageResult<(u64, R)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match read_block(&mut self.reader, &mut self.block) {
            Ok(n) if n == R::SIZE => {
                let index = self.next_index;
                self.next_index += 1;
                Some(Ok((index, R::decode(&self.block))))
            }
            Ok(_) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(StorageError::at(
                    StorageErrorCode::ShelfStorageReadFailed,
                    "failed to read record from",
                    &self.path,
                    e,
                )))
            }
        }
    }
}

/// Fills `block` as far as the file allows and returns the byte count.
///
/// Unlike `read_exact`, reaching EOF mid-block is not an error.
pub(crate) fn read_block<T: Read>(reader: &mut T, block: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < block.len() {
        match reader.read(&mut block[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
