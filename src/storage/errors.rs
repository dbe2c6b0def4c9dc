//! Record store error types
//!
//! Error codes:
//! - SHELF_STORAGE_IO_ERROR (file creation, metadata, seek)
//! - SHELF_STORAGE_WRITE_FAILED (append / in-place write / fsync)
//! - SHELF_STORAGE_READ_FAILED (scan, last-record read)
//!
//! Every variant wraps the underlying `io::Error` unmodified; the store
//! never retries.

use std::fmt;
use std::io;
use std::path::Path;

/// Storage-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Filesystem failure outside a read or write (create, stat, seek)
    ShelfStorageIoError,
    /// Write or fsync failed
    ShelfStorageWriteFailed,
    /// Read failed
    ShelfStorageReadFailed,
}

impl StorageErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::ShelfStorageIoError => "SHELF_STORAGE_IO_ERROR",
            StorageErrorCode::ShelfStorageWriteFailed => "SHELF_STORAGE_WRITE_FAILED",
            StorageErrorCode::ShelfStorageReadFailed => "SHELF_STORAGE_READ_FAILED",
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Storage error with the failing file and the I/O cause
#[derive(Debug)]
pub struct StorageError {
    code: StorageErrorCode,
    message: String,
    source: io::Error,
}

impl StorageError {
    fn new(code: StorageErrorCode, message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code,
            message: message.into(),
            source,
        }
    }

    /// Append, in-place write or fsync failure
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(StorageErrorCode::ShelfStorageWriteFailed, message, source)
    }

    /// Read failure
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(StorageErrorCode::ShelfStorageReadFailed, message, source)
    }

    pub(crate) fn at(
        code: StorageErrorCode,
        action: &str,
        path: &Path,
        source: io::Error,
    ) -> Self {
        Self::new(code, format!("{} {}", action, path.display()), source)
    }

    /// Returns the error code
    pub fn code(&self) -> StorageErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the kind of the underlying I/O error
    pub fn io_kind(&self) -> io::ErrorKind {
        self.source.kind()
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.code, self.message, self.source)
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
