//! Fixed-record storage for shelfdb
//!
//! Each entity type lives in its own flat file of fixed-size binary
//! records: no header, no record count, no checksum. The record count is
//! `file_size / block_size` and record `i` sits at offset `i * block_size`.
//!
//! # Design Principles
//!
//! - Append for new records, in-place rewrite for updates
//! - Records are never removed or reordered (soft delete only)
//! - fsync after every mutation; no multi-record atomicity
//! - Linear scans only; no index
//! - A torn trailing record is dropped on scan, not reported

mod errors;
mod reader;
mod record;
mod store;

pub use errors::{StorageError, StorageErrorCode, StorageResult};
pub use reader::RecordScan;
pub use record::{
    pack_fixed_str, unpack_fixed_str, ActiveFlag, FieldReader, FieldWriter, FixedRecord,
};
pub use store::RecordStore;
