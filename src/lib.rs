//! shelfdb - single-operator library circulation over fixed-record files
//!
//! Books, members and loans each live in their own flat file of fixed-size
//! little-endian records. [`ledger::Library`] is the entry point for every
//! domain operation.

pub mod cli;
pub mod config;
pub mod crash_point;
pub mod ledger;
pub mod model;
pub mod observability;
pub mod report;
pub mod storage;
