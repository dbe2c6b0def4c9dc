//! Domain ledgers
//!
//! Each ledger wraps one [`RecordStore`](crate::storage::RecordStore) and
//! adds the entity's semantic operations. Operations that span entities
//! (soft-delete checks, borrow, return) take the other ledgers by
//! reference. [`Library`] composes all three over one configuration.

mod book;
mod clock;
mod errors;
mod filter;
mod library;
mod loan;
mod member;
mod reconcile;

pub use book::{BookLedger, BookUpdate};
pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::{Entity, LedgerError, LedgerResult};
pub use filter::{BookFilter, MemberFilter, StatusFilter};
pub use library::Library;
pub use loan::{LoanLedger, LoanReceipt};
pub use member::{MemberLedger, MemberUpdate};
pub use reconcile::{
    expected_available, reconcile_availability, AvailabilityCorrection, ReconcileReport,
};
