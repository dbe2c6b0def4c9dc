//! Crash point injection for exercising durability gaps
//!
//! Setting `SHELFDB_CRASH_POINT` to one of the names in [`points`] makes the
//! process abort at that location: no cleanup, no unwinding.
//!
//! Borrow and return are two separate durable writes (loan record, then
//! book counter). The `*_after_loan_*` points stop the process between
//! them, leaving exactly the inconsistency that `Library::reconcile`
//! repairs.
//!
//! ```bash
//! SHELFDB_CRASH_POINT=borrow_after_loan_append shelfdb borrow --book 1 --member 1
//! ```

use std::sync::OnceLock;

/// Environment variable naming the active crash point
pub const CRASH_POINT_ENV: &str = "SHELFDB_CRASH_POINT";

static CRASH_POINT: OnceLock<Option<String>> = OnceLock::new();

#[inline]
fn get_crash_point() -> Option<&'static str> {
    CRASH_POINT
        .get_or_init(|| std::env::var(CRASH_POINT_ENV).ok())
        .as_deref()
}

/// Returns true if `SHELFDB_CRASH_POINT` equals `name`.
#[inline]
pub fn crash_point_enabled(name: &str) -> bool {
    get_crash_point().map(|p| p == name).unwrap_or(false)
}

/// Aborts the process if the named crash point is enabled.
#[inline]
pub fn maybe_crash(name: &str) {
    if crash_point_enabled(name) {
        eprintln!("[CRASH] Triggering crash at point: {}", name);
        std::process::abort();
    }
}

/// All defined crash point names
pub mod points {
    /// Block written to the page cache, fsync not yet issued
    pub const STORE_BEFORE_SYNC: &str = "store_before_sync";
    /// Open loan appended, book availability not yet decremented
    pub const BORROW_AFTER_LOAN_APPEND: &str = "borrow_after_loan_append";
    /// Loan closed, book availability not yet incremented
    pub const RETURN_AFTER_LOAN_CLOSE: &str = "return_after_loan_close";

    pub fn all() -> &'static [&'static str] {
        &[
            STORE_BEFORE_SYNC,
            BORROW_AFTER_LOAN_APPEND,
            RETURN_AFTER_LOAN_CLOSE,
        ]
    }
}
