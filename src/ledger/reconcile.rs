//! Availability reconciliation
//!
//! Borrow and return each write the loan first and the book counter
//! second. A crash between the two leaves `available` off by one. This pass
//! recomputes every book's counter from the loan file:
//!
//! ```text
//! available = max(0, total - open_loans(book))
//! ```
//!
//! Only mismatching books are rewritten. It runs on request only; borrow and
//! return never invoke it.

use serde::Serialize;

use super::book::BookLedger;
use super::errors::LedgerResult;
use super::loan::LoanLedger;

/// One book whose counter disagreed with the loan file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityCorrection {
    pub book_id: u32,
    pub title: String,
    pub total: u16,
    pub open_loans: u32,
    /// Counter as found on disk
    pub before: u16,
    /// Counter derived from open loans
    pub after: u16,
}

/// Result of a reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub books_checked: u64,
    pub corrections: Vec<AvailabilityCorrection>,
    /// True if corrections were computed but not written
    pub dry_run: bool,
}

impl ReconcileReport {
    pub fn is_consistent(&self) -> bool {
        self.corrections.is_empty()
    }
}

/// Expected counter for a book with `total` copies and `open_loans` out.
pub fn expected_available(total: u16, open_loans: u32) -> u16 {
    let open = u16::try_from(open_loans).unwrap_or(u16::MAX);
    total.saturating_sub(open)
}

/// Recomputes availability for every book, active or not.
///
/// With `dry_run`, mismatches are reported but nothing is written.
pub fn reconcile_availability(
    books: &BookLedger,
    loans: &LoanLedger,
    now: u32,
    dry_run: bool,
) -> LedgerResult<ReconcileReport> {
    let open_counts = loans.open_counts_by_book()?;
    let mut report = ReconcileReport {
        dry_run,
        ..ReconcileReport::default()
    };

    for book in books.list_all(true)? {
        report.books_checked += 1;

        let open_loans = open_counts.get(&book.id).copied().unwrap_or(0);
        let after = expected_available(book.total, open_loans);
        if after == book.available {
            continue;
        }

        if !dry_run {
            books.set_available(book.id, after, now)?;
        }
        report.corrections.push(AvailabilityCorrection {
            book_id: book.id,
            title: book.title,
            total: book.total,
            open_loans,
            before: book.available,
            after,
        });
    }

    Ok(report)
}
