//! Observable events for shelfdb
//!
//! Events are explicit and typed; each maps to one stable log name.

use std::fmt;

/// Observable events in shelfdb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Stores bound to their files
    LibraryOpened,
    /// Configuration file loaded
    ConfigLoaded,

    // Books
    BookCreated,
    BookUpdated,
    BookDeleted,
    /// Availability counter moved by borrow or return
    AvailabilityAdjusted,

    // Members
    MemberCreated,
    MemberUpdated,
    MemberDeleted,

    // Loans
    LoanOpened,
    LoanClosed,
    /// Loan closed but its book record is missing
    LoanBookMissing,

    // Reconciliation
    ReconcileStart,
    ReconcileCorrection,
    ReconcileComplete,

    // Reports
    ReportGenerated,

    /// Domain precondition or lookup failed
    OperationRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::LibraryOpened => "LIBRARY_OPENED",
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::BookCreated => "BOOK_CREATED",
            Event::BookUpdated => "BOOK_UPDATED",
            Event::BookDeleted => "BOOK_SOFT_DELETED",
            Event::AvailabilityAdjusted => "BOOK_AVAILABILITY_ADJUSTED",

            Event::MemberCreated => "MEMBER_CREATED",
            Event::MemberUpdated => "MEMBER_UPDATED",
            Event::MemberDeleted => "MEMBER_SOFT_DELETED",

            Event::LoanOpened => "LOAN_OPENED",
            Event::LoanClosed => "LOAN_CLOSED",
            Event::LoanBookMissing => "LOAN_BOOK_MISSING",

            Event::ReconcileStart => "RECONCILE_BEGIN",
            Event::ReconcileCorrection => "RECONCILE_CORRECTION",
            Event::ReconcileComplete => "RECONCILE_COMPLETE",

            Event::ReportGenerated => "REPORT_GENERATED",

            Event::OperationRejected => "OPERATION_REJECTED",
        }
    }

    /// Events that signal data needing operator attention
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Event::LoanBookMissing | Event::ReconcileCorrection | Event::OperationRejected
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
