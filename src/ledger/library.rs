//! Library facade
//!
//! Binds the three ledgers to the files named by one [`LibraryConfig`],
//! stamps every mutation with the injected [`Clock`], and logs each
//! outcome. Rejections (`NotFound`, `InvalidInput`, `PreconditionViolated`)
//! are logged as `OPERATION_REJECTED` and returned; storage failures are
//! returned unlogged for the caller to report.

use std::fs;

use chrono::{TimeZone, Utc};

use super::book::{BookLedger, BookUpdate};
use super::clock::{Clock, SystemClock};
use super::errors::{LedgerError, LedgerResult};
use super::filter::{BookFilter, MemberFilter};
use super::loan::{LoanLedger, LoanReceipt};
use super::member::{MemberLedger, MemberUpdate};
use super::reconcile::{reconcile_availability, ReconcileReport};
use crate::config::LibraryConfig;
use crate::model::{Book, Loan, Member};
use crate::observability::{log_event_with_fields, Event};
use crate::report::{aggregate, render_text, LibraryReport};
use crate::storage::{RecordStore, StorageError, StorageErrorCode};

/// The three ledgers over one data directory
pub struct Library {
    config: LibraryConfig,
    books: BookLedger,
    members: MemberLedger,
    loans: LoanLedger,
    clock: Box<dyn Clock>,
}

impl Library {
    /// Opens (creating if absent) the data files named by `config`.
    pub fn open(config: LibraryConfig) -> LedgerResult<Self> {
        Self::open_with_clock(config, Box::new(SystemClock))
    }

    pub fn open_with_clock(config: LibraryConfig, clock: Box<dyn Clock>) -> LedgerResult<Self> {
        config
            .validate()
            .map_err(|e| LedgerError::invalid_input(e.to_string()))?;

        let books = BookLedger::new(RecordStore::open(config.books_path())?);
        let members = MemberLedger::new(RecordStore::open(config.members_path())?);
        let loans = LoanLedger::new(RecordStore::open(config.loans_path())?);

        log_event_with_fields(
            Event::LibraryOpened,
            &[("data_dir", &config.data_dir.display().to_string())],
        );

        Ok(Self {
            config,
            books,
            members,
            loans,
            clock,
        })
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    pub fn books(&self) -> &BookLedger {
        &self.books
    }

    pub fn members(&self) -> &MemberLedger {
        &self.members
    }

    pub fn loans(&self) -> &LoanLedger {
        &self.loans
    }

    /// Current time, never 0 (0 marks an open loan).
    pub fn now(&self) -> u32 {
        self.clock.now().max(1)
    }

    // ---------------------------------------------------------------------
    // Books
    // ---------------------------------------------------------------------

    pub fn add_book(&self, title: &str, author: &str, year: u16, total: u16) -> LedgerResult<Book> {
        let result = require_text("title", title)
            .and_then(|_| self.books.create(title.trim(), author.trim(), year, total, self.now()));
        let book = rejected("add_book", result)?;

        log_event_with_fields(
            Event::BookCreated,
            &[
                ("book_id", &book.id.to_string()),
                ("title", &book.title),
                ("total", &book.total.to_string()),
            ],
        );
        Ok(book)
    }

    pub fn update_book(&self, id: u32, changes: BookUpdate) -> LedgerResult<Book> {
        let changes = BookUpdate {
            title: trimmed(changes.title),
            author: trimmed(changes.author),
            ..changes
        };
        let book = rejected("update_book", self.books.update(id, changes, self.now()))?;
        log_event_with_fields(
            Event::BookUpdated,
            &[
                ("book_id", &book.id.to_string()),
                ("total", &book.total.to_string()),
                ("available", &book.available.to_string()),
            ],
        );
        Ok(book)
    }

    pub fn delete_book(&self, id: u32) -> LedgerResult<Book> {
        let book = rejected(
            "delete_book",
            self.books.soft_delete(id, &self.loans, self.now()),
        )?;
        log_event_with_fields(Event::BookDeleted, &[("book_id", &book.id.to_string())]);
        Ok(book)
    }

    /// Book with `id`, active or not.
    pub fn book(&self, id: u32) -> LedgerResult<Book> {
        rejected("show_book", self.books.get(id))
    }

    pub fn list_books(&self, include_inactive: bool) -> LedgerResult<Vec<Book>> {
        self.books.list_all(include_inactive)
    }

    pub fn search_books(&self, filter: &BookFilter) -> LedgerResult<Vec<Book>> {
        self.books.search(filter)
    }

    // ---------------------------------------------------------------------
    // Members
    // ---------------------------------------------------------------------

    pub fn add_member(&self, name: &str, phone: &str, address: &str) -> LedgerResult<Member> {
        let result = require_text("name", name).and_then(|_| {
            self.members
                .create(name.trim(), phone.trim(), address.trim(), self.now())
        });
        let member = rejected("add_member", result)?;

        log_event_with_fields(
            Event::MemberCreated,
            &[("member_id", &member.id.to_string()), ("name", &member.name)],
        );
        Ok(member)
    }

    pub fn update_member(&self, id: u32, changes: MemberUpdate) -> LedgerResult<Member> {
        let changes = MemberUpdate {
            name: trimmed(changes.name),
            phone: trimmed(changes.phone),
            address: trimmed(changes.address),
        };
        let member = rejected("update_member", self.members.update(id, changes, self.now()))?;
        log_event_with_fields(Event::MemberUpdated, &[("member_id", &member.id.to_string())]);
        Ok(member)
    }

    pub fn delete_member(&self, id: u32) -> LedgerResult<Member> {
        let member = rejected(
            "delete_member",
            self.members.soft_delete(id, &self.loans, self.now()),
        )?;
        log_event_with_fields(Event::MemberDeleted, &[("member_id", &member.id.to_string())]);
        Ok(member)
    }

    pub fn member(&self, id: u32) -> LedgerResult<Member> {
        rejected("show_member", self.members.get(id))
    }

    pub fn list_members(&self, include_inactive: bool) -> LedgerResult<Vec<Member>> {
        self.members.list_all(include_inactive)
    }

    pub fn search_members(&self, filter: &MemberFilter) -> LedgerResult<Vec<Member>> {
        self.members.search(filter)
    }

    // ---------------------------------------------------------------------
    // Loans
    // ---------------------------------------------------------------------

    pub fn borrow(&self, book_id: u32, member_id: u32) -> LedgerResult<LoanReceipt> {
        let receipt = rejected(
            "borrow",
            self.loans
                .borrow(&self.books, &self.members, book_id, member_id, self.now()),
        )?;

        log_event_with_fields(
            Event::LoanOpened,
            &[
                ("loan_id", &receipt.loan.id.to_string()),
                ("book_id", &book_id.to_string()),
                ("member_id", &member_id.to_string()),
            ],
        );
        if let Some(book) = &receipt.book {
            log_availability(book);
        }
        Ok(receipt)
    }

    pub fn return_loan(&self, loan_id: u32) -> LedgerResult<LoanReceipt> {
        let receipt = rejected(
            "return",
            self.loans.return_loan(&self.books, loan_id, self.now()),
        )?;

        log_event_with_fields(
            Event::LoanClosed,
            &[
                ("loan_id", &receipt.loan.id.to_string()),
                ("return_ts", &receipt.loan.return_ts.to_string()),
            ],
        );
        match &receipt.book {
            Some(book) => log_availability(book),
            None => log_event_with_fields(
                Event::LoanBookMissing,
                &[
                    ("loan_id", &receipt.loan.id.to_string()),
                    ("book_id", &receipt.loan.book_id.to_string()),
                ],
            ),
        }
        Ok(receipt)
    }

    pub fn loan(&self, id: u32) -> LedgerResult<Loan> {
        rejected("show_loan", self.loans.get(id))
    }

    pub fn list_loans(&self) -> LedgerResult<Vec<Loan>> {
        self.loans.list_all()
    }

    pub fn open_loans(&self) -> LedgerResult<Vec<Loan>> {
        self.loans.list_open()
    }

    pub fn loans_by_member(&self, member_id: u32) -> LedgerResult<Vec<Loan>> {
        self.loans.list_by_member(member_id)
    }

    pub fn loans_by_book(&self, book_id: u32) -> LedgerResult<Vec<Loan>> {
        self.loans.list_by_book(book_id)
    }

    // ---------------------------------------------------------------------
    // Report and repair
    // ---------------------------------------------------------------------

    /// Aggregates all books, members and loans, including inactive ones.
    pub fn report(&self) -> LedgerResult<LibraryReport> {
        let books = self.books.list_all(true)?;
        let members = self.members.list_all(true)?;
        let loans = self.loans.list_all()?;
        Ok(aggregate(&books, &members, &loans))
    }

    /// Renders the text report, writes it to the configured report file and
    /// returns it.
    pub fn write_report(&self) -> LedgerResult<String> {
        let report = self.report()?;
        let generated_at = Utc
            .timestamp_opt(i64::from(self.now()), 0)
            .single()
            .unwrap_or_else(Utc::now);
        let text = render_text(&report, generated_at);

        let path = self.config.report_path();
        fs::write(&path, &text).map_err(|e| {
            StorageError::at(
                StorageErrorCode::ShelfStorageWriteFailed,
                "failed to write report",
                &path,
                e,
            )
        })?;

        log_event_with_fields(
            Event::ReportGenerated,
            &[
                ("path", &path.display().to_string()),
                ("members", &report.history.len().to_string()),
            ],
        );
        Ok(text)
    }

    /// Recomputes every book's availability from open loans.
    pub fn reconcile(&self, dry_run: bool) -> LedgerResult<ReconcileReport> {
        log_event_with_fields(
            Event::ReconcileStart,
            &[("dry_run", if dry_run { "true" } else { "false" })],
        );

        let report = reconcile_availability(&self.books, &self.loans, self.now(), dry_run)?;
        for fix in &report.corrections {
            log_event_with_fields(
                Event::ReconcileCorrection,
                &[
                    ("book_id", &fix.book_id.to_string()),
                    ("before", &fix.before.to_string()),
                    ("after", &fix.after.to_string()),
                    ("open_loans", &fix.open_loans.to_string()),
                ],
            );
        }

        log_event_with_fields(
            Event::ReconcileComplete,
            &[
                ("books_checked", &report.books_checked.to_string()),
                ("corrections", &report.corrections.len().to_string()),
            ],
        );
        Ok(report)
    }
}

fn require_text(field: &str, value: &str) -> LedgerResult<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::invalid_input(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

fn log_availability(book: &Book) {
    log_event_with_fields(
        Event::AvailabilityAdjusted,
        &[
            ("book_id", &book.id.to_string()),
            ("available", &book.available.to_string()),
            ("total", &book.total.to_string()),
        ],
    );
}

/// Logs domain rejections; storage errors pass through untouched.
fn rejected<T>(operation: &str, result: LedgerResult<T>) -> LedgerResult<T> {
    if let Err(e) = &result {
        if e.is_rejection() {
            log_event_with_fields(
                Event::OperationRejected,
                &[
                    ("operation", operation),
                    ("code", e.code()),
                    ("reason", &e.to_string()),
                ],
            );
        }
    }
    result
}
