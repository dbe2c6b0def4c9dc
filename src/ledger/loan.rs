//! Loan ledger and the borrow/return state machine
//!
//! ```text
//! borrow ──► Open (return_ts = 0) ──return──► Closed (return_ts > 0)
//! ```
//!
//! `Open -> Closed` is the only transition. Borrow and return each make two
//! separate durable writes, loan record first and book counter second, with
//! no transaction around them. A crash between the two leaves the counter
//! off by one; `Library::reconcile` recomputes it from the loan file on
//! request.

use std::collections::HashMap;

use serde::Serialize;

use super::book::BookLedger;
use super::errors::{Entity, LedgerError, LedgerResult};
use super::member::MemberLedger;
use crate::crash_point::{maybe_crash, points};
use crate::model::{Book, Loan};
use crate::storage::RecordStore;

/// Outcome of a borrow or return: the loan as written, and the book
/// counter as written (absent if the book record no longer exists).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanReceipt {
    pub loan: Loan,
    pub book: Option<Book>,
}

/// Loan ledger over `loans.bin`
#[derive(Debug, Clone)]
pub struct LoanLedger {
    store: RecordStore<Loan>,
}

impl LoanLedger {
    pub fn new(store: RecordStore<Loan>) -> Self {
        Self { store }
    }

    /// Borrows one copy of an active book for an active member.
    ///
    /// Preconditions: the book exists, is active and has `available > 0`;
    /// the member exists and is active. Appends the open loan, then
    /// decrements the book's availability.
    pub fn borrow(
        &self,
        books: &BookLedger,
        members: &MemberLedger,
        book_id: u32,
        member_id: u32,
        now: u32,
    ) -> LedgerResult<LoanReceipt> {
        let book = books.get_active(book_id)?;
        if book.available == 0 {
            return Err(LedgerError::precondition(format!(
                "book {} has no available copies",
                book_id
            )));
        }
        members.get_active(member_id)?;

        let loan = self.open(book_id, member_id, now)?;
        maybe_crash(points::BORROW_AFTER_LOAN_APPEND);
        let book = books.decrement_available(book_id, now)?;

        Ok(LoanReceipt {
            loan,
            book: Some(book),
        })
    }

    /// Closes an open loan, then puts the copy back on the shelf.
    ///
    /// A closed or unknown loan is rejected before anything is written.
    pub fn return_loan(&self, books: &BookLedger, loan_id: u32, now: u32) -> LedgerResult<LoanReceipt> {
        let loan = self.close(loan_id, now)?;
        maybe_crash(points::RETURN_AFTER_LOAN_CLOSE);

        let book = match books.find_by_id(loan.book_id)? {
            Some(_) => Some(books.increment_available(loan.book_id, now)?),
            None => None,
        };

        Ok(LoanReceipt { loan, book })
    }

    /// Appends a new open loan without any referential check.
    pub fn open(&self, book_id: u32, member_id: u32, now: u32) -> LedgerResult<Loan> {
        let id = self.store.next_identifier()?;
        let loan = Loan::open(id, book_id, member_id, now);
        self.store.append(&loan)?;
        Ok(loan)
    }

    /// Sets the return timestamp of an open loan in place.
    pub fn close(&self, loan_id: u32, now: u32) -> LedgerResult<Loan> {
        let (index, current) = self
            .store
            .find_by_id(loan_id)?
            .ok_or_else(|| LedgerError::not_found(Entity::Loan, loan_id))?;

        if !current.is_open() {
            return Err(LedgerError::precondition(format!(
                "loan {} was already returned",
                loan_id
            )));
        }

        let closed = Loan {
            return_ts: now.max(1),
            last_modified: now,
            ..current
        };
        self.store.write_at(index, &closed)?;
        Ok(closed)
    }

    pub fn find_by_id(&self, id: u32) -> LedgerResult<Option<Loan>> {
        Ok(self.store.find_by_id(id)?.map(|(_, l)| l))
    }

    pub fn get(&self, id: u32) -> LedgerResult<Loan> {
        self.find_by_id(id)?
            .ok_or_else(|| LedgerError::not_found(Entity::Loan, id))
    }

    /// Every loan, open and closed.
    pub fn list_all(&self) -> LedgerResult<Vec<Loan>> {
        Ok(self.store.list(true)?)
    }

    pub fn list_open(&self) -> LedgerResult<Vec<Loan>> {
        self.filtered(|l| l.is_open())
    }

    pub fn list_by_member(&self, member_id: u32) -> LedgerResult<Vec<Loan>> {
        self.filtered(|l| l.member_id == member_id)
    }

    pub fn list_by_book(&self, book_id: u32) -> LedgerResult<Vec<Loan>> {
        self.filtered(|l| l.book_id == book_id)
    }

    pub fn has_open_for_book(&self, book_id: u32) -> LedgerResult<bool> {
        Ok(self
            .store
            .find(|l| l.book_id == book_id && l.is_open())?
            .is_some())
    }

    pub fn has_open_for_member(&self, member_id: u32) -> LedgerResult<bool> {
        Ok(self
            .store
            .find(|l| l.member_id == member_id && l.is_open())?
            .is_some())
    }

    /// Open loan count per book identifier.
    pub fn open_counts_by_book(&self) -> LedgerResult<HashMap<u32, u32>> {
        let mut counts = HashMap::new();
        for loan in self.list_open()? {
            *counts.entry(loan.book_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    fn filtered<P>(&self, pred: P) -> LedgerResult<Vec<Loan>>
    where
        P: Fn(&Loan) -> bool,
    {
        Ok(self.list_all()?.into_iter().filter(|l| pred(l)).collect())
    }
}
