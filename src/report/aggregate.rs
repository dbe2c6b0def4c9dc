//! Report aggregation
//!
//! Pure join of the three full listings (inactive and closed included).
//! History is grouped by member identifier in first-encountered loan order.
//!
//! Each history row carries every borrowed title, but its dates and status
//! come from the member's first loan only. That is a known limitation
//! carried over unchanged; `HistoryRow::loans` holds the full count so a
//! reader can tell when the row under-reports.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::{Book, Loan, LoanState, Member};

/// Borrow history for one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRow {
    pub member_id: u32,
    /// `None` if no member record carries this identifier
    pub member: Option<Member>,
    /// Title per loan, in loan order; `-` where the book record is missing
    pub titles: Vec<String>,
    pub loans: usize,
    pub first_borrow_ts: u32,
    pub first_return_ts: u32,
    pub first_state: LoanState,
}

/// Book and loan counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_books: usize,
    pub active_books: usize,
    pub deleted_books: usize,
    /// Open loans
    pub borrowed_now: usize,
    /// Sum of `available` over active books
    pub available_now: u64,
}

/// The book with the most loans
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MostBorrowed {
    pub book_id: u32,
    pub title: Option<String>,
    pub times: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BorrowStats {
    pub most_borrowed: Option<MostBorrowed>,
    pub currently_borrowed: usize,
    pub active_members: usize,
}

/// Denormalized borrowing history plus summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LibraryReport {
    pub history: Vec<HistoryRow>,
    pub summary: Summary,
    pub stats: BorrowStats,
}

/// Joins books, members and loans by identifier.
pub fn aggregate(books: &[Book], members: &[Member], loans: &[Loan]) -> LibraryReport {
    let book_map: HashMap<u32, &Book> = first_by_id(books.iter().map(|b| (b.id, b)));
    let member_map: HashMap<u32, &Member> = first_by_id(members.iter().map(|m| (m.id, m)));

    let mut history: Vec<HistoryRow> = Vec::new();
    let mut row_of: HashMap<u32, usize> = HashMap::new();

    for loan in loans {
        let title = book_map
            .get(&loan.book_id)
            .map(|b| b.title.clone())
            .unwrap_or_else(|| "-".to_string());

        match row_of.get(&loan.member_id) {
            Some(&i) => {
                let row = &mut history[i];
                row.titles.push(title);
                row.loans += 1;
            }
            None => {
                row_of.insert(loan.member_id, history.len());
                history.push(HistoryRow {
                    member_id: loan.member_id,
                    member: member_map.get(&loan.member_id).map(|m| (*m).clone()),
                    titles: vec![title],
                    loans: 1,
                    first_borrow_ts: loan.borrow_ts,
                    first_return_ts: loan.return_ts,
                    first_state: loan.state(),
                });
            }
        }
    }

    let active_books = books.iter().filter(|b| b.active).count();
    let borrowed_now = loans.iter().filter(|l| l.is_open()).count();
    let summary = Summary {
        total_books: books.len(),
        active_books,
        deleted_books: books.len() - active_books,
        borrowed_now,
        available_now: books
            .iter()
            .filter(|b| b.active)
            .map(|b| u64::from(b.available))
            .sum(),
    };

    let stats = BorrowStats {
        most_borrowed: most_borrowed(loans).map(|(book_id, times)| MostBorrowed {
            book_id,
            title: book_map.get(&book_id).map(|b| b.title.clone()),
            times,
        }),
        currently_borrowed: borrowed_now,
        active_members: members.iter().filter(|m| m.active).count(),
    };

    LibraryReport {
        history,
        summary,
        stats,
    }
}

/// Book with the highest loan count; ties go to the book whose first loan
/// appears earliest.
fn most_borrowed(loans: &[Loan]) -> Option<(u32, usize)> {
    let mut order: Vec<u32> = Vec::new();
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for loan in loans {
        let count = counts.entry(loan.book_id).or_insert(0);
        if *count == 0 {
            order.push(loan.book_id);
        }
        *count += 1;
    }

    let mut best: Option<(u32, usize)> = None;
    for id in order {
        let times = counts.get(&id).copied().unwrap_or(0);
        if best.map_or(true, |(_, t)| times > t) {
            best = Some((id, times));
        }
    }
    best
}

/// Identifier map keeping the first record per identifier, matching the
/// ledgers' first-match lookup.
fn first_by_id<'a, T: 'a>(items: impl Iterator<Item = (u32, &'a T)>) -> HashMap<u32, &'a T> {
    let mut map = HashMap::new();
    for (id, item) in items {
        map.entry(id).or_insert(item);
    }
    map
}
