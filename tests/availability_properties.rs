//! Generated circulation sequences keep every book's counter within bounds
//!
//! With no crash between the two writes of a borrow or return, the counter
//! also equals `total - open loans` for that book.

use std::collections::HashMap;

use proptest::prelude::*;
use shelfdb::config::LibraryConfig;
use shelfdb::ledger::{BookUpdate, LedgerResult, Library, ManualClock};
use tempfile::TempDir;

#[derive(Debug, Clone)]
enum Step {
    AddBook(u16),
    AddMember,
    Borrow { book: u32, member: u32 },
    Return(u32),
    AddCopies { book: u32, extra: u16 },
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0u16..4).prop_map(Step::AddBook),
        Just(Step::AddMember),
        (1u32..6, 1u32..5).prop_map(|(book, member)| Step::Borrow { book, member }),
        (1u32..12).prop_map(Step::Return),
        (1u32..6, 0u16..3).prop_map(|(book, extra)| Step::AddCopies { book, extra }),
    ]
}

/// Runs one step; domain rejections are expected, storage failures are not.
fn apply(library: &Library, step: &Step) -> LedgerResult<()> {
    let result = match step {
        Step::AddBook(total) => library.add_book("Dune", "Herbert", 1965, *total).map(|_| ()),
        Step::AddMember => library.add_member("Ada", "", "").map(|_| ()),
        Step::Borrow { book, member } => library.borrow(*book, *member).map(|_| ()),
        Step::Return(loan) => library.return_loan(*loan).map(|_| ()),
        Step::AddCopies { book, extra } => library.book(*book).and_then(|current| {
            let changes = BookUpdate {
                total: Some(current.total.saturating_add(*extra)),
                ..Default::default()
            };
            library.update_book(*book, changes).map(|_| ())
        }),
    };
    match result {
        Err(e) if e.is_rejection() => Ok(()),
        other => other,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_available_never_exceeds_total(steps in proptest::collection::vec(arb_step(), 1..40)) {
        let dir = TempDir::new().unwrap();
        let clock = ManualClock::new(1_700_000_000);
        let library = Library::open_with_clock(
            LibraryConfig::with_data_dir(dir.path()),
            Box::new(clock.clone()),
        )
        .unwrap();

        for step in &steps {
            apply(&library, step).unwrap();
            clock.advance(1);

            let mut open: HashMap<u32, u16> = HashMap::new();
            for loan in library.open_loans().unwrap() {
                *open.entry(loan.book_id).or_default() += 1;
            }

            for book in library.list_books(true).unwrap() {
                prop_assert!(book.available <= book.total, "{:?} after {:?}", book, step);
                let borrowed = open.get(&book.id).copied().unwrap_or(0);
                prop_assert_eq!(book.available + borrowed, book.total);
            }
        }
    }
}
