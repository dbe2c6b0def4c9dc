//! Property tests for the fixed-record codec and identifier derivation

use proptest::prelude::*;
use shelfdb::model::{Book, Loan, Member, AUTHOR_LEN, TITLE_LEN};
use shelfdb::storage::{pack_fixed_str, unpack_fixed_str, FixedRecord, RecordStore};
use tempfile::TempDir;

/// Longest prefix of `s` that fits in `width` bytes without splitting a
/// character.
fn fitting_prefix(s: &str, width: usize) -> &str {
    let mut end = s.len().min(width);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Text without NUL, which would end the field early
fn arb_text(max_chars: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<char>().prop_filter("no NUL", |c| *c != '\0'), 0..max_chars)
        .prop_map(|chars| chars.into_iter().collect())
}

fn arb_book() -> impl Strategy<Value = Book> {
    (
        any::<u32>(),
        arb_text(TITLE_LEN),
        arb_text(AUTHOR_LEN),
        any::<u16>(),
        any::<u16>(),
        any::<u16>(),
        any::<bool>(),
        any::<u32>(),
    )
        .prop_map(
            |(id, title, author, year, total, available, active, last_modified)| Book {
                id,
                title,
                author,
                year,
                total,
                available,
                active,
                last_modified,
            },
        )
}

proptest! {
    /// Decoding yields the longest whole-character prefix that fits.
    #[test]
    fn prop_fixed_str_truncates_on_char_boundary(s in arb_text(40), width in 0usize..64) {
        let mut field = vec![0u8; width];
        pack_fixed_str(&s, &mut field);
        prop_assert_eq!(unpack_fixed_str(&field), fitting_prefix(&s, width));
    }

    /// Strings that fit come back unchanged.
    #[test]
    fn prop_fixed_str_round_trips_when_it_fits(s in "[a-zA-Z0-9 ]{0,20}") {
        let mut field = [0u8; 20];
        pack_fixed_str(&s, &mut field);
        prop_assert_eq!(unpack_fixed_str(&field), s);
    }

    /// Book blocks decode to the book after string truncation.
    #[test]
    fn prop_book_decode_after_encode(book in arb_book()) {
        let block = book.encode();
        prop_assert_eq!(block.len(), Book::SIZE);

        let decoded = Book::decode(&block);
        let expected = Book {
            title: fitting_prefix(&book.title, TITLE_LEN).to_string(),
            author: fitting_prefix(&book.author, AUTHOR_LEN).to_string(),
            ..book.clone()
        };
        prop_assert_eq!(decoded, expected);
    }

    /// Loans have no string fields and round-trip exactly.
    #[test]
    fn prop_loan_decode_after_encode(
        ids in any::<(u32, u32, u32)>(),
        stamps in any::<(u32, u32, u32)>(),
        active in any::<bool>(),
    ) {
        let loan = Loan {
            id: ids.0,
            book_id: ids.1,
            member_id: ids.2,
            borrow_ts: stamps.0,
            return_ts: stamps.1,
            active,
            last_modified: stamps.2,
        };
        prop_assert_eq!(Loan::decode(&loan.encode()), loan);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Sequential creates yield 1, 2, 3, ... regardless of content.
    #[test]
    fn prop_identifiers_are_sequential(names in proptest::collection::vec(arb_text(10), 1..12)) {
        let dir = TempDir::new().unwrap();
        let store: RecordStore<Member> = RecordStore::open(dir.path().join("members.bin")).unwrap();

        for (i, name) in names.iter().enumerate() {
            let id = store.next_identifier().unwrap();
            prop_assert_eq!(id as usize, i + 1);
            store.append(&Member::new(id, name, "", "", 1)).unwrap();
        }
        prop_assert_eq!(store.len().unwrap() as usize, names.len());
    }
}
