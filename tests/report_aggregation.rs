//! Report tests over a populated library
//!
//! The history row's dates and status come from each member's first loan
//! only; these tests pin that behavior.

use shelfdb::config::LibraryConfig;
use shelfdb::ledger::{Library, ManualClock};
use shelfdb::model::LoanState;
use std::fs;
use tempfile::TempDir;

// 2024-01-01T00:00:00Z
const JAN_1: u32 = 1_704_067_200;
const DAY: u32 = 86_400;

fn populated() -> (TempDir, Library, ManualClock) {
    let temp_dir = TempDir::new().unwrap();
    let clock = ManualClock::new(JAN_1);
    let lib = Library::open_with_clock(
        LibraryConfig::with_data_dir(temp_dir.path()),
        Box::new(clock.clone()),
    )
    .unwrap();

    lib.add_book("Dune", "Herbert", 1965, 2).unwrap();
    lib.add_book("Emma", "Austen", 1815, 1).unwrap();
    lib.add_book("Ulysses", "Joyce", 1922, 1).unwrap();
    lib.add_member("Ada", "555-0100", "1 Main St").unwrap();
    lib.add_member("Bo", "555-0101", "2 Main St").unwrap();

    // Ada: Dune (returned on Jan 3), then Emma (still out)
    lib.borrow(1, 1).unwrap();
    clock.advance(2 * DAY);
    lib.return_loan(1).unwrap();
    lib.borrow(2, 1).unwrap();

    // Bo: Dune (still out)
    clock.advance(DAY);
    lib.borrow(1, 2).unwrap();

    lib.delete_book(3).unwrap();
    (temp_dir, lib, clock)
}

#[test]
fn test_history_grouped_per_member() {
    let (_dir, lib, _) = populated();
    let report = lib.report().unwrap();

    assert_eq!(report.history.len(), 2);
    let ada = &report.history[0];
    assert_eq!(ada.member_id, 1);
    assert_eq!(ada.titles, vec!["Dune", "Emma"]);
    assert_eq!(ada.loans, 2);
    assert_eq!(ada.first_borrow_ts, JAN_1);
    assert_eq!(ada.first_return_ts, JAN_1 + 2 * DAY);
    assert_eq!(ada.first_state, LoanState::Closed);

    let bo = &report.history[1];
    assert_eq!(bo.titles, vec!["Dune"]);
    assert_eq!(bo.first_state, LoanState::Open);
}

#[test]
fn test_summary_and_statistics() {
    let (_dir, lib, _) = populated();
    let report = lib.report().unwrap();

    assert_eq!(report.summary.total_books, 3);
    assert_eq!(report.summary.active_books, 2);
    assert_eq!(report.summary.deleted_books, 1);
    assert_eq!(report.summary.borrowed_now, 2);
    // Dune 1 of 2, Emma 0 of 1; deleted Ulysses not counted
    assert_eq!(report.summary.available_now, 1);

    let most = report.stats.most_borrowed.as_ref().unwrap();
    assert_eq!(most.book_id, 1);
    assert_eq!(most.times, 2);
    assert_eq!(report.stats.currently_borrowed, 2);
    assert_eq!(report.stats.active_members, 2);
}

#[test]
fn test_written_report_text() {
    let (dir, lib, _) = populated();
    let text = lib.write_report().unwrap();

    assert_eq!(fs::read_to_string(dir.path().join("report.txt")).unwrap(), text);
    assert!(text.contains("Generated At : 2024-01-04 00:00:00"));
    assert!(text.contains(
        "|1        |Ada                           |555-0100    |Dune; Emma                 |2024-01-01  |2024-01-03  |Returned  |"
    ));
    assert!(text.contains(
        "|2        |Bo                            |555-0101    |Dune                       |2024-01-04  |-           |Borrowed  |"
    ));
    assert!(text.contains("- Most Borrowed Book : Dune (2 times)"));
    assert!(text.contains("- Available Now     : 1\n"));
}

#[test]
fn test_report_includes_deleted_members() {
    let (_dir, lib, _) = populated();
    lib.return_loan(3).unwrap();
    lib.delete_member(2).unwrap();

    let report = lib.report().unwrap();
    assert_eq!(report.history.len(), 2);
    assert!(!report.history[1].member.as_ref().unwrap().active);
    assert_eq!(report.stats.active_members, 1);
}
