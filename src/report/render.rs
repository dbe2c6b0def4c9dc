//! Plain-text report
//!
//! Fixed-width ASCII for human reading; nothing parses it back.

use chrono::{DateTime, TimeZone, Utc};

use super::aggregate::LibraryReport;

const RULE: &str = "+---------+------------------------------+------------+---------------------------+------------+------------+----------+";
const HEADER: &str = "|MemberID | Member Name                  | Phone      | Title                     | Loan Date  | Return Date| Status   |";
const EMPTY_ROW: &str = "|    -    | -                            | -          | -                         |     -      |     -      |   -      |";

/// Width of the joined title column
pub const TITLES_WIDTH: usize = 27;

/// `%Y-%m-%d` in UTC; `0` is rendered as `-`.
pub fn format_date(ts: u32) -> String {
    if ts == 0 {
        return "-".to_string();
    }
    match Utc.timestamp_opt(i64::from(ts), 0).single() {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    }
}

/// Renders the report stamped with `generated_at`.
pub fn render_text(report: &LibraryReport, generated_at: DateTime<Utc>) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("Library Borrow System - Report".into());
    lines.push(format!(
        "Generated At : {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    lines.push(format!("App Version  : {}", env!("CARGO_PKG_VERSION")));
    lines.push("Encoding     : UTF-8\n".into());

    lines.push("Borrow History".into());
    lines.push(RULE.into());
    lines.push(HEADER.into());
    lines.push(RULE.into());

    if report.history.is_empty() {
        lines.push(EMPTY_ROW.into());
    }
    for row in &report.history {
        let (id, name, phone) = match &row.member {
            Some(m) => (m.id.to_string(), or_dash(&m.name), or_dash(&m.phone)),
            None => ("-".to_string(), "-", "-"),
        };
        let titles: String = row.titles.join("; ").chars().take(TITLES_WIDTH).collect();

        lines.push(format!(
            "|{:<9}|{:<30}|{:<12}|{:<27}|{:<12}|{:<12}|{:<10}|",
            id,
            name,
            phone,
            titles,
            format_date(row.first_borrow_ts),
            format_date(row.first_return_ts),
            row.first_state.as_str(),
        ));
    }
    lines.push(format!("{}\n", RULE));

    let s = &report.summary;
    lines.push("Summary (Active Books Only)".into());
    lines.push(format!("- Total Books       : {}", s.total_books));
    lines.push(format!("- Active Books      : {}", s.active_books));
    lines.push(format!("- Deleted Books     : {}", s.deleted_books));
    lines.push(format!("- Borrowed Now      : {}", s.borrowed_now));
    lines.push(format!("- Available Now     : {}\n", s.available_now));

    let st = &report.stats;
    lines.push("Borrow Statistics (Active only)".into());
    match &st.most_borrowed {
        Some(most) => lines.push(format!(
            "- Most Borrowed Book : {} ({} times)",
            most.title.as_deref().unwrap_or("-"),
            most.times
        )),
        None => lines.push("- Most Borrowed Book : None".into()),
    }
    lines.push(format!("- Currently Borrowed : {}", st.currently_borrowed));
    lines.push(format!("- Active Members     : {}", st.active_members));

    lines.join("\n")
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Book, Loan, Member};
    use crate::report::aggregate;

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(0), "-");
        assert_eq!(format_date(86_400), "1970-01-02");
        assert_eq!(format_date(1_709_296_200), "2024-03-01");
    }

    #[test]
    fn test_empty_report_has_placeholder_row() {
        let text = render_text(&aggregate(&[], &[], &[]), stamp());
        assert!(text.starts_with("Library Borrow System - Report\nGenerated At : 2024-03-01 12:30:00"));
        assert!(text.contains(EMPTY_ROW));
        assert!(text.contains("- Most Borrowed Book : None"));
        assert!(text.ends_with("- Active Members     : 0"));
    }

    #[test]
    fn test_history_row_layout() {
        let books = [Book::new(1, "Dune", "Herbert", 1965, 2, 1)];
        let members = [Member::new(4, "Ada", "555-0100", "", 1)];
        let loans = [Loan::open(1, 1, 4, 86_400)];

        let text = render_text(&aggregate(&books, &members, &loans), stamp());
        let row = text
            .lines()
            .find(|l| l.starts_with("|4 "))
            .unwrap();
        assert_eq!(row.chars().count(), RULE.chars().count());
        assert!(row.contains("|Dune                       |1970-01-02  |-           |Borrowed  |"));
        assert!(text.contains("- Most Borrowed Book : Dune (1 times)"));
    }

    #[test]
    fn test_titles_are_cut_to_column_width() {
        let books = [
            Book::new(1, "The Left Hand of Darkness", "Le Guin", 1969, 1, 1),
            Book::new(2, "Solaris", "Lem", 1961, 1, 1),
        ];
        let loans = [Loan::open(1, 1, 9, 10), Loan::open(2, 2, 9, 11)];

        let text = render_text(&aggregate(&books, &[], &loans), stamp());
        assert!(text.contains("|-        |-                             |-           |The Left Hand of Darkness; |"));
    }
}
