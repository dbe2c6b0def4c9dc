//! Keyword filters over listings
//!
//! Substring matches are case-insensitive; an unset criterion matches
//! everything.

use std::str::FromStr;

use super::errors::LedgerError;
use crate::model::{Book, Member};

/// Which side of the soft-delete flag to include
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    Active,
    Deleted,
    #[default]
    Any,
}

impl StatusFilter {
    pub fn matches(&self, active: bool) -> bool {
        match self {
            StatusFilter::Active => active,
            StatusFilter::Deleted => !active,
            StatusFilter::Any => true,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(StatusFilter::Active),
            "deleted" => Ok(StatusFilter::Deleted),
            "" | "any" | "all" => Ok(StatusFilter::Any),
            other => Err(LedgerError::invalid_input(format!(
                "status must be active, deleted or any, got '{}'",
                other
            ))),
        }
    }
}

fn contains_ci(haystack: &str, needle: &Option<String>) -> bool {
    match needle {
        Some(n) if !n.is_empty() => haystack.to_lowercase().contains(&n.to_lowercase()),
        _ => true,
    }
}

#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<u16>,
    pub status: StatusFilter,
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        contains_ci(&book.title, &self.title)
            && contains_ci(&book.author, &self.author)
            && self.year.map_or(true, |y| book.year == y)
            && self.status.matches(book.active)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemberFilter {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: StatusFilter,
}

impl MemberFilter {
    pub fn matches(&self, member: &Member) -> bool {
        contains_ci(&member.name, &self.name)
            && contains_ci(&member.phone, &self.phone)
            && contains_ci(&member.address, &self.address)
            && self.status.matches(member.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("Active".parse::<StatusFilter>().unwrap(), StatusFilter::Active);
        assert_eq!("deleted".parse::<StatusFilter>().unwrap(), StatusFilter::Deleted);
        assert_eq!("".parse::<StatusFilter>().unwrap(), StatusFilter::Any);
        assert!(matches!(
            "gone".parse::<StatusFilter>(),
            Err(LedgerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_book_filter_case_insensitive() {
        let book = Book::new(1, "Dune Messiah", "Frank Herbert", 1969, 1, 0);
        let filter = BookFilter {
            title: Some("MESSIAH".into()),
            author: Some("herb".into()),
            ..Default::default()
        };
        assert!(filter.matches(&book));
    }

    #[test]
    fn test_book_filter_year_and_status() {
        let mut book = Book::new(1, "Dune", "Herbert", 1965, 1, 0);
        let filter = BookFilter {
            year: Some(1965),
            status: StatusFilter::Deleted,
            ..Default::default()
        };
        assert!(!filter.matches(&book));
        book.active = false;
        assert!(filter.matches(&book));
    }

    #[test]
    fn test_member_filter() {
        let member = Member::new(1, "Ada Lovelace", "555-0100", "London", 0);
        let hit = MemberFilter {
            address: Some("lond".into()),
            status: StatusFilter::Active,
            ..Default::default()
        };
        let miss = MemberFilter {
            phone: Some("999".into()),
            ..Default::default()
        };
        assert!(hit.matches(&member));
        assert!(!miss.matches(&member));
    }
}
