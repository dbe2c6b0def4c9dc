//! Report Aggregator
//!
//! Read-only: [`aggregate`] joins the three listings into a
//! [`LibraryReport`]; [`render_text`] lays it out for people.

mod aggregate;
mod render;

pub use aggregate::{aggregate, BorrowStats, HistoryRow, LibraryReport, MostBorrowed, Summary};
pub use render::{format_date, render_text, TITLES_WIDTH};
