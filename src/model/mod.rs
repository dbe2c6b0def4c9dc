//! Entity value types and their on-disk layouts
//!
//! | Entity | Fields in file order | Size |
//! |---|---|---|
//! | Book | id u32, title 60B, author 40B, year u16, total u16, available u16, active u8 + 1B pad, last_modified u32 | 116 |
//! | Member | id u32, name 60B, phone 20B, address 100B, active u8 + 3B pad, last_modified u32 | 192 |
//! | Loan | id u32, book_id u32, member_id u32, borrow_ts u32, return_ts u32, active u8 + 3B pad, last_modified u32 | 28 |
//!
//! All integers are little-endian; timestamps are Unix seconds.

mod book;
mod loan;
mod member;

pub use book::{Book, AUTHOR_LEN, TITLE_LEN};
pub use loan::{Loan, LoanState};
pub use member::{Member, ADDRESS_LEN, NAME_LEN, PHONE_LEN};
