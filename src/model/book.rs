//! Book record

use serde::Serialize;

use crate::storage::{ActiveFlag, FieldReader, FieldWriter, FixedRecord};

/// Title field width in bytes
pub const TITLE_LEN: usize = 60;
/// Author field width in bytes
pub const AUTHOR_LEN: usize = 40;

/// A catalogued title and its copy counters.
///
/// `available` counts copies on the shelf; `total - available` copies are
/// out on open loans, unless `total` was reduced below that number, in
/// which case `available` is clamped at 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub id: u32,
    pub title: String,
    pub author: String,
    pub year: u16,
    pub total: u16,
    pub available: u16,
    pub active: bool,
    pub last_modified: u32,
}

impl Book {
    /// A new active book with every copy available.
    pub fn new(
        id: u32,
        title: impl Into<String>,
        author: impl Into<String>,
        year: u16,
        total: u16,
        now: u32,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            year,
            total,
            available: total,
            active: true,
            last_modified: now,
        }
    }

    /// Copies currently out, as implied by the counters.
    pub fn borrowed(&self) -> u16 {
        self.total.saturating_sub(self.available)
    }
}

impl FixedRecord for Book {
    const SIZE: usize = 4 + TITLE_LEN + AUTHOR_LEN + 2 + 2 + 2 + 1 + 1 + 4;

    fn id(&self) -> u32 {
        self.id
    }

    fn encode_into(&self, buf: &mut [u8]) {
        let mut w = FieldWriter::new(buf);
        w.put_u32(self.id);
        w.put_str(&self.title, TITLE_LEN);
        w.put_str(&self.author, AUTHOR_LEN);
        w.put_u16(self.year);
        w.put_u16(self.total);
        w.put_u16(self.available);
        w.put_bool(self.active);
        w.pad(1);
        w.put_u32(self.last_modified);
    }

    fn decode(buf: &[u8]) -> Self {
        let mut r = FieldReader::new(buf);
        let id = r.get_u32();
        let title = r.get_str(TITLE_LEN);
        let author = r.get_str(AUTHOR_LEN);
        let year = r.get_u16();
        let total = r.get_u16();
        let available = r.get_u16();
        let active = r.get_bool();
        r.skip(1);
        let last_modified = r.get_u32();
        Self {
            id,
            title,
            author,
            year,
            total,
            available,
            active,
            last_modified,
        }
    }
}

impl ActiveFlag for Book {
    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_size() {
        assert_eq!(Book::SIZE, 116);
    }

    #[test]
    fn test_new_book_is_fully_available() {
        let book = Book::new(1, "Dune", "Herbert", 1965, 2, 100);
        assert_eq!(book.available, 2);
        assert!(book.active);
        assert_eq!(book.borrowed(), 0);
    }

    #[test]
    fn test_round_trip() {
        let book = Book {
            available: 1,
            active: false,
            ..Book::new(42, "Dune", "Frank Herbert", 1965, 3, 1_700_000_000)
        };
        let block = book.encode();
        assert_eq!(block.len(), Book::SIZE);
        assert_eq!(Book::decode(&block), book);
    }

    #[test]
    fn test_field_offsets() {
        let book = Book::new(0x0102_0304, "T", "A", 0x0506, 7, 0x0A0B_0C0D);
        let block = book.encode();
        assert_eq!(&block[0..4], &[4, 3, 2, 1]);
        assert_eq!(block[4], b'T');
        assert_eq!(block[64], b'A');
        assert_eq!(&block[104..106], &[6, 5]);
        assert_eq!(&block[106..108], &[7, 0]);
        assert_eq!(&block[108..110], &[7, 0]);
        assert_eq!(block[110], 1);
        assert_eq!(block[111], 0);
        assert_eq!(&block[112..116], &[0x0D, 0x0C, 0x0B, 0x0A]);
    }

    #[test]
    fn test_long_title_truncated_at_field_width() {
        let title = "x".repeat(TITLE_LEN + 10);
        let book = Book::new(1, title, "A", 2000, 1, 0);
        let decoded = Book::decode(&book.encode());
        assert_eq!(decoded.title.len(), TITLE_LEN);
        assert_eq!(decoded.author, "A");
    }
}
