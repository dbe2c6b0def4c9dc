//! Loan record and its lifecycle state

use serde::Serialize;

use crate::storage::{ActiveFlag, FieldReader, FieldWriter, FixedRecord};

/// Loan lifecycle. `Open -> Closed` is the only transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanState {
    /// Borrowed, not yet returned (`return_ts == 0`)
    Open,
    /// Returned (`return_ts > 0`)
    Closed,
}

impl LoanState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanState::Open => "Borrowed",
            LoanState::Closed => "Returned",
        }
    }
}

/// One borrow transaction of one book by one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Loan {
    pub id: u32,
    pub book_id: u32,
    pub member_id: u32,
    pub borrow_ts: u32,
    /// 0 while the book is out
    pub return_ts: u32,
    pub active: bool,
    pub last_modified: u32,
}

impl Loan {
    /// A new open loan borrowed at `now`, clamped to at least 1.
    pub fn open(id: u32, book_id: u32, member_id: u32, now: u32) -> Self {
        Self {
            id,
            book_id,
            member_id,
            borrow_ts: now.max(1),
            return_ts: 0,
            active: true,
            last_modified: now,
        }
    }

    pub fn state(&self) -> LoanState {
        if self.return_ts == 0 {
            LoanState::Open
        } else {
            LoanState::Closed
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == LoanState::Open
    }
}

impl FixedRecord for Loan {
    const SIZE: usize = 4 * 5 + 1 + 3 + 4;

    fn id(&self) -> u32 {
        self.id
    }

    fn encode_into(&self, buf: &mut [u8]) {
        let mut w = FieldWriter::new(buf);
        w.put_u32(self.id);
        w.put_u32(self.book_id);
        w.put_u32(self.member_id);
        w.put_u32(self.borrow_ts);
        w.put_u32(self.return_ts);
        w.put_bool(self.active);
        w.pad(3);
        w.put_u32(self.last_modified);
    }

    fn decode(buf: &[u8]) -> Self {
        let mut r = FieldReader::new(buf);
        let id = r.get_u32();
        let book_id = r.get_u32();
        let member_id = r.get_u32();
        let borrow_ts = r.get_u32();
        let return_ts = r.get_u32();
        let active = r.get_bool();
        r.skip(3);
        let last_modified = r.get_u32();
        Self {
            id,
            book_id,
            member_id,
            borrow_ts,
            return_ts,
            active,
            last_modified,
        }
    }
}

impl ActiveFlag for Loan {
    fn is_active(&self) -> bool {
        self.active
    }
}
