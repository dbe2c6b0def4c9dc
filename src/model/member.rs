//! Member record

use serde::Serialize;

use crate::storage::{ActiveFlag, FieldReader, FieldWriter, FixedRecord};

/// Name field width in bytes
pub const NAME_LEN: usize = 60;
/// Phone field width in bytes
pub const PHONE_LEN: usize = 20;
/// Address field width in bytes
pub const ADDRESS_LEN: usize = 100;

/// A registered borrower.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub id: u32,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub active: bool,
    pub last_modified: u32,
}

impl Member {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
        now: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            phone: phone.into(),
            address: address.into(),
            active: true,
            last_modified: now,
        }
    }
}

impl FixedRecord for Member {
    const SIZE: usize = 4 + NAME_LEN + PHONE_LEN + ADDRESS_LEN + 1 + 3 + 4;

    fn id(&self) -> u32 {
        self.id
    }

    fn encode_into(&self, buf: &mut [u8]) {
        let mut w = FieldWriter::new(buf);
        w.put_u32(self.id);
        w.put_str(&self.name, NAME_LEN);
        w.put_str(&self.phone, PHONE_LEN);
        w.put_str(&self.address, ADDRESS_LEN);
        w.put_bool(self.active);
        w.pad(3);
        w.put_u32(self.last_modified);
    }

    fn decode(buf: &[u8]) -> Self {
        let mut r = FieldReader::new(buf);
        let id = r.get_u32();
        let name = r.get_str(NAME_LEN);
        let phone = r.get_str(PHONE_LEN);
        let address = r.get_str(ADDRESS_LEN);
        let active = r.get_bool();
        r.skip(3);
        let last_modified = r.get_u32();
        Self {
            id,
            name,
            phone,
            address,
            active,
            last_modified,
        }
    }
}

impl ActiveFlag for Member {
    fn is_active(&self) -> bool {
        self.active
    }
}
