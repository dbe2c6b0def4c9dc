//! Fixed-record codec primitives
//!
//! Every record type is a homogeneous, fixed-size block with no header,
//! length prefix or checksum. Numeric fields are little-endian unsigned
//! integers; string fields are fixed-width UTF-8 byte blocks:
//!
//! ```text
//! encode: "Dune" into 8 bytes  ->  44 75 6e 65 00 00 00 00
//! decode: split at first 0x00, decode prefix as UTF-8
//! ```
//!
//! A string longer than its field is cut at exactly `width` bytes, which may
//! split a multi-byte character. Decoding drops any invalid or incomplete
//! UTF-8 sequence instead of failing, so a cut character simply disappears
//! and the decoded value is the longest valid text of the stored prefix.

/// A record with a constant on-disk size.
///
/// The identifier must occupy the first four bytes of the block; the store
/// derives the next identifier from the last block alone.
pub trait FixedRecord: Sized {
    /// Block size in bytes, derived from the field layout
    const SIZE: usize;

    /// Record identifier
    fn id(&self) -> u32;

    /// Writes the record into `buf`, which is exactly `SIZE` bytes and zeroed.
    fn encode_into(&self, buf: &mut [u8]);

    /// Reads a record from a block of exactly `SIZE` bytes.
    fn decode(buf: &[u8]) -> Self;

    /// Encodes into a freshly allocated block.
    fn encode(&self) -> Vec<u8> {
        let mut block = vec![0u8; Self::SIZE];
        self.encode_into(&mut block);
        block
    }
}

/// Soft-delete marker shared by every entity.
pub trait ActiveFlag {
    /// `false` once the record has been soft-deleted
    fn is_active(&self) -> bool;
}

/// Writes `s` into `out` as UTF-8, truncated to `out.len()` bytes and
/// zero-padded.
pub fn pack_fixed_str(s: &str, out: &mut [u8]) {
    let bytes = s.as_bytes();
    let n = bytes.len().min(out.len());
    out[..n].copy_from_slice(&bytes[..n]);
    for b in &mut out[n..] {
        *b = 0;
    }
}

/// Reads a zero-padded UTF-8 field, ignoring undecodable bytes.
pub fn unpack_fixed_str(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    decode_utf8_ignoring_invalid(&field[..end])
}

fn decode_utf8_ignoring_invalid(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                out.push_str(&String::from_utf8_lossy(valid));
                // None: incomplete sequence at the end of the field
                let skip = e.error_len().unwrap_or(rest.len());
                bytes = &rest[skip..];
            }
        }
    }
}

/// Sequential little-endian writer over one record block.
pub struct FieldWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> FieldWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, len: usize) -> &mut [u8] {
        let start = self.pos;
        self.pos += len;
        &mut self.buf[start..self.pos]
    }

    pub fn put_u8(&mut self, v: u8) {
        self.take(1)[0] = v;
    }

    pub fn put_u16(&mut self, v: u16) {
        self.take(2).copy_from_slice(&v.to_le_bytes());
    }

    pub fn put_u32(&mut self, v: u32) {
        self.take(4).copy_from_slice(&v.to_le_bytes());
    }

    pub fn put_bool(&mut self, v: bool) {
        self.put_u8(u8::from(v));
    }

    pub fn put_str(&mut self, s: &str, width: usize) {
        pack_fixed_str(s, self.take(width));
    }

    /// Zero padding bytes.
    pub fn pad(&mut self, len: usize) {
        for b in self.take(len) {
            *b = 0;
        }
    }

    /// Bytes written so far.
    pub fn position(&self) -> usize {
        self.pos
    }
}

/// Sequential little-endian reader over one record block.
pub struct FieldReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, len: usize) -> &'a [u8] {
        let start = self.pos;
        self.pos += len;
        &self.buf[start..self.pos]
    }

    pub fn get_u8(&mut self) -> u8 {
        self.take(1)[0]
    }

    pub fn get_u16(&mut self) -> u16 {
        let b = self.take(2);
        u16::from_le_bytes([b[0], b[1]])
    }

    pub fn get_u32(&mut self) -> u32 {
        let b = self.take(4);
        u32::from_le_bytes([b[0], b[1], b[2], b[3]])
    }

    /// Any non-zero byte reads as `true`.
    pub fn get_bool(&mut self) -> bool {
        self.get_u8() != 0
    }

    pub fn get_str(&mut self, width: usize) -> String {
        unpack_fixed_str(self.take(width))
    }

    pub fn skip(&mut self, len: usize) {
        self.pos += len;
    }
}
