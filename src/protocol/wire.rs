//! Primitive layout rules shared by every packet codec
//!
//! All multi-byte integers on the TCNet wire are little-endian. Fixed text
//! fields are left-justified and NUL/space padded to their declared width,
//! never length-prefixed; their raw bytes are kept verbatim (see
//! [`TextField`]) so a decoded packet re-encodes to the exact datagram.
//! Packed wire structures are read and written field-by-field through these
//! checked cursors; memory layouts are never reinterpreted.

use std::borrow::Cow;
use std::fmt;

use bytes::Bytes;

use super::{Error, Result};

/// Fixed-width text field holding the raw wire bytes
///
/// Hardware senders fill these fields with arbitrary bytes: NUL padding,
/// space padding, sometimes non-UTF-8 fill. The bytes are carried verbatim,
/// so decode followed by encode reproduces the datagram exactly;
/// [`TextField::as_str`] gives the trimmed, lossy view for display.
///
/// Construction from `&str` truncates oversized input the way legacy
/// senders do; [`TextField::new`] is the checked entry point that rejects it
/// with [`Error::FieldTooLong`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextField<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> TextField<N> {
    /// Empty field, all NUL padding.
    #[must_use]
    pub const fn empty() -> Self {
        Self { bytes: [0; N] }
    }

    /// Checked constructor; rejects values longer than the wire width.
    pub fn new(field: &'static str, value: &str) -> Result<Self> {
        if value.len() > N {
            return Err(Error::FieldTooLong {
                field,
                max: N,
                got: value.len(),
            });
        }
        Ok(Self::truncated(value))
    }

    /// Truncating constructor, matching how legacy senders write oversized
    /// text.
    #[must_use]
    pub fn truncated(value: &str) -> Self {
        let mut bytes = [0u8; N];
        let take = value.len().min(N);
        bytes[..take].copy_from_slice(&value.as_bytes()[..take]);
        Self { bytes }
    }

    /// Raw wire bytes, padding included.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    /// Text view: trailing NUL/space padding trimmed, invalid UTF-8
    /// replaced.
    #[must_use]
    pub fn as_str(&self) -> Cow<'_, str> {
        let end = self
            .bytes
            .iter()
            .rposition(|&b| b != 0 && b != b' ')
            .map_or(0, |i| i + 1);
        String::from_utf8_lossy(&self.bytes[..end])
    }
}

impl<const N: usize> Default for TextField<N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const N: usize> From<[u8; N]> for TextField<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self { bytes }
    }
}

impl<const N: usize> From<&str> for TextField<N> {
    fn from(value: &str) -> Self {
        Self::truncated(value)
    }
}

impl<const N: usize> PartialEq<&str> for TextField<N> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == **other
    }
}

impl<const N: usize> fmt::Debug for TextField<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl<const N: usize> fmt::Display for TextField<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Checked little-endian reader over a shared byte buffer.
///
/// Every accessor returns [`Error::Truncated`] instead of panicking when the
/// buffer runs short. Slices handed out via [`Reader::take`] share the
/// underlying allocation.
#[derive(Debug, Clone)]
pub struct Reader {
    buf: Bytes,
    pos: usize,
}

impl Reader {
    /// Wrap a buffer for reading.
    #[must_use]
    pub fn new(buf: Bytes) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Bytes consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.pos
    }

    fn need(&self, n: usize) -> Result<()> {
        if self.remaining() < n {
            return Err(Error::Truncated {
                needed: self.pos + n,
                got: self.buf.len(),
            });
        }
        Ok(())
    }

    /// Read one byte.
    pub fn u8(&mut self) -> Result<u8> {
        self.need(1)?;
        let value = self.buf[self.pos];
        self.pos += 1;
        Ok(value)
    }

    /// Look at the next byte without consuming it.
    pub fn peek_u8(&self) -> Result<u8> {
        self.need(1)?;
        Ok(self.buf[self.pos])
    }

    /// Read a little-endian u16.
    pub fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    /// Read a little-endian u32.
    pub fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    /// Read a fixed-size byte array.
    pub fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.need(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    /// Read a fixed-width text field, keeping the raw bytes.
    pub fn text_field<const N: usize>(&mut self) -> Result<TextField<N>> {
        Ok(TextField::from(self.array::<N>()?))
    }

    /// Read `n` bytes as a shared slice of the input buffer.
    pub fn take(&mut self, n: usize) -> Result<Bytes> {
        self.need(n)?;
        let out = self.buf.slice(self.pos..self.pos + n);
        self.pos += n;
        Ok(out)
    }

    /// Consume and return everything left in the buffer.
    pub fn rest(&mut self) -> Bytes {
        let out = self.buf.slice(self.pos..);
        self.pos = self.buf.len();
        out
    }
}

/// Little-endian writer emitting the exact wire width of every field.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Create an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with a capacity hint.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Write one byte.
    pub fn u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    /// Write a little-endian u16.
    pub fn u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a little-endian u32.
    pub fn u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Write raw bytes verbatim.
    pub fn raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Write a fixed-width text field's raw bytes.
    pub fn text_field<const N: usize>(&mut self, field: &TextField<N>) {
        self.raw(field.as_bytes());
    }

    /// Finish writing and take the buffer.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_reports_truncation_not_panic() {
        let mut r = Reader::new(Bytes::from_static(&[1, 2, 3]));
        assert_eq!(r.u16().unwrap(), 0x0201);
        assert_eq!(
            r.u32(),
            Err(Error::Truncated { needed: 6, got: 3 })
        );
        // A failed read consumes nothing.
        assert_eq!(r.u8().unwrap(), 3);
    }

    #[test]
    fn text_field_keeps_raw_bytes_and_trims_for_display() {
        let field = TextField::from(*b"NO DE\0\0\0");
        assert_eq!(field.as_str(), "NO DE");
        assert_eq!(field.as_bytes(), b"NO DE\0\0\0");

        let field = TextField::from(*b"ABC     ");
        assert_eq!(field.as_str(), "ABC");
        assert_eq!(field.as_bytes(), b"ABC     ");
    }

    #[test]
    fn text_field_checked_and_truncating_construction() {
        let field = TextField::<8>::new("node_name", "NODE0001").unwrap();
        assert_eq!(field.as_bytes(), b"NODE0001");

        let err = TextField::<8>::new("node_name", "TOO LONG NAME").unwrap_err();
        assert_eq!(
            err,
            Error::FieldTooLong {
                field: "node_name",
                max: 8,
                got: 13
            }
        );

        let field = TextField::<8>::from("TOO LONG NAME");
        assert_eq!(field.as_bytes(), b"TOO LONG");
    }

    #[test]
    fn text_field_roundtrips_arbitrary_wire_bytes() {
        let mut w = Writer::new();
        w.text_field(&TextField::from([0xFFu8; 8]));
        let mut r = Reader::new(Bytes::from(w.into_vec()));
        let field: TextField<8> = r.text_field().unwrap();
        assert_eq!(field.as_bytes(), &[0xFF; 8]);
        assert_eq!(field.as_str(), "\u{FFFD}".repeat(8));
    }

    #[test]
    fn trailing_space_survives_a_roundtrip() {
        let field = TextField::<8>::new("node_name", " ").unwrap();
        let mut w = Writer::new();
        w.text_field(&field);
        let mut r = Reader::new(Bytes::from(w.into_vec()));
        let decoded: TextField<8> = r.text_field().unwrap();
        assert_eq!(decoded, field);
        assert_eq!(decoded.as_str(), "");
    }

    #[test]
    fn take_is_zero_copy_slice() {
        let buf = Bytes::from(vec![9u8; 64]);
        let mut r = Reader::new(buf);
        let slice = r.take(16).unwrap();
        assert_eq!(slice.len(), 16);
        assert_eq!(r.remaining(), 48);
        assert_eq!(r.rest().len(), 48);
        assert_eq!(r.remaining(), 0);
    }
}
