//! Control, text, and keyboard payloads
//!
//! Control and Text end in a variable-length trailer whose length is given
//! by an explicit `data_size` field; the trailer is neither NUL-terminated
//! nor length-prefixed beyond that field. The trailer bytes are kept opaque
//! so non-UTF-8 captures round-trip unchanged; [`Control::path`] /
//! [`TextData::text`] give lossy string views.

use std::borrow::Cow;

use bytes::Bytes;

use super::wire::{Reader, Writer};
use super::{Error, Result};

/// Control body: 18-byte fixed prefix plus a control path trailer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Control {
    /// Step number
    pub step: u8,
    /// Reserved
    pub reserved1: u8,
    /// Reserved
    pub reserved2: [u8; 12],
    /// Control path bytes (`data_size` bytes on the wire)
    pub data: Bytes,
}

impl Control {
    /// Fixed prefix length in bytes, before the trailer
    pub const PREFIX_LEN: usize = 18;

    /// Control path as text.
    #[must_use]
    pub fn path(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }

    /// Decode the body following the header.
    pub fn decode(r: &mut Reader) -> Result<Self> {
        let step = r.u8()?;
        let reserved1 = r.u8()?;
        let data_size = r.u32()?;
        let reserved2 = r.array()?;
        let data = r.take(usize_from(data_size))?;
        Ok(Self {
            step,
            reserved1,
            reserved2,
            data,
        })
    }

    /// Encode the body.
    pub fn encode(&self, w: &mut Writer) -> Result<()> {
        w.u8(self.step);
        w.u8(self.reserved1);
        w.u32(u32_len("control path", &self.data)?);
        w.raw(&self.reserved2);
        w.raw(&self.data);
        Ok(())
    }
}

/// Text body: same framing as [`Control`] with a text trailer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextData {
    /// Step number
    pub step: u8,
    /// Reserved
    pub reserved1: u8,
    /// Reserved
    pub reserved2: [u8; 12],
    /// Text bytes (`data_size` bytes on the wire)
    pub data: Bytes,
}

impl TextData {
    /// Fixed prefix length in bytes, before the trailer
    pub const PREFIX_LEN: usize = 18;

    /// Trailer as text.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }

    /// Decode the body following the header.
    pub fn decode(r: &mut Reader) -> Result<Self> {
        let step = r.u8()?;
        let reserved1 = r.u8()?;
        let data_size = r.u32()?;
        let reserved2 = r.array()?;
        let data = r.take(usize_from(data_size))?;
        Ok(Self {
            step,
            reserved1,
            reserved2,
            data,
        })
    }

    /// Encode the body.
    pub fn encode(&self, w: &mut Writer) -> Result<()> {
        w.u8(self.step);
        w.u8(self.reserved1);
        w.u32(u32_len("text data", &self.data)?);
        w.raw(&self.reserved2);
        w.raw(&self.data);
        Ok(())
    }
}

/// Keyboard body (20 bytes): one key event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Keyboard {
    /// Reserved
    pub reserved1: u8,
    /// Reserved
    pub reserved2: u8,
    /// Declared data size, echoed on re-encode
    pub data_size: u32,
    /// Reserved
    pub reserved3: [u8; 12],
    /// Keyboard data
    pub keyboard_data: u16,
}

impl Keyboard {
    /// Fixed body length in bytes
    pub const LEN: usize = 20;

    /// Decode the body following the header.
    pub fn decode(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            reserved1: r.u8()?,
            reserved2: r.u8()?,
            data_size: r.u32()?,
            reserved3: r.array()?,
            keyboard_data: r.u16()?,
        })
    }

    /// Encode the body.
    pub fn encode(&self, w: &mut Writer) -> Result<()> {
        w.u8(self.reserved1);
        w.u8(self.reserved2);
        w.u32(self.data_size);
        w.raw(&self.reserved3);
        w.u16(self.keyboard_data);
        Ok(())
    }
}

fn usize_from(size: u32) -> usize {
    size as usize
}

fn u32_len(field: &'static str, data: &Bytes) -> Result<u32> {
    u32::try_from(data.len()).map_err(|_| Error::FieldTooLong {
        field,
        max: u32::MAX as usize,
        got: data.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_roundtrip() {
        let control = Control {
            step: 1,
            data: Bytes::from_static(b"/deck/1/play"),
            ..Control::default()
        };
        let mut w = Writer::new();
        control.encode(&mut w).unwrap();
        assert_eq!(w.len(), Control::PREFIX_LEN + 12);
        let mut r = Reader::new(Bytes::from(w.into_vec()));
        let decoded = Control::decode(&mut r).unwrap();
        assert_eq!(decoded, control);
        assert_eq!(decoded.path(), "/deck/1/play");
    }

    #[test]
    fn text_trailer_sized_by_data_size_not_terminator() {
        let text = TextData {
            step: 0,
            data: Bytes::from_static(b"NOW PLAYING\0TAIL"),
            ..TextData::default()
        };
        let mut w = Writer::new();
        text.encode(&mut w).unwrap();
        let mut r = Reader::new(Bytes::from(w.into_vec()));
        let decoded = TextData::decode(&mut r).unwrap();
        // Embedded NUL does not terminate the trailer.
        assert_eq!(decoded.data.len(), 16);
    }

    #[test]
    fn short_trailer_is_truncated_error() {
        let control = Control {
            data: Bytes::from_static(b"/deck/2/cue"),
            ..Control::default()
        };
        let mut w = Writer::new();
        control.encode(&mut w).unwrap();
        let encoded = w.into_vec();
        let short = encoded[..encoded.len() - 4].to_vec();
        let mut r = Reader::new(Bytes::from(short));
        assert!(matches!(
            Control::decode(&mut r),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn keyboard_roundtrip() {
        let kb = Keyboard {
            data_size: 2,
            keyboard_data: 0x0D0A,
            ..Keyboard::default()
        };
        let mut w = Writer::new();
        kb.encode(&mut w).unwrap();
        assert_eq!(w.len(), Keyboard::LEN);
        let mut r = Reader::new(Bytes::from(w.into_vec()));
        assert_eq!(Keyboard::decode(&mut r).unwrap(), kb);
    }
}
