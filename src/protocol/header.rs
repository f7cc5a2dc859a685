//! TCNet common packet header
//!
//! Every TCNet packet opens with the same 24-byte header. The 3-byte literal
//! signature "TCN" distinguishes TCNet traffic from other datagrams on the
//! broadcast port.

use bytes::Bytes;

use super::wire::{Reader, TextField, Writer};
use super::{Error, MessageType, NodeType, Result, NODE_NAME_LEN};

/// Common TCNet packet header (24 bytes)
///
/// # Wire Format
///
/// ```text
/// offset  width  field
/// 0       2      nodeID (LE)
/// 2       1      protocolVersionMajor
/// 3       1      protocolVersionMinor
/// 4       3      signature, literal "TCN"
/// 7       1      messageType
/// 8       8      nodeName (NUL/space padded ASCII)
/// 16      1      sequenceNumber (wraps 0-255)
/// 17      1      nodeType
/// 18      2      nodeOptions (LE)
/// 20      4      timestamp in microseconds (LE)
/// ```
///
/// `message_type` and `node_type` are kept as raw bytes so unrecognized
/// values survive a decode/encode round trip; typed accessors return
/// `Option`. The node name keeps its raw wire bytes, so names with trailing
/// padding or non-UTF-8 fill re-encode verbatim. The timestamp is
/// semantically bounded to 0-999999 but the raw 32-bit value is preserved,
/// never clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketHeader {
    /// Node ID of the sending device
    pub node_id: u16,
    /// Protocol version, major
    pub version_major: u8,
    /// Protocol version, minor
    pub version_minor: u8,
    /// Message type byte
    pub message_type: u8,
    /// Node name, 8 raw bytes on the wire
    pub node_name: TextField<NODE_NAME_LEN>,
    /// Packet sequence number
    pub sequence_number: u8,
    /// Node type byte
    pub node_type: u8,
    /// Node options bitfield
    pub node_options: u16,
    /// Timestamp in microseconds
    pub timestamp: u32,
}

impl PacketHeader {
    /// Create a header for the given message type with current protocol
    /// version defaults.
    ///
    /// A `&str` name longer than 8 bytes is truncated by the conversion;
    /// build the name through [`TextField::new`] to reject oversized input
    /// instead.
    #[must_use]
    pub fn new(
        node_id: u16,
        message_type: MessageType,
        node_name: impl Into<TextField<NODE_NAME_LEN>>,
    ) -> Self {
        Self {
            node_id,
            version_major: super::PROTOCOL_VERSION_MAJOR,
            version_minor: super::PROTOCOL_VERSION_MINOR,
            message_type: message_type.as_u8(),
            node_name: node_name.into(),
            sequence_number: 0,
            node_type: NodeType::Auto.as_u8(),
            node_options: 0,
            timestamp: 0,
        }
    }

    /// Typed message type, if recognized.
    #[must_use]
    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::from_u8(self.message_type)
    }

    /// Typed node type, if recognized.
    #[must_use]
    pub fn node_type(&self) -> Option<NodeType> {
        NodeType::from_u8(self.node_type)
    }

    /// Decode a header from the front of a buffer.
    ///
    /// Fails with [`Error::Truncated`] on short input and
    /// [`Error::MalformedSignature`] when the literal does not match; the
    /// buffer is not accepted as TCNet in that case.
    pub fn decode(r: &mut Reader) -> Result<Self> {
        if r.remaining() < super::HEADER_LEN {
            return Err(Error::Truncated {
                needed: r.consumed() + super::HEADER_LEN,
                got: r.consumed() + r.remaining(),
            });
        }

        let node_id = r.u16()?;
        let version_major = r.u8()?;
        let version_minor = r.u8()?;
        let signature: [u8; 3] = r.array()?;
        if signature != super::SIGNATURE {
            return Err(Error::MalformedSignature { found: signature });
        }

        Ok(Self {
            node_id,
            version_major,
            version_minor,
            message_type: r.u8()?,
            node_name: r.text_field()?,
            sequence_number: r.u8()?,
            node_type: r.u8()?,
            node_options: r.u16()?,
            timestamp: r.u32()?,
        })
    }

    /// Decode a header from a standalone byte slice, returning the header
    /// and the unconsumed tail.
    pub fn from_bytes(bytes: Bytes) -> Result<(Self, Bytes)> {
        let mut r = Reader::new(bytes);
        let header = Self::decode(&mut r)?;
        Ok((header, r.rest()))
    }

    /// Encode the header.
    pub fn encode(&self, w: &mut Writer) -> Result<()> {
        w.u16(self.node_id);
        w.u8(self.version_major);
        w.u8(self.version_minor);
        w.raw(&super::SIGNATURE);
        w.u8(self.message_type);
        w.text_field(&self.node_name);
        w.u8(self.sequence_number);
        w.u8(self.node_type);
        w.u16(self.node_options);
        w.u32(self.timestamp);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PacketHeader {
        PacketHeader {
            node_id: 0x1234,
            version_major: 3,
            version_minor: 3,
            message_type: MessageType::Status.as_u8(),
            node_name: "NODE0001".into(),
            sequence_number: 255,
            node_type: NodeType::Master.as_u8(),
            node_options: 0xBEEF,
            timestamp: 999_999,
        }
    }

    #[test]
    fn test_header_size() {
        let mut w = Writer::new();
        sample().encode(&mut w).unwrap();
        assert_eq!(w.len(), crate::protocol::HEADER_LEN);
        assert_eq!(crate::protocol::HEADER_LEN, 24);
    }

    #[test]
    fn test_header_roundtrip() {
        let header = sample();
        let mut w = Writer::new();
        header.encode(&mut w).unwrap();
        let (decoded, rest) = PacketHeader::from_bytes(Bytes::from(w.into_vec())).unwrap();
        assert_eq!(decoded, header);
        assert!(rest.is_empty());
        assert_eq!(decoded.message_type(), Some(MessageType::Status));
        assert_eq!(decoded.node_type(), Some(NodeType::Master));
    }

    #[test]
    fn test_signature_corruption_detected() {
        let mut w = Writer::new();
        sample().encode(&mut w).unwrap();
        let encoded = w.into_vec();

        // Signature occupies bytes 4..7; corrupting any one is rejected.
        for offset in 4..7 {
            let mut corrupt = encoded.clone();
            corrupt[offset] ^= 0xFF;
            let result = PacketHeader::from_bytes(Bytes::from(corrupt));
            assert!(matches!(result, Err(Error::MalformedSignature { .. })));
        }
    }

    #[test]
    fn test_truncated_header() {
        let mut w = Writer::new();
        sample().encode(&mut w).unwrap();
        let encoded = w.into_vec();

        for len in 0..crate::protocol::HEADER_LEN {
            let result = PacketHeader::from_bytes(Bytes::from(encoded[..len].to_vec()));
            assert!(matches!(result, Err(Error::Truncated { .. })), "len {len}");
        }
    }

    #[test]
    fn test_unknown_node_type_preserved() {
        let mut header = sample();
        header.node_type = 0x7F;
        let mut w = Writer::new();
        header.encode(&mut w).unwrap();
        let (decoded, _) = PacketHeader::from_bytes(Bytes::from(w.into_vec())).unwrap();
        assert_eq!(decoded.node_type, 0x7F);
        assert_eq!(decoded.node_type(), None);
    }

    #[test]
    fn test_long_node_name_rejected_or_truncated() {
        let err = TextField::<NODE_NAME_LEN>::new("node_name", "MUCH TOO LONG").unwrap_err();
        assert!(matches!(err, Error::FieldTooLong { field: "node_name", .. }));

        let mut header = sample();
        header.node_name = "MUCH TOO LONG".into();
        let mut w = Writer::new();
        header.encode(&mut w).unwrap();
        assert_eq!(&w.into_vec()[8..16], b"MUCH TOO");
    }

    #[test]
    fn test_trailing_space_name_roundtrips() {
        let mut header = sample();
        header.node_name = "DECK 1  ".into();
        let mut w = Writer::new();
        header.encode(&mut w).unwrap();
        let (decoded, _) = PacketHeader::from_bytes(Bytes::from(w.into_vec())).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(decoded.node_name.as_bytes(), b"DECK 1  ");
        assert_eq!(decoded.node_name.as_str(), "DECK 1");
    }

    #[test]
    fn test_non_utf8_name_bytes_survive_reencode() {
        let mut w = Writer::new();
        sample().encode(&mut w).unwrap();
        let mut encoded = w.into_vec();
        encoded[8..16].copy_from_slice(&[0xFF; 8]);

        let (decoded, _) = PacketHeader::from_bytes(Bytes::from(encoded.clone())).unwrap();
        assert_eq!(decoded.node_name.as_bytes(), &[0xFF; 8]);

        let mut w = Writer::new();
        decoded.encode(&mut w).unwrap();
        assert_eq!(w.into_vec(), encoded);
    }
}
