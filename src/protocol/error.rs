//! TCNet codec error types

use thiserror::Error;

/// TCNet protocol errors
///
/// Every variant is a recoverable, per-datagram condition. Nothing here is
/// fatal to the process, and no error may corrupt unrelated in-flight
/// reassembly entries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Fewer bytes available than a fixed field list requires
    #[error("truncated packet: need {needed} bytes, got {got}")]
    Truncated {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// Header signature bytes do not spell "TCN"
    #[error("malformed signature: expected \"TCN\", got {found:02x?}")]
    MalformedSignature {
        /// Signature bytes found on the wire
        found: [u8; 3],
    },

    /// Unrecognized message type or data type discriminant
    #[error("unknown packet kind: message type {message_type:#x}, data type {data_type:?}")]
    UnknownPacketKind {
        /// Message type byte from the header
        message_type: u8,
        /// Data type byte for Data/file messages, if one was read
        data_type: Option<u8>,
    },

    /// Declared size fields inconsistent with actual bytes
    #[error("size mismatch: declared {expected} bytes, got {got}")]
    SizeMismatch {
        /// Size the packet declared
        expected: usize,
        /// Size actually observed
        got: usize,
    },

    /// Segment index or length inconsistent with the declared totals
    #[error("malformed segment {packet_number}/{total_packets}: {reason}")]
    MalformedSegment {
        /// What was inconsistent
        reason: &'static str,
        /// Packet number carried by the segment
        packet_number: u32,
        /// Total packet count carried by the segment
        total_packets: u32,
    },

    /// A later segment contradicts the first segment's declared totals
    #[error("inconsistent segment header: {field} was {first}, segment says {got}")]
    InconsistentSegmentHeader {
        /// Which declared field changed
        field: &'static str,
        /// Value recorded from the first segment
        first: u32,
        /// Value carried by the contradicting segment
        got: u32,
    },

    /// Encode-time: caller-supplied text exceeds a fixed field width
    #[error("field too long: {field} is {got} bytes (max {max})")]
    FieldTooLong {
        /// Field name
        field: &'static str,
        /// Fixed wire width of the field
        max: usize,
        /// Length the caller supplied
        got: usize,
    },

    /// Layer index outside the 8-layer range
    #[error("layer out of range: {index} (valid wire range 1-8)")]
    LayerOutOfRange {
        /// Index found on the wire
        index: u8,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
