//! TCNet message, data, node, and layer discriminants

use std::fmt;

use super::{Error, Result};

/// TCNet message types (header byte 7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    /// Node joins the network
    OptIn = 2,
    /// Node leaves the network
    OptOut = 3,
    /// Per-layer status broadcast
    Status = 5,
    /// Time synchronization step
    TimeSync = 10,
    /// Error notification for a failed request
    ErrorNotification = 13,
    /// Request for data
    Request = 20,
    /// Application-specific packet (legacy message type)
    ApplicationSpecificPacket = 30,
    /// Control path message
    Control = 101,
    /// Text message
    Text = 128,
    /// Keyboard input message
    Keyboard = 132,
    /// Data message carrying a second-level data type
    Data = 200,
    /// Low resolution artwork file
    LowResArtworkImage = 204,
    /// Application-specific data stream
    ApplicationSpecificData = 213,
    /// Per-layer time broadcast
    Time = 254,
}

impl MessageType {
    /// Convert from wire byte
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            2 => Some(Self::OptIn),
            3 => Some(Self::OptOut),
            5 => Some(Self::Status),
            10 => Some(Self::TimeSync),
            13 => Some(Self::ErrorNotification),
            20 => Some(Self::Request),
            30 => Some(Self::ApplicationSpecificPacket),
            101 => Some(Self::Control),
            128 => Some(Self::Text),
            132 => Some(Self::Keyboard),
            200 => Some(Self::Data),
            204 => Some(Self::LowResArtworkImage),
            213 => Some(Self::ApplicationSpecificData),
            254 => Some(Self::Time),
            _ => None,
        }
    }

    /// Convert to wire byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OptIn => "OptIn",
            Self::OptOut => "OptOut",
            Self::Status => "Status",
            Self::TimeSync => "TimeSync",
            Self::ErrorNotification => "ErrorNotification",
            Self::Request => "Request",
            Self::ApplicationSpecificPacket => "ApplicationSpecificPacket",
            Self::Control => "Control",
            Self::Text => "Text",
            Self::Keyboard => "Keyboard",
            Self::Data => "Data",
            Self::LowResArtworkImage => "LowResArtworkImage",
            Self::ApplicationSpecificData => "ApplicationSpecificData",
            Self::Time => "Time",
        };
        write!(f, "{name}")
    }
}

/// Second-level data types carried by Data and file messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DataType {
    /// Playback metrics for one layer
    Metrics = 2,
    /// Track metadata for one layer
    Metadata = 4,
    /// Beat grid records
    BeatGrid = 8,
    /// Cue point block
    CueInfo = 12,
    /// Small waveform level/color pairs
    SmallWaveForm = 16,
    /// Big waveform level/color pairs
    BigWaveForm = 32,
    /// Low resolution artwork file bytes (file packets)
    LowResArtwork = 128,
    /// Mixer snapshot
    Mixer = 150,
}

impl DataType {
    /// Convert from wire byte
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            2 => Some(Self::Metrics),
            4 => Some(Self::Metadata),
            8 => Some(Self::BeatGrid),
            12 => Some(Self::CueInfo),
            16 => Some(Self::SmallWaveForm),
            32 => Some(Self::BigWaveForm),
            128 => Some(Self::LowResArtwork),
            150 => Some(Self::Mixer),
            _ => None,
        }
    }

    /// Convert to wire byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Node roles on a TCNet network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeType {
    /// Role negotiated automatically
    Auto = 1,
    /// Timing master
    Master = 2,
    /// Timing slave
    Slave = 3,
    /// Repeater forwarding traffic between segments
    Repeater = 8,
}

impl NodeType {
    /// Convert from wire byte
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Auto),
            2 => Some(Self::Master),
            3 => Some(Self::Slave),
            8 => Some(Self::Repeater),
            _ => None,
        }
    }

    /// Convert to wire byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// One of the 8 logical playback/mixer layers: 1, 2, 3, 4, A, B, M, C
///
/// Several payloads carry 8-element arrays aligned by layer index; `index`
/// addresses those arrays. The wire encoding for per-layer packets is 1-based
/// (`1` = layer 1 ... `8` = layer C).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Deck layer 1
    Layer1,
    /// Deck layer 2
    Layer2,
    /// Deck layer 3
    Layer3,
    /// Deck layer 4
    Layer4,
    /// Aux layer A
    LayerA,
    /// Aux layer B
    LayerB,
    /// Master layer M
    LayerM,
    /// Cue layer C
    LayerC,
}

impl Layer {
    /// All layers in wire order
    pub const ALL: [Self; 8] = [
        Self::Layer1,
        Self::Layer2,
        Self::Layer3,
        Self::Layer4,
        Self::LayerA,
        Self::LayerB,
        Self::LayerM,
        Self::LayerC,
    ];

    /// Array index in [0, 7]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Layer for an array index, if in range
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Decode the 1-based wire identifier used by per-layer payloads
    pub fn from_wire(id: u8) -> Result<Self> {
        match id {
            1..=8 => Ok(Self::ALL[usize::from(id) - 1]),
            _ => Err(Error::LayerOutOfRange { index: id }),
        }
    }

    /// 1-based wire identifier
    #[must_use]
    pub const fn wire(self) -> u8 {
        self as u8 + 1
    }

    /// Short label as printed on mixer hardware
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Layer1 => "1",
            Self::Layer2 => "2",
            Self::Layer3 => "3",
            Self::Layer4 => "4",
            Self::LayerA => "A",
            Self::LayerB => "B",
            Self::LayerM => "M",
            Self::LayerC => "C",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_roundtrip() {
        let types = [
            MessageType::OptIn,
            MessageType::Status,
            MessageType::Data,
            MessageType::Time,
        ];

        for msg_type in types {
            let byte = msg_type.as_u8();
            let decoded = MessageType::from_u8(byte).unwrap();
            assert_eq!(msg_type, decoded);
        }
    }

    #[test]
    fn test_unknown_discriminants_rejected() {
        assert_eq!(MessageType::from_u8(0), None);
        assert_eq!(MessageType::from_u8(199), None);
        assert_eq!(DataType::from_u8(3), None);
        assert_eq!(NodeType::from_u8(0), None);
    }

    #[test]
    fn test_layer_wire_mapping() {
        for (i, layer) in Layer::ALL.iter().enumerate() {
            assert_eq!(layer.index(), i);
            assert_eq!(Layer::from_index(i), Some(*layer));
            assert_eq!(Layer::from_wire(layer.wire()).unwrap(), *layer);
        }
        assert_eq!(Layer::from_index(crate::protocol::LAYER_COUNT), None);
        assert!(matches!(
            Layer::from_wire(0),
            Err(Error::LayerOutOfRange { index: 0 })
        ));
        assert!(matches!(
            Layer::from_wire(9),
            Err(Error::LayerOutOfRange { index: 9 })
        ));
    }
}
