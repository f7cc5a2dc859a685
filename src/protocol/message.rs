//! Decoded TCNet packets: common header plus a typed body

use super::announce::{ErrorNotification, OptIn, OptOut, Request, Status, TimeSync};
use super::control::{Control, Keyboard, TextData};
use super::header::PacketHeader;
use super::mixer::MixerSnapshot;
use super::segment::{AppSegment, DataSegment};
use super::track::{Metadata, MetricsData, TimeData};
use super::wire::TextField;
use super::{MessageType, NODE_NAME_LEN};

/// Typed packet body, one variant per packet kind
///
/// Segmented streams (beat grid, cue, waveforms, artwork, application data)
/// decode to a single wire segment each; joining belongs to
/// [`ReassemblyBuffer`](super::ReassemblyBuffer).
#[derive(Debug, Clone, PartialEq)]
pub enum PacketBody {
    /// Node joins the network
    OptIn(OptIn),
    /// Node leaves the network
    OptOut(OptOut),
    /// Per-layer status broadcast
    Status(Box<Status>),
    /// Time synchronization step
    TimeSync(TimeSync),
    /// Error notification for a failed request
    ErrorNotification(ErrorNotification),
    /// Request for data
    Request(Request),
    /// Application-specific data segment (message types 30 and 213)
    ApplicationSpecificData(AppSegment),
    /// Control path message
    Control(Control),
    /// Text message
    Text(TextData),
    /// Keyboard input message
    Keyboard(Keyboard),
    /// Playback metrics for one layer
    MetricsData(MetricsData),
    /// Track metadata for one layer
    MetaData(Box<Metadata>),
    /// Beat grid segment
    BeatGridData(DataSegment),
    /// Cue block segment
    CueData(DataSegment),
    /// Small waveform segment
    SmallWaveformData(DataSegment),
    /// Big waveform segment
    BigWaveformData(DataSegment),
    /// Mixer snapshot
    MixerData(Box<MixerSnapshot>),
    /// Low resolution artwork file segment
    LowResArtworkFile(DataSegment),
    /// Per-layer time broadcast
    Time(TimeData),
}

impl PacketBody {
    /// Message type this body is carried under by default.
    ///
    /// Application data conventionally travels as
    /// [`MessageType::ApplicationSpecificData`]; decoding preserves the
    /// legacy type 30 in the header when a sender used it.
    #[must_use]
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::OptIn(_) => MessageType::OptIn,
            Self::OptOut(_) => MessageType::OptOut,
            Self::Status(_) => MessageType::Status,
            Self::TimeSync(_) => MessageType::TimeSync,
            Self::ErrorNotification(_) => MessageType::ErrorNotification,
            Self::Request(_) => MessageType::Request,
            Self::ApplicationSpecificData(_) => MessageType::ApplicationSpecificData,
            Self::Control(_) => MessageType::Control,
            Self::Text(_) => MessageType::Text,
            Self::Keyboard(_) => MessageType::Keyboard,
            Self::MetricsData(_)
            | Self::MetaData(_)
            | Self::BeatGridData(_)
            | Self::CueData(_)
            | Self::SmallWaveformData(_)
            | Self::BigWaveformData(_)
            | Self::MixerData(_) => MessageType::Data,
            Self::LowResArtworkFile(_) => MessageType::LowResArtworkImage,
            Self::Time(_) => MessageType::Time,
        }
    }

    /// Body kind name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::OptIn(_) => "OptIn",
            Self::OptOut(_) => "OptOut",
            Self::Status(_) => "Status",
            Self::TimeSync(_) => "TimeSync",
            Self::ErrorNotification(_) => "ErrorNotification",
            Self::Request(_) => "Request",
            Self::ApplicationSpecificData(_) => "ApplicationSpecificData",
            Self::Control(_) => "Control",
            Self::Text(_) => "Text",
            Self::Keyboard(_) => "Keyboard",
            Self::MetricsData(_) => "MetricsData",
            Self::MetaData(_) => "MetaData",
            Self::BeatGridData(_) => "BeatGridData",
            Self::CueData(_) => "CueData",
            Self::SmallWaveformData(_) => "SmallWaveformData",
            Self::BigWaveformData(_) => "BigWaveformData",
            Self::MixerData(_) => "MixerData",
            Self::LowResArtworkFile(_) => "LowResArtworkFile",
            Self::Time(_) => "Time",
        }
    }
}

/// One decoded TCNet packet
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    /// Common 24-byte header
    pub header: PacketHeader,
    /// Typed body
    pub body: PacketBody,
}

impl Packet {
    /// Assemble a packet for sending; the header's message type is derived
    /// from the body.
    #[must_use]
    pub fn new(
        node_id: u16,
        node_name: impl Into<TextField<NODE_NAME_LEN>>,
        body: PacketBody,
    ) -> Self {
        let header = PacketHeader::new(node_id, body.message_type(), node_name);
        Self { header, body }
    }
}
