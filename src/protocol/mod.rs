//! TCNet protocol core implementation
//!
//! This module provides the wire format, packet types, codec, and segment
//! reassembly for TCNet.

pub mod announce;
mod codec;
pub mod control;
mod error;
mod header;
mod message;
mod metrics;
pub mod mixer;
mod reassembly;
pub mod segment;
pub mod track;
mod types;
mod wire;

pub use codec::{decode, encode};
pub use error::{Error, Result};
pub use header::PacketHeader;
pub use message::{Packet, PacketBody};
pub use metrics::MetricsSnapshot;
pub use reassembly::{
    FeedOutcome, ReassemblyBuffer, ReassemblyConfig, TransferKey, TransferKind,
};
pub use types::{DataType, Layer, MessageType, NodeType};
pub use wire::{Reader, TextField, Writer};

/// TCNet signature literal, header bytes 4..7
pub const SIGNATURE: [u8; 3] = *b"TCN";

/// Common header size in bytes
pub const HEADER_LEN: usize = 24;

/// Node name field width in the common header
pub const NODE_NAME_LEN: usize = 8;

/// Vendor name field width in the OptIn body
pub const VENDOR_NAME_LEN: usize = 16;

/// Device name field width in the OptIn body
pub const DEVICE_NAME_LEN: usize = 16;

/// Layer name field width in the Status body
pub const LAYER_NAME_LEN: usize = 16;

/// Number of logical layers
pub const LAYER_COUNT: usize = 8;

/// Number of mixer channel strips
pub const MAX_CHANNELS: usize = 6;

/// Mixer name field width
pub const MIXER_NAME_LEN: usize = 16;

/// Track artist field width in the Metadata body
pub const TRACK_ARTIST_LEN: usize = 128;

/// Track title field width in the Metadata body
pub const TRACK_TITLE_LEN: usize = 256;

/// Protocol version broadcast in the header, major part
pub const PROTOCOL_VERSION_MAJOR: u8 = 3;

/// Protocol version broadcast in the header, minor part
pub const PROTOCOL_VERSION_MINOR: u8 = 3;

/// Conventional packet signature for application-specific data
pub const APP_DATA_SIGNATURE: u32 = 178_260_640;

/// Default per-segment byte budget for segmented payloads
pub const DEFAULT_CLUSTER_SIZE: u32 = 4800;

/// Snapshot of the codec and reassembly counters.
#[must_use]
pub fn metrics_snapshot() -> MetricsSnapshot {
    metrics::Metrics::totals()
}
