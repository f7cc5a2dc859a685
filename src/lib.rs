//! TCNet - wire codec for the TCNet DJ synchronization protocol
//!
//! This library provides bit-exact encoding and decoding of TCNet UDP
//! packets, reassembly of segmented payloads (beat grids, cue blocks,
//! waveforms, artwork, application data), and the broadcast plumbing a node
//! needs to announce itself on a TCNet network.
//!
//! # Quick Start
//!
//! ```rust
//! use bytes::Bytes;
//! use tcnet::{decode, encode, Packet, PacketBody};
//! use tcnet::protocol::announce::OptIn;
//!
//! // Build an OptIn announcement
//! let packet = Packet::new(1, "NODE0001", PacketBody::OptIn(OptIn {
//!     node_count: 1,
//!     node_listener_port: 65023,
//!     ..OptIn::default()
//! }));
//!
//! // Encode to wire datagrams (fixed bodies always yield one)
//! let datagrams = encode(&packet)?;
//!
//! // Decode a received datagram
//! let decoded = decode(Bytes::from(datagrams[0].clone()))?;
//! assert_eq!(decoded, packet);
//! # Ok::<(), tcnet::Error>(())
//! ```
//!
//! # Features
//!
//! - **Zero-copy decoding** - variable payloads slice the input datagram
//! - **Raw-byte fidelity** - reserved fields and unknown discriminants
//!   survive a decode/encode round trip untouched
//! - **Order-independent reassembly** - segmented transfers complete
//!   regardless of datagram arrival order
//! - **Caller-driven clocks** - no internal threads or timers

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod protocol;
pub mod transport;

pub use protocol::{
    decode, encode, metrics_snapshot, DataType, Error, FeedOutcome, Layer, MessageType,
    MetricsSnapshot, NodeType, Packet, PacketBody, PacketHeader, ReassemblyBuffer,
    ReassemblyConfig, Result, TextField, TransferKey, TransferKind,
};
pub use transport::{AnnounceConfig, Announcer, SocketBinding, TransportError, BROADCAST_PORT};
