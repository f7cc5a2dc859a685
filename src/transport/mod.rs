//! UDP transport helpers for TCNet broadcast traffic

mod announce;
#[cfg(feature = "debug-tools")]
mod debug;
mod socket;

pub use announce::{is_own_packet, AnnounceConfig, Announcer};
#[cfg(feature = "debug-tools")]
pub use debug::DatagramRecorder;
pub use socket::{SocketBinding, TransportError};

/// UDP port all TCNet broadcast traffic uses
pub const BROADCAST_PORT: u16 = 60000;

/// Conventional listener port for unicast replies
pub const DEFAULT_LISTENER_PORT: u16 = 65023;
