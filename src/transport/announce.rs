//! Periodic OptIn announcement builder
//!
//! A TCNet node announces itself by broadcasting an OptIn packet once per
//! second; peers that stop hearing it drop the node from their tables. The
//! [`Announcer`] owns the sequence counter and uptime bookkeeping but not a
//! timer thread: the caller polls it with its own clock and sends whatever
//! packets come back.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::protocol::announce::{OptIn, OptOut};
use crate::protocol::{Packet, PacketBody, PacketHeader};

use super::DEFAULT_LISTENER_PORT;

/// Identity and cadence of a node's announcements
#[derive(Debug, Clone)]
pub struct AnnounceConfig {
    /// Node ID broadcast in the header
    pub node_id: u16,
    /// Node name, at most 8 bytes
    pub node_name: String,
    /// Vendor name, at most 16 bytes
    pub vendor_name: String,
    /// Application / device name, at most 16 bytes
    pub device_name: String,
    /// Application version (major, minor, bugfix)
    pub app_version: (u8, u8, u8),
    /// Port peers should use for unicast replies
    pub listener_port: u16,
    /// Interval between announcements
    pub interval: Duration,
}

impl Default for AnnounceConfig {
    fn default() -> Self {
        Self {
            node_id: 1,
            node_name: "NODE0001".to_string(),
            vendor_name: String::new(),
            device_name: String::new(),
            app_version: (0, 1, 0),
            listener_port: DEFAULT_LISTENER_PORT,
            interval: Duration::from_secs(1),
        }
    }
}

/// Builds the periodic OptIn packets for one node
#[derive(Debug)]
pub struct Announcer {
    config: AnnounceConfig,
    started: Instant,
    last_sent: Option<Instant>,
    sequence: u8,
}

impl Announcer {
    /// Create an announcer; `now` marks the start of the node's uptime.
    #[must_use]
    pub fn new(config: AnnounceConfig, now: Instant) -> Self {
        Self {
            config,
            started: now,
            last_sent: None,
            sequence: 0,
        }
    }

    /// Return the next OptIn packet when one is due, advancing the sequence
    /// counter. The first poll is always due.
    pub fn poll(&mut self, now: Instant) -> Option<Packet> {
        let due = match self.last_sent {
            None => true,
            Some(last) => now.duration_since(last) >= self.config.interval,
        };
        if !due {
            return None;
        }

        self.last_sent = Some(now);
        let packet = self.build_opt_in(now);
        debug!(
            node_id = self.config.node_id,
            sequence = packet.header.sequence_number,
            "opt-in due"
        );
        Some(packet)
    }

    /// Build the OptOut packet announcing a clean departure.
    #[must_use]
    pub fn opt_out(&mut self) -> Packet {
        let body = PacketBody::OptOut(OptOut {
            node_count: 1,
            node_listener_port: self.config.listener_port,
        });
        let mut packet = Packet::new(self.config.node_id, self.config.node_name.as_str(), body);
        packet.header.sequence_number = self.next_sequence();
        packet
    }

    fn build_opt_in(&mut self, now: Instant) -> Packet {
        let uptime = now.duration_since(self.started);
        let (major, minor, bug) = self.config.app_version;
        let body = PacketBody::OptIn(OptIn {
            node_count: 1,
            node_listener_port: self.config.listener_port,
            uptime: uptime.as_secs().min(u64::from(u16::MAX)) as u16,
            reserved1: 0,
            vendor_name: self.config.vendor_name.as_str().into(),
            device_name: self.config.device_name.as_str().into(),
            app_version_major: major,
            app_version_minor: minor,
            app_version_bug: bug,
            reserved2: 0,
        });

        let mut packet = Packet::new(self.config.node_id, self.config.node_name.as_str(), body);
        packet.header.sequence_number = self.next_sequence();
        packet.header.timestamp = uptime.subsec_micros();
        packet
    }

    fn next_sequence(&mut self) -> u8 {
        let sequence = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);
        sequence
    }
}

/// Convenience check that a header belongs to this announcer's node, used to
/// drop a node's own broadcasts read back from the socket.
#[must_use]
pub fn is_own_packet(config: &AnnounceConfig, header: &PacketHeader) -> bool {
    header.node_id == config.node_id
}
