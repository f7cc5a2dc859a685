//! Keyed reassembly of segmented payloads
//!
//! UDP gives no ordering, so reassembly is modeled as a key → accumulator
//! map, not a stream: correctness depends only on eventually holding all
//! segment indices, never on arrival order. Within one key, segment
//! application is commutative (last writer wins per index), which also makes
//! retransmitted duplicates harmless.
//!
//! The buffer holds the only shared mutable state in the crate; callers
//! wrap it in their own lock when feeding from several receive paths. All
//! operations are synchronous and bounded by input size. Expiry is driven by
//! an external clock: the caller passes `Instant`s in and periodically runs
//! [`ReassemblyBuffer::sweep`].

use std::collections::HashMap;
use std::time::{Duration, Instant};

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace, warn};

use super::metrics::Metrics;
use super::segment::{AppSegment, DataSegment};
use super::{DataType, Error, Result};

/// Which segmented stream a transfer belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferKind {
    /// Beat grid records
    BeatGrid,
    /// Cue point block
    CueInfo,
    /// Small waveform pairs
    SmallWaveform,
    /// Big waveform pairs
    BigWaveform,
    /// Low resolution artwork file
    Artwork,
    /// Application-specific data
    Application,
}

impl TransferKind {
    /// Kind for a Data/file data type, if that type is segmented.
    #[must_use]
    pub fn from_data_type(data_type: DataType) -> Option<Self> {
        match data_type {
            DataType::BeatGrid => Some(Self::BeatGrid),
            DataType::CueInfo => Some(Self::CueInfo),
            DataType::SmallWaveForm => Some(Self::SmallWaveform),
            DataType::BigWaveForm => Some(Self::BigWaveform),
            DataType::LowResArtwork => Some(Self::Artwork),
            DataType::Metrics | DataType::Metadata | DataType::Mixer => None,
        }
    }
}

/// Identity of one in-progress segmented transfer
///
/// Sender node, stream kind, and layer identify most transfers; application
/// data instead carries its identifier bytes and packet signature, which
/// disambiguate concurrent transfers the other fields cannot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransferKey {
    /// Sending node ID from the packet header
    pub node_id: u16,
    /// Segmented stream kind
    pub kind: TransferKind,
    /// Layer identifier (0 for application data)
    pub layer: u8,
    /// Application identifier bytes (zeroed for layer-scoped transfers)
    pub ident: [u8; 2],
    /// Application packet signature (0 for layer-scoped transfers)
    pub signature: u32,
}

impl TransferKey {
    /// Key for a layer-scoped Data/file transfer.
    #[must_use]
    pub fn for_data(node_id: u16, kind: TransferKind, layer: u8) -> Self {
        Self {
            node_id,
            kind,
            layer,
            ident: [0; 2],
            signature: 0,
        }
    }

    /// Key for an application-specific transfer.
    #[must_use]
    pub fn for_application(node_id: u16, ident: [u8; 2], signature: u32) -> Self {
        Self {
            node_id,
            kind: TransferKind::Application,
            layer: 0,
            ident,
            signature,
        }
    }
}

/// Reassembly tuning knobs
#[derive(Debug, Clone)]
pub struct ReassemblyConfig {
    /// Drop a transfer when no segment arrives within this window. TCNet
    /// defines no segment timeout on the wire; this is a best-effort
    /// liveness bound, not a protocol guarantee.
    pub timeout: Duration,
    /// Maximum concurrent transfers; the stalest entry is evicted on
    /// overflow.
    pub max_transfers: usize,
    /// Wire value of the first segment of a transfer. The header convention
    /// is 1-based; set 0 for captures from senders that number from 0.
    pub first_packet_number: u32,
}

impl Default for ReassemblyConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(2),
            max_transfers: 64,
            first_packet_number: 1,
        }
    }
}

#[derive(Debug)]
struct Transfer {
    data_size: u32,
    total_packets: u32,
    cluster_size: Option<u32>,
    segments: HashMap<u32, Bytes>,
    last_activity: Instant,
}

/// Outcome of feeding one segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOutcome {
    /// Transfer still accumulating
    Pending {
        /// Unique segment indices received so far
        received: u32,
        /// Declared segment total
        total: u32,
    },
    /// All segments present; the joined payload, entry removed
    Complete(Bytes),
}

/// Keyed store accumulating segments until a transfer completes or expires
///
/// Per-key state machine: Empty → Accumulating → Complete | Expired.
/// Totals are fixed by the first segment seen for a key; a later segment
/// contradicting them discards the whole entry. A malformed segment is
/// discarded alone, leaving already-buffered segments for its key intact.
#[derive(Debug)]
pub struct ReassemblyBuffer {
    config: ReassemblyConfig,
    transfers: HashMap<TransferKey, Transfer>,
}

impl ReassemblyBuffer {
    /// Create a buffer with the given configuration.
    #[must_use]
    pub fn new(config: ReassemblyConfig) -> Self {
        Self {
            config,
            transfers: HashMap::new(),
        }
    }

    /// Number of in-progress transfers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    /// Whether no transfer is in progress.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }

    /// Feed one Data/file segment.
    pub fn feed_data(
        &mut self,
        node_id: u16,
        segment: &DataSegment,
        now: Instant,
    ) -> Result<FeedOutcome> {
        let kind = DataType::from_u8(segment.data_type)
            .and_then(TransferKind::from_data_type)
            .ok_or(Error::UnknownPacketKind {
                message_type: 200,
                data_type: Some(segment.data_type),
            })?;
        let key = TransferKey::for_data(node_id, kind, segment.layer_id);
        let cluster = (segment.cluster_size != 0).then_some(segment.cluster_size);
        self.feed(
            key,
            segment.data_size,
            segment.total_packets,
            segment.packet_number,
            cluster,
            segment.bytes.clone(),
            now,
        )
    }

    /// Feed one application-specific segment.
    ///
    /// Application data declares no cluster size on the wire, so non-final
    /// segment lengths are not checked against a budget.
    pub fn feed_application(
        &mut self,
        node_id: u16,
        segment: &AppSegment,
        now: Instant,
    ) -> Result<FeedOutcome> {
        let key = TransferKey::for_application(node_id, segment.ident, segment.signature);
        self.feed(
            key,
            segment.data_size,
            segment.total_packets,
            segment.packet_number,
            None,
            segment.bytes.clone(),
            now,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn feed(
        &mut self,
        key: TransferKey,
        data_size: u32,
        total_packets: u32,
        packet_number: u32,
        cluster_size: Option<u32>,
        bytes: Bytes,
        now: Instant,
    ) -> Result<FeedOutcome> {
        let first = self.config.first_packet_number;
        if total_packets == 0 {
            return Err(Error::MalformedSegment {
                reason: "zero declared segment total",
                packet_number,
                total_packets,
            });
        }
        if packet_number < first {
            return Err(Error::MalformedSegment {
                reason: "packet number below the first segment number",
                packet_number,
                total_packets,
            });
        }
        let index = packet_number - first;
        if index >= total_packets {
            return Err(Error::MalformedSegment {
                reason: "packet number exceeds declared total",
                packet_number,
                total_packets,
            });
        }

        let is_final = index + 1 == total_packets;
        if !is_final {
            if let Some(cluster) = cluster_size {
                if bytes.len() != cluster as usize {
                    return Err(Error::MalformedSegment {
                        reason: "non-final segment length differs from cluster size",
                        packet_number,
                        total_packets,
                    });
                }
            }
        }

        if let Some(transfer) = self.transfers.get(&key) {
            // Totals are pinned by the first segment seen for this key.
            let mut checks = vec![
                ("data_size", transfer.data_size, data_size),
                ("total_packets", transfer.total_packets, total_packets),
            ];
            if let (Some(recorded), Some(got)) = (transfer.cluster_size, cluster_size) {
                checks.push(("cluster_size", recorded, got));
            }
            for (field, recorded, got) in checks {
                if recorded != got {
                    self.transfers.remove(&key);
                    warn!(?key, field, recorded, got, "discarding inconsistent transfer");
                    return Err(Error::InconsistentSegmentHeader {
                        field,
                        first: recorded,
                        got,
                    });
                }
            }
        } else {
            self.evict_for_capacity(&key);
            trace!(?key, data_size, total_packets, "new transfer");
        }

        let transfer = self.transfers.entry(key).or_insert_with(|| Transfer {
            data_size,
            total_packets,
            cluster_size,
            segments: HashMap::new(),
            last_activity: now,
        });
        transfer.segments.insert(index, bytes);
        transfer.last_activity = now;

        let received = transfer.segments.len() as u32;
        if received < total_packets {
            trace!(?key, received, total_packets, "segment buffered");
            return Ok(FeedOutcome::Pending {
                received,
                total: total_packets,
            });
        }

        // Every index in 0..total is present exactly once; join in order and
        // retire the key.
        let expected = transfer.data_size as usize;
        let mut joined = BytesMut::with_capacity(expected);
        for index in 0..total_packets {
            if let Some(part) = transfer.segments.get(&index) {
                joined.extend_from_slice(part);
            }
        }
        self.transfers.remove(&key);
        if joined.len() != expected {
            Metrics::record_transfer_failed();
            return Err(Error::SizeMismatch {
                expected,
                got: joined.len(),
            });
        }

        debug!(?key, size = joined.len(), "transfer complete");
        Metrics::record_transfer_complete();
        Ok(FeedOutcome::Complete(joined.freeze()))
    }

    /// Drop transfers with no activity within the configured timeout.
    ///
    /// Returns the number of expired entries. Safe to interleave with
    /// feeding under the caller's lock.
    pub fn sweep(&mut self, now: Instant) -> usize {
        let timeout = self.config.timeout;
        let before = self.transfers.len();
        self.transfers.retain(|key, transfer| {
            let live = now.duration_since(transfer.last_activity) < timeout;
            if !live {
                debug!(?key, "transfer expired");
                Metrics::record_transfer_expired();
            }
            live
        });
        before - self.transfers.len()
    }

    /// Cancel one transfer, dropping buffered segments.
    pub fn cancel(&mut self, key: &TransferKey) -> bool {
        self.transfers.remove(key).is_some()
    }

    fn evict_for_capacity(&mut self, incoming: &TransferKey) {
        if self.transfers.len() < self.config.max_transfers {
            return;
        }
        if let Some(stalest) = self
            .transfers
            .iter()
            .min_by_key(|(_, transfer)| transfer.last_activity)
            .map(|(key, _)| *key)
        {
            warn!(evicted = ?stalest, for_key = ?incoming, "transfer table full");
            self.transfers.remove(&stalest);
            Metrics::record_transfer_expired();
        }
    }
}
