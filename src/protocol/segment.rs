//! Segmented payload framing and second-pass interpreters
//!
//! BeatGrid, cue, waveform, artwork, and application-specific payloads can
//! exceed one UDP datagram. Each datagram carries an 18-byte prefix declaring
//! the logical payload size, the segment count, this segment's number
//! (first segment = 1 on the wire), and the per-segment cluster byte budget.
//! Decoding one datagram yields a segment value only; joining segments is the
//! reassembly buffer's job.
//!
//! The interpreters at the bottom of this module (beat grid records, cue
//! block, waveform pairs) apply to fully joined payloads — never to a single
//! segment's byte range, which may split a record in half.

use bytes::Bytes;

use super::wire::{Reader, Writer};
use super::{Error, Result, APP_DATA_SIGNATURE};

/// One datagram's share of a segmented Data/file payload
///
/// `bytes` may hold either a single wire segment's slice (as produced by
/// decoding) or the entire logical payload (as produced by
/// [`DataSegment::from_payload`]); in the latter case encoding splits it
/// across multiple datagrams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSegment {
    /// Data type byte
    pub data_type: u8,
    /// Layer sending the data (1-based wire identifier)
    pub layer_id: u8,
    /// Total logical payload size across all segments
    pub data_size: u32,
    /// Total number of segments
    pub total_packets: u32,
    /// This segment's number, first segment = 1
    pub packet_number: u32,
    /// Cluster byte budget per segment (reserved on the wire for small
    /// waveform packets; round-tripped verbatim either way)
    pub cluster_size: u32,
    /// Segment bytes
    pub bytes: Bytes,
}

impl DataSegment {
    /// Fixed prefix length in bytes, before the segment bytes
    pub const PREFIX_LEN: usize = 18;

    /// Frame an entire logical payload for sending.
    ///
    /// The returned segment carries the whole payload; encoding it through
    /// the packet codec splits it into `ceil(data_size / cluster_size)`
    /// datagrams.
    #[must_use]
    pub fn from_payload(data_type: u8, layer_id: u8, payload: Bytes, cluster_size: u32) -> Self {
        let data_size = payload.len() as u32;
        Self {
            data_type,
            layer_id,
            data_size,
            total_packets: segment_count(data_size, cluster_size),
            packet_number: 1,
            cluster_size,
            bytes: payload,
        }
    }

    /// Whether this segment is the last one of its transfer.
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.packet_number >= self.total_packets
    }

    /// Decode one datagram's segment.
    pub fn decode(r: &mut Reader) -> Result<Self> {
        let data_type = r.u8()?;
        let layer_id = r.u8()?;
        let data_size = r.u32()?;
        let total_packets = r.u32()?;
        let packet_number = r.u32()?;
        let cluster_size = r.u32()?;
        let bytes = r.rest();

        if packet_number > total_packets {
            return Err(Error::MalformedSegment {
                reason: "packet number exceeds declared total",
                packet_number,
                total_packets,
            });
        }
        if bytes.len() > data_size as usize {
            return Err(Error::SizeMismatch {
                expected: data_size as usize,
                got: bytes.len(),
            });
        }

        Ok(Self {
            data_type,
            layer_id,
            data_size,
            total_packets,
            packet_number,
            cluster_size,
            bytes,
        })
    }

    /// Encode this segment as one datagram body.
    pub fn encode(&self, w: &mut Writer) -> Result<()> {
        w.u8(self.data_type);
        w.u8(self.layer_id);
        w.u32(self.data_size);
        w.u32(self.total_packets);
        w.u32(self.packet_number);
        w.u32(self.cluster_size);
        w.raw(&self.bytes);
        Ok(())
    }

    /// Split into wire segments of at most `cluster_size` bytes each.
    ///
    /// Returns the segment unchanged when its bytes already fit one cluster.
    /// Every emitted segment declares identical `data_size`/`total_packets`
    /// and monotonically increasing packet numbers starting at 1; all but
    /// the final segment carry exactly `cluster_size` bytes.
    #[must_use]
    pub fn split(&self) -> Vec<Self> {
        let cluster = self.cluster_size as usize;
        if cluster == 0 || self.bytes.len() <= cluster {
            return vec![self.clone()];
        }

        let total = segment_count(self.bytes.len() as u32, self.cluster_size);
        let mut segments = Vec::with_capacity(total as usize);
        for number in 1..=total {
            let start = (number as usize - 1) * cluster;
            let end = (start + cluster).min(self.bytes.len());
            segments.push(Self {
                data_type: self.data_type,
                layer_id: self.layer_id,
                data_size: self.bytes.len() as u32,
                total_packets: total,
                packet_number: number,
                cluster_size: self.cluster_size,
                bytes: self.bytes.slice(start..end),
            });
        }
        segments
    }
}

/// One datagram's share of an application-specific data payload
///
/// Same framing as [`DataSegment`] except the two application identifier
/// bytes replace the data type/layer pair and a packet signature replaces
/// the cluster size field, so the cluster budget is not on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSegment {
    /// Application identifier signature bytes
    pub ident: [u8; 2],
    /// Total logical payload size across all segments
    pub data_size: u32,
    /// Total number of segments
    pub total_packets: u32,
    /// This segment's number, first segment = 1
    pub packet_number: u32,
    /// Packet signature disambiguating concurrent transfers
    pub signature: u32,
    /// Segment bytes
    pub bytes: Bytes,
}

impl AppSegment {
    /// Fixed prefix length in bytes, before the segment bytes
    pub const PREFIX_LEN: usize = 18;

    /// Frame an entire logical payload for sending with the conventional
    /// packet signature.
    #[must_use]
    pub fn from_payload(ident: [u8; 2], payload: Bytes, cluster_size: u32) -> Self {
        let data_size = payload.len() as u32;
        Self {
            ident,
            data_size,
            total_packets: segment_count(data_size, cluster_size),
            packet_number: 1,
            signature: APP_DATA_SIGNATURE,
            bytes: payload,
        }
    }

    /// Decode one datagram's segment.
    pub fn decode(r: &mut Reader) -> Result<Self> {
        let ident = [r.u8()?, r.u8()?];
        let data_size = r.u32()?;
        let total_packets = r.u32()?;
        let packet_number = r.u32()?;
        let signature = r.u32()?;
        let bytes = r.rest();

        if packet_number > total_packets {
            return Err(Error::MalformedSegment {
                reason: "packet number exceeds declared total",
                packet_number,
                total_packets,
            });
        }
        if bytes.len() > data_size as usize {
            return Err(Error::SizeMismatch {
                expected: data_size as usize,
                got: bytes.len(),
            });
        }

        Ok(Self {
            ident,
            data_size,
            total_packets,
            packet_number,
            signature,
            bytes,
        })
    }

    /// Encode this segment as one datagram body.
    pub fn encode(&self, w: &mut Writer) -> Result<()> {
        w.u8(self.ident[0]);
        w.u8(self.ident[1]);
        w.u32(self.data_size);
        w.u32(self.total_packets);
        w.u32(self.packet_number);
        w.u32(self.signature);
        w.raw(&self.bytes);
        Ok(())
    }

    /// Split into wire segments of at most `cluster_size` bytes each.
    ///
    /// The cluster budget is not carried on the wire for application data,
    /// so the sender chooses it; [`DEFAULT_CLUSTER_SIZE`] is the standard
    /// value.
    #[must_use]
    pub fn split(&self, cluster_size: u32) -> Vec<Self> {
        let cluster = cluster_size as usize;
        if cluster == 0 || self.bytes.len() <= cluster {
            return vec![self.clone()];
        }

        let total = segment_count(self.bytes.len() as u32, cluster_size);
        let mut segments = Vec::with_capacity(total as usize);
        for number in 1..=total {
            let start = (number as usize - 1) * cluster;
            let end = (start + cluster).min(self.bytes.len());
            segments.push(Self {
                ident: self.ident,
                data_size: self.bytes.len() as u32,
                total_packets: total,
                packet_number: number,
                signature: self.signature,
                bytes: self.bytes.slice(start..end),
            });
        }
        segments
    }
}

/// Number of segments needed for `data_size` bytes at `cluster_size` per
/// segment, never less than 1.
#[must_use]
pub fn segment_count(data_size: u32, cluster_size: u32) -> u32 {
    if cluster_size == 0 || data_size == 0 {
        return 1;
    }
    data_size.div_ceil(cluster_size)
}

/// One beat grid record (8 bytes within a joined beat grid payload)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridBeat {
    /// Beat number
    pub number: u16,
    /// Beat type: 20 = down beat, 10 = up beat
    pub beat_type: u8,
    /// Reserved
    pub reserved: u8,
    /// Timestamp in milliseconds
    pub timestamp_ms: u32,
}

impl GridBeat {
    /// Record width in bytes
    pub const LEN: usize = 8;
    /// Beat type marking a down beat
    pub const DOWN_BEAT: u8 = 20;
    /// Beat type marking an up beat
    pub const UP_BEAT: u8 = 10;
}

/// Interpret a fully joined beat grid payload as records.
pub fn grid_beats_from_payload(payload: &[u8]) -> Result<Vec<GridBeat>> {
    if payload.len() % GridBeat::LEN != 0 {
        return Err(Error::SizeMismatch {
            expected: payload.len() - payload.len() % GridBeat::LEN,
            got: payload.len(),
        });
    }

    let mut r = Reader::new(Bytes::copy_from_slice(payload));
    let mut beats = Vec::with_capacity(payload.len() / GridBeat::LEN);
    while r.remaining() > 0 {
        beats.push(GridBeat {
            number: r.u16()?,
            beat_type: r.u8()?,
            reserved: r.u8()?,
            timestamp_ms: r.u32()?,
        });
    }
    Ok(beats)
}

/// Serialize beat grid records into a logical payload.
#[must_use]
pub fn grid_beats_to_payload(beats: &[GridBeat]) -> Bytes {
    let mut w = Writer::with_capacity(beats.len() * GridBeat::LEN);
    for beat in beats {
        w.u16(beat.number);
        w.u8(beat.beat_type);
        w.u8(beat.reserved);
        w.u32(beat.timestamp_ms);
    }
    Bytes::from(w.into_vec())
}

/// RGB cue point color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CueColor {
    /// Red component
    pub red: u8,
    /// Green component
    pub green: u8,
    /// Blue component
    pub blue: u8,
}

/// One cue record (22 bytes within a joined cue payload)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CuePoint {
    /// Cue type
    pub cue_type: u8,
    /// Reserved
    pub reserved1: u8,
    /// Cue in time
    pub in_time: u32,
    /// Cue out time
    pub out_time: u32,
    /// Reserved
    pub reserved2: u8,
    /// Cue color
    pub color: CueColor,
    /// Reserved
    pub reserved3: [u8; 8],
}

impl CuePoint {
    /// Record width in bytes
    pub const LEN: usize = 22;
}

/// Interpreted cue payload: loop window plus cue records
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CueBlock {
    /// Time of loop in
    pub loop_in_time: u32,
    /// Time of loop out
    pub loop_out_time: u32,
    /// Cue records
    pub cues: Vec<CuePoint>,
}

impl CueBlock {
    /// Interpret a fully joined cue payload.
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        if payload.len() < 8 || (payload.len() - 8) % CuePoint::LEN != 0 {
            return Err(Error::SizeMismatch {
                expected: 8,
                got: payload.len(),
            });
        }

        let mut r = Reader::new(Bytes::copy_from_slice(payload));
        let loop_in_time = r.u32()?;
        let loop_out_time = r.u32()?;
        let mut cues = Vec::with_capacity((payload.len() - 8) / CuePoint::LEN);
        while r.remaining() > 0 {
            cues.push(CuePoint {
                cue_type: r.u8()?,
                reserved1: r.u8()?,
                in_time: r.u32()?,
                out_time: r.u32()?,
                reserved2: r.u8()?,
                color: CueColor {
                    red: r.u8()?,
                    green: r.u8()?,
                    blue: r.u8()?,
                },
                reserved3: r.array()?,
            });
        }
        Ok(Self {
            loop_in_time,
            loop_out_time,
            cues,
        })
    }

    /// Serialize into a logical payload.
    #[must_use]
    pub fn to_payload(&self) -> Bytes {
        let mut w = Writer::with_capacity(8 + self.cues.len() * CuePoint::LEN);
        w.u32(self.loop_in_time);
        w.u32(self.loop_out_time);
        for cue in &self.cues {
            w.u8(cue.cue_type);
            w.u8(cue.reserved1);
            w.u32(cue.in_time);
            w.u32(cue.out_time);
            w.u8(cue.reserved2);
            w.u8(cue.color.red);
            w.u8(cue.color.green);
            w.u8(cue.color.blue);
            w.raw(&cue.reserved3);
        }
        Bytes::from(w.into_vec())
    }
}

/// One waveform bar: level/color pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WaveformPoint {
    /// Bar level
    pub level: u8,
    /// Bar color
    pub color: u8,
}

/// Interpret a fully joined waveform payload as level/color pairs.
pub fn waveform_from_payload(payload: &[u8]) -> Result<Vec<WaveformPoint>> {
    if payload.len() % 2 != 0 {
        return Err(Error::SizeMismatch {
            expected: payload.len() - 1,
            got: payload.len(),
        });
    }
    Ok(payload
        .chunks_exact(2)
        .map(|pair| WaveformPoint {
            level: pair[0],
            color: pair[1],
        })
        .collect())
}

/// Serialize waveform pairs into a logical payload.
#[must_use]
pub fn waveform_to_payload(points: &[WaveformPoint]) -> Bytes {
    let mut bytes = Vec::with_capacity(points.len() * 2);
    for point in points {
        bytes.push(point.level);
        bytes.push(point.color);
    }
    Bytes::from(bytes)
}
