//! Track playback payloads: metrics, metadata, and per-layer time
//!
//! Metrics and Metadata are Data messages scoped to a single layer; Time is
//! its own message type carrying the current and total times for all 8
//! layers at once.

use super::wire::{Reader, TextField, Writer};
use super::{
    DataType, Layer, Result, LAYER_COUNT, TRACK_ARTIST_LEN, TRACK_TITLE_LEN,
};

/// Metrics body (98 bytes): playhead state of one layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsData {
    /// Data type byte, 2 for metrics
    pub data_type: u8,
    /// Layer sending the data (1-based wire identifier)
    pub layer_id: u8,
    /// Reserved
    pub reserved1: u8,
    /// Layer state
    pub layer_state: u8,
    /// Reserved
    pub reserved2: u8,
    /// Sync master flag
    pub sync_master: u8,
    /// Reserved
    pub reserved3: u8,
    /// Beat marker
    pub beat_marker: u8,
    /// Track length in milliseconds
    pub track_length_ms: u32,
    /// Playhead position in milliseconds
    pub current_position_ms: u32,
    /// Playhead speed
    pub speed: u32,
    /// Reserved
    pub reserved4: [u8; 13],
    /// Beat number
    pub beat_number: u32,
    /// Reserved
    pub reserved5: [u8; 51],
    /// Beats per minute
    pub bpm: u32,
    /// Pitch bend
    pub pitch_bend: u16,
    /// Assigned track ID
    pub track_id: u32,
}

impl Default for MetricsData {
    fn default() -> Self {
        Self {
            data_type: DataType::Metrics.as_u8(),
            layer_id: 1,
            reserved1: 0,
            layer_state: 0,
            reserved2: 0,
            sync_master: 0,
            reserved3: 0,
            beat_marker: 0,
            track_length_ms: 0,
            current_position_ms: 0,
            speed: 0,
            reserved4: [0; 13],
            beat_number: 0,
            reserved5: [0; 51],
            bpm: 0,
            pitch_bend: 0,
            track_id: 0,
        }
    }
}

impl MetricsData {
    /// Fixed body length in bytes
    pub const LEN: usize = 98;

    /// Typed layer, if the wire identifier is in range.
    pub fn layer(&self) -> Result<Layer> {
        Layer::from_wire(self.layer_id)
    }

    /// Decode the body following the header.
    pub fn decode(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            data_type: r.u8()?,
            layer_id: r.u8()?,
            reserved1: r.u8()?,
            layer_state: r.u8()?,
            reserved2: r.u8()?,
            sync_master: r.u8()?,
            reserved3: r.u8()?,
            beat_marker: r.u8()?,
            track_length_ms: r.u32()?,
            current_position_ms: r.u32()?,
            speed: r.u32()?,
            reserved4: r.array()?,
            beat_number: r.u32()?,
            reserved5: r.array()?,
            bpm: r.u32()?,
            pitch_bend: r.u16()?,
            track_id: r.u32()?,
        })
    }

    /// Encode the body.
    pub fn encode(&self, w: &mut Writer) -> Result<()> {
        w.u8(self.data_type);
        w.u8(self.layer_id);
        w.u8(self.reserved1);
        w.u8(self.layer_state);
        w.u8(self.reserved2);
        w.u8(self.sync_master);
        w.u8(self.reserved3);
        w.u8(self.beat_marker);
        w.u32(self.track_length_ms);
        w.u32(self.current_position_ms);
        w.u32(self.speed);
        w.raw(&self.reserved4);
        w.u32(self.beat_number);
        w.raw(&self.reserved5);
        w.u32(self.bpm);
        w.u16(self.pitch_bend);
        w.u32(self.track_id);
        Ok(())
    }
}

/// Metadata body (395 bytes): loaded track identity for one layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// Data type byte, 4 for metadata
    pub data_type: u8,
    /// Layer sending the data (1-based wire identifier)
    pub layer_id: u8,
    /// Reserved
    pub reserved1: u8,
    /// Reserved
    pub reserved2: [u8; 2],
    /// Track artist name, 128 raw bytes on the wire
    pub track_artist: TextField<TRACK_ARTIST_LEN>,
    /// Track title, 256 raw bytes on the wire
    pub track_title: TextField<TRACK_TITLE_LEN>,
    /// Track key
    pub track_key: u16,
    /// Assigned track ID
    pub track_id: u32,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            data_type: DataType::Metadata.as_u8(),
            layer_id: 1,
            reserved1: 0,
            reserved2: [0; 2],
            track_artist: TextField::empty(),
            track_title: TextField::empty(),
            track_key: 0,
            track_id: 0,
        }
    }
}

impl Metadata {
    /// Fixed body length in bytes
    pub const LEN: usize = 395;

    /// Typed layer, if the wire identifier is in range.
    pub fn layer(&self) -> Result<Layer> {
        Layer::from_wire(self.layer_id)
    }

    /// Decode the body following the header.
    pub fn decode(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            data_type: r.u8()?,
            layer_id: r.u8()?,
            reserved1: r.u8()?,
            reserved2: r.array()?,
            track_artist: r.text_field()?,
            track_title: r.text_field()?,
            track_key: r.u16()?,
            track_id: r.u32()?,
        })
    }

    /// Encode the body.
    pub fn encode(&self, w: &mut Writer) -> Result<()> {
        w.u8(self.data_type);
        w.u8(self.layer_id);
        w.u8(self.reserved1);
        w.raw(&self.reserved2);
        w.text_field(&self.track_artist);
        w.text_field(&self.track_title);
        w.u16(self.track_key);
        w.u32(self.track_id);
        Ok(())
    }
}

/// Time body (80 bytes): current/total time, beat marker, and state per layer
///
/// The four arrays run in wire order 1, 2, 3, 4, A, B, M, C and are indexed
/// by [`Layer::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeData {
    /// Current time per layer, milliseconds
    pub layer_current_ms: [u32; LAYER_COUNT],
    /// Total time per layer, milliseconds
    pub layer_total_ms: [u32; LAYER_COUNT],
    /// Beat marker per layer (0-4)
    pub layer_beat_marker: [u8; LAYER_COUNT],
    /// Layer state per layer
    pub layer_state: [u8; LAYER_COUNT],
}

impl TimeData {
    /// Fixed body length in bytes
    pub const LEN: usize = 80;

    /// Current time of one layer in milliseconds.
    #[must_use]
    pub fn current_ms(&self, layer: Layer) -> u32 {
        self.layer_current_ms[layer.index()]
    }

    /// Total time of one layer in milliseconds.
    #[must_use]
    pub fn total_ms(&self, layer: Layer) -> u32 {
        self.layer_total_ms[layer.index()]
    }

    /// Decode the body following the header.
    pub fn decode(r: &mut Reader) -> Result<Self> {
        let mut body = Self::default();
        for slot in &mut body.layer_current_ms {
            *slot = r.u32()?;
        }
        for slot in &mut body.layer_total_ms {
            *slot = r.u32()?;
        }
        body.layer_beat_marker = r.array()?;
        body.layer_state = r.array()?;
        Ok(body)
    }

    /// Encode the body.
    pub fn encode(&self, w: &mut Writer) -> Result<()> {
        for ms in self.layer_current_ms {
            w.u32(ms);
        }
        for ms in self.layer_total_ms {
            w.u32(ms);
        }
        w.raw(&self.layer_beat_marker);
        w.raw(&self.layer_state);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn metrics_roundtrip_preserves_reserved_bytes() {
        let mut metrics = MetricsData {
            layer_id: 2,
            layer_state: 3,
            sync_master: 1,
            beat_marker: 4,
            track_length_ms: 322_000,
            current_position_ms: 120_500,
            speed: 1_000_000,
            beat_number: 512,
            bpm: 12_800,
            pitch_bend: 0x8000,
            track_id: 42,
            ..MetricsData::default()
        };
        metrics.reserved4[12] = 0x42;
        metrics.reserved5[50] = 0x24;

        let mut w = Writer::new();
        metrics.encode(&mut w).unwrap();
        assert_eq!(w.len(), MetricsData::LEN);
        let mut r = Reader::new(Bytes::from(w.into_vec()));
        let decoded = MetricsData::decode(&mut r).unwrap();
        assert_eq!(decoded, metrics);
        assert_eq!(decoded.layer().unwrap(), Layer::Layer2);
    }

    #[test]
    fn metadata_roundtrip() {
        let meta = Metadata {
            layer_id: 1,
            track_artist: "Underworld".into(),
            track_title: "Born Slippy .NUXX".into(),
            track_key: 21,
            track_id: 777,
            ..Metadata::default()
        };

        let mut w = Writer::new();
        meta.encode(&mut w).unwrap();
        assert_eq!(w.len(), Metadata::LEN);
        let mut r = Reader::new(Bytes::from(w.into_vec()));
        assert_eq!(Metadata::decode(&mut r).unwrap(), meta);
    }

    #[test]
    fn metadata_title_overflow_is_field_too_long() {
        let title = "x".repeat(TRACK_TITLE_LEN + 1);
        assert!(matches!(
            TextField::<TRACK_TITLE_LEN>::new("track_title", &title),
            Err(crate::protocol::Error::FieldTooLong {
                field: "track_title",
                ..
            })
        ));
    }

    #[test]
    fn time_roundtrip_and_layer_accessors() {
        let mut time = TimeData::default();
        for layer in Layer::ALL {
            time.layer_current_ms[layer.index()] = u32::from(layer.wire()) * 100;
            time.layer_total_ms[layer.index()] = u32::from(layer.wire()) * 1000;
            time.layer_beat_marker[layer.index()] = layer.wire() % 5;
            time.layer_state[layer.index()] = layer.wire();
        }

        let mut w = Writer::new();
        time.encode(&mut w).unwrap();
        assert_eq!(w.len(), TimeData::LEN);
        let mut r = Reader::new(Bytes::from(w.into_vec()));
        let decoded = TimeData::decode(&mut r).unwrap();
        assert_eq!(decoded, time);
        assert_eq!(decoded.current_ms(Layer::LayerA), 500);
        assert_eq!(decoded.total_ms(Layer::LayerC), 8000);
    }
}
