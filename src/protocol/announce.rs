//! Network participation and notification payloads
//!
//! OptIn/OptOut carry node identity, Status carries the per-layer state
//! arrays, TimeSync steps the clock exchange, and ErrorNotification/Request
//! close the request loop. All are fixed-layout bodies following the common
//! header.
//!
//! Reserved fields are decoded and re-encoded verbatim so a captured packet
//! survives a round trip byte-for-byte even if a future protocol revision
//! assigns them meaning.

use std::borrow::Cow;

use super::wire::{Reader, TextField, Writer};
use super::{Layer, Result, DEVICE_NAME_LEN, LAYER_COUNT, LAYER_NAME_LEN, VENDOR_NAME_LEN};

/// OptIn body (44 bytes): a node announcing itself on the network
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OptIn {
    /// Amount of registered nodes
    pub node_count: u16,
    /// Listener port for unicast messages
    pub node_listener_port: u16,
    /// Node uptime in seconds
    pub uptime: u16,
    /// Reserved
    pub reserved1: u16,
    /// Vendor name, 16 raw bytes on the wire
    pub vendor_name: TextField<VENDOR_NAME_LEN>,
    /// Application / device name, 16 raw bytes on the wire
    pub device_name: TextField<DEVICE_NAME_LEN>,
    /// Application/device major version
    pub app_version_major: u8,
    /// Application/device minor version
    pub app_version_minor: u8,
    /// Application/device bugfix version
    pub app_version_bug: u8,
    /// Reserved
    pub reserved2: u8,
}

impl OptIn {
    /// Fixed body length in bytes
    pub const LEN: usize = 44;

    /// Decode the body following the header.
    pub fn decode(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            node_count: r.u16()?,
            node_listener_port: r.u16()?,
            uptime: r.u16()?,
            reserved1: r.u16()?,
            vendor_name: r.text_field()?,
            device_name: r.text_field()?,
            app_version_major: r.u8()?,
            app_version_minor: r.u8()?,
            app_version_bug: r.u8()?,
            reserved2: r.u8()?,
        })
    }

    /// Encode the body.
    pub fn encode(&self, w: &mut Writer) -> Result<()> {
        w.u16(self.node_count);
        w.u16(self.node_listener_port);
        w.u16(self.uptime);
        w.u16(self.reserved1);
        w.text_field(&self.vendor_name);
        w.text_field(&self.device_name);
        w.u8(self.app_version_major);
        w.u8(self.app_version_minor);
        w.u8(self.app_version_bug);
        w.u8(self.reserved2);
        Ok(())
    }
}

/// OptOut body (4 bytes): a node leaving the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OptOut {
    /// Amount of registered nodes
    pub node_count: u16,
    /// Listener port for unicast messages
    pub node_listener_port: u16,
}

impl OptOut {
    /// Fixed body length in bytes
    pub const LEN: usize = 4;

    /// Decode the body following the header.
    pub fn decode(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            node_count: r.u16()?,
            node_listener_port: r.u16()?,
        })
    }

    /// Encode the body.
    pub fn encode(&self, w: &mut Writer) -> Result<()> {
        w.u16(self.node_count);
        w.u16(self.node_listener_port);
        Ok(())
    }
}

/// Status body (276 bytes): per-layer state broadcast
///
/// The four per-layer arrays are parallel: index `i` of `layer_source`,
/// `layer_status`, `layer_track_id`, and `layer_name` all describe the same
/// logical layer. Use [`Layer::index`] to address them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// Amount of registered nodes
    pub node_count: u16,
    /// Listener port for unicast messages
    pub node_listener_port: u16,
    /// Reserved
    pub reserved1: [u8; 6],
    /// Source per layer
    pub layer_source: [u8; LAYER_COUNT],
    /// Status per layer
    pub layer_status: [u8; LAYER_COUNT],
    /// Assigned track ID per layer
    pub layer_track_id: [u32; LAYER_COUNT],
    /// Reserved
    pub reserved2: u8,
    /// SMPTE mode
    pub smpte_mode: u8,
    /// Auto master mode
    pub auto_master_mode: u8,
    /// Reserved
    pub reserved3: [u8; 15],
    /// Application-specific bytes, opaque to the codec
    pub app_specific: [u8; 72],
    /// Name per layer, 16 raw bytes each on the wire
    pub layer_name: [TextField<LAYER_NAME_LEN>; LAYER_COUNT],
}

impl Default for Status {
    fn default() -> Self {
        Self {
            node_count: 0,
            node_listener_port: 0,
            reserved1: [0; 6],
            layer_source: [0; LAYER_COUNT],
            layer_status: [0; LAYER_COUNT],
            layer_track_id: [0; LAYER_COUNT],
            reserved2: 0,
            smpte_mode: 0,
            auto_master_mode: 0,
            reserved3: [0; 15],
            app_specific: [0; 72],
            layer_name: [TextField::empty(); LAYER_COUNT],
        }
    }
}

impl Status {
    /// Fixed body length in bytes
    pub const LEN: usize = 276;

    /// Name of one layer, trimmed for display.
    #[must_use]
    pub fn layer_name(&self, layer: Layer) -> Cow<'_, str> {
        self.layer_name[layer.index()].as_str()
    }

    /// Track ID assigned to one layer.
    #[must_use]
    pub fn layer_track_id(&self, layer: Layer) -> u32 {
        self.layer_track_id[layer.index()]
    }

    /// Decode the body following the header.
    pub fn decode(r: &mut Reader) -> Result<Self> {
        let node_count = r.u16()?;
        let node_listener_port = r.u16()?;
        let reserved1 = r.array()?;
        let layer_source = r.array()?;
        let layer_status = r.array()?;
        let mut layer_track_id = [0u32; LAYER_COUNT];
        for slot in &mut layer_track_id {
            *slot = r.u32()?;
        }
        let reserved2 = r.u8()?;
        let smpte_mode = r.u8()?;
        let auto_master_mode = r.u8()?;
        let reserved3 = r.array()?;
        let app_specific = r.array()?;
        let mut layer_name = [TextField::empty(); LAYER_COUNT];
        for slot in &mut layer_name {
            *slot = r.text_field()?;
        }

        Ok(Self {
            node_count,
            node_listener_port,
            reserved1,
            layer_source,
            layer_status,
            layer_track_id,
            reserved2,
            smpte_mode,
            auto_master_mode,
            reserved3,
            app_specific,
            layer_name,
        })
    }

    /// Encode the body.
    pub fn encode(&self, w: &mut Writer) -> Result<()> {
        w.u16(self.node_count);
        w.u16(self.node_listener_port);
        w.raw(&self.reserved1);
        w.raw(&self.layer_source);
        w.raw(&self.layer_status);
        for id in self.layer_track_id {
            w.u32(id);
        }
        w.u8(self.reserved2);
        w.u8(self.smpte_mode);
        w.u8(self.auto_master_mode);
        w.raw(&self.reserved3);
        w.raw(&self.app_specific);
        for name in &self.layer_name {
            w.text_field(name);
        }
        Ok(())
    }
}

/// TimeSync body (8 bytes): one step of the clock handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeSync {
    /// Step number within the exchange
    pub step: u8,
    /// Reserved
    pub reserved: u8,
    /// Listener port for unicast messages
    pub node_listener_port: u16,
    /// Timestamp of the remote node
    pub remote_timestamp: u32,
}

impl TimeSync {
    /// Fixed body length in bytes
    pub const LEN: usize = 8;

    /// Decode the body following the header.
    pub fn decode(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            step: r.u8()?,
            reserved: r.u8()?,
            node_listener_port: r.u16()?,
            remote_timestamp: r.u32()?,
        })
    }

    /// Encode the body.
    pub fn encode(&self, w: &mut Writer) -> Result<()> {
        w.u8(self.step);
        w.u8(self.reserved);
        w.u16(self.node_listener_port);
        w.u32(self.remote_timestamp);
        Ok(())
    }
}

/// ErrorNotification body (6 bytes): outcome of a failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ErrorNotification {
    /// Data type of the original request
    pub data_type: u8,
    /// Layer of the original request
    pub layer_id: u8,
    /// Returned code
    pub code: u16,
    /// Message type of the original request
    pub request_message_type: u16,
}

impl ErrorNotification {
    /// Fixed body length in bytes
    pub const LEN: usize = 6;

    /// Decode the body following the header.
    pub fn decode(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            data_type: r.u8()?,
            layer_id: r.u8()?,
            code: r.u16()?,
            request_message_type: r.u16()?,
        })
    }

    /// Encode the body.
    pub fn encode(&self, w: &mut Writer) -> Result<()> {
        w.u8(self.data_type);
        w.u8(self.layer_id);
        w.u16(self.code);
        w.u16(self.request_message_type);
        Ok(())
    }
}

/// Request body (2 bytes): ask a node for data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Request {
    /// Data type to request
    pub data_type: u8,
    /// Layer the data belongs to
    pub layer: u8,
}

impl Request {
    /// Fixed body length in bytes
    pub const LEN: usize = 2;

    /// Decode the body following the header.
    pub fn decode(r: &mut Reader) -> Result<Self> {
        Ok(Self {
            data_type: r.u8()?,
            layer: r.u8()?,
        })
    }

    /// Encode the body.
    pub fn encode(&self, w: &mut Writer) -> Result<()> {
        w.u8(self.data_type);
        w.u8(self.layer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn roundtrip<T, D, E>(value: &T, decode: D, encode: E, expected_len: usize) -> T
    where
        D: Fn(&mut Reader) -> Result<T>,
        E: Fn(&T, &mut Writer) -> Result<()>,
    {
        let mut w = Writer::new();
        encode(value, &mut w).unwrap();
        assert_eq!(w.len(), expected_len);
        let mut r = Reader::new(Bytes::from(w.into_vec()));
        let decoded = decode(&mut r).unwrap();
        assert_eq!(r.remaining(), 0);
        decoded
    }

    #[test]
    fn optin_roundtrip() {
        let optin = OptIn {
            node_count: 1,
            node_listener_port: 65023,
            uptime: 120,
            reserved1: 0,
            vendor_name: "ECLIPTEK ENTRN.".into(),
            device_name: "The Ligma Node".into(),
            app_version_major: 3,
            app_version_minor: 3,
            app_version_bug: 0,
            reserved2: 0,
        };
        let decoded = roundtrip(&optin, OptIn::decode, OptIn::encode, OptIn::LEN);
        assert_eq!(decoded, optin);
    }

    #[test]
    fn status_roundtrip_preserves_reserved_bytes() {
        let mut status = Status {
            node_count: 3,
            node_listener_port: 60000,
            smpte_mode: 1,
            auto_master_mode: 2,
            ..Status::default()
        };
        // Opaque reserved bytes must survive the round trip, not be zeroed.
        status.reserved1 = [1, 2, 3, 4, 5, 6];
        status.reserved3[14] = 0xAA;
        status.app_specific[0] = 0x55;
        status.app_specific[71] = 0x99;
        for layer in Layer::ALL {
            status.layer_source[layer.index()] = layer.wire();
            status.layer_status[layer.index()] = 0x10 + layer.wire();
            status.layer_track_id[layer.index()] = u32::from(layer.wire()) * 1000;
            status.layer_name[layer.index()] = format!("LAYER {}", layer.label()).as_str().into();
        }

        let decoded = roundtrip(&status, Status::decode, Status::encode, Status::LEN);
        assert_eq!(decoded, status);
        assert_eq!(decoded.layer_name(Layer::LayerM), "LAYER M");
        assert_eq!(decoded.layer_track_id(Layer::Layer2), 2000);
    }

    #[test]
    fn status_parallel_arrays_align_by_layer_index() {
        let mut status = Status::default();
        status.layer_source[Layer::LayerC.index()] = 9;
        status.layer_status[Layer::LayerC.index()] = 7;
        status.layer_name[Layer::LayerC.index()] = "CUE".into();

        let decoded = roundtrip(&status, Status::decode, Status::encode, Status::LEN);
        let i = Layer::LayerC.index();
        assert_eq!(decoded.layer_source[i], 9);
        assert_eq!(decoded.layer_status[i], 7);
        assert_eq!(decoded.layer_name[i], "CUE");
    }

    #[test]
    fn small_bodies_roundtrip() {
        let sync = TimeSync {
            step: 2,
            reserved: 0,
            node_listener_port: 65023,
            remote_timestamp: 123_456,
        };
        assert_eq!(
            roundtrip(&sync, TimeSync::decode, TimeSync::encode, TimeSync::LEN),
            sync
        );

        let err = ErrorNotification {
            data_type: 8,
            layer_id: 1,
            code: 404,
            request_message_type: 20,
        };
        assert_eq!(
            roundtrip(
                &err,
                ErrorNotification::decode,
                ErrorNotification::encode,
                ErrorNotification::LEN
            ),
            err
        );

        let req = Request {
            data_type: 12,
            layer: 3,
        };
        assert_eq!(
            roundtrip(&req, Request::decode, Request::encode, Request::LEN),
            req
        );

        let out = OptOut {
            node_count: 0,
            node_listener_port: 65023,
        };
        assert_eq!(
            roundtrip(&out, OptOut::decode, OptOut::encode, OptOut::LEN),
            out
        );
    }

    #[test]
    fn truncated_status_is_an_error() {
        let mut w = Writer::new();
        Status::default().encode(&mut w).unwrap();
        let bytes = w.into_vec();
        let mut r = Reader::new(Bytes::from(bytes[..Status::LEN - 1].to_vec()));
        assert!(matches!(
            Status::decode(&mut r),
            Err(crate::protocol::Error::Truncated { .. })
        ));
    }
}
