//! TCNet packet codec (encode/decode)
//!
//! Decoding is zero-copy over [`Bytes`]: variable trailers and segment bytes
//! are slices of the input datagram. Encoding produces one datagram per wire
//! segment; fixed bodies always encode to exactly one.

use bytes::Bytes;
use tracing::trace;

use super::announce::{ErrorNotification, OptIn, OptOut, Request, Status, TimeSync};
use super::control::{Control, Keyboard, TextData};
use super::header::PacketHeader;
use super::metrics::Metrics;
use super::mixer::MixerSnapshot;
use super::segment::{AppSegment, DataSegment};
use super::track::{Metadata, MetricsData, TimeData};
use super::wire::{Reader, Writer};
use super::{
    DataType, Error, MessageType, Packet, PacketBody, Result, DEFAULT_CLUSTER_SIZE, HEADER_LEN,
};

/// Decode one datagram into a typed packet
///
/// The buffer must start with the 24-byte common header; the body is
/// dispatched on the header's message type and, for Data messages, on the
/// body's leading data type byte. Bytes past a fixed-size body are ignored,
/// matching hardware that pads datagrams.
///
/// # Errors
///
/// Returns an error if:
/// - The buffer is shorter than the header or the dispatched body
/// - The signature literal is not "TCN"
/// - The message type or data type byte is unrecognized
/// - A segment declares an impossible number/total combination
pub fn decode(bytes: Bytes) -> Result<Packet> {
    match decode_packet(bytes) {
        Ok((packet, msg_type)) => {
            Metrics::record_decoded(msg_type);
            trace!(
                node_id = packet.header.node_id,
                body = packet.body.name(),
                "packet decoded"
            );
            Ok(packet)
        }
        Err(err) => {
            Metrics::record_decode_error();
            Err(err)
        }
    }
}

fn decode_packet(bytes: Bytes) -> Result<(Packet, MessageType)> {
    let mut r = Reader::new(bytes);
    let header = PacketHeader::decode(&mut r)?;
    let msg_type = header.message_type().ok_or(Error::UnknownPacketKind {
        message_type: header.message_type,
        data_type: None,
    })?;

    let body = match msg_type {
        MessageType::OptIn => PacketBody::OptIn(OptIn::decode(&mut r)?),
        MessageType::OptOut => PacketBody::OptOut(OptOut::decode(&mut r)?),
        MessageType::Status => PacketBody::Status(Box::new(Status::decode(&mut r)?)),
        MessageType::TimeSync => PacketBody::TimeSync(TimeSync::decode(&mut r)?),
        MessageType::ErrorNotification => {
            PacketBody::ErrorNotification(ErrorNotification::decode(&mut r)?)
        }
        MessageType::Request => PacketBody::Request(Request::decode(&mut r)?),
        MessageType::ApplicationSpecificPacket | MessageType::ApplicationSpecificData => {
            PacketBody::ApplicationSpecificData(AppSegment::decode(&mut r)?)
        }
        MessageType::Control => PacketBody::Control(Control::decode(&mut r)?),
        MessageType::Text => PacketBody::Text(TextData::decode(&mut r)?),
        MessageType::Keyboard => PacketBody::Keyboard(Keyboard::decode(&mut r)?),
        MessageType::Data => decode_data_body(&mut r)?,
        MessageType::LowResArtworkImage => {
            PacketBody::LowResArtworkFile(DataSegment::decode(&mut r)?)
        }
        MessageType::Time => PacketBody::Time(TimeData::decode(&mut r)?),
    };

    Ok((Packet { header, body }, msg_type))
}

/// Data messages carry a second discriminant in the body's first byte.
fn decode_data_body(r: &mut Reader) -> Result<PacketBody> {
    let data_type_byte = r.peek_u8()?;
    let data_type = DataType::from_u8(data_type_byte).ok_or(Error::UnknownPacketKind {
        message_type: MessageType::Data.as_u8(),
        data_type: Some(data_type_byte),
    })?;

    Ok(match data_type {
        DataType::Metrics => PacketBody::MetricsData(MetricsData::decode(r)?),
        DataType::Metadata => PacketBody::MetaData(Box::new(Metadata::decode(r)?)),
        DataType::Mixer => PacketBody::MixerData(Box::new(MixerSnapshot::decode(r)?)),
        DataType::BeatGrid => PacketBody::BeatGridData(DataSegment::decode(r)?),
        DataType::CueInfo => PacketBody::CueData(DataSegment::decode(r)?),
        DataType::SmallWaveForm => PacketBody::SmallWaveformData(DataSegment::decode(r)?),
        DataType::BigWaveForm => PacketBody::BigWaveformData(DataSegment::decode(r)?),
        DataType::LowResArtwork => PacketBody::LowResArtworkFile(DataSegment::decode(r)?),
    })
}

/// Encode one packet into wire datagrams
///
/// Fixed bodies yield exactly one datagram. A segmented body whose bytes
/// exceed its cluster budget is split and yields one datagram per segment;
/// all of them share the packet's header verbatim, so the caller owns
/// sequence numbering across datagrams. Application data with no explicit
/// split uses [`DEFAULT_CLUSTER_SIZE`].
///
/// # Errors
///
/// Returns [`Error::FieldTooLong`] when a text field exceeds its wire width
/// or a variable trailer cannot be described by its length field.
pub fn encode(packet: &Packet) -> Result<Vec<Vec<u8>>> {
    let datagrams = match &packet.body {
        PacketBody::BeatGridData(segment)
        | PacketBody::CueData(segment)
        | PacketBody::SmallWaveformData(segment)
        | PacketBody::BigWaveformData(segment)
        | PacketBody::LowResArtworkFile(segment) => segment
            .split()
            .iter()
            .map(|seg| encode_datagram(&packet.header, seg.bytes.len(), |w| seg.encode(w)))
            .collect::<Result<Vec<_>>>()?,
        PacketBody::ApplicationSpecificData(segment) => segment
            .split(DEFAULT_CLUSTER_SIZE)
            .iter()
            .map(|seg| encode_datagram(&packet.header, seg.bytes.len(), |w| seg.encode(w)))
            .collect::<Result<Vec<_>>>()?,
        PacketBody::OptIn(b) => {
            vec![encode_datagram(&packet.header, OptIn::LEN, |w| b.encode(w))?]
        }
        PacketBody::OptOut(b) => {
            vec![encode_datagram(&packet.header, OptOut::LEN, |w| b.encode(w))?]
        }
        PacketBody::Status(b) => {
            vec![encode_datagram(&packet.header, Status::LEN, |w| b.encode(w))?]
        }
        PacketBody::TimeSync(b) => {
            vec![encode_datagram(&packet.header, TimeSync::LEN, |w| b.encode(w))?]
        }
        PacketBody::ErrorNotification(b) => vec![encode_datagram(
            &packet.header,
            ErrorNotification::LEN,
            |w| b.encode(w),
        )?],
        PacketBody::Request(b) => {
            vec![encode_datagram(&packet.header, Request::LEN, |w| b.encode(w))?]
        }
        PacketBody::Control(b) => vec![encode_datagram(
            &packet.header,
            Control::PREFIX_LEN + b.data.len(),
            |w| b.encode(w),
        )?],
        PacketBody::Text(b) => vec![encode_datagram(
            &packet.header,
            TextData::PREFIX_LEN + b.data.len(),
            |w| b.encode(w),
        )?],
        PacketBody::Keyboard(b) => {
            vec![encode_datagram(&packet.header, Keyboard::LEN, |w| b.encode(w))?]
        }
        PacketBody::MetricsData(b) => {
            vec![encode_datagram(&packet.header, MetricsData::LEN, |w| b.encode(w))?]
        }
        PacketBody::MetaData(b) => {
            vec![encode_datagram(&packet.header, Metadata::LEN, |w| b.encode(w))?]
        }
        PacketBody::MixerData(b) => {
            vec![encode_datagram(&packet.header, MixerSnapshot::LEN, |w| b.encode(w))?]
        }
        PacketBody::Time(b) => {
            vec![encode_datagram(&packet.header, TimeData::LEN, |w| b.encode(w))?]
        }
    };

    Metrics::record_encoded(datagrams.len());
    trace!(
        node_id = packet.header.node_id,
        body = packet.body.name(),
        datagrams = datagrams.len(),
        "packet encoded"
    );
    Ok(datagrams)
}

fn encode_datagram(
    header: &PacketHeader,
    size_hint: usize,
    body: impl FnOnce(&mut Writer) -> Result<()>,
) -> Result<Vec<u8>> {
    let mut w = Writer::with_capacity(HEADER_LEN + size_hint);
    header.encode(&mut w)?;
    body(&mut w)?;
    Ok(w.into_vec())
}
