//! End-to-end segmented transfer flow: encode, scatter, decode, reassemble

use std::time::{Duration, Instant};

use bytes::Bytes;
use tcnet::protocol::segment::{waveform_from_payload, AppSegment, DataSegment};
use tcnet::{
    decode, encode, DataType, FeedOutcome, Packet, PacketBody, ReassemblyBuffer, ReassemblyConfig,
};

fn waveform_datagrams(node_id: u16, layer: u8, payload: &Bytes, cluster: u32) -> Vec<Bytes> {
    let packet = Packet::new(
        node_id,
        "DECK",
        PacketBody::BigWaveformData(DataSegment::from_payload(
            DataType::BigWaveForm.as_u8(),
            layer,
            payload.clone(),
            cluster,
        )),
    );
    encode(&packet)
        .expect("encode")
        .into_iter()
        .map(Bytes::from)
        .collect()
}

fn feed(buffer: &mut ReassemblyBuffer, datagram: &Bytes, now: Instant) -> FeedOutcome {
    let packet = decode(datagram.clone()).expect("decode");
    match &packet.body {
        PacketBody::BigWaveformData(segment) => buffer
            .feed_data(packet.header.node_id, segment, now)
            .expect("feed"),
        other => panic!("unexpected body {}", other.name()),
    }
}

#[test]
fn out_of_order_transfer_completes_with_identical_payload() {
    let payload = Bytes::from((0..12_345u32).map(|i| (i % 251) as u8).collect::<Vec<_>>());
    let datagrams = waveform_datagrams(1, 2, &payload, 4800);
    assert_eq!(datagrams.len(), 3);

    let mut buffer = ReassemblyBuffer::new(ReassemblyConfig::default());
    let now = Instant::now();

    // Arrival order 3, 1, 2 with a duplicated middle segment.
    assert!(matches!(
        feed(&mut buffer, &datagrams[2], now),
        FeedOutcome::Pending {
            received: 1,
            total: 3
        }
    ));
    assert!(matches!(
        feed(&mut buffer, &datagrams[0], now),
        FeedOutcome::Pending {
            received: 2,
            total: 3
        }
    ));
    assert!(matches!(
        feed(&mut buffer, &datagrams[0], now),
        FeedOutcome::Pending {
            received: 2,
            total: 3
        }
    ));

    match feed(&mut buffer, &datagrams[1], now) {
        FeedOutcome::Complete(joined) => assert_eq!(joined, payload),
        FeedOutcome::Pending { .. } => panic!("transfer should have completed"),
    }
    assert!(buffer.is_empty());
}

#[test]
fn joined_waveform_interprets_as_level_color_pairs() {
    let mut raw = Vec::new();
    for bar in 0..600u32 {
        raw.push((bar % 128) as u8);
        raw.push((bar % 4) as u8);
    }
    let payload = Bytes::from(raw);
    let datagrams = waveform_datagrams(1, 1, &payload, 480);

    let mut buffer = ReassemblyBuffer::new(ReassemblyConfig::default());
    let now = Instant::now();
    let mut joined = None;
    for datagram in &datagrams {
        if let FeedOutcome::Complete(bytes) = feed(&mut buffer, datagram, now) {
            joined = Some(bytes);
        }
    }

    let points = waveform_from_payload(&joined.expect("complete")).expect("interpret");
    assert_eq!(points.len(), 600);
    assert_eq!(points[5].level, 5);
    assert_eq!(points[5].color, 1);
}

#[test]
fn transfers_from_different_nodes_and_layers_do_not_mix() {
    let payload_a = Bytes::from(vec![0xAAu8; 9600]);
    let payload_b = Bytes::from(vec![0xBBu8; 9600]);
    let a = waveform_datagrams(1, 1, &payload_a, 4800);
    let b = waveform_datagrams(2, 1, &payload_b, 4800);

    let mut buffer = ReassemblyBuffer::new(ReassemblyConfig::default());
    let now = Instant::now();

    feed(&mut buffer, &a[0], now);
    feed(&mut buffer, &b[0], now);
    assert_eq!(buffer.len(), 2);

    match feed(&mut buffer, &b[1], now) {
        FeedOutcome::Complete(joined) => assert_eq!(joined, payload_b),
        FeedOutcome::Pending { .. } => panic!("node 2 transfer should have completed"),
    }
    match feed(&mut buffer, &a[1], now) {
        FeedOutcome::Complete(joined) => assert_eq!(joined, payload_a),
        FeedOutcome::Pending { .. } => panic!("node 1 transfer should have completed"),
    }
}

#[test]
fn stalled_transfer_expires_and_restarts_cleanly() {
    let payload = Bytes::from(vec![0x11u8; 9600]);
    let datagrams = waveform_datagrams(1, 1, &payload, 4800);

    let config = ReassemblyConfig {
        timeout: Duration::from_millis(500),
        ..ReassemblyConfig::default()
    };
    let mut buffer = ReassemblyBuffer::new(config);
    let start = Instant::now();

    feed(&mut buffer, &datagrams[0], start);
    assert_eq!(buffer.sweep(start + Duration::from_secs(1)), 1);
    assert!(buffer.is_empty());

    // The late second segment opens a new transfer instead of completing.
    assert!(matches!(
        feed(&mut buffer, &datagrams[1], start + Duration::from_secs(1)),
        FeedOutcome::Pending {
            received: 1,
            total: 2
        }
    ));
    match feed(&mut buffer, &datagrams[0], start + Duration::from_secs(1)) {
        FeedOutcome::Complete(joined) => assert_eq!(joined, payload),
        FeedOutcome::Pending { .. } => panic!("restarted transfer should complete"),
    }
}

#[test]
fn application_data_round_trips_through_the_wire() {
    let payload = Bytes::from((0..7_000u32).map(|i| (i % 89) as u8).collect::<Vec<_>>());
    let packet = Packet::new(
        9,
        "APPNODE",
        PacketBody::ApplicationSpecificData(AppSegment::from_payload(
            [b'X', b'1'],
            payload.clone(),
            4800,
        )),
    );

    let datagrams = encode(&packet).expect("encode");
    assert_eq!(datagrams.len(), 2);

    let mut buffer = ReassemblyBuffer::new(ReassemblyConfig::default());
    let now = Instant::now();
    let mut joined = None;
    for datagram in datagrams {
        let decoded = decode(Bytes::from(datagram)).expect("decode");
        match &decoded.body {
            PacketBody::ApplicationSpecificData(segment) => {
                assert_eq!(segment.ident, [b'X', b'1']);
                if let FeedOutcome::Complete(bytes) = buffer
                    .feed_application(decoded.header.node_id, segment, now)
                    .expect("feed")
                {
                    joined = Some(bytes);
                }
            }
            other => panic!("unexpected body {}", other.name()),
        }
    }
    assert_eq!(joined.expect("complete"), payload);
}
