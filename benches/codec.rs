use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tcnet::protocol::announce::Status;
use tcnet::protocol::segment::DataSegment;
use tcnet::protocol::track::MetricsData;
use tcnet::{decode, encode, DataType, Packet, PacketBody, ReassemblyBuffer, ReassemblyConfig};

fn metrics_packet() -> Packet {
    Packet::new(1, "NODE0001", PacketBody::MetricsData(MetricsData::default()))
}

fn status_packet() -> Packet {
    Packet::new(1, "NODE0001", PacketBody::Status(Box::new(Status::default())))
}

fn waveform_packet(len: usize, cluster: u32) -> Packet {
    Packet::new(
        1,
        "NODE0001",
        PacketBody::BigWaveformData(DataSegment::from_payload(
            DataType::BigWaveForm.as_u8(),
            1,
            Bytes::from(vec![0x5Au8; len]),
            cluster,
        )),
    )
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    // Metrics body (98 bytes), the hottest packet on a live network
    let metrics = metrics_packet();
    group.throughput(Throughput::Bytes(98 + 24));
    group.bench_function("encode_metrics", |b| {
        b.iter(|| {
            black_box(encode(&metrics).unwrap());
        });
    });

    // Status body (276 bytes) with its string arrays
    let status = status_packet();
    group.throughput(Throughput::Bytes(276 + 24));
    group.bench_function("encode_status", |b| {
        b.iter(|| {
            black_box(encode(&status).unwrap());
        });
    });

    // Waveform split into 3 datagrams
    let waveform = waveform_packet(12_000, 4800);
    group.throughput(Throughput::Bytes(12_000));
    group.bench_function("encode_waveform_split", |b| {
        b.iter(|| {
            black_box(encode(&waveform).unwrap());
        });
    });

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    let metrics_encoded = encode(&metrics_packet()).unwrap().remove(0);
    group.throughput(Throughput::Bytes(metrics_encoded.len() as u64));
    group.bench_function("decode_metrics", |b| {
        let bytes = Bytes::from(metrics_encoded.clone());
        b.iter(|| {
            black_box(decode(bytes.clone()).unwrap());
        });
    });

    let status_encoded = encode(&status_packet()).unwrap().remove(0);
    group.throughput(Throughput::Bytes(status_encoded.len() as u64));
    group.bench_function("decode_status", |b| {
        let bytes = Bytes::from(status_encoded.clone());
        b.iter(|| {
            black_box(decode(bytes.clone()).unwrap());
        });
    });

    group.finish();
}

fn bench_reassembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("reassembly");

    let datagrams: Vec<Bytes> = encode(&waveform_packet(48_000, 4800))
        .unwrap()
        .into_iter()
        .map(Bytes::from)
        .collect();
    group.throughput(Throughput::Bytes(48_000));
    group.bench_function("feed_10_segments", |b| {
        b.iter(|| {
            let mut buffer = ReassemblyBuffer::new(ReassemblyConfig::default());
            let now = std::time::Instant::now();
            for datagram in &datagrams {
                let packet = decode(datagram.clone()).unwrap();
                if let PacketBody::BigWaveformData(segment) = &packet.body {
                    black_box(
                        buffer
                            .feed_data(packet.header.node_id, segment, now)
                            .unwrap(),
                    );
                }
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_reassembly);
criterion_main!(benches);
