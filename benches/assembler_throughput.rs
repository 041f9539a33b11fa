//! Frame assembly throughput benchmarks
//!
//! Measures the chunk -> frame path in isolation: how fast the assembler
//! reassembles newline-delimited records out of byte deliveries of varying
//! size.
//!
//! Run with: `cargo bench --features benchmark`

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use groundtrack::FrameAssembler;
use std::hint::black_box;

fn record_stream(records: usize) -> Vec<u8> {
    let mut stream = Vec::new();
    for i in 0..records {
        stream.extend_from_slice(
            format!(
                "{{\"alt\":{}.25,\"lat\":41.2,\"lng\":-87.9,\"mps\":3.4,\"time\":12301500,\"sats\":{},\"rssi\":-70}}\n",
                i,
                i % 12
            )
            .as_bytes(),
        );
    }
    stream
}

fn bench_assembler(c: &mut Criterion) {
    let stream = record_stream(1_000);

    let mut group = c.benchmark_group("assembler");
    group.throughput(Throughput::Bytes(stream.len() as u64));

    for chunk_size in [16usize, 64, 512, 4096] {
        group.bench_function(format!("feed_{}b_chunks", chunk_size), |b| {
            b.iter(|| {
                let mut assembler = FrameAssembler::new();
                let mut frames = 0usize;
                for chunk in stream.chunks(chunk_size) {
                    frames += assembler.feed(black_box(chunk)).len();
                }
                black_box(frames)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_assembler);
criterion_main!(benches);
