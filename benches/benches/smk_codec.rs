//! Benchmark suite for the SMK2 codec core.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use smk_benches::{checkerboard_frame, noisy_frame, sizes, solid_frames};
use smk_types::block;
use smk_types::frame_io::FrameSink;
use smk_types::smk::{Decoder, Encoder};

fn bench_encode_solid(c: &mut Criterion) {
    let mut group = c.benchmark_group("smk_encode_solid");

    for (name, (width, height)) in [("tiny", sizes::TINY), ("small", sizes::SMALL), ("standard", sizes::STANDARD)] {
        let frames = solid_frames(width, height, 8, [40, 80, 120]);
        group.throughput(Throughput::Bytes((width * height * 3 * 8) as u64));
        group.bench_with_input(BenchmarkId::new("encode", name), &frames, |b, frames| {
            b.iter(|| {
                let mut encoder = Encoder::new(width, height, 15).unwrap();
                for frame in frames {
                    encoder.encode_frame(black_box(frame)).unwrap();
                }
                black_box(encoder.finish().unwrap())
            });
        });
    }

    group.finish();
}

fn bench_decode_checkerboard(c: &mut Criterion) {
    let mut group = c.benchmark_group("smk_decode_mono");

    for (name, (width, height)) in [("tiny", sizes::TINY), ("small", sizes::SMALL)] {
        let frame = checkerboard_frame(width, height, [10, 20, 30], [200, 210, 220]);
        let mut encoder = Encoder::new(width, height, 15).unwrap();
        for _ in 0..4 {
            encoder.encode_frame(&frame).unwrap();
        }
        let bytes = encoder.finish().unwrap();

        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("decode", name), &bytes, |b, bytes| {
            b.iter(|| {
                let mut decoder = Decoder::new(black_box(bytes)).unwrap();
                while let Some(frame) = decoder.next_frame().unwrap() {
                    black_box(frame);
                }
            });
        });
    }

    group.finish();
}

fn bench_full_block_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("smk_full_blocks");
    let (width, height) = sizes::SMALL;
    let frame = noisy_frame(width, height);

    group.throughput(Throughput::Bytes((width * height * 3) as u64));
    group.bench_function("encode_decode", |b| {
        b.iter(|| {
            let mut encoder = Encoder::new(width, height, 15).unwrap();
            encoder.encode_frame(black_box(&frame)).unwrap();
            let bytes = encoder.finish().unwrap();

            let mut decoder = Decoder::new(&bytes).unwrap();
            black_box(decoder.next_frame().unwrap())
        });
    });

    group.finish();
}

fn bench_block_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("smk_classify_blocks");
    let (width, height) = sizes::MEDIUM;
    let frame = noisy_frame(width, height);

    let mut next_index = 0u8;
    group.throughput(Throughput::Bytes((width * height * 3) as u64));
    group.bench_function("classify", |b| {
        b.iter(|| {
            let blocks = block::classify_blocks(black_box(&frame), None, width, height, &mut |_| {
                let idx = next_index;
                next_index = next_index.wrapping_add(1);
                Ok(idx)
            })
            .unwrap();
            black_box(blocks)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_encode_solid, bench_decode_checkerboard, bench_full_block_round_trip, bench_block_classification);
criterion_main!(benches);
