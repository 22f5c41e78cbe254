#![allow(unused)]
extern crate bytescope;

use bytescope::Reader;
use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

/// Deterministic pseudo-random buffer so runs are comparable.
fn test_buffer(len: usize) -> Vec<u8> {
    let mut state = 0x2545F491_4F6C_DD1Du64;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state & 0xFF) as u8
        })
        .collect()
}

/// Benchmark the exact decimal renderer on windows well past native integer
/// precision. This is the hot path when a script renders large blobs as one
/// number.
fn bench_exact_decimal(c: &mut Criterion) {
    let data = test_buffer(8192);

    let mut group = c.benchmark_group("exact_decimal");
    for window in [16usize, 256, 4096] {
        group.throughput(Throughput::Bytes(window as u64));
        group.bench_function(format!("{window}_bytes"), |b| {
            b.iter(|| {
                let mut reader = Reader::new(black_box(&data));
                reader.read(window as i64).unwrap();
                let value = reader.decimal_value().unwrap();
                black_box(value)
            });
        });
    }
    group.finish();
}

/// Benchmark hex rendering on the same windows. Hex is linear in the window
/// size, so this mostly measures the formatting loop.
fn bench_hex(c: &mut Criterion) {
    let data = test_buffer(8192);

    let mut group = c.benchmark_group("hex");
    for window in [16usize, 256, 4096] {
        group.throughput(Throughput::Bytes(window as u64));
        group.bench_function(format!("{window}_bytes"), |b| {
            b.iter(|| {
                let mut reader = Reader::new(black_box(&data));
                reader.read(window as i64).unwrap();
                let value = reader.hex_value().unwrap();
                black_box(value)
            });
        });
    }
    group.finish();
}

/// Benchmark signed exact decimal on all-ones windows, the worst case for the
/// complement-and-carry path.
fn bench_signed_decimal(c: &mut Criterion) {
    let data = vec![0xFFu8; 4096];

    let mut group = c.benchmark_group("signed_decimal");
    for window in [16usize, 256, 4096] {
        group.throughput(Throughput::Bytes(window as u64));
        group.bench_function(format!("{window}_bytes"), |b| {
            b.iter(|| {
                let mut reader = Reader::new(black_box(&data));
                reader.read(window as i64).unwrap();
                let value = reader.signed_decimal_value().unwrap();
                black_box(value)
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_exact_decimal,
    bench_hex,
    bench_signed_decimal
);
criterion_main!(benches);
