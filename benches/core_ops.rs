// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Core index operation benchmarks.
//!
//! Measures bulk insertion and point lookups for all three structures at
//! several population sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use reedindex::{BPlusTreeMap, ExtHashMap, LinHashMap};

const SIZES: [u64; 3] = [100, 1_000, 10_000];

/// Benchmark bulk insertion.
fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in SIZES.iter() {
        group.throughput(Throughput::Elements(*size));

        group.bench_with_input(BenchmarkId::new("bptree", size), size, |b, &n| {
            b.iter(|| {
                let mut tree = BPlusTreeMap::<u64, u64>::new();
                for k in 0..n {
                    tree.put(k, k * k).unwrap();
                }
                black_box(tree.size())
            });
        });

        group.bench_with_input(BenchmarkId::new("exthash", size), size, |b, &n| {
            b.iter(|| {
                let mut map = ExtHashMap::<u64, u64>::new(16).unwrap();
                for k in 0..n {
                    map.put(k, k * k).unwrap();
                }
                black_box(map.size())
            });
        });

        group.bench_with_input(BenchmarkId::new("linhash", size), size, |b, &n| {
            b.iter(|| {
                let mut map = LinHashMap::<u64, u64>::new(16).unwrap();
                for k in 0..n {
                    map.put(k, k * k).unwrap();
                }
                black_box(map.size())
            });
        });
    }

    group.finish();
}

/// Benchmark point lookups against a populated structure.
fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");

    for size in SIZES.iter() {
        group.throughput(Throughput::Elements(*size));

        let mut tree = BPlusTreeMap::<u64, u64>::new();
        let mut ext = ExtHashMap::<u64, u64>::new(16).unwrap();
        let mut lin = LinHashMap::<u64, u64>::new(16).unwrap();
        for k in 0..*size {
            tree.put(k, k * k).unwrap();
            ext.put(k, k * k).unwrap();
            lin.put(k, k * k).unwrap();
        }

        group.bench_with_input(BenchmarkId::new("bptree", size), size, |b, &n| {
            b.iter(|| {
                for k in 0..n {
                    black_box(tree.get(&k));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("exthash", size), size, |b, &n| {
            b.iter(|| {
                for k in 0..n {
                    black_box(ext.get(&k));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("linhash", size), size, |b, &n| {
            b.iter(|| {
                for k in 0..n {
                    black_box(lin.get(&k));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_get);
criterion_main!(benches);
