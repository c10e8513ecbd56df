// Copyright 2025 the Bisection Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use bisection_cbt::Cbt;
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
}

/// A tree with roughly `density` percent of its leaf slots active.
fn gen_random_tree(max_depth: u32, density: u64, seed: u64) -> Cbt {
    let mut rng = Rng::new(seed);
    let mut cbt = Cbt::with_leaves_at_depth(max_depth, 0);
    for leaf in 0..cbt.capacity() {
        cbt.set_leaf_bit(leaf, rng.next_u64() % 100 < density);
    }
    cbt.reduce();
    cbt
}

fn bench_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce");
    for &max_depth in &[10u32, 14, 18, 22] {
        let cbt = gen_random_tree(max_depth, 35, 0xCAFE_F00D_DEAD_BEEF);
        group.throughput(Throughput::Elements(cbt.capacity()));
        group.bench_function(format!("full_d{}", max_depth), |b| {
            b.iter_batched(
                || cbt.words().to_vec(),
                |words| {
                    let mut cbt = Cbt::with_leaves_at_depth(max_depth, 0);
                    cbt.words_mut().copy_from_slice(&words);
                    cbt.reduce();
                    black_box(cbt.leaf_count());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_rank_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");
    for &max_depth in &[14u32, 18, 22] {
        let cbt = gen_random_tree(max_depth, 35, 0xBADC_F00D_1234_5678);
        let count = cbt.leaf_count();
        group.throughput(Throughput::Elements(count));
        group.bench_function(format!("leaf_at_rank_d{}", max_depth), |b| {
            b.iter(|| {
                let mut acc = 0u64;
                for rank in 0..count {
                    acc ^= cbt.leaf_at_rank(rank).id;
                }
                black_box(acc);
            })
        });
        group.bench_function(format!("round_trip_d{}", max_depth), |b| {
            b.iter(|| {
                let mut acc = 0u64;
                // Stride through a subset so the round trip dominates, not
                // the loop itself.
                for rank in (0..count).step_by(64) {
                    acc ^= cbt.rank_of(cbt.leaf_at_rank(rank));
                }
                black_box(acc);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reduce, bench_rank_queries);
criterion_main!(benches);
