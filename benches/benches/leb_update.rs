// Copyright 2025 the Bisection Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use bisection_cbt::Cbt;
use bisection_leb::triangle;
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

/// A conforming mesh refined toward one corner, the shape an LOD update
/// produces in practice.
fn gen_refined_tree(max_depth: u32, passes: u32) -> Cbt {
    let mut cbt = Cbt::new(max_depth);
    for _ in 0..passes {
        cbt.update(|cbt, leaf| {
            let tri = triangle::decode_triangle(leaf);
            if tri.iter().any(|p| p.x + p.y < 0.4) {
                triangle::split_node(cbt, leaf);
            }
        });
    }
    cbt
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for &passes in &[6u32, 10, 14] {
        let cbt = gen_refined_tree(20, passes);
        group.throughput(Throughput::Elements(cbt.leaf_count()));
        group.bench_function(format!("attribute_array_p{}", passes), |b| {
            b.iter(|| {
                let mut acc = 0.0_f32;
                for node in cbt.leaves() {
                    let mut attributes = [[0.0_f32, 0.0, 1.0], [1.0, 0.0, 0.0]];
                    triangle::decode_attribute_array(node, &mut attributes);
                    acc += attributes[0][1];
                }
                black_box(acc);
            })
        });
    }
    group.finish();
}

fn bench_update_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");
    for &passes in &[6u32, 10] {
        let seed = gen_refined_tree(20, passes);
        group.throughput(Throughput::Elements(seed.leaf_count()));
        group.bench_function(format!("split_pass_p{}", passes), |b| {
            b.iter_batched(
                || seed.words().to_vec(),
                |words| {
                    let mut cbt = Cbt::with_leaves_at_depth(20, 0);
                    cbt.words_mut().copy_from_slice(&words);
                    cbt.update(|cbt, leaf| {
                        let tri = triangle::decode_triangle(leaf);
                        if tri.iter().any(|p| p.x + p.y < 0.4) {
                            triangle::split_node(cbt, leaf);
                        }
                    });
                    black_box(cbt.leaf_count());
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("neighbors_p{}", passes), |b| {
            b.iter(|| {
                let mut acc = 0u64;
                for node in seed.leaves() {
                    acc ^= triangle::neighbors(node).node.id;
                }
                black_box(acc);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode, bench_update_pass);
criterion_main!(benches);
