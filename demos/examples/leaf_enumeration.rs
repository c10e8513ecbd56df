// Copyright 2025 the Bisection Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leaf enumeration and the GPU-buffer surface.
//!
//! Build a tree, refine it a little, then walk the leaves in rank order
//! decoding each triangle, the way a renderer fills its vertex stream.
//! Also prints the raw-word surface a GPU uploader would consume.
//!
//! Run:
//! - `cargo run -p bisection_demos --example leaf_enumeration`

use bisection_cbt::Cbt;
use bisection_leb::triangle;

fn main() {
    let mut cbt = Cbt::new(16);
    cbt.reset_to_depth(3);
    println!(
        "max_depth {} / capacity {} leaf slots / heap {} bytes ({} words)",
        cbt.max_depth(),
        cbt.capacity(),
        cbt.heap_byte_size(),
        cbt.words().len()
    );
    // The buffer self-describes its depth; word 0 carries the tag bit.
    println!(
        "word 0 tag encodes max_depth = {}",
        cbt.words()[0].trailing_zeros()
    );

    // Refine the leaves whose hypotenuse midpoint falls in the lower-left
    // quadrant.
    cbt.update(|cbt, leaf| {
        let tri = triangle::decode_triangle(leaf);
        let mid = tri[1];
        if mid.x < 0.5 && mid.y < 0.5 {
            triangle::split_node(cbt, leaf);
        }
    });

    println!("{} leaves after one refinement pass:", cbt.leaf_count());
    for rank in 0..cbt.leaf_count() {
        let node = cbt.leaf_at_rank(rank);
        let tri = triangle::decode_triangle(node);
        assert_eq!(cbt.rank_of(node), rank);
        println!(
            "rank {:>3}: node {:>5} depth {:>2} -> ({:.3}, {:.3}) ({:.3}, {:.3}) ({:.3}, {:.3})",
            rank,
            node.id,
            node.depth,
            tri[0].x,
            tri[0].y,
            tri[1].x,
            tri[1].y,
            tri[2].x,
            tri[2].y
        );
    }
}
