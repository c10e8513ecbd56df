// Copyright 2025 the Bisection Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adaptive subdivision around a moving target.
//!
//! Headless version of the classic LOD viewer loop: each frame alternates
//! a split pass and a merge pass, refining triangles that contain the
//! target and coarsening diamonds that have drifted away from it. Runs
//! the same schedule over the triangle domain and the square domain.
//!
//! Run:
//! - `cargo run -p bisection_demos --example adaptive_target`

use bisection_cbt::{Cbt, Node};
use bisection_leb::Diamond;
use bisection_leb::{square, triangle};
use kurbo::Point;

fn point_inside(t: &[Point; 3], p: Point) -> bool {
    let sign = |a: Point, b: Point| (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    let d0 = sign(t[0], t[1]);
    let d1 = sign(t[1], t[2]);
    let d2 = sign(t[2], t[0]);
    let has_neg = d0 < 0.0 || d1 < 0.0 || d2 < 0.0;
    let has_pos = d0 > 0.0 || d1 > 0.0 || d2 > 0.0;
    !(has_neg && has_pos)
}

/// Function bundle selecting the triangle or square domain.
struct Mode {
    name: &'static str,
    decode: fn(Node) -> [Point; 3],
    split: fn(&mut Cbt, Node),
    merge: fn(&mut Cbt, Node, Diamond),
    diamond_parent: fn(Node) -> Diamond,
}

const MODES: [Mode; 2] = [
    Mode {
        name: "triangle",
        decode: triangle::decode_triangle,
        split: triangle::split_node,
        merge: triangle::merge_node,
        diamond_parent: triangle::diamond_parent,
    },
    Mode {
        name: "square",
        decode: square::decode_triangle,
        split: square::split_node,
        merge: square::merge_node,
        diamond_parent: square::diamond_parent,
    },
];

fn run(mode: &Mode, frames: u32, max_depth: u32) {
    let mut cbt = Cbt::new(max_depth);
    println!("== {} domain ==", mode.name);
    for frame in 0..frames {
        // The target orbits the domain center.
        let angle = f64::from(frame) * 0.35;
        let target = Point::new(0.5 + 0.3 * angle.cos(), 0.5 + 0.3 * angle.sin());

        if frame % 2 == 0 {
            cbt.update(|cbt, leaf| {
                if point_inside(&(mode.decode)(leaf), target) {
                    (mode.split)(cbt, leaf);
                }
            });
        } else {
            cbt.update(|cbt, leaf| {
                let diamond = (mode.diamond_parent)(leaf);
                let keep_base = point_inside(&(mode.decode)(diamond.base), target);
                let keep_top = point_inside(&(mode.decode)(diamond.top), target);
                if !keep_base && !keep_top {
                    (mode.merge)(cbt, leaf, diamond);
                }
            });
        }
        println!(
            "frame {:>2}: target ({:+.2}, {:+.2}) -> {} leaves",
            frame,
            target.x,
            target.y,
            cbt.leaf_count()
        );
    }
}

fn main() {
    for mode in &MODES {
        run(mode, 16, 12);
    }
}
