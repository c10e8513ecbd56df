// Copyright 2025 the Bisection Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Codec over the square domain: the unit square split along its
//! diagonal into two depth-1 triangles. Rendering starts at depth 1, so
//! merges never coarsen past it.

use bisection_cbt::{Cbt, Node};
use kurbo::Point;

use crate::matrix::{self, Mat3};
use crate::neighbors::square_ids;
use crate::types::{Diamond, Neighbors};

/// The same-depth neighborhood of `node`, replayed from its bit path.
pub fn neighbors(node: Node) -> Neighbors {
    square_ids(node).into_neighbors(node.depth)
}

/// The neighbor across `node`'s longest edge, or `None` when that edge
/// lies on the domain boundary.
pub fn edge_neighbor(node: Node) -> Option<Node> {
    neighbors(node).edge
}

fn edge_neighbor_raw(node: Node) -> Node {
    Node::new(square_ids(node).edge, node.depth)
}

/// The diamond `node`'s parent belongs to.
pub fn diamond_parent(node: Node) -> Diamond {
    let base = node.parent();
    let edge = square_ids(base).edge;
    let top = Node::new(if edge > 0 { edge } else { base.id }, base.depth);
    Diamond { base, top }
}

/// Conforming split; see [`crate::triangle::split_node`]. The chain here
/// crosses the diagonal between the square's two halves.
pub fn split_node(cbt: &mut Cbt, node: Node) {
    if cbt.is_ceil_node(node) {
        return;
    }
    let mut it = node;
    cbt.split_node(it);
    it = edge_neighbor_raw(it);
    while it.id > 1 {
        cbt.split_node(it);
        it = it.parent();
        cbt.split_node(it);
        it = edge_neighbor_raw(it);
    }
}

/// Merge both halves of the diamond `node`'s parent belongs to. No-op at
/// depths 0 and 1: the two diagonal triangles are the coarsest renderable
/// state of the square.
pub fn merge_node(cbt: &mut Cbt, node: Node, diamond: Diamond) {
    if node.depth <= 1 {
        return;
    }
    cbt.merge_node(node);
    cbt.merge_node(diamond.top.right_child());
}

fn transformation_matrix(node: Node) -> Mat3 {
    if node.depth == 0 {
        return matrix::IDENTITY;
    }
    // The most significant path bit selects the diagonal half; the rest
    // are ordinary bisections.
    let mut m = matrix::square(node.path_bit(node.depth - 1));
    for bit in (0..node.depth - 1).rev() {
        m = matrix::mul(&matrix::splitting(node.path_bit(bit)), &m);
    }
    if (node.depth - 1) & 1 == 1 {
        m = matrix::mul(&matrix::WINDING, &m);
    }
    m
}

/// Decode `node`'s vertex attributes in place; see
/// [`crate::triangle::decode_attribute_array`]. Rows hold the attribute at
/// the canonical root vertices (0, 1), (0, 0), (1, 0) on entry.
pub fn decode_attribute_array(node: Node, attributes: &mut [[f32; 3]]) {
    matrix::transform_rows(&transformation_matrix(node), attributes);
}

/// Decode `node`'s triangle over the unit square.
pub fn decode_triangle(node: Node) -> [Point; 3] {
    let mut attributes = [[0.0_f32, 0.0, 1.0], [1.0, 0.0, 0.0]];
    decode_attribute_array(node, &mut attributes);
    core::array::from_fn(|i| {
        Point::new(f64::from(attributes[0][i]), f64::from(attributes[1][i]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_area(t: &[Point; 3]) -> f64 {
        0.5 * ((t[1].x - t[0].x) * (t[2].y - t[0].y) - (t[2].x - t[0].x) * (t[1].y - t[0].y))
    }

    fn assert_conforming(cbt: &Cbt) {
        for node in cbt.leaves() {
            let Some(edge) = edge_neighbor(node) else {
                continue;
            };
            let v = cbt.node_value(edge);
            assert!(
                v == 1 || v == 2 || (v == 0 && cbt.is_leaf_node(edge.parent())),
                "T-junction at node {} depth {}",
                node.id,
                node.depth
            );
        }
    }

    #[test]
    fn depth_one_covers_both_diagonal_halves() {
        let lower = decode_triangle(Node::new(2, 1));
        assert_eq!(lower, [
            Point::new(0.0, 1.0),
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0)
        ]);
        let upper = decode_triangle(Node::new(3, 1));
        assert_eq!(upper, [
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0)
        ]);
        assert!(signed_area(&lower) > 0.0 && signed_area(&upper) > 0.0);
    }

    #[test]
    fn split_crosses_the_diagonal() {
        // The depth-1 halves are each other's edge neighbors: splitting
        // one drags the other along.
        let mut cbt = Cbt::new(6);
        split_node(&mut cbt, Node::new(2, 1));
        cbt.reduce();
        assert_eq!(cbt.leaf_count(), 4);
        assert!(cbt.is_leaf_node(Node::new(6, 2)));
        assert!(cbt.is_leaf_node(Node::new(7, 2)));
        assert_conforming(&cbt);
    }

    #[test]
    fn interior_diamond_and_merge_round_trip() {
        let mut cbt = Cbt::new(6);
        split_node(&mut cbt, Node::new(2, 1));
        cbt.reduce();
        let before = cbt.words().to_vec();

        let node = Node::new(4, 2);
        let diamond = diamond_parent(node);
        assert_eq!(diamond, Diamond {
            base: Node::new(2, 1),
            top: Node::new(3, 1)
        });

        split_node(&mut cbt, node);
        cbt.reduce();
        assert!(cbt.leaf_count() > 4);

        // Collapsing the same diamond restores the pre-split heap.
        merge_node(&mut cbt, node.left_child(), diamond_parent(node.left_child()));
        cbt.reduce();
        assert_eq!(cbt.words(), &before[..]);
        assert_conforming(&cbt);
    }

    #[test]
    fn merge_floor_is_depth_two() {
        let mut cbt = Cbt::new(5);
        let before = cbt.words().to_vec();
        let node = Node::new(2, 1);
        merge_node(&mut cbt, node, diamond_parent(node));
        cbt.reduce();
        assert_eq!(cbt.words(), &before[..]);
    }

    #[test]
    fn refinement_tiles_the_unit_square() {
        let target = Point::new(0.7, 0.6);
        let mut cbt = Cbt::new(10);
        for _ in 0..6 {
            cbt.update(|cbt, leaf| {
                let t = decode_triangle(leaf);
                if t.iter().any(|p| p.distance(target) < 0.6) {
                    split_node(cbt, leaf);
                }
            });
            assert_conforming(&cbt);
            let total: f64 = cbt.leaves().map(|n| signed_area(&decode_triangle(n))).sum();
            assert!((total - 1.0).abs() < 1e-5, "leaves do not tile the square");
        }
        assert!(cbt.leaf_count() > 8);
    }

    #[test]
    fn uniform_depth_yields_pow2_leaves() {
        // The square shares the binary tree: depth d holds 2^d leaves,
        // each of area 1 / 2^d.
        for depth in 1..8 {
            let cbt = Cbt::with_leaves_at_depth(10, depth);
            assert_eq!(cbt.leaf_count(), 1 << depth);
            let expected = 1.0 / f64::from(1_u32 << depth);
            for node in cbt.leaves() {
                assert!((signed_area(&decode_triangle(node)) - expected).abs() < 1e-6);
            }
        }
    }
}
