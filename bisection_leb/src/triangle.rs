// Copyright 2025 the Bisection Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Codec over the triangle domain: the root node covers a single right
//! triangle with vertices (0, 1), (0, 0), (1, 0).

use bisection_cbt::{Cbt, Node};
use kurbo::Point;

use crate::matrix::{self, Mat3};
use crate::neighbors::triangle_ids;
use crate::types::{Diamond, Neighbors};

/// The same-depth neighborhood of `node`, replayed from its bit path.
pub fn neighbors(node: Node) -> Neighbors {
    triangle_ids(node).into_neighbors(node.depth)
}

/// The neighbor across `node`'s longest edge, or `None` when that edge
/// lies on the domain boundary.
pub fn edge_neighbor(node: Node) -> Option<Node> {
    neighbors(node).edge
}

fn edge_neighbor_raw(node: Node) -> Node {
    Node::new(triangle_ids(node).edge, node.depth)
}

/// The diamond `node`'s parent belongs to.
pub fn diamond_parent(node: Node) -> Diamond {
    let base = node.parent();
    let edge = triangle_ids(base).edge;
    let top = Node::new(if edge > 0 { edge } else { base.id }, base.depth);
    Diamond { base, top }
}

/// Conforming split: split `node`, then walk the chain of longest-edge
/// neighbors and their parents, splitting each, so no T-junction survives.
/// No-op on ceil nodes.
///
/// `node` must be an active leaf. Only leaf bits are written; batch calls
/// inside [`Cbt::update`] and the sums catch up at its closing reduction.
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

/// Merge both halves of the diamond `node`'s parent belongs to, collapsing
/// `node` with its sibling and the diamond top's children. No-op on the
/// root.
///
/// The caller decides mergeability (both diamond halves must want to
/// coarsen, as in an LOD update loop); pass `diamond_parent(node)` as
/// `diamond`.
pub fn merge_node(cbt: &mut Cbt, node: Node, diamond: Diamond) {
    if node.is_root() {
        return;
    }
    cbt.merge_node(node);
    cbt.merge_node(diamond.top.right_child());
}

fn transformation_matrix(node: Node) -> Mat3 {
    let mut m = matrix::IDENTITY;
    for bit in (0..node.depth).rev() {
        m = matrix::mul(&matrix::splitting(node.path_bit(bit)), &m);
    }
    // One bisection flips orientation; compensate on odd counts.
    if node.depth & 1 == 1 {
        m = matrix::mul(&matrix::WINDING, &m);
    }
    m
}

/// Decode `node`'s vertex attributes in place.
///
/// Each row of `attributes` holds one scalar attribute (x coordinates, y
/// coordinates, texture coordinate, ...) at the three root vertices on
/// entry, and at `node`'s three vertices on return. All arithmetic is
/// `f32`, matching a shader replaying the same bit path.
pub fn decode_attribute_array(node: Node, attributes: &mut [[f32; 3]]) {
    matrix::transform_rows(&transformation_matrix(node), attributes);
}

/// Decode `node`'s triangle over the canonical domain.
pub fn decode_triangle(node: Node) -> [Point; 3] {
    let mut attributes = [[0.0_f32, 0.0, 1.0], [1.0, 0.0, 0.0]];
    decode_attribute_array(node, &mut attributes);
    core::array::from_fn(|i| {
        Point::new(f64::from(attributes[0][i]), f64::from(attributes[1][i]))
    })
}
