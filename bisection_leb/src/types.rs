// Copyright 2025 the Bisection Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public value types of the codec.

use bisection_cbt::Node;

/// The same-depth neighborhood of a node.
///
/// `left` and `right` sit across the two short edges, `edge` across the
/// longest edge (the one the next bisection would cut). A `None` entry
/// means the domain boundary lies across that edge.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Neighbors {
    /// Neighbor across the left short edge.
    pub left: Option<Node>,
    /// Neighbor across the right short edge.
    pub right: Option<Node>,
    /// Neighbor across the longest edge.
    pub edge: Option<Node>,
    /// The node itself, as re-derived by the propagation.
    pub node: Node,
}

/// The diamond a node's parent belongs to: the parent (`base`) and the
/// parent's edge neighbor (`top`).
///
/// When the parent's longest edge lies on the domain boundary the diamond
/// degenerates and `top == base`. A merge collapses both halves of the
/// diamond at once, which is what keeps the mesh conforming.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Diamond {
    /// The node's parent.
    pub base: Node,
    /// The parent's same-depth edge neighbor, or `base` on the boundary.
    pub top: Node,
}
