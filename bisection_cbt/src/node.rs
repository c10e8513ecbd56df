// Copyright 2025 the Bisection Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identifiers and the implicit index arithmetic of the complete tree.

/// Identifier of a node in the complete binary tree.
///
/// The heap index `id` carries its own leading 1, so depth `d` spans
/// `2^d..2^(d+1)` and the bits below the leading 1 spell the left/right
/// path from the root. `Node` is a transient value object: it is computed
/// on demand from heap state and never stored.
///
/// `id == 0` is the null sentinel used by neighbor algebra for "no
/// neighbor across this edge".
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Node {
    /// Heap index, leading 1 included.
    pub id: u64,
    /// Distance from the root; the position of `id`'s leading bit.
    pub depth: u32,
}

impl Node {
    /// Create a node from a heap index and its depth.
    #[inline]
    pub const fn new(id: u64, depth: u32) -> Self {
        Self { id, depth }
    }

    /// The root node `(1, 0)`.
    #[inline]
    pub const fn root() -> Self {
        Self::new(1, 0)
    }

    /// Whether this is the root node.
    #[inline]
    pub const fn is_root(self) -> bool {
        self.id == 1
    }

    /// Whether this is the null sentinel.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.id == 0
    }

    /// Parent node. The root's parent is the null sentinel.
    #[inline]
    pub const fn parent(self) -> Self {
        Self::new(self.id >> 1, self.depth.saturating_sub(1))
    }

    /// Left child node.
    #[inline]
    pub const fn left_child(self) -> Self {
        Self::new(self.id << 1, self.depth + 1)
    }

    /// Right child node.
    #[inline]
    pub const fn right_child(self) -> Self {
        Self::new((self.id << 1) | 1, self.depth + 1)
    }

    /// The left node of this node's sibling pair (possibly itself).
    #[inline]
    pub const fn left_sibling(self) -> Self {
        Self::new(self.id & !1, self.depth)
    }

    /// The right node of this node's sibling pair (possibly itself).
    #[inline]
    pub const fn right_sibling(self) -> Self {
        Self::new(self.id | 1, self.depth)
    }

    /// The other node of this node's sibling pair.
    #[inline]
    pub const fn sibling(self) -> Self {
        Self::new(self.id ^ 1, self.depth)
    }

    /// Value of path bit `bit`, where bit 0 is the deepest left/right decision.
    #[inline]
    pub const fn path_bit(self, bit: u32) -> u64 {
        (self.id >> bit) & 1
    }
}
