// Copyright 2025 the Bisection Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The packed sum-heap: storage layout, raw bit mutation, reduction, and
//! rank queries.

use alloc::vec;
use alloc::vec::Vec;

use crate::bitfield::{extract, insert, mask};
use crate::node::Node;

/// A concurrent binary tree: a complete binary tree of fixed depth encoded
/// as a packed bit-field sum heap.
///
/// The deepest level stores one bit per leaf slot; every shallower level
/// stores, per node, the number of active leaves in that node's subtree.
/// A node value at depth `d` occupies `max_depth - d + 1` bits at bit
/// offset `(2 << d) + id * (max_depth - d + 1)`, so the levels pack
/// contiguously into exactly `2^(max_depth + 2)` bits.
///
/// A node's *leaf bit* is the deepest-level bit of its leftmost
/// descendant. [`split_node`](Self::split_node) and
/// [`merge_node`](Self::merge_node) touch only leaf bits, and distinct
/// leaves touch disjoint bits, which is what lets a data-parallel mutation
/// pass run without synchronization. Ancestor sums are rebuilt afterwards
/// by [`reduce`](Self::reduce).
///
/// # Usage invariant
///
/// Mutating leaf bits does **not** update ancestor sums. Querying
/// [`leaf_count`](Self::leaf_count) or [`leaf_at_rank`](Self::leaf_at_rank)
/// after a mutation and before the next [`reduce`](Self::reduce) returns
/// values from the pre-mutation sums. This is deliberate (mutations batch;
/// one reduction amortizes over the whole batch) and is the single most
/// likely integration mistake: always `reduce()` before trusting counts.
pub struct Cbt {
    heap: Vec<u64>,
    max_depth: u32,
}

impl core::fmt::Debug for Cbt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cbt")
            .field("max_depth", &self.max_depth)
            .field("leaf_count", &self.leaf_count())
            .field("heap_words", &self.heap.len())
            .finish_non_exhaustive()
    }
}

impl Cbt {
    /// Smallest supported `max_depth`.
    pub const MIN_MAX_DEPTH: u32 = 1;

    /// Largest supported `max_depth`, bounded by the `u64` word used for
    /// sums and bit addressing (the depth tag bit and the root's
    /// `max_depth + 1`-bit sum field must coexist in the low words).
    pub const MAX_MAX_DEPTH: u32 = 58;

    /// Number of deepest levels the reduction prepass collapses per leaf
    /// word. A tuning constant, not a contract.
    const PREPASS_LEVELS: u32 = 5;

    /// Below this depth, leaf words are not 64-bit aligned and the
    /// per-level passes cover everything.
    const PREPASS_MIN_DEPTH: u32 = 6;

    /// Create a tree with every leaf slot at `depth` active (a complete
    /// subtree), the rest inactive.
    ///
    /// # Panics
    ///
    /// Panics if `max_depth` lies outside
    /// [`MIN_MAX_DEPTH`](Self::MIN_MAX_DEPTH)`..=`[`MAX_MAX_DEPTH`](Self::MAX_MAX_DEPTH)
    /// or if `depth > max_depth`.
    pub fn with_leaves_at_depth(max_depth: u32, depth: u32) -> Self {
        assert!(
            (Self::MIN_MAX_DEPTH..=Self::MAX_MAX_DEPTH).contains(&max_depth),
            "max_depth out of range"
        );
        let mut tree = Self {
            heap: vec![0; Self::heap_word_count(max_depth)],
            max_depth,
        };
        tree.reset_to_depth(depth);
        tree
    }

    /// Create a tree with the two depth-1 leaves active.
    pub fn new(max_depth: u32) -> Self {
        Self::with_leaves_at_depth(max_depth, 1)
    }

    /// Deactivate everything, activate the complete level at `depth`, and
    /// rebuild the sums.
    ///
    /// # Panics
    ///
    /// Panics if `depth > max_depth`.
    pub fn reset_to_depth(&mut self, depth: u32) {
        assert!(depth <= self.max_depth, "depth exceeds max_depth");
        self.heap.fill(0);
        // Tag bit: the raw word array self-describes its own max depth, so
        // a consumer of `words()` (e.g. a GPU kernel reading the uploaded
        // buffer) can recover it without side-band data.
        self.heap[0] = 1_u64 << self.max_depth;
        for id in (1_u64 << depth)..(2_u64 << depth) {
            self.set_node_bit(Node::new(id, depth), true);
        }
        self.reduce();
    }

    /// The fixed depth capacity chosen at construction.
    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Number of leaf slots at the deepest level, `2^max_depth`.
    #[inline]
    pub fn capacity(&self) -> u64 {
        1_u64 << self.max_depth
    }

    /// Size of the backing storage in bytes. Callers use this to size
    /// GPU-visible buffers before uploading [`words`](Self::words).
    #[inline]
    pub fn heap_byte_size(&self) -> usize {
        self.heap.len() * core::mem::size_of::<u64>()
    }

    /// Read-only view of the raw backing words, for upload to GPU-visible
    /// storage.
    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.heap
    }

    /// Mutable view of the raw backing words, for mirroring GPU-side
    /// mutations back before running CPU-side queries.
    #[inline]
    pub fn words_mut(&mut self) -> &mut [u64] {
        &mut self.heap
    }

    // --- bit addressing ---

    fn heap_word_count(max_depth: u32) -> usize {
        // 2^(max_depth + 2) bits total, minimum one word.
        if max_depth >= 4 {
            1_usize << (max_depth - 4)
        } else {
            1
        }
    }

    #[inline]
    fn node_bit_width(&self, node: Node) -> u32 {
        self.max_depth - node.depth + 1
    }

    #[inline]
    fn node_bit_id(&self, node: Node) -> u64 {
        (2_u64 << node.depth) + node.id * u64::from(self.node_bit_width(node))
    }

    /// Bit offset of `node`'s leaf bit: the deepest-level bit of its
    /// leftmost descendant.
    #[inline]
    fn leaf_bit_id(&self, node: Node) -> u64 {
        (2_u64 << self.max_depth) + (node.id << (self.max_depth - node.depth))
    }

    fn read_raw(&self, bit_id: u64, bit_count: u32) -> u64 {
        let word = (bit_id >> 6) as usize;
        let offset = (bit_id & 63) as u32;
        let count_lsb = bit_count.min(64 - offset);
        let count_msb = bit_count - count_lsb;
        let mut value = extract(self.heap[word], offset, count_lsb);
        if count_msb > 0 {
            value |= extract(self.heap[word + 1], 0, count_msb) << count_lsb;
        }
        value
    }

    fn write_raw(&mut self, bit_id: u64, bit_count: u32, data: u64) {
        let word = (bit_id >> 6) as usize;
        let offset = (bit_id & 63) as u32;
        let count_lsb = bit_count.min(64 - offset);
        let count_msb = bit_count - count_lsb;
        insert(&mut self.heap[word], offset, count_lsb, data);
        if count_msb > 0 {
            insert(&mut self.heap[word + 1], 0, count_msb, data >> count_lsb);
        }
    }

    // --- node values and leaf bits ---

    /// The sum stored for `node`: the number of active leaves in its
    /// subtree, as of the last [`reduce`](Self::reduce).
    #[inline]
    pub fn node_value(&self, node: Node) -> u64 {
        debug_assert!(node.depth <= self.max_depth, "node deeper than the tree");
        self.read_raw(self.node_bit_id(node), self.node_bit_width(node))
    }

    fn write_node_value(&mut self, node: Node, value: u64) {
        self.write_raw(self.node_bit_id(node), self.node_bit_width(node), value);
    }

    /// `node`'s leaf bit.
    #[inline]
    pub fn node_bit(&self, node: Node) -> bool {
        self.read_raw(self.leaf_bit_id(node), 1) == 1
    }

    /// Set `node`'s leaf bit. Ancestor sums are left stale until the next
    /// [`reduce`](Self::reduce).
    #[inline]
    pub fn set_node_bit(&mut self, node: Node, value: bool) {
        self.write_raw(self.leaf_bit_id(node), 1, u64::from(value));
    }

    /// The raw bit of leaf slot `leaf` at the deepest level,
    /// `leaf` in `0..capacity()`.
    #[inline]
    pub fn leaf_bit(&self, leaf: u64) -> bool {
        debug_assert!(leaf < self.capacity(), "leaf slot out of range");
        self.node_bit(Node::new(self.capacity() + leaf, self.max_depth))
    }

    /// Set the raw bit of leaf slot `leaf`. Sums stay stale until the next
    /// [`reduce`](Self::reduce).
    #[inline]
    pub fn set_leaf_bit(&mut self, leaf: u64, value: bool) {
        debug_assert!(leaf < self.capacity(), "leaf slot out of range");
        self.set_node_bit(Node::new(self.capacity() + leaf, self.max_depth), value);
    }

    // --- predicates ---

    /// Whether `node` is an active leaf (subtree sum of exactly 1).
    #[inline]
    pub fn is_leaf_node(&self, node: Node) -> bool {
        self.node_value(node) == 1
    }

    /// Whether `node` sits at the deepest level and cannot split further.
    #[inline]
    pub fn is_ceil_node(&self, node: Node) -> bool {
        node.depth == self.max_depth
    }

    // --- raw split/merge primitives ---

    /// Replace the leaf `node` by its two children.
    ///
    /// Writes a single leaf bit (the right child's); the node's own leaf
    /// bit doubles as the left child's. Idempotent and order-independent,
    /// so concurrent invocations on distinct leaves commute. The caller is
    /// responsible for [`reduce`](Self::reduce) after the batch, and for
    /// only splitting nodes it just enumerated as active leaves.
    #[inline]
    pub fn split_node(&mut self, node: Node) {
        debug_assert!(!self.is_ceil_node(node), "cannot split a ceil node");
        self.set_node_bit(node.right_child(), true);
    }

    /// Replace the leaf `node` and its sibling by their parent.
    ///
    /// Clears a single leaf bit (the right sibling's). Same batching and
    /// precondition contract as [`split_node`](Self::split_node).
    #[inline]
    pub fn merge_node(&mut self, node: Node) {
        debug_assert!(!node.is_root(), "cannot merge the root");
        self.set_node_bit(node.right_sibling(), false);
    }

    // --- queries ---

    /// Total number of active leaves, as of the last
    /// [`reduce`](Self::reduce). O(1): reads the root sum.
    #[inline]
    pub fn leaf_count(&self) -> u64 {
        self.node_value(Node::root())
    }

    /// The active leaf with prefix-sum rank `rank`, in
    /// `0..leaf_count()`.
    ///
    /// Sum-guided descent from the root: go left when `rank` falls below
    /// the left child's sum, otherwise subtract it and go right; stop at
    /// the first node whose sum is 1. O(max_depth).
    pub fn leaf_at_rank(&self, rank: u64) -> Node {
        debug_assert!(rank < self.leaf_count(), "rank out of range");
        let mut node = Node::root();
        let mut rank = rank;
        while self.node_value(node) > 1 {
            let left = node.left_child();
            let left_sum = self.node_value(left);
            if rank < left_sum {
                node = left;
            } else {
                node = left.right_sibling();
                rank -= left_sum;
            }
        }
        node
    }

    /// The rank of an active leaf; the inverse of
    /// [`leaf_at_rank`](Self::leaf_at_rank).
    pub fn rank_of(&self, node: Node) -> u64 {
        let mut rank = 0;
        let mut node = node;
        while !node.is_root() {
            if node.id & 1 == 1 {
                rank += self.node_value(node.left_sibling());
            }
            node = node.parent();
        }
        rank
    }

    /// Iterate the active leaves in rank order.
    pub fn leaves(&self) -> impl Iterator<Item = Node> + '_ {
        (0..self.leaf_count()).map(|rank| self.leaf_at_rank(rank))
    }

    /// Visit every active leaf once, in rank order, then
    /// [`reduce`](Self::reduce).
    ///
    /// The visitor may call [`split_node`](Self::split_node) and
    /// [`merge_node`](Self::merge_node) (or the conforming operations of a
    /// codec layer); those touch only leaf bits, so the sums steering the
    /// enumeration stay fixed for the whole batch.
    pub fn update(&mut self, mut visitor: impl FnMut(&mut Self, Node)) {
        let count = self.leaf_count();
        for rank in 0..count {
            let node = self.leaf_at_rank(rank);
            visitor(self, node);
        }
        self.reduce();
    }

    // --- reduction ---

    /// Rebuild every ancestor sum bottom-up from the leaf bits.
    ///
    /// Structured as one pass per level, each pass's sums independent of
    /// one another — the shape that maps to barrier-separated GPU
    /// dispatches. A prepass collapses the bottom
    /// `PREPASS_LEVELS` levels one 64-leaf word at a time. Idempotent.
    pub fn reduce(&mut self) {
        let mut depth = self.max_depth;
        if depth >= Self::PREPASS_MIN_DEPTH {
            self.reduce_prepass();
            depth -= Self::PREPASS_LEVELS;
        }
        while depth > 0 {
            depth -= 1;
            self.reduce_level(depth);
        }
    }

    /// One reduction pass: recompute level `depth` from level `depth + 1`.
    /// Every sum in the pass is independent.
    fn reduce_level(&mut self, depth: u32) {
        for id in (1_u64 << depth)..(2_u64 << depth) {
            let node = Node::new(id, depth);
            let sum = self.node_value(node.left_child()) + self.node_value(node.right_child());
            self.write_node_value(node, sum);
        }
    }

    /// Collapse the bottom `PREPASS_LEVELS` levels: each 64-bit leaf word
    /// yields the packed fields of five ancestor levels through successive
    /// in-register pairwise sums. Requires the leaf region to be 64-bit
    /// aligned (`max_depth >= PREPASS_MIN_DEPTH`).
    fn reduce_prepass(&mut self) {
        let d = self.max_depth;
        let leaf_base_word = (3_usize) << (d - 6);
        for chunk in 0..(1_u64 << (d - 6)) {
            let x = self.heap[leaf_base_word + chunk as usize];
            // 32 sums of 2 bits each, .. down to 2 sums of 32 bits each.
            let x2 = (x & 0x5555_5555_5555_5555) + ((x >> 1) & 0x5555_5555_5555_5555);
            let x4 = (x2 & 0x3333_3333_3333_3333) + ((x2 >> 2) & 0x3333_3333_3333_3333);
            let x8 = (x4 & 0x0F0F_0F0F_0F0F_0F0F) + ((x4 >> 4) & 0x0F0F_0F0F_0F0F_0F0F);
            let x16 = (x8 & 0x00FF_00FF_00FF_00FF) + ((x8 >> 8) & 0x00FF_00FF_00FF_00FF);
            let x32 = (x16 & 0x0000_FFFF_0000_FFFF) + ((x16 >> 16) & 0x0000_FFFF_0000_FFFF);

            self.write_prepass_chunk(d - 1, chunk, 32, 2, x2, 2);
            self.write_prepass_chunk(d - 2, chunk, 16, 4, x4, 3);
            self.write_prepass_chunk(d - 3, chunk, 8, 8, x8, 4);
            self.write_prepass_chunk(d - 4, chunk, 4, 16, x16, 5);
            self.write_prepass_chunk(d - 5, chunk, 2, 32, x32, 6);
        }
    }

    /// Repack `lanes` sums of `lane_bits` each into the `field_bits`-wide
    /// heap fields of level `depth`, and write them in one store.
    fn write_prepass_chunk(
        &mut self,
        depth: u32,
        chunk: u64,
        lanes: u32,
        lane_bits: u32,
        data: u64,
        field_bits: u32,
    ) {
        let mut packed = 0_u64;
        for lane in 0..lanes {
            let value = (data >> (lane * lane_bits)) & mask(lane_bits);
            packed |= value << (lane * field_bits);
        }
        let first = Node::new((1_u64 << depth) + chunk * u64::from(lanes), depth);
        self.write_raw(self.node_bit_id(first), lanes * field_bits, packed);
    }
}
