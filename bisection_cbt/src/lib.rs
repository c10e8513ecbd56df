// Copyright 2025 the Bisection Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=bisection_cbt --heading-base-level=0

//! Bisection CBT: a bit-packed concurrent binary tree (sum heap).
//!
//! Bisection CBT is a reusable building block for adaptive subdivision,
//! level-of-detail meshing, and other workloads that maintain a dynamic set
//! of leaves in an implicit complete binary tree.
//!
//! - Split and merge leaves with single-bit writes that commute across
//!   distinct leaves, so a data-parallel pass needs no synchronization.
//! - Count active leaves in O(1) and map a dense rank to its leaf (and
//!   back) in O(`max_depth`).
//! - Rebuild all interior sums with one batched [`Cbt::reduce`] pass,
//!   structured as per-level sweeps that map directly to barrier-separated
//!   GPU dispatches.
//! - Move the raw word array to and from GPU-visible storage via
//!   [`Cbt::words`], [`Cbt::words_mut`], and [`Cbt::heap_byte_size`]; the
//!   buffer self-describes its own `max_depth`.
//!
//! The tree is a fixed-capacity bit-field: the deepest level holds one bit
//! per leaf slot and every shallower level caches subtree leaf counts in
//! just enough bits to hold them. No pointers, no per-node allocation.
//!
//! Higher layers give the leaves meaning; see `bisection_leb` for a
//! longest-edge-bisection codec built on top of this crate.
//!
//! # Example
//!
//! ```rust
//! use bisection_cbt::{Cbt, Node};
//!
//! // A tree with up to 2^8 leaf slots, initialized with two leaves.
//! let mut cbt = Cbt::new(8);
//! assert_eq!(cbt.leaf_count(), 2);
//!
//! // Split the first leaf, then rebuild the sums.
//! let leaf = cbt.leaf_at_rank(0);
//! cbt.split_node(leaf);
//! cbt.reduce();
//! assert_eq!(cbt.leaf_count(), 3);
//!
//! // Ranks are dense and invertible.
//! for rank in 0..cbt.leaf_count() {
//!     let node = cbt.leaf_at_rank(rank);
//!     assert_eq!(cbt.rank_of(node), rank);
//! }
//! ```
//!
//! # Batched mutation
//!
//! Mutations deliberately leave the interior sums stale: a batch of splits
//! and merges costs one bit write each, and a single [`Cbt::reduce`]
//! amortizes the sum rebuild over the batch. [`Cbt::update`] packages the
//! common loop (enumerate every leaf by rank, let a visitor mutate, then
//! reduce):
//!
//! ```rust
//! use bisection_cbt::Cbt;
//!
//! let mut cbt = Cbt::new(10);
//! cbt.update(|cbt, leaf| {
//!     if leaf.depth < 4 {
//!         cbt.split_node(leaf);
//!     }
//! });
//! assert_eq!(cbt.leaf_count(), 4);
//! ```

#![no_std]

extern crate alloc;

mod bitfield;
mod node;
mod tree;

pub use node::Node;
pub use tree::Cbt;
