// Copyright 2025 the Bisection Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=bisection_leb --heading-base-level=0

//! Bisection LEB: a longest-edge-bisection subdivision codec.
//!
//! Bisection LEB gives geometric meaning to the leaves of a
//! [`bisection_cbt::Cbt`]: each leaf is a triangle obtained by recursively
//! bisecting a root domain along its longest edge. The crate provides the
//! conforming mutation and decoding layer an adaptive LOD renderer needs.
//!
//! - [`triangle::split_node`] / [`triangle::merge_node`]: splits and
//!   merges that keep the mesh free of T-junctions by propagating along
//!   the chain of longest-edge neighbors.
//! - [`triangle::decode_attribute_array`] / [`triangle::decode_triangle`]:
//!   recover a leaf's vertices (or any per-vertex attribute) from its bit
//!   path alone, in `f32` so a GPU shader replaying the path agrees
//!   bit-for-bit.
//! - [`triangle::neighbors`] and [`triangle::diamond_parent`]: the
//!   same-depth neighbor algebra behind the conforming operations,
//!   exposed for terrain-style consumers.
//!
//! Every operation exists for two domains: the [`triangle`] module covers
//! a single right triangle, the [`square`] module the unit square split
//! along its diagonal. Pick one module per tree and stay with it.
//!
//! Nothing here allocates or stores geometry: the tree's bits are the
//! entire encoding.
//!
//! # Example
//!
//! Refine toward a point of interest and coarsen away from it, once per
//! frame:
//!
//! ```rust
//! use bisection_cbt::Cbt;
//! use bisection_leb::triangle;
//! use kurbo::Point;
//!
//! let target = Point::new(0.25, 0.25);
//! let mut cbt = Cbt::new(12);
//!
//! for _frame in 0..4 {
//!     cbt.update(|cbt, leaf| {
//!         let tri = triangle::decode_triangle(leaf);
//!         if tri.iter().any(|p| p.distance(target) < 0.2) {
//!             triangle::split_node(cbt, leaf);
//!         }
//!     });
//! }
//! assert!(cbt.leaf_count() > 2);
//! ```
//!
//! # Caller contract
//!
//! [`triangle::split_node`] and [`triangle::merge_node`] write leaf bits
//! only, so ancestor sums go stale until the next [`bisection_cbt::Cbt::reduce`];
//! drive them from [`bisection_cbt::Cbt::update`] (which reduces for you) and pass
//! only nodes enumerated as active leaves in the current batch.

#![no_std]

mod matrix;
mod neighbors;
pub mod square;
pub mod triangle;
mod types;

pub use types::{Diamond, Neighbors};

#[cfg(test)]
extern crate alloc;
