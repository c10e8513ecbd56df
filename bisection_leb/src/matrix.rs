// Copyright 2025 the Bisection Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 3x3 barycentric splitting matrices.
//!
//! A node's geometry is never stored: it is replayed from the node's bit
//! path as a product of per-bisection matrices acting on the root
//! triangle's attributes. All arithmetic is `f32` so a GPU shader replaying
//! the same path lands on bit-identical vertices.

pub(crate) type Mat3 = [[f32; 3]; 3];

pub(crate) const IDENTITY: Mat3 = [
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
];

/// Swaps v0 and v2. Applied once when the bisection count is odd, so the
/// winding of decoded triangles stays consistent across depths.
pub(crate) const WINDING: Mat3 = [
    [0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0],
    [1.0, 0.0, 0.0],
];

/// The bisection step: rows are the weights of the child's vertices over
/// the parent's. `path_bit` selects the left (0) or right (1) child; the
/// child's v1 is always the midpoint of the parent's longest edge.
pub(crate) fn splitting(path_bit: u64) -> Mat3 {
    let b = path_bit as f32;
    let c = 1.0 - b;
    [[c, b, 0.0], [0.5, 0.0, 0.5], [0.0, c, b]]
}

/// The square-domain root step: maps the root triangle onto the lower (0)
/// or upper (1) triangle of the unit square.
pub(crate) fn square(path_bit: u64) -> Mat3 {
    let b = path_bit as f32;
    let c = 1.0 - b;
    [[c, 0.0, b], [b, c, b], [b, 0.0, c]]
}

pub(crate) fn mul(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut out = [[0.0_f32; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
    out
}

/// Transform each attribute row in place: `row[j] = dot(m[j], row)`.
pub(crate) fn transform_rows(m: &Mat3, attributes: &mut [[f32; 3]]) {
    for row in attributes {
        let tmp = *row;
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = m[j][0] * tmp[0] + m[j][1] * tmp[1] + m[j][2] * tmp[2];
        }
    }
}
