// Copyright 2025 the Bisection Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Same-depth neighbor propagation.
//!
//! Neighbor ids are replayed from a node's bit path, one bisection at a
//! time, from a per-domain root neighborhood. Ids are raw `u64` heap
//! indices at the node's own depth; 0 is "boundary across this edge".

use bisection_cbt::Node;

use crate::types::Neighbors;

#[derive(Copy, Clone)]
pub(crate) struct NeighborIds {
    pub(crate) left: u64,
    pub(crate) right: u64,
    pub(crate) edge: u64,
    pub(crate) node: u64,
}

impl NeighborIds {
    pub(crate) fn into_neighbors(self, depth: u32) -> Neighbors {
        let wrap = |id: u64| (id != 0).then_some(Node::new(id, depth));
        Neighbors {
            left: wrap(self.left),
            right: wrap(self.right),
            edge: wrap(self.edge),
            node: Node::new(self.node, depth),
        }
    }
}

/// Advance the neighborhood through one bisection, selected by the path
/// bit. Null ids stay null: a boundary edge's children are boundary edges.
fn step(ids: NeighborIds, path_bit: u64) -> NeighborIds {
    let b2 = u64::from(ids.right != 0);
    let b3 = u64::from(ids.edge != 0);
    if path_bit == 0 {
        NeighborIds {
            left: (ids.node << 1) | 1,
            right: (ids.edge << 1) | b3,
            edge: (ids.right << 1) | b2,
            node: ids.node << 1,
        }
    } else {
        NeighborIds {
            left: ids.edge << 1,
            right: ids.node << 1,
            edge: ids.left << 1,
            node: (ids.node << 1) | 1,
        }
    }
}

/// Neighborhood of `node` over the triangle domain: replay every path bit
/// from the root triangle's all-boundary neighborhood.
pub(crate) fn triangle_ids(node: Node) -> NeighborIds {
    let mut ids = NeighborIds {
        left: 0,
        right: 0,
        edge: 0,
        node: 1,
    };
    for bit in (0..node.depth).rev() {
        ids = step(ids, node.path_bit(bit));
    }
    ids
}

/// Neighborhood of `node` over the square domain: the two depth-1
/// triangles are each other's edge neighbors, then replay the remaining
/// bits.
pub(crate) fn square_ids(node: Node) -> NeighborIds {
    if node.depth == 0 {
        return NeighborIds {
            left: 0,
            right: 0,
            edge: 0,
            node: 1,
        };
    }
    let b = node.path_bit(node.depth - 1);
    let mut ids = NeighborIds {
        left: 0,
        right: 0,
        edge: 3 - b,
        node: 2 + b,
    };
    for bit in (0..node.depth - 1).rev() {
        ids = step(ids, node.path_bit(bit));
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_first_bisection() {
        // Both depth-1 children have their longest edge on the boundary;
        // they see each other across a short edge.
        let a = triangle_ids(Node::new(2, 1));
        assert_eq!((a.left, a.right, a.edge, a.node), (3, 0, 0, 2));
        let b = triangle_ids(Node::new(3, 1));
        assert_eq!((b.left, b.right, b.edge, b.node), (0, 2, 0, 3));
    }

    #[test]
    fn square_first_bisection() {
        // The square's two triangles share their longest edge (the
        // diagonal).
        let a = square_ids(Node::new(2, 1));
        assert_eq!((a.edge, a.node), (3, 2));
        let b = square_ids(Node::new(3, 1));
        assert_eq!((b.edge, b.node), (2, 3));
    }

    #[test]
    fn propagation_rederives_the_node_id() {
        for depth in 0..8 {
            for id in (1_u64 << depth)..(2_u64 << depth) {
                let node = Node::new(id, depth);
                assert_eq!(triangle_ids(node).node, id);
                assert_eq!(square_ids(node).node, id);
            }
        }
    }

    #[test]
    fn edge_neighbors_are_reciprocal() {
        // Whenever a node has an edge neighbor, that neighbor's edge
        // neighbor is the node.
        for depth in 1..9 {
            for id in (1_u64 << depth)..(2_u64 << depth) {
                let node = Node::new(id, depth);
                let edge = triangle_ids(node).edge;
                if edge != 0 {
                    assert_eq!(
                        triangle_ids(Node::new(edge, depth)).edge,
                        id,
                        "asymmetric triangle edge pair {id}/{edge} at depth {depth}"
                    );
                }
                let edge = square_ids(node).edge;
                if edge != 0 {
                    assert_eq!(
                        square_ids(Node::new(edge, depth)).edge,
                        id,
                        "asymmetric square edge pair {id}/{edge} at depth {depth}"
                    );
                }
            }
        }
    }
}
