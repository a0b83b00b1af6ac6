// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Core types for the B+-Tree index backend.

use serde::Serialize;

/// Node identifier type for B+-Tree nodes.
///
/// 32-bit index into the tree's node arena. Nodes are allocated by splits
/// and never freed until the map is dropped, so identifiers stay valid for
/// the lifetime of the tree.
pub type NodeId = u32;

/// Default tree order (maximum fanout).
///
/// A node holds up to `ORDER - 1` keys; an internal node up to `ORDER`
/// children, a leaf up to `ORDER - 1` values plus one sibling reference.
pub const DEFAULT_ORDER: usize = 5;

/// Minimum admissible order (2-3 children per internal node).
pub const MIN_ORDER: usize = 3;

/// Structural statistics for a B+-Tree, as reported by the CLI exerciser.
#[derive(Debug, Clone, Serialize)]
pub struct BPlusTreeStats {
    /// Configured order (maximum fanout).
    pub order: usize,

    /// Levels from root to leaves (1 for a leaf root).
    pub depth: usize,

    /// Total nodes in the arena.
    pub node_count: usize,

    /// Leaf nodes in the chain.
    pub leaf_count: usize,

    /// Live keys (sum of leaf key counts).
    pub key_count: usize,

    /// Nodes inspected by lookups since the last reset.
    pub probes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        // Reference configuration: leaf capacity 4, fanout up to 5.
        assert_eq!(DEFAULT_ORDER, 5);
        assert!(DEFAULT_ORDER >= MIN_ORDER);
    }

    #[test]
    fn test_min_order() {
        assert_eq!(MIN_ORDER, 3);
    }
}
