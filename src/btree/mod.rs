// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! B+-Tree ordered index engine.
//!
//! In-memory ordered map supporting point lookups, duplicate-rejecting
//! insertion and range queries over a linked leaf chain.
//!
//! ## Features
//!
//! - **Ordered access**: first/last key, half-open `sub_map`, `head_map`,
//!   `tail_map`
//! - **Leaf chain**: all leaves linked in ascending key order for O(n)
//!   sequential scans
//! - **Arena storage**: nodes held in a flat `Vec` addressed by `NodeId`,
//!   no per-node heap objects
//! - **Probe counting**: lookups report how many nodes they inspected
//!
//! ## Example Usage
//!
//! ```rust
//! use reedindex::btree::BPlusTreeMap;
//!
//! let mut tree = BPlusTreeMap::<u64, String>::new();
//! tree.put(2, "two".to_string())?;
//! tree.put(1, "one".to_string())?;
//!
//! assert_eq!(tree.get(&1), Some("one".to_string()));
//! assert_eq!(tree.first_key(), Some(1));
//! # Ok::<(), reedindex::IndexError>(())
//! ```

mod iter;
mod node;
mod tree;
mod types;

#[cfg(test)]
mod btree_test;

// Re-export public API
pub use iter::EntryIter;
pub use tree::BPlusTreeMap;
pub use types::{BPlusTreeStats, NodeId, DEFAULT_ORDER, MIN_ORDER};
