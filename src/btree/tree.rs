// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! B+-Tree ordered map over an in-memory node arena.
//!
//! Main ordered index structure. Nodes are held in a flat arena addressed by
//! `NodeId`; leaves form a singly linked chain in ascending key order, which
//! drives entry enumeration, range queries and `size`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │ BPlusTreeMap<K, V, ORDER>                       │
//! ├─────────────────────────────────────────────────┤
//! │ - arena: Vec<Node>   (owned nodes, never freed) │
//! │ - root: NodeId                                  │
//! │ - probes: ProbeCounter                          │
//! └─────────────────────────────────────────────────┘
//!            │ route                     │ next
//!            ▼                           ▼
//!     [internal nodes] ──▶ [leaf] ─▶ [leaf] ─▶ [leaf]
//! ```
//!
//! ## Operations
//!
//! - **Point lookup**: O(log n) descent, probe counter incremented per node
//! - **Range scan**: O(log n + k) descent plus leaf-chain walk
//! - **Insert**: O(log n) with splits propagating along the ancestor stack
//! - Deletion is not supported; nodes are never merged
//!
//! ## Example Usage
//!
//! ```rust
//! use reedindex::btree::BPlusTreeMap;
//!
//! let mut tree = BPlusTreeMap::<u64, u64>::new();
//! for k in 1..=9 {
//!     tree.put(k, k * k)?;
//! }
//!
//! assert_eq!(tree.get(&5), Some(25));
//! assert_eq!(tree.first_key(), Some(1));
//! assert_eq!(tree.sub_map(&3, &7).len(), 4);
//! # Ok::<(), reedindex::IndexError>(())
//! ```

use crate::btree::iter::EntryIter;
use crate::btree::node::{sorted_position, InternalNode, LeafNode, Node};
use crate::btree::types::{BPlusTreeStats, NodeId, DEFAULT_ORDER, MIN_ORDER};
use crate::error::{IdxResult, IndexError};
use crate::indices::{Index, ProbeCounter};
use std::fmt::Debug;

/// B+-Tree ordered map.
///
/// ## Type Parameters
/// - `K`: Key type (total ordering required; Clone for promoted routing keys)
/// - `V`: Value type (Clone for returning copies)
/// - `ORDER`: Maximum fanout, a compile-time constant >= 3 (default 5).
///   A node holds up to `ORDER - 1` keys.
///
/// ## Thread Safety
/// - Not thread-safe (caller must synchronise)
///
/// ## Duplicate Keys
/// - Rejected: `put` of an existing key returns `DuplicateKey` and leaves
///   the map unchanged
pub struct BPlusTreeMap<K, V, const ORDER: usize = DEFAULT_ORDER>
where
    K: Ord + Clone + Debug,
    V: Clone,
{
    /// Node arena; `NodeId` indexes into it.
    arena: Vec<Node<K, V>>,

    /// Root node identifier.
    root: NodeId,

    /// Nodes inspected during lookups and insert descents.
    probes: ProbeCounter,
}

impl<K, V, const ORDER: usize> Debug for BPlusTreeMap<K, V, ORDER>
where
    K: Ord + Clone + Debug,
    V: Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BPlusTreeMap")
            .field("order", &ORDER)
            .field("root", &self.root)
            .field("nodes", &self.arena.len())
            .finish()
    }
}

impl<K, V, const ORDER: usize> BPlusTreeMap<K, V, ORDER>
where
    K: Ord + Clone + Debug,
    V: Clone,
{
    /// Create an empty tree: a single empty leaf as root.
    ///
    /// ## Output
    /// - Empty map ready for insertions
    ///
    /// ## Compile-Time Checks
    /// - `ORDER >= 3`; smaller orders fail monomorphisation
    pub fn new() -> Self {
        const { assert!(ORDER >= MIN_ORDER, "B+-Tree order must be >= 3") };
        Self {
            arena: vec![Node::Leaf(LeafNode::new())],
            root: 0,
            probes: ProbeCounter::new(),
        }
    }

    /// Retrieve the value for a key.
    ///
    /// Descends from the root; at each internal node selects the first child
    /// whose separator exceeds the key, else the rightmost child; at the leaf
    /// scans for equality. Increments the probe counter once per node
    /// visited.
    ///
    /// ## Output
    /// - `Some(V)` if the key exists
    /// - `None` if not found (not an error)
    pub fn get(&self, key: &K) -> Option<V> {
        let mut current = self.root;
        loop {
            self.probes.record(1);
            match &self.arena[current as usize] {
                Node::Internal(node) => {
                    current = node.children[node.route(key)];
                }
                Node::Leaf(leaf) => {
                    return leaf.find_value(key).cloned();
                }
            }
        }
    }

    /// Insert a key-value pair.
    ///
    /// Descends to the target leaf remembering the ancestor stack, inserts
    /// at the sorted position, and splits full nodes on the way back up. A
    /// split leaf keeps the first `ceil((ORDER - 1) / 2)` keys; the promoted
    /// key is the new sibling's smallest key. A split root raises a new root
    /// with one separator and two children.
    ///
    /// ## Output
    /// - `Ok(())`: Entry inserted
    /// - `Err(IndexError::DuplicateKey)`: key already present anywhere on
    ///   the descent path or in the leaf; the map is unchanged
    pub fn put(&mut self, key: K, value: V) -> IdxResult<()> {
        // Descent, remembering (ancestor, chosen child index) pairs.
        let mut stack: Vec<(NodeId, usize)> = Vec::new();
        let mut current = self.root;
        loop {
            self.probes.record(1);
            match &self.arena[current as usize] {
                Node::Internal(node) => {
                    let idx = node.route(&key);
                    // A separator equal to the key means the key exists:
                    // every separator is the minimum of its right subtree.
                    if idx > 0 && node.keys[idx - 1] == key {
                        return Err(IndexError::DuplicateKey {
                            key: format!("{:?}", key),
                        });
                    }
                    stack.push((current, idx));
                    current = node.children[idx];
                }
                Node::Leaf(_) => break,
            }
        }

        let leaf_id = current;
        {
            let Node::Leaf(leaf) = &mut self.arena[leaf_id as usize] else {
                return Err(corrupted(leaf_id, "descent ended on internal node"));
            };
            if leaf.keys.binary_search(&key).is_ok() {
                return Err(IndexError::DuplicateKey {
                    key: format!("{:?}", key),
                });
            }
            if leaf.keys.len() < ORDER - 1 {
                leaf.insert_sorted(key, value);
                return Ok(());
            }
        }

        // Full leaf: split first, then place the new entry on the proper
        // side, then propagate the promoted key along the ancestor stack.
        let mut pending = self.split_leaf(leaf_id, key, value)?;
        while let Some((parent_id, child_idx)) = stack.pop() {
            let Node::Internal(node) = &mut self.arena[parent_id as usize] else {
                return Err(corrupted(parent_id, "ancestor is not an internal node"));
            };
            if node.keys.len() < ORDER - 1 {
                node.wedge(child_idx, pending.0, pending.1);
                return Ok(());
            }
            pending = self.split_internal(parent_id, pending.0, pending.1)?;
        }

        // The root itself split: raise a new root with one separator.
        let new_root = Node::Internal(InternalNode {
            keys: vec![pending.0],
            children: vec![self.root, pending.1],
        });
        self.arena.push(new_root);
        self.root = (self.arena.len() - 1) as NodeId;
        Ok(())
    }

    /// Smallest key, or `None` on an empty tree.
    pub fn first_key(&self) -> Option<K> {
        match &self.arena[self.leftmost_leaf() as usize] {
            Node::Leaf(leaf) => leaf.keys.first().cloned(),
            Node::Internal(_) => None,
        }
    }

    /// Largest key, or `None` on an empty tree.
    pub fn last_key(&self) -> Option<K> {
        match &self.arena[self.rightmost_leaf() as usize] {
            Node::Leaf(leaf) => leaf.keys.last().cloned(),
            Node::Internal(_) => None,
        }
    }

    /// Entries with `lo <= key < hi`, in ascending key order.
    ///
    /// Descends to the leaf that would contain `lo`, then walks the leaf
    /// chain emitting matching entries until a key reaches `hi`.
    pub fn sub_map(&self, lo: &K, hi: &K) -> Vec<(K, V)> {
        let mut out = Vec::new();
        let mut current = Some(self.leaf_for(lo));
        while let Some(id) = current {
            let Node::Leaf(leaf) = &self.arena[id as usize] else {
                break;
            };
            for (k, v) in leaf.keys.iter().zip(leaf.values.iter()) {
                if k >= hi {
                    return out;
                }
                if k >= lo {
                    out.push((k.clone(), v.clone()));
                }
            }
            current = leaf.next;
        }
        out
    }

    /// Entries with `key < hi`, equivalent to `sub_map(first_key(), hi)`.
    pub fn head_map(&self, hi: &K) -> Vec<(K, V)> {
        match self.first_key() {
            Some(first) => self.sub_map(&first, hi),
            None => Vec::new(),
        }
    }

    /// Entries with `lo <= key`, including the last key.
    ///
    /// Delegates to the half-open `sub_map(lo, last_key())` and appends the
    /// `(last_key, value)` pair when `lo <= last_key`. The closed right
    /// endpoint is an intentional asymmetry with `sub_map`.
    pub fn tail_map(&self, lo: &K) -> Vec<(K, V)> {
        let Some(last) = self.last_key() else {
            return Vec::new();
        };
        let mut out = self.sub_map(lo, &last);
        if *lo <= last {
            if let Node::Leaf(leaf) = &self.arena[self.rightmost_leaf() as usize] {
                if let (Some(k), Some(v)) = (leaf.keys.last(), leaf.values.last()) {
                    out.push((k.clone(), v.clone()));
                }
            }
        }
        out
    }

    /// Lazy iterator over all entries in ascending key order.
    ///
    /// Walks the leaf chain from the leftmost leaf.
    pub fn iter(&self) -> EntryIter<'_, K, V> {
        EntryIter::new(&self.arena, self.leftmost_leaf())
    }

    /// Live key count (sum of leaf key counts along the chain).
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut current = Some(self.leftmost_leaf());
        while let Some(id) = current {
            let Node::Leaf(leaf) = &self.arena[id as usize] else {
                break;
            };
            count += leaf.keys.len();
            current = leaf.next;
        }
        count
    }

    /// Nodes inspected by lookups and insert descents since the last reset.
    pub fn probes(&self) -> u64 {
        self.probes.get()
    }

    /// Reset the probe counter.
    pub fn reset_probes(&self) {
        self.probes.reset();
    }

    /// Structural statistics for diagnostics and the CLI exerciser.
    pub fn stats(&self) -> BPlusTreeStats {
        let leaf_count = self
            .arena
            .iter()
            .filter(|node| matches!(node, Node::Leaf(_)))
            .count();
        BPlusTreeStats {
            order: ORDER,
            depth: self.depth(),
            node_count: self.arena.len(),
            leaf_count,
            key_count: self.size(),
            probes: self.probes(),
        }
    }

    /// Verify the structural invariants of the tree.
    ///
    /// Checks, for every node reachable from the root:
    /// - keys are strictly ascending and within capacity (`ORDER - 1`)
    /// - internal nodes have exactly one more child than keys
    /// - every routing key equals the minimum key of its right subtree
    /// - all keys in subtree `i` are strictly below separator `i`
    /// - all leaves reside at the same depth
    /// - the leaf chain ascends strictly across all leaves
    /// - no non-root node is empty
    ///
    /// ## Output
    /// - `Ok(())`: All invariants hold
    /// - `Err(IndexError::CorruptedIndex)`: first violation found
    pub fn validate(&self) -> IdxResult<()> {
        let mut leaf_depth: Option<usize> = None;
        self.validate_node(self.root, 1, None, None, &mut leaf_depth)?;

        // Leaf chain must ascend strictly across leaf boundaries.
        let mut previous: Option<K> = None;
        let mut current = Some(self.leftmost_leaf());
        while let Some(id) = current {
            let Node::Leaf(leaf) = &self.arena[id as usize] else {
                return Err(corrupted(id, "leaf chain references internal node"));
            };
            for key in &leaf.keys {
                if let Some(prev) = &previous {
                    if prev >= key {
                        return Err(corrupted(id, "leaf chain keys not ascending"));
                    }
                }
                previous = Some(key.clone());
            }
            current = leaf.next;
        }
        Ok(())
    }

    fn validate_node(
        &self,
        id: NodeId,
        depth: usize,
        lower: Option<&K>,
        upper: Option<&K>,
        leaf_depth: &mut Option<usize>,
    ) -> IdxResult<()> {
        match &self.arena[id as usize] {
            Node::Leaf(leaf) => {
                if leaf.keys.len() != leaf.values.len() {
                    return Err(corrupted(id, "key/value count mismatch"));
                }
                if leaf.keys.len() > ORDER - 1 {
                    return Err(corrupted(id, "leaf over capacity"));
                }
                if id != self.root && leaf.keys.is_empty() {
                    return Err(corrupted(id, "non-root leaf is empty"));
                }
                check_bounds(id, &leaf.keys, lower, upper)?;
                match leaf_depth {
                    Some(expected) if *expected != depth => {
                        Err(corrupted(id, "leaves at different depths"))
                    }
                    Some(_) => Ok(()),
                    None => {
                        *leaf_depth = Some(depth);
                        Ok(())
                    }
                }
            }
            Node::Internal(node) => {
                if node.children.len() != node.keys.len() + 1 {
                    return Err(corrupted(id, "child count is not keys + 1"));
                }
                if node.keys.is_empty() {
                    return Err(corrupted(id, "internal node without keys"));
                }
                if node.keys.len() > ORDER - 1 {
                    return Err(corrupted(id, "internal node over capacity"));
                }
                check_bounds(id, &node.keys, lower, upper)?;
                for (i, &child) in node.children.iter().enumerate() {
                    let child_lower = if i == 0 { lower } else { Some(&node.keys[i - 1]) };
                    let child_upper = node.keys.get(i).or(upper);
                    self.validate_node(child, depth + 1, child_lower, child_upper, leaf_depth)?;
                }
                // Routing key = minimum key of the right subtree.
                for (i, key) in node.keys.iter().enumerate() {
                    if self.min_key(node.children[i + 1]) != Some(key) {
                        return Err(corrupted(id, "separator is not min of right subtree"));
                    }
                }
                Ok(())
            }
        }
    }

    /// Minimum key in the subtree rooted at `id`.
    fn min_key(&self, id: NodeId) -> Option<&K> {
        let mut current = id;
        loop {
            match &self.arena[current as usize] {
                Node::Internal(node) => current = node.children[0],
                Node::Leaf(leaf) => return leaf.keys.first(),
            }
        }
    }

    /// Leftmost leaf (head of the leaf chain).
    fn leftmost_leaf(&self) -> NodeId {
        let mut current = self.root;
        loop {
            match &self.arena[current as usize] {
                Node::Internal(node) => current = node.children[0],
                Node::Leaf(_) => return current,
            }
        }
    }

    /// Rightmost leaf (tail of the leaf chain).
    fn rightmost_leaf(&self) -> NodeId {
        let mut current = self.root;
        loop {
            match &self.arena[current as usize] {
                Node::Internal(node) => current = node.children[node.keys.len()],
                Node::Leaf(_) => return current,
            }
        }
    }

    /// Leaf that would contain `key` (no probe counting).
    fn leaf_for(&self, key: &K) -> NodeId {
        let mut current = self.root;
        loop {
            match &self.arena[current as usize] {
                Node::Internal(node) => current = node.children[node.route(key)],
                Node::Leaf(_) => return current,
            }
        }
    }

    /// Levels from root to leaves (1 for a leaf root).
    fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.root;
        loop {
            match &self.arena[current as usize] {
                Node::Internal(node) => {
                    depth += 1;
                    current = node.children[0];
                }
                Node::Leaf(_) => return depth,
            }
        }
    }

    /// Split a full leaf and place the new entry.
    ///
    /// The original keeps the first `ceil((ORDER - 1) / 2)` keys; the new
    /// sibling takes the rest, inherits the original's sibling reference and
    /// becomes the original's sibling. The new entry lands on whichever side
    /// its sorted position falls. The promoted key is the sibling's smallest
    /// key and stays in the sibling.
    fn split_leaf(&mut self, leaf_id: NodeId, key: K, value: V) -> IdxResult<(K, NodeId)> {
        let new_id = self.arena.len() as NodeId;
        let right = {
            let Node::Leaf(leaf) = &mut self.arena[leaf_id as usize] else {
                return Err(corrupted(leaf_id, "leaf split on internal node"));
            };
            let keep = (ORDER - 1).div_ceil(2);
            let mut right_keys = leaf.keys.split_off(keep);
            let mut right_values = leaf.values.split_off(keep);
            if key < right_keys[0] {
                let idx = sorted_position(&leaf.keys, &key);
                leaf.keys.insert(idx, key);
                leaf.values.insert(idx, value);
            } else {
                let idx = sorted_position(&right_keys, &key);
                right_keys.insert(idx, key);
                right_values.insert(idx, value);
            }
            LeafNode {
                keys: right_keys,
                values: right_values,
                next: leaf.next.replace(new_id),
            }
        };
        let promoted = right.keys[0].clone();
        self.arena.push(Node::Leaf(right));
        Ok((promoted, new_id))
    }

    /// Split a full internal node and wedge the pending key/child.
    ///
    /// Distributes the existing keys first: the original keeps the first
    /// `ceil((ORDER - 1) / 2)` keys, the promoted key is the smallest key of
    /// the right half (removed, not duplicated into the right node), and the
    /// pending key/child is wedged into whichever side it sorts. At orders
    /// below 5 the right half can end up empty when the pending key wedges
    /// left; one key/child then rotates from the left node through the
    /// promoted slot so both sides stay populated.
    fn split_internal(&mut self, node_id: NodeId, key: K, child: NodeId) -> IdxResult<(K, NodeId)> {
        let new_id = self.arena.len() as NodeId;
        let (mut promoted, mut right) = {
            let Node::Internal(node) = &mut self.arena[node_id as usize] else {
                return Err(corrupted(node_id, "internal split on leaf node"));
            };
            let keep = (ORDER - 1).div_ceil(2);
            let mut right_keys = node.keys.split_off(keep);
            let right_children = node.children.split_off(keep + 1);
            let promoted = right_keys.remove(0);
            (
                promoted,
                InternalNode {
                    keys: right_keys,
                    children: right_children,
                },
            )
        };
        if key < promoted {
            let Node::Internal(node) = &mut self.arena[node_id as usize] else {
                return Err(corrupted(node_id, "internal split on leaf node"));
            };
            let idx = sorted_position(&node.keys, &key);
            node.wedge(idx, key, child);
            if right.keys.is_empty() {
                // A left node key is the separator of its last child, which
                // in turn is the minimum of that subtree, so rotating the
                // pair rightwards keeps every routing invariant intact.
                let (last_key, last_child) = match (node.keys.pop(), node.children.pop()) {
                    (Some(k), Some(c)) => (k, c),
                    _ => return Err(corrupted(node_id, "left split half underflowed")),
                };
                right.keys.insert(0, promoted);
                right.children.insert(0, last_child);
                promoted = last_key;
            }
        } else {
            let idx = sorted_position(&right.keys, &key);
            right.wedge(idx, key, child);
        }
        self.arena.push(Node::Internal(right));
        Ok((promoted, new_id))
    }
}

impl<K, V, const ORDER: usize> Default for BPlusTreeMap<K, V, ORDER>
where
    K: Ord + Clone + Debug,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, const ORDER: usize> Index<K, V> for BPlusTreeMap<K, V, ORDER>
where
    K: Ord + Clone + Debug,
    V: Clone + Debug,
{
    fn get(&self, key: &K) -> Option<V> {
        BPlusTreeMap::get(self, key)
    }

    fn put(&mut self, key: K, value: V) -> IdxResult<()> {
        BPlusTreeMap::put(self, key, value)
    }

    fn entries(&self) -> Vec<(K, V)> {
        self.iter().collect()
    }

    fn size(&self) -> usize {
        BPlusTreeMap::size(self)
    }

    fn probes(&self) -> u64 {
        BPlusTreeMap::probes(self)
    }

    fn reset_probes(&self) {
        BPlusTreeMap::reset_probes(self)
    }

    fn backend_type(&self) -> &'static str {
        "bptree"
    }

    fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.arena.len() * std::mem::size_of::<Node<K, V>>()
            + self.size() * std::mem::size_of::<(K, V)>()
    }
}

/// Keys of a node must lie within its subtree bounds: at or above the left
/// separator, strictly below the right one.
fn check_bounds<K: Ord>(
    id: NodeId,
    keys: &[K],
    lower: Option<&K>,
    upper: Option<&K>,
) -> IdxResult<()> {
    for window in keys.windows(2) {
        if window[0] >= window[1] {
            return Err(corrupted(id, "keys not strictly ascending"));
        }
    }
    if let (Some(low), Some(first)) = (lower, keys.first()) {
        if first < low {
            return Err(corrupted(id, "key below subtree lower bound"));
        }
    }
    if let (Some(high), Some(last)) = (upper, keys.last()) {
        if last >= high {
            return Err(corrupted(id, "key at or above subtree upper bound"));
        }
    }
    Ok(())
}

fn corrupted(node: NodeId, reason: &str) -> IndexError {
    IndexError::CorruptedIndex {
        node,
        reason: reason.to_string(),
    }
}
