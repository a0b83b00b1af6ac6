// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Index trait abstraction for pluggable backends.
//!
//! Allows the engine to switch between B+-Tree, extendible hashing or linear
//! hashing without changing query logic. Ordered operations (first/last key,
//! range queries) are deliberately not part of the trait; only the B+-Tree
//! supports them and they stay inherent methods there.

use crate::error::IdxResult;
use std::fmt::Debug;

/// Common interface for all index implementations.
///
/// ## Type Parameters
/// - `K`: Key type (must be Clone for return values)
/// - `V`: Value type (must be Clone for return values)
///
/// ## Implementations
/// - `BPlusTreeMap<K, V>`: ordered, rejects duplicate keys
/// - `ExtHashMap<K, V>`: unordered, accepts duplicate keys
/// - `LinHashMap<K, V>`: unordered, accepts duplicate keys
///
/// ## Thread Safety
/// - Implementations are single-threaded; callers serialise externally
/// - Write operations require `&mut self` (exclusive access)
pub trait Index<K, V>: Debug {
    /// Get value for exact key match.
    ///
    /// ## Input
    /// - `key`: Key to look up
    ///
    /// ## Output
    /// - `Some(V)` if key exists
    /// - `None` if key not found (a missing key is not an error)
    ///
    /// ## Side Effects
    /// - Increments the probe counter once per node/bucket inspected
    fn get(&self, key: &K) -> Option<V>;

    /// Insert key-value pair. No previous value is returned.
    ///
    /// ## Input
    /// - `key`: Key to insert
    /// - `value`: Value to store
    ///
    /// ## Output
    /// - `Ok(())`: Entry inserted
    /// - `Err(IndexError::DuplicateKey)`: B+-Tree only; map unchanged
    /// - `Err(IndexError::CapacityOverflow)`: extendible hashing only;
    ///   more keys share one hash prefix than a bucket can hold
    fn put(&mut self, key: K, value: V) -> IdxResult<()>;

    /// All key-value pairs currently stored.
    ///
    /// ## Output
    /// - B+-Tree: ascending key order (leaf chain walk)
    /// - Hash maps: arbitrary order (bucket store walk)
    fn entries(&self) -> Vec<(K, V)>;

    /// Size of the index.
    ///
    /// ## Output
    /// - B+-Tree: live key count
    /// - Hash maps: nominal capacity (`SLOTS` times bucket count), not
    ///   population
    fn size(&self) -> usize;

    /// Nodes/buckets inspected by lookups since the last reset.
    fn probes(&self) -> u64;

    /// Reset the probe counter to zero.
    fn reset_probes(&self);

    // Metadata methods

    /// Backend type identifier.
    ///
    /// ## Returns
    /// - `"bptree"`, `"exthash"` or `"linhash"`
    fn backend_type(&self) -> &'static str;

    /// Estimated memory usage in bytes.
    ///
    /// ## Returns
    /// - Approximation from node/bucket counts and entry sizes
    fn memory_usage(&self) -> usize;
}
