// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Bucket structure for the extendible hash map.

/// Fixed bucket capacity in key-value slots.
pub const SLOTS: usize = 4;

/// Bucket identifier: index into the map's physical bucket store.
pub type BucketId = u32;

/// Fixed-capacity bucket with a local split counter.
///
/// `n_split` records how many times this bucket lineage has split; the
/// bucket's local depth is `d0 + n_split` where `d0` is the log2 of the
/// initial directory size. A bucket whose local depth equals the global
/// depth is the sole owner of its directory slots; shallower buckets are
/// aliased by `2^(global - local)` slots.
#[derive(Debug, Clone)]
pub struct Bucket<K, V> {
    /// Stored key-value pairs, at most `SLOTS`.
    pub entries: Vec<(K, V)>,

    /// Number of splits in this bucket's lineage.
    pub n_split: u32,
}

impl<K, V> Bucket<K, V> {
    /// Create an empty bucket with the given split count.
    pub fn new(n_split: u32) -> Self {
        Self {
            entries: Vec::with_capacity(SLOTS),
            n_split,
        }
    }

    /// Whether all slots are occupied.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= SLOTS
    }
}
