// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Extendible hash map with directory-guided expansion.
//!
//! Unordered map for point lookups. A dense directory of bucket references
//! grows by doubling; buckets split individually, so only the overflowing
//! lineage pays for reorganisation.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ ExtHashMap<K, V>                             │
//! ├──────────────────────────────────────────────┤
//! │ - dir: Vec<BucketId>    (logical layer)      │
//! │ - store: Vec<Bucket>    (physical layer)     │
//! │ - d0: log2(initial directory size)           │
//! └──────────────────────────────────────────────┘
//!     dir[hash(k) mod 2^D] ──▶ store[id] ──▶ entries
//! ```
//!
//! Multiple directory slots alias one bucket while the bucket's local depth
//! (`d0 + n_split`) is below the global depth `D`. A split separates the
//! lineage by one more hash bit and rewires every aliased slot; when the
//! overflowing bucket is already at full depth the directory doubles first,
//! the upper half initially aliasing the lower.
//!
//! ## Example Usage
//!
//! ```rust
//! use reedindex::exthash::ExtHashMap;
//!
//! let mut map = ExtHashMap::<u64, u64>::new(11)?; // rounds up to 16 slots
//! for k in (1..=99).step_by(2) {
//!     map.put(k, k * k)?;
//! }
//!
//! assert_eq!(map.get(&13), Some(169));
//! assert_eq!(map.get(&2), None);
//! # Ok::<(), reedindex::IndexError>(())
//! ```

use crate::error::{IdxResult, IndexError};
use crate::exthash::bucket::{Bucket, BucketId, SLOTS};
use crate::indices::{Index, ProbeCounter, StableHash};
use serde::Serialize;
use std::fmt::Debug;

/// Hard ceiling on local depth: a split below this many hash bits that
/// still cannot separate the colliding keys reports `CapacityOverflow`
/// instead of doubling the directory indefinitely.
const MAX_DEPTH: u32 = 32;

/// Structural statistics for an extendible hash map.
#[derive(Debug, Clone, Serialize)]
pub struct ExtHashStats {
    /// Directory length (`2^global_depth`).
    pub directory_size: usize,

    /// Global depth `D`.
    pub global_depth: u32,

    /// Distinct buckets in the physical store.
    pub bucket_count: usize,

    /// Nominal capacity: `SLOTS * bucket_count`.
    pub capacity: usize,

    /// Stored entries across all buckets.
    pub population: usize,

    /// Buckets inspected by lookups since the last reset.
    pub probes: u64,
}

/// Extendible hash map.
///
/// ## Type Parameters
/// - `K`: Key type (equality plus a stable integer hash)
/// - `V`: Value type (Clone for returning copies)
///
/// ## Thread Safety
/// - Not thread-safe (caller must synchronise)
///
/// ## Duplicate Keys
/// - Not rejected; `get` returns the first slot scanned
pub struct ExtHashMap<K, V>
where
    K: Eq + StableHash + Clone,
    V: Clone,
{
    /// Directory: logical access layer, one slot per hash residue.
    dir: Vec<BucketId>,

    /// Physical store of all distinct buckets.
    store: Vec<Bucket<K, V>>,

    /// log2 of the initial directory size.
    d0: u32,

    /// Buckets inspected during lookups.
    probes: ProbeCounter,
}

impl<K, V> Debug for ExtHashMap<K, V>
where
    K: Eq + StableHash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtHashMap")
            .field("directory_size", &self.dir.len())
            .field("buckets", &self.store.len())
            .finish()
    }
}

impl<K, V> ExtHashMap<K, V>
where
    K: Eq + StableHash + Clone,
    V: Clone,
{
    /// Create a map with `init_size` rounded up to the next power of two.
    ///
    /// ## Input
    /// - `init_size`: Requested initial directory size (>= 1)
    ///
    /// ## Output
    /// - `Ok(ExtHashMap)`: directory of `init_size.next_power_of_two()`
    ///   slots, each referencing its own empty bucket
    /// - `Err(IndexError::InvalidInitSize)`: `init_size` was zero
    pub fn new(init_size: usize) -> IdxResult<Self> {
        if init_size == 0 {
            return Err(IndexError::InvalidInitSize { given: init_size });
        }
        let size = init_size.next_power_of_two();
        Ok(Self {
            dir: (0..size as BucketId).collect(),
            store: (0..size).map(|_| Bucket::new(0)).collect(),
            d0: size.trailing_zeros(),
            probes: ProbeCounter::new(),
        })
    }

    /// Retrieve the value for a key.
    ///
    /// One directory probe reaches the unique bucket that must contain the
    /// key; the bucket is scanned linearly, first match wins. Increments
    /// the probe counter once for the inspected bucket.
    pub fn get(&self, key: &K) -> Option<V> {
        let idx = (key.stable_hash() % self.dir.len() as u64) as usize;
        let bucket = &self.store[self.dir[idx] as usize];
        self.probes.record(1);
        bucket
            .entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// Insert a key-value pair unconditionally.
    ///
    /// A full target bucket splits, separating its lineage by one more hash
    /// bit (doubling the directory first when the bucket is already at full
    /// depth), and the insert retries against the deepened directory. More
    /// than `SLOTS` keys sharing one `MAX_DEPTH`-bit prefix cannot be
    /// separated and report `CapacityOverflow`.
    pub fn put(&mut self, key: K, value: V) -> IdxResult<()> {
        let h = key.stable_hash();
        for _ in 0..MAX_DEPTH {
            let idx = (h % self.dir.len() as u64) as usize;
            let bid = self.dir[idx];
            if !self.store[bid as usize].is_full() {
                self.store[bid as usize].entries.push((key, value));
                return Ok(());
            }
            self.split(bid, h)?;
        }
        Err(IndexError::CapacityOverflow {
            bucket: (h % self.dir.len() as u64) as usize,
            slots: SLOTS,
        })
    }

    /// Split a full bucket, deepening its lineage by one hash bit.
    ///
    /// The parent's entries are partitioned on the new bit: the class of the
    /// pending key's hash goes to the fresh bucket `b2`, the remainder stays
    /// in the parent's store slot as `b1`. Every directory slot that aliased
    /// the parent is rewired by its own residue, so lookups stay consistent
    /// when several doublings separate local from global depth.
    fn split(&mut self, bid: BucketId, h: u64) -> IdxResult<()> {
        let local = self.d0 + self.store[bid as usize].n_split;
        // No number of extra bits separates entries whose full hashes all
        // equal the pending key's; fail before doubling the directory.
        let futile = self.store[bid as usize]
            .entries
            .iter()
            .all(|(k, _)| k.stable_hash() == h);
        if local >= MAX_DEPTH || futile {
            return Err(IndexError::CapacityOverflow {
                bucket: bid as usize,
                slots: SLOTS,
            });
        }

        // Bucket already at full depth: double the directory so the upper
        // half aliases the lower before the lineage deepens.
        if self.dir.len() == 1usize << local {
            self.dir.extend_from_within(..);
        }

        let mask = (1u64 << (local + 1)) - 1;
        let target = h & mask;
        let parent = std::mem::take(&mut self.store[bid as usize].entries);
        let n_split = self.store[bid as usize].n_split + 1;

        let mut b1 = Vec::with_capacity(SLOTS);
        let mut b2 = Vec::with_capacity(SLOTS);
        for (k, v) in parent {
            if k.stable_hash() & mask == target {
                b2.push((k, v));
            } else {
                b1.push((k, v));
            }
        }

        self.store[bid as usize] = Bucket { entries: b1, n_split };
        let b2_id = self.store.len() as BucketId;
        self.store.push(Bucket { entries: b2, n_split });

        for slot in 0..self.dir.len() {
            if self.dir[slot] == bid && (slot as u64) & mask == target {
                self.dir[slot] = b2_id;
            }
        }
        Ok(())
    }

    /// All key-value pairs, by scanning the physical store.
    ///
    /// Order is arbitrary; every distinct bucket contributes its entries
    /// exactly once.
    pub fn entries(&self) -> Vec<(K, V)> {
        self.store
            .iter()
            .flat_map(|bucket| bucket.entries.iter().cloned())
            .collect()
    }

    /// Nominal capacity: `SLOTS` times the number of distinct buckets.
    ///
    /// This is not the population; use `entries().len()` for that.
    pub fn size(&self) -> usize {
        SLOTS * self.store.len()
    }

    /// Buckets inspected by lookups since the last reset.
    pub fn probes(&self) -> u64 {
        self.probes.get()
    }

    /// Reset the probe counter.
    pub fn reset_probes(&self) {
        self.probes.reset();
    }

    /// Structural statistics for diagnostics and the CLI exerciser.
    pub fn stats(&self) -> ExtHashStats {
        ExtHashStats {
            directory_size: self.dir.len(),
            global_depth: self.dir.len().trailing_zeros(),
            bucket_count: self.store.len(),
            capacity: self.size(),
            population: self.store.iter().map(|b| b.entries.len()).sum(),
            probes: self.probes(),
        }
    }

    /// Verify the structural invariants of directory and store.
    ///
    /// Checks, for every bucket:
    /// - at most `SLOTS` entries
    /// - every entry's hash matches the bucket's residue on its local depth
    /// - exactly `2^(D - local)` directory slots reference it, and each of
    ///   those slots carries the bucket's residue
    ///
    /// ## Output
    /// - `Ok(())`: All invariants hold
    /// - `Err(IndexError::CorruptedIndex)`: first violation found
    pub fn validate(&self) -> IdxResult<()> {
        let global = self.dir.len().trailing_zeros();
        let mut alias_counts = vec![0usize; self.store.len()];
        for &bid in &self.dir {
            alias_counts[bid as usize] += 1;
        }

        for (bid, bucket) in self.store.iter().enumerate() {
            let corrupted = |reason: &str| IndexError::CorruptedIndex {
                node: bid as u32,
                reason: reason.to_string(),
            };
            if bucket.entries.len() > SLOTS {
                return Err(corrupted("bucket over capacity"));
            }
            let local = self.d0 + bucket.n_split;
            if local > global {
                return Err(corrupted("local depth exceeds global depth"));
            }
            let expected_aliases = 1usize << (global - local);
            if alias_counts[bid] != expected_aliases {
                return Err(corrupted("wrong directory alias count"));
            }
            let mask = (1u64 << local) - 1;
            let residues: Vec<u64> = bucket
                .entries
                .iter()
                .map(|(k, _)| k.stable_hash() & mask)
                .collect();
            if let Some(first) = residues.first() {
                if residues.iter().any(|r| r != first) {
                    return Err(corrupted("entries disagree on local residue"));
                }
            }
            // Every aliased slot must carry the bucket's residue.
            for (slot, &target) in self.dir.iter().enumerate() {
                if target as usize == bid {
                    if let Some(first) = residues.first() {
                        if (slot as u64) & mask != *first {
                            return Err(corrupted("aliased slot residue mismatch"));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl<K, V> Index<K, V> for ExtHashMap<K, V>
where
    K: Eq + StableHash + Clone + Debug,
    V: Clone + Debug,
{
    fn get(&self, key: &K) -> Option<V> {
        ExtHashMap::get(self, key)
    }

    fn put(&mut self, key: K, value: V) -> IdxResult<()> {
        ExtHashMap::put(self, key, value)
    }

    fn entries(&self) -> Vec<(K, V)> {
        ExtHashMap::entries(self)
    }

    fn size(&self) -> usize {
        ExtHashMap::size(self)
    }

    fn probes(&self) -> u64 {
        ExtHashMap::probes(self)
    }

    fn reset_probes(&self) {
        ExtHashMap::reset_probes(self)
    }

    fn backend_type(&self) -> &'static str {
        "exthash"
    }

    fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.dir.len() * std::mem::size_of::<BucketId>()
            + self.store.len() * (std::mem::size_of::<Bucket<K, V>>()
                + SLOTS * std::mem::size_of::<(K, V)>())
    }
}
