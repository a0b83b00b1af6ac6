// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Linear hash map with incremental, directory-free splitting.
//!
//! Unordered map for point lookups. Instead of a directory, two moduli and a
//! split pointer describe which home bucket owns a key; overflow is absorbed
//! by per-chain overflow buckets and amortised away by splitting exactly one
//! home bucket per overflowing insert.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ LinHashMap<K, V>                             │
//! ├──────────────────────────────────────────────┤
//! │ - table: Vec<Bucket>    (home buckets)       │
//! │ - mod1, mod2 = 2*mod1   (round moduli)       │
//! │ - split                 (next bucket to split)│
//! └──────────────────────────────────────────────┘
//!     table[i] ─▶ overflow ─▶ overflow ...
//! ```
//!
//! For a key with `h1 = hash(k) mod mod1`: chains below the split pointer
//! have already been rehashed this round and are addressed with `mod2`; the
//! rest still answer to `mod1`. When the pointer reaches `mod1` the round
//! wraps and the moduli double.
//!
//! ## Example Usage
//!
//! ```rust
//! use reedindex::linhash::LinHashMap;
//!
//! let mut map = LinHashMap::<u64, u64>::new(11)?;
//! for k in (1..=29).step_by(2) {
//!     map.put(k, k * k)?;
//! }
//!
//! assert_eq!(map.get(&3), Some(9));
//! assert_eq!(map.get(&4), None);
//! # Ok::<(), reedindex::IndexError>(())
//! ```

use crate::error::{IdxResult, IndexError};
use crate::indices::{Index, ProbeCounter, StableHash};
use crate::linhash::bucket::{Bucket, SLOTS};
use serde::Serialize;
use std::fmt::Debug;

/// Structural statistics for a linear hash map.
#[derive(Debug, Clone, Serialize)]
pub struct LinHashStats {
    /// Current round modulus.
    pub mod1: usize,

    /// Next round modulus (`2 * mod1`).
    pub mod2: usize,

    /// Split pointer position (`0 <= split < mod1`).
    pub split: usize,

    /// Home buckets in the table.
    pub home_buckets: usize,

    /// Overflow buckets across all chains.
    pub overflow_buckets: usize,

    /// Nominal capacity: `SLOTS * (mod1 + split)`.
    pub capacity: usize,

    /// Stored entries across all chains.
    pub population: usize,

    /// Buckets inspected by lookups since the last reset.
    pub probes: u64,
}

/// Per-chain layout: the entries of each bucket along one chain.
///
/// Exposed for the CLI exerciser and for invariant checks in tests; the
/// outer vector is ordered home bucket first.
pub type ChainLayout<K, V> = Vec<Vec<(K, V)>>;

/// Linear hash map.
///
/// ## Type Parameters
/// - `K`: Key type (equality plus a stable integer hash)
/// - `V`: Value type (Clone for returning copies)
///
/// ## Thread Safety
/// - Not thread-safe (caller must synchronise)
///
/// ## Duplicate Keys
/// - Not rejected; lookups return the first match in chain scan order
pub struct LinHashMap<K, V>
where
    K: Eq + StableHash + Clone,
    V: Clone,
{
    /// Home buckets; chains hang off each entry.
    table: Vec<Bucket<K, V>>,

    /// Current round modulus.
    mod1: usize,

    /// Next round modulus, always `2 * mod1`.
    mod2: usize,

    /// Index of the next home bucket due to split.
    split: usize,

    /// Suppresses nested splits while a split reinserts drained entries.
    splitting: bool,

    /// Buckets inspected during lookups.
    probes: ProbeCounter,
}

impl<K, V> Debug for LinHashMap<K, V>
where
    K: Eq + StableHash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinHashMap")
            .field("mod1", &self.mod1)
            .field("mod2", &self.mod2)
            .field("split", &self.split)
            .field("home_buckets", &self.table.len())
            .finish()
    }
}

impl<K, V> LinHashMap<K, V>
where
    K: Eq + StableHash + Clone,
    V: Clone,
{
    /// Create a map with `init_size` home buckets.
    ///
    /// ## Input
    /// - `init_size`: Initial home bucket count, used directly as `mod1`
    ///
    /// ## Output
    /// - `Ok(LinHashMap)`: `mod1 = init_size`, `mod2 = 2 * init_size`,
    ///   split pointer at zero
    /// - `Err(IndexError::InvalidInitSize)`: `init_size` was zero
    pub fn new(init_size: usize) -> IdxResult<Self> {
        if init_size == 0 {
            return Err(IndexError::InvalidInitSize { given: init_size });
        }
        Ok(Self {
            table: (0..init_size).map(|_| Bucket::new()).collect(),
            mod1: init_size,
            mod2: 2 * init_size,
            split: 0,
            splitting: false,
            probes: ProbeCounter::new(),
        })
    }

    /// Home chain index for a hash under the current split state.
    ///
    /// Chains below the split pointer have already been rehashed this round
    /// and are addressed with `mod2`; the rest answer to `mod1`.
    fn chain_index(&self, h: u64) -> usize {
        let i = (h % self.mod1 as u64) as usize;
        if i < self.split {
            (h % self.mod2 as u64) as usize
        } else {
            i
        }
    }

    /// Retrieve the value for a key.
    ///
    /// Walks the target chain from the home bucket outward, incrementing
    /// the probe counter once per bucket visited; first match wins.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut current = Some(&self.table[self.chain_index(key.stable_hash())]);
        while let Some(bucket) = current {
            self.probes.record(1);
            if let Some((_, v)) = bucket.entries.iter().find(|(k, _)| k == key) {
                return Some(v.clone());
            }
            current = bucket.next.as_deref();
        }
        None
    }

    /// Insert a key-value pair.
    ///
    /// Appends to the home bucket when it has a free slot; otherwise the
    /// entry goes to the chain tail (growing it by an overflow bucket if
    /// needed) and the bucket at the split pointer is split: its chain is
    /// drained, a fresh home bucket is appended at `mod1 + split`, and the
    /// drained entries reinsert under the advanced split state. When the
    /// pointer reaches `mod1` the round wraps and the moduli double.
    pub fn put(&mut self, key: K, value: V) -> IdxResult<()> {
        let idx = self.chain_index(key.stable_hash());
        let overflowed = self.append_to_chain(idx, key, value);
        if overflowed && !self.splitting {
            self.split_next()?;
        }
        Ok(())
    }

    /// Append an entry to the chain at `idx`.
    ///
    /// Returns whether the home bucket was full (the overflow condition
    /// that triggers a split).
    fn append_to_chain(&mut self, idx: usize, key: K, value: V) -> bool {
        let home = &mut self.table[idx];
        let overflowed = home.is_full();
        home.append(key, value);
        overflowed
    }

    /// Split the bucket at the split pointer.
    ///
    /// Drains the whole chain, replaces it with a fresh home bucket,
    /// appends the image bucket at `mod1 + split`, advances the pointer and
    /// reinserts every drained entry under the new state; rehashing with
    /// `mod2` steers each entry into one of the two chains. Nested splits
    /// are suppressed during the reinsertion, so drained entries may
    /// overflow-chain but cannot cascade.
    fn split_next(&mut self) -> IdxResult<()> {
        let mut drained = Vec::new();
        let mut chain = Some(Box::new(std::mem::take(&mut self.table[self.split])));
        while let Some(mut bucket) = chain {
            drained.append(&mut bucket.entries);
            chain = bucket.next.take();
        }

        self.table.push(Bucket::new());
        self.split += 1;

        self.splitting = true;
        for (k, v) in drained {
            self.put(k, v)?;
        }
        self.splitting = false;

        // Round complete: rotate the moduli.
        if self.split == self.mod1 {
            self.split = 0;
            self.mod1 = self.mod2;
            self.mod2 = 2 * self.mod1;
        }
        Ok(())
    }

    /// All key-value pairs, walking every home bucket and its chain.
    pub fn entries(&self) -> Vec<(K, V)> {
        let mut out = Vec::new();
        for home in &self.table {
            let mut current = Some(home);
            while let Some(bucket) = current {
                out.extend(bucket.entries.iter().cloned());
                current = bucket.next.as_deref();
            }
        }
        out
    }

    /// Nominal capacity: `SLOTS * (mod1 + split)`.
    ///
    /// This is not the population; use `entries().len()` for that.
    pub fn size(&self) -> usize {
        SLOTS * (self.mod1 + self.split)
    }

    /// Bucket-by-bucket layout of the chain at `idx`, home bucket first.
    pub fn chain_layout(&self, idx: usize) -> ChainLayout<K, V> {
        let mut out = Vec::new();
        let mut current = Some(&self.table[idx]);
        while let Some(bucket) = current {
            out.push(bucket.entries.clone());
            current = bucket.next.as_deref();
        }
        out
    }

    /// Number of home buckets currently in the table.
    pub fn home_buckets(&self) -> usize {
        self.table.len()
    }

    /// Current `(mod1, mod2)` moduli.
    pub fn moduli(&self) -> (usize, usize) {
        (self.mod1, self.mod2)
    }

    /// Current split pointer.
    pub fn split_pointer(&self) -> usize {
        self.split
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
    pub fn stats(&self) -> LinHashStats {
        let overflow_buckets = self
            .table
            .iter()
            .map(|home| home.chain_len() - 1)
            .sum();
        LinHashStats {
            mod1: self.mod1,
            mod2: self.mod2,
            split: self.split,
            home_buckets: self.table.len(),
            overflow_buckets,
            capacity: self.size(),
            population: self.entries().len(),
            probes: self.probes(),
        }
    }

    /// Verify the placement invariant for every stored key.
    ///
    /// For a key found at home index `i` with hash `h`:
    /// - `i < split` implies `i == h mod mod2`
    /// - `i >= split` and `i < mod1` implies `i == h mod mod1`
    /// - `i >= mod1` implies `i == h mod mod2` and `i < mod1 + split`
    ///
    /// Also checks bucket capacities and that the table length is
    /// `mod1 + split`.
    ///
    /// ## Output
    /// - `Ok(())`: All invariants hold
    /// - `Err(IndexError::CorruptedIndex)`: first violation found
    pub fn validate(&self) -> IdxResult<()> {
        if self.table.len() != self.mod1 + self.split {
            return Err(IndexError::CorruptedIndex {
                node: self.table.len() as u32,
                reason: "table length is not mod1 + split".to_string(),
            });
        }
        if self.mod2 != 2 * self.mod1 || self.split >= self.mod1 {
            return Err(IndexError::CorruptedIndex {
                node: self.split as u32,
                reason: "moduli out of step with split pointer".to_string(),
            });
        }
        for (i, home) in self.table.iter().enumerate() {
            let corrupted = |reason: &str| IndexError::CorruptedIndex {
                node: i as u32,
                reason: reason.to_string(),
            };
            let mut current = Some(home);
            while let Some(bucket) = current {
                if bucket.entries.len() > SLOTS {
                    return Err(corrupted("bucket over capacity"));
                }
                for (k, _) in &bucket.entries {
                    let h = k.stable_hash();
                    let h1 = (h % self.mod1 as u64) as usize;
                    let h2 = (h % self.mod2 as u64) as usize;
                    let placed = if i < self.split {
                        i == h2
                    } else if i < self.mod1 {
                        i == h1
                    } else {
                        i == h2 && i < self.mod1 + self.split
                    };
                    if !placed {
                        return Err(corrupted("key stored in wrong chain"));
                    }
                }
                current = bucket.next.as_deref();
            }
        }
        Ok(())
    }
}

impl<K, V> Index<K, V> for LinHashMap<K, V>
where
    K: Eq + StableHash + Clone + Debug,
    V: Clone + Debug,
{
    fn get(&self, key: &K) -> Option<V> {
        LinHashMap::get(self, key)
    }

    fn put(&mut self, key: K, value: V) -> IdxResult<()> {
        LinHashMap::put(self, key, value)
    }

    fn entries(&self) -> Vec<(K, V)> {
        LinHashMap::entries(self)
    }

    fn size(&self) -> usize {
        LinHashMap::size(self)
    }

    fn probes(&self) -> u64 {
        LinHashMap::probes(self)
    }

    fn reset_probes(&self) {
        LinHashMap::reset_probes(self)
    }

    fn backend_type(&self) -> &'static str {
        "linhash"
    }

    fn memory_usage(&self) -> usize {
        let chain_buckets: usize = self.table.iter().map(|home| home.chain_len()).sum();
        std::mem::size_of::<Self>()
            + chain_buckets
                * (std::mem::size_of::<Bucket<K, V>>() + SLOTS * std::mem::size_of::<(K, V)>())
    }
}
