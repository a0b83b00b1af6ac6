// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Bucket structure for the linear hash map.

/// Fixed bucket capacity in key-value slots.
pub const SLOTS: usize = 4;

/// Fixed-capacity bucket with an owned overflow chain.
///
/// Home buckets live in the map's table; overflow buckets hang off their
/// predecessor's `next` reference. Lookups visit a chain in insertion order
/// from the home bucket outward.
#[derive(Debug, Clone)]
pub struct Bucket<K, V> {
    /// Stored key-value pairs, at most `SLOTS`.
    pub entries: Vec<(K, V)>,

    /// Next overflow bucket in the chain, if any.
    pub next: Option<Box<Bucket<K, V>>>,
}

impl<K, V> Bucket<K, V> {
    /// Create an empty bucket with no overflow.
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(SLOTS),
            next: None,
        }
    }

    /// Whether all slots are occupied.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= SLOTS
    }

    /// Buckets in this chain, including this one.
    pub fn chain_len(&self) -> usize {
        let mut len = 1;
        let mut current = self.next.as_deref();
        while let Some(bucket) = current {
            len += 1;
            current = bucket.next.as_deref();
        }
        len
    }

    /// Append an entry into the first free slot along the chain.
    ///
    /// Walks outward from this bucket; when every bucket is full, a fresh
    /// overflow bucket holding the entry is linked as the new tail.
    pub fn append(&mut self, key: K, value: V) {
        if !self.is_full() {
            self.entries.push((key, value));
        } else if let Some(next) = self.next.as_deref_mut() {
            next.append(key, value);
        } else {
            let mut tail = Bucket::new();
            tail.entries.push((key, value));
            self.next = Some(Box::new(tail));
        }
    }
}

impl<K, V> Default for Bucket<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
