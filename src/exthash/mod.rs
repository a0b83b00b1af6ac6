// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Extendible hashing index engine.
//!
//! Unordered map with a doubling directory over a flat bucket store. Point
//! lookups cost a single bucket probe; growth is paid bucket by bucket as
//! lineages split on overflow.
//!
//! ## Features
//!
//! - **Directory-guided lookup**: `dir[hash(k) mod 2^D]` names the unique
//!   bucket that can hold a key
//! - **Aliasing**: shallow buckets are shared by several directory slots
//!   until their lineage splits
//! - **Split-on-overflow**: only the full bucket reorganises; the directory
//!   doubles only when that bucket is already at full depth
//! - **Probe counting**: lookups report how many buckets they inspected

mod bucket;
mod map;

#[cfg(test)]
mod exthash_test;

// Re-export public API
pub use bucket::{Bucket, BucketId, SLOTS};
pub use map::{ExtHashMap, ExtHashStats};
