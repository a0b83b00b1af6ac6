// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Common contract shared by all index backends.
//!
//! Every index structure in this crate implements the same map surface so an
//! engine can switch between ordered and hashed access paths without changing
//! call sites:
//!
//! - **Index trait**: point lookup, insertion, entry enumeration, size
//! - **StableHash**: process-independent integer hashing for the hash maps
//! - **ProbeCounter**: per-map count of nodes/buckets inspected during lookup
//!
//! ## Backends
//!
//! - `BPlusTreeMap<K, V>`: ordered map, range queries via the leaf chain
//! - `ExtHashMap<K, V>`: directory-guided extendible hashing
//! - `LinHashMap<K, V>`: directory-free linear hashing with overflow chains

pub mod hash;
pub mod index_trait;
pub mod probe;

#[cfg(test)]
mod hash_test;

// Re-export public API
pub use hash::StableHash;
pub use index_trait::Index;
pub use probe::ProbeCounter;
