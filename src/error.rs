// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Error types for ReedIndex operations.
//!
//! Provides structured error handling with detailed context for debugging.

use std::fmt;

/// Standard Result type for all ReedIndex operations.
pub type IdxResult<T> = Result<T, IndexError>;

/// Error types for ReedIndex operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// Key already present in an index that rejects duplicates.
    DuplicateKey { key: String },

    /// Repeated splits could not separate keys colliding on one hash prefix.
    CapacityOverflow { bucket: usize, slots: usize },

    /// Hash map constructed with a zero initial size.
    InvalidInitSize { given: usize },

    /// Structural invariant violated in an index node or bucket.
    CorruptedIndex { node: u32, reason: String },
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey { key } => {
                write!(f, "Duplicate key {} rejected", key)
            }
            Self::CapacityOverflow { bucket, slots } => {
                write!(
                    f,
                    "Bucket {} cannot be split further ({} slots exhausted by colliding keys)",
                    bucket, slots
                )
            }
            Self::InvalidInitSize { given } => {
                write!(f, "Initial size must be at least 1, got {}", given)
            }
            Self::CorruptedIndex { node, reason } => {
                write!(f, "Corrupted index node {}: {}", node, reason)
            }
        }
    }
}

impl std::error::Error for IndexError {}
