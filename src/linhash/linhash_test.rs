// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Tests for the linear hash map.
//!
//! Covers chain addressing under the split pointer, overflow chaining,
//! incremental splits, round wrap, nominal size semantics and per-chain
//! layout.

#[cfg(test)]
mod tests {
    use crate::error::{IdxResult, IndexError};
    use crate::indices::Index;
    use crate::linhash::{LinHashMap, SLOTS};

    #[test]
    fn test_new_uses_init_size_directly() -> IdxResult<()> {
        let map = LinHashMap::<u64, u64>::new(11)?;
        assert_eq!(map.moduli(), (11, 22));
        assert_eq!(map.split_pointer(), 0);
        assert_eq!(map.home_buckets(), 11);
        assert_eq!(map.size(), 11 * SLOTS);
        Ok(())
    }

    #[test]
    fn test_zero_init_size_rejected() {
        let err = LinHashMap::<u64, u64>::new(0);
        assert!(matches!(err, Err(IndexError::InvalidInitSize { given: 0 })));
    }

    #[test]
    fn test_odd_squares_scenario() -> IdxResult<()> {
        // Fifteen odd keys over eleven chains never overflow a bucket.
        let mut map = LinHashMap::<u64, u64>::new(11)?;
        for k in (1..=29u64).step_by(2) {
            map.put(k, k * k)?;
            map.validate()?;
        }

        assert_eq!(map.get(&1), Some(1));
        assert_eq!(map.get(&3), Some(9));
        assert_eq!(map.get(&4), None);
        assert_eq!(map.split_pointer(), 0);
        assert_eq!(map.size(), 11 * SLOTS);
        Ok(())
    }

    #[test]
    fn test_overflow_triggers_split() -> IdxResult<()> {
        let mut map = LinHashMap::<u64, u64>::new(2)?;
        // Even keys all land in chain 0 and fill its home bucket.
        for k in [0u64, 2, 4, 6] {
            map.put(k, k)?;
        }
        assert_eq!(map.split_pointer(), 0);

        // The overflowing insert splits chain 0: entries rehash with mod2
        // into chains 0 and 2, and the pointer advances.
        map.put(8, 8)?;
        map.validate()?;
        assert_eq!(map.split_pointer(), 1);
        assert_eq!(map.home_buckets(), 3);
        assert_eq!(map.size(), 3 * SLOTS);

        assert_eq!(map.chain_layout(0), vec![vec![(0, 0), (4, 4), (8, 8)]]);
        assert_eq!(map.chain_layout(2), vec![vec![(2, 2), (6, 6)]]);
        for k in [0u64, 2, 4, 6, 8] {
            assert_eq!(map.get(&k), Some(k));
        }
        Ok(())
    }

    #[test]
    fn test_round_wrap_rotates_moduli() -> IdxResult<()> {
        let mut map = LinHashMap::<u64, u64>::new(2)?;
        for k in [0u64, 2, 4, 6, 8] {
            map.put(k, k)?;
        }
        assert_eq!(map.split_pointer(), 1);

        // Fill chain 1; its overflow completes the round.
        for k in [1u64, 3, 5, 7, 9] {
            map.put(k, k)?;
            map.validate()?;
        }
        assert_eq!(map.split_pointer(), 0);
        assert_eq!(map.moduli(), (4, 8));
        assert_eq!(map.home_buckets(), 4);

        for k in 0..=9u64 {
            assert_eq!(map.get(&k), Some(k));
        }
        Ok(())
    }

    #[test]
    fn test_nested_split_suppressed_leaves_overflow_chain() -> IdxResult<()> {
        let mut map = LinHashMap::<u64, u64>::new(2)?;
        // All keys congruent mod 4: rehashing cannot spread them, so the
        // drained chain rebuilds with a persistent overflow bucket.
        for k in [0u64, 4, 8, 12, 16] {
            map.put(k, k * 10)?;
            map.validate()?;
        }

        assert_eq!(map.split_pointer(), 1);
        assert_eq!(
            map.chain_layout(0),
            vec![
                vec![(0, 0), (4, 40), (8, 80), (12, 120)],
                vec![(16, 160)],
            ]
        );
        assert_eq!(map.stats().overflow_buckets, 1);
        assert_eq!(map.get(&16), Some(160));
        Ok(())
    }

    #[test]
    fn test_probe_count_per_bucket_visited() -> IdxResult<()> {
        let mut map = LinHashMap::<u64, u64>::new(2)?;
        for k in [0u64, 4, 8, 12, 16] {
            map.put(k, k * 10)?;
        }

        map.reset_probes();
        map.get(&0); // first bucket of the chain
        assert_eq!(map.probes(), 1);
        map.get(&16); // home bucket miss, overflow bucket hit
        assert_eq!(map.probes(), 3);
        map.get(&99); // empty chain, one bucket inspected
        assert_eq!(map.probes(), 4);
        Ok(())
    }

    #[test]
    fn test_duplicate_put_first_match_wins() -> IdxResult<()> {
        let mut map = LinHashMap::<u64, u64>::new(4)?;
        map.put(1, 10)?;
        map.put(1, 11)?;

        assert_eq!(map.get(&1), Some(10));
        assert_eq!(map.entries().len(), 2);
        Ok(())
    }

    #[test]
    fn test_entries_walk_all_chains() -> IdxResult<()> {
        let mut map = LinHashMap::<u64, u64>::new(3)?;
        for k in 0..=25u64 {
            map.put(k, k + 1000)?;
            map.validate()?;
        }

        let mut entries = map.entries();
        entries.sort_unstable();
        let expected: Vec<(u64, u64)> = (0..=25).map(|k| (k, k + 1000)).collect();
        assert_eq!(entries, expected);

        for k in 0..=25u64 {
            assert_eq!(map.get(&k), Some(k + 1000));
        }
        Ok(())
    }

    #[test]
    fn test_size_is_nominal_capacity() -> IdxResult<()> {
        let mut map = LinHashMap::<u64, u64>::new(2)?;
        assert_eq!(map.size(), 2 * SLOTS);

        // Population never changes nominal size; split progress does.
        map.put(1, 1)?;
        assert_eq!(map.size(), 2 * SLOTS);
        for k in [0u64, 2, 4, 6, 8] {
            map.put(k, k)?;
        }
        let stats = map.stats();
        assert_eq!(map.size(), SLOTS * (stats.mod1 + stats.split));
        assert_eq!(stats.population, 6);
        Ok(())
    }

    #[test]
    fn test_many_keys_stress() -> IdxResult<()> {
        let mut map = LinHashMap::<u64, u64>::new(5)?;
        for k in 0..500u64 {
            map.put(k, k * 3)?;
            map.validate()?;
        }

        for k in 0..500u64 {
            assert_eq!(map.get(&k), Some(k * 3));
        }
        assert_eq!(map.get(&500), None);
        assert_eq!(map.entries().len(), 500);
        Ok(())
    }

    #[test]
    fn test_index_trait_surface() -> IdxResult<()> {
        let mut map = LinHashMap::<u64, u64>::new(4)?;
        let index: &mut dyn Index<u64, u64> = &mut map;

        index.put(1, 100)?;
        assert_eq!(index.get(&1), Some(100));
        assert_eq!(index.backend_type(), "linhash");
        assert!(index.memory_usage() > 0);
        Ok(())
    }
}
