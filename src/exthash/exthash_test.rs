// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Tests for the extendible hash map.
//!
//! Covers directory rounding, lookups, splits with and without directory
//! doubling, alias rewiring, nominal size semantics and the capacity
//! overflow guard.

#[cfg(test)]
mod tests {
    use crate::error::{IdxResult, IndexError};
    use crate::exthash::{ExtHashMap, SLOTS};
    use crate::indices::{Index, StableHash};

    #[test]
    fn test_new_rounds_to_power_of_two() -> IdxResult<()> {
        let map = ExtHashMap::<u64, u64>::new(11)?;
        let stats = map.stats();
        assert_eq!(stats.directory_size, 16);
        assert_eq!(stats.global_depth, 4);
        assert_eq!(stats.bucket_count, 16);
        assert_eq!(map.size(), 16 * SLOTS);

        let exact = ExtHashMap::<u64, u64>::new(8)?;
        assert_eq!(exact.stats().directory_size, 8);
        Ok(())
    }

    #[test]
    fn test_zero_init_size_rejected() {
        let err = ExtHashMap::<u64, u64>::new(0);
        assert!(matches!(err, Err(IndexError::InvalidInitSize { given: 0 })));
    }

    #[test]
    fn test_put_get_without_split() -> IdxResult<()> {
        let mut map = ExtHashMap::<u64, u64>::new(4)?;
        map.put(1, 10)?;
        map.put(2, 20)?;
        map.put(3, 30)?;

        assert_eq!(map.get(&1), Some(10));
        assert_eq!(map.get(&2), Some(20));
        assert_eq!(map.get(&3), Some(30));
        assert_eq!(map.get(&4), None);
        map.validate()
    }

    #[test]
    fn test_split_doubles_directory_at_full_depth() -> IdxResult<()> {
        // One bucket, depth 0: the very first overflow must double.
        let mut map = ExtHashMap::<u64, u64>::new(1)?;
        for k in 0..SLOTS as u64 {
            map.put(k, k)?;
        }
        assert_eq!(map.stats().directory_size, 1);

        map.put(4, 4)?;
        assert!(map.stats().directory_size >= 2);
        map.validate()?;
        for k in 0..=4u64 {
            assert_eq!(map.get(&k), Some(k));
        }
        Ok(())
    }

    #[test]
    fn test_split_without_doubling_keeps_directory() -> IdxResult<()> {
        let mut map = ExtHashMap::<u64, u64>::new(2)?;
        // Fill the even bucket; its split doubles the directory to 4.
        for k in [0u64, 2, 4, 6, 8] {
            map.put(k, k)?;
        }
        let after_first = map.stats().directory_size;
        assert_eq!(after_first, 4);
        map.validate()?;

        // The odd bucket still has local depth 1; its split must rewire
        // both aliased slots without doubling again.
        for k in [1u64, 3, 5, 7, 9] {
            map.put(k, k)?;
        }
        assert_eq!(map.stats().directory_size, 4);
        map.validate()?;
        for k in 0..=9u64 {
            assert_eq!(map.get(&k), Some(k));
        }
        Ok(())
    }

    #[test]
    fn test_odd_squares_scenario() -> IdxResult<()> {
        // initSize 11 rounds to 16; fifty odd keys with square values.
        let mut map = ExtHashMap::<u64, u64>::new(11)?;
        for k in (1..=99u64).step_by(2) {
            map.put(k, k * k)?;
            map.validate()?;
        }

        for k in (1..=99u64).step_by(2) {
            assert_eq!(map.get(&k), Some(k * k));
        }
        assert_eq!(map.get(&2), None);

        // Odd keys overflow their residue-16 buckets, forcing one doubling.
        let stats = map.stats();
        assert_eq!(stats.directory_size, 32);
        assert_eq!(stats.population, 50);
        assert!(stats.bucket_count > 16);
        Ok(())
    }

    #[test]
    fn test_entries_cover_every_bucket_once() -> IdxResult<()> {
        let mut map = ExtHashMap::<u64, u64>::new(2)?;
        for k in 0..=20u64 {
            map.put(k, k + 100)?;
        }

        let mut entries = map.entries();
        entries.sort_unstable();
        let expected: Vec<(u64, u64)> = (0..=20).map(|k| (k, k + 100)).collect();
        assert_eq!(entries, expected);
        Ok(())
    }

    #[test]
    fn test_size_is_nominal_capacity() -> IdxResult<()> {
        let mut map = ExtHashMap::<u64, u64>::new(4)?;
        assert_eq!(map.size(), 4 * SLOTS);

        // Population does not change nominal size; splits do.
        map.put(1, 1)?;
        assert_eq!(map.size(), 4 * SLOTS);
        for k in [5u64, 9, 13, 17] {
            map.put(k, k)?;
        }
        assert_eq!(map.size(), SLOTS * map.stats().bucket_count);
        assert!(map.stats().bucket_count > 4);
        Ok(())
    }

    #[test]
    fn test_duplicate_put_is_not_rejected() -> IdxResult<()> {
        let mut map = ExtHashMap::<u64, u64>::new(4)?;
        map.put(1, 10)?;
        map.put(1, 11)?;

        // First slot scanned wins; both copies are stored.
        assert_eq!(map.get(&1), Some(10));
        assert_eq!(map.entries().len(), 2);
        Ok(())
    }

    #[test]
    fn test_probe_count_one_bucket_per_get() -> IdxResult<()> {
        let mut map = ExtHashMap::<u64, u64>::new(4)?;
        map.put(1, 1)?;

        map.reset_probes();
        map.get(&1);
        map.get(&2);
        map.get(&3);
        assert_eq!(map.probes(), 3);
        Ok(())
    }

    #[test]
    fn test_capacity_overflow_on_identical_hashes() {
        // A key whose hash is constant cannot be separated by any split.
        #[derive(Debug, Clone, PartialEq, Eq)]
        struct Collider(u32);

        impl StableHash for Collider {
            fn stable_hash(&self) -> u64 {
                7
            }
        }

        let mut map = ExtHashMap::<Collider, u64>::new(2).unwrap();
        for i in 0..SLOTS as u32 {
            map.put(Collider(i), u64::from(i)).unwrap();
        }

        let err = map.put(Collider(99), 99);
        assert!(matches!(err, Err(IndexError::CapacityOverflow { .. })));
    }

    #[test]
    fn test_string_keys() -> IdxResult<()> {
        let mut map = ExtHashMap::<String, usize>::new(4)?;
        for (i, word) in ["page", "post", "api", "nav", "footer", "header"]
            .iter()
            .enumerate()
        {
            map.put(word.to_string(), i)?;
        }
        map.validate()?;

        assert_eq!(map.get(&"api".to_string()), Some(2));
        assert_eq!(map.get(&"missing".to_string()), None);
        Ok(())
    }

    #[test]
    fn test_index_trait_surface() -> IdxResult<()> {
        let mut map = ExtHashMap::<u64, u64>::new(4)?;
        let index: &mut dyn Index<u64, u64> = &mut map;

        index.put(1, 100)?;
        assert_eq!(index.get(&1), Some(100));
        assert_eq!(index.backend_type(), "exthash");
        assert!(index.memory_usage() > 0);
        Ok(())
    }
}
