// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Extendible hashing exerciser command.

use crate::formatters;
use anyhow::{Context, Result};
use reedindex::ExtHashMap;
use serde_json::json;

/// Insert `count` odd keys with square values, then report directory and
/// bucket state and probe counts for the insert and lookup phases.
pub fn execute(count: u64, init_size: usize, format: &str) -> Result<()> {
    let mut map = ExtHashMap::<u64, u64>::new(init_size)
        .context("failed to create extendible hash map")?;

    for k in odd_keys(count) {
        map.put(k, k * k)
            .with_context(|| format!("insert of key {} failed", k))?;
    }
    let insert_probes = map.probes();

    map.reset_probes();
    for k in odd_keys(count) {
        map.get(&k);
    }
    let lookup_probes = map.probes();

    let stats = map.stats();

    match format {
        "json" => {
            let report = json!({
                "stats": stats,
                "insert_probes": insert_probes,
                "lookup_probes": lookup_probes,
            });
            println!("{}", formatters::format_json(&report)?);
        }
        _ => {
            let rows = vec![
                ("Keys inserted", stats.population.to_string()),
                ("Directory size", stats.directory_size.to_string()),
                ("Global depth", stats.global_depth.to_string()),
                ("Buckets", stats.bucket_count.to_string()),
                ("Capacity", stats.capacity.to_string()),
                ("Insert probes", insert_probes.to_string()),
                (
                    "Lookup probes",
                    format!("{} ({} lookups)", lookup_probes, count),
                ),
            ];
            print!("{}", formatters::format_table("Extendible hashing", &rows));
        }
    }

    Ok(())
}

/// The first `count` odd keys: 1, 3, 5, ...
fn odd_keys(count: u64) -> impl Iterator<Item = u64> {
    (0..count).map(|i| 2 * i + 1)
}
