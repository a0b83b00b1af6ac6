// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Linear hashing exerciser command.

use crate::formatters;
use anyhow::{Context, Result};
use reedindex::LinHashMap;
use serde_json::json;

/// Insert `count` odd keys with square values, then report per-chain layout
/// and probe counts for the insert and lookup phases.
pub fn execute(count: u64, init_size: usize, format: &str) -> Result<()> {
    let mut map =
        LinHashMap::<u64, u64>::new(init_size).context("failed to create linear hash map")?;

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
    let layouts: Vec<Vec<Vec<u64>>> = (0..map.home_buckets())
        .map(|i| {
            map.chain_layout(i)
                .into_iter()
                .map(|bucket| bucket.into_iter().map(|(k, _)| k).collect())
                .collect()
        })
        .collect();

    match format {
        "json" => {
            let report = json!({
                "stats": stats,
                "chains": layouts,
                "insert_probes": insert_probes,
                "lookup_probes": lookup_probes,
            });
            println!("{}", formatters::format_json(&report)?);
        }
        _ => {
            let (mod1, mod2) = map.moduli();
            let mut rows = vec![
                ("Keys inserted", stats.population.to_string()),
                ("Moduli", format!("mod1 = {}, mod2 = {}", mod1, mod2)),
                ("Split pointer", stats.split.to_string()),
                ("Home buckets", stats.home_buckets.to_string()),
                ("Overflow buckets", stats.overflow_buckets.to_string()),
                ("Capacity", stats.capacity.to_string()),
                ("Insert probes", insert_probes.to_string()),
                (
                    "Lookup probes",
                    format!("{} ({} lookups)", lookup_probes, count),
                ),
            ];
            let chains = layouts
                .iter()
                .enumerate()
                .map(|(i, chain)| format!("{}: {}", i, format_chain(chain)))
                .collect::<Vec<_>>()
                .join("; ");
            rows.push(("Chains", chains));
            print!("{}", formatters::format_table("Linear hashing", &rows));
        }
    }

    Ok(())
}

/// Render one chain as `[keys] -> [keys] -> ...`.
fn format_chain(chain: &[Vec<u64>]) -> String {
    chain
        .iter()
        .map(|bucket| format!("{:?}", bucket))
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// The first `count` odd keys: 1, 3, 5, ...
fn odd_keys(count: u64) -> impl Iterator<Item = u64> {
    (0..count).map(|i| 2 * i + 1)
}
