// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! B+-Tree exerciser command.

use crate::formatters;
use anyhow::{Context, Result};
use reedindex::BPlusTreeMap;
use serde_json::json;

/// Insert keys `1..=count` with square values, then report tree state and
/// probe counts for the insert and lookup phases.
pub fn execute(count: u64, format: &str) -> Result<()> {
    let mut tree = BPlusTreeMap::<u64, u64>::new();

    for k in 1..=count {
        tree.put(k, k * k)
            .with_context(|| format!("insert of key {} failed", k))?;
    }
    let insert_probes = tree.probes();

    tree.reset_probes();
    for k in 1..=count {
        tree.get(&k);
    }
    let lookup_probes = tree.probes();

    let stats = tree.stats();
    let window = (count / 3).max(1);
    let sample = tree.sub_map(&window, &(2 * window));

    match format {
        "json" => {
            let report = json!({
                "stats": stats,
                "first_key": tree.first_key(),
                "last_key": tree.last_key(),
                "insert_probes": insert_probes,
                "lookup_probes": lookup_probes,
                "sub_map_sample": { "lo": window, "hi": 2 * window, "entries": sample },
            });
            println!("{}", formatters::format_json(&report)?);
        }
        _ => {
            let rows = vec![
                ("Order", stats.order.to_string()),
                ("Keys inserted", stats.key_count.to_string()),
                ("Depth", stats.depth.to_string()),
                ("Nodes", stats.node_count.to_string()),
                ("Leaves", stats.leaf_count.to_string()),
                ("First key", format_key(tree.first_key())),
                ("Last key", format_key(tree.last_key())),
                ("Insert probes", insert_probes.to_string()),
                (
                    "Lookup probes",
                    format!("{} ({} lookups)", lookup_probes, count),
                ),
                (
                    "Sample range",
                    format!("sub_map({}, {}) = {:?}", window, 2 * window, sample),
                ),
            ];
            print!("{}", formatters::format_table("B+-Tree", &rows));
        }
    }

    Ok(())
}

fn format_key(key: Option<u64>) -> String {
    match key {
        Some(k) => k.to_string(),
        None => "-".to_string(),
    }
}
