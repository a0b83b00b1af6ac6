// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Output formatters for the exerciser reports.

use anyhow::Result;
use serde::Serialize;

/// Formats a report as aligned `label: value` lines under a title.
pub fn format_table(title: &str, rows: &[(&str, String)]) -> String {
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    let mut output = String::new();
    output.push_str(title);
    output.push('\n');
    for (label, value) in rows {
        output.push_str(&format!("  {:<width$}  {}\n", format!("{}:", label), value, width = width + 1));
    }
    output
}

/// Formats any serialisable report as pretty-printed JSON.
pub fn format_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
