// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! ReedIndex CLI Tool
//!
//! Command-line exercisers for the index structures. Each subcommand builds
//! one structure, loads it with a deterministic key set, and prints the
//! resulting state and per-operation probe counts.

use clap::{Parser, Subcommand};

mod commands;
mod formatters;

use commands::{btree, exthash, linhash};

#[derive(Parser)]
#[command(name = "reedindex")]
#[command(author = "Vivian Voss <ask@vvoss.dev>")]
#[command(version = "0.1.0")]
#[command(about = "ReedIndex CLI - exercise the index structures", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exercise the B+-Tree map (keys 1..=N, values k^2)
    Btree {
        /// Number of keys to insert
        count: Option<u64>,

        /// Output format: table|json
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Exercise the extendible hash map (odd keys, values k^2)
    Exthash {
        /// Number of keys to insert
        count: Option<u64>,

        /// Initial directory size (rounded up to a power of two)
        #[arg(long, default_value_t = 11)]
        init_size: usize,

        /// Output format: table|json
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Exercise the linear hash map (odd keys, values k^2)
    Linhash {
        /// Number of keys to insert
        count: Option<u64>,

        /// Initial home bucket count (used directly as mod1)
        #[arg(long, default_value_t = 11)]
        init_size: usize,

        /// Output format: table|json
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Btree { count, format } => btree::execute(count.unwrap_or(9), &format),
        Commands::Exthash {
            count,
            init_size,
            format,
        } => exthash::execute(count.unwrap_or(50), init_size, &format),
        Commands::Linhash {
            count,
            init_size,
            format,
        } => linhash::execute(count.unwrap_or(15), init_size, &format),
    };

    if let Err(err) = result {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
