// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Subcommand implementations for the ReedIndex CLI.

pub mod btree;
pub mod exthash;
pub mod linhash;
