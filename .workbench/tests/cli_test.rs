// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! CLI integration tests.
//!
//! Tests the `reedindex` command-line tool end to end. Uses assert_cmd for
//! running the binary and predicates for output assertions.

use assert_cmd::Command;
use predicates::prelude::*;

// ============================================================================
// B+-Tree Command
// ============================================================================

#[test]
fn test_cli_btree_default() {
    Command::cargo_bin("reedindex")
        .unwrap()
        .arg("btree")
        .assert()
        .success()
        .stdout(predicate::str::contains("B+-Tree"))
        .stdout(predicate::str::contains("Keys inserted"))
        .stdout(predicate::str::contains("Insert probes"));
}

#[test]
fn test_cli_btree_with_count() {
    Command::cargo_bin("reedindex")
        .unwrap()
        .args(["btree", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("100"))
        .stdout(predicate::str::contains("Last key"));
}

#[test]
fn test_cli_btree_json_format() {
    Command::cargo_bin("reedindex")
        .unwrap()
        .args(["btree", "9", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"key_count\": 9"))
        .stdout(predicate::str::contains("\"first_key\": 1"))
        .stdout(predicate::str::contains("\"last_key\": 9"));
}

// ============================================================================
// Extendible Hashing Command
// ============================================================================

#[test]
fn test_cli_exthash_default() {
    Command::cargo_bin("reedindex")
        .unwrap()
        .arg("exthash")
        .assert()
        .success()
        .stdout(predicate::str::contains("Extendible hashing"))
        .stdout(predicate::str::contains("Directory size"))
        .stdout(predicate::str::contains("Lookup probes"));
}

#[test]
fn test_cli_exthash_json_format() {
    Command::cargo_bin("reedindex")
        .unwrap()
        .args(["exthash", "50", "--init-size", "11", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"population\": 50"))
        .stdout(predicate::str::contains("\"directory_size\": 32"));
}

// ============================================================================
// Linear Hashing Command
// ============================================================================

#[test]
fn test_cli_linhash_default() {
    Command::cargo_bin("reedindex")
        .unwrap()
        .arg("linhash")
        .assert()
        .success()
        .stdout(predicate::str::contains("Linear hashing"))
        .stdout(predicate::str::contains("Split pointer"))
        .stdout(predicate::str::contains("Chains"));
}

#[test]
fn test_cli_linhash_json_format() {
    Command::cargo_bin("reedindex")
        .unwrap()
        .args(["linhash", "15", "--init-size", "11", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"population\": 15"))
        .stdout(predicate::str::contains("\"mod1\": 11"))
        .stdout(predicate::str::contains("\"chains\""));
}

// ============================================================================
// Error Surface
// ============================================================================

#[test]
fn test_cli_unknown_subcommand_fails() {
    Command::cargo_bin("reedindex")
        .unwrap()
        .arg("bogus")
        .assert()
        .failure();
}

#[test]
fn test_cli_help() {
    Command::cargo_bin("reedindex")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("btree"))
        .stdout(predicate::str::contains("exthash"))
        .stdout(predicate::str::contains("linhash"));
}
