//! Tests for command dispatch

use std::fs;

use clap::Parser;
use tempfile::TempDir;

use treeplot::cli::{execute, Cli, CliError};
use treeplot::exitcode;

const DATASET: &str = "tests/resources/datasets/blank_nodes.toml";

#[test]
fn given_render_command_when_executed_then_writes_svg_per_diagram() {
    // Arrange
    let project = TempDir::new().unwrap();
    let out = project.path().join("out");
    let cli = Cli::parse_from([
        "treeplot",
        "-C",
        project.path().to_str().unwrap(),
        "render",
        DATASET,
        "--out-dir",
        out.to_str().unwrap(),
    ]);

    // Act
    execute(&cli).unwrap();

    // Assert
    assert!(out.join("tree_diagram_blank_left.svg").exists());
    assert!(out.join("tree_diagram_blank_inner.svg").exists());
}

#[test]
fn given_only_flag_when_rendering_then_writes_single_file() {
    let project = TempDir::new().unwrap();
    let out = project.path().join("out");
    let cli = Cli::parse_from([
        "treeplot",
        "-C",
        project.path().to_str().unwrap(),
        "render",
        DATASET,
        "--only",
        "blank_inner",
        "-o",
        out.to_str().unwrap(),
    ]);

    execute(&cli).unwrap();

    let written: Vec<_> = fs::read_dir(&out).unwrap().collect();
    assert_eq!(written.len(), 1);
}

#[test]
fn given_unknown_diagram_when_executed_then_usage_exit_code() {
    let project = TempDir::new().unwrap();
    let cli = Cli::parse_from([
        "treeplot",
        "-C",
        project.path().to_str().unwrap(),
        "levels",
        DATASET,
        "--only",
        "missing",
    ]);

    let err = execute(&cli).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::USAGE);
}

#[test]
fn given_malformed_dataset_when_executed_then_data_exit_code() {
    let project = TempDir::new().unwrap();
    let cli = Cli::parse_from([
        "treeplot",
        "-C",
        project.path().to_str().unwrap(),
        "tree",
        "tests/resources/datasets/malformed.toml",
    ]);

    let err = execute(&cli).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::DATAERR);
}

#[test]
fn given_no_command_when_executed_then_usage_error() {
    let cli = Cli::parse_from(["treeplot"]);

    let err = execute(&cli).unwrap_err();

    assert!(matches!(err, CliError::Usage(_)));
}

#[test]
fn given_config_init_when_executed_twice_then_second_fails() {
    let project = TempDir::new().unwrap();
    let args = [
        "treeplot",
        "-C",
        project.path().to_str().unwrap(),
        "config",
        "init",
    ];

    execute(&Cli::parse_from(args)).unwrap();
    let err = execute(&Cli::parse_from(args)).unwrap_err();

    assert!(project.path().join(".treeplot.toml").exists());
    assert_eq!(err.exit_code(), exitcode::USAGE);
}

#[test]
fn given_layout_command_when_executed_then_succeeds() {
    let project = TempDir::new().unwrap();
    let cli = Cli::parse_from([
        "treeplot",
        "-C",
        project.path().to_str().unwrap(),
        "layout",
        "tests/resources/datasets/branch_and_bound.toml",
        "--keep-blank",
    ]);

    assert!(execute(&cli).is_ok());
}
