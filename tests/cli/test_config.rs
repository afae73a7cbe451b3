//! Tests for configuration layering (defaults, file, env, flags)

use clap::Parser;
use invidx::cli::Cli;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn clear_env() {
    env::remove_var("INVIDX_CHUNK_SIZE");
    env::remove_var("INVIDX_WORKERS");
    env::remove_var("INVIDX_OUTPUT");
    env::remove_var("INVIDX_CONFIG");
}

#[test]
#[serial]
fn test_defaults_without_file_or_env() {
    clear_env();
    let cli = Cli::try_parse_from(["invidx", "a.txt"]).unwrap();

    let config = cli.resolve_config().unwrap();

    assert_eq!(config.indexing.chunk_size, 4 * 1024 * 1024);
    assert_eq!(config.output.path, PathBuf::from("indice_final.txt"));
}

#[test]
#[serial]
fn test_flags_override_file_and_env() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("invidx.toml");
    fs::write(
        &file,
        "[indexing]\nchunk_size = 100\nworkers = 7\n\n[output]\npath = \"from-file.txt\"\n",
    )
    .unwrap();
    env::set_var("INVIDX_WORKERS", "5");

    let cli = Cli::try_parse_from([
        "invidx",
        "--config",
        file.to_str().unwrap(),
        "--chunk-size",
        "300",
        "a.txt",
    ])
    .unwrap();
    let config = cli.resolve_config().unwrap();

    assert_eq!(config.indexing.chunk_size, 300);
    assert_eq!(config.indexing.workers, 5);
    assert_eq!(config.output.path, PathBuf::from("from-file.txt"));

    clear_env();
}

#[test]
#[serial]
fn test_zero_workers_flag_rejected() {
    clear_env();
    let cli = Cli::try_parse_from(["invidx", "-j", "0", "a.txt"]).unwrap();
    assert!(cli.resolve_config().is_err());
}

#[test]
#[serial]
fn test_invalid_toml_rejected() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("bad.toml");
    fs::write(&file, "[indexing\nchunk_size = ").unwrap();

    let cli = Cli::try_parse_from(["invidx", "--config", file.to_str().unwrap(), "a.txt"]).unwrap();
    assert!(cli.resolve_config().is_err());
}
