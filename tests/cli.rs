// tests/cli.rs

use clap::Parser;
use dagsynth::cli::{CliArgs, LogLevel};
use dagsynth::logging::filter_directive;
use dagsynth::run;
use dagsynth_test_utils::builders::{GNP_TOML, write_config};
use tempfile::tempdir;

#[test]
fn defaults() {
    let args = CliArgs::try_parse_from(["dagsynth"]).unwrap();
    assert_eq!(args.config, "Dagsynth.toml");
    assert_eq!(args.dest_dir, ".");
    assert_eq!(args.seed, None);
    assert!(args.log_level.is_none());
    assert!(!args.dry_run);
}

#[test]
fn overrides() {
    let args = CliArgs::try_parse_from([
        "dagsynth",
        "--config",
        "cfg.toml",
        "--dest-dir",
        "out",
        "--seed",
        "42",
        "--log-level",
        "debug",
        "--dry-run",
    ])
    .unwrap();
    assert_eq!(args.config, "cfg.toml");
    assert_eq!(args.dest_dir, "out");
    assert_eq!(args.seed, Some(42));
    assert_eq!(args.log_level, Some(LogLevel::Debug));
    assert!(args.dry_run);
}

#[test]
fn log_filter_priority() {
    assert_eq!(filter_directive(Some(LogLevel::Warn), Some("trace")), "warn");
    assert_eq!(
        filter_directive(None, Some("info,dagsynth::builder=debug")),
        "info,dagsynth::builder=debug"
    );
    assert_eq!(filter_directive(None, Some("  ")), "info");
    assert_eq!(filter_directive(None, None), "info");
}

#[test]
fn run_writes_into_dest_dir() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), "Dagsynth.toml", GNP_TOML);
    let dest = dir.path().join("out");

    let args = CliArgs::try_parse_from([
        "dagsynth",
        "--config",
        config.to_str().unwrap(),
        "--dest-dir",
        dest.to_str().unwrap(),
    ])
    .unwrap();
    run(args).unwrap();

    assert!(dest.join("PE_0.2").join("dag_0.json").is_file());
    assert!(dest.join("PE_0.4").join("dag_2.dot").is_file());
}

#[test]
fn dry_run_generates_nothing() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), "Dagsynth.toml", GNP_TOML);
    let dest = dir.path().join("out");

    let args = CliArgs::try_parse_from([
        "dagsynth",
        "--config",
        config.to_str().unwrap(),
        "--dest-dir",
        dest.to_str().unwrap(),
        "--dry-run",
    ])
    .unwrap();
    run(args).unwrap();

    assert!(!dest.exists());
}

#[test]
fn missing_config_is_reported_with_its_path() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let args = CliArgs::try_parse_from(["dagsynth", "--config", missing.to_str().unwrap()]).unwrap();

    let err = run(args).unwrap_err();
    assert!(format!("{err}").contains("nope.toml"));
}
