// src/lib.rs

pub mod builder;
pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod export;
pub mod generate;
pub mod logging;
pub mod property;
pub mod sampling;
pub mod types;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::combo::ComboGenerator;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::export::DagExporter;
use crate::generate::Generator;

/// High-level entry point used by `main.rs`.
///
/// Loads and validates the config, applies CLI overrides, then either prints
/// the combination plan (`--dry-run`) or generates and exports every DAG.
pub fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let mut cfg = load_and_validate(&config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;
    if let Some(seed) = args.seed {
        cfg = cfg.with_seed(seed);
    }

    if args.dry_run {
        print_dry_run(&cfg)?;
        return Ok(());
    }

    let dest_dir = PathBuf::from(&args.dest_dir);
    std::fs::create_dir_all(&dest_dir)
        .with_context(|| format!("failed to create {}", dest_dir.display()))?;

    let generator = Generator::new(&cfg)?;
    let mut exporter = DagExporter::new(&dest_dir, cfg.output_formats().dag);
    let summary = generator.run(&mut exporter)?;

    info!(
        dest = %dest_dir.display(),
        generated = summary.generated(),
        failed = summary.failed(),
        skipped_combinations = summary.skipped(),
        "done"
    );
    Ok(())
}

/// Print the seed, the combination axes and the directory of every
/// combination.
fn print_dry_run(cfg: &ConfigFile) -> Result<()> {
    let combos = ComboGenerator::new(cfg)?;
    let raw = cfg.raw();

    println!("dagsynth dry-run");
    println!("  seed = {}", cfg.seed());
    println!("  seed_scope = {:?}", cfg.seed_scope());
    println!("  number_of_dags = {}", raw.number_of_dags);
    println!("  max_try = {}", raw.max_try);
    println!();

    if combos.axes().is_empty() {
        println!("combination axes: none");
    } else {
        println!("combination axes ({}):", combos.axes().len());
        for axis in combos.axes() {
            let values: Vec<String> = axis.values.iter().map(|v| v.to_string()).collect();
            println!("  - {}: [{}]", axis.name, values.join(", "));
        }
    }
    println!();

    println!("combinations ({}):", combos.len());
    for combination in combos.iter() {
        let combination = combination?;
        println!(
            "  - {} ({})",
            combination.dir_name,
            combination.config.graph_structure.method_name()
        );
    }

    debug!("dry-run complete (nothing generated)");
    Ok(())
}
