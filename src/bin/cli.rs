// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Surface Integrity CLI

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use surface_integrity::cli::{BatchSummary, Reporter, Runner};
use surface_integrity::integrity::{IntegrityCalculator, IntegrityConfig};
use surface_integrity::io::{find_snapshot_files, load_snapshot, DatasetEncoder, DatasetStatus};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "surface-integrity")]
#[command(about = "Surface integrity analysis for captured meshes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./integrity.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze snapshot files or directories of snapshots
    Analyze {
        /// Snapshot JSON file(s) or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print results as JSON instead of a report
        #[arg(long)]
        json: bool,

        /// Hide the progress bar
        #[arg(long)]
        quiet: bool,
    },

    /// Analyze snapshots and write them to a dataset directory
    Export {
        /// Snapshot JSON file(s) or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Dataset root; a timestamped directory is created inside it
        #[arg(short, long, default_value = "datasets")]
        out: PathBuf,

        /// Write the plain mesh without analysis colors
        #[arg(long)]
        raw: bool,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Write the configuration to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => {
            let mut config = IntegrityConfig::from_file(path)?;
            config.apply_overrides(|key| std::env::var(key).ok())?;
            config
        }
        None => IntegrityConfig::load()?,
    };

    match cli.command {
        Commands::Analyze { paths, json, quiet } => analyze_command(config, &paths, json, quiet),
        Commands::Export { paths, out, raw } => export_command(config, &paths, out, raw),
        Commands::Config { output } => config_command(&config, output),
    }
}

fn analyze_command(config: IntegrityConfig, paths: &[PathBuf], json: bool, quiet: bool) -> Result<()> {
    let files = find_snapshot_files(paths);
    if files.is_empty() {
        bail!("No snapshot files found in {:?}", paths);
    }

    let runner = Runner::new(IntegrityCalculator::new(config)).with_progress(!json && !quiet);
    let outcomes = runner.run_batch(&files);
    let summary = BatchSummary::from_outcomes(&outcomes);

    if json {
        let report = serde_json::json!({
            "summary": summary,
            "outcomes": outcomes,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for outcome in &outcomes {
            Reporter::report_outcome(outcome);
        }
        Reporter::report_summary(&summary);
    }

    if summary.compromised > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn export_command(config: IntegrityConfig, paths: &[PathBuf], out: PathBuf, raw: bool) -> Result<()> {
    let files = find_snapshot_files(paths);
    if files.is_empty() {
        bail!("No snapshot files found in {:?}", paths);
    }

    let calculator = IntegrityCalculator::new(config);
    let mut encoder = DatasetEncoder::new(&out);
    if encoder.status() != DatasetStatus::AllGood {
        bail!("Could not prepare dataset directory {:?}", encoder.directory());
    }

    for file in &files {
        let snapshot = match load_snapshot(file) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                Reporter::report_warning(&format!("Skipping {}: {:#}", file.display(), e));
                continue;
            }
        };

        let results = if raw {
            None
        } else {
            match calculator.analyze(&snapshot) {
                Ok(results) => Some(results),
                Err(e) => {
                    Reporter::report_warning(&format!("{}: {}", file.display(), e));
                    None
                }
            }
        };

        if let Err(e) = encoder.add_frame(&snapshot, results.as_ref()) {
            Reporter::report_error(&format!("{}: {}", file.display(), e));
        }
    }

    Reporter::success(&format!(
        "Saved {} frame(s) to {}",
        encoder.saved_frames(),
        encoder.directory().display()
    ));
    Ok(())
}

fn config_command(config: &IntegrityConfig, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            config.save(&path)?;
            Reporter::success(&format!("Config written to {}", path.display()));
        }
        None => println!("{}", toml::to_string_pretty(config)?),
    }
    Ok(())
}
