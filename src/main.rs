// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! spacey-cjs - convert CommonJS module graphs to ES modules
//!
//! Starting from one or more entry files, every reachable module is
//! written under the output directory, converted if it is CommonJS and
//! copied unchanged otherwise. The shared wrapper runtime is written to
//! `commonjs-runtime.js`; load it as a classic script before the modules.

mod graph;

use anyhow::{Context, Result};
use clap::Parser;
use graph::{ModuleGraph, RUNTIME_FILE};
use owo_colors::OwoColorize;
use spacey_commonjs::{CONFIG_FILE, CommonJsOptions, CommonJsPlugin};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "spacey-cjs",
    about = "Convert CommonJS modules to ES modules",
    version,
    author = "Pegasus Heavy Industries"
)]
struct Cli {
    /// Entry modules
    #[arg(required = true)]
    entries: Vec<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "dist")]
    out_dir: PathBuf,

    /// Configuration file (defaults to spacey-cjs.json if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Recognized file extension; may be repeated
    #[arg(long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// Leave `global` and top-level `this` untouched
    #[arg(long)]
    ignore_global: bool,

    /// Do not write source maps
    #[arg(long)]
    no_source_map: bool,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "spacey_commonjs=debug,spacey_cjs=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let options = load_options(cli)?;
    let plugin = CommonJsPlugin::new(options).context("Invalid configuration")?;

    let graph = ModuleGraph::new(&plugin)?;
    graph.build(&cli.entries)?;
    let summary = graph
        .write(&cli.out_dir)
        .with_context(|| format!("Failed to write output to {}", cli.out_dir.display()))?;

    println!(
        "{} {} of {} modules into {}",
        "Converted".green().bold(),
        summary.converted,
        graph.len(),
        cli.out_dir.display().cyan()
    );
    if summary.runtime_written {
        println!(
            "Load {} before the converted modules",
            cli.out_dir.join(RUNTIME_FILE).display().cyan()
        );
    }
    Ok(())
}

/// Configuration file values, overridden by command line flags.
fn load_options(cli: &Cli) -> Result<CommonJsOptions> {
    let mut options = match &cli.config {
        Some(path) => CommonJsOptions::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None if Path::new(CONFIG_FILE).is_file() => CommonJsOptions::from_file(Path::new(CONFIG_FILE))
            .with_context(|| format!("Failed to load config {}", CONFIG_FILE))?,
        None => CommonJsOptions::default(),
    };

    if !cli.extensions.is_empty() {
        options.extensions = cli.extensions.clone();
        options.normalize_extensions();
    }
    if cli.ignore_global {
        options.ignore_global = true;
    }
    if cli.no_source_map {
        options.source_map = false;
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["spacey-cjs", "src/index.js"]);
        assert_eq!(cli.entries, vec![PathBuf::from("src/index.js")]);
        assert_eq!(cli.out_dir, PathBuf::from("dist"));
        assert!(cli.config.is_none());
        assert!(!cli.ignore_global);
        assert!(!cli.no_source_map);
    }

    #[test]
    fn test_flags_override_options() {
        let cli = Cli::parse_from([
            "spacey-cjs",
            "--ext",
            "cjs",
            "--ext",
            ".js",
            "--ignore-global",
            "--no-source-map",
            "--config",
            "/nonexistent/spacey-cjs.json",
            "a.js",
        ]);
        assert!(load_options(&cli).is_err());

        let cli = Cli::parse_from([
            "spacey-cjs",
            "--ext",
            "cjs",
            "--ext",
            ".js",
            "--ignore-global",
            "--no-source-map",
            "a.js",
        ]);
        let options = load_options(&cli).unwrap();
        assert_eq!(options.extensions, vec![".cjs", ".js"]);
        assert!(options.ignore_global);
        assert!(!options.source_map);
    }

    #[test]
    fn test_entries_required() {
        assert!(Cli::try_parse_from(["spacey-cjs"]).is_err());
    }
}
