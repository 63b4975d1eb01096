// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Hold'em Lab command line.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
use clap::Parser;
use log::error;

mod commands;

#[derive(Debug, Parser)]
#[clap(name = "holdem", about = "Texas Hold'em odds and hand simulation")]
struct Cli {
    /// Enable debug logging.
    #[clap(long, short, global = true)]
    verbose: bool,
    #[clap(subcommand)]
    command: commands::Command,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::builder()
        .filter_level(level)
        .format_target(false)
        .format_timestamp_millis()
        .init();

    if let Err(e) = commands::run(cli.command) {
        error!("{e:#}");
        std::process::exit(1);
    }
}
