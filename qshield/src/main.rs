// qshield/src/main.rs
//! qshield entry point.

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use qshield::cli::{Cli, Commands};
use qshield::commands::{self, patterns, redact};
use qshield::logger;

fn main() -> Result<()> {
    let args = Cli::parse();

    let level = if args.quiet {
        Some(LevelFilter::Off)
    } else if args.debug {
        Some(LevelFilter::Debug)
    } else {
        None
    };
    logger::init_logger(level);

    let config = commands::load_config(args.config.as_deref());

    match args.command {
        Commands::Redact(cmd) => redact::run_redact(&cmd, config.as_ref()),
        Commands::Patterns => patterns::run_patterns(config.as_ref()),
    }
}
