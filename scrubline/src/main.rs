// scrubline/src/main.rs
//! scrubline entry point.
//!
//! Parses the command line, sets up diagnostic logging and dispatches to the
//! selected command.

use anyhow::Result;
use clap::Parser;

use scrubline::cli::{Cli, Commands};
use scrubline::commands;
use scrubline::logger;

fn main() -> Result<()> {
    let args = Cli::parse();

    if args.quiet {
        logger::init_logger(Some(log::LevelFilter::Off));
    } else if args.debug {
        logger::init_logger(Some(log::LevelFilter::Debug));
    } else {
        logger::init_logger(None);
    }

    match args.command {
        Commands::Scrub(cmd) => commands::scrub::run_scrub(cmd),
        Commands::Log(cmd) => commands::log::run_log(cmd),
    }
}
