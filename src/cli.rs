//! Command line shared by the `pin_regs` and `spi_ctar` binaries.

use std::io::Write;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use crate::Target;

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Language of the generated source: `c` or `rust`
    #[arg(short, long, default_value_t = Target::C)]
    pub target: Target,

    /// Log progress to stderr, repeat for more detail
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// `RUST_LOG` wins over `-v`. Logs go to stderr, stdout carries the
/// generated source.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse the command line, run `generate` and write its output to stdout.
pub fn run(generate: fn(Target) -> Result<String>) -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let output = generate(args.target)?;
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .and_then(|()| stdout.flush())
        .context("failed to write generated source")
}
