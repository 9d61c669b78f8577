mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{check, import, lookup};
use tracing_subscriber::EnvFilter;

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Lookup(args) => lookup::run(&cli, args),
        Commands::Import(args) => import::run(&cli, args),
        Commands::Check(args) => check::run(&cli, args),
    }
}

/// Logs go to stderr so stdout stays valid JSON.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> { run() }
