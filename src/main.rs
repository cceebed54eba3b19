//! ipyhist - browse, search and prune IPython command history
//!
//! This is the main entry point for the ipyhist command-line application.
//! It initializes logging and handles errors gracefully.

use clap::Parser;
use ipyhist::cli::{Cli, CliApp};
use ipyhist::error::Result;
use std::process;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut app = CliApp::new(cli)?;
    init_tracing(app.default_log_level());
    app.run(&cli.command)
}

/// Logs go to stderr so `serve` keeps stdout for responses.
fn init_tracing(default_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
