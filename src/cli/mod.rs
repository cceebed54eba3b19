//! Command-line interface module for ipyhist
//!
//! This module is organized into submodules:
//! - `args`: Command-line argument structures
//! - `handlers`: Command handler implementations

mod args;
mod handlers;

pub use args::*;
use handlers::*;

use crate::config::Config;
use crate::database::HistoryRepo;
use crate::error::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// ipyhist - browse, search and prune IPython command history
#[derive(Parser)]
#[command(name = "ipyhist")]
#[command(about = "Browse, search and prune IPython command history")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// History database path, overriding the configuration (`~` is expanded)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show one page of history
    List(ListArgs),
    /// Delete entries by id
    Delete(DeleteArgs),
    /// Show the resolved history database path
    Path,
    /// Show or initialize configuration
    Config(ConfigArgs),
    /// Serve panel messages as JSON lines over stdin/stdout
    Serve,
    /// Browse history interactively
    Browse(BrowseArgs),
}

/// Main CLI application
pub struct CliApp {
    pub config: Config,
    pub repo: HistoryRepo,
    pub verbose: bool,
    pub quiet: bool,
}

impl CliApp {
    /// Create a new CLI application
    pub fn new(cli: &Cli) -> Result<Self> {
        Self::with_home(cli, home::home_dir().as_deref())
    }

    /// Create a new CLI application, looking for the default config under `home`
    ///
    /// Only a missing config file falls back to defaults; a broken one is an error.
    pub fn with_home(cli: &Cli, home: Option<&Path>) -> Result<Self> {
        let config = match (&cli.config, home) {
            (Some(config_path), _) => Config::load_from_path(config_path)?,
            (None, Some(home)) => Config::load_from_home(home)?,
            (None, None) => Config::default(),
        };
        let config = config.with_database_path(cli.db.clone());
        let repo = HistoryRepo::from_config(&config);

        Ok(Self {
            config,
            repo,
            verbose: cli.verbose,
            quiet: cli.quiet,
        })
    }

    /// Run the CLI application
    pub fn run(&mut self, command: &Commands) -> Result<()> {
        match command {
            Commands::List(args) => handle_list(self, args),
            Commands::Delete(args) => handle_delete(self, args),
            Commands::Path => handle_path(self),
            Commands::Config(args) => handle_config(self, args),
            Commands::Serve => handle_serve(self),
            Commands::Browse(args) => handle_browse(self, args),
        }
    }

    pub fn verbose_println(&self, message: &str) {
        if self.verbose && !self.quiet {
            eprintln!("[verbose] {}", message);
        }
    }

    /// Log level to use when `RUST_LOG` is unset
    pub fn default_log_level(&self) -> &str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            &self.config.logging.level
        }
    }
}
