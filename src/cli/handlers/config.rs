//! Configuration handler for ipyhist CLI

use crate::cli::args::*;
use crate::cli::CliApp;
use crate::config::Config;
use crate::error::{Error, Result};
use std::path::Path;

pub fn handle_config(app: &mut CliApp, args: &ConfigArgs) -> Result<()> {
    if args.show {
        let config_json = serde_json::to_string_pretty(&app.config)?;
        println!("{}", config_json);
    } else if args.init {
        let config_path = Config::default_config_path()?;
        init_config_at(&config_path, args.force)?;
        println!("Configuration initialized at {}", config_path.display());
    } else if args.validate {
        match app.config.validate() {
            Ok(_) => println!("Configuration is valid"),
            Err(e) => println!("Configuration validation failed: {}", e),
        }
    } else {
        println!("Use --show, --init, or --validate");
    }

    Ok(())
}

/// Write a default configuration to `path`, keeping an existing file unless `force`
fn init_config_at(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::FileExists {
            path: path.to_path_buf(),
        });
    }
    Config::default().save_to_path(path)
}
