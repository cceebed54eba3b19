//! Command-line argument structures for ipyhist

use clap::Args;

#[derive(Args)]
pub struct ListArgs {
    /// Page number (1-based)
    #[arg(short = 'p', long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Entries per page (defaults to the configured page size)
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,

    /// Only show entries whose source contains this text
    #[arg(short = 's', long)]
    pub search: Option<String>,

    /// Print the page as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Entry ids to delete
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,

    /// Delete without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Show current configuration
    #[arg(long)]
    pub show: bool,

    /// Initialize configuration file with defaults
    #[arg(long)]
    pub init: bool,

    /// Overwrite an existing configuration file with --init
    #[arg(long, requires = "init")]
    pub force: bool,

    /// Validate configuration file
    #[arg(long)]
    pub validate: bool,
}

#[derive(Args)]
pub struct BrowseArgs {
    /// Entries per page (defaults to the configured page size)
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,
}
