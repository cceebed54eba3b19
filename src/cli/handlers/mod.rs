//! Command handler implementations for ipyhist CLI
//!
//! This module organizes command handlers into logical groups:
//! - `basic`: One-shot commands (list, delete, path)
//! - `config`: Configuration handler
//! - `interactive`: Long-running front ends (serve, browse)

mod basic;
mod config;
mod interactive;

pub use basic::*;
pub use config::*;
pub use interactive::*;
