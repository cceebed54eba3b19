//! ipyhist - browse, search and prune IPython command history
//!
//! This library provides functionality for:
//! - Locating IPython's `history.sqlite`, with `~` expansion for overrides
//! - Paging through history newest first, optionally filtered by substring
//! - Deleting entries by id in a single statement
//! - A JSON message protocol for driving all of the above from a front end
//!
//! # Examples
//!
//! ```rust,no_run
//! use ipyhist::{HistoryRepo, PageRequest};
//!
//! let repo = HistoryRepo::new(Some("~/.ipython/profile_default/history.sqlite".into()));
//! let page = repo.fetch_page(&PageRequest::new(1, 20).with_search("import"))?;
//! for entry in &page.data {
//!     println!("{} {}", entry.id, entry.source);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backend;
pub mod bridge;
pub mod browser;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod message;
pub mod paths;
pub mod prelude;
pub mod types;

pub use backend::HistoryBackend;
pub use config::Config;
pub use database::HistoryRepo;
pub use error::{Error, Result};
pub use message::{MessageHandler, Request, Response};
pub use paths::resolve_store_path;
pub use types::{Entry, EntryId, Page, PageRequest};
