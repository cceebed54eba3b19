//! Prelude module for ipyhist
//!
//! Re-exports the types most callers need.
//!
//! # Usage
//!
//! ```rust
//! use ipyhist::prelude::*;
//! ```

pub use crate::backend::HistoryBackend;
pub use crate::config::Config;
pub use crate::database::HistoryRepo;
pub use crate::error::{Error, Result};
pub use crate::message::{MessageHandler, Request, Response};
pub use crate::types::{Entry, EntryId, Page, PageRequest};
