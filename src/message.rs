//! Panel message protocol
//!
//! Front ends talk to the history store through JSON messages tagged by a
//! `command` field:
//!
//! ```text
//! -> {"command":"getHistory","page":1,"pageSize":50,"searchTerm":"import"}
//! <- {"command":"historyData","data":{"data":[...],"totalCount":3,...}}
//! -> {"command":"deleteItems","ids":["12","13"]}
//! <- {"command":"deleteComplete","success":true}
//! ```
//!
//! Every request yields exactly one response. Failures never escape the
//! dispatcher; they are turned into `error` or `deleteComplete` responses.

use crate::backend::HistoryBackend;
use crate::error::Result;
use crate::types::{parse_entry_ids, Entry, Page, PageRequest};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Inbound message from a front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Request {
    #[serde(rename_all = "camelCase")]
    GetHistory {
        page: u32,
        page_size: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        search_term: Option<String>,
    },
    /// Identifiers arrive string-encoded, as the panel holds them.
    DeleteItems { ids: Vec<String> },
}

/// Outbound message to a front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Response {
    HistoryData {
        data: Page<Entry>,
    },
    DeleteComplete {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    /// User-facing failure notice
    Error {
        message: String,
    },
}

impl Response {
    pub fn error<S: Into<String>>(message: S) -> Self {
        Response::Error {
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Maps requests onto a [`HistoryBackend`]
pub struct MessageHandler<B> {
    backend: B,
}

impl<B: HistoryBackend> MessageHandler<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Handle one request
    pub fn handle(&self, request: Request) -> Response {
        match request {
            Request::GetHistory {
                page,
                page_size,
                search_term,
            } => self.get_history(PageRequest {
                page,
                page_size,
                search_term,
            }),
            Request::DeleteItems { ids } => self.delete_items(&ids),
        }
    }

    /// Decode one JSON message and handle it
    pub fn handle_line(&self, line: &str) -> Response {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => self.handle(request),
            Err(e) => {
                warn!(error = %e, "rejected malformed message");
                Response::error(format!("Invalid message: {}", e))
            }
        }
    }

    fn get_history(&self, request: PageRequest) -> Response {
        match self.backend.fetch_page(&request) {
            Ok(data) => Response::HistoryData { data },
            Err(e) => {
                warn!(error = %e, category = e.category(), "failed to load history");
                Response::error(format!("Failed to load IPython history: {}", e))
            }
        }
    }

    fn delete_items(&self, raw_ids: &[String]) -> Response {
        let outcome = parse_entry_ids(raw_ids).and_then(|ids| self.backend.delete(&ids));
        match outcome {
            Ok(deleted) => {
                debug!(requested = raw_ids.len(), deleted, "delete request completed");
                Response::DeleteComplete {
                    success: true,
                    error: None,
                }
            }
            Err(e) => {
                warn!(error = %e, category = e.category(), "failed to delete history items");
                Response::DeleteComplete {
                    success: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
