//! Type definitions for ipyhist
//!
//! This module provides the entry identifier newtype, the history entry
//! itself, and the pagination contract shared by the access layer and the
//! message protocol.

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A type-safe wrapper for history row identifiers
///
/// Wraps the store's native `rowid`, which is stable for the lifetime of the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl EntryId {
    /// Create a new EntryId
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for EntryId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<EntryId> for i64 {
    fn from(id: EntryId) -> Self {
        id.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses a base-10 identifier, ignoring surrounding whitespace.
impl FromStr for EntryId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(EntryId::new)
            .map_err(|_| Error::invalid_entry_id(s))
    }
}

impl ToSql for EntryId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for EntryId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(EntryId::new)
    }
}

/// Parse a batch of string-encoded identifiers.
///
/// The batch is all-or-nothing: the first unparseable value fails the whole call.
pub fn parse_entry_ids<S: AsRef<str>>(raw: &[S]) -> Result<Vec<EntryId>, Error> {
    raw.iter().map(|s| s.as_ref().parse()).collect()
}

/// One command from the interactive shell's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub source: String,
}

/// A request for one page of history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
    /// Substring filter over the entry source
    pub search_term: Option<String>,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            search_term: None,
        }
    }

    pub fn with_search<S: Into<String>>(mut self, term: S) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// The search term, if it is present and not blank.
    pub fn active_search_term(&self) -> Option<&str> {
        self.search_term
            .as_deref()
            .filter(|term| !term.trim().is_empty())
    }

    /// LIKE pattern for search mode. The term itself is bound untrimmed.
    pub fn search_pattern(&self) -> Option<String> {
        self.active_search_term().map(|term| format!("%{}%", term))
    }

    pub fn offset(&self) -> u64 {
        page_offset(self.page, self.page_size)
    }
}

/// One page of results plus the totals needed to navigate the rest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// No page follows this one
    pub fn is_last(&self) -> bool {
        u64::from(self.page) >= self.total_pages
    }
}

/// `ceil(total_count / page_size)`, zero for an empty result or a zero page size.
pub fn total_pages(total_count: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(u64::from(page_size))
}

/// Row offset of a 1-based page. Page 0 is treated like page 1.
pub fn page_offset(page: u32, page_size: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * u64::from(page_size)
}
