//! Common backend trait for history access
//!
//! The message dispatcher and the terminal browser talk to the store through
//! [`HistoryBackend`], which lets them run against an in-memory fake in tests.

use crate::error::Result;
use crate::types::{Entry, EntryId, Page, PageRequest};

/// Read and delete access to a history store
pub trait HistoryBackend {
    /// Fetch one page of entries, newest first
    ///
    /// A page past the end yields an empty `data` with correct totals.
    #[must_use = "Query results should be used"]
    fn fetch_page(&self, request: &PageRequest) -> Result<Page<Entry>>;

    /// Delete entries by identifier, returning the number of rows removed
    ///
    /// Unknown identifiers are ignored. An empty slice never touches the store.
    fn delete(&self, ids: &[EntryId]) -> Result<usize>;
}

impl<B: HistoryBackend + ?Sized> HistoryBackend for &B {
    fn fetch_page(&self, request: &PageRequest) -> Result<Page<Entry>> {
        (**self).fetch_page(request)
    }

    fn delete(&self, ids: &[EntryId]) -> Result<usize> {
        (**self).delete(ids)
    }
}
