//! SQLite access to the IPython history store
//!
//! The store is owned by IPython. This module never creates it or inserts
//! into it; it only pages through the `history` table and deletes rows by
//! `rowid`. Every call opens its own connection and closes it before
//! returning.

use crate::backend::HistoryBackend;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::paths::resolve_store_path;
use crate::types::{total_pages, Entry, EntryId, Page, PageRequest};
use rusqlite::{params_from_iter, Connection, OpenFlags, ToSql};
use std::path::PathBuf;
use tracing::{debug, info};

const PAGINATED_QUERY: &str =
    "SELECT rowid AS id, source FROM history ORDER BY session DESC, line DESC LIMIT ? OFFSET ?";
const SEARCH_PAGINATED_QUERY: &str = "SELECT rowid AS id, source FROM history WHERE source LIKE ? \
     ORDER BY session DESC, line DESC LIMIT ? OFFSET ?";
const COUNT_QUERY: &str = "SELECT COUNT(*) FROM history";
const SEARCH_COUNT_QUERY: &str = "SELECT COUNT(*) FROM history WHERE source LIKE ?";

/// Repository over the IPython history database
///
/// Holds only the configured location; the path is resolved on every call.
#[derive(Debug, Clone, Default)]
pub struct HistoryRepo {
    configured_path: Option<String>,
}

impl HistoryRepo {
    pub fn new(configured_path: Option<String>) -> Self {
        Self { configured_path }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.history_database_path.clone())
    }

    /// The resolved location of the history store
    pub fn store_path(&self) -> Result<PathBuf> {
        resolve_store_path(self.configured_path.as_deref())
    }

    /// Open the store read-write. A missing file is an error, never created.
    fn open(&self) -> Result<Connection> {
        let path = self.store_path()?;
        debug!(path = %path.display(), "opening history store");
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }

    /// Fetch one page of history, newest session and line first
    pub fn fetch_page(&self, request: &PageRequest) -> Result<Page<Entry>> {
        if request.page_size == 0 {
            return Err(Error::invalid_arguments("page size must be greater than 0"));
        }

        let conn = self.open()?;
        // On error the connection is dropped here, which closes it.
        let page = query_page(&conn, request)?;
        close(conn)?;

        debug!(
            page = page.page,
            returned = page.data.len(),
            total = page.total_count,
            search = request.active_search_term().is_some(),
            "fetched history page"
        );
        Ok(page)
    }

    /// Delete entries with a single `DELETE ... WHERE rowid IN (...)`
    pub fn delete(&self, ids: &[EntryId]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let conn = self.open()?;
        let deleted = conn.execute(&delete_statement(ids.len()), params_from_iter(ids))?;
        close(conn)?;

        info!(requested = ids.len(), deleted, "deleted history entries");
        Ok(deleted)
    }
}

impl HistoryBackend for HistoryRepo {
    fn fetch_page(&self, request: &PageRequest) -> Result<Page<Entry>> {
        HistoryRepo::fetch_page(self, request)
    }

    fn delete(&self, ids: &[EntryId]) -> Result<usize> {
        HistoryRepo::delete(self, ids)
    }
}

fn query_page(conn: &Connection, request: &PageRequest) -> Result<Page<Entry>> {
    let pattern = request.search_pattern();
    let (count_sql, page_sql) = if pattern.is_some() {
        (SEARCH_COUNT_QUERY, SEARCH_PAGINATED_QUERY)
    } else {
        (COUNT_QUERY, PAGINATED_QUERY)
    };

    let limit = i64::from(request.page_size);
    let offset = i64::try_from(request.offset())
        .map_err(|_| Error::invalid_arguments("page offset is out of range"))?;

    let filter: Vec<&dyn ToSql> = pattern.iter().map(|p| p as &dyn ToSql).collect();

    let total_count: i64 = conn.query_row(count_sql, filter.as_slice(), |row| row.get(0))?;
    let total_count = total_count.max(0) as u64;

    let mut page_params = filter.clone();
    page_params.push(&limit);
    page_params.push(&offset);

    let mut stmt = conn.prepare(page_sql)?;
    let data = stmt
        .query_map(page_params.as_slice(), |row| {
            Ok(Entry {
                id: row.get(0)?,
                source: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(Page {
        data,
        total_count,
        page: request.page,
        page_size: request.page_size,
        total_pages: total_pages(total_count, request.page_size),
    })
}

fn delete_statement(count: usize) -> String {
    let placeholders = vec!["?"; count].join(",");
    format!("DELETE FROM history WHERE rowid IN ({})", placeholders)
}

fn close(conn: Connection) -> Result<()> {
    conn.close().map_err(|(_, err)| Error::Database(err))?;
    debug!("closed history store");
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    /// IPython's own schema for the history table
    pub(crate) fn create_store(path: &Path, rows: &[(i64, i64, &str)]) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE history (
                session integer,
                line integer,
                source text,
                source_raw text,
                PRIMARY KEY (session, line)
            )",
        )
        .unwrap();
        for (session, line, source) in rows {
            conn.execute(
                "INSERT INTO history (session, line, source, source_raw) VALUES (?1, ?2, ?3, ?3)",
                rusqlite::params![session, line, source],
            )
            .unwrap();
        }
    }

    fn seeded() -> (TempDir, HistoryRepo) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.sqlite");
        create_store(&path, &[(1, 1, "a"), (1, 2, "b"), (2, 1, "c")]);
        let repo = HistoryRepo::new(Some(path.to_string_lossy().into_owned()));
        (dir, repo)
    }

    fn sources(page: &Page<Entry>) -> Vec<&str> {
        page.data.iter().map(|e| e.source.as_str()).collect()
    }

    #[test]
    fn test_first_page_is_newest_first() {
        let (_dir, repo) = seeded();
        let page = repo.fetch_page(&PageRequest::new(1, 2)).unwrap();

        assert_eq!(sources(&page), vec!["c", "b"]);
        assert_eq!(page.total_count, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 2);
    }

    #[test]
    fn test_second_page_holds_the_remainder() {
        let (_dir, repo) = seeded();
        let page = repo.fetch_page(&PageRequest::new(2, 2)).unwrap();
        assert_eq!(sources(&page), vec!["a"]);
        assert_eq!(page.total_count, 3);
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let (_dir, repo) = seeded();
        let page = repo.fetch_page(&PageRequest::new(9, 2)).unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total_count, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.page, 9);
    }

    #[test]
    fn test_search_filters_by_substring() {
        let (_dir, repo) = seeded();
        let page = repo
            .fetch_page(&PageRequest::new(1, 10).with_search("a"))
            .unwrap();
        assert_eq!(sources(&page), vec!["a"]);
        assert_eq!(page.total_count, 1);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let (_dir, repo) = seeded();
        let plain = repo.fetch_page(&PageRequest::new(1, 10)).unwrap();
        let blank = repo
            .fetch_page(&PageRequest::new(1, 10).with_search("  "))
            .unwrap();
        assert_eq!(plain, blank);
        assert_eq!(blank.total_count, 3);
    }

    #[test]
    fn test_search_without_matches() {
        let (_dir, repo) = seeded();
        let page = repo
            .fetch_page(&PageRequest::new(1, 10).with_search("zzz"))
            .unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_search_case_follows_sqlite_like() {
        // SQLite's LIKE folds ASCII case by default.
        let (_dir, repo) = seeded();
        let page = repo
            .fetch_page(&PageRequest::new(1, 10).with_search("C"))
            .unwrap();
        assert_eq!(sources(&page), vec!["c"]);
    }

    #[test]
    fn test_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.sqlite");
        create_store(&path, &[]);
        let repo = HistoryRepo::new(Some(path.to_string_lossy().into_owned()));

        let page = repo.fetch_page(&PageRequest::new(1, 20)).unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_multiline_source_is_preserved() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.sqlite");
        create_store(&path, &[(1, 1, "for i in range(3):\n    print(i)"), (1, 2, "")]);
        let repo = HistoryRepo::new(Some(path.to_string_lossy().into_owned()));

        let page = repo.fetch_page(&PageRequest::new(1, 10)).unwrap();
        assert_eq!(sources(&page), vec!["", "for i in range(3):\n    print(i)"]);
    }

    #[test]
    fn test_delete_removes_only_listed_rows() {
        let (_dir, repo) = seeded();
        let before = repo.fetch_page(&PageRequest::new(1, 10)).unwrap();
        let b_id = before.data.iter().find(|e| e.source == "b").unwrap().id;

        let deleted = repo.delete(&[b_id]).unwrap();
        assert_eq!(deleted, 1);

        let after = repo.fetch_page(&PageRequest::new(1, 10)).unwrap();
        assert_eq!(after.total_count, before.total_count - 1);
        assert_eq!(sources(&after), vec!["c", "a"]);
    }

    #[test]
    fn test_delete_many_in_one_call() {
        let (_dir, repo) = seeded();
        let ids: Vec<EntryId> = repo
            .fetch_page(&PageRequest::new(1, 10))
            .unwrap()
            .data
            .iter()
            .map(|e| e.id)
            .collect();

        assert_eq!(repo.delete(&ids).unwrap(), 3);
        assert_eq!(repo.fetch_page(&PageRequest::new(1, 10)).unwrap().total_count, 0);
    }

    #[test]
    fn test_delete_unknown_ids_is_a_no_op() {
        let (_dir, repo) = seeded();
        let deleted = repo.delete(&[EntryId::new(999), EntryId::new(1000)]).unwrap();
        assert_eq!(deleted, 0);
        assert_eq!(repo.fetch_page(&PageRequest::new(1, 10)).unwrap().total_count, 3);
    }

    #[test]
    fn test_delete_nothing_skips_the_store() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.sqlite");
        let repo = HistoryRepo::new(Some(missing.to_string_lossy().into_owned()));

        assert_eq!(repo.delete(&[]).unwrap(), 0);
        assert!(!missing.exists());
    }

    #[test]
    fn test_missing_store_is_an_error_and_not_created() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.sqlite");
        let repo = HistoryRepo::new(Some(missing.to_string_lossy().into_owned()));

        let err = repo.fetch_page(&PageRequest::new(1, 10)).unwrap_err();
        assert!(matches!(err, Error::Database(_)));

        let err = repo.delete(&[EntryId::new(1)]).unwrap_err();
        assert!(matches!(err, Error::Database(_)));

        assert!(!missing.exists());
    }

    #[test]
    fn test_store_without_history_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("other.sqlite");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE notes (body text)")
            .unwrap();
        let repo = HistoryRepo::new(Some(path.to_string_lossy().into_owned()));

        let err = repo.fetch_page(&PageRequest::new(1, 10)).unwrap_err();
        assert!(err.to_string().contains("no such table"));
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let (_dir, repo) = seeded();
        let err = repo.fetch_page(&PageRequest::new(1, 0)).unwrap_err();
        assert!(matches!(err, Error::InvalidArguments { .. }));
    }

    #[test]
    fn test_delete_statement_sizes_in_list() {
        assert_eq!(
            delete_statement(1),
            "DELETE FROM history WHERE rowid IN (?)"
        );
        assert_eq!(
            delete_statement(3),
            "DELETE FROM history WHERE rowid IN (?,?,?)"
        );
    }

    #[test]
    fn test_store_path_from_config() {
        let mut config = Config::default();
        config.history_database_path = Some("/srv/history.sqlite".to_string());
        let repo = HistoryRepo::from_config(&config);
        assert_eq!(repo.store_path().unwrap(), PathBuf::from("/srv/history.sqlite"));
    }
}
