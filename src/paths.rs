//! Location of the IPython history store
//!
//! The store path comes from the configured override when there is one,
//! otherwise from IPython's default profile. A leading `~` is expanded to the
//! current user's home directory. Nothing here touches the filesystem; a
//! missing file is reported when the store is opened.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// IPython's default history database, relative to the home directory
pub const DEFAULT_STORE_RELATIVE_PATH: &str = ".ipython/profile_default/history.sqlite";

const HOME_SHORTHAND: char = '~';

/// Resolve the history store path for the current user.
///
/// The home directory is only looked up when the result depends on it.
pub fn resolve_store_path(configured: Option<&str>) -> Result<PathBuf> {
    match non_empty(configured) {
        Some(path) if !path.starts_with(HOME_SHORTHAND) => Ok(PathBuf::from(path)),
        _ => {
            let home = home::home_dir().ok_or(Error::HomeDirectoryNotFound)?;
            Ok(resolve_store_path_in(configured, &home))
        }
    }
}

/// Resolve the history store path against an explicit home directory.
pub fn resolve_store_path_in(configured: Option<&str>, home: &Path) -> PathBuf {
    match non_empty(configured) {
        Some(path) => expand_home(path, home),
        None => default_store_path_in(home),
    }
}

/// `<home>/.ipython/profile_default/history.sqlite`
pub fn default_store_path_in(home: &Path) -> PathBuf {
    home.join(DEFAULT_STORE_RELATIVE_PATH)
}

/// Replace a leading `~` with `home`; any other path is returned as-is.
pub fn expand_home(path: &str, home: &Path) -> PathBuf {
    match path.strip_prefix(HOME_SHORTHAND) {
        Some(rest) => {
            let rest = rest.trim_start_matches(['/', '\\']);
            if rest.is_empty() {
                home.to_path_buf()
            } else {
                home.join(rest)
            }
        }
        None => PathBuf::from(path),
    }
}

fn non_empty(configured: Option<&str>) -> Option<&str> {
    configured.filter(|path| !path.is_empty())
}
