//! Flat-file bookmark store
//!
//! The backing file holds one normalized URL per line. It is read once when
//! the store is opened and only ever appended to afterwards:
//!
//! ```text
//! https://example.com
//! https://rust-lang.org/learn
//! ```
//!
//! The file is not locked. Two processes appending at the same time can
//! interleave or duplicate lines.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = BookmarkStore::load(&config.bookmark_file)?;
//!
//! let bookmark = Bookmark::parse("https://example.com")?;
//! if !store.contains(bookmark.as_str()) {
//!     store.append(bookmark)?;
//! }
//!
//! for url in store.list() {
//!     println!("{url}");
//! }
//! ```

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{IoStage, StoreError, StoreResult};
use crate::models::Bookmark;

/// Bookmarks loaded from the backing file, keyed by normalized URL
pub struct BookmarkStore {
    /// Backing file
    path: PathBuf,
    /// Entries keyed by their exact URL text
    entries: HashMap<String, Bookmark>,
}

impl BookmarkStore {
    /// Load the store from `path`
    ///
    /// A missing file yields an empty store. Every line that is not blank
    /// becomes one entry, keyed by its exact text.
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("bookmark db {:?} does not exist, starting empty", path);
                return Ok(Self {
                    path,
                    entries: HashMap::new(),
                });
            }
            Err(e) => return Err(StoreError::from_io(e, path, IoStage::Read)),
        };

        let entries: HashMap<String, Bookmark> = data
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .map(|line| (line.to_string(), Bookmark::from_line(line)))
            .collect();

        debug!("loaded {} bookmarks from {:?}", entries.len(), path);
        Ok(Self { path, entries })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Exact-string membership test
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Number of stored bookmarks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store has no bookmarks
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a bookmark to the backing file
    ///
    /// Opens the file in create-or-append mode, writes the URL followed by a
    /// newline, and closes it again. Already-stored URLs are refused without
    /// touching the file.
    pub fn append(&mut self, bookmark: Bookmark) -> StoreResult<()> {
        if self.contains(bookmark.as_str()) {
            return Err(StoreError::Duplicate { url: bookmark.url });
        }

        let mut file = open_append(&self.path)
            .map_err(|e| StoreError::from_io(e, self.path.clone(), IoStage::Open))?;

        let line = format!("{}\n", bookmark.url);
        file.write_all(line.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| StoreError::from_io(e, self.path.clone(), IoStage::Write))?;
        drop(file);

        info!("appended {} to {:?}", bookmark.url, self.path);
        self.entries.insert(bookmark.url.clone(), bookmark);
        Ok(())
    }

    /// All stored URLs in byte-wise ascending order
    pub fn list(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        urls.sort_unstable();
        urls
    }

    /// All stored bookmarks in the same order as [`BookmarkStore::list`]
    pub fn bookmarks(&self) -> Vec<&Bookmark> {
        let mut bookmarks: Vec<&Bookmark> = self.entries.values().collect();
        bookmarks.sort_unstable();
        bookmarks
    }
}

#[cfg(unix)]
fn open_append(path: &Path) -> io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_append(path: &Path) -> io::Result<fs::File> {
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn db_path(temp_dir: &TempDir) -> PathBuf {
        temp_dir.path().join(".bookmark")
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = BookmarkStore::load(db_path(&temp_dir)).unwrap();

        assert!(store.is_empty());
        assert!(store.list().is_empty());
        assert!(!db_path(&temp_dir).exists());
    }

    #[test]
    fn test_load_skips_blank_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = db_path(&temp_dir);
        fs::write(&path, "https://b.com\n\n   \nhttps://a.com\nhttps://b.com\n").unwrap();

        let store = BookmarkStore::load(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.list(), vec!["https://a.com", "https://b.com"]);
    }

    #[test]
    fn test_load_without_trailing_newline() {
        let temp_dir = TempDir::new().unwrap();
        let path = db_path(&temp_dir);
        fs::write(&path, "https://a.com\nhttps://b.com").unwrap();

        let store = BookmarkStore::load(&path).unwrap();
        assert!(store.contains("https://b.com"));
    }

    #[test]
    fn test_contains_is_exact() {
        let temp_dir = TempDir::new().unwrap();
        let path = db_path(&temp_dir);
        fs::write(&path, "http://example.com\n").unwrap();

        let store = BookmarkStore::load(&path).unwrap();
        assert!(store.contains("http://example.com"));
        assert!(!store.contains("http://example.com/"));
        assert!(!store.contains("HTTP://EXAMPLE.COM"));
    }

    #[test]
    fn test_load_directory_is_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = BookmarkStore::load(temp_dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_append_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = db_path(&temp_dir);
        let mut store = BookmarkStore::load(&path).unwrap();

        store
            .append(Bookmark::parse("http://example.com").unwrap())
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "http://example.com\n");
        assert!(store.contains("http://example.com"));
    }

    #[cfg(unix)]
    #[test]
    fn test_append_creates_private_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = db_path(&temp_dir);
        let mut store = BookmarkStore::load(&path).unwrap();
        store.append(Bookmark::from_line("https://a.com")).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_append_duplicate_leaves_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = db_path(&temp_dir);
        fs::write(&path, "https://a.com\n").unwrap();

        let mut store = BookmarkStore::load(&path).unwrap();
        let err = store.append(Bookmark::from_line("https://a.com")).unwrap_err();

        assert!(matches!(err, StoreError::Duplicate { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "https://a.com\n");
    }

    #[test]
    fn test_append_to_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join(".bookmark");
        let mut store = BookmarkStore::load(&path).unwrap();

        let err = store.append(Bookmark::from_line("https://a.com")).unwrap_err();
        assert!(matches!(err, StoreError::Open { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_is_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = BookmarkStore::load(db_path(&temp_dir)).unwrap();

        for url in ["https://c.com", "https://a.com", "http://z.com", "https://B.com"] {
            store.append(Bookmark::parse(url).unwrap()).unwrap();
        }

        assert_eq!(
            store.list(),
            vec![
                "http://z.com",
                "https://a.com",
                "https://b.com",
                "https://c.com"
            ]
        );
        let bookmarks: Vec<&str> = store.bookmarks().iter().map(|b| b.as_str()).collect();
        assert_eq!(bookmarks, store.list());
    }

    #[test]
    fn test_data_persists_across_reloads() {
        let temp_dir = TempDir::new().unwrap();
        let path = db_path(&temp_dir);
        let urls = ["https://three.com", "https://one.com", "https://two.com"];

        // One load per append, like separate invocations
        for url in urls {
            let mut store = BookmarkStore::load(&path).unwrap();
            store.append(Bookmark::parse(url).unwrap()).unwrap();
        }

        let store = BookmarkStore::load(&path).unwrap();
        assert_eq!(
            store.list(),
            vec!["https://one.com", "https://three.com", "https://two.com"]
        );
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 3);
    }
}
