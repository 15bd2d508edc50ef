//! JSON-file page persistence.
//!
//! One [`PageStore`] owns one directory; each page is a `{id}.json` file.
//! The handle is constructed explicitly and injected where needed - there
//! is no ambient global connection. Writes are whole-snapshot: the core
//! hands over a complete serialized page and the store never reads back
//! into live editor state.

use std::fs;
use std::path::{Path, PathBuf};

use folio_core::{FolioError, Page};

/// Directory-backed page storage, keyed by page id and listed by
/// `updated_at`.
pub struct PageStore {
    root: PathBuf,
}

impl PageStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, FolioError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        tracing::debug!(root = %root.display(), "opened page store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn page_path(&self, id: &str) -> PathBuf {
        // ids are generated, but sanitize anyway so a hostile id cannot
        // escape the store directory
        let safe: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.root.join(format!("{safe}.json"))
    }

    /// Write a page snapshot, replacing any previous one.
    pub fn save_page(&self, page: &Page) -> Result<(), FolioError> {
        let path = self.page_path(&page.id);
        let json = serde_json::to_string_pretty(page)?;
        fs::write(&path, json)?;
        tracing::debug!(id = %page.id, path = %path.display(), "saved page");
        Ok(())
    }

    /// Load a page by id. A missing file is `Ok(None)`; a corrupt file is
    /// an error.
    pub fn get_page(&self, id: &str) -> Result<Option<Page>, FolioError> {
        let path = self.page_path(id);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Delete a page. Unknown ids error with
    /// [`FolioError::PageNotFound`].
    pub fn delete_page(&self, id: &str) -> Result<(), FolioError> {
        let path = self.page_path(id);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(id, "deleted page");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(FolioError::PageNotFound(id.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// All pages, most recently updated first.
    ///
    /// Unreadable entries are skipped with a warning rather than failing
    /// the whole listing.
    pub fn list_pages(&self) -> Result<Vec<Page>, FolioError> {
        let mut pages = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match fs::read_to_string(&path)
                .map_err(FolioError::from)
                .and_then(|json| serde_json::from_str::<Page>(&json).map_err(FolioError::from))
            {
                Ok(page) => pages.push(page),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "skipping unreadable page");
                }
            }
        }
        pages.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(pages)
    }

    /// Remove every page file in the store.
    pub fn clear(&self) -> Result<(), FolioError> {
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}
