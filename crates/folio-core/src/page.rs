//! The persisted page record.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::id;

/// One note page. `markdown` is the single persisted source of truth; the
/// block sequence is a transient projection reconstructed from it on load.
/// `title` is independent metadata, not derived from the markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: SmolStr,
    pub title: String,
    pub markdown: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
    /// Milliseconds since the Unix epoch.
    pub updated_at: u64,
}

impl Page {
    /// Create an empty page with fresh timestamps.
    pub fn new(title: impl Into<String>) -> Self {
        let now = id::now_ms();
        Self {
            id: id::next_page_id(),
            title: title.into(),
            markdown: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the markdown snapshot and bump `updated_at`.
    pub fn set_markdown(&mut self, markdown: impl Into<String>) {
        self.markdown = markdown.into();
        self.touch();
    }

    /// Rename the page and bump `updated_at`.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    /// Bump `updated_at` to now.
    pub fn touch(&mut self) {
        self.updated_at = id::now_ms();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_page_timestamps() {
        let page = Page::new("Notes");
        assert_eq!(page.created_at, page.updated_at);
        assert!(page.markdown.is_empty());
    }

    #[test]
    fn test_set_markdown_touches() {
        let mut page = Page::new("Notes");
        let created = page.created_at;
        page.set_markdown("# Hello");
        assert_eq!(page.markdown, "# Hello");
        assert!(page.updated_at >= created);
    }

    #[test]
    fn test_json_shape() {
        let page = Page::new("Notes");
        let json = serde_json::to_value(&page).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }
}
