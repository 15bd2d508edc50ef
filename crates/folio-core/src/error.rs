//! Error types shared across the folio crates.

use miette::Diagnostic;

/// Main error type for folio operations.
///
/// Format and serialization operations over in-memory blocks are total and
/// never produce one of these; errors come from the markdown front-end,
/// persistence IO, and JSON encoding.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum FolioError {
    /// Markdown front-end failure.
    #[error("markdown error: {0}")]
    #[diagnostic(code(folio::markdown))]
    Markdown(String),

    /// IO error from the page store.
    #[error(transparent)]
    #[diagnostic(code(folio::io))]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error(transparent)]
    #[diagnostic(code(folio::serde))]
    Json(#[from] serde_json::Error),

    /// A page id that is not present in the store.
    #[error("page not found: {0}")]
    #[diagnostic(code(folio::page_not_found))]
    PageNotFound(String),
}
