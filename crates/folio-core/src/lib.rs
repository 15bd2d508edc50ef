//! folio-core: block–Markdown conversion logic without framework dependencies.
//!
//! This crate provides:
//! - `Block` and `InlineFormat` - the typed block model with positional
//!   inline-format annotations
//! - `parse_markdown_to_blocks` / `serialize_blocks_to_markdown` - the
//!   bidirectional Markdown mapping
//! - `FormatNode` - a render-tree bridge between formats and editable
//!   rich-text surfaces
//! - `Document` - in-memory editor state over a block sequence

pub mod block;
pub mod document;
pub mod error;
pub mod format;
pub mod id;
pub mod node;
pub mod offset;
pub mod page;
pub mod parser;
pub mod render;
pub mod serializer;
pub mod span;

pub use block::{Block, BlockKind, BlockProps, ListKind};
pub use document::Document;
pub use error::FolioError;
pub use format::{
    apply_format, formats_at_position, remove_format, shift_formats_for_splice, toggle_format,
    FormatData, FormatKind, InlineFormat,
};
pub use node::{apply_formats_to_nodes, extract_formats_from_nodes, FormatNode};
pub use page::Page;
pub use parser::parse_markdown_to_blocks;
pub use render::render_blocks_to_html;
pub use serializer::serialize_blocks_to_markdown;
pub use smol_str::SmolStr;
