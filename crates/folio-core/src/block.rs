//! The block data model shared by the parser, serializer, and editor.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::format::InlineFormat;
use crate::id;
use crate::offset;

/// The structural kind of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Paragraph,
    Heading,
    Code,
    Image,
    Video,
    List,
    Quote,
    Table,
    Divider,
    Page,
}

impl BlockKind {
    /// Whether blocks of this kind carry user text that can hold inline
    /// formats.
    pub fn is_text_bearing(self) -> bool {
        matches!(
            self,
            BlockKind::Paragraph
                | BlockKind::Heading
                | BlockKind::List
                | BlockKind::Quote
                | BlockKind::Page
        )
    }
}

/// How a list item is marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Ordered,
    Unordered,
    Checklist,
}

/// Kind-specific block attributes. Every field is optional; which ones are
/// meaningful depends on the owning block's kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockProps {
    /// Heading level, 1-6.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    /// List marker kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_type: Option<ListKind>,
    /// Checklist item state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    /// Code fence language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Image/video source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// Image alt text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Image caption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Table column count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,
    /// Table row count (excluding the header row).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    /// Indices of header rows in a table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<usize>>,
}

/// One structural unit of a document.
///
/// `content` is plain text; every format offset is bounded by its UTF-16
/// length. Blocks are created by the parser or the editor and mutated in
/// place by content edits and format operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: SmolStr,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formats: Vec<InlineFormat>,
    #[serde(default, skip_serializing_if = "BlockProps::is_default")]
    pub props: BlockProps,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub indent: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl BlockProps {
    fn is_default(&self) -> bool {
        *self == BlockProps::default()
    }
}

impl Block {
    pub fn new(kind: BlockKind, content: impl Into<String>) -> Self {
        Self {
            id: id::next_block_id(),
            kind,
            content: content.into(),
            formats: Vec::new(),
            props: BlockProps::default(),
            indent: 0,
        }
    }

    pub fn paragraph(content: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph, content)
    }

    pub fn heading(level: u8, content: impl Into<String>) -> Self {
        let mut block = Self::new(BlockKind::Heading, content);
        block.props.level = Some(level.clamp(1, 6));
        block
    }

    pub fn code(language: impl Into<String>, content: impl Into<String>) -> Self {
        let mut block = Self::new(BlockKind::Code, content);
        block.props.language = Some(language.into());
        block
    }

    pub fn quote(content: impl Into<String>) -> Self {
        Self::new(BlockKind::Quote, content)
    }

    pub fn list(kind: ListKind, content: impl Into<String>) -> Self {
        let mut block = Self::new(BlockKind::List, content);
        block.props.list_type = Some(kind);
        block
    }

    pub fn image(src: impl Into<String>, alt: impl Into<String>) -> Self {
        let mut block = Self::new(BlockKind::Image, "");
        block.props.src = Some(src.into());
        block.props.alt = Some(alt.into());
        block
    }

    pub fn divider() -> Self {
        Self::new(BlockKind::Divider, "")
    }

    pub fn with_formats(mut self, formats: Vec<InlineFormat>) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Content length in UTF-16 code units, the bound for format offsets.
    pub fn content_len(&self) -> usize {
        offset::utf16_len(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::InlineFormat;

    #[test]
    fn test_constructors() {
        let h = Block::heading(9, "too deep");
        assert_eq!(h.props.level, Some(6));

        let d = Block::divider();
        assert_eq!(d.kind, BlockKind::Divider);
        assert!(d.content.is_empty());
    }

    #[test]
    fn test_text_bearing() {
        assert!(BlockKind::Paragraph.is_text_bearing());
        assert!(BlockKind::List.is_text_bearing());
        assert!(!BlockKind::Image.is_text_bearing());
        assert!(!BlockKind::Divider.is_text_bearing());
        assert!(!BlockKind::Code.is_text_bearing());
    }

    #[test]
    fn test_json_shape() {
        let block = Block::paragraph("Hi")
            .with_formats(vec![InlineFormat::link(0, 2, "https://x.com")]);
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "paragraph");
        assert_eq!(json["content"], "Hi");
        assert_eq!(json["formats"][0]["type"], "link");
        assert_eq!(json["formats"][0]["data"]["url"], "https://x.com");
        // default props and indent are omitted from the wire shape
        assert!(json.get("props").is_none());
        assert!(json.get("indent").is_none());
    }

    #[test]
    fn test_list_props_round_trip() {
        let mut block = Block::list(ListKind::Checklist, "milk");
        block.props.checked = Some(true);
        let json = serde_json::to_string(&block).unwrap();
        let back: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(back.props.list_type, Some(ListKind::Checklist));
        assert_eq!(back.props.checked, Some(true));
    }

    #[test]
    fn test_content_len_is_utf16() {
        let block = Block::paragraph("a🌍b");
        assert_eq!(block.content_len(), 4);
    }
}
