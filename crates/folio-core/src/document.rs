//! In-memory editor state over a block sequence.
//!
//! A `Document` is the transient projection of a page's markdown: blocks
//! in, edits applied in place, markdown back out. Access is single-writer;
//! callers sequence their own mutations and settle the markdown snapshot
//! after each batch.

use smol_str::SmolStr;

use crate::block::Block;
use crate::error::FolioError;
use crate::format::{
    self, shift_formats_for_splice, FormatData, FormatKind,
};
use crate::offset::{utf16_len, utf16_to_byte};
use crate::parser::parse_markdown_to_blocks;
use crate::serializer::serialize_blocks_to_markdown;

/// Editor state: an ordered block sequence plus the last settled markdown
/// snapshot used for change detection.
#[derive(Debug, Clone)]
pub struct Document {
    blocks: Vec<Block>,
    settled_markdown: String,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document: a single empty paragraph.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::paragraph("")],
            settled_markdown: String::new(),
        }
    }

    /// Build a document from persisted markdown.
    ///
    /// The parser returns no blocks for empty input; the document
    /// substitutes a single empty paragraph so there is always a block to
    /// focus.
    pub fn from_markdown(markdown: &str) -> Result<Self, FolioError> {
        let mut blocks = parse_markdown_to_blocks(markdown)?;
        if blocks.is_empty() {
            blocks.push(Block::paragraph(""));
        }
        Ok(Self {
            blocks,
            settled_markdown: markdown.to_string(),
        })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Replace the whole block sequence (e.g. after a paste or a view
    /// switch). An empty sequence is replaced by one empty paragraph.
    pub fn set_blocks(&mut self, blocks: Vec<Block>) {
        self.blocks = if blocks.is_empty() {
            vec![Block::paragraph("")]
        } else {
            blocks
        };
    }

    /// Serialize the current block sequence.
    pub fn to_markdown(&self) -> String {
        serialize_blocks_to_markdown(&self.blocks)
    }

    /// Whether the current blocks diverge from the last settled snapshot.
    pub fn is_dirty(&self) -> bool {
        self.to_markdown() != self.settled_markdown
    }

    /// Serialize and record the result as the settled snapshot, returning
    /// it for persistence.
    pub fn settle(&mut self) -> String {
        let markdown = self.to_markdown();
        self.settled_markdown = markdown.clone();
        markdown
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn block_index(&self, id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    /// Insert a new block at `index` (clamped), returning its id.
    pub fn insert_block(&mut self, index: usize, block: Block) -> SmolStr {
        let id = block.id.clone();
        let index = index.min(self.blocks.len());
        self.blocks.insert(index, block);
        id
    }

    /// Remove a block. The last block is replaced by an empty paragraph
    /// instead of leaving the document empty.
    pub fn remove_block(&mut self, id: &str) -> Option<Block> {
        let index = self.block_index(id)?;
        let removed = self.blocks.remove(index);
        if self.blocks.is_empty() {
            self.blocks.push(Block::paragraph(""));
        }
        Some(removed)
    }

    /// Splice a block's content: replace `deleted` code units at `at` with
    /// `text`, shifting the block's formats to match.
    pub fn splice_content(&mut self, id: &str, at: usize, deleted: usize, text: &str) -> bool {
        let Some(index) = self.block_index(id) else {
            return false;
        };
        let block = &mut self.blocks[index];

        let len = utf16_len(&block.content);
        let at = at.min(len);
        let deleted = deleted.min(len - at);

        let byte_start = utf16_to_byte(&block.content, at);
        let byte_end = utf16_to_byte(&block.content, at + deleted);
        block.content.replace_range(byte_start..byte_end, text);

        block.formats =
            shift_formats_for_splice(&block.formats, at, deleted, utf16_len(text));
        true
    }

    /// Merge a block into its predecessor (backspace at block start).
    ///
    /// The predecessor must be text-bearing; the merged block's formats
    /// are shifted past the predecessor's content. Returns the caret
    /// offset at the join point.
    pub fn merge_into_previous(&mut self, id: &str) -> Option<usize> {
        let index = self.block_index(id)?;
        if index == 0 {
            return None;
        }
        if !self.blocks[index - 1].kind.is_text_bearing()
            || !self.blocks[index].kind.is_text_bearing()
        {
            return None;
        }

        let merged = self.blocks.remove(index);
        let target = &mut self.blocks[index - 1];
        let join = utf16_len(&target.content);

        target.content.push_str(&merged.content);
        target
            .formats
            .extend(merged.formats.into_iter().map(|mut f| {
                f.start += join;
                f.end += join;
                f
            }));
        Some(join)
    }

    /// Apply `kind` over a selection in one block.
    pub fn apply_format(
        &mut self,
        id: &str,
        start: usize,
        end: usize,
        kind: FormatKind,
        data: Option<FormatData>,
    ) -> bool {
        self.with_text_block(id, |block| {
            block.formats = format::apply_format(&block.formats, start, end, kind, data);
        })
    }

    /// Toggle `kind` over a selection in one block.
    pub fn toggle_format(
        &mut self,
        id: &str,
        start: usize,
        end: usize,
        kind: FormatKind,
        data: Option<FormatData>,
    ) -> bool {
        self.with_text_block(id, |block| {
            block.formats = format::toggle_format(&block.formats, start, end, kind, data);
        })
    }

    fn with_text_block(&mut self, id: &str, apply: impl FnOnce(&mut Block)) -> bool {
        match self.block_index(id) {
            Some(index) if self.blocks[index].kind.is_text_bearing() => {
                apply(&mut self.blocks[index]);
                true
            }
            _ => false,
        }
    }
}
