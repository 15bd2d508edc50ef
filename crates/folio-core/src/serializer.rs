//! Block → Markdown conversion.
//!
//! Each block contributes one line (or one fenced group of lines); lines
//! are joined with a single newline. Inline formats are re-rendered as
//! Markdown markers through [`crate::span::MarkdownSpanOutput`], so
//! `parse(serialize(blocks))` reproduces the block sequence for every
//! fully supported block kind.

use crate::block::{Block, BlockKind, ListKind};
use crate::span::render_markdown_spans;

/// Serialize an ordered block sequence to a Markdown string.
pub fn serialize_blocks_to_markdown(blocks: &[Block]) -> String {
    let mut lines: Vec<String> = Vec::new();
    for block in blocks {
        serialize_block(block, &mut lines);
    }
    lines.join("\n")
}

fn serialize_block(block: &Block, lines: &mut Vec<String>) {
    match block.kind {
        BlockKind::Paragraph => {
            if !block.content.is_empty() {
                lines.push(formatted_content(block));
            }
        }
        BlockKind::Heading => {
            if !block.content.is_empty() {
                let level = block.props.level.unwrap_or(1).clamp(1, 6) as usize;
                lines.push(format!(
                    "{} {}",
                    "#".repeat(level),
                    formatted_content(block)
                ));
            }
        }
        BlockKind::Code => {
            let language = block.props.language.as_deref().unwrap_or("plaintext");
            lines.push(format!("```{language}"));
            if !block.content.is_empty() {
                // fenced content is emitted raw, never format-escaped
                lines.push(block.content.clone());
            }
            lines.push("```".to_string());
        }
        BlockKind::Image => {
            if let Some(src) = block.props.src.as_deref().filter(|s| !s.is_empty()) {
                let alt = block.props.alt.as_deref().unwrap_or("");
                lines.push(format!("![{alt}]({src})"));
            }
        }
        BlockKind::Video => {
            if let Some(src) = block.props.src.as_deref().filter(|s| !s.is_empty()) {
                lines.push(format!("<video src=\"{src}\"></video>"));
            }
        }
        BlockKind::List => {
            if !block.content.is_empty() {
                let marker = match block.props.list_type.unwrap_or(ListKind::Unordered) {
                    ListKind::Ordered => "1.",
                    ListKind::Checklist => {
                        if block.props.checked == Some(true) {
                            "- [x]"
                        } else {
                            "- [ ]"
                        }
                    }
                    ListKind::Unordered => "-",
                };
                let pad = "  ".repeat(block.indent);
                lines.push(format!("{pad}{marker} {}", formatted_content(block)));
            }
        }
        BlockKind::Quote => {
            if !block.content.is_empty() {
                for line in formatted_content(block).lines() {
                    lines.push(format!("> {line}"));
                }
            }
        }
        BlockKind::Table => {
            // cell contents are not modeled; leave a marker instead of
            // dropping the block silently
            lines.push("<!-- Table -->".to_string());
        }
        BlockKind::Divider => lines.push("---".to_string()),
        BlockKind::Page => {
            let title = if block.content.is_empty() {
                "Untitled"
            } else {
                block.content.as_str()
            };
            lines.push(format!("[[{title}]]"));
        }
    }
}

fn formatted_content(block: &Block) -> String {
    render_markdown_spans(&block.content, &block.formats)
        .unwrap_or_else(|_| block.content.clone())
}
