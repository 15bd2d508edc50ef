//! Static HTML rendering of a block sequence.
//!
//! This is a read-only projection for previews and exports; the editable
//! surface works from [`crate::node`] instead.

use std::fmt::Write;

use crate::block::{Block, BlockKind, ListKind};
use crate::span::{render_html_spans, write_escaped};

/// Render blocks as an HTML fragment.
pub fn render_blocks_to_html(blocks: &[Block]) -> String {
    let mut html = String::new();
    let mut open_list: Option<ListKind> = None;

    for block in blocks {
        let next_list = match block.kind {
            BlockKind::List => block.props.list_type.or(Some(ListKind::Unordered)),
            _ => None,
        };
        if open_list != next_list {
            if let Some(kind) = open_list.take() {
                html.push_str(close_list_tag(kind));
            }
            if let Some(kind) = next_list {
                html.push_str(open_list_tag(kind));
                open_list = Some(kind);
            }
        }
        render_block(&mut html, block);
    }

    if let Some(kind) = open_list {
        html.push_str(close_list_tag(kind));
    }

    html
}

fn open_list_tag(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Ordered => "<ol>\n",
        ListKind::Unordered => "<ul>\n",
        ListKind::Checklist => "<ul class=\"checklist\">\n",
    }
}

fn close_list_tag(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Ordered => "</ol>\n",
        _ => "</ul>\n",
    }
}

fn render_block(html: &mut String, block: &Block) {
    match block.kind {
        BlockKind::Paragraph => {
            html.push_str("<p>");
            html.push_str(&spans(block));
            html.push_str("</p>\n");
        }
        BlockKind::Heading => {
            let level = block.props.level.unwrap_or(1).clamp(1, 6);
            let _ = write!(html, "<h{level}>");
            html.push_str(&spans(block));
            let _ = write!(html, "</h{level}>\n");
        }
        BlockKind::Code => {
            html.push_str("<pre><code");
            if let Some(lang) = block.props.language.as_deref() {
                html.push_str(" class=\"language-");
                let _ = write_escaped(html, lang);
                html.push('"');
            }
            html.push('>');
            let _ = write_escaped(html, &block.content);
            html.push_str("</code></pre>\n");
        }
        BlockKind::Quote => {
            html.push_str("<blockquote>");
            html.push_str(&spans(block));
            html.push_str("</blockquote>\n");
        }
        BlockKind::List => {
            let checkbox = match (block.props.list_type, block.props.checked) {
                (Some(ListKind::Checklist), Some(true)) => {
                    "<input type=\"checkbox\" checked disabled /> "
                }
                (Some(ListKind::Checklist), _) => "<input type=\"checkbox\" disabled /> ",
                _ => "",
            };
            html.push_str("<li>");
            html.push_str(checkbox);
            html.push_str(&spans(block));
            html.push_str("</li>\n");
        }
        BlockKind::Image => {
            if let Some(src) = block.props.src.as_deref().filter(|s| !s.is_empty()) {
                html.push_str("<figure><img src=\"");
                let _ = write_escaped(html, src);
                html.push('"');
                if let Some(alt) = block.props.alt.as_deref() {
                    html.push_str(" alt=\"");
                    let _ = write_escaped(html, alt);
                    html.push('"');
                }
                html.push_str(" />");
                if let Some(caption) = block.props.caption.as_deref() {
                    html.push_str("<figcaption>");
                    let _ = write_escaped(html, caption);
                    html.push_str("</figcaption>");
                }
                html.push_str("</figure>\n");
            }
        }
        BlockKind::Video => {
            if let Some(src) = block.props.src.as_deref().filter(|s| !s.is_empty()) {
                html.push_str("<video src=\"");
                let _ = write_escaped(html, src);
                html.push_str("\" controls></video>\n");
            }
        }
        BlockKind::Divider => html.push_str("<hr />\n"),
        BlockKind::Table => html.push_str("<!-- table -->\n"),
        BlockKind::Page => {
            html.push_str("<div class=\"page-ref\">[[");
            let _ = write_escaped(html, &block.content);
            html.push_str("]]</div>\n");
        }
    }
}

fn spans(block: &Block) -> String {
    render_html_spans(&block.content, &block.formats).unwrap_or_else(|_| {
        let mut escaped = String::new();
        let _ = write_escaped(&mut escaped, &block.content);
        escaped
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{FormatKind, InlineFormat};

    #[test]
    fn test_paragraph_with_format() {
        let block = Block::paragraph("World bold text")
            .with_formats(vec![InlineFormat::new(FormatKind::Bold, 6, 10)]);
        let html = render_blocks_to_html(&[block]);
        assert_eq!(html, "<p>World <strong>bold</strong> text</p>\n");
    }

    #[test]
    fn test_heading_level() {
        let html = render_blocks_to_html(&[Block::heading(2, "Sub")]);
        assert_eq!(html, "<h2>Sub</h2>\n");
    }

    #[test]
    fn test_code_escapes() {
        let html = render_blocks_to_html(&[Block::code("rust", "if a < b {}")]);
        assert_eq!(
            html,
            "<pre><code class=\"language-rust\">if a &lt; b {}</code></pre>\n"
        );
    }

    #[test]
    fn test_consecutive_list_items_grouped() {
        let blocks = vec![
            Block::list(ListKind::Unordered, "a"),
            Block::list(ListKind::Unordered, "b"),
            Block::paragraph("after"),
        ];
        let html = render_blocks_to_html(&blocks);
        assert_eq!(
            html,
            "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n<p>after</p>\n"
        );
    }

    #[test]
    fn test_list_kind_change_closes_group() {
        let blocks = vec![
            Block::list(ListKind::Unordered, "a"),
            Block::list(ListKind::Ordered, "b"),
        ];
        let html = render_blocks_to_html(&blocks);
        assert_eq!(html, "<ul>\n<li>a</li>\n</ul>\n<ol>\n<li>b</li>\n</ol>\n");
    }

    #[test]
    fn test_divider_and_image() {
        let blocks = vec![Block::divider(), Block::image("https://x.com/p.png", "pic")];
        let html = render_blocks_to_html(&blocks);
        assert_eq!(
            html,
            "<hr />\n<figure><img src=\"https://x.com/p.png\" alt=\"pic\" /></figure>\n"
        );
    }

    #[test]
    fn test_checklist_checkbox() {
        let mut block = Block::list(ListKind::Checklist, "done");
        block.props.checked = Some(true);
        let html = render_blocks_to_html(&[block]);
        assert_eq!(
            html,
            "<ul class=\"checklist\">\n<li><input type=\"checkbox\" checked disabled /> done</li>\n</ul>\n"
        );
    }
}
