//! Markdown → block conversion.
//!
//! Parsing walks the mdast tree produced by the `markdown` crate (GFM
//! options) and flattens it into an ordered block sequence. Inline
//! emphasis, links, and code become [`InlineFormat`] annotations over the
//! flattened text; inline HTML formatting tags and `==highlight==` markers
//! are recovered into the same UTF-16 offset space.

use markdown::mdast::{self, Node};
use markdown::ParseOptions;

use crate::block::{Block, BlockKind, ListKind};
use crate::error::FolioError;
use crate::format::{FormatData, FormatKind, InlineFormat};
use crate::node::format_for_tag;
use crate::offset::{byte_to_utf16, utf16_len};

/// Parse a Markdown string into an ordered block sequence.
///
/// Empty or whitespace-only input yields an empty vector; callers that
/// need a non-empty document substitute their own empty paragraph. If the
/// tree yields no blocks for non-empty input, the raw markdown is kept as
/// a single paragraph rather than silently dropped.
pub fn parse_markdown_to_blocks(source: &str) -> Result<Vec<Block>, FolioError> {
    if source.trim().is_empty() {
        return Ok(Vec::new());
    }

    let tree = markdown::to_mdast(source, &ParseOptions::gfm())
        .map_err(|message| FolioError::Markdown(message.to_string()))?;

    let mut blocks = Vec::new();
    if let Some(children) = tree.children() {
        for child in children {
            walk_node(child, 0, &mut blocks);
        }
    }

    if blocks.is_empty() {
        tracing::debug!("no blocks from non-empty markdown, keeping raw text");
        blocks.push(Block::paragraph(source));
    }

    Ok(blocks)
}

fn walk_node(node: &Node, indent: usize, blocks: &mut Vec<Block>) {
    match node {
        Node::Heading(heading) => {
            let (content, formats) = inline_content(&heading.children);
            blocks.push(
                Block::heading(heading.depth, content)
                    .with_formats(formats)
                    .with_indent(indent),
            );
        }
        Node::Paragraph(paragraph) => paragraph_blocks(paragraph, indent, blocks),
        Node::Code(code) => {
            let language = code
                .lang
                .clone()
                .filter(|lang| !lang.is_empty())
                .unwrap_or_else(|| "plaintext".to_string());
            blocks.push(Block::code(language, code.value.clone()).with_indent(indent));
        }
        Node::Blockquote(quote) => {
            let (content, formats) = flatten_children(&quote.children);
            blocks.push(
                Block::quote(content)
                    .with_formats(formats)
                    .with_indent(indent),
            );
        }
        Node::List(list) => list_blocks(list, indent, blocks),
        Node::ThematicBreak(_) => blocks.push(Block::divider().with_indent(indent)),
        Node::Table(table) => blocks.push(table_block(table, indent)),
        Node::Image(image) => blocks.push(image_block(image, indent)),
        Node::Html(html) => html_blocks(&html.value, indent, blocks),
        other => {
            // unknown constructs produce no block of their own, but their
            // children are still walked so nested content is not lost
            if let Some(children) = other.children() {
                for child in children {
                    walk_node(child, indent, blocks);
                }
            }
        }
    }
}

fn paragraph_blocks(paragraph: &mdast::Paragraph, indent: usize, blocks: &mut Vec<Block>) {
    // mdast nests images inside paragraphs; a lone image becomes an
    // image block
    if paragraph.children.len() == 1 {
        if let Node::Image(image) = &paragraph.children[0] {
            blocks.push(image_block(image, indent));
            return;
        }
    }

    if let Some(block) = video_paragraph(&paragraph.children, indent) {
        blocks.push(block);
        return;
    }

    let (content, formats) = inline_content(&paragraph.children);

    if let Some(block) = page_link_block(&content, &formats, indent) {
        blocks.push(block);
        return;
    }

    // soft line breaks separate blocks: the serializer joins blocks with a
    // single newline, so each line round-trips as its own paragraph
    if !content.contains('\n') {
        blocks.push(
            Block::paragraph(content)
                .with_formats(formats)
                .with_indent(indent),
        );
        return;
    }

    let mut line_start = 0;
    for line in content.split('\n') {
        let line_len = utf16_len(line);
        if !line.is_empty() {
            let line_end = line_start + line_len;
            let line_formats: Vec<InlineFormat> = formats
                .iter()
                .filter(|f| f.overlaps(line_start, line_end))
                .map(|f| {
                    let mut clipped = f.clone();
                    clipped.start = f.start.max(line_start) - line_start;
                    clipped.end = f.end.min(line_end) - line_start;
                    clipped
                })
                .filter(|f| !f.is_empty())
                .collect();
            blocks.push(
                Block::paragraph(line)
                    .with_formats(line_formats)
                    .with_indent(indent),
            );
        }
        line_start += line_len + 1;
    }
}

fn list_blocks(list: &mdast::List, indent: usize, blocks: &mut Vec<Block>) {
    for item in &list.children {
        let Node::ListItem(list_item) = item else {
            continue;
        };

        let kind = if list_item.checked.is_some() {
            ListKind::Checklist
        } else if list.ordered {
            ListKind::Ordered
        } else {
            ListKind::Unordered
        };

        let mut content = String::new();
        let mut formats = Vec::new();
        let mut nested = Vec::new();

        for child in &list_item.children {
            match child {
                Node::List(_) => nested.push(child),
                Node::Paragraph(p) => {
                    append_flattened(&mut content, &mut formats, inline_content(&p.children));
                }
                other => {
                    append_flattened(
                        &mut content,
                        &mut formats,
                        inline_content(std::slice::from_ref(other)),
                    );
                }
            }
        }

        let mut block = Block::list(kind, content)
            .with_formats(formats)
            .with_indent(indent);
        block.props.checked = list_item.checked;
        blocks.push(block);

        for child in nested {
            walk_node(child, indent + 1, blocks);
        }
    }
}

fn table_block(table: &mdast::Table, indent: usize) -> Block {
    let columns = match table.children.first() {
        Some(Node::TableRow(row)) => row.children.len(),
        _ => 0,
    };
    // cell contents are not modeled; the block records shape only
    let mut block = Block::new(BlockKind::Table, "").with_indent(indent);
    block.props.columns = Some(columns);
    block.props.rows = Some(table.children.len().saturating_sub(1));
    block
}

fn image_block(image: &mdast::Image, indent: usize) -> Block {
    let mut block = Block::image(image.url.clone(), image.alt.clone()).with_indent(indent);
    block.props.caption = image.title.clone();
    block
}

fn page_link_block(content: &str, formats: &[InlineFormat], indent: usize) -> Option<Block> {
    if !formats.is_empty() {
        return None;
    }
    let trimmed = content.trim();
    let inner = trimmed.strip_prefix("[[")?.strip_suffix("]]")?;
    if inner.is_empty() || inner.contains('\n') || inner.contains("]]") {
        return None;
    }
    Some(Block::new(BlockKind::Page, inner).with_indent(indent))
}

fn video_paragraph(children: &[Node], indent: usize) -> Option<Block> {
    // only a paragraph that is nothing but the video element converts;
    // video markup mixed into text is stripped like any other unknown tag
    let only_markup = children.iter().all(|child| match child {
        Node::Html(_) => true,
        Node::Text(text) => text.value.trim().is_empty(),
        _ => false,
    });
    if !only_markup {
        return None;
    }
    let Node::Html(html) = children.first()? else {
        return None;
    };
    let tag = parse_html_tag(&html.value)?;
    if tag.closing || tag.name != "video" {
        return None;
    }
    let src = attr_value(tag.attrs, "src")?;
    let mut block = Block::new(BlockKind::Video, "").with_indent(indent);
    block.props.src = Some(src);
    Some(block)
}

fn html_blocks(value: &str, indent: usize, blocks: &mut Vec<Block>) {
    let trimmed = value.trim();
    if trimmed.starts_with("<!--") {
        // comments (including the table placeholder) produce nothing
        return;
    }
    if let Some(tag) = parse_html_tag(trimmed) {
        if !tag.closing && tag.name == "video" {
            if let Some(src) = attr_value(tag.attrs, "src") {
                let mut block = Block::new(BlockKind::Video, "").with_indent(indent);
                block.props.src = Some(src);
                blocks.push(block);
            }
        }
    }
}

// === inline content extraction ===

#[derive(Default)]
struct InlineState {
    content: String,
    pos: usize,
    formats: Vec<InlineFormat>,
    open_tags: Vec<OpenTag>,
}

struct OpenTag {
    kind: FormatKind,
    start: usize,
    url: Option<String>,
}

impl InlineState {
    fn push_text(&mut self, text: &str) {
        self.content.push_str(text);
        self.pos += utf16_len(text);
    }

    fn push_format(&mut self, kind: FormatKind, start: usize, url: Option<String>) {
        if self.pos <= start {
            return;
        }
        self.formats.push(InlineFormat {
            kind,
            start,
            end: self.pos,
            data: url.map(|url| FormatData { url: Some(url) }),
        });
    }
}

/// Flatten inline children into plain text plus format annotations, both
/// in UTF-16 code units over the flattened stream.
fn inline_content(children: &[Node]) -> (String, Vec<InlineFormat>) {
    let mut state = InlineState::default();
    for child in children {
        visit_inline(child, &mut state);
    }
    if !state.open_tags.is_empty() {
        tracing::debug!(
            count = state.open_tags.len(),
            "discarding unclosed inline html tags"
        );
    }
    let mut formats = state.formats;
    formats.sort_by_key(|f| f.start);
    recover_highlights(state.content, formats)
}

fn visit_inline(node: &Node, state: &mut InlineState) {
    match node {
        Node::Text(text) => state.push_text(&text.value),
        Node::InlineCode(code) => {
            let start = state.pos;
            state.push_text(&code.value);
            state.push_format(FormatKind::Code, start, None);
        }
        Node::Strong(strong) => {
            let start = state.pos;
            for child in &strong.children {
                visit_inline(child, state);
            }
            state.push_format(FormatKind::Bold, start, None);
        }
        Node::Emphasis(emphasis) => {
            let start = state.pos;
            for child in &emphasis.children {
                visit_inline(child, state);
            }
            state.push_format(FormatKind::Italic, start, None);
        }
        Node::Delete(delete) => {
            let start = state.pos;
            for child in &delete.children {
                visit_inline(child, state);
            }
            state.push_format(FormatKind::Strikethrough, start, None);
        }
        Node::Link(link) => {
            let start = state.pos;
            for child in &link.children {
                visit_inline(child, state);
            }
            state.push_format(FormatKind::Link, start, Some(link.url.clone()));
        }
        Node::Html(html) => visit_inline_html(&html.value, state),
        Node::Break(_) => state.push_text("\n"),
        Node::Code(code) => state.push_text(&code.value),
        Node::Image(_) => {}
        other => {
            if let Some(children) = other.children() {
                for child in children {
                    visit_inline(child, state);
                }
            }
        }
    }
}

fn visit_inline_html(value: &str, state: &mut InlineState) {
    let trimmed = value.trim();
    if trimmed.starts_with("<!--") {
        return;
    }

    // a single node may carry a complete element when the source was
    // pasted as one run, e.g. `<u>plain</u>`
    if let Some((tag, inner)) = parse_full_element(trimmed) {
        let start = state.pos;
        state.push_text(&inner);
        if let Some(kind) = format_for_tag(&tag.name) {
            let url = match kind {
                FormatKind::Link => attr_value(tag.attrs, "href"),
                _ => None,
            };
            state.push_format(kind, start, url);
        }
        return;
    }

    let Some(tag) = parse_html_tag(trimmed) else {
        return;
    };
    let Some(kind) = format_for_tag(&tag.name) else {
        // unrecognized markup is stripped; its text arrives as sibling
        // text nodes
        return;
    };

    if tag.closing {
        if let Some(idx) = state.open_tags.iter().rposition(|open| open.kind == kind) {
            let open = state.open_tags.remove(idx);
            state.push_format(open.kind, open.start, open.url);
        }
    } else {
        let url = match kind {
            FormatKind::Link => attr_value(tag.attrs, "href"),
            _ => None,
        };
        state.open_tags.push(OpenTag {
            kind,
            start: state.pos,
            url,
        });
    }
}

/// Flatten a node sequence (e.g. a blockquote's paragraphs) into one
/// newline-joined text with rebased formats.
fn flatten_children(children: &[Node]) -> (String, Vec<InlineFormat>) {
    let mut content = String::new();
    let mut formats = Vec::new();
    for child in children {
        let part = match child {
            Node::Paragraph(p) => inline_content(&p.children),
            other => inline_content(std::slice::from_ref(other)),
        };
        append_flattened(&mut content, &mut formats, part);
    }
    (content, formats)
}

fn append_flattened(
    content: &mut String,
    formats: &mut Vec<InlineFormat>,
    part: (String, Vec<InlineFormat>),
) {
    let (text, part_formats) = part;
    if text.is_empty() {
        return;
    }
    if !content.is_empty() {
        content.push('\n');
    }
    let base = utf16_len(content);
    content.push_str(&text);
    formats.extend(part_formats.into_iter().map(|mut f| {
        f.start += base;
        f.end += base;
        f
    }));
}

// === highlight (`==text==`) recovery ===

/// Strip `==text==` marker pairs from flattened content, rebasing every
/// format offset and adding highlight formats over the inner spans.
fn recover_highlights(
    content: String,
    formats: Vec<InlineFormat>,
) -> (String, Vec<InlineFormat>) {
    let mut pairs = Vec::new();
    let mut search = 0;
    while let Some(rel) = content[search..].find("==") {
        let open = search + rel;
        let Some(rel_close) = content[open + 2..].find("==") else {
            break;
        };
        let close = open + 2 + rel_close;
        let inner = &content[open + 2..close];
        if !inner.is_empty() && !inner.contains('\n') {
            pairs.push((open, close));
            search = close + 2;
        } else {
            search = open + 2;
        }
    }

    if pairs.is_empty() {
        return (content, formats);
    }

    // marker positions in the original UTF-16 offset space, ascending
    let marker_starts: Vec<usize> = pairs
        .iter()
        .flat_map(|&(open, close)| {
            [
                byte_to_utf16(&content, open),
                byte_to_utf16(&content, close),
            ]
        })
        .collect();

    let map = |p: usize| -> usize {
        let mut pos = p;
        let mut shift = 0;
        for &marker in &marker_starts {
            if pos >= marker + 2 {
                shift += 2;
            } else {
                if pos > marker {
                    pos = marker;
                }
                break;
            }
        }
        pos - shift
    };

    let mut highlights = Vec::new();
    for &(open, close) in &pairs {
        let start = map(byte_to_utf16(&content, open) + 2);
        let end = map(byte_to_utf16(&content, close));
        if start < end {
            highlights.push(InlineFormat::new(FormatKind::Highlight, start, end));
        }
    }

    let mut stripped = String::with_capacity(content.len());
    let mut last = 0;
    for &(open, close) in &pairs {
        stripped.push_str(&content[last..open]);
        stripped.push_str(&content[open + 2..close]);
        last = close + 2;
    }
    stripped.push_str(&content[last..]);

    let mut result: Vec<InlineFormat> = formats
        .into_iter()
        .map(|mut f| {
            f.start = map(f.start);
            f.end = map(f.end);
            f
        })
        .filter(|f| !f.is_empty())
        .collect();
    result.extend(highlights);
    result.sort_by_key(|f| f.start);

    (stripped, result)
}

// === minimal inline-html tag scanning ===

struct RawTag<'a> {
    name: String,
    closing: bool,
    attrs: &'a str,
}

fn parse_html_tag(value: &str) -> Option<RawTag<'_>> {
    let trimmed = value.trim();
    let rest = trimmed.strip_prefix('<')?;
    let (closing, rest) = match rest.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, rest),
    };
    let end = rest.find('>')?;
    let inner = rest[..end].strip_suffix('/').unwrap_or(&rest[..end]);
    let name_len = inner
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .count();
    if name_len == 0 {
        return None;
    }
    Some(RawTag {
        name: inner[..name_len].to_ascii_lowercase(),
        closing,
        attrs: &inner[name_len..],
    })
}

fn parse_full_element(value: &str) -> Option<(RawTag<'_>, String)> {
    if !value.ends_with('>') {
        return None;
    }
    let tag = parse_html_tag(value)?;
    if tag.closing {
        return None;
    }
    let open_end = value.find('>')?;
    let close_start = value.rfind("</")?;
    if close_start <= open_end {
        return None;
    }
    let close_name = value[close_start + 2..value.len() - 1]
        .trim()
        .to_ascii_lowercase();
    if close_name != tag.name {
        return None;
    }
    let inner = &value[open_end + 1..close_start];
    if inner.contains('<') {
        return None;
    }
    Some((tag, decode_entities(inner)))
}

fn attr_value(attrs: &str, name: &str) -> Option<String> {
    let lower = attrs.to_ascii_lowercase();
    let needle = format!("{name}=");
    let idx = lower.find(&needle)?;
    let rest = attrs[idx + needle.len()..].trim_start();
    let mut chars = rest.chars();
    let value = match chars.next()? {
        quote @ ('"' | '\'') => {
            let rest = &rest[1..];
            &rest[..rest.find(quote)?]
        }
        _ => rest.split_whitespace().next()?,
    };
    Some(decode_entities(value))
}

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(idx) = rest.find('&') {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx..];
        let (replacement, consumed) = if tail.starts_with("&amp;") {
            ("&", 5)
        } else if tail.starts_with("&lt;") {
            ("<", 4)
        } else if tail.starts_with("&gt;") {
            (">", 4)
        } else if tail.starts_with("&quot;") {
            ("\"", 6)
        } else if tail.starts_with("&#39;") {
            ("'", 5)
        } else {
            ("&", 1)
        };
        out.push_str(replacement);
        rest = &tail[consumed..];
    }
    out.push_str(rest);
    out
}
