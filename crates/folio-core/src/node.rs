//! Bridge between inline formats and a rendered rich-text node tree.
//!
//! An editable surface renders a block as interleaved text runs and tagged
//! wrapper elements; this module is the pure model of that tree. Offsets
//! are measured exactly as a browser `Range`'s `toString().length` would
//! report them: a running total of UTF-16 code units over the text content
//! preceding a node in document order. Any producer/consumer honoring that
//! rule (a DOM adapter, a test harness) interoperates with the format
//! model without further conversion.

use smol_str::SmolStr;

use crate::format::{clamp_formats, FormatData, FormatKind, InlineFormat};
use crate::offset::{slice_utf16, utf16_len};

/// One node of a rendered rich-text region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatNode {
    /// A plain text run.
    Text(String),
    /// A wrapper element with a lowercase tag name.
    Element {
        tag: SmolStr,
        attrs: Vec<(SmolStr, String)>,
        children: Vec<FormatNode>,
    },
}

impl FormatNode {
    pub fn text(value: impl Into<String>) -> Self {
        FormatNode::Text(value.into())
    }

    pub fn element(tag: impl Into<SmolStr>, children: Vec<FormatNode>) -> Self {
        FormatNode::Element {
            tag: tag.into(),
            attrs: Vec::new(),
            children,
        }
    }

    pub fn element_with_attr(
        tag: impl Into<SmolStr>,
        attr: (impl Into<SmolStr>, impl Into<String>),
        children: Vec<FormatNode>,
    ) -> Self {
        FormatNode::Element {
            tag: tag.into(),
            attrs: vec![(attr.0.into(), attr.1.into())],
            children,
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        match self {
            FormatNode::Text(t) => t.clone(),
            FormatNode::Element { children, .. } => {
                children.iter().map(FormatNode::text_content).collect()
            }
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        match self {
            FormatNode::Text(_) => None,
            FormatNode::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
        }
    }
}

/// The wrapper tag an editable surface uses for each format kind.
pub fn tag_for_format(kind: FormatKind) -> &'static str {
    match kind {
        FormatKind::Bold => "strong",
        FormatKind::Italic => "em",
        FormatKind::Underline => "u",
        FormatKind::Strikethrough => "s",
        FormatKind::Code => "code",
        FormatKind::Link => "a",
        FormatKind::Highlight => "mark",
    }
}

/// The format kind a wrapper tag maps back to, including the alternate
/// spellings editable surfaces produce.
pub fn format_for_tag(tag: &str) -> Option<FormatKind> {
    match tag {
        "strong" | "b" => Some(FormatKind::Bold),
        "em" | "i" => Some(FormatKind::Italic),
        "u" => Some(FormatKind::Underline),
        "s" | "strike" | "del" => Some(FormatKind::Strikethrough),
        "code" => Some(FormatKind::Code),
        "a" => Some(FormatKind::Link),
        "mark" => Some(FormatKind::Highlight),
        _ => None,
    }
}

/// Render `content` with `formats` as a node list whose concatenated text
/// reconstructs `content` exactly. Formats with out-of-range ends are
/// clamped; zero-width formats are dropped.
pub fn apply_formats_to_nodes(content: &str, formats: &[InlineFormat]) -> Vec<FormatNode> {
    if formats.is_empty() {
        if content.is_empty() {
            return Vec::new();
        }
        return vec![FormatNode::text(content)];
    }

    let len = utf16_len(content);
    let mut sorted = clamp_formats(formats, len);
    sorted.sort_by_key(|f| f.start);

    let mut nodes = Vec::new();
    let mut pos = 0;

    for format in &sorted {
        let start = format.start.max(pos);
        let end = format.end;
        if start >= end {
            continue;
        }

        if start > pos {
            nodes.push(FormatNode::text(slice_utf16(content, pos, start)));
        }

        let inner = vec![FormatNode::text(slice_utf16(content, start, end))];
        let node = match format.kind {
            FormatKind::Link => FormatNode::element_with_attr(
                "a",
                ("href", format.url().unwrap_or("#")),
                inner,
            ),
            kind => FormatNode::element(tag_for_format(kind), inner),
        };
        nodes.push(node);
        pos = end;
    }

    if pos < len {
        nodes.push(FormatNode::text(slice_utf16(content, pos, len)));
    }

    nodes
}

/// Walk a rendered node list in document order and recover the format
/// annotations it encodes.
///
/// Each recognized wrapper spans `[offset-before-it, offset-before-it +
/// its text length)`. Unrecognized elements contribute their text but no
/// format; a node that cannot be measured is skipped rather than allowed
/// to abort extraction.
pub fn extract_formats_from_nodes(nodes: &[FormatNode]) -> Vec<InlineFormat> {
    let mut formats = Vec::new();
    let mut pos = 0;
    walk(nodes, &mut pos, &mut formats);
    formats
}

fn walk(nodes: &[FormatNode], pos: &mut usize, formats: &mut Vec<InlineFormat>) {
    for node in nodes {
        match node {
            FormatNode::Text(t) => *pos += utf16_len(t),
            FormatNode::Element { tag, children, .. } => {
                let text = node.text_content();
                if !text.is_empty() {
                    if let Some(kind) = format_for_tag(tag) {
                        let start = *pos;
                        let end = start + utf16_len(&text);
                        let data = match kind {
                            FormatKind::Link => node.attr("href").map(|href| FormatData {
                                url: Some(href.to_string()),
                            }),
                            _ => None,
                        };
                        formats.push(InlineFormat {
                            kind,
                            start,
                            end,
                            data,
                        });
                    }
                } else if format_for_tag(tag).is_some() {
                    tracing::warn!(tag = %tag, "skipping empty format wrapper");
                }
                walk(children, pos, formats);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_plain_content() {
        let nodes = apply_formats_to_nodes("hello", &[]);
        assert_eq!(nodes, vec![FormatNode::text("hello")]);
    }

    #[test]
    fn test_apply_interleaves_text_and_wrappers() {
        let formats = vec![InlineFormat::new(FormatKind::Bold, 6, 10)];
        let nodes = apply_formats_to_nodes("World bold text", &formats);
        assert_eq!(
            nodes,
            vec![
                FormatNode::text("World "),
                FormatNode::element("strong", vec![FormatNode::text("bold")]),
                FormatNode::text(" text"),
            ]
        );
    }

    #[test]
    fn test_apply_reconstructs_content() {
        let content = "one two three";
        let formats = vec![
            InlineFormat::new(FormatKind::Italic, 0, 3),
            InlineFormat::link(4, 7, "https://x.com"),
            InlineFormat::new(FormatKind::Code, 8, 13),
        ];
        let nodes = apply_formats_to_nodes(content, &formats);
        let text: String = nodes.iter().map(FormatNode::text_content).collect();
        assert_eq!(text, content);
    }

    #[test]
    fn test_apply_clamps_out_of_range() {
        let formats = vec![InlineFormat::new(FormatKind::Bold, 3, 99)];
        let nodes = apply_formats_to_nodes("abcdef", &formats);
        let text: String = nodes.iter().map(FormatNode::text_content).collect();
        assert_eq!(text, "abcdef");
        assert_eq!(
            nodes[1],
            FormatNode::element("strong", vec![FormatNode::text("def")])
        );
    }

    #[test]
    fn test_extract_simple() {
        let nodes = vec![
            FormatNode::text("World "),
            FormatNode::element("strong", vec![FormatNode::text("bold")]),
            FormatNode::text(" text"),
        ];
        let formats = extract_formats_from_nodes(&nodes);
        assert_eq!(formats, vec![InlineFormat::new(FormatKind::Bold, 6, 10)]);
    }

    #[test]
    fn test_extract_alternate_tags() {
        let nodes = vec![
            FormatNode::element("b", vec![FormatNode::text("x")]),
            FormatNode::element("i", vec![FormatNode::text("y")]),
            FormatNode::element("strike", vec![FormatNode::text("z")]),
        ];
        let formats = extract_formats_from_nodes(&nodes);
        assert_eq!(
            formats,
            vec![
                InlineFormat::new(FormatKind::Bold, 0, 1),
                InlineFormat::new(FormatKind::Italic, 1, 2),
                InlineFormat::new(FormatKind::Strikethrough, 2, 3),
            ]
        );
    }

    #[test]
    fn test_extract_link_href() {
        let nodes = vec![FormatNode::element_with_attr(
            "a",
            ("href", "https://x.com"),
            vec![FormatNode::text("Hi")],
        )];
        let formats = extract_formats_from_nodes(&nodes);
        assert_eq!(formats, vec![InlineFormat::link(0, 2, "https://x.com")]);
    }

    #[test]
    fn test_extract_recurses_unrecognized_wrappers() {
        // a span contributes its text but no format; the nested em is
        // still recovered at the right offset
        let nodes = vec![
            FormatNode::text("ab"),
            FormatNode::element(
                "span",
                vec![
                    FormatNode::text("cd"),
                    FormatNode::element("em", vec![FormatNode::text("ef")]),
                ],
            ),
        ];
        let formats = extract_formats_from_nodes(&nodes);
        assert_eq!(formats, vec![InlineFormat::new(FormatKind::Italic, 4, 6)]);
    }

    #[test]
    fn test_round_trip() {
        let content = "plain bold linked mark";
        let original = vec![
            InlineFormat::new(FormatKind::Bold, 6, 10),
            InlineFormat::link(11, 17, "https://x.com"),
            InlineFormat::new(FormatKind::Highlight, 18, 22),
        ];
        let nodes = apply_formats_to_nodes(content, &original);
        let extracted = extract_formats_from_nodes(&nodes);
        assert_eq!(extracted, original);
    }

    #[test]
    fn test_round_trip_utf16_offsets() {
        let content = "a🌍 bold";
        let original = vec![InlineFormat::new(FormatKind::Bold, 4, 8)];
        let nodes = apply_formats_to_nodes(content, &original);
        let extracted = extract_formats_from_nodes(&nodes);
        assert_eq!(extracted, original);
    }
}
