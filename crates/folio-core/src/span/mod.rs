//! Format-span rendering over block content.
//!
//! [`render_spans`] slices content into the minimal set of format-bounded
//! segments and drives a [`SpanOutput`] with them. Each segment carries at
//! most one format (the format model keeps intervals non-overlapping), so
//! outputs never have to manage nesting.

mod html_output;
mod markdown_output;

pub use html_output::{render_html_spans, write_escaped, HtmlSpanOutput};
pub use markdown_output::{render_markdown_spans, MarkdownSpanOutput};

use crate::format::{clamp_formats, InlineFormat};
use crate::offset::{slice_utf16, utf16_len};

/// Sink for formatted text segments.
pub trait SpanOutput {
    type Error;

    /// Write a run of plain text.
    fn write_text(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Open the marker for `format`.
    fn start_format(&mut self, format: &InlineFormat) -> Result<(), Self::Error>;

    /// Close the marker for `format`.
    fn end_format(&mut self, format: &InlineFormat) -> Result<(), Self::Error>;
}

/// Walk `content` in format-segment order, emitting into `output`.
///
/// Formats are clamped to the content length and visited sorted by start.
/// A format starting before the previous one ended is clipped to the
/// uncovered remainder, so the concatenated text written to the output
/// always reconstructs `content` exactly.
pub fn render_spans<O: SpanOutput>(
    content: &str,
    formats: &[InlineFormat],
    output: &mut O,
) -> Result<(), O::Error> {
    let len = utf16_len(content);
    let mut sorted = clamp_formats(formats, len);
    sorted.sort_by_key(|f| f.start);

    let mut pos = 0;
    for format in &sorted {
        let start = format.start.max(pos);
        let end = format.end;
        if start >= end {
            continue;
        }

        if start > pos {
            output.write_text(slice_utf16(content, pos, start))?;
        }

        output.start_format(format)?;
        output.write_text(slice_utf16(content, start, end))?;
        output.end_format(format)?;
        pos = end;
    }

    if pos < len {
        output.write_text(slice_utf16(content, pos, len))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{FormatKind, InlineFormat};

    struct TestOutput {
        buffer: String,
    }

    impl TestOutput {
        fn new() -> Self {
            Self {
                buffer: String::new(),
            }
        }
    }

    impl SpanOutput for TestOutput {
        type Error = std::fmt::Error;

        fn write_text(&mut self, text: &str) -> Result<(), Self::Error> {
            self.buffer.push_str(text);
            Ok(())
        }

        fn start_format(&mut self, format: &InlineFormat) -> Result<(), Self::Error> {
            match format.kind {
                FormatKind::Bold => self.buffer.push_str("<b>"),
                FormatKind::Italic => self.buffer.push_str("<i>"),
                _ => self.buffer.push_str("<?>"),
            }
            Ok(())
        }

        fn end_format(&mut self, format: &InlineFormat) -> Result<(), Self::Error> {
            match format.kind {
                FormatKind::Bold => self.buffer.push_str("</b>"),
                FormatKind::Italic => self.buffer.push_str("</i>"),
                _ => self.buffer.push_str("</?>"),
            }
            Ok(())
        }
    }

    #[test]
    fn test_simple_bold() {
        let formats = vec![InlineFormat::new(FormatKind::Bold, 0, 5)];
        let mut output = TestOutput::new();
        render_spans("hello world", &formats, &mut output).unwrap();
        assert_eq!(output.buffer, "<b>hello</b> world");
    }

    #[test]
    fn test_no_formats() {
        let mut output = TestOutput::new();
        render_spans("plain text", &[], &mut output).unwrap();
        assert_eq!(output.buffer, "plain text");
    }

    #[test]
    fn test_adjacent_segments() {
        let formats = vec![
            InlineFormat::new(FormatKind::Bold, 0, 4),
            InlineFormat::new(FormatKind::Italic, 4, 8),
        ];
        let mut output = TestOutput::new();
        render_spans("boldital trailing", &formats, &mut output).unwrap();
        assert_eq!(output.buffer, "<b>bold</b><i>ital</i> trailing");
    }

    #[test]
    fn test_out_of_range_end_is_clamped() {
        let formats = vec![InlineFormat::new(FormatKind::Bold, 6, 100)];
        let mut output = TestOutput::new();
        render_spans("hello world", &formats, &mut output).unwrap();
        assert_eq!(output.buffer, "hello <b>world</b>");
    }

    #[test]
    fn test_overlap_clipped_text_not_duplicated() {
        // overlapping intervals cannot come out of apply_format, but the
        // walker still must not emit the same text twice
        let formats = vec![
            InlineFormat::new(FormatKind::Bold, 0, 6),
            InlineFormat::new(FormatKind::Italic, 3, 9),
        ];
        let mut output = TestOutput::new();
        render_spans("abcdefghi", &formats, &mut output).unwrap();
        assert_eq!(output.buffer, "<b>abcdef</b><i>ghi</i>");
    }

    #[test]
    fn test_utf16_segmentation() {
        // "🌍" occupies two code units; the format covers it exactly
        let formats = vec![InlineFormat::new(FormatKind::Bold, 1, 3)];
        let mut output = TestOutput::new();
        render_spans("a🌍b", &formats, &mut output).unwrap();
        assert_eq!(output.buffer, "a<b>🌍</b>b");
    }
}
