use std::fmt::Write;

use super::SpanOutput;
use crate::format::{FormatKind, InlineFormat};

/// Renders format spans as Markdown markers (with inline HTML where
/// Markdown has no native syntax).
pub struct MarkdownSpanOutput<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownSpanOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SpanOutput for MarkdownSpanOutput<W> {
    type Error = std::fmt::Error;

    fn write_text(&mut self, text: &str) -> Result<(), Self::Error> {
        self.writer.write_str(text)
    }

    fn start_format(&mut self, format: &InlineFormat) -> Result<(), Self::Error> {
        match format.kind {
            FormatKind::Bold => write!(self.writer, "**"),
            FormatKind::Italic => write!(self.writer, "*"),
            FormatKind::Underline => write!(self.writer, "<u>"),
            FormatKind::Strikethrough => write!(self.writer, "~~"),
            FormatKind::Code => write!(self.writer, "`"),
            FormatKind::Highlight => write!(self.writer, "=="),
            FormatKind::Link => write!(self.writer, "["),
        }
    }

    fn end_format(&mut self, format: &InlineFormat) -> Result<(), Self::Error> {
        match format.kind {
            FormatKind::Bold => write!(self.writer, "**"),
            FormatKind::Italic => write!(self.writer, "*"),
            FormatKind::Underline => write!(self.writer, "</u>"),
            FormatKind::Strikethrough => write!(self.writer, "~~"),
            FormatKind::Code => write!(self.writer, "`"),
            FormatKind::Highlight => write!(self.writer, "=="),
            FormatKind::Link => write!(self.writer, "]({})", format.url().unwrap_or("#")),
        }
    }
}

/// Render `text` with `formats` applied as Markdown markers.
pub fn render_markdown_spans(
    text: &str,
    formats: &[InlineFormat],
) -> Result<String, std::fmt::Error> {
    let mut output = MarkdownSpanOutput::new(String::new());
    super::render_spans(text, formats, &mut output)?;
    Ok(output.into_inner())
}
