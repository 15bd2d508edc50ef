use std::fmt::Write;

use super::SpanOutput;
use crate::format::{FormatKind, InlineFormat};

/// Renders format spans as HTML with text escaping.
pub struct HtmlSpanOutput<W: Write> {
    writer: W,
}

impl<W: Write> HtmlSpanOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Write `text` with HTML-significant characters escaped.
pub fn write_escaped<W: Write>(writer: &mut W, text: &str) -> std::fmt::Result {
    for c in text.chars() {
        match c {
            '&' => writer.write_str("&amp;")?,
            '<' => writer.write_str("&lt;")?,
            '>' => writer.write_str("&gt;")?,
            _ => writer.write_char(c)?,
        }
    }
    Ok(())
}

impl<W: Write> SpanOutput for HtmlSpanOutput<W> {
    type Error = std::fmt::Error;

    fn write_text(&mut self, text: &str) -> Result<(), Self::Error> {
        write_escaped(&mut self.writer, text)
    }

    fn start_format(&mut self, format: &InlineFormat) -> Result<(), Self::Error> {
        match format.kind {
            FormatKind::Bold => write!(self.writer, "<strong>"),
            FormatKind::Italic => write!(self.writer, "<em>"),
            FormatKind::Underline => write!(self.writer, "<u>"),
            FormatKind::Strikethrough => write!(self.writer, "<s>"),
            FormatKind::Code => write!(self.writer, "<code>"),
            FormatKind::Highlight => write!(self.writer, "<mark>"),
            FormatKind::Link => {
                write!(self.writer, "<a href=\"")?;
                for c in format.url().unwrap_or("#").chars() {
                    match c {
                        '"' => self.writer.write_str("%22")?,
                        _ => self.writer.write_char(c)?,
                    }
                }
                write!(self.writer, "\">")
            }
        }
    }

    fn end_format(&mut self, format: &InlineFormat) -> Result<(), Self::Error> {
        match format.kind {
            FormatKind::Bold => write!(self.writer, "</strong>"),
            FormatKind::Italic => write!(self.writer, "</em>"),
            FormatKind::Underline => write!(self.writer, "</u>"),
            FormatKind::Strikethrough => write!(self.writer, "</s>"),
            FormatKind::Code => write!(self.writer, "</code>"),
            FormatKind::Highlight => write!(self.writer, "</mark>"),
            FormatKind::Link => write!(self.writer, "</a>"),
        }
    }
}

/// Render `text` with `formats` applied as escaped HTML.
pub fn render_html_spans(
    text: &str,
    formats: &[InlineFormat],
) -> Result<String, std::fmt::Error> {
    let mut output = HtmlSpanOutput::new(String::new());
    super::render_spans(text, formats, &mut output)?;
    Ok(output.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::InlineFormat;

    #[test]
    fn test_bold_tag() {
        let formats = vec![InlineFormat::new(FormatKind::Bold, 0, 5)];
        let html = render_html_spans("hello world", &formats).unwrap();
        assert_eq!(html, "<strong>hello</strong> world");
    }

    #[test]
    fn test_text_is_escaped() {
        let html = render_html_spans("a < b & c", &[]).unwrap();
        assert_eq!(html, "a &lt; b &amp; c");
    }

    #[test]
    fn test_link_href() {
        let formats = vec![InlineFormat::link(6, 10, "https://example.com")];
        let html = render_html_spans("click here now", &formats).unwrap();
        assert_eq!(
            html,
            "click <a href=\"https://example.com\">here</a> now"
        );
    }

    #[test]
    fn test_href_quote_escaping() {
        let formats = vec![InlineFormat::link(0, 1, "https://x.com/\"q\"")];
        let html = render_html_spans("x", &formats).unwrap();
        assert_eq!(html, "<a href=\"https://x.com/%22q%22\">x</a>");
    }

    #[test]
    fn test_mark_tag() {
        let formats = vec![InlineFormat::new(FormatKind::Highlight, 0, 4)];
        let html = render_html_spans("note", &formats).unwrap();
        assert_eq!(html, "<mark>note</mark>");
    }
}
