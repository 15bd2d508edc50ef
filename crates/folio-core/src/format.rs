//! Inline format annotations and the operations the editor applies to them.
//!
//! A format marks a half-open `[start, end)` interval of a block's content,
//! in UTF-16 code units (see [`crate::offset`]). Formats do not own text;
//! they are derived annotations that must be shifted whenever the content
//! is spliced.

use serde::{Deserialize, Serialize};

/// The kind of inline styling a format applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
    Link,
    Highlight,
}

/// Extra payload carried by a format. Only links populate `url`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// One inline-format annotation over a block's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineFormat {
    #[serde(rename = "type")]
    pub kind: FormatKind,
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<FormatData>,
}

impl InlineFormat {
    pub fn new(kind: FormatKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            start,
            end,
            data: None,
        }
    }

    /// Create a link format pointing at `url`.
    pub fn link(start: usize, end: usize, url: impl Into<String>) -> Self {
        Self {
            kind: FormatKind::Link,
            start,
            end,
            data: Some(FormatData {
                url: Some(url.into()),
            }),
        }
    }

    /// The link target, if this is a link format with one.
    pub fn url(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.url.as_deref())
    }

    /// Whether this format's interval intersects `[start, end)`.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && self.end > start
    }

    /// Whether this format's interval fully contains `[start, end)`.
    pub fn covers(&self, start: usize, end: usize) -> bool {
        self.start <= start && self.end >= end
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Apply `kind` over `[start, end)`, evicting every overlapping format first.
///
/// Zero-width selections are a no-op. The result is sorted ascending by
/// start. Because any overlapping format is removed regardless of kind, a
/// given sub-span carries at most one format at a time.
pub fn apply_format(
    formats: &[InlineFormat],
    start: usize,
    end: usize,
    kind: FormatKind,
    data: Option<FormatData>,
) -> Vec<InlineFormat> {
    if start == end {
        return formats.to_vec();
    }

    let mut result: Vec<InlineFormat> = formats
        .iter()
        .filter(|f| !f.overlaps(start, end))
        .cloned()
        .collect();

    result.push(InlineFormat {
        kind,
        start,
        end,
        data,
    });
    result.sort_by_key(|f| f.start);
    result
}

/// Drop formats overlapping `[start, end)`.
///
/// With `kind` given, only formats of that kind are dropped; without it,
/// every overlapping format goes. Surviving formats keep their offsets:
/// removal never touches the content, so there is nothing to shift.
pub fn remove_format(
    formats: &[InlineFormat],
    start: usize,
    end: usize,
    kind: Option<FormatKind>,
) -> Vec<InlineFormat> {
    formats
        .iter()
        .filter(|f| {
            if let Some(kind) = kind {
                if f.kind != kind {
                    return true;
                }
            }
            !f.overlaps(start, end)
        })
        .cloned()
        .collect()
}

/// Toggle `kind` over `[start, end)`: remove it if the span is already
/// fully covered by a format of that kind, apply it otherwise.
pub fn toggle_format(
    formats: &[InlineFormat],
    start: usize,
    end: usize,
    kind: FormatKind,
    data: Option<FormatData>,
) -> Vec<InlineFormat> {
    if start == end {
        return formats.to_vec();
    }

    let covered = formats
        .iter()
        .any(|f| f.kind == kind && f.covers(start, end));

    if covered {
        remove_format(formats, start, end, Some(kind))
    } else {
        apply_format(formats, start, end, kind, data)
    }
}

/// Formats whose interval contains `pos` (`start <= pos < end`).
pub fn formats_at_position(formats: &[InlineFormat], pos: usize) -> Vec<InlineFormat> {
    formats
        .iter()
        .filter(|f| f.start <= pos && f.end > pos)
        .cloned()
        .collect()
}

/// Shift formats across a content splice replacing `deleted` code units at
/// `at` with `inserted` code units.
///
/// Offsets inside the deleted span collapse onto the splice point; formats
/// that collapse to zero width are dropped.
pub fn shift_formats_for_splice(
    formats: &[InlineFormat],
    at: usize,
    deleted: usize,
    inserted: usize,
) -> Vec<InlineFormat> {
    let map = |pos: usize| -> usize {
        if pos <= at {
            pos
        } else if pos >= at + deleted {
            pos - deleted + inserted
        } else {
            at
        }
    };

    formats
        .iter()
        .map(|f| {
            let mut shifted = f.clone();
            shifted.start = map(f.start);
            shifted.end = map(f.end);
            shifted
        })
        .filter(|f| !f.is_empty())
        .collect()
}

/// Clamp format ends to `content_len` and drop formats left empty.
///
/// Out-of-range offsets are tolerated at the edges of the system rather
/// than rejected; this is the normalization applied before serialization
/// or node rendering.
pub fn clamp_formats(formats: &[InlineFormat], content_len: usize) -> Vec<InlineFormat> {
    formats
        .iter()
        .map(|f| {
            let mut clamped = f.clone();
            clamped.end = f.end.min(content_len);
            clamped.start = f.start.min(clamped.end);
            clamped
        })
        .filter(|f| !f.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold(start: usize, end: usize) -> InlineFormat {
        InlineFormat::new(FormatKind::Bold, start, end)
    }

    fn italic(start: usize, end: usize) -> InlineFormat {
        InlineFormat::new(FormatKind::Italic, start, end)
    }

    #[test]
    fn test_apply_zero_width_is_noop() {
        let formats = vec![bold(0, 3)];
        let result = apply_format(&formats, 5, 5, FormatKind::Bold, None);
        assert_eq!(result, formats);
    }

    #[test]
    fn test_apply_evicts_overlapping_of_any_kind() {
        let formats = vec![bold(0, 5), italic(4, 8)];
        let result = apply_format(&formats, 3, 6, FormatKind::Code, None);
        // both overlapped the written span, only the new format survives
        assert_eq!(result, vec![InlineFormat::new(FormatKind::Code, 3, 6)]);
    }

    #[test]
    fn test_apply_keeps_disjoint_and_sorts() {
        let formats = vec![italic(10, 12)];
        let result = apply_format(&formats, 0, 4, FormatKind::Bold, None);
        assert_eq!(result, vec![bold(0, 4), italic(10, 12)]);
    }

    #[test]
    fn test_interval_invariant_after_operations() {
        let mut formats = vec![bold(0, 4), italic(6, 9)];
        formats = apply_format(&formats, 2, 7, FormatKind::Underline, None);
        formats = toggle_format(&formats, 0, 2, FormatKind::Bold, None);
        for f in &formats {
            assert!(f.start < f.end);
        }
        // no two formats of the same kind overlap
        for (i, a) in formats.iter().enumerate() {
            for b in formats.iter().skip(i + 1) {
                if a.kind == b.kind {
                    assert!(!a.overlaps(b.start, b.end));
                }
            }
        }
    }

    #[test]
    fn test_remove_is_pure_filter() {
        let formats = vec![bold(0, 3), italic(10, 14)];
        let result = remove_format(&formats, 0, 5, Some(FormatKind::Bold));
        // the surviving italic keeps its offsets untouched
        assert_eq!(result, vec![italic(10, 14)]);
    }

    #[test]
    fn test_remove_all_kinds() {
        let formats = vec![bold(0, 3), italic(2, 6), bold(8, 10)];
        let result = remove_format(&formats, 0, 6, None);
        assert_eq!(result, vec![bold(8, 10)]);
    }

    #[test]
    fn test_toggle_round_trip() {
        let original: Vec<InlineFormat> = Vec::new();
        let applied = toggle_format(&original, 2, 6, FormatKind::Bold, None);
        assert_eq!(applied, vec![bold(2, 6)]);
        let removed = toggle_format(&applied, 2, 6, FormatKind::Bold, None);
        assert_eq!(removed, original);
    }

    #[test]
    fn test_toggle_checks_coverage_not_exact_match() {
        let formats = vec![bold(0, 10)];
        // sub-span of an existing bold format toggles off
        let result = toggle_format(&formats, 2, 6, FormatKind::Bold, None);
        assert!(result.is_empty());
    }

    #[test]
    fn test_formats_at_position() {
        let formats = vec![bold(0, 5), italic(5, 10)];
        assert_eq!(formats_at_position(&formats, 0), vec![bold(0, 5)]);
        assert_eq!(formats_at_position(&formats, 4), vec![bold(0, 5)]);
        // end is exclusive
        assert_eq!(formats_at_position(&formats, 5), vec![italic(5, 10)]);
        assert!(formats_at_position(&formats, 10).is_empty());
    }

    #[test]
    fn test_splice_insert_shifts_following() {
        let formats = vec![bold(5, 10)];
        let result = shift_formats_for_splice(&formats, 0, 0, 3);
        assert_eq!(result, vec![bold(8, 13)]);
    }

    #[test]
    fn test_splice_insert_inside_extends() {
        let formats = vec![bold(2, 8)];
        let result = shift_formats_for_splice(&formats, 4, 0, 2);
        assert_eq!(result, vec![bold(2, 10)]);
    }

    #[test]
    fn test_splice_delete_collapses_contained() {
        let formats = vec![bold(3, 6), italic(8, 12)];
        let result = shift_formats_for_splice(&formats, 2, 7, 0);
        // bold was inside the deleted span and collapses away,
        // italic slides left past the splice
        assert_eq!(result, vec![italic(2, 5)]);
    }

    #[test]
    fn test_splice_delete_straddling_clips() {
        let formats = vec![bold(3, 9)];
        let result = shift_formats_for_splice(&formats, 5, 10, 0);
        assert_eq!(result, vec![bold(3, 5)]);
    }

    #[test]
    fn test_clamp_formats() {
        let formats = vec![bold(0, 50), italic(20, 30)];
        let result = clamp_formats(&formats, 10);
        assert_eq!(result, vec![bold(0, 10)]);
    }
}
