//! Canonical text-offset helpers.
//!
//! All inline-format offsets count UTF-16 code units, the same indexing a
//! browser reports through `Range.toString().length` and JavaScript string
//! operations. These helpers are the single conversion point between that
//! offset space and Rust's UTF-8 byte indices; the parser, serializer, and
//! node bridge all go through them so no component invents its own rule.

/// Length of `text` in UTF-16 code units.
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Convert a UTF-16 code-unit offset to a byte offset into `text`.
///
/// Offsets past the end clamp to `text.len()`. An offset landing inside a
/// surrogate pair snaps back to the start of that character, so the result
/// is always a valid char boundary.
pub fn utf16_to_byte(text: &str, offset: usize) -> usize {
    let mut units = 0;
    for (byte_idx, ch) in text.char_indices() {
        if units == offset {
            return byte_idx;
        }
        let next = units + ch.len_utf16();
        if next > offset {
            // offset lands inside a surrogate pair
            return byte_idx;
        }
        units = next;
    }
    text.len()
}

/// Convert a byte offset into `text` to a UTF-16 code-unit offset.
///
/// Byte offsets past the end (or inside a multi-byte character) count every
/// character starting strictly before them.
pub fn byte_to_utf16(text: &str, byte_offset: usize) -> usize {
    let mut units = 0;
    for (byte_idx, ch) in text.char_indices() {
        if byte_idx >= byte_offset {
            return units;
        }
        units += ch.len_utf16();
    }
    units
}

/// Slice `text` by a half-open UTF-16 code-unit range, clamping both ends.
pub fn slice_utf16(text: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }
    let byte_start = utf16_to_byte(text, start);
    let byte_end = utf16_to_byte(text, end);
    &text[byte_start.min(byte_end)..byte_end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_offsets() {
        let s = "hello world";
        assert_eq!(utf16_len(s), 11);
        assert_eq!(utf16_to_byte(s, 6), 6);
        assert_eq!(byte_to_utf16(s, 6), 6);
        assert_eq!(slice_utf16(s, 6, 11), "world");
    }

    #[test]
    fn test_astral_plane() {
        // "🌍" is one char, two UTF-16 units, four UTF-8 bytes
        let s = "a🌍b";
        assert_eq!(utf16_len(s), 4);
        assert_eq!(utf16_to_byte(s, 1), 1);
        assert_eq!(utf16_to_byte(s, 3), 5);
        // offset inside the surrogate pair snaps to the char start
        assert_eq!(utf16_to_byte(s, 2), 1);
        assert_eq!(byte_to_utf16(s, 5), 3);
        assert_eq!(slice_utf16(s, 1, 3), "🌍");
    }

    #[test]
    fn test_clamping() {
        let s = "ab";
        assert_eq!(utf16_to_byte(s, 10), 2);
        assert_eq!(slice_utf16(s, 1, 10), "b");
        assert_eq!(slice_utf16(s, 5, 3), "");
    }

    #[test]
    fn test_bmp_multibyte() {
        // "é" is one char, one UTF-16 unit, two UTF-8 bytes
        let s = "café!";
        assert_eq!(utf16_len(s), 5);
        assert_eq!(utf16_to_byte(s, 4), 5);
        assert_eq!(slice_utf16(s, 3, 4), "é");
    }
}
