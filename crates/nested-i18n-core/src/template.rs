//! Scanners for the template mini-language.
//!
//! A template may contain `<$id>` references to other messages,
//! `<args[N]>` positional placeholders and the two-character escape `\n`.

use alloc::format;
use alloc::string::String;

use crate::validator::{is_id_continue, is_id_start};

const REFERENCE_OPEN: &str = "<$";

/// A `<$id>` marker located in a template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReferenceMarker<'a> {
    pub start: usize,
    pub end: usize,
    pub id: &'a str,
}

/// Turns every literal `\n` pair into a newline. No other escapes exist.
pub fn normalize_escapes(template: &str) -> String {
    template.replace("\\n", "\n")
}

/// Finds the leftmost well-formed `<$id>` marker.
pub fn find_reference(template: &str) -> Option<ReferenceMarker<'_>> {
    let bytes = template.as_bytes();
    let mut from = 0;
    while let Some(offset) = template[from..].find(REFERENCE_OPEN) {
        let start = from + offset;
        let id_start = start + REFERENCE_OPEN.len();
        let mut cursor = id_start;
        if cursor < bytes.len() && is_id_start(bytes[cursor]) {
            cursor += 1;
            while cursor < bytes.len() && is_id_continue(bytes[cursor]) {
                cursor += 1;
            }
            if cursor < bytes.len() && bytes[cursor] == b'>' {
                return Some(ReferenceMarker {
                    start,
                    end: cursor + 1,
                    id: &template[id_start..cursor],
                });
            }
        }
        from = start + 1;
    }
    None
}

/// The placeholder text for the argument at `index`.
pub fn arg_marker(index: usize) -> String {
    format!("<args[{index}]>")
}

#[cfg(test)]
mod tests {
    use super::{ReferenceMarker, arg_marker, find_reference, normalize_escapes};

    #[test]
    fn normalizes_newline_escape_only() {
        assert_eq!(normalize_escapes("a\\nb\\tc"), "a\nb\\tc");
    }

    #[test]
    fn finds_first_reference() {
        let marker = find_reference("x <$part1> y <$part2>").expect("marker");
        assert_eq!(
            marker,
            ReferenceMarker {
                start: 2,
                end: 10,
                id: "part1"
            }
        );
    }

    #[test]
    fn skips_malformed_markers() {
        let marker = find_reference("<$> <$Upper> <$a.b> <$ok>").expect("marker");
        assert_eq!(marker.id, "ok");
        assert_eq!(find_reference("<$unterminated"), None);
        assert_eq!(find_reference("plain text"), None);
    }

    #[test]
    fn handles_nested_open_sequences() {
        let marker = find_reference("<$<$inner>>").expect("marker");
        assert_eq!(marker.id, "inner");
        assert_eq!(marker.start, 2);
    }

    #[test]
    fn builds_arg_marker() {
        assert_eq!(arg_marker(0), "<args[0]>");
        assert_eq!(arg_marker(12), "<args[12]>");
    }
}
