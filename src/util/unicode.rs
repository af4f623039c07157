use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Length in Unicode scalar values (code points). This is the unit every
/// post budget is measured in.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of the `char_idx`-th code point. Returns `s.len()` when
/// `char_idx` is at or past the end.
pub fn char_to_byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Split `s` after `char_idx` code points. Never cuts inside a UTF-8 sequence.
pub fn split_at_char(s: &str, char_idx: usize) -> (&str, &str) {
    s.split_at(char_to_byte_offset(s, char_idx))
}

/// Code-point index of the last `needle` at or before `char_idx`.
pub fn last_char_index_of(s: &str, needle: char, char_idx: usize) -> Option<usize> {
    s.chars()
        .take(char_idx.saturating_add(1))
        .enumerate()
        .filter(|&(_, c)| c == needle)
        .map(|(i, _)| i)
        .last()
}

/// Width in terminal cells, with wide (CJK, emoji) characters counted as 2.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// One-line preview of `s` at most `max_cells` wide. Whitespace runs become
/// a single space; an over-wide preview ends in `…`.
pub fn preview(s: &str, max_cells: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if display_width(&flat) <= max_cells {
        return flat;
    }
    let Some(budget) = max_cells.checked_sub(1) else {
        return String::new();
    };

    let mut out = String::new();
    let mut width = 0;
    for grapheme in flat.graphemes(true) {
        width += display_width(grapheme);
        if width > budget {
            break;
        }
        out.push_str(grapheme);
    }
    out.truncate(out.trim_end().len());
    out.push('\u{2026}');
    out
}

/// First `max_chars` code points of `s`, without an ellipsis.
pub fn take_chars(s: &str, max_chars: usize) -> &str {
    split_at_char(s, max_chars).0
}
