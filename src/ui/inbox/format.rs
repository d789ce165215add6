//! Text formatting utilities for inbox rendering.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::state::EmailRow;
use crate::ui::theme::symbols;

/// Calculate display width of a string (accounting for Unicode)
pub fn display_width(s: &str) -> usize {
    s.width()
}

/// Truncate string to fit display width, ending in "..." when cut
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width < 4 {
        return s.chars().take(max_width).collect();
    }

    let mut width = 0;
    let mut result = String::new();
    for c in s.chars() {
        let char_width = c.width().unwrap_or(1);
        if width + char_width > max_width - 3 {
            break;
        }
        width += char_width;
        result.push(c);
    }
    result.push_str("...");
    result
}

/// Truncate or pad with spaces to exactly `width` columns
pub fn fit_to_width(s: &str, width: usize) -> String {
    let mut out = truncate_to_width(s, width);
    let used = display_width(&out);
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    out
}

/// Checkbox marker for a row
pub fn row_marker(row: &EmailRow) -> &'static str {
    if row.is_failed() {
        symbols::FAILED
    } else if row.is_pending() {
        symbols::PENDING
    } else if row.selected {
        symbols::CHECKED
    } else {
        symbols::UNCHECKED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello world", 8), "hello...");
        assert_eq!(truncate_to_width("hello", 3), "hel");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // Each CJK char is two columns wide
        let cut = truncate_to_width("日本語のメール", 9);
        assert_eq!(cut, "日本語...");
        assert!(display_width(&cut) <= 9);
    }

    #[test]
    fn test_fit_pads_short_text() {
        assert_eq!(fit_to_width("ab", 4), "ab  ");
        assert_eq!(display_width(&fit_to_width("abcdefgh", 6)), 6);
    }
}
