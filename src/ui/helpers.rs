//! Shared rendering utilities and helpers.
//!
//! Low-level text utilities used across the UI components: cursor positioning,
//! fuzzy match highlighting with proper ANSI escape sequence management, and
//! width-aware truncation.
//!
//! All functions operate on character indices, not byte indices, so multi-byte
//! names never split inside a code point.
//!
//! # Example
//!
//! ```rust
//! use modstash::ui::helpers::render_highlighted_text;
//! use modstash::ui::Theme;
//!
//! let theme = Theme::default();
//! let mut out = Vec::new();
//! render_highlighted_text(&mut out, "cobra", &[(0, 2)], &theme, false)?;
//! assert!(String::from_utf8_lossy(&out).contains("bra"));
//! # Ok::<(), std::io::Error>(())
//! ```

use crate::ui::theme::Theme;
use std::io::{self, Write};

/// Positions the cursor at a specific row and column.
///
/// Uses ANSI escape sequence `\u{1b}[{row};{col}H`. Coordinates are 1-indexed.
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn position_cursor<W: Write>(out: &mut W, row: usize, col: usize) -> io::Result<()> {
    write!(out, "\u{1b}[{row};{col}H")
}

/// Number of characters in `text`.
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Shortens `text` to at most `max` characters, ending in `...` when cut.
///
/// ```
/// use modstash::ui::helpers::truncate;
///
/// assert_eq!(truncate("github.com/charmbracelet/lipgloss", 15), "github.com/c...");
/// assert_eq!(truncate("short", 15), "short");
/// ```
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if char_len(text) <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let mut cut: String = text.chars().take(max - 3).collect();
    cut.push_str("...");
    cut
}

/// Writes `text` left-aligned in a column of `width` characters.
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn write_padded<W: Write>(out: &mut W, text: &str, width: usize) -> io::Result<()> {
    write!(out, "{text}{}", " ".repeat(width.saturating_sub(char_len(text))))
}

/// Renders text with highlighted character ranges for fuzzy matches.
///
/// Highlighted sections use the match highlight colors unless the row is under
/// the cursor, in which case the cursor colors take precedence and the text is
/// written plainly. Ranges past the end of `text` are clipped, so highlights
/// computed on an untruncated name stay safe after truncation.
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn render_highlighted_text<W: Write>(
    out: &mut W,
    text: &str,
    ranges: &[(usize, usize)],
    theme: &Theme,
    is_cursor: bool,
) -> io::Result<()> {
    if ranges.is_empty() || is_cursor {
        return write!(out, "{text}");
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len()).max(current_pos);
        let end = end.min(chars.len());
        if start >= end {
            continue;
        }

        if start > current_pos {
            let normal_section: String = chars[current_pos..start].iter().collect();
            write!(out, "{normal_section}")?;
        }

        let highlighted_section: String = chars[start..end].iter().collect();
        write!(
            out,
            "{}{}{highlighted_section}{}{}",
            Theme::fg(&theme.colors.match_highlight_fg),
            Theme::bg(&theme.colors.match_highlight_bg),
            Theme::reset(),
            Theme::fg(&theme.colors.text_normal),
        )?;

        current_pos = end;
    }

    if current_pos < chars.len() {
        let remaining: String = chars[current_pos..].iter().collect();
        write!(out, "{remaining}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_ansi(bytes: &[u8]) -> String {
        let text = String::from_utf8_lossy(bytes);
        let mut plain = String::new();
        let mut in_escape = false;
        for c in text.chars() {
            match (in_escape, c) {
                (false, '\u{1b}') => in_escape = true,
                (true, 'm' | 'H') => in_escape = false,
                (true, _) => {}
                (false, c) => plain.push(c),
            }
        }
        plain
    }

    #[test]
    fn highlighting_preserves_text() {
        let mut out = Vec::new();
        render_highlighted_text(&mut out, "lipgloss", &[(0, 1), (3, 5)], &Theme::default(), false)
            .unwrap();
        assert_eq!(strip_ansi(&out), "lipgloss");
    }

    #[test]
    fn out_of_range_highlights_are_clipped() {
        let mut out = Vec::new();
        render_highlighted_text(&mut out, "ab", &[(1, 9), (5, 7)], &Theme::default(), false)
            .unwrap();
        assert_eq!(strip_ansi(&out), "ab");
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("ééééé", 4), "é...");
        assert_eq!(truncate("abc", 2), "ab");
    }
}
