//! Header component renderer.
//!
//! Draws the bold, centered title and a dimmed subtitle naming the current
//! scope, sort order and selection size.

use crate::ui::helpers::{char_len, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;
use std::io::{self, Write};

/// Renders the two header lines starting at `row`.
///
/// Returns the next available row position.
pub fn render_header<W: Write>(
    out: &mut W,
    row: usize,
    header: &HeaderInfo,
    theme: &Theme,
    cols: usize,
) -> io::Result<usize> {
    let title_len = char_len(&header.title);
    let padding = cols.saturating_sub(title_len) / 2;

    position_cursor(out, row, 1)?;
    write!(out, "{}{}", Theme::bold(), Theme::fg(&theme.colors.header_fg))?;
    if let Some(bg) = &theme.colors.header_bg {
        write!(out, "{}", Theme::bg(bg))?;
    }
    write!(
        out,
        "{}{}{}",
        " ".repeat(padding),
        header.title,
        " ".repeat(cols.saturating_sub(padding + title_len))
    )?;
    write!(out, "{}", Theme::reset())?;

    let sub_len = char_len(&header.subtitle).min(cols);
    let sub_padding = cols.saturating_sub(sub_len) / 2;
    position_cursor(out, row + 1, 1)?;
    write!(
        out,
        "{}{}{}{}",
        Theme::fg(&theme.colors.text_dim),
        " ".repeat(sub_padding),
        header.subtitle,
        Theme::reset()
    )?;

    Ok(row + 2)
}
