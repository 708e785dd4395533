//! Footer and status line renderers.

use crate::app::StatusKind;
use crate::ui::helpers::{char_len, position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{FooterInfo, StatusLine};
use std::io::{self, Write};

/// Renders centered, dimmed keybinding help at `row`.
///
/// Returns the next available row position.
pub fn render_footer<W: Write>(
    out: &mut W,
    row: usize,
    footer: &FooterInfo,
    theme: &Theme,
    cols: usize,
) -> io::Result<usize> {
    let help_text = truncate(&footer.keybindings, cols);
    let text_len = char_len(&help_text);
    let padding = cols.saturating_sub(text_len) / 2;

    position_cursor(out, row, 1)?;
    write!(
        out,
        "{}{}{help_text}{}{}",
        Theme::fg(&theme.colors.text_dim),
        " ".repeat(padding),
        " ".repeat(cols.saturating_sub(padding + text_len)),
        Theme::reset()
    )?;
    Ok(row + 1)
}

/// Renders the status message at `row`, colored by severity.
///
/// An absent status leaves the row blank.
pub fn render_status<W: Write>(
    out: &mut W,
    row: usize,
    status: Option<&StatusLine>,
    theme: &Theme,
    cols: usize,
) -> io::Result<usize> {
    position_cursor(out, row, 1)?;
    let Some(status) = status else {
        return Ok(row + 1);
    };

    let color = match status.kind {
        StatusKind::Info => &theme.colors.status_info_fg,
        StatusKind::Warning => &theme.colors.status_warning_fg,
        StatusKind::Error => &theme.colors.status_error_fg,
    };
    write!(
        out,
        " {}{}{}",
        Theme::fg(color),
        truncate(&status.text, cols.saturating_sub(2)),
        Theme::reset()
    )?;
    Ok(row + 1)
}
