//! Empty state component renderer.
//!
//! Shown in place of the list when there is nothing to display: an empty
//! registry, an empty group, no groups, or a filter with no matches.

use crate::ui::helpers::{char_len, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::EmptyState;
use std::io::{self, Write};

/// Renders the centered two-line message one row below `row`.
///
/// Returns the next available row position.
pub fn render_empty_state<W: Write>(
    out: &mut W,
    row: usize,
    empty: &EmptyState,
    theme: &Theme,
    cols: usize,
) -> io::Result<usize> {
    let msg_len = char_len(&empty.message);
    let msg_padding = cols.saturating_sub(msg_len) / 2;

    position_cursor(out, row + 1, 1)?;
    write!(
        out,
        "{}{}{}{}",
        Theme::fg(&theme.colors.empty_state_fg),
        " ".repeat(msg_padding),
        empty.message,
        Theme::reset()
    )?;

    let sub_len = char_len(&empty.subtitle);
    let sub_padding = cols.saturating_sub(sub_len) / 2;

    position_cursor(out, row + 2, 1)?;
    write!(
        out,
        "{}{}{}{}{}",
        Theme::dim(),
        Theme::fg(&theme.colors.text_dim),
        " ".repeat(sub_padding),
        empty.subtitle,
        Theme::reset()
    )?;

    Ok(row + 3)
}
