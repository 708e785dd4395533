//! Search bar component renderer.
//!
//! Renders a bordered input box showing the current query. A trailing block
//! cursor is drawn while the query is being edited; a confirmed filter is
//! shown without it.

use crate::ui::helpers::{char_len, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;
use std::io::{self, Write};

const SEARCH_BOX_MARGIN: usize = 5;

/// Renders the three-line search box starting at `row`.
///
/// Returns the next available row position.
pub fn render_search_bar<W: Write>(
    out: &mut W,
    row: usize,
    search: &SearchBarInfo,
    theme: &Theme,
    cols: usize,
) -> io::Result<usize> {
    let box_width = cols.saturating_sub(SEARCH_BOX_MARGIN * 2);
    let inner_width = box_width.saturating_sub(2);
    let border = Theme::fg(&theme.colors.search_bar_border);
    let margin = " ".repeat(SEARCH_BOX_MARGIN);

    position_cursor(out, row, 1)?;
    write!(out, "{margin}{border}┌{}┐{}", "─".repeat(inner_width), Theme::reset())?;

    let cursor = if search.editing { "█" } else { "" };
    let search_text = format!(" Search: {}{cursor}", search.query);
    let padding = inner_width.saturating_sub(char_len(&search_text));

    position_cursor(out, row + 1, 1)?;
    write!(
        out,
        "{margin}{border}│{}{search_text}{}{border}│{}",
        Theme::fg(&theme.colors.text_normal),
        " ".repeat(padding),
        Theme::reset()
    )?;

    position_cursor(out, row + 2, 1)?;
    write!(out, "{margin}{border}└{}┘{}", "─".repeat(inner_width), Theme::reset())?;

    Ok(row + 3)
}
