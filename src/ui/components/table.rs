//! Table component renderer.
//!
//! Renders the package list as a five-column table (NAME, VERSION, FREQ,
//! LAST USED, URL) and the group list as a single column. Supports cursor
//! highlighting, selection markers and fuzzy match highlighting.

use crate::app::view::{
    FREQ_COLUMN_WIDTH, LAST_USED_COLUMN_WIDTH, MARKER_WIDTH, NAME_COLUMN_WIDTH,
    VERSION_COLUMN_WIDTH,
};
use crate::ui::helpers::{self, char_len, position_cursor, write_padded};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{GroupRow, PackageRow};
use std::io::{self, Write};

const MARKER: &str = "● ";

/// Renders the package column headers at `row`.
///
/// Returns the next available row position.
pub fn render_package_headers<W: Write>(out: &mut W, row: usize, theme: &Theme) -> io::Result<usize> {
    position_cursor(out, row, 1)?;
    write!(out, "{}{}", Theme::bold(), Theme::fg(&theme.colors.header_fg))?;
    write!(out, "{}", " ".repeat(MARKER_WIDTH))?;
    write_padded(out, "NAME", NAME_COLUMN_WIDTH)?;
    write_padded(out, "VERSION", VERSION_COLUMN_WIDTH)?;
    write_padded(out, "FREQ", FREQ_COLUMN_WIDTH)?;
    write_padded(out, "LAST USED", LAST_USED_COLUMN_WIDTH)?;
    write!(out, "URL{}", Theme::reset())?;
    Ok(row + 1)
}

/// Renders all package rows starting at `row`.
///
/// Returns the next available row position.
pub fn render_package_rows<W: Write>(
    out: &mut W,
    row: usize,
    items: &[PackageRow],
    theme: &Theme,
    cols: usize,
) -> io::Result<usize> {
    let mut current_row = row;
    for item in items {
        current_row = render_package_row(out, current_row, item, theme, cols)?;
    }
    Ok(current_row)
}

/// Renders a single package row.
///
/// # Styling Precedence
///
/// 1. Cursor background (if `is_cursor`)
/// 2. Fuzzy match highlights (unless under the cursor)
/// 3. Normal text color, with dimmed secondary columns
///
/// The row is padded to the full terminal width so the cursor background
/// spans the whole line.
fn render_package_row<W: Write>(
    out: &mut W,
    row: usize,
    item: &PackageRow,
    theme: &Theme,
    cols: usize,
) -> io::Result<usize> {
    position_cursor(out, row, 1)?;

    let base = if item.is_cursor {
        format!(
            "{}{}",
            Theme::fg(&theme.colors.cursor_fg),
            Theme::bg(&theme.colors.cursor_bg)
        )
    } else {
        Theme::fg(&theme.colors.text_normal)
    };
    write!(out, "{base}")?;

    if item.is_marked {
        if !item.is_cursor {
            write!(out, "{}", Theme::fg(&theme.colors.marked_fg))?;
        }
        write!(out, "{MARKER}{base}")?;
    } else {
        write!(out, "{}", " ".repeat(MARKER_WIDTH))?;
    }

    helpers::render_highlighted_text(out, &item.name, &item.highlight_ranges, theme, item.is_cursor)?;
    write!(out, "{}", " ".repeat(NAME_COLUMN_WIDTH.saturating_sub(char_len(&item.name))))?;

    if !item.is_cursor {
        write!(out, "{}", Theme::fg(&theme.colors.text_dim))?;
    }
    write_padded(out, &item.version, VERSION_COLUMN_WIDTH)?;
    write_padded(out, &item.freq.to_string(), FREQ_COLUMN_WIDTH)?;
    write_padded(out, &item.last_used, LAST_USED_COLUMN_WIDTH)?;
    write!(out, "{}", item.url)?;

    let line_len = MARKER_WIDTH
        + NAME_COLUMN_WIDTH
        + VERSION_COLUMN_WIDTH
        + FREQ_COLUMN_WIDTH
        + LAST_USED_COLUMN_WIDTH
        + char_len(&item.url);
    write!(out, "{}{}", " ".repeat(cols.saturating_sub(line_len)), Theme::reset())?;
    Ok(row + 1)
}

/// Renders the group column header at `row`.
///
/// Returns the next available row position.
pub fn render_group_headers<W: Write>(out: &mut W, row: usize, theme: &Theme) -> io::Result<usize> {
    position_cursor(out, row, 1)?;
    write!(
        out,
        "{}{}{}GROUP{}",
        Theme::bold(),
        Theme::fg(&theme.colors.header_fg),
        " ".repeat(MARKER_WIDTH),
        Theme::reset()
    )?;
    Ok(row + 1)
}

/// Renders group rows starting at `row`, indented by `indent` columns and
/// padded to `width`.
///
/// Returns the next available row position.
pub fn render_group_rows<W: Write>(
    out: &mut W,
    row: usize,
    items: &[GroupRow],
    theme: &Theme,
    indent: usize,
    width: usize,
) -> io::Result<usize> {
    let mut current_row = row;
    for item in items {
        position_cursor(out, current_row, indent + 1)?;
        if item.is_cursor {
            write!(
                out,
                "{}{}",
                Theme::fg(&theme.colors.cursor_fg),
                Theme::bg(&theme.colors.cursor_bg)
            )?;
        } else {
            write!(out, "{}", Theme::fg(&theme.colors.text_normal))?;
        }
        let text = format!("{}{}", " ".repeat(MARKER_WIDTH), item.name);
        write_padded(out, &helpers::truncate(&text, width), width)?;
        write!(out, "{}", Theme::reset())?;
        current_row += 1;
    }
    Ok(current_row)
}
