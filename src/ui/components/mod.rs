//! Composable UI component renderers.
//!
//! Each component renders one part of the screen at an explicit row and
//! returns the next free row, so the layout function reads top to bottom.
//!
//! # Components
//!
//! - [`header`]: Title and scope/sort subtitle
//! - [`search`]: Search input box
//! - [`table`]: Package and group lists
//! - [`empty`]: Empty state message
//! - [`overlay`]: Add form, group prompt, assign picker, install spinner
//! - [`footer`]: Status line and keybinding hints
//!
//! # Layout
//!
//! ```text
//! [blank line]
//! [Title]
//! [Subtitle]
//! [Border]
//! [Search Bar - 3 lines, optional]
//! [Column Headers]
//! [Rows or Empty State]
//! [Status]
//! [Border]
//! [Footer]
//! ```

mod empty;
mod footer;
mod header;
mod overlay;
mod search;
mod table;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{Body, UIViewModel};
use std::io::{self, Write};

use empty::render_empty_state;
use footer::{render_footer, render_status};
use header::render_header;
use overlay::render_overlay;
use search::render_search_bar;
use table::{render_group_headers, render_group_rows, render_package_headers, render_package_rows};

/// Renders a horizontal border line at `row`.
///
/// Returns the next available row position.
fn render_border<W: Write>(out: &mut W, row: usize, color: &str, cols: usize) -> io::Result<usize> {
    position_cursor(out, row, 1)?;
    write!(out, "{}{}{}", Theme::fg(color), "─".repeat(cols), Theme::reset())?;
    Ok(row + 1)
}

/// Renders a full frame for `vm` on a `rows` × `cols` screen.
///
/// Expects a cleared screen.
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn render_layout<W: Write>(
    out: &mut W,
    vm: &UIViewModel,
    theme: &Theme,
    rows: usize,
    cols: usize,
) -> io::Result<()> {
    let mut current_row = 2;

    current_row = render_header(out, current_row, &vm.header, theme, cols)?;
    current_row = render_border(out, current_row, &theme.colors.border, cols)?;
    if let Some(search) = &vm.search_bar {
        current_row = render_search_bar(out, current_row, search, theme, cols)?;
    }

    match &vm.body {
        Body::Packages(items) => {
            current_row = render_package_headers(out, current_row, theme)?;
            render_package_rows(out, current_row, items, theme, cols)?;
        }
        Body::Groups(items) => {
            current_row = render_group_headers(out, current_row, theme)?;
            render_group_rows(out, current_row, items, theme, 0, cols)?;
        }
        Body::Empty(empty) => {
            render_empty_state(out, current_row, empty, theme, cols)?;
        }
    }

    let footer_row = rows;
    let border_row = footer_row.saturating_sub(1);
    let status_row = border_row.saturating_sub(1);

    render_status(out, status_row, vm.status.as_ref(), theme, cols)?;
    render_border(out, border_row, &theme.colors.border, cols)?;
    render_footer(out, footer_row, &vm.footer, theme, cols)?;

    if let Some(overlay) = &vm.overlay {
        render_overlay(out, overlay, theme, rows, cols)?;
    }
    Ok(())
}
