//! Modal boxes drawn over the list: the add form, the group name prompt, the
//! assign picker and the install spinner.

use super::table::render_group_rows;
use crate::ui::helpers::{char_len, position_cursor, truncate, write_padded};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{AddFormView, Overlay};
use std::io::{self, Write};

const MAX_BOX_WIDTH: usize = 64;
const LABEL_WIDTH: usize = 10;

enum LineStyle {
    Normal,
    Dim,
    Accent,
}

struct BoxLine {
    text: String,
    style: LineStyle,
}

impl BoxLine {
    fn normal(text: impl Into<String>) -> Self {
        Self { text: text.into(), style: LineStyle::Normal }
    }

    fn dim(text: impl Into<String>) -> Self {
        Self { text: text.into(), style: LineStyle::Dim }
    }

    fn accent(text: impl Into<String>) -> Self {
        Self { text: text.into(), style: LineStyle::Accent }
    }
}

struct Frame {
    top: usize,
    left: usize,
    inner: usize,
}

fn frame(height: usize, rows: usize, cols: usize) -> Frame {
    let width = cols.saturating_sub(4).min(MAX_BOX_WIDTH).max(4);
    Frame {
        top: rows.saturating_sub(height) / 2 + 1,
        left: cols.saturating_sub(width) / 2 + 1,
        inner: width - 2,
    }
}

/// Draws a titled box whose body is `lines` plus `extra_rows` blank rows that
/// the caller fills afterwards. Returns the frame for that purpose.
fn draw_box<W: Write>(
    out: &mut W,
    title: &str,
    lines: &[BoxLine],
    extra_rows: usize,
    theme: &Theme,
    rows: usize,
    cols: usize,
) -> io::Result<Frame> {
    let body_rows = lines.len() + extra_rows;
    let frame = frame(body_rows + 2, rows, cols);
    let border = Theme::fg(&theme.colors.search_bar_border);
    let title = truncate(&format!(" {title} "), frame.inner);

    position_cursor(out, frame.top, frame.left)?;
    write!(
        out,
        "{border}┌{}{title}{}{border}{}┐{}",
        Theme::bold(),
        Theme::reset(),
        "─".repeat(frame.inner.saturating_sub(char_len(&title))),
        Theme::reset()
    )?;

    for offset in 0..body_rows {
        position_cursor(out, frame.top + 1 + offset, frame.left)?;
        write!(out, "{border}│{}", Theme::reset())?;
        match lines.get(offset) {
            Some(line) => {
                let color = match line.style {
                    LineStyle::Normal => &theme.colors.text_normal,
                    LineStyle::Dim => &theme.colors.text_dim,
                    LineStyle::Accent => &theme.colors.spinner_fg,
                };
                write!(out, "{}", Theme::fg(color))?;
                write_padded(out, &truncate(&line.text, frame.inner), frame.inner)?;
            }
            None => write!(out, "{}", " ".repeat(frame.inner))?,
        }
        write!(out, "{}{border}│{}", Theme::reset(), Theme::reset())?;
    }

    position_cursor(out, frame.top + 1 + body_rows, frame.left)?;
    write!(out, "{border}└{}┘{}", "─".repeat(frame.inner), Theme::reset())?;

    Ok(frame)
}

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

fn add_form_lines(form: &AddFormView) -> Vec<BoxLine> {
    let mut lines: Vec<BoxLine> = form
        .fields
        .iter()
        .map(|field| {
            let pointer = if field.focused { ">" } else { " " };
            let label = format!("{pointer} {}:", field.label);
            let label = format!("{label}{}", " ".repeat(LABEL_WIDTH.saturating_sub(char_len(&label))));
            if field.value.is_empty() && !field.focused {
                BoxLine::dim(format!("{label}{}", field.placeholder))
            } else {
                let cursor = if field.focused { "█" } else { "" };
                BoxLine::normal(format!("{label}{}{cursor}", field.value))
            }
        })
        .collect();
    lines.push(BoxLine::normal(""));
    lines.push(BoxLine::normal(format!(
        "  {} install now   {} force overwrite",
        checkbox(form.install),
        checkbox(form.force)
    )));
    lines
}

/// Renders `overlay` centered on a `rows` × `cols` screen.
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn render_overlay<W: Write>(
    out: &mut W,
    overlay: &Overlay,
    theme: &Theme,
    rows: usize,
    cols: usize,
) -> io::Result<()> {
    match overlay {
        Overlay::AddForm(form) => {
            draw_box(out, "Add package", &add_form_lines(form), 0, theme, rows, cols)?;
        }
        Overlay::GroupName { value } => {
            let lines = [BoxLine::normal(format!("  Name: {value}█"))];
            draw_box(out, "New group", &lines, 0, theme, rows, cols)?;
        }
        Overlay::AssignPicker { count, groups } => {
            let title = format!("Assign {count} packages to");
            if groups.is_empty() {
                let lines = [
                    BoxLine::dim("  No groups yet."),
                    BoxLine::dim("  Press esc, then c to create one."),
                ];
                draw_box(out, &title, &lines, 0, theme, rows, cols)?;
            } else {
                let frame = draw_box(out, &title, &[], groups.len(), theme, rows, cols)?;
                render_group_rows(out, frame.top + 1, groups, theme, frame.left, frame.inner)?;
            }
        }
        Overlay::Installing { spinner, label } => {
            let lines = [BoxLine::accent(format!("  {spinner} {label}"))];
            draw_box(out, "Working", &lines, 0, theme, rows, cols)?;
        }
    }
    Ok(())
}
