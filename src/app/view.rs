//! View model computation.
//!
//! The `compute_viewmodel` method transforms state into a renderable UI
//! representation, handling windowing, fuzzy match highlighting, overlays and
//! per-mode help text. It never mutates state, so any frame can be rebuilt
//! from a state snapshot.
//!
//! # Example
//!
//! ```rust
//! use modstash::app::AppState;
//! use modstash::domain::Package;
//! use modstash::ui::{viewmodel::Body, Theme};
//!
//! let mut state = AppState::new(Theme::default());
//! state.replace_packages(vec![Package::new(1, "log", "github.com/charmbracelet/log", None)]);
//! let vm = state.compute_viewmodel(24, 80);
//! assert!(matches!(vm.body, Body::Packages(ref rows) if rows.len() == 1));
//! ```

use super::form::FIELD_PROMPTS;
use super::modes::{InputMode, ViewMode};
use super::search;
use super::AppState;
use crate::domain::{Group, Package};
use crate::ui::helpers::truncate;
use crate::ui::viewmodel::{
    AddFormView, Body, EmptyState, FieldView, FooterInfo, GroupRow, HeaderInfo, Overlay,
    PackageRow, SearchBarInfo, StatusLine, UIViewModel,
};
use std::ops::Range;

/// Rows taken by everything except the list: blank line, title, subtitle,
/// border, column headers, status line, border, footer.
const CHROME_ROWS: usize = 8;
const SEARCH_BAR_ROWS: usize = 3;

pub const NAME_COLUMN_WIDTH: usize = 24;
pub const VERSION_COLUMN_WIDTH: usize = 12;
pub const FREQ_COLUMN_WIDTH: usize = 6;
pub const LAST_USED_COLUMN_WIDTH: usize = 12;
/// Width of the selection marker in front of the name.
pub const MARKER_WIDTH: usize = 2;

const SPINNER_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

const PACKAGES_HELP: &str =
    "/: search  g: group  +: add  a: assign to group  c: create group  i: install  x: delete  f/l: sort  q: quit";
const GROUPS_HELP: &str = "space/enter: open  i: install  c: create  x: delete  esc/q: back";
const GROUP_PACKAGES_HELP: &str =
    "space: select  i: install  d: remove from group  x: delete  f/l: sort  esc/q: back";
const ADDING_HELP: &str = "tab: next field  enter: next/submit  ctrl+g: install  ctrl+f: force  esc: cancel";
const SEARCHING_HELP: &str = "type to filter  ↑/↓: move  enter: keep filter  esc: clear";
const ASSIGNING_HELP: &str = "j/k: move  enter: assign  esc/q: cancel";
const CREATING_GROUP_HELP: &str = "enter: create  esc: cancel";
const INSTALLING_HELP: &str = "installing...  ctrl+c: force quit";

/// Visible slice of a list of `len` rows that keeps `cursor` roughly centered.
fn window(cursor: usize, len: usize, available: usize) -> Range<usize> {
    let mut start = cursor.saturating_sub(available / 2);
    let end = (start + available).min(len);
    if end - start < available {
        start = end.saturating_sub(available);
    }
    start..end
}

impl AppState {
    /// Transforms application state into a renderable view model.
    ///
    /// `rows` and `cols` are the terminal dimensions; only the rows that fit
    /// are included, windowed around the cursor.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let search_bar = self.compute_search_bar();
        let available_rows = self.calculate_available_rows(rows, search_bar.is_some());

        let body = match self.view_mode {
            ViewMode::Groups => self.compute_group_body(available_rows),
            ViewMode::Packages | ViewMode::GroupPackages => {
                self.compute_package_body(available_rows, cols)
            }
        };

        UIViewModel {
            header: self.compute_header(),
            search_bar,
            body,
            status: self.status.as_ref().map(|s| StatusLine {
                text: s.text.clone(),
                kind: s.kind,
            }),
            overlay: self.compute_overlay(available_rows),
            footer: self.compute_footer(),
        }
    }

    fn calculate_available_rows(&self, rows: usize, with_search: bool) -> usize {
        let chrome = CHROME_ROWS + if with_search { SEARCH_BAR_ROWS } else { 0 };
        rows.saturating_sub(chrome).max(1)
    }

    fn compute_package_body(&self, available_rows: usize, cols: usize) -> Body {
        if self.visible.is_empty() {
            return Body::Empty(self.compute_empty_state());
        }

        let range = window(self.package_cursor, self.visible.len(), available_rows);
        let url_width = cols.saturating_sub(
            MARKER_WIDTH
                + NAME_COLUMN_WIDTH
                + VERSION_COLUMN_WIDTH
                + FREQ_COLUMN_WIDTH
                + LAST_USED_COLUMN_WIDTH,
        );

        let rows = self.visible[range.clone()]
            .iter()
            .zip(range)
            .filter_map(|(&idx, position)| {
                self.packages
                    .get(idx)
                    .map(|package| self.compute_package_row(package, position, url_width))
            })
            .collect();
        Body::Packages(rows)
    }

    fn compute_package_row(&self, package: &Package, position: usize, url_width: usize) -> PackageRow {
        PackageRow {
            name: truncate(&package.name, NAME_COLUMN_WIDTH - 2),
            url: truncate(&package.url, url_width.saturating_sub(1)),
            version: truncate(package.version_label(), VERSION_COLUMN_WIDTH - 2),
            freq: package.freq,
            last_used: package.time_ago(),
            is_cursor: position == self.package_cursor,
            is_marked: self.selection.contains(&package.id),
            highlight_ranges: search::highlight_ranges(&package.name, &self.search_query),
        }
    }

    fn compute_group_rows(groups: &[Group], cursor: usize, available_rows: usize) -> Vec<GroupRow> {
        let range = window(cursor, groups.len(), available_rows);
        groups[range.clone()]
            .iter()
            .zip(range)
            .map(|(group, position)| GroupRow {
                name: group.name.clone(),
                is_cursor: position == cursor,
            })
            .collect()
    }

    fn compute_group_body(&self, available_rows: usize) -> Body {
        if self.groups.is_empty() {
            return Body::Empty(self.compute_empty_state());
        }
        Body::Groups(Self::compute_group_rows(&self.groups, self.group_cursor, available_rows))
    }

    fn compute_empty_state(&self) -> EmptyState {
        let (message, subtitle) = match self.view_mode {
            ViewMode::Groups => ("No groups yet", "Press c to create one"),
            ViewMode::GroupPackages => (
                "This group is empty",
                "Select packages in the package view and press a to assign them",
            ),
            ViewMode::Packages if !self.search_query.is_empty() => {
                ("No matches", "Esc clears the filter")
            }
            ViewMode::Packages => ("No packages yet", "Press + to add one"),
        };
        EmptyState {
            message: message.to_string(),
            subtitle: subtitle.to_string(),
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        let scope = match (self.view_mode, &self.active_group) {
            (ViewMode::Groups, _) => "Groups".to_string(),
            (ViewMode::GroupPackages, Some(group)) => format!("Group: {}", group.name),
            _ => "Packages".to_string(),
        };

        let subtitle = match self.view_mode {
            ViewMode::Groups => format!("{scope} · {} total", self.groups.len()),
            ViewMode::Packages | ViewMode::GroupPackages => {
                let sort = if self.view_mode == ViewMode::GroupPackages {
                    self.group_sort
                } else {
                    self.sort_mode
                };
                let mut subtitle = format!("{scope} · sorted by {}", sort.label());
                if !self.selection.is_empty() {
                    subtitle.push_str(&format!(" · {} selected", self.selection.len()));
                }
                subtitle
            }
        };

        HeaderInfo {
            title: "modstash".to_string(),
            subtitle,
        }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = if self.installing {
            INSTALLING_HELP
        } else {
            match (self.input_mode, self.view_mode) {
                (InputMode::Adding, _) => ADDING_HELP,
                (InputMode::Searching, _) => SEARCHING_HELP,
                (InputMode::Assigning, _) => ASSIGNING_HELP,
                (InputMode::CreatingGroup, _) => CREATING_GROUP_HELP,
                (InputMode::Normal, ViewMode::Packages) => PACKAGES_HELP,
                (InputMode::Normal, ViewMode::Groups) => GROUPS_HELP,
                (InputMode::Normal, ViewMode::GroupPackages) => GROUP_PACKAGES_HELP,
            }
        };
        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }

    fn compute_search_bar(&self) -> Option<SearchBarInfo> {
        let editing = self.input_mode == InputMode::Searching;
        if !editing && (self.search_query.is_empty() || self.view_mode == ViewMode::Groups) {
            return None;
        }
        Some(SearchBarInfo {
            query: self.search_query.clone(),
            editing,
        })
    }

    fn compute_overlay(&self, available_rows: usize) -> Option<Overlay> {
        if self.installing {
            let spinner = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
            return Some(Overlay::Installing {
                spinner,
                label: "Installing...".to_string(),
            });
        }

        match self.input_mode {
            InputMode::Adding => {
                let fields = FIELD_PROMPTS
                    .iter()
                    .enumerate()
                    .map(|(idx, (label, placeholder))| FieldView {
                        label: (*label).to_string(),
                        value: self
                            .add_form
                            .field(idx)
                            .map(|f| f.value().to_string())
                            .unwrap_or_default(),
                        placeholder: (*placeholder).to_string(),
                        focused: idx == self.add_form.focus(),
                    })
                    .collect();
                Some(Overlay::AddForm(AddFormView {
                    fields,
                    install: self.add_form.install,
                    force: self.add_form.force,
                }))
            }
            InputMode::CreatingGroup => Some(Overlay::GroupName {
                value: self.group_name.value().to_string(),
            }),
            InputMode::Assigning => Some(Overlay::AssignPicker {
                count: self.selection.len(),
                groups: Self::compute_group_rows(&self.groups, self.assign_cursor, available_rows),
            }),
            InputMode::Normal | InputMode::Searching => None,
        }
    }
}
