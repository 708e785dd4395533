//! Application state management.
//!
//! This module defines [`AppState`], the single owner of all transient session
//! state: the fetched lists, the search filter, the selection, cursors, mode
//! flags, form buffers and the status line. Only the registry is durable;
//! everything here lives for one session.
//!
//! # State Components
//!
//! - **Packages**: The list last fetched for the current scope, in fetch order
//! - **Visible**: Indices into `packages` after the fuzzy filter
//! - **Selection**: Package ids marked for bulk actions
//! - **Modes**: [`ViewMode`] × [`InputMode`] plus the `installing` flag
//!
//! # Example
//!
//! ```rust
//! use modstash::app::AppState;
//! use modstash::domain::Package;
//! use modstash::ui::Theme;
//!
//! let mut state = AppState::new(Theme::default());
//! state.replace_packages(vec![Package::new(1, "log", "github.com/charmbracelet/log", None)]);
//! state.toggle_selection();
//! assert!(state.selection.contains(&1));
//! ```

use super::form::{AddForm, TextField};
use super::modes::{InputMode, ViewMode};
use super::search;
use crate::domain::{Group, Package, SortMode};
use crate::ui::theme::Theme;
use crate::worker::ListScope;
use std::collections::BTreeSet;

/// Severity of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
    Error,
}

/// One-line message shown under the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub kind: StatusKind,
}

/// Central session state container.
///
/// Mutated only by [`handle_event`](crate::app::handle_event), one event at a
/// time.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Packages of the current scope, ordered as fetched.
    pub packages: Vec<Package>,

    /// Indices into `packages` that pass the search filter, in display order.
    ///
    /// Equals `0..packages.len()` when no filter is active.
    pub visible: Vec<usize>,

    /// Live groups, ordered by name.
    pub groups: Vec<Group>,

    /// Ids of the marked packages.
    ///
    /// Keyed by id so marks survive re-sorting and re-filtering. Ids that no
    /// longer appear in a reloaded list are dropped.
    pub selection: BTreeSet<i64>,

    pub view_mode: ViewMode,
    pub input_mode: InputMode,

    /// An install is running; input is ignored except quitting.
    pub installing: bool,

    /// Group whose members are listed in [`ViewMode::GroupPackages`].
    pub active_group: Option<Group>,

    /// Listing order for the package view. Persists across view switches.
    pub sort_mode: SortMode,

    /// Listing order for the group member view. Reset to frequency each time
    /// a group is opened.
    pub group_sort: SortMode,

    /// Row within `visible`.
    pub package_cursor: usize,
    /// Row within `groups` in the groups view.
    pub group_cursor: usize,
    /// Row within `groups` in the assign picker.
    pub assign_cursor: usize,

    pub search_query: String,
    pub add_form: AddForm,
    pub group_name: TextField,

    pub status: Option<Status>,

    /// Spinner animation frame while installing.
    pub spinner_frame: usize,

    /// Color scheme for UI rendering.
    pub theme: Theme,
}

impl AppState {
    /// Creates the initial state: package view, normal input, nothing loaded.
    #[must_use]
    pub fn new(theme: Theme) -> Self {
        Self {
            packages: Vec::new(),
            visible: Vec::new(),
            groups: Vec::new(),
            selection: BTreeSet::new(),
            view_mode: ViewMode::Packages,
            input_mode: InputMode::Normal,
            installing: false,
            active_group: None,
            sort_mode: SortMode::default(),
            group_sort: SortMode::Frequency,
            package_cursor: 0,
            group_cursor: 0,
            assign_cursor: 0,
            search_query: String::new(),
            add_form: AddForm::default(),
            group_name: TextField::default(),
            status: None,
            spinner_frame: 0,
            theme,
        }
    }

    /// Scope a package listing must have to be shown in the current view.
    #[must_use]
    pub fn current_scope(&self) -> ListScope {
        match (&self.view_mode, &self.active_group) {
            (ViewMode::GroupPackages, Some(group)) => ListScope::Group(group.name.clone()),
            _ => ListScope::All,
        }
    }

    /// Re-ranks `packages` against the search query into `visible`.
    ///
    /// Leaves the cursor alone; callers decide whether to reset or clamp it.
    pub fn apply_search_filter(&mut self) {
        self.visible = search::rank(&self.packages, &self.search_query);
        tracing::trace!(
            total = self.packages.len(),
            visible = self.visible.len(),
            "search filter applied"
        );
    }

    /// Installs a freshly fetched package list.
    ///
    /// Re-applies the active filter, drops selection entries for packages that
    /// disappeared, and resets the cursor to the top when it fell off the end.
    pub fn replace_packages(&mut self, packages: Vec<Package>) {
        self.packages = packages;
        let before = self.selection.len();
        let packages = &self.packages;
        self.selection.retain(|id| packages.iter().any(|p| p.id == *id));
        if self.selection.len() != before {
            tracing::debug!(
                dropped = before - self.selection.len(),
                "selection pruned after reload"
            );
        }

        self.apply_search_filter();
        if self.package_cursor >= self.visible.len() {
            self.package_cursor = 0;
        }
    }

    /// Installs a freshly fetched group list, resetting cursors that fell off
    /// the end.
    pub fn replace_groups(&mut self, groups: Vec<Group>) {
        self.groups = groups;
        if self.group_cursor >= self.groups.len() {
            self.group_cursor = 0;
        }
        if self.assign_cursor >= self.groups.len() {
            self.assign_cursor = 0;
        }
    }

    /// Empties the package list, e.g. before a different scope is fetched.
    pub fn clear_packages(&mut self) {
        self.packages.clear();
        self.visible.clear();
        self.package_cursor = 0;
    }

    /// Drops the search filter.
    pub fn clear_search(&mut self) {
        self.search_query.clear();
        self.apply_search_filter();
    }

    /// Package under the cursor.
    #[must_use]
    pub fn cursor_package(&self) -> Option<&Package> {
        self.visible
            .get(self.package_cursor)
            .and_then(|&idx| self.packages.get(idx))
    }

    /// Group under the cursor in the groups view.
    #[must_use]
    pub fn cursor_group(&self) -> Option<&Group> {
        self.groups.get(self.group_cursor)
    }

    /// Group under the cursor in the assign picker.
    #[must_use]
    pub fn assign_target(&self) -> Option<&Group> {
        self.groups.get(self.assign_cursor)
    }

    /// Moves the cursor of the active list up, stopping at the top.
    pub fn move_up(&mut self) {
        let cursor = self.active_cursor_mut();
        *cursor = cursor.saturating_sub(1);
    }

    /// Moves the cursor of the active list down, stopping at the bottom.
    pub fn move_down(&mut self) {
        let len = self.active_list_len();
        let cursor = self.active_cursor_mut();
        if *cursor + 1 < len {
            *cursor += 1;
        }
    }

    fn active_list_len(&self) -> usize {
        match (self.input_mode, self.view_mode) {
            (InputMode::Assigning, _) | (_, ViewMode::Groups) => self.groups.len(),
            _ => self.visible.len(),
        }
    }

    fn active_cursor_mut(&mut self) -> &mut usize {
        match (self.input_mode, self.view_mode) {
            (InputMode::Assigning, _) => &mut self.assign_cursor,
            (_, ViewMode::Groups) => &mut self.group_cursor,
            _ => &mut self.package_cursor,
        }
    }

    /// Marks or unmarks the package under the cursor.
    pub fn toggle_selection(&mut self) {
        let Some(id) = self.cursor_package().map(|p| p.id) else {
            return;
        };
        if !self.selection.remove(&id) {
            self.selection.insert(id);
        }
    }

    /// Marked packages, in list order.
    #[must_use]
    pub fn selected_packages(&self) -> Vec<&Package> {
        self.packages
            .iter()
            .filter(|p| self.selection.contains(&p.id))
            .collect()
    }

    #[must_use]
    pub fn selected_urls(&self) -> Vec<String> {
        self.selected_packages().iter().map(|p| p.url.clone()).collect()
    }

    #[must_use]
    pub fn selected_names(&self) -> Vec<String> {
        self.selected_packages().iter().map(|p| p.name.clone()).collect()
    }

    #[must_use]
    pub fn selected_ids(&self) -> Vec<i64> {
        self.selection.iter().copied().collect()
    }

    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        let text = text.into();
        tracing::debug!(status = %text, kind = ?kind, "status updated");
        self.status = Some(Status { text, kind });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.set_status(StatusKind::Info, text);
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.set_status(StatusKind::Warning, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.set_status(StatusKind::Error, text);
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }
}
