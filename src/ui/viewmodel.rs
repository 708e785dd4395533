//! One frame's worth of display data.
//!
//! Built by `AppState::compute_viewmodel` for a given terminal size: rows are
//! already windowed, timestamps already formatted and search matches already
//! located. The components only lay them out.

use crate::app::StatusKind;

/// Everything drawn in one frame, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    /// Shown while searching and while a confirmed filter is applied.
    pub search_bar: Option<SearchBarInfo>,

    pub body: Body,

    pub status: Option<StatusLine>,

    /// Drawn on top of the body.
    pub overlay: Option<Overlay>,

    pub footer: FooterInfo,
}

/// Between the header and the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Only the rows that fit.
    Packages(Vec<PackageRow>),
    Groups(Vec<GroupRow>),
    Empty(EmptyState),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRow {
    pub name: String,
    pub url: String,
    pub version: String,
    pub freq: u32,
    /// Relative time, e.g. "5m ago" or "never".
    pub last_used: String,

    pub is_cursor: bool,

    /// Drawn with a `●`.
    pub is_marked: bool,

    /// Half-open `(start, end)` char ranges of `name` that matched the query.
    pub highlight_ranges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRow {
    pub name: String,
    pub is_cursor: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
    /// Scope, sort order and selection count.
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// Key hints for the current mode.
    pub keybindings: String,
}

/// Shown instead of rows when the list is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
    /// Keystrokes currently go to the query.
    pub editing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub kind: StatusKind,
}

/// Modal boxes drawn over the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    AddForm(AddFormView),
    GroupName {
        value: String,
    },
    AssignPicker {
        /// Number of packages being assigned.
        count: usize,
        groups: Vec<GroupRow>,
    },
    Installing {
        spinner: char,
        label: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddFormView {
    pub fields: Vec<FieldView>,
    pub install: bool,
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub label: String,
    pub value: String,
    /// Shown dimmed while `value` is empty.
    pub placeholder: String,
    pub focused: bool,
}
