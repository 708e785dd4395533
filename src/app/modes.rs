//! Input and view mode state types for the application.
//!
//! The session is a two-axis state machine. [`ViewMode`] says which list is on
//! screen; [`InputMode`] says how keys are interpreted. The busy overlay
//! shown while an install runs is a separate flag on
//! [`AppState`](crate::app::AppState), so an install never loses the mode the
//! user was in.
//!
//! # State Machine
//!
//! ```text
//!            g                    enter/space
//! Packages ─────► Groups ───────────────────► GroupPackages
//!    ▲     q/esc    │ ▲        q/esc                │
//!    └──────────────┘ └─────────────────────────────┘
//! ```
//!
//! Input modes are entered from `Normal` (`+` Adding, `/` Searching,
//! `a` Assigning, `c` CreatingGroup) and always return to `Normal`.

/// Which list the session is browsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// Every live package in the registry.
    #[default]
    Packages,

    /// Live groups, by name.
    Groups,

    /// Members of the active group.
    GroupPackages,
}

/// Current input handling mode.
///
/// Controls which keybindings are active and which overlay is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Navigation and single-key commands.
    #[default]
    Normal,

    /// The add form is open.
    Adding,

    /// Typing a fuzzy filter over the package list.
    Searching,

    /// Picking a group for the selected packages.
    Assigning,

    /// Typing the name of a new group.
    CreatingGroup,
}
