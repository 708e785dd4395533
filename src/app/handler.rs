//! Event handling and state transition logic.
//!
//! This module implements the session reducer: it takes one [`Event`] at a
//! time, mutates [`AppState`] and returns the actions the runtime must execute.
//! The reducer never performs I/O and never blocks.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the key mapper, the ticker or a worker thread
//! 2. [`handle_event`] routes on the install flag, then the input mode, then
//!    the view mode
//! 3. State mutations occur via `AppState` methods
//! 4. Actions are collected and returned for execution
//!
//! # Event Types
//!
//! - **Navigation**: `Up`, `Down`, `Activate`, `ShowGroups`, `Back`
//! - **Commands**: `Install`, `Delete`, `RemoveFromGroup`, sort keys
//! - **Input**: `Char`, `Backspace`, `NextField`, `Submit`, `Cancel`
//! - **System**: `Tick`, `HardQuit`
//! - **Worker**: `Worker` with a typed [`WorkerResponse`]
//!
//! # Example
//!
//! ```rust
//! use modstash::app::{handle_event, Action, AppState, Event};
//! use modstash::ui::Theme;
//!
//! let mut state = AppState::new(Theme::default());
//! let (_render, actions) = handle_event(&mut state, &Event::Back)?;
//! assert_eq!(actions, vec![Action::Quit]);
//! # Ok::<(), modstash::domain::error::ModstashError>(())
//! ```

use crate::app::modes::{InputMode, ViewMode};
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::{normalize_url, SortMode};
use crate::worker::{Operation, WorkerMessage, WorkerResponse};

/// Events produced by the key mapper, the ticker, and workers.
///
/// Key events are already interpreted for the current mode by
/// [`map_key`](crate::app::keymap::map_key), so `Back` means "q or esc in
/// normal mode" and `Cancel` means "esc inside an input mode".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Moves the cursor of the active list up by one row.
    Up,
    /// Moves the cursor of the active list down by one row.
    Down,
    /// Toggles the mark on the cursor row, or opens the group under the cursor.
    Activate,
    SortByFrequency,
    SortByLastUsed,
    /// Switches from the package view to the groups view.
    ShowGroups,
    /// Leaves the current view; quits from the package view.
    Back,
    StartAdding,
    StartCreatingGroup,
    StartAssigning,
    StartSearch,
    /// Soft-deletes the marked packages, or the group under the cursor.
    Delete,
    /// Installs the marked packages, or the group under the cursor.
    Install,
    RemoveFromGroup,

    /// Appends a character to the focused text buffer.
    Char(char),
    /// Removes the last character of the focused text buffer.
    Backspace,
    NextField,
    PrevField,
    ToggleInstallFlag,
    ToggleForceFlag,
    /// Confirms the current input mode.
    Submit,
    /// Abandons the current input mode.
    Cancel,

    /// Periodic wake-up that animates the install spinner.
    Tick,
    /// Quits unconditionally, even mid-install.
    HardQuit,

    /// Wraps a response from a background worker.
    Worker(WorkerResponse),
}

const SELECT_FIRST: &str = "Select packages first!";
const WAIT_FOR_INSTALL: &str = "Wait for installation to finish or use Ctrl+C to force quit.";

type Outcome = (bool, Vec<Action>);

/// Processes an event, mutates application state, and returns actions to execute.
///
/// The returned flag says whether the screen needs repainting. Actions are
/// executed in order by the runtime after this call returns.
///
/// # Errors
///
/// Currently infallible; the `Result` keeps the runtime loop uniform with the
/// rest of the crate.
///
/// # Tracing
///
/// Each call creates a debug-level span with the event and current modes.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event",
        event_type = ?event,
        view = ?state.view_mode,
        input = ?state.input_mode,
        installing = state.installing
    ).entered();

    let outcome = match event {
        Event::HardQuit => {
            tracing::debug!("hard quit requested");
            (false, vec![Action::Quit])
        }
        Event::Tick => {
            if state.installing {
                state.advance_spinner();
                (true, vec![])
            } else {
                (false, vec![])
            }
        }
        Event::Worker(response) => handle_worker_response(state, response),
        _ if state.installing => handle_while_installing(state, event),
        _ => match state.input_mode {
            InputMode::Normal => handle_normal(state, event),
            InputMode::Adding => handle_adding(state, event),
            InputMode::Searching => handle_searching(state, event),
            InputMode::Assigning => handle_assigning(state, event),
            InputMode::CreatingGroup => handle_creating_group(state, event),
        },
    };

    Ok(outcome)
}

/// Commands issued once when a session opens: the package list in the
/// current sort order, and the groups so assigning works right away.
#[must_use]
pub fn startup_actions(state: &AppState) -> Vec<Action> {
    vec![
        post(WorkerMessage::load_packages(state.sort_mode)),
        post(WorkerMessage::load_groups()),
    ]
}

fn post(message: WorkerMessage) -> Action {
    Action::PostToWorker(message)
}

/// Re-fetch for whatever list is on screen.
fn refresh_current(state: &AppState) -> Action {
    match (state.view_mode, &state.active_group) {
        (ViewMode::GroupPackages, Some(group)) => post(WorkerMessage::load_group_packages(
            group.name.clone(),
            state.group_sort,
        )),
        (ViewMode::Groups, _) => post(WorkerMessage::load_groups()),
        _ => post(WorkerMessage::load_packages(state.sort_mode)),
    }
}

fn handle_while_installing(state: &mut AppState, event: &Event) -> Outcome {
    if *event == Event::Back {
        state.warn(WAIT_FOR_INSTALL);
        return (true, vec![]);
    }
    tracing::trace!("input ignored while installing");
    (false, vec![])
}

fn start_install(state: &mut AppState, message: WorkerMessage) -> Outcome {
    tracing::debug!(operation = message.operation().label(), "install started");
    state.installing = true;
    state.spinner_frame = 0;
    state.status = None;
    (true, vec![post(message)])
}

#[allow(clippy::too_many_lines)]
fn handle_normal(state: &mut AppState, event: &Event) -> Outcome {
    let view = state.view_mode;
    let in_package_list = matches!(view, ViewMode::Packages | ViewMode::GroupPackages);

    match event {
        Event::Up => {
            state.move_up();
            (true, vec![])
        }
        Event::Down => {
            state.move_down();
            (true, vec![])
        }
        Event::Activate if view == ViewMode::Groups => {
            let Some(group) = state.cursor_group().cloned() else {
                return (false, vec![]);
            };
            tracing::debug!(group = %group.name, "opening group");
            state.view_mode = ViewMode::GroupPackages;
            state.group_sort = SortMode::Frequency;
            state.selection.clear();
            state.search_query.clear();
            state.clear_packages();
            let load = WorkerMessage::load_group_packages(group.name.clone(), state.group_sort);
            state.active_group = Some(group);
            (true, vec![post(load)])
        }
        Event::Activate => {
            state.toggle_selection();
            (true, vec![])
        }
        Event::SortByFrequency | Event::SortByLastUsed => {
            let mode = if *event == Event::SortByFrequency {
                SortMode::Frequency
            } else {
                SortMode::LastUsed
            };
            state.sort_mode = mode;
            state.info(format!("Sorted by {}", mode.label()));
            match (view, &state.active_group) {
                (ViewMode::Packages, _) => (true, vec![post(WorkerMessage::load_packages(mode))]),
                (ViewMode::GroupPackages, Some(group)) => {
                    let load = WorkerMessage::load_group_packages(group.name.clone(), mode);
                    state.group_sort = mode;
                    (true, vec![post(load)])
                }
                _ => (true, vec![]),
            }
        }
        Event::ShowGroups if view == ViewMode::Packages => {
            state.view_mode = ViewMode::Groups;
            state.group_cursor = 0;
            state.clear_search();
            (true, vec![post(WorkerMessage::load_groups())])
        }
        Event::Back => match view {
            ViewMode::GroupPackages => {
                state.view_mode = ViewMode::Groups;
                state.active_group = None;
                state.selection.clear();
                state.clear_search();
                state.package_cursor = 0;
                (true, vec![])
            }
            ViewMode::Groups => {
                state.view_mode = ViewMode::Packages;
                state.clear_packages();
                (true, vec![post(WorkerMessage::load_packages(state.sort_mode))])
            }
            ViewMode::Packages => (false, vec![Action::Quit]),
        },
        Event::StartAdding if in_package_list => {
            state.add_form.reset();
            state.input_mode = InputMode::Adding;
            (true, vec![])
        }
        Event::StartCreatingGroup => {
            state.group_name.clear();
            state.input_mode = InputMode::CreatingGroup;
            (true, vec![])
        }
        Event::StartAssigning if in_package_list => {
            if state.selection.is_empty() {
                state.warn(SELECT_FIRST);
                return (true, vec![]);
            }
            state.assign_cursor = 0;
            state.input_mode = InputMode::Assigning;
            (true, vec![post(WorkerMessage::load_groups())])
        }
        Event::StartSearch if in_package_list => {
            state.clear_search();
            state.input_mode = InputMode::Searching;
            (true, vec![])
        }
        Event::Delete if view == ViewMode::Groups => {
            let Some(group) = state.cursor_group() else {
                return (false, vec![]);
            };
            let name = group.name.clone();
            state.info(format!("Deleting group {name}..."));
            (true, vec![post(WorkerMessage::delete_group(name))])
        }
        Event::Delete => {
            let names = state.selected_names();
            if names.is_empty() {
                state.warn(SELECT_FIRST);
                return (true, vec![]);
            }
            state.info(format!("Deleting {} package(s)...", names.len()));
            (true, vec![post(WorkerMessage::delete_packages(names))])
        }
        Event::Install if view == ViewMode::Groups => {
            let Some(group) = state.cursor_group() else {
                return (false, vec![]);
            };
            let message = WorkerMessage::install_group(group.name.clone());
            start_install(state, message)
        }
        Event::Install => {
            let urls = state.selected_urls();
            if urls.is_empty() {
                state.warn(SELECT_FIRST);
                return (true, vec![]);
            }
            state.selection.clear();
            start_install(state, WorkerMessage::install_packages(urls))
        }
        Event::RemoveFromGroup if view == ViewMode::GroupPackages => {
            let Some(group_id) = state.active_group.as_ref().map(|g| g.id) else {
                return (false, vec![]);
            };
            if state.selection.is_empty() {
                state.warn(SELECT_FIRST);
                return (true, vec![]);
            }
            let ids = state.selected_ids();
            state.info("Removing packages from group...");
            (true, vec![post(WorkerMessage::remove_from_group(group_id, ids))])
        }
        _ => (false, vec![]),
    }
}

fn handle_adding(state: &mut AppState, event: &Event) -> Outcome {
    let form = &mut state.add_form;
    match event {
        Event::Char(c) => form.focused_mut().push(*c),
        Event::Backspace => form.focused_mut().pop(),
        Event::NextField | Event::Down => form.next_field(),
        Event::PrevField | Event::Up => form.prev_field(),
        Event::ToggleInstallFlag => form.install = !form.install,
        Event::ToggleForceFlag => form.force = !form.force,
        Event::Submit if !form.on_last_field() => form.next_field(),
        Event::Submit => {
            if normalize_url(form.url()).is_empty() {
                return (false, vec![]);
            }
            let message = WorkerMessage::add_package(
                form.url().to_string(),
                form.name().to_string(),
                form.version().to_string(),
                form.install,
                form.force,
            );
            let url = form.url().to_string();
            form.reset();
            state.input_mode = InputMode::Normal;
            state.info(format!("Adding {url}..."));
            return (true, vec![post(message)]);
        }
        Event::Cancel => {
            form.reset();
            state.input_mode = InputMode::Normal;
        }
        _ => return (false, vec![]),
    }
    (true, vec![])
}

fn handle_searching(state: &mut AppState, event: &Event) -> Outcome {
    match event {
        Event::Char(c) => {
            state.search_query.push(*c);
            tracing::trace!(query = %state.search_query, "search query updated");
            state.apply_search_filter();
            state.package_cursor = 0;
        }
        Event::Backspace => {
            state.search_query.pop();
            state.apply_search_filter();
            state.package_cursor = 0;
        }
        Event::Up => state.move_up(),
        Event::Down => state.move_down(),
        Event::Submit => {
            tracing::debug!(query = %state.search_query, "search confirmed");
            state.input_mode = InputMode::Normal;
        }
        Event::Cancel => {
            state.clear_search();
            state.package_cursor = 0;
            state.input_mode = InputMode::Normal;
        }
        _ => return (false, vec![]),
    }
    (true, vec![])
}

fn handle_assigning(state: &mut AppState, event: &Event) -> Outcome {
    match event {
        Event::Up => state.move_up(),
        Event::Down => state.move_down(),
        Event::Submit => {
            state.input_mode = InputMode::Normal;
            let Some(group) = state.assign_target().map(|g| g.name.clone()) else {
                return (true, vec![]);
            };
            let urls = state.selected_urls();
            state.info(format!("Assigning {} packages to '{group}'...", urls.len()));
            return (true, vec![post(WorkerMessage::assign_to_group(urls, group))]);
        }
        Event::Cancel => state.input_mode = InputMode::Normal,
        _ => return (false, vec![]),
    }
    (true, vec![])
}

fn handle_creating_group(state: &mut AppState, event: &Event) -> Outcome {
    match event {
        Event::Char(c) => state.group_name.push(*c),
        Event::Backspace => state.group_name.pop(),
        Event::Submit => {
            let name = state.group_name.value().trim().to_string();
            state.group_name.clear();
            state.input_mode = InputMode::Normal;
            if name.is_empty() {
                return (true, vec![]);
            }
            state.info(format!("Creating group {name}..."));
            return (true, vec![post(WorkerMessage::create_group(name))]);
        }
        Event::Cancel => {
            state.group_name.clear();
            state.input_mode = InputMode::Normal;
        }
        _ => return (false, vec![]),
    }
    (true, vec![])
}

/// Status prefix for a failed operation.
const fn error_prefix(operation: Operation) -> &'static str {
    match operation {
        Operation::InstallPackages | Operation::InstallGroup => "Error: ",
        Operation::LoadPackages => "Error loading packages: ",
        Operation::LoadGroups => "Error fetching groups: ",
        Operation::LoadGroupPackages => "Error loading group: ",
        Operation::AddPackage => "Error adding: ",
        Operation::RecordUsage => "Error updating stats: ",
        Operation::DeletePackages => "Error deleting: ",
        Operation::CreateGroup => "Error creating group: ",
        Operation::AssignToGroup => "Error assigning: ",
        Operation::RemoveFromGroup => "Error removing: ",
        Operation::DeleteGroup => "Error deleting group: ",
    }
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> Outcome {
    match response {
        WorkerResponse::PackagesLoaded { scope, packages } => {
            if *scope != state.current_scope() {
                tracing::debug!(scope = ?scope, "dropping listing for a scope no longer shown");
                return (false, vec![]);
            }
            if state.packages == *packages {
                tracing::debug!("packages unchanged, skipping render");
                return (false, vec![]);
            }
            state.replace_packages(packages.clone());
            (true, vec![])
        }
        WorkerResponse::GroupsLoaded { groups } => {
            state.replace_groups(groups.clone());
            (true, vec![])
        }
        WorkerResponse::PackageAdded { name } => {
            tracing::debug!(name = %name, "package added");
            state.info("Package added successfully!");
            (true, vec![refresh_current(state)])
        }
        WorkerResponse::PackagesInstalled { urls } => {
            state.installing = false;
            state.info("Installation complete!");
            (true, vec![post(WorkerMessage::record_usage(urls.clone()))])
        }
        WorkerResponse::UsageRecorded { count } => {
            tracing::debug!(count = count, "usage recorded");
            (false, vec![refresh_current(state)])
        }
        WorkerResponse::PackagesDeleted { count } => {
            state.info(format!("Deleted {count} package(s)"));
            (true, vec![refresh_current(state)])
        }
        WorkerResponse::GroupCreated { group } => {
            state.info(format!("Group '{}' created!", group.name));
            (true, vec![post(WorkerMessage::load_groups())])
        }
        WorkerResponse::PackagesAssigned { group, count } => {
            state.info(format!("Assigned {count} packages to '{group}'"));
            state.selection.clear();
            let shows_group = state
                .active_group
                .as_ref()
                .is_some_and(|g| state.view_mode == ViewMode::GroupPackages && g.name == *group);
            if shows_group {
                (true, vec![refresh_current(state)])
            } else {
                (true, vec![])
            }
        }
        WorkerResponse::PackagesRemoved { count } => {
            tracing::debug!(count = count, "packages removed from group");
            state.info("Packages removed from group.");
            state.selection.clear();
            (true, vec![refresh_current(state)])
        }
        WorkerResponse::GroupInstalled { group, count } => {
            tracing::debug!(group = %group, count = count, "group installed");
            state.installing = false;
            state.info("Group installed successfully");
            (true, vec![])
        }
        WorkerResponse::GroupDeleted { name } => {
            state.info(format!("Group '{name}' deleted"));
            (true, vec![post(WorkerMessage::load_groups())])
        }
        WorkerResponse::Error { operation, message } => {
            tracing::error!(operation = operation.label(), error = %message, "worker error");
            if operation.is_install() {
                state.installing = false;
            }
            state.error(format!("{}{message}", error_prefix(*operation)));
            (true, vec![])
        }
    }
}
