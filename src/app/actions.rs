//! Actions representing side effects to be executed by the session runtime.
//!
//! The event handler never performs I/O. It returns a `Vec<Action>` and the
//! runtime executes them in order after the state update has completed.
//!
//! # Example
//!
//! ```rust
//! use modstash::app::Action;
//! use modstash::domain::SortMode;
//! use modstash::worker::WorkerMessage;
//!
//! let actions = vec![
//!     Action::PostToWorker(WorkerMessage::load_packages(SortMode::LastUsed)),
//! ];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::worker::WorkerMessage;

/// Commands representing side effects to be executed by the session runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Leaves the session and restores the terminal.
    ///
    /// Emitted for a soft quit when nothing is installing, and for a hard quit
    /// unconditionally.
    Quit,

    /// Hands a command to the background dispatcher.
    PostToWorker(WorkerMessage),
}
