//! The interactive session as a pure state machine.
//!
//! [`session`](crate::session) feeds key presses and worker replies in;
//! [`handle_event`] mutates [`AppState`] and hands back [`Action`]s for the
//! runtime to carry out. Nothing in here does I/O.
//!
//! ```text
//! Key Press → keymap → Event → handle_event → State Mutations → Actions → Worker
//!                                  ↑                                        ↓
//!                                  └──────────── Worker Responses ──────────┘
//! ```
//!
//! [`keymap`] decides which key means what in each [`InputMode`], [`form`]
//! holds the text prompts, [`search`] ranks packages for the filter and
//! [`view`] derives the frame description.
//!
//! ```rust
//! use modstash::app::{handle_event, AppState, Event};
//! use modstash::ui::Theme;
//!
//! let mut state = AppState::new(Theme::default());
//! let (render, _actions) = handle_event(&mut state, &Event::StartSearch)?;
//! assert!(render);
//! # Ok::<(), modstash::domain::error::ModstashError>(())
//! ```

pub mod actions;
pub mod form;
pub mod handler;
pub mod keymap;
pub mod modes;
pub mod search;
pub mod state;
pub mod view;

pub use actions::Action;
pub use handler::{handle_event, startup_actions, Event};
pub use modes::{InputMode, ViewMode};
pub use state::{AppState, Status, StatusKind};
