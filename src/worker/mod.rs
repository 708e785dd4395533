//! Background workers for registry operations.
//!
//! Installs and store queries run off the UI thread. The session posts a
//! [`WorkerMessage`] to the [`Dispatcher`], which runs it on a dedicated thread
//! and feeds the [`WorkerResponse`] back into the session's single inbound
//! queue.
//!
//! # Architecture
//!
//! - `messages`: Command/completion protocol types
//! - `handler`: Message execution and thread dispatch

pub mod handler;
pub mod messages;

pub use handler::{Dispatcher, Worker};
pub use messages::{ListScope, Operation, WorkerMessage, WorkerResponse};
