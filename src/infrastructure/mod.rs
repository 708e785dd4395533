//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where the store, the log file and the configuration live.

pub mod paths;

pub use paths::{default_config_path, default_data_dir, expand_tilde, log_path, store_path};
