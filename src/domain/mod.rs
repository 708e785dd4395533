//! Domain layer for modstash.
//!
//! Core types and pure rules, independent of storage, terminal or process
//! concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`package`]: Package and group models, URL normalization, alias derivation
//!
//! # Examples
//!
//! ```
//! use modstash::domain::{derive_alias, normalize_url};
//!
//! let url = normalize_url("https://github.com/acme/foo/v3");
//! assert_eq!(derive_alias(&url), "foo");
//! ```

pub mod error;
pub mod package;

pub use error::{ModstashError, Result};
pub use package::{derive_alias, normalize_url, Group, Package, SortMode};
