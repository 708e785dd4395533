//! Storage layer for persistent registry data.
//!
//! This module provides the storage abstraction for packages, groups and their
//! memberships. Deletes are soft by default; rows stay on disk until purged.
//!
//! # Modules
//!
//! - `backend`: Storage trait abstraction for backend implementations
//! - `json`: JSON file-based storage implementation
//! - `ordering`: Frequency and recency sorts for package listings
//! - `models`: Storage record types separate from domain models

pub mod backend;
pub mod json;
pub mod models;
pub mod ordering;

pub use backend::Storage;
pub use json::JsonStorage;
pub use models::{GroupRecord, MembershipRecord, NameUrl, PackageRecord};
pub use ordering::{sort_by_frequency, sort_by_last_used};
