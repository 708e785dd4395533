//! Storage record models for the persistence layer.
//!
//! These types are the on-disk representation of the registry. They carry the
//! bookkeeping fields the domain types leave out (soft-delete flag, creation
//! time) and convert into [`Package`] / [`Group`] when handed to callers.

use crate::domain::{Group, Package};
use serde::{Deserialize, Serialize};

/// A package row.
///
/// Rows are never removed by ordinary deletes; `deleted` hides them from every
/// listing until [`crate::storage::Storage::purge_deleted`] erases them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    /// Store-assigned identifier.
    pub id: i64,

    /// Alias, unique among non-deleted rows.
    pub name: String,

    /// Normalized source location.
    pub url: String,

    /// Pinned version, `None` for latest.
    #[serde(default)]
    pub version: Option<String>,

    /// Number of successful installs.
    #[serde(default)]
    pub freq: u32,

    /// Unix timestamp of the last successful install, `None` if never installed.
    #[serde(default)]
    pub last_used: Option<i64>,

    /// Soft-delete marker.
    #[serde(default)]
    pub deleted: bool,

    /// Unix timestamp when the row was inserted.
    pub created_at: i64,
}

impl PackageRecord {
    /// Creates a fresh, never-installed row.
    ///
    /// ```
    /// use modstash::storage::PackageRecord;
    ///
    /// let record = PackageRecord::new(7, "foo", "github.com/acme/foo", None);
    /// assert_eq!(record.freq, 0);
    /// assert!(!record.deleted);
    /// ```
    pub fn new(
        id: i64,
        name: impl Into<String>,
        url: impl Into<String>,
        version: Option<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            url: url.into(),
            version,
            freq: 0,
            last_used: None,
            deleted: false,
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Converts the row into the domain type.
    #[must_use]
    pub fn to_package(&self) -> Package {
        Package {
            id: self.id,
            name: self.name.clone(),
            url: self.url.clone(),
            version: self.version.clone(),
            freq: self.freq,
            last_used: self.last_used,
        }
    }
}

/// A group row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub deleted: bool,
}

impl GroupRecord {
    /// Converts the row into the domain type.
    #[must_use]
    pub fn to_group(&self) -> Group {
        Group {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// A group-to-package association.
///
/// Independent of either side's lifecycle: soft-deleting a package or a group
/// leaves the membership in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MembershipRecord {
    pub group_id: i64,
    pub package_id: i64,
}

/// Result row of an alias lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameUrl {
    pub name: String,
    pub url: String,
}
