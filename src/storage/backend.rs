//! The persistence seam under [`crate::registry::Registry`].
//!
//! One method per query the registry issues. Reads fail only on I/O; the
//! error sections below cover the domain failures writes can report.

use crate::domain::error::Result;
use crate::storage::models::{GroupRecord, NameUrl, PackageRecord};

/// Package, group and membership rows with soft deletion.
///
/// The registry keeps the backend behind a mutex and never holds it across an
/// installer run. [`crate::storage::JsonStorage`] is the only implementation.
///
/// ```no_run
/// use modstash::storage::{JsonStorage, Storage};
///
/// let store = JsonStorage::new("/tmp/modstash.json".into())?;
/// let most_used = store.list_by_frequency(10)?;
/// # Ok::<(), modstash::ModstashError>(())
/// ```
pub trait Storage: Send {
    /// Inserts a package and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ModstashError::Conflict`] if any package row already uses
    /// `name`. Soft-deleted rows keep their name reserved until purged.
    fn add_package(&mut self, name: &str, url: &str, version: Option<&str>) -> Result<i64>;

    /// Overwrites url and version of the non-deleted package called `name`.
    ///
    /// Identity and usage statistics are preserved.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ModstashError::NotFound`] if no live package has that name.
    fn update_package_by_name(&mut self, name: &str, url: &str, version: Option<&str>)
        -> Result<i64>;

    /// Lists live packages by usage count, most used first. `limit < 0` is unbounded.
    fn list_by_frequency(&self, limit: i64) -> Result<Vec<PackageRecord>>;

    /// Lists live packages by last install time, most recent first. `limit < 0`
    /// is unbounded.
    fn list_by_last_used(&self, limit: i64) -> Result<Vec<PackageRecord>>;

    /// Soft-deletes every live package whose name is in `names`.
    ///
    /// Returns the number of rows marked.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn mark_deleted(&mut self, names: &[String]) -> Result<usize>;

    /// Resolves aliases to urls. Unknown names are omitted, not reported.
    fn get_urls_by_names(&self, names: &[String]) -> Result<Vec<NameUrl>>;

    /// Inserts a group and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ModstashError::Conflict`] if a live group has that name.
    fn create_group(&mut self, name: &str) -> Result<i64>;

    /// Lists live groups ordered by name.
    fn list_groups(&self) -> Result<Vec<GroupRecord>>;

    /// Looks up a live group id by name.
    fn get_group_id_by_name(&self, name: &str) -> Result<Option<i64>>;

    /// Looks up a live package id by url.
    fn get_package_id_by_url(&self, url: &str) -> Result<Option<i64>>;

    /// Records that `package_id` belongs to `group_id`. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn assign_package_to_group(&mut self, group_id: i64, package_id: i64) -> Result<()>;

    /// Lists the live member packages of the named live group, unsorted.
    fn list_packages_by_group(&self, group: &str) -> Result<Vec<PackageRecord>>;

    /// Deletes the membership rows linking `package_ids` to `group_id`.
    ///
    /// Returns the number of memberships removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn remove_packages_from_group(&mut self, group_id: i64, package_ids: &[i64])
        -> Result<usize>;

    /// Soft-deletes the named live group. Memberships are kept.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ModstashError::NotFound`] if no live group has that name.
    fn delete_group(&mut self, name: &str) -> Result<()>;

    /// Increments the usage counter of every live package at `url` and stamps
    /// `last_used` with `timestamp`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ModstashError::NotFound`] if no live package has that url.
    fn update_package_usage(&mut self, url: &str, timestamp: i64) -> Result<()>;

    /// Permanently erases soft-deleted packages and groups, with the memberships
    /// that reference them. Returns `(packages, groups)` removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn purge_deleted(&mut self) -> Result<(usize, usize)>;

    /// Backs up the store and recreates an empty schema.
    ///
    /// Returns the backup location.
    ///
    /// # Errors
    ///
    /// Returns an error if the backup or the rewrite fails.
    fn reset(&mut self) -> Result<std::path::PathBuf>;
}
