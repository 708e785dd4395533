//! The registry's on-disk store: one pretty-printed JSON document.
//!
//! The whole document lives in memory. Every mutation rewrites the file by
//! writing a sibling `.tmp` and renaming it over the original, so a crash
//! leaves either the old or the new contents on disk. At the size of a
//! personal registry a full rewrite per change is cheap.

use crate::domain::error::{ModstashError, Result};
use crate::storage::backend::Storage;
use crate::storage::models::{GroupRecord, MembershipRecord, NameUrl, PackageRecord};
use crate::storage::ordering::{sort_by_frequency, sort_by_last_used};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Bumped when the document layout changes incompatibly.
const FORMAT_VERSION: u32 = 1;

/// Root of the JSON document. Id counters are persisted next to the rows so an
/// id is never handed out twice, even after a purge.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Document {
    version: u32,

    #[serde(default = "first_id")]
    next_package_id: i64,
    #[serde(default = "first_id")]
    next_group_id: i64,

    /// Insertion order, tombstoned rows included.
    #[serde(default)]
    packages: Vec<PackageRecord>,
    #[serde(default)]
    groups: Vec<GroupRecord>,
    #[serde(default)]
    memberships: Vec<MembershipRecord>,
}

const fn first_id() -> i64 {
    1
}

impl Document {
    fn empty() -> Self {
        Self {
            version: FORMAT_VERSION,
            next_package_id: first_id(),
            next_group_id: first_id(),
            packages: Vec::new(),
            groups: Vec::new(),
            memberships: Vec::new(),
        }
    }

    fn live_packages(&self) -> impl Iterator<Item = &PackageRecord> {
        self.packages.iter().filter(|p| !p.deleted)
    }

    fn live_group(&self, name: &str) -> Option<&GroupRecord> {
        self.groups.iter().find(|g| !g.deleted && g.name == name)
    }
}

/// [`Storage`] backed by a single JSON file.
///
/// Not `Sync`; [`Registry`](crate::registry::Registry) serializes access with
/// a mutex.
///
/// ```json
/// {
///   "version": 1,
///   "next_package_id": 3,
///   "next_group_id": 2,
///   "packages": [
///     {
///       "id": 1,
///       "name": "log",
///       "url": "github.com/charmbracelet/log",
///       "version": null,
///       "freq": 4,
///       "last_used": 1700000000,
///       "deleted": false,
///       "created_at": 1690000000
///     }
///   ],
///   "groups": [{ "id": 1, "name": "cli", "deleted": false }],
///   "memberships": [{ "group_id": 1, "package_id": 1 }]
/// }
/// ```
pub struct JsonStorage {
    path: PathBuf,
    doc: Document,
    /// Set when `doc` holds changes the file does not.
    unsaved: bool,
}

impl JsonStorage {
    /// Opens the store at `path`, starting empty when the file does not exist
    /// yet. Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Fails when the directory cannot be created, the file cannot be read,
    /// or its contents are not a store document this version understands.
    ///
    /// ```no_run
    /// use modstash::storage::JsonStorage;
    ///
    /// let store = JsonStorage::new("/tmp/modstash.json".into())?;
    /// # Ok::<(), modstash::ModstashError>(())
    /// ```
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let doc = if path.exists() {
            Self::read_document(&path)?
        } else {
            tracing::debug!(path = %path.display(), "no store yet, starting empty");
            Document::empty()
        };

        tracing::debug!(
            path = %path.display(),
            packages = doc.packages.len(),
            groups = doc.groups.len(),
            memberships = doc.memberships.len(),
            "store opened"
        );

        Ok(Self {
            path,
            doc,
            unsaved: false,
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(path: &Path) -> Result<Document> {
        let raw = std::fs::read_to_string(path)?;
        let doc: Document = serde_json::from_str(&raw)
            .map_err(|e| ModstashError::Storage(format!("{} is not a valid store: {e}", path.display())))?;

        if doc.version > FORMAT_VERSION {
            return Err(ModstashError::Storage(format!(
                "store format version {} is newer than supported version {FORMAT_VERSION}",
                doc.version
            )));
        }
        Ok(doc)
    }

    /// Writes the document through a temporary sibling file.
    fn flush(&mut self) -> Result<()> {
        if !self.unsaved {
            return Ok(());
        }

        let body = serde_json::to_string_pretty(&self.doc)
            .map_err(|e| ModstashError::Storage(format!("cannot encode store: {e}")))?;
        let staging = self.path.with_extension("tmp");
        std::fs::write(&staging, body)?;
        std::fs::rename(&staging, &self.path)?;

        self.unsaved = false;
        tracing::trace!(path = %self.path.display(), "store written");
        Ok(())
    }

    /// Writes the document. When the write fails, `previous` is put back so
    /// memory never holds a change the caller was told failed.
    fn commit(&mut self, previous: Document) -> Result<()> {
        self.unsaved = true;
        match self.flush() {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "store write failed, change rolled back");
                self.doc = previous;
                self.unsaved = false;
                Err(e)
            }
        }
    }

    fn limited(mut records: Vec<PackageRecord>, limit: i64) -> Vec<PackageRecord> {
        if let Ok(limit) = usize::try_from(limit) {
            records.truncate(limit);
        }
        records
    }

    /// `<file>.bak.<unix-ts>` next to the store file.
    fn backup_path(&self, timestamp: i64) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(format!(".bak.{timestamp}"));
        PathBuf::from(name)
    }
}

impl Storage for JsonStorage {
    fn add_package(&mut self, name: &str, url: &str, version: Option<&str>) -> Result<i64> {
        let _span = tracing::debug_span!("json_add_package",
            package_name = %name,
            package_url = %url
        ).entered();

        if self.doc.packages.iter().any(|p| p.name == name) {
            tracing::debug!("name already taken");
            return Err(ModstashError::Conflict(format!(
                "package already exists: {name}"
            )));
        }

        let previous = self.doc.clone();
        let id = self.doc.next_package_id;
        self.doc.next_package_id += 1;
        self.doc.packages.push(PackageRecord::new(
            id,
            name,
            url,
            version.map(str::to_string),
        ));
        self.commit(previous)?;

        tracing::debug!(package_id = id, "package added");
        Ok(id)
    }

    fn update_package_by_name(
        &mut self,
        name: &str,
        url: &str,
        version: Option<&str>,
    ) -> Result<i64> {
        let _span = tracing::debug_span!("json_update_package_by_name",
            package_name = %name,
            package_url = %url
        ).entered();

        let previous = self.doc.clone();
        let record = self
            .doc
            .packages
            .iter_mut()
            .find(|p| !p.deleted && p.name == name)
            .ok_or_else(|| ModstashError::NotFound(format!("package not found: {name}")))?;

        record.url = url.to_string();
        record.version = version.map(str::to_string);
        let id = record.id;
        self.commit(previous)?;

        tracing::debug!(package_id = id, "package overwritten");
        Ok(id)
    }

    fn list_by_frequency(&self, limit: i64) -> Result<Vec<PackageRecord>> {
        let _span = tracing::debug_span!("json_list_by_frequency", limit = limit).entered();

        let mut records: Vec<PackageRecord> = self.doc.live_packages().cloned().collect();
        sort_by_frequency(&mut records);
        let records = Self::limited(records, limit);

        tracing::debug!(count = records.len(), "retrieved packages");
        Ok(records)
    }

    fn list_by_last_used(&self, limit: i64) -> Result<Vec<PackageRecord>> {
        let _span = tracing::debug_span!("json_list_by_last_used", limit = limit).entered();

        let mut records: Vec<PackageRecord> = self.doc.live_packages().cloned().collect();
        sort_by_last_used(&mut records);
        let records = Self::limited(records, limit);

        tracing::debug!(count = records.len(), "retrieved packages");
        Ok(records)
    }

    fn mark_deleted(&mut self, names: &[String]) -> Result<usize> {
        let _span = tracing::debug_span!("json_mark_deleted", requested = names.len()).entered();

        let previous = self.doc.clone();
        let mut marked = 0;
        for record in &mut self.doc.packages {
            if !record.deleted && names.contains(&record.name) {
                record.deleted = true;
                marked += 1;
            }
        }

        if marked > 0 {
            self.commit(previous)?;
        }

        tracing::debug!(marked = marked, "packages soft-deleted");
        Ok(marked)
    }

    fn get_urls_by_names(&self, names: &[String]) -> Result<Vec<NameUrl>> {
        let _span = tracing::debug_span!("json_get_urls_by_names", requested = names.len()).entered();

        let rows: Vec<NameUrl> = self
            .doc
            .live_packages()
            .filter(|p| names.contains(&p.name))
            .map(|p| NameUrl {
                name: p.name.clone(),
                url: p.url.clone(),
            })
            .collect();

        tracing::debug!(resolved = rows.len(), "aliases resolved");
        Ok(rows)
    }

    fn create_group(&mut self, name: &str) -> Result<i64> {
        let _span = tracing::debug_span!("json_create_group", group_name = %name).entered();

        if self.doc.live_group(name).is_some() {
            return Err(ModstashError::Conflict(format!("group already exists: {name}")));
        }

        let previous = self.doc.clone();
        let id = self.doc.next_group_id;
        self.doc.next_group_id += 1;
        self.doc.groups.push(GroupRecord {
            id,
            name: name.to_string(),
            deleted: false,
        });
        self.commit(previous)?;

        tracing::debug!(group_id = id, "group created");
        Ok(id)
    }

    fn list_groups(&self) -> Result<Vec<GroupRecord>> {
        let _span = tracing::debug_span!("json_list_groups").entered();

        let mut groups: Vec<GroupRecord> =
            self.doc.groups.iter().filter(|g| !g.deleted).cloned().collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!(count = groups.len(), "retrieved groups");
        Ok(groups)
    }

    fn get_group_id_by_name(&self, name: &str) -> Result<Option<i64>> {
        Ok(self.doc.live_group(name).map(|g| g.id))
    }

    fn get_package_id_by_url(&self, url: &str) -> Result<Option<i64>> {
        Ok(self.doc.live_packages().find(|p| p.url == url).map(|p| p.id))
    }

    fn assign_package_to_group(&mut self, group_id: i64, package_id: i64) -> Result<()> {
        let _span = tracing::debug_span!("json_assign_package_to_group",
            group_id = group_id,
            package_id = package_id
        ).entered();

        let membership = MembershipRecord {
            group_id,
            package_id,
        };
        if self.doc.memberships.contains(&membership) {
            tracing::debug!("membership already present");
            return Ok(());
        }

        let previous = self.doc.clone();
        self.doc.memberships.push(membership);
        self.commit(previous)
    }

    fn list_packages_by_group(&self, group: &str) -> Result<Vec<PackageRecord>> {
        let _span = tracing::debug_span!("json_list_packages_by_group", group = %group).entered();

        let Some(group) = self.doc.live_group(group) else {
            tracing::debug!("group not found");
            return Ok(Vec::new());
        };
        let group_id = group.id;

        let members: Vec<PackageRecord> = self
            .doc
            .live_packages()
            .filter(|p| {
                self.doc
                    .memberships
                    .iter()
                    .any(|m| m.group_id == group_id && m.package_id == p.id)
            })
            .cloned()
            .collect();

        tracing::debug!(count = members.len(), "retrieved group members");
        Ok(members)
    }

    fn remove_packages_from_group(&mut self, group_id: i64, package_ids: &[i64]) -> Result<usize> {
        let _span = tracing::debug_span!("json_remove_packages_from_group",
            group_id = group_id,
            requested = package_ids.len()
        ).entered();

        let previous = self.doc.clone();
        let before = self.doc.memberships.len();
        self.doc
            .memberships
            .retain(|m| !(m.group_id == group_id && package_ids.contains(&m.package_id)));
        let removed = before - self.doc.memberships.len();

        if removed > 0 {
            self.commit(previous)?;
        }

        tracing::debug!(removed = removed, "memberships removed");
        Ok(removed)
    }

    fn delete_group(&mut self, name: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_delete_group", group_name = %name).entered();

        let previous = self.doc.clone();
        let group = self
            .doc
            .groups
            .iter_mut()
            .find(|g| !g.deleted && g.name == name)
            .ok_or_else(|| ModstashError::NotFound(format!("group not found: {name}")))?;
        group.deleted = true;

        self.commit(previous)
    }

    fn update_package_usage(&mut self, url: &str, timestamp: i64) -> Result<()> {
        let _span = tracing::debug_span!("json_update_package_usage",
            url = %url,
            timestamp = timestamp
        ).entered();

        let previous = self.doc.clone();
        let mut touched = 0;
        for record in self.doc.packages.iter_mut().filter(|p| !p.deleted && p.url == url) {
            record.freq = record.freq.saturating_add(1);
            record.last_used = Some(timestamp);
            touched += 1;
        }

        if touched == 0 {
            return Err(ModstashError::NotFound(format!("package not found: {url}")));
        }

        self.commit(previous)?;
        tracing::debug!(touched = touched, "package usage updated");
        Ok(())
    }

    fn purge_deleted(&mut self) -> Result<(usize, usize)> {
        let _span = tracing::debug_span!("json_purge_deleted").entered();

        let purged_packages: Vec<i64> = self
            .doc
            .packages
            .iter()
            .filter(|p| p.deleted)
            .map(|p| p.id)
            .collect();
        let purged_groups: Vec<i64> = self
            .doc
            .groups
            .iter()
            .filter(|g| g.deleted)
            .map(|g| g.id)
            .collect();

        let previous = self.doc.clone();
        self.doc.packages.retain(|p| !p.deleted);
        self.doc.groups.retain(|g| !g.deleted);
        self.doc.memberships.retain(|m| {
            !purged_packages.contains(&m.package_id) && !purged_groups.contains(&m.group_id)
        });

        if !purged_packages.is_empty() || !purged_groups.is_empty() {
            self.commit(previous)?;
        }

        tracing::info!(
            packages = purged_packages.len(),
            groups = purged_groups.len(),
            "purged soft-deleted rows"
        );
        Ok((purged_packages.len(), purged_groups.len()))
    }

    fn reset(&mut self) -> Result<PathBuf> {
        let _span = tracing::debug_span!("json_reset", path = ?self.path).entered();

        // A store that was never written has no file to copy yet.
        self.unsaved = true;
        self.flush()?;

        let backup = self.backup_path(chrono::Utc::now().timestamp());
        std::fs::copy(&self.path, &backup)?;
        tracing::info!(backup = ?backup, "store backed up");

        let previous = std::mem::replace(&mut self.doc, Document::empty());
        self.commit(previous)?;

        tracing::info!("store reset to an empty schema");
        Ok(backup)
    }
}

impl Drop for JsonStorage {
    /// Writes anything still pending. Failed commits are rolled back, so
    /// normally there is nothing to do.
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::error!(error = %e, path = %self.path.display(), "store not saved on close");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open(dir: &TempDir) -> JsonStorage {
        JsonStorage::new(dir.path().join("packages.json")).unwrap()
    }

    #[test]
    fn failed_write_leaves_memory_as_on_disk() {
        let dir = TempDir::new().unwrap();
        let mut storage = open(&dir);
        storage.add_package("a", "x/a", None).unwrap();

        // A directory in the staging file's place makes every write fail.
        let staging = storage.path().with_extension("tmp");
        std::fs::create_dir(&staging).unwrap();
        assert!(storage.add_package("b", "x/b", None).is_err());
        assert!(storage.create_group("g").is_err());
        assert_eq!(storage.list_by_last_used(-1).unwrap().len(), 1);
        assert!(storage.list_groups().unwrap().is_empty());

        std::fs::remove_dir(&staging).unwrap();
        assert_eq!(storage.add_package("b", "x/b", None).unwrap(), 2);
        drop(storage);

        let reopened = open(&dir);
        let mut names: Vec<String> = reopened
            .list_by_last_used(-1)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn ids_are_monotonic_across_purge() {
        let dir = TempDir::new().unwrap();
        let mut storage = open(&dir);

        let first = storage.add_package("a", "x/a", None).unwrap();
        storage.mark_deleted(&["a".to_string()]).unwrap();
        storage.purge_deleted().unwrap();
        let second = storage.add_package("a", "x/a", None).unwrap();

        assert!(second > first);
    }

    #[test]
    fn soft_deleted_name_stays_reserved() {
        let dir = TempDir::new().unwrap();
        let mut storage = open(&dir);

        storage.add_package("a", "x/a", None).unwrap();
        storage.mark_deleted(&["a".to_string()]).unwrap();

        let err = storage.add_package("a", "x/other", None).unwrap_err();
        assert!(err.is_conflict());
        assert!(storage.list_by_frequency(-1).unwrap().is_empty());
    }

    #[test]
    fn data_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let mut storage = open(&dir);
            storage.add_package("log", "github.com/charmbracelet/log", Some("v0.4.0")).unwrap();
            let group = storage.create_group("cli").unwrap();
            storage.assign_package_to_group(group, 1).unwrap();
        }

        let storage = open(&dir);
        let members = storage.list_packages_by_group("cli").unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].version.as_deref(), Some("v0.4.0"));
    }

    #[test]
    fn assign_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut storage = open(&dir);
        let pkg = storage.add_package("a", "x/a", None).unwrap();
        let group = storage.create_group("g").unwrap();

        storage.assign_package_to_group(group, pkg).unwrap();
        storage.assign_package_to_group(group, pkg).unwrap();

        assert_eq!(storage.doc.memberships.len(), 1);
    }

    #[test]
    fn purge_drops_memberships_of_purged_rows() {
        let dir = TempDir::new().unwrap();
        let mut storage = open(&dir);
        let a = storage.add_package("a", "x/a", None).unwrap();
        let b = storage.add_package("b", "x/b", None).unwrap();
        let group = storage.create_group("g").unwrap();
        storage.assign_package_to_group(group, a).unwrap();
        storage.assign_package_to_group(group, b).unwrap();

        storage.mark_deleted(&["a".to_string()]).unwrap();
        assert_eq!(storage.purge_deleted().unwrap(), (1, 0));

        assert_eq!(
            storage.doc.memberships,
            vec![MembershipRecord {
                group_id: group,
                package_id: b
            }]
        );
    }

    #[test]
    fn deleted_group_name_can_be_recreated() {
        let dir = TempDir::new().unwrap();
        let mut storage = open(&dir);
        let old = storage.create_group("g").unwrap();
        storage.delete_group("g").unwrap();

        let new = storage.create_group("g").unwrap();
        assert_ne!(old, new);
        assert_eq!(storage.get_group_id_by_name("g").unwrap(), Some(new));
    }

    #[test]
    fn reset_writes_backup_and_empties_store() {
        let dir = TempDir::new().unwrap();
        let mut storage = open(&dir);
        storage.add_package("a", "x/a", None).unwrap();

        let backup = storage.reset().unwrap();

        assert!(backup.exists());
        assert!(backup
            .to_string_lossy()
            .contains("packages.json.bak."));
        assert!(storage.list_by_last_used(-1).unwrap().is_empty());

        let saved = std::fs::read_to_string(&backup).unwrap();
        assert!(saved.contains("\"x/a\""));
    }

    #[test]
    fn limit_truncates_listing() {
        let dir = TempDir::new().unwrap();
        let mut storage = open(&dir);
        for name in ["a", "b", "c"] {
            storage.add_package(name, &format!("x/{name}"), None).unwrap();
        }

        assert_eq!(storage.list_by_frequency(2).unwrap().len(), 2);
        assert_eq!(storage.list_by_frequency(-1).unwrap().len(), 3);
        assert_eq!(storage.list_by_last_used(0).unwrap().len(), 0);
    }
}
