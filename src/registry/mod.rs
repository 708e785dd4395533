//! Registry service.
//!
//! [`Registry`] is the single entry point both front ends use. It owns the
//! storage backend (behind a mutex) and the installer, and implements the use
//! cases on top of the raw [`Storage`] queries: alias derivation, conflict
//! handling, batched installs with usage tracking, grouping and soft deletes.
//!
//! The store lock is only held for the duration of one storage call and is
//! never held while the installer runs, so a long `go get` does not block
//! concurrent listings from the interactive session.

pub mod installer;

pub use installer::{CommandInstaller, Installer, DEFAULT_INSTALLER};

use crate::domain::error::{ModstashError, Result};
use crate::domain::{derive_alias, normalize_url, Group, Package, SortMode};
use crate::storage::{sort_by_frequency, sort_by_last_used, PackageRecord, Storage};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

/// Personal module registry.
///
/// Shared between threads as `Arc<Registry>`.
///
/// # Examples
///
/// ```no_run
/// use modstash::registry::{CommandInstaller, Registry};
/// use modstash::storage::JsonStorage;
/// use std::path::PathBuf;
///
/// let storage = JsonStorage::new(PathBuf::from("/tmp/packages.json"))?;
/// let registry = Registry::new(Box::new(storage), Box::new(CommandInstaller::default()));
///
/// let alias = registry.add("https://github.com/charmbracelet/log", "", "", false, false)?;
/// assert_eq!(alias, "log");
/// # Ok::<(), modstash::ModstashError>(())
/// ```
pub struct Registry {
    store: Mutex<Box<dyn Storage>>,
    installer: Box<dyn Installer>,
}

impl Registry {
    #[must_use]
    pub fn new(store: Box<dyn Storage>, installer: Box<dyn Installer>) -> Self {
        Self {
            store: Mutex::new(store),
            installer,
        }
    }

    fn store(&self) -> Result<MutexGuard<'_, Box<dyn Storage>>> {
        self.store
            .lock()
            .map_err(|_| ModstashError::Storage("store lock poisoned".to_string()))
    }

    /// Saves a module reference and returns its alias.
    ///
    /// `url` is normalized first. An empty `name` is derived from the url, an
    /// empty `version` means "latest". When the alias is taken, `force`
    /// overwrites url and version of the existing entry in place (keeping its
    /// id and usage statistics); otherwise the call fails with
    /// [`ModstashError::Conflict`].
    ///
    /// With `install`, the freshly written entry is installed through
    /// [`get`](Self::get) and the install outcome becomes the result.
    ///
    /// # Errors
    ///
    /// Returns `Config` for a url with nothing left after normalization,
    /// `Conflict` without `force`, or any storage or install failure.
    pub fn add(
        &self,
        url: &str,
        name: &str,
        version: &str,
        install: bool,
        force: bool,
    ) -> Result<String> {
        let url = normalize_url(url);
        if url.is_empty() {
            return Err(ModstashError::Config("package url is empty".to_string()));
        }
        let name = match name.trim() {
            "" => derive_alias(&url),
            given => given.to_string(),
        };
        let version = Some(version.trim()).filter(|v| !v.is_empty());

        let _span = tracing::info_span!("registry_add",
            package_name = %name,
            package_url = %url,
            force = force,
            install = install
        ).entered();

        let inserted = self.store()?.add_package(&name, &url, version);
        match inserted {
            Ok(id) => tracing::info!(package_id = id, "package saved"),
            Err(err) if err.is_conflict() && force => {
                let id = self.store()?.update_package_by_name(&name, &url, version)?;
                tracing::info!(package_id = id, "package overwritten");
            }
            Err(err) => return Err(err),
        }

        if install {
            self.get(std::slice::from_ref(&name))?;
        }

        Ok(name)
    }

    /// Installs saved packages by alias in one installer call.
    ///
    /// Aliases that do not resolve are collected rather than failing the batch.
    /// On success the usage statistics of every installed url are updated; if
    /// some aliases were missing, that is reported afterwards as
    /// [`ModstashError::NotFound`].
    ///
    /// Returns the installed urls.
    ///
    /// # Errors
    ///
    /// - `NotFound` when no alias resolves, or after a partial install
    /// - `InstallFailed` when the installer fails (usage is left untouched)
    pub fn get(&self, aliases: &[String]) -> Result<Vec<String>> {
        let _span = tracing::info_span!("registry_get", requested = aliases.len()).entered();

        let rows = self.store()?.get_urls_by_names(aliases)?;
        let missing: Vec<&str> = aliases
            .iter()
            .filter(|alias| !rows.iter().any(|row| &row.name == *alias))
            .map(String::as_str)
            .collect();

        if rows.is_empty() {
            return Err(ModstashError::NotFound(format!(
                "packages not found: {}",
                missing.join(", ")
            )));
        }

        let urls = unique_urls(rows.into_iter().map(|row| row.url));
        self.installer.install(&urls)?;
        self.record_usage(&urls)?;

        if !missing.is_empty() {
            tracing::warn!(missing = ?missing, "some aliases did not resolve");
            return Err(ModstashError::NotFound(format!(
                "missing packages: {}",
                missing.join(", ")
            )));
        }

        Ok(urls)
    }

    /// Installs urls in one installer call without touching usage statistics.
    /// Repeated urls are passed once.
    ///
    /// Returns the installer output.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an empty batch, or `InstallFailed`.
    pub fn install_urls(&self, urls: &[String]) -> Result<String> {
        if urls.is_empty() {
            return Err(ModstashError::NotFound("no packages to install".to_string()));
        }
        self.installer.install(&unique_urls(urls.iter().cloned()))
    }

    /// Bumps the usage counter and last-used time of each distinct url once.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if a url no longer belongs to a live package.
    pub fn record_usage(&self, urls: &[String]) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let urls = unique_urls(urls.iter().cloned());
        let mut store = self.store()?;
        for url in &urls {
            store.update_package_usage(url, now)?;
        }
        tracing::debug!(count = urls.len(), "usage recorded");
        Ok(())
    }

    /// Lists live packages. `limit < 0` is unbounded.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list(&self, limit: i64, sort: SortMode) -> Result<Vec<Package>> {
        let store = self.store()?;
        let records = match sort {
            SortMode::Frequency => store.list_by_frequency(limit)?,
            SortMode::LastUsed => store.list_by_last_used(limit)?,
        };
        Ok(records.iter().map(PackageRecord::to_package).collect())
    }

    /// Creates an empty group.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if a live group already has that name.
    pub fn create_group(&self, name: &str) -> Result<Group> {
        let name = name.trim();
        let id = self.store()?.create_group(name)?;
        tracing::info!(group_id = id, group_name = %name, "group created");
        Ok(Group {
            id,
            name: name.to_string(),
        })
    }

    /// Lists live groups ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_groups(&self) -> Result<Vec<Group>> {
        let groups = self.store()?.list_groups()?;
        Ok(groups.iter().map(|g| g.to_group()).collect())
    }

    /// Adds the packages at `urls` to `group`.
    ///
    /// Stops at the first url (or the group) that does not resolve. Memberships
    /// written before the miss are kept. Returns the number of urls processed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` naming the first missing group or url.
    pub fn assign_to_group(&self, urls: &[String], group: &str) -> Result<usize> {
        let _span = tracing::info_span!("registry_assign_to_group",
            group = %group,
            count = urls.len()
        ).entered();

        let mut store = self.store()?;
        let group_id = store
            .get_group_id_by_name(group)?
            .ok_or_else(|| ModstashError::NotFound(format!("group not found: {group}")))?;

        for url in urls {
            let package_id = store
                .get_package_id_by_url(url)?
                .ok_or_else(|| ModstashError::NotFound(format!("package not found: {url}")))?;
            store.assign_package_to_group(group_id, package_id)?;
        }

        tracing::info!("packages assigned");
        Ok(urls.len())
    }

    /// Lists the live members of `group`, sorted in the requested order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the group does not exist.
    pub fn list_packages_by_group(&self, group: &str, sort: SortMode) -> Result<Vec<Package>> {
        let mut records = {
            let store = self.store()?;
            if store.get_group_id_by_name(group)?.is_none() {
                return Err(ModstashError::NotFound(format!("group not found: {group}")));
            }
            store.list_packages_by_group(group)?
        };

        match sort {
            SortMode::Frequency => sort_by_frequency(&mut records),
            SortMode::LastUsed => sort_by_last_used(&mut records),
        }
        Ok(records.iter().map(PackageRecord::to_package).collect())
    }

    /// Resolves aliases to urls without installing anything.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` naming every alias that did not resolve.
    pub fn resolve_urls(&self, aliases: &[String]) -> Result<Vec<String>> {
        let rows = self.store()?.get_urls_by_names(aliases)?;
        let missing: Vec<&str> = aliases
            .iter()
            .filter(|alias| !rows.iter().any(|row| &row.name == *alias))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(ModstashError::NotFound(format!(
                "packages not found: {}",
                missing.join(", ")
            )));
        }
        Ok(rows.into_iter().map(|row| row.url).collect())
    }

    /// Removes the packages named by `aliases` from `group`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing group or alias; nothing is removed then.
    pub fn remove_aliases_from_group(&self, group: &str, aliases: &[String]) -> Result<usize> {
        let urls = self.resolve_urls(aliases)?;
        let (group_id, package_ids) = {
            let store = self.store()?;
            let group_id = store
                .get_group_id_by_name(group)?
                .ok_or_else(|| ModstashError::NotFound(format!("group not found: {group}")))?;
            let mut ids = Vec::with_capacity(urls.len());
            for url in &urls {
                if let Some(id) = store.get_package_id_by_url(url)? {
                    ids.push(id);
                }
            }
            (group_id, ids)
        };
        self.remove_packages_from_group(group_id, &package_ids)
    }

    /// Removes memberships only; the packages stay in the registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn remove_packages_from_group(&self, group_id: i64, package_ids: &[i64]) -> Result<usize> {
        let removed = self
            .store()?
            .remove_packages_from_group(group_id, package_ids)?;
        tracing::info!(group_id = group_id, removed = removed, "packages removed from group");
        Ok(removed)
    }

    /// Installs every member of `group` in one batch, most used first.
    ///
    /// Usage statistics are not updated. Returns the installed urls.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing or empty group, or `InstallFailed`.
    pub fn install_group(&self, group: &str) -> Result<Vec<String>> {
        let _span = tracing::info_span!("registry_install_group", group = %group).entered();

        let urls = unique_urls(
            self.list_packages_by_group(group, SortMode::Frequency)?
                .into_iter()
                .map(|p| p.url),
        );
        if urls.is_empty() {
            return Err(ModstashError::NotFound(format!("group has no packages: {group}")));
        }

        self.install_urls(&urls)?;
        Ok(urls)
    }

    /// Soft-deletes packages by alias. Memberships are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn delete_packages(&self, names: &[String]) -> Result<usize> {
        let marked = self.store()?.mark_deleted(names)?;
        tracing::info!(marked = marked, "packages deleted");
        Ok(marked)
    }

    /// Soft-deletes a group. Its packages are untouched.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no live group has that name.
    pub fn delete_group(&self, name: &str) -> Result<()> {
        self.store()?.delete_group(name)?;
        tracing::info!(group_name = %name, "group deleted");
        Ok(())
    }

    /// Permanently removes soft-deleted rows. Returns `(packages, groups)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn purge(&self) -> Result<(usize, usize)> {
        self.store()?.purge_deleted()
    }

    /// Backs up the store and starts over with an empty one.
    ///
    /// Returns the backup location.
    ///
    /// # Errors
    ///
    /// Returns an error if the backup or the rewrite fails.
    pub fn hard_reset(&self) -> Result<PathBuf> {
        self.store()?.reset()
    }
}

/// Drops repeated urls, keeping the first occurrence of each.
fn unique_urls(urls: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    urls.into_iter().filter(|url| seen.insert(url.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonStorage;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Records every batch and optionally fails.
    #[derive(Default)]
    struct FakeInstaller {
        calls: Arc<Mutex<Vec<Vec<String>>>>,
        fail_with: Option<String>,
    }

    impl Installer for FakeInstaller {
        fn install(&self, urls: &[String]) -> Result<String> {
            self.calls.lock().unwrap().push(urls.to_vec());
            match &self.fail_with {
                Some(output) => Err(ModstashError::install_failed(output)),
                None => Ok(String::new()),
            }
        }
    }

    fn registry(dir: &TempDir, installer: FakeInstaller) -> Registry {
        let storage = JsonStorage::new(dir.path().join("packages.json")).unwrap();
        Registry::new(Box::new(storage), Box::new(installer))
    }

    #[test]
    fn add_derives_alias_and_normalizes() {
        let dir = TempDir::new().unwrap();
        let reg = registry(&dir, FakeInstaller::default());

        let alias = reg.add("https://github.com/foo/bar/v2", "", "", false, false).unwrap();
        assert_eq!(alias, "bar");

        let all = reg.list(-1, SortMode::LastUsed).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].url, "github.com/foo/bar/v2");
        assert_eq!(all[0].version, None);
        assert_eq!(all[0].freq, 0);
    }

    #[test]
    fn url_empty_after_normalization_is_rejected() {
        let dir = TempDir::new().unwrap();
        let installer = FakeInstaller::default();
        let calls = Arc::clone(&installer.calls);
        let reg = registry(&dir, installer);

        for raw in ["https://", "http://", "   "] {
            let err = reg.add(raw, "", "", true, false).unwrap_err();
            assert!(matches!(err, ModstashError::Config(_)), "input: {raw:?}");
        }

        assert!(reg.list(-1, SortMode::LastUsed).unwrap().is_empty());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn aliases_sharing_a_url_install_and_count_once() {
        let dir = TempDir::new().unwrap();
        let installer = FakeInstaller::default();
        let calls = Arc::clone(&installer.calls);
        let reg = registry(&dir, installer);
        reg.add("x.io/a", "one", "", false, false).unwrap();
        reg.add("x.io/a", "two", "", false, false).unwrap();

        let installed = reg.get(&["one".to_string(), "two".to_string()]).unwrap();

        assert_eq!(installed, vec!["x.io/a".to_string()]);
        assert_eq!(*calls.lock().unwrap(), vec![vec!["x.io/a".to_string()]]);
        let freqs: Vec<(String, u32)> = reg
            .list(-1, SortMode::LastUsed)
            .unwrap()
            .into_iter()
            .map(|p| (p.name, p.freq))
            .collect();
        assert!(freqs.iter().all(|(_, freq)| *freq == 1), "{freqs:?}");

        let urls = ["x.io/a", "x.io/a"].map(String::from);
        reg.install_urls(&urls).unwrap();
        reg.record_usage(&urls).unwrap();
        assert_eq!(calls.lock().unwrap()[1], vec!["x.io/a".to_string()]);
        assert!(reg.list(-1, SortMode::LastUsed).unwrap().iter().all(|p| p.freq == 2));
    }

    #[test]
    fn conflict_without_force_leaves_row_untouched() {
        let dir = TempDir::new().unwrap();
        let reg = registry(&dir, FakeInstaller::default());
        reg.add("github.com/a/foo", "foo", "v1.0.0", false, false).unwrap();

        let err = reg.add("github.com/b/foo", "foo", "", false, false).unwrap_err();
        assert!(err.is_conflict());

        let all = reg.list(-1, SortMode::LastUsed).unwrap();
        assert_eq!(all[0].url, "github.com/a/foo");
        assert_eq!(all[0].version.as_deref(), Some("v1.0.0"));
    }

    #[test]
    fn force_overwrites_and_keeps_identity() {
        let dir = TempDir::new().unwrap();
        let reg = registry(&dir, FakeInstaller::default());
        reg.add("github.com/a/foo", "foo", "", false, false).unwrap();
        reg.get(&["foo".to_string()]).unwrap();
        let before = reg.list(-1, SortMode::LastUsed).unwrap().remove(0);

        reg.add("github.com/b/foo", "foo", "v2.0.0", false, true).unwrap();

        let after = reg.list(-1, SortMode::LastUsed).unwrap().remove(0);
        assert_eq!(after.id, before.id);
        assert_eq!(after.freq, 1);
        assert_eq!(after.last_used, before.last_used);
        assert_eq!(after.url, "github.com/b/foo");
        assert_eq!(after.version.as_deref(), Some("v2.0.0"));
    }

    #[test]
    fn partial_resolution_installs_found_and_reports_missing() {
        let dir = TempDir::new().unwrap();
        let installer = FakeInstaller::default();
        let calls = Arc::clone(&installer.calls);
        let reg = registry(&dir, installer);
        reg.add("x.io/a", "", "", false, false).unwrap();
        reg.add("x.io/b", "", "", false, false).unwrap();

        let names = ["a", "b", "zzz"].map(String::from);
        let err = reg.get(&names).unwrap_err();

        assert_eq!(err.to_string(), "missing packages: zzz");
        assert_eq!(*calls.lock().unwrap(), vec![vec!["x.io/a".to_string(), "x.io/b".to_string()]]);
        let all = reg.list(-1, SortMode::Frequency).unwrap();
        assert!(all.iter().all(|p| p.freq == 1 && p.last_used.is_some()));
    }

    #[test]
    fn nothing_resolved_never_calls_installer() {
        let dir = TempDir::new().unwrap();
        let installer = FakeInstaller::default();
        let calls = Arc::clone(&installer.calls);
        let reg = registry(&dir, installer);

        let names = ["x", "y", "z"].map(String::from);
        let err = reg.get(&names).unwrap_err();

        assert_eq!(err.to_string(), "packages not found: x, y, z");
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn failed_install_keeps_usage() {
        let dir = TempDir::new().unwrap();
        let installer = FakeInstaller {
            fail_with: Some("no required module provides package".to_string()),
            ..FakeInstaller::default()
        };
        let reg = registry(&dir, installer);
        reg.add("x.io/a", "", "", false, false).unwrap();

        let err = reg.get(&["a".to_string()]).unwrap_err();
        assert!(matches!(err, ModstashError::InstallFailed(_)));
        assert_eq!(reg.list(-1, SortMode::Frequency).unwrap()[0].freq, 0);
    }

    #[test]
    fn add_with_install_chains_into_get() {
        let dir = TempDir::new().unwrap();
        let installer = FakeInstaller::default();
        let calls = Arc::clone(&installer.calls);
        let reg = registry(&dir, installer);

        reg.add("github.com/charmbracelet/log", "", "", true, false).unwrap();

        assert_eq!(calls.lock().unwrap().len(), 1);
        assert_eq!(reg.list(-1, SortMode::Frequency).unwrap()[0].freq, 1);
    }

    #[test]
    fn assign_aborts_on_first_miss_but_keeps_earlier_writes() {
        let dir = TempDir::new().unwrap();
        let reg = registry(&dir, FakeInstaller::default());
        reg.add("x.io/a", "", "", false, false).unwrap();
        reg.add("x.io/c", "", "", false, false).unwrap();
        reg.create_group("g").unwrap();

        let urls = ["x.io/a", "x.io/missing", "x.io/c"].map(String::from);
        let err = reg.assign_to_group(&urls, "g").unwrap_err();
        assert_eq!(err.to_string(), "package not found: x.io/missing");

        let members = reg.list_packages_by_group("g", SortMode::Frequency).unwrap();
        let names: Vec<&str> = members.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a"]);
    }

    #[test]
    fn assign_to_unknown_group_fails() {
        let dir = TempDir::new().unwrap();
        let reg = registry(&dir, FakeInstaller::default());
        let err = reg.assign_to_group(&[], "nope").unwrap_err();
        assert_eq!(err.to_string(), "group not found: nope");
    }

    #[test]
    fn removing_from_group_keeps_package() {
        let dir = TempDir::new().unwrap();
        let reg = registry(&dir, FakeInstaller::default());
        reg.add("x.io/a", "", "", false, false).unwrap();
        let group = reg.create_group("g").unwrap();
        reg.assign_to_group(&["x.io/a".to_string()], "g").unwrap();
        let id = reg.list(-1, SortMode::LastUsed).unwrap()[0].id;

        assert_eq!(reg.remove_packages_from_group(group.id, &[id]).unwrap(), 1);

        assert!(reg.list_packages_by_group("g", SortMode::LastUsed).unwrap().is_empty());
        assert_eq!(reg.list(-1, SortMode::LastUsed).unwrap().len(), 1);
    }

    #[test]
    fn soft_delete_hides_everywhere_and_reserves_name() {
        let dir = TempDir::new().unwrap();
        let reg = registry(&dir, FakeInstaller::default());
        reg.add("x.io/a", "", "", false, false).unwrap();
        reg.create_group("g").unwrap();
        reg.assign_to_group(&["x.io/a".to_string()], "g").unwrap();

        reg.delete_packages(&["a".to_string()]).unwrap();

        assert!(reg.list(-1, SortMode::LastUsed).unwrap().is_empty());
        assert!(reg.list_packages_by_group("g", SortMode::LastUsed).unwrap().is_empty());
        assert!(matches!(
            reg.get(&["a".to_string()]),
            Err(ModstashError::NotFound(_))
        ));
        assert!(reg.add("x.io/a", "", "", false, false).unwrap_err().is_conflict());

        reg.purge().unwrap();
        assert_eq!(reg.add("x.io/a", "", "", false, false).unwrap(), "a");
    }

    #[test]
    fn install_group_batches_by_frequency_without_usage() {
        let dir = TempDir::new().unwrap();
        let installer = FakeInstaller::default();
        let calls = Arc::clone(&installer.calls);
        let reg = registry(&dir, installer);
        reg.add("x.io/a", "", "", false, false).unwrap();
        reg.add("x.io/b", "", "", false, false).unwrap();
        reg.get(&["b".to_string()]).unwrap();
        reg.create_group("g").unwrap();
        reg.assign_to_group(&["x.io/a".to_string(), "x.io/b".to_string()], "g").unwrap();

        let urls = reg.install_group("g").unwrap();

        assert_eq!(urls, vec!["x.io/b".to_string(), "x.io/a".to_string()]);
        assert_eq!(calls.lock().unwrap().len(), 2);
        let freqs: Vec<u32> = reg
            .list_packages_by_group("g", SortMode::Frequency)
            .unwrap()
            .iter()
            .map(|p| p.freq)
            .collect();
        assert_eq!(freqs, vec![1, 0]);
    }

    #[test]
    fn groups_are_listed_by_name() {
        let dir = TempDir::new().unwrap();
        let reg = registry(&dir, FakeInstaller::default());
        reg.create_group("web").unwrap();
        reg.create_group("cli").unwrap();
        assert!(reg.create_group("web").unwrap_err().is_conflict());

        let names: Vec<String> = reg.list_groups().unwrap().into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["cli".to_string(), "web".to_string()]);
    }

    #[test]
    fn resolve_urls_reports_every_miss() {
        let dir = TempDir::new().unwrap();
        let reg = registry(&dir, FakeInstaller::default());
        reg.add("x.io/a", "", "", false, false).unwrap();

        assert_eq!(reg.resolve_urls(&["a".to_string()]).unwrap(), vec!["x.io/a".to_string()]);

        let err = reg
            .resolve_urls(&["a".to_string(), "b".to_string(), "c".to_string()])
            .unwrap_err();
        assert_eq!(err.to_string(), "packages not found: b, c");
    }

    #[test]
    fn remove_aliases_keeps_packages() {
        let dir = TempDir::new().unwrap();
        let reg = registry(&dir, FakeInstaller::default());
        reg.add("x.io/a", "", "", false, false).unwrap();
        reg.add("x.io/b", "", "", false, false).unwrap();
        reg.create_group("g").unwrap();
        reg.assign_to_group(&["x.io/a".to_string(), "x.io/b".to_string()], "g").unwrap();

        let removed = reg.remove_aliases_from_group("g", &["a".to_string()]).unwrap();

        assert_eq!(removed, 1);
        let members = reg.list_packages_by_group("g", SortMode::Frequency).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "b");
        assert_eq!(reg.list(-1, SortMode::LastUsed).unwrap().len(), 2);
    }
}
