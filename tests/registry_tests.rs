use modstash::domain::{derive_alias, normalize_url};
use modstash::registry::{Installer, Registry};
use modstash::storage::JsonStorage;
use modstash::{ModstashError, Result, SortMode};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Clone, Default)]
struct RecordingInstaller {
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl Installer for RecordingInstaller {
    fn install(&self, urls: &[String]) -> Result<String> {
        self.calls.lock().unwrap().push(urls.to_vec());
        Ok(format!("installed {}", urls.len()))
    }
}

fn open(path: &Path, installer: RecordingInstaller) -> Registry {
    let storage = JsonStorage::new(path.to_path_buf()).unwrap();
    Registry::new(Box::new(storage), Box::new(installer))
}

fn names(registry: &Registry) -> Vec<String> {
    registry
        .list(-1, SortMode::LastUsed)
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect()
}

#[test]
fn normalization_is_idempotent() {
    for raw in [
        "https://github.com/acme/foo/",
        "http://example.org/x/y",
        "github.com/acme/foo",
        "  https://gitlab.com/group/sub/project/v3  ",
    ] {
        let once = normalize_url(raw);
        assert_eq!(normalize_url(&once), once, "input: {raw}");
    }
}

#[test]
fn alias_derivation() {
    assert_eq!(derive_alias("github.com/foo/bar/v2"), "bar");
    assert_eq!(derive_alias("github.com/foo/bar"), "bar");
    assert_eq!(derive_alias("example.com"), "example.com");
}

#[test]
fn partial_resolution_installs_found_and_reports_missing() {
    let dir = TempDir::new().unwrap();
    let installer = RecordingInstaller::default();
    let calls = Arc::clone(&installer.calls);
    let reg = open(&dir.path().join("modstash.json"), installer);
    reg.add("x.io/a", "", "", false, false).unwrap();
    reg.add("x.io/b", "", "", false, false).unwrap();

    let err = reg
        .get(&["a".to_string(), "b".to_string(), "c".to_string()])
        .unwrap_err();

    assert!(matches!(err, ModstashError::NotFound(ref m) if m.contains('c')));
    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let mut installed = calls[0].clone();
    installed.sort();
    assert_eq!(installed, vec!["x.io/a".to_string(), "x.io/b".to_string()]);
    assert!(reg
        .list(-1, SortMode::Frequency)
        .unwrap()
        .iter()
        .all(|p| p.freq == 1));
}

#[test]
fn no_resolution_never_calls_installer() {
    let dir = TempDir::new().unwrap();
    let installer = RecordingInstaller::default();
    let calls = Arc::clone(&installer.calls);
    let reg = open(&dir.path().join("modstash.json"), installer);

    let err = reg
        .get(&["a".to_string(), "b".to_string(), "c".to_string()])
        .unwrap_err();

    assert_eq!(err.to_string(), "packages not found: a, b, c");
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn soft_delete_reserves_name_until_purge() {
    let dir = TempDir::new().unwrap();
    let reg = open(&dir.path().join("modstash.json"), RecordingInstaller::default());
    reg.add("x.io/a", "", "", false, false).unwrap();
    reg.create_group("g").unwrap();
    reg.assign_to_group(&["x.io/a".to_string()], "g").unwrap();

    assert_eq!(reg.delete_packages(&["a".to_string()]).unwrap(), 1);

    assert!(names(&reg).is_empty());
    assert!(reg.list_packages_by_group("g", SortMode::Frequency).unwrap().is_empty());
    assert!(reg.add("x.io/a", "", "", false, false).unwrap_err().is_conflict());

    assert_eq!(reg.purge().unwrap(), (1, 0));
    assert_eq!(reg.add("x.io/a", "", "", false, false).unwrap(), "a");
}

#[test]
fn data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("modstash.json");
    {
        let reg = open(&path, RecordingInstaller::default());
        reg.add("github.com/spf13/cobra", "", "v1.8.0", false, false).unwrap();
        reg.get(&["cobra".to_string()]).unwrap();
        reg.create_group("cli").unwrap();
        reg.assign_to_group(&["github.com/spf13/cobra".to_string()], "cli").unwrap();
    }

    let reg = open(&path, RecordingInstaller::default());
    let packages = reg.list_packages_by_group("cli", SortMode::Frequency).unwrap();

    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0].name, "cobra");
    assert_eq!(packages[0].version.as_deref(), Some("v1.8.0"));
    assert_eq!(packages[0].freq, 1);
}

#[test]
fn assign_aborts_on_first_missing_url() {
    let dir = TempDir::new().unwrap();
    let reg = open(&dir.path().join("modstash.json"), RecordingInstaller::default());
    reg.add("x.io/a", "", "", false, false).unwrap();
    reg.add("x.io/c", "", "", false, false).unwrap();
    reg.create_group("g").unwrap();

    let urls = ["x.io/a", "x.io/missing", "x.io/c"].map(String::from);
    let err = reg.assign_to_group(&urls, "g").unwrap_err();

    assert_eq!(err.to_string(), "package not found: x.io/missing");
    let members: Vec<String> = reg
        .list_packages_by_group("g", SortMode::Frequency)
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(members, vec!["a".to_string()]);
}

#[test]
fn hard_reset_keeps_a_backup() {
    let dir = TempDir::new().unwrap();
    let reg = open(&dir.path().join("modstash.json"), RecordingInstaller::default());
    reg.add("x.io/a", "", "", false, false).unwrap();

    let backup = reg.hard_reset().unwrap();

    assert!(backup.exists());
    assert!(std::fs::read_to_string(&backup).unwrap().contains("x.io/a"));
    assert!(names(&reg).is_empty());
}
