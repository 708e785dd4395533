//! Drives the session reducer against a real registry.
//!
//! Worker commands are executed synchronously and their responses fed back in
//! order, so every test observes the state after all follow-up work settled.

use modstash::app::{handle_event, startup_actions, Action, AppState, Event, InputMode, StatusKind, ViewMode};
use modstash::registry::{Installer, Registry};
use modstash::storage::JsonStorage;
use modstash::worker::Worker;
use modstash::{ModstashError, Result, SortMode, Theme};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Clone, Default)]
struct FakeInstaller {
    calls: Arc<Mutex<Vec<Vec<String>>>>,
    fail: bool,
}

impl Installer for FakeInstaller {
    fn install(&self, urls: &[String]) -> Result<String> {
        self.calls.lock().unwrap().push(urls.to_vec());
        if self.fail {
            Err(ModstashError::install_failed("go: module not found"))
        } else {
            Ok(String::new())
        }
    }
}

struct Session {
    _dir: TempDir,
    registry: Arc<Registry>,
    worker: Worker,
    state: AppState,
}

impl Session {
    fn new(installer: FakeInstaller) -> Self {
        let dir = TempDir::new().unwrap();
        let storage = JsonStorage::new(dir.path().join("modstash.json")).unwrap();
        let registry = Arc::new(Registry::new(Box::new(storage), Box::new(installer)));
        let worker = Worker::new(Arc::clone(&registry));
        let mut session = Self {
            _dir: dir,
            registry,
            worker,
            state: AppState::new(Theme::default()),
        };
        session.load();
        session
    }

    /// Re-runs the commands a session opens with.
    fn load(&mut self) {
        let actions = startup_actions(&self.state);
        self.run(actions);
    }

    /// Sends one event and settles every command it triggers. Returns `true`
    /// if the session asked to quit.
    fn send(&mut self, event: Event) -> bool {
        let (_render, actions) = handle_event(&mut self.state, &event).unwrap();
        self.run(actions)
    }

    fn run(&mut self, actions: Vec<Action>) -> bool {
        let mut queue: VecDeque<Action> = actions.into();
        while let Some(action) = queue.pop_front() {
            match action {
                Action::Quit => return true,
                Action::PostToWorker(message) => {
                    let response = self.worker.handle_message(message);
                    let (_render, next) =
                        handle_event(&mut self.state, &Event::Worker(response)).unwrap();
                    queue.extend(next);
                }
            }
        }
        false
    }

    fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.send(Event::Char(c));
        }
    }

    fn names(&self) -> Vec<String> {
        self.state
            .visible
            .iter()
            .map(|&i| self.state.packages[i].name.clone())
            .collect()
    }

    fn status(&self) -> (StatusKind, String) {
        let status = self.state.status.clone().unwrap();
        (status.kind, status.text)
    }

    fn add(&mut self, url: &str, version: &str) {
        self.send(Event::StartAdding);
        self.type_text(url);
        self.send(Event::Submit);
        self.send(Event::Submit);
        self.type_text(version);
        self.send(Event::Submit);
    }
}

#[test]
fn add_on_empty_registry_then_conflict() {
    let mut session = Session::new(FakeInstaller::default());
    assert!(session.state.packages.is_empty());

    session.add("https://github.com/acme/foo", "v1.2.0");

    assert_eq!(session.state.input_mode, InputMode::Normal);
    assert_eq!(session.status(), (StatusKind::Info, "Package added successfully!".to_string()));
    let pkg = &session.state.packages[0];
    assert_eq!(pkg.name, "foo");
    assert_eq!(pkg.url, "github.com/acme/foo");
    assert_eq!(pkg.version.as_deref(), Some("v1.2.0"));
    assert_eq!(pkg.freq, 0);

    session.add("https://github.com/acme/foo", "");

    assert_eq!(
        session.status(),
        (StatusKind::Error, "Error adding: package already exists: foo".to_string())
    );
    assert_eq!(session.state.packages.len(), 1);
}

#[test]
fn install_marks_then_records_usage() {
    let installer = FakeInstaller::default();
    let calls = Arc::clone(&installer.calls);
    let mut session = Session::new(installer);
    session.add("github.com/acme/foo", "");
    session.add("github.com/acme/bar", "");

    session.send(Event::Activate);
    session.send(Event::Down);
    session.send(Event::Activate);
    session.send(Event::Install);

    assert!(!session.state.installing);
    assert!(session.state.selection.is_empty());
    assert_eq!(session.status().1, "Installation complete!");
    assert_eq!(calls.lock().unwrap().len(), 1);
    assert_eq!(calls.lock().unwrap()[0].len(), 2);
    assert!(session.state.packages.iter().all(|p| p.freq == 1 && p.last_used.is_some()));
}

#[test]
fn failed_install_leaves_usage_untouched() {
    let mut session = Session::new(FakeInstaller {
        fail: true,
        ..FakeInstaller::default()
    });
    session.add("github.com/acme/foo", "");

    session.send(Event::Activate);
    session.send(Event::Install);

    assert!(!session.state.installing);
    assert_eq!(
        session.status(),
        (StatusKind::Error, "Error: install failed: go: module not found".to_string())
    );
    assert_eq!(session.state.packages[0].freq, 0);
}

#[test]
fn selection_survives_sort_change() {
    let mut session = Session::new(FakeInstaller::default());
    session.add("github.com/acme/foo", "");
    session.add("github.com/acme/bar", "");
    session.registry.get(&["bar".to_string()]).unwrap();
    session.load();

    let marked = session.state.packages[session.state.visible[0]].id;
    session.send(Event::Activate);
    session.send(Event::SortByFrequency);

    assert_eq!(session.state.sort_mode, SortMode::Frequency);
    assert!(session.state.selection.contains(&marked));
    assert_eq!(session.names(), vec!["bar".to_string(), "foo".to_string()]);
}

#[test]
fn group_workflow() {
    let mut session = Session::new(FakeInstaller::default());
    session.add("github.com/acme/foo", "");

    session.send(Event::StartCreatingGroup);
    session.type_text("tools");
    session.send(Event::Submit);
    assert_eq!(session.status().1, "Group 'tools' created!");

    session.send(Event::Activate);
    session.send(Event::StartAssigning);
    assert_eq!(session.state.input_mode, InputMode::Assigning);
    assert_eq!(session.state.groups.len(), 1);
    session.send(Event::Submit);
    assert_eq!(session.status().1, "Assigned 1 packages to 'tools'");
    assert!(session.state.selection.is_empty());

    session.send(Event::ShowGroups);
    assert_eq!(session.state.view_mode, ViewMode::Groups);
    session.send(Event::Activate);
    assert_eq!(session.state.view_mode, ViewMode::GroupPackages);
    assert_eq!(session.names(), vec!["foo".to_string()]);

    session.send(Event::Activate);
    session.send(Event::RemoveFromGroup);
    assert_eq!(session.status().1, "Packages removed from group.");
    assert!(session.state.packages.is_empty());

    session.send(Event::Back);
    session.send(Event::Back);
    assert_eq!(session.state.view_mode, ViewMode::Packages);
    assert_eq!(session.names(), vec!["foo".to_string()]);
    assert!(session.send(Event::Back));
}

#[test]
fn delete_hides_package() {
    let mut session = Session::new(FakeInstaller::default());
    session.add("github.com/acme/foo", "");
    session.add("github.com/acme/bar", "");

    session.send(Event::Activate);
    session.send(Event::Delete);

    assert_eq!(session.status().1, "Deleted 1 package(s)");
    assert_eq!(session.state.packages.len(), 1);
    assert!(session.state.selection.is_empty());
}

#[test]
fn search_filters_loaded_rows() {
    let mut session = Session::new(FakeInstaller::default());
    session.add("github.com/spf13/cobra", "");
    session.add("github.com/charmbracelet/log", "");

    session.send(Event::StartSearch);
    session.type_text("log");
    session.send(Event::Submit);

    assert_eq!(session.state.input_mode, InputMode::Normal);
    assert_eq!(session.names(), vec!["log".to_string()]);
}

#[test]
fn groups_are_known_before_first_assign() {
    let mut session = Session::new(FakeInstaller::default());
    session.registry.add("github.com/acme/foo", "", "", false, false).unwrap();
    session.registry.create_group("tools").unwrap();
    session.load();
    assert_eq!(session.state.groups.len(), 1);

    session.send(Event::Activate);
    // Submit before any refresh requested by opening the picker comes back.
    handle_event(&mut session.state, &Event::StartAssigning).unwrap();
    let (_, actions) = handle_event(&mut session.state, &Event::Submit).unwrap();
    session.run(actions);

    assert_eq!(session.status().1, "Assigned 1 packages to 'tools'");
    assert!(session.state.selection.is_empty());
}
