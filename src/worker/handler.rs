//! Worker implementation for asynchronous registry operations.
//!
//! [`Worker`] turns a [`WorkerMessage`] into a registry call and the outcome into
//! a [`WorkerResponse`]. [`Dispatcher`] runs each message on its own thread so
//! installs and store queries never block input handling or rendering, and
//! delivers the single response into the session's inbound queue.

use crate::domain::error::{ModstashError, Result};
use crate::registry::Registry;
use crate::worker::messages::{ListScope, Operation, WorkerMessage, WorkerResponse};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

/// Executes worker messages against the registry.
///
/// Cheap to clone; every dispatched thread gets its own handle.
#[derive(Clone)]
pub struct Worker {
    registry: Arc<Registry>,
}

impl Worker {
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Helper for handling registry results with consistent logging.
    ///
    /// This function standardizes error handling and success logging across all
    /// operations in the worker.
    fn handle_db_result<T, F>(operation: Operation, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation.label(), "operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation = operation.label(), error = %e, "operation failed");
                WorkerResponse::Error {
                    operation,
                    message: e.to_string(),
                }
            }
        }
    }

    /// Processes a worker message and returns the appropriate response.
    ///
    /// This is the main message handling entry point. It runs synchronously on
    /// the calling thread.
    pub fn handle_message(&self, message: WorkerMessage) -> WorkerResponse {
        let operation = message.operation();
        let span = tracing::debug_span!("worker_handle_message",
            operation = operation.label(),
            request_id = message.request_id()
        );
        let _guard = span.entered();

        let registry = &self.registry;
        match message {
            WorkerMessage::LoadPackages { sort, .. } => {
                Self::handle_db_result(operation, registry.list(-1, sort), |packages| {
                    tracing::debug!(package_count = packages.len(), "packages loaded");
                    WorkerResponse::PackagesLoaded {
                        scope: ListScope::All,
                        packages,
                    }
                })
            }

            WorkerMessage::LoadGroups { .. } => {
                Self::handle_db_result(operation, registry.list_groups(), |groups| {
                    WorkerResponse::GroupsLoaded { groups }
                })
            }

            WorkerMessage::LoadGroupPackages { group, sort, .. } => Self::handle_db_result(
                operation,
                registry.list_packages_by_group(&group, sort),
                |packages| WorkerResponse::PackagesLoaded {
                    scope: ListScope::Group(group),
                    packages,
                },
            ),

            WorkerMessage::AddPackage {
                url,
                name,
                version,
                install,
                force,
                ..
            } => Self::handle_db_result(
                operation,
                registry.add(&url, &name, &version, install, force),
                |name| WorkerResponse::PackageAdded { name },
            ),

            WorkerMessage::InstallPackages { urls, .. } => {
                Self::handle_db_result(operation, registry.install_urls(&urls), |_output| {
                    WorkerResponse::PackagesInstalled { urls }
                })
            }

            WorkerMessage::RecordUsage { urls, .. } => {
                let count = urls.len();
                Self::handle_db_result(operation, registry.record_usage(&urls), |()| {
                    WorkerResponse::UsageRecorded { count }
                })
            }

            WorkerMessage::DeletePackages { names, .. } => {
                Self::handle_db_result(operation, registry.delete_packages(&names), |count| {
                    WorkerResponse::PackagesDeleted { count }
                })
            }

            WorkerMessage::CreateGroup { name, .. } => {
                Self::handle_db_result(operation, registry.create_group(&name), |group| {
                    WorkerResponse::GroupCreated { group }
                })
            }

            WorkerMessage::AssignToGroup { urls, group, .. } => Self::handle_db_result(
                operation,
                registry.assign_to_group(&urls, &group),
                |count| WorkerResponse::PackagesAssigned { group, count },
            ),

            WorkerMessage::RemoveFromGroup {
                group_id,
                package_ids,
                ..
            } => Self::handle_db_result(
                operation,
                registry.remove_packages_from_group(group_id, &package_ids),
                |count| WorkerResponse::PackagesRemoved { count },
            ),

            WorkerMessage::InstallGroup { group, .. } => {
                Self::handle_db_result(operation, registry.install_group(&group), |urls| {
                    WorkerResponse::GroupInstalled {
                        group,
                        count: urls.len(),
                    }
                })
            }

            WorkerMessage::DeleteGroup { name, .. } => {
                Self::handle_db_result(operation, registry.delete_group(&name), |()| {
                    WorkerResponse::GroupDeleted { name }
                })
            }
        }
    }
}

/// Fire-and-forget executor for worker messages.
///
/// Every [`dispatch`](Self::dispatch) spawns one thread that runs the message and
/// sends its response, converted into `T`, through the queue. Several messages
/// may be in flight at once; responses arrive in completion order.
///
/// # Examples
///
/// ```no_run
/// use modstash::worker::{Dispatcher, WorkerMessage, WorkerResponse};
/// # fn demo(registry: std::sync::Arc<modstash::registry::Registry>) -> modstash::Result<()> {
/// let (tx, rx) = std::sync::mpsc::channel::<WorkerResponse>();
/// let dispatcher = Dispatcher::new(registry, tx);
///
/// dispatcher.dispatch(WorkerMessage::load_groups())?;
/// let response = rx.recv().expect("worker response");
/// # Ok(())
/// # }
/// ```
pub struct Dispatcher<T> {
    worker: Worker,
    sender: Sender<T>,
}

impl<T> Dispatcher<T>
where
    T: From<WorkerResponse> + Send + 'static,
{
    pub fn new(registry: Arc<Registry>, sender: Sender<T>) -> Self {
        Self {
            worker: Worker::new(registry),
            sender,
        }
    }

    /// Runs `message` on a new thread.
    ///
    /// The caller's current tracing span becomes the parent of the worker's
    /// spans.
    ///
    /// # Errors
    ///
    /// Returns [`ModstashError::Worker`] if the thread cannot be spawned.
    pub fn dispatch(&self, message: WorkerMessage) -> Result<()> {
        let worker = self.worker.clone();
        let sender = self.sender.clone();
        let parent = tracing::Span::current();
        let operation = message.operation();

        thread::Builder::new()
            .name(format!("modstash-{}", operation.label().replace(' ', "-")))
            .spawn(move || {
                let _parent = parent.entered();
                let response = worker.handle_message(message);
                if sender.send(T::from(response)).is_err() {
                    tracing::debug!(
                        operation = operation.label(),
                        "session closed before completion was delivered"
                    );
                }
            })
            .map_err(|e| ModstashError::Worker(format!("failed to spawn worker: {e}")))?;

        tracing::debug!(operation = operation.label(), "command dispatched");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SortMode;
    use crate::registry::Installer;
    use crate::storage::JsonStorage;
    use std::sync::mpsc;
    use std::time::Duration;
    use tempfile::TempDir;

    struct NoopInstaller;

    impl Installer for NoopInstaller {
        fn install(&self, _urls: &[String]) -> Result<String> {
            Ok(String::new())
        }
    }

    fn worker(dir: &TempDir) -> Worker {
        let storage = JsonStorage::new(dir.path().join("packages.json")).unwrap();
        Worker::new(Arc::new(Registry::new(Box::new(storage), Box::new(NoopInstaller))))
    }

    #[test]
    fn group_listing_is_tagged_with_its_scope() {
        let dir = TempDir::new().unwrap();
        let worker = worker(&dir);
        worker.handle_message(WorkerMessage::create_group("cli".to_string()));

        let response =
            worker.handle_message(WorkerMessage::load_group_packages("cli".to_string(), SortMode::Frequency));

        assert_eq!(
            response,
            WorkerResponse::PackagesLoaded {
                scope: ListScope::Group("cli".to_string()),
                packages: Vec::new(),
            }
        );
    }

    #[test]
    fn failures_name_their_operation() {
        let dir = TempDir::new().unwrap();
        let worker = worker(&dir);

        let response = worker.handle_message(WorkerMessage::delete_group("ghost".to_string()));

        assert_eq!(
            response,
            WorkerResponse::Error {
                operation: Operation::DeleteGroup,
                message: "group not found: ghost".to_string(),
            }
        );
    }

    #[test]
    fn dispatch_delivers_exactly_one_response() {
        let dir = TempDir::new().unwrap();
        let storage = JsonStorage::new(dir.path().join("packages.json")).unwrap();
        let registry = Arc::new(Registry::new(Box::new(storage), Box::new(NoopInstaller)));
        let (tx, rx) = mpsc::channel::<WorkerResponse>();
        let dispatcher = Dispatcher::new(registry, tx);

        dispatcher
            .dispatch(WorkerMessage::add_package(
                "https://github.com/charmbracelet/log".to_string(),
                String::new(),
                String::new(),
                false,
                false,
            ))
            .unwrap();

        let response = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(
            response,
            WorkerResponse::PackageAdded {
                name: "log".to_string()
            }
        );
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn request_ids_are_unique() {
        let a = WorkerMessage::load_groups();
        let b = WorkerMessage::load_groups();
        assert_ne!(a.request_id(), b.request_id());
        assert_ne!(a, b);
    }
}
