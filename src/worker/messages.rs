//! Command and completion types exchanged with background workers.
//!
//! The session never touches the registry directly. It describes the work as a
//! [`WorkerMessage`], the dispatcher runs it off the UI thread, and exactly one
//! [`WorkerResponse`] comes back through the session's inbound queue.

use crate::domain::{Group, Package, SortMode};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Allocates a process-wide unique id used to correlate a command with its
/// worker logs.
fn next_request_id() -> u64 {
    NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed)
}

/// Which package listing a load belongs to.
///
/// Completions are tagged with the scope they were fetched for so the session
/// can drop results that arrive after the user has navigated elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    /// The full registry.
    All,
    /// Members of the named group.
    Group(String),
}

/// Kind of work a message requests. Failures are reported per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    LoadPackages,
    LoadGroups,
    LoadGroupPackages,
    AddPackage,
    InstallPackages,
    RecordUsage,
    DeletePackages,
    CreateGroup,
    AssignToGroup,
    RemoveFromGroup,
    InstallGroup,
    DeleteGroup,
}

impl Operation {
    /// Short name used in logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LoadPackages => "load packages",
            Self::LoadGroups => "load groups",
            Self::LoadGroupPackages => "load group packages",
            Self::AddPackage => "add package",
            Self::InstallPackages => "install packages",
            Self::RecordUsage => "record usage",
            Self::DeletePackages => "delete packages",
            Self::CreateGroup => "create group",
            Self::AssignToGroup => "assign to group",
            Self::RemoveFromGroup => "remove from group",
            Self::InstallGroup => "install group",
            Self::DeleteGroup => "delete group",
        }
    }

    /// `true` for the operations that run under the installing overlay.
    #[must_use]
    pub const fn is_install(self) -> bool {
        matches!(self, Self::InstallPackages | Self::InstallGroup)
    }
}

/// Macro to generate builder methods for `WorkerMessage` variants.
///
/// Generates convenience constructors that stamp each message with a fresh
/// request id.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with a fresh request id")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        request_id: next_request_id(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    load_packages(LoadPackages { sort: SortMode }),
    load_groups(LoadGroups {}),
    load_group_packages(LoadGroupPackages { group: String, sort: SortMode }),
    add_package(AddPackage { url: String, name: String, version: String, install: bool, force: bool }),
    install_packages(InstallPackages { urls: Vec<String> }),
    record_usage(RecordUsage { urls: Vec<String> }),
    delete_packages(DeletePackages { names: Vec<String> }),
    create_group(CreateGroup { name: String }),
    assign_to_group(AssignToGroup { urls: Vec<String>, group: String }),
    remove_from_group(RemoveFromGroup { group_id: i64, package_ids: Vec<i64> }),
    install_group(InstallGroup { group: String }),
    delete_group(DeleteGroup { name: String }),
}

/// Commands sent from the session to a worker.
///
/// Every variant carries a `request_id` that shows up on the worker's tracing
/// span. Use the builder functions to construct messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerMessage {
    /// List the whole registry in the given order.
    LoadPackages { sort: SortMode, request_id: u64 },

    /// List live groups by name.
    LoadGroups { request_id: u64 },

    /// List the members of one group in the given order.
    LoadGroupPackages {
        group: String,
        sort: SortMode,
        request_id: u64,
    },

    /// Save a module reference, optionally installing it right away.
    AddPackage {
        url: String,
        name: String,
        version: String,
        install: bool,
        force: bool,
        request_id: u64,
    },

    /// Install urls in one batch. Usage is recorded by a follow-up
    /// [`RecordUsage`](Self::RecordUsage).
    InstallPackages { urls: Vec<String>, request_id: u64 },

    RecordUsage { urls: Vec<String>, request_id: u64 },

    /// Soft-delete packages by alias.
    DeletePackages { names: Vec<String>, request_id: u64 },

    CreateGroup { name: String, request_id: u64 },

    AssignToGroup {
        urls: Vec<String>,
        group: String,
        request_id: u64,
    },

    /// Drop memberships. The packages themselves stay.
    RemoveFromGroup {
        group_id: i64,
        package_ids: Vec<i64>,
        request_id: u64,
    },

    InstallGroup { group: String, request_id: u64 },

    DeleteGroup { name: String, request_id: u64 },
}

impl WorkerMessage {
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::LoadPackages { .. } => Operation::LoadPackages,
            Self::LoadGroups { .. } => Operation::LoadGroups,
            Self::LoadGroupPackages { .. } => Operation::LoadGroupPackages,
            Self::AddPackage { .. } => Operation::AddPackage,
            Self::InstallPackages { .. } => Operation::InstallPackages,
            Self::RecordUsage { .. } => Operation::RecordUsage,
            Self::DeletePackages { .. } => Operation::DeletePackages,
            Self::CreateGroup { .. } => Operation::CreateGroup,
            Self::AssignToGroup { .. } => Operation::AssignToGroup,
            Self::RemoveFromGroup { .. } => Operation::RemoveFromGroup,
            Self::InstallGroup { .. } => Operation::InstallGroup,
            Self::DeleteGroup { .. } => Operation::DeleteGroup,
        }
    }

    #[must_use]
    pub const fn request_id(&self) -> u64 {
        match self {
            Self::LoadPackages { request_id, .. }
            | Self::LoadGroups { request_id }
            | Self::LoadGroupPackages { request_id, .. }
            | Self::AddPackage { request_id, .. }
            | Self::InstallPackages { request_id, .. }
            | Self::RecordUsage { request_id, .. }
            | Self::DeletePackages { request_id, .. }
            | Self::CreateGroup { request_id, .. }
            | Self::AssignToGroup { request_id, .. }
            | Self::RemoveFromGroup { request_id, .. }
            | Self::InstallGroup { request_id, .. }
            | Self::DeleteGroup { request_id, .. } => *request_id,
        }
    }
}

/// Completions sent from a worker back to the session.
///
/// Each command produces exactly one response: its success variant or
/// [`Error`](Self::Error).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerResponse {
    /// A package listing, tagged with the scope it was fetched for.
    PackagesLoaded {
        scope: ListScope,
        packages: Vec<Package>,
    },

    GroupsLoaded { groups: Vec<Group> },

    /// The package was saved (and installed, if requested).
    PackageAdded { name: String },

    PackagesInstalled { urls: Vec<String> },

    UsageRecorded { count: usize },

    PackagesDeleted { count: usize },

    GroupCreated { group: Group },

    PackagesAssigned { group: String, count: usize },

    PackagesRemoved { count: usize },

    GroupInstalled { group: String, count: usize },

    GroupDeleted { name: String },

    /// The operation failed.
    Error {
        /// Which command failed.
        operation: Operation,

        /// Human-readable error message.
        message: String,
    },
}
