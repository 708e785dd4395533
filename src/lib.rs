//! modstash: a personal registry of module references.
//!
//! modstash remembers the modules you keep reaching for under short aliases
//! and installs them for you:
//! - Aliases derived from module urls (`github.com/foo/bar/v2` ⇒ `bar`)
//! - Usage tracking with frequency and recency ordering
//! - Named groups installed in one batch
//! - Soft deletes, purge and hard reset
//! - An interactive terminal session next to the one-shot commands

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI (main.rs)          Session runtime (session)   │  ← Entry points
//! └─────────────────────────────────────────────────────┘
//!            │                          │
//!            │            ┌─────────────────────────────┐
//!            │            │  Application Layer (app/)   │  ← State machine
//!            │            │  - Event handling           │
//!            │            │  - Key mapping              │
//!            │            │  - View model computation   │
//!            │            └─────────────────────────────┘
//!            │               │                    │
//!            │     ┌───────────────┐   ┌───────────────────┐
//!            │     │ UI Layer      │   │ Worker Layer      │
//!            │     │ (ui/)         │   │ (worker/)         │
//!            │     │ - Components  │   │ - Dispatcher      │
//!            │     │ - Theming     │   │ - Completions     │
//!            │     └───────────────┘   └───────────────────┘
//!            ▼                                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Registry Service (registry/)                       │  ← Use cases
//! │  - Installer invocation                             │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Storage Layer (storage/)                           │  ← Persistence
//! │  - JSON file with atomic writes                     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Session state machine with event/action model
//! - [`cli`]: One-shot subcommands
//! - [`domain`]: Core domain types (Package, Group, errors)
//! - [`infrastructure`]: Platform paths
//! - [`observability`]: File-based tracing
//! - [`registry`]: Registry use cases and the installer
//! - [`session`]: Terminal runtime for the interactive session
//! - [`storage`]: JSON file persistence
//! - [`ui`]: Terminal rendering with theme support
//! - [`worker`]: Background command dispatch
//!
//! # Configuration
//!
//! Read from `$XDG_CONFIG_HOME/modstash/config.toml` unless `--config` names
//! another file. Every key is optional:
//!
//! ```toml
//! data_dir = "~/.local/share/modstash"
//! installer = ["go", "get"]
//! theme = "catppuccin-mocha"
//! theme_file = "~/.config/modstash/theme.toml"
//! trace_level = "debug"
//! ```
//!
//! # Examples
//!
//! ```rust
//! use modstash::{handle_event, initialize, Config, Event};
//!
//! let mut state = initialize(&Config::default());
//!
//! let (needs_render, actions) = handle_event(&mut state, &Event::Down)?;
//! assert!(needs_render);
//! assert!(actions.is_empty());
//! # Ok::<(), modstash::ModstashError>(())
//! ```

pub mod app;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod registry;
pub mod session;
pub mod storage;
pub mod ui;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event, InputMode, ViewMode};
pub use domain::{Group, ModstashError, Package, Result, SortMode};
pub use registry::Registry;
pub use session::start_session;
pub use ui::Theme;

use infrastructure::{default_config_path, default_data_dir, expand_tilde};
use registry::CommandInstaller;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use storage::JsonStorage;

/// User configuration.
///
/// Loaded from TOML; every field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the store and the log. Supports `~`.
    ///
    /// Default: the platform data directory joined with `modstash`.
    pub data_dir: Option<String>,

    /// Installer program followed by its fixed arguments. Urls are appended.
    ///
    /// Default: `["go", "get"]`
    pub installer: Option<Vec<String>>,

    /// Built-in theme name.
    ///
    /// Options: `catppuccin-mocha`, `catppuccin-latte`, `catppuccin-frappe`,
    /// `catppuccin-macchiato`. Ignored if `theme_file` is set.
    pub theme: Option<String>,

    /// Path to a custom TOML theme file. Takes precedence over `theme`.
    pub theme_file: Option<String>,

    /// Tracing filter directive, e.g. `debug` or `modstash=trace`.
    ///
    /// `MODSTASH_LOG` overrides it. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Config {
    /// Parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ModstashError::Config`] if the file cannot be read or is not
    /// valid config TOML.
    ///
    /// # Example
    ///
    /// ```rust
    /// use modstash::Config;
    ///
    /// let dir = tempfile::tempdir()?;
    /// let path = dir.path().join("config.toml");
    /// std::fs::write(&path, "theme = \"catppuccin-latte\"\n")?;
    ///
    /// let config = Config::from_file(&path)?;
    /// assert_eq!(config.theme.as_deref(), Some("catppuccin-latte"));
    /// assert!(config.installer.is_none());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ModstashError::Config(format!("failed to read {}: {e}", path.display())))?;

        toml::from_str(&contents)
            .map_err(|e| ModstashError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Loads the config from `path`, or from the default location.
    ///
    /// An explicitly named file must exist. A missing default file yields the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ModstashError::Config`] for an unreadable or invalid file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// The data directory with `~` expanded.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.as_deref().map_or_else(default_data_dir, expand_tilde)
    }

    /// Location of the JSON store.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        infrastructure::store_path(&self.data_dir())
    }

    /// Builds the configured installer.
    ///
    /// # Errors
    ///
    /// Returns [`ModstashError::Config`] for an empty `installer` list.
    pub fn installer(&self) -> Result<CommandInstaller> {
        match &self.installer {
            Some(argv) => CommandInstaller::from_argv(argv),
            None => Ok(CommandInstaller::default()),
        }
    }
}

/// Creates the session state with the configured theme.
///
/// A theme that fails to load is logged and replaced with the default, so a
/// broken theme file never keeps the session from starting.
///
/// # Example
///
/// ```rust
/// use modstash::{initialize, Config};
///
/// let config = Config {
///     theme: Some("no-such-theme".to_string()),
///     ..Default::default()
/// };
///
/// let state = initialize(&config);
/// assert_eq!(state.theme.name, "catppuccin-mocha");
/// ```
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!("initializing session state");

    let theme_file = config.theme_file.as_deref().map(expand_tilde);
    let theme = Theme::resolve(config.theme.as_deref(), theme_file.as_deref()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load theme, using default");
        Theme::default()
    });

    AppState::new(theme)
}

/// Opens the store and builds the registry described by `config`.
///
/// Creates the data directory when missing.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created, the store is
/// unreadable, or the installer is misconfigured.
pub fn open_registry(config: &Config) -> Result<Registry> {
    let data_dir = config.data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let storage = JsonStorage::new(infrastructure::store_path(&data_dir))?;
    let installer = config.installer()?;
    tracing::debug!(
        store = %storage.path().display(),
        installer = installer.program(),
        "registry opened"
    );

    Ok(Registry::new(Box::new(storage), Box::new(installer)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        assert_eq!(Config::from_file(&path).unwrap(), Config::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "colour = \"blue\"\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, ModstashError::Config(_)));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn installer_argv() {
        let config = Config {
            installer: Some(vec!["cargo".to_string(), "add".to_string()]),
            ..Default::default()
        };
        assert_eq!(config.installer().unwrap().program(), "cargo");

        let empty = Config {
            installer: Some(vec![]),
            ..Default::default()
        };
        assert!(matches!(empty.installer(), Err(ModstashError::Config(_))));
    }

    #[test]
    fn open_registry_creates_data_dir() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("nested").join("data");
        let config = Config {
            data_dir: Some(data_dir.display().to_string()),
            ..Default::default()
        };

        let registry = open_registry(&config).unwrap();
        registry.add("github.com/spf13/cobra", "", "", false, false).unwrap();

        assert!(config.store_path().exists());
        assert_eq!(config.store_path(), data_dir.join("modstash.json"));
    }
}
