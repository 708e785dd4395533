//! Filesystem locations for the registry, its log and its configuration.
//!
//! Defaults follow the platform conventions reported by [`dirs`]: on Linux the
//! store lives under `$XDG_DATA_HOME/modstash` and the config under
//! `$XDG_CONFIG_HOME/modstash`.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "modstash";
const STORE_FILE: &str = "modstash.json";
const LOG_FILE: &str = "modstash.log";
const CONFIG_FILE: &str = "config.toml";

/// Returns the default data directory for modstash storage.
///
/// Falls back to `./.modstash` when the platform reports no data directory.
///
/// # Examples
///
/// ```
/// use modstash::infrastructure::default_data_dir;
///
/// assert!(default_data_dir().ends_with("modstash") || default_data_dir().ends_with(".modstash"));
/// ```
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(".modstash"), |dir| dir.join(APP_DIR))
}

/// Path of the default config file, if the platform has a config directory.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// The JSON store inside `data_dir`.
#[must_use]
pub fn store_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STORE_FILE)
}

/// The rotating log file inside `data_dir`.
#[must_use]
pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and all paths when the home directory is
/// unknown, are returned unchanged.
///
/// # Examples
///
/// ```
/// use modstash::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
/// assert_eq!(expand_tilde("relative"), PathBuf::from("relative"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let Some(home) = dirs::home_dir() else {
        return PathBuf::from(path);
    };
    if path == "~" {
        home
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}
