//! Package and group domain models.
//!
//! A [`Package`] is an alias for a module source location (e.g.
//! `github.com/charmbracelet/log`) together with its pinned version and usage
//! statistics. A [`Group`] is a named bundle of packages that can be installed
//! together. This module also holds the pure helpers that shape user input into
//! stored values: [`normalize_url`] and [`derive_alias`].

use serde::{Deserialize, Serialize};

/// Number of seconds in one minute.
const SECONDS_PER_MINUTE: i64 = 60;

/// Number of seconds in one hour.
const SECONDS_PER_HOUR: i64 = 3600;

/// Number of seconds in one day.
const SECONDS_PER_DAY: i64 = 86400;

/// A stored module reference.
///
/// # Fields
///
/// - `id`: Storage identifier, assigned on insert and never reused
/// - `name`: Alias, unique among non-deleted packages
/// - `url`: Normalized source location (scheme stripped)
/// - `version`: Pinned version, `None` meaning "latest"
/// - `freq`: Number of successful installs
/// - `last_used`: Unix timestamp of the last successful install
///
/// Soft-delete state and bookkeeping timestamps live on the storage record
/// ([`crate::storage::PackageRecord`]); a `Package` handed out by the registry is
/// always a live row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: i64,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub freq: u32,
    #[serde(default)]
    pub last_used: Option<i64>,
}

impl Package {
    /// Creates a package that has never been installed.
    ///
    /// ```
    /// use modstash::domain::Package;
    ///
    /// let pkg = Package::new(1, "log", "github.com/charmbracelet/log", None);
    /// assert_eq!(pkg.freq, 0);
    /// assert!(pkg.last_used.is_none());
    /// ```
    #[must_use]
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
        }
    }

    /// Version label for display, `latest` when nothing is pinned.
    #[must_use]
    pub fn version_label(&self) -> &str {
        self.version.as_deref().unwrap_or("latest")
    }

    /// Returns a human-readable string describing when the package was last installed.
    ///
    /// - Never installed: "never"
    /// - Less than 1 minute: "just now"
    /// - Less than 1 hour: "Xm ago"
    /// - Less than 1 day: "Xh ago"
    /// - Otherwise: "Xd ago"
    ///
    /// ```
    /// use modstash::domain::Package;
    ///
    /// let mut pkg = Package::new(1, "log", "github.com/charmbracelet/log", None);
    /// assert_eq!(pkg.time_ago(), "never");
    ///
    /// pkg.last_used = Some(chrono::Utc::now().timestamp() - 300);
    /// assert_eq!(pkg.time_ago(), "5m ago");
    /// ```
    #[must_use]
    pub fn time_ago(&self) -> String {
        let Some(last_used) = self.last_used else {
            return "never".to_string();
        };
        let diff = chrono::Utc::now().timestamp() - last_used;

        if diff < SECONDS_PER_MINUTE {
            "just now".to_string()
        } else if diff < SECONDS_PER_HOUR {
            let mins = diff / SECONDS_PER_MINUTE;
            format!("{mins}m ago")
        } else if diff < SECONDS_PER_DAY {
            let hours = diff / SECONDS_PER_HOUR;
            format!("{hours}h ago")
        } else {
            let days = diff / SECONDS_PER_DAY;
            format!("{days}d ago")
        }
    }
}

/// A named bundle of packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
}

/// Ordering applied to package listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Most recently installed first; never-installed packages last.
    #[default]
    LastUsed,
    /// Most frequently installed first.
    Frequency,
}

impl SortMode {
    /// Short label shown in the header and status line.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LastUsed => "last used",
            Self::Frequency => "frequency",
        }
    }
}

/// Strips one leading `https://` or `http://` scheme.
///
/// Surrounding whitespace is removed as well. Already normalized input is
/// returned unchanged.
///
/// ```
/// use modstash::domain::normalize_url;
///
/// assert_eq!(normalize_url("https://github.com/acme/foo"), "github.com/acme/foo");
/// assert_eq!(normalize_url("http://example.com/x"), "example.com/x");
/// assert_eq!(normalize_url("github.com/acme/foo"), "github.com/acme/foo");
/// ```
#[must_use]
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
        .to_string()
}

/// Derives an alias from a normalized URL.
///
/// Takes the final path segment, skipping trailing major-version segments
/// (`v2`, `v10`, ...). Falls back to the whole URL when nothing usable is left.
///
/// ```
/// use modstash::domain::derive_alias;
///
/// assert_eq!(derive_alias("github.com/foo/bar/v2"), "bar");
/// assert_eq!(derive_alias("github.com/foo/bar"), "bar");
/// assert_eq!(derive_alias("example.com"), "example.com");
/// ```
#[must_use]
pub fn derive_alias(url: &str) -> String {
    let mut rest = url.trim_end_matches('/');

    loop {
        let name = last_segment(rest);
        if !is_major_version(name) {
            break;
        }
        rest = rest[..rest.len() - name.len()].trim_end_matches('/');
    }

    match last_segment(rest) {
        "" => url.to_string(),
        name => name.to_string(),
    }
}

/// Final `/`-separated segment of a path without trailing separators.
fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Matches `v` followed by one or more ASCII digits and nothing else.
fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}
