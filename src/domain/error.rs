//! Error types for modstash.
//!
//! This module defines the centralized error type [`ModstashError`] and a type alias
//! [`Result`] used throughout the crate. Registry operations return typed failures
//! instead of panicking, so the interactive session can always turn them into a
//! status line and the one-shot commands can print them verbatim.

use thiserror::Error;

/// Maximum number of characters of installer output carried in an error.
pub const MAX_INSTALL_OUTPUT: usize = 200;

/// The main error type for modstash operations.
///
/// Variants map onto the failure taxonomy the registry reports:
///
/// - [`Conflict`](Self::Conflict): a unique name is already taken
/// - [`NotFound`](Self::NotFound): alias, group or package lookup miss
/// - [`InstallFailed`](Self::InstallFailed): the installer exited unsuccessfully
/// - [`Storage`](Self::Storage) / [`Io`](Self::Io): persistence failures
///
/// # Examples
///
/// ```
/// use modstash::ModstashError;
///
/// let err = ModstashError::Conflict("package already exists: foo".to_string());
/// assert_eq!(err.to_string(), "package already exists: foo");
/// ```
#[derive(Debug, Error)]
pub enum ModstashError {
    /// A unique name is already used by a non-deleted row.
    ///
    /// Raised by `add` without the force flag and by group creation. The
    /// string names the conflicting entity.
    #[error("{0}")]
    Conflict(String),

    /// One or more lookups missed.
    ///
    /// The string carries the missing identifiers, e.g.
    /// `"packages not found: foo, bar"`.
    #[error("{0}")]
    NotFound(String),

    /// The external installer reported failure.
    ///
    /// Carries an excerpt of the combined output, at most
    /// [`MAX_INSTALL_OUTPUT`] characters.
    #[error("install failed: {0}")]
    InstallFailed(String),

    /// Storage operation failed.
    ///
    /// Occurs when reading from or writing to the storage backend fails.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme parsing or application failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// A background command could not be delivered or its result was lost.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ModstashError {
    /// Builds an [`InstallFailed`](Self::InstallFailed) error from raw installer output.
    ///
    /// The output is trimmed and cut to [`MAX_INSTALL_OUTPUT`] characters, the
    /// last three replaced by `...` when truncation happens.
    ///
    /// ```
    /// use modstash::ModstashError;
    ///
    /// let err = ModstashError::install_failed(&"x".repeat(500));
    /// let ModstashError::InstallFailed(detail) = err else { unreachable!() };
    /// assert_eq!(detail.chars().count(), 200);
    /// assert!(detail.ends_with("..."));
    /// ```
    #[must_use]
    pub fn install_failed(output: &str) -> Self {
        let output = output.trim();
        let detail = if output.chars().count() > MAX_INSTALL_OUTPUT {
            let kept: String = output.chars().take(MAX_INSTALL_OUTPUT - 3).collect();
            format!("{kept}...")
        } else {
            output.to_string()
        };
        Self::InstallFailed(detail)
    }

    /// Returns `true` for uniqueness violations.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

/// A specialized `Result` type for modstash operations.
pub type Result<T> = std::result::Result<T, ModstashError>;
