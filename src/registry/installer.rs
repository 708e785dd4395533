//! External installer invocation.
//!
//! The registry never installs anything itself: it hands resolved urls to an
//! [`Installer`]. The production implementation shells out to a configured
//! program (`go get` by default) once per batch.

use crate::domain::error::{ModstashError, Result};
use std::process::Command;

/// Program and leading arguments used when nothing is configured.
pub const DEFAULT_INSTALLER: [&str; 2] = ["go", "get"];

/// Installs a batch of module urls.
///
/// Implementations must treat the batch as one unit: a single invocation, a
/// single success or failure.
pub trait Installer: Send + Sync {
    /// Installs all `urls` and returns the combined installer output.
    ///
    /// # Errors
    ///
    /// Returns [`ModstashError::InstallFailed`] when the installer cannot be
    /// started or exits unsuccessfully.
    fn install(&self, urls: &[String]) -> Result<String>;
}

/// Runs an external program with the urls appended to its arguments.
///
/// # Examples
///
/// ```
/// use modstash::registry::CommandInstaller;
///
/// let installer = CommandInstaller::from_argv(&["go".to_string(), "get".to_string()])?;
/// assert_eq!(installer.program(), "go");
/// # Ok::<(), modstash::ModstashError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    program: String,
    args: Vec<String>,
}

impl CommandInstaller {
    /// Builds an installer from an argv-style list: program first, then fixed
    /// arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ModstashError::Config`] if `argv` is empty.
    pub fn from_argv(argv: &[String]) -> Result<Self> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| ModstashError::Config("installer command is empty".to_string()))?;

        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for CommandInstaller {
    fn default() -> Self {
        Self {
            program: DEFAULT_INSTALLER[0].to_string(),
            args: DEFAULT_INSTALLER[1..].iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl Installer for CommandInstaller {
    fn install(&self, urls: &[String]) -> Result<String> {
        let _span = tracing::info_span!("installer_run",
            program = %self.program,
            url_count = urls.len()
        ).entered();

        let output = Command::new(&self.program)
            .args(&self.args)
            .args(urls)
            .output()
            .map_err(|e| {
                tracing::error!(error = %e, "failed to start installer");
                ModstashError::install_failed(&format!("failed to run {}: {e}", self.program))
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            tracing::warn!(status = ?output.status.code(), "installer exited unsuccessfully");
            return Err(ModstashError::install_failed(&combined));
        }

        tracing::debug!(output_len = combined.len(), "installer finished");
        Ok(combined)
    }
}
