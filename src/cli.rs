//! One-shot command surface.
//!
//! `modstash` without a subcommand starts the interactive session; every
//! subcommand runs a single registry operation and prints a short report.

use crate::domain::{Package, Result, SortMode};
use crate::registry::Registry;
use crate::{Config, ModstashError};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "modstash")]
#[command(about = "A personal registry of module references", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Options shared by every subcommand. They override the config file.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Config file (defaults to $XDG_CONFIG_HOME/modstash/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the store and the log
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Built-in theme for the interactive session
    #[arg(long, global = true)]
    pub theme: Option<String>,
}

impl GlobalArgs {
    /// Loads the config file and applies the command line overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ModstashError::Config`] for an unreadable or invalid file.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(data_dir) = &self.data_dir {
            config.data_dir = Some(data_dir.clone());
        }
        if let Some(theme) = &self.theme {
            config.theme = Some(theme.clone());
            config.theme_file = None;
        }
        Ok(config)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Save a module reference
    Add {
        /// Module url, e.g. github.com/spf13/cobra
        url: String,
        /// Alias (derived from the url if omitted)
        #[arg(short, long, default_value = "")]
        name: String,
        /// Version to pin (latest if omitted)
        #[arg(short, long, default_value = "")]
        version: String,
        /// Install right after saving
        #[arg(short, long)]
        install: bool,
        /// Overwrite an existing alias
        #[arg(short, long)]
        force: bool,
    },

    /// Install saved packages by alias
    Get {
        #[arg(required = true)]
        aliases: Vec<String>,
    },

    /// List saved packages, most recently used first
    List {
        /// Maximum number of rows (-1 for all)
        #[arg(short, long, default_value_t = -1, allow_negative_numbers = true)]
        limit: i64,
        /// Sort by frequency of use instead
        #[arg(short, long)]
        freq: bool,
    },

    /// Soft-delete packages or a group
    Rm {
        /// Aliases to delete, comma separated
        #[arg(short, long, value_delimiter = ',')]
        names: Vec<String>,
        /// Group to delete
        #[arg(short, long)]
        group: Option<String>,
    },

    /// Manage groups
    Group {
        #[command(subcommand)]
        command: GroupCommand,
    },

    /// Permanently remove soft-deleted packages and groups
    Purge,

    /// Back up the store and start over with an empty one
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum GroupCommand {
    /// Create an empty group
    Create { name: String },

    /// List groups
    List,

    /// Add saved packages to a group
    Assign {
        group: String,
        #[arg(required = true)]
        aliases: Vec<String>,
    },

    /// List the packages of a group
    Show {
        group: String,
        /// Sort by most recently used instead of frequency
        #[arg(short, long)]
        last_used: bool,
    },

    /// Remove packages from a group (they stay saved)
    Remove {
        group: String,
        #[arg(required = true)]
        aliases: Vec<String>,
    },

    /// Install every package of a group in one batch
    Install { group: String },
}

/// Runs one subcommand against `registry`, reporting to `out`.
///
/// # Errors
///
/// Returns the registry failure, or an I/O error from `out`.
pub fn run_command<W: Write>(registry: &Registry, command: Command, out: &mut W) -> Result<()> {
    let _span = tracing::info_span!("command", command = ?command).entered();

    match command {
        Command::Add {
            url,
            name,
            version,
            install,
            force,
        } => {
            let alias = registry.add(&url, &name, &version, install, force)?;
            if install {
                writeln!(out, "Saved and installed {alias}")?;
            } else {
                writeln!(out, "Saved {alias}")?;
            }
        }
        Command::Get { aliases } => {
            let urls = registry.get(&aliases)?;
            writeln!(out, "Installed {} package(s)", urls.len())?;
            for url in urls {
                writeln!(out, "  {url}")?;
            }
        }
        Command::List { limit, freq } => {
            let sort = if freq { SortMode::Frequency } else { SortMode::LastUsed };
            write_packages(out, &registry.list(limit, sort)?)?;
        }
        Command::Rm { names, group } => remove(registry, &names, group.as_deref(), out)?,
        Command::Group { command } => run_group_command(registry, command, out)?,
        Command::Purge => {
            let (packages, groups) = registry.purge()?;
            writeln!(out, "Purged {packages} package(s) and {groups} group(s)")?;
        }
        Command::Reset { yes } => {
            if !yes {
                return Err(ModstashError::Config(
                    "reset discards every package and group; pass --yes to confirm".to_string(),
                ));
            }
            let backup = registry.hard_reset()?;
            writeln!(out, "Store reset. Backup written to {}", backup.display())?;
        }
    }
    Ok(())
}

fn remove<W: Write>(registry: &Registry, names: &[String], group: Option<&str>, out: &mut W) -> Result<()> {
    if names.is_empty() && group.is_none() {
        return Err(ModstashError::Config(
            "must specify at least one package (-n) or a group (-g)".to_string(),
        ));
    }
    if let Some(group) = group {
        registry.delete_group(group)?;
        writeln!(out, "Deleted group {group}")?;
    }
    if !names.is_empty() {
        let count = registry.delete_packages(names)?;
        writeln!(out, "Deleted {count} package(s)")?;
    }
    Ok(())
}

fn run_group_command<W: Write>(registry: &Registry, command: GroupCommand, out: &mut W) -> Result<()> {
    match command {
        GroupCommand::Create { name } => {
            let group = registry.create_group(&name)?;
            writeln!(out, "Created group {}", group.name)?;
        }
        GroupCommand::List => {
            for group in registry.list_groups()? {
                writeln!(out, "{}", group.name)?;
            }
        }
        GroupCommand::Assign { group, aliases } => {
            let urls = registry.resolve_urls(&aliases)?;
            let count = registry.assign_to_group(&urls, &group)?;
            writeln!(out, "Assigned {count} package(s) to {group}")?;
        }
        GroupCommand::Show { group, last_used } => {
            let sort = if last_used { SortMode::LastUsed } else { SortMode::Frequency };
            write_packages(out, &registry.list_packages_by_group(&group, sort)?)?;
        }
        GroupCommand::Remove { group, aliases } => {
            let count = registry.remove_aliases_from_group(&group, &aliases)?;
            writeln!(out, "Removed {count} package(s) from {group}")?;
        }
        GroupCommand::Install { group } => {
            let urls = registry.install_group(&group)?;
            writeln!(out, "Installed {} package(s) from {group}", urls.len())?;
        }
    }
    Ok(())
}

fn write_packages<W: Write>(out: &mut W, packages: &[Package]) -> Result<()> {
    let name_width = packages.iter().map(|p| p.name.chars().count()).max().unwrap_or(0);
    let url_width = packages.iter().map(|p| p.url.chars().count()).max().unwrap_or(0);
    for package in packages {
        writeln!(
            out,
            "{:<name_width$}  {:<url_width$}  {:<10}  {:>4}  {}",
            package.name,
            package.url,
            package.version_label(),
            package.freq,
            package.time_ago(),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Installer;
    use crate::storage::JsonStorage;
    use tempfile::TempDir;

    struct OkInstaller;

    impl Installer for OkInstaller {
        fn install(&self, _urls: &[String]) -> Result<String> {
            Ok(String::new())
        }
    }

    fn registry(dir: &TempDir) -> Registry {
        let storage = JsonStorage::new(dir.path().join("modstash.json")).unwrap();
        Registry::new(Box::new(storage), Box::new(OkInstaller))
    }

    fn run(registry: &Registry, args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("modstash").chain(args.iter().copied())).unwrap();
        let mut out = Vec::new();
        run_command(registry, cli.command.unwrap(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn no_subcommand_means_session() {
        let cli = Cli::try_parse_from(["modstash", "--theme", "catppuccin-latte"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.global.theme.as_deref(), Some("catppuccin-latte"));
    }

    #[test]
    fn add_then_list() {
        let dir = TempDir::new().unwrap();
        let reg = registry(&dir);

        let out = run(&reg, &["add", "https://github.com/spf13/cobra", "-v", "v1.8.0"]).unwrap();
        assert_eq!(out, "Saved cobra\n");

        let out = run(&reg, &["list", "-f"]).unwrap();
        assert!(out.starts_with("cobra  github.com/spf13/cobra  v1.8.0"));
        assert!(out.contains("never"));
    }

    #[test]
    fn rm_needs_a_target() {
        let dir = TempDir::new().unwrap();
        let reg = registry(&dir);
        assert!(matches!(run(&reg, &["rm"]), Err(ModstashError::Config(_))));
    }

    #[test]
    fn rm_splits_names() {
        let dir = TempDir::new().unwrap();
        let reg = registry(&dir);
        run(&reg, &["add", "x.io/a"]).unwrap();
        run(&reg, &["add", "x.io/b"]).unwrap();

        let out = run(&reg, &["rm", "-n", "a,b"]).unwrap();

        assert_eq!(out, "Deleted 2 package(s)\n");
        assert_eq!(run(&reg, &["list"]).unwrap(), "");
    }

    #[test]
    fn group_lifecycle() {
        let dir = TempDir::new().unwrap();
        let reg = registry(&dir);
        run(&reg, &["add", "x.io/a"]).unwrap();
        run(&reg, &["add", "x.io/b"]).unwrap();
        run(&reg, &["group", "create", "tools"]).unwrap();

        let out = run(&reg, &["group", "assign", "tools", "a", "b"]).unwrap();
        assert_eq!(out, "Assigned 2 package(s) to tools\n");

        run(&reg, &["group", "remove", "tools", "a"]).unwrap();
        let out = run(&reg, &["group", "show", "tools"]).unwrap();
        assert!(out.starts_with("b  x.io/b"));
        assert_eq!(out.lines().count(), 1);

        let out = run(&reg, &["group", "install", "tools"]).unwrap();
        assert_eq!(out, "Installed 1 package(s) from tools\n");
        assert_eq!(run(&reg, &["group", "list"]).unwrap(), "tools\n");
    }

    #[test]
    fn reset_requires_confirmation() {
        let dir = TempDir::new().unwrap();
        let reg = registry(&dir);
        run(&reg, &["add", "x.io/a"]).unwrap();

        assert!(run(&reg, &["reset"]).is_err());
        assert_eq!(run(&reg, &["list"]).unwrap().lines().count(), 1);

        let out = run(&reg, &["reset", "--yes"]).unwrap();
        assert!(out.starts_with("Store reset."));
        assert_eq!(run(&reg, &["list"]).unwrap(), "");
    }
}
