//! Namespace resolution for pdmlock.
//!
//! A namespace is one directory holding a lock table, its configuration,
//! and its audit log. Every process that shares the directory shares the
//! locks. All commands go through this module to locate those files.

use crate::config::{CONFIG_FILE_NAME, Config};
use crate::error::{PdmError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Default namespace directory relative to the working directory.
pub const DEFAULT_NAMESPACE_DIR: &str = ".pdmlock";

/// Resolved paths for a lock namespace. All paths are absolute.
#[derive(Debug, Clone)]
pub struct Namespace {
    /// Absolute path to the namespace directory.
    pub root: PathBuf,
}

impl Namespace {
    /// Resolve the namespace from an optional directory.
    ///
    /// `None` means `.pdmlock/` under the current working directory; a relative
    /// path is resolved against the current working directory.
    pub fn resolve(dir: Option<&Path>) -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            PdmError::Config(format!("failed to get current working directory: {}", e))
        })?;

        Ok(Self::resolve_from(&cwd, dir))
    }

    /// Resolve the namespace relative to a specific working directory.
    pub fn resolve_from<P: AsRef<Path>>(cwd: P, dir: Option<&Path>) -> Self {
        let cwd = cwd.as_ref();
        let root = match dir {
            Some(dir) if dir.is_absolute() => dir.to_path_buf(),
            Some(dir) => cwd.join(dir),
            None => cwd.join(DEFAULT_NAMESPACE_DIR),
        };
        Self { root }
    }

    /// Namespace rooted at an existing path, without touching the working directory.
    pub fn at<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Check if the namespace directory exists.
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Ensure the namespace directory exists, returning an error if not.
    ///
    /// Commands other than `init` call this to point users at `pdmlock init`
    /// instead of surfacing a bare I/O error.
    pub fn ensure_initialized(&self) -> Result<()> {
        if !self.exists() {
            return Err(PdmError::Config(format!(
                "pdmlock namespace not initialized.\n\
                 Expected namespace directory at: {}\n\n\
                 Run `pdmlock init` to create it.",
                self.root.display()
            )));
        }
        Ok(())
    }

    /// Get the path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    /// Load the namespace config, using defaults when the file is absent.
    pub fn load_config(&self) -> Result<Config> {
        Config::load_or_default(self.config_path())
    }

    /// Get the path to the lock table file.
    pub fn lock_table_path(&self, config: &Config) -> PathBuf {
        self.root.join(&config.lock_file)
    }

    /// Get the path to the audit log file.
    pub fn events_path(&self, config: &Config) -> PathBuf {
        self.root.join(&config.events_file)
    }

    /// Get the repository directory, if one is configured.
    ///
    /// Relative paths resolve against the namespace directory.
    pub fn repository_dir(&self, config: &Config) -> Option<PathBuf> {
        config.repository_dir.as_ref().map(|dir| {
            if dir.is_absolute() {
                dir.clone()
            } else {
                self.root.join(dir)
            }
        })
    }
}

/// Convenience function to resolve a namespace and ensure it is initialized.
pub fn require_initialized_namespace(dir: Option<&Path>) -> Result<Namespace> {
    let ns = Namespace::resolve(dir)?;
    ns.ensure_initialized()?;
    Ok(ns)
}
