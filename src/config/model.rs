//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a lock namespace.
///
/// This struct represents the contents of `<namespace>/pdmlock.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Storage settings
    // =========================================================================
    /// Lock table file name, relative to the namespace directory.
    #[serde(default = "default_lock_file")]
    pub lock_file: String,

    /// Whether to append lock transitions to the audit log.
    #[serde(default = "default_true")]
    pub audit_log: bool,

    /// Audit log file name, relative to the namespace directory.
    #[serde(default = "default_events_file")]
    pub events_file: String,

    /// Milliseconds to wait for the lock table before giving up.
    /// Absent means wait indefinitely; 0 means do not wait.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_wait_ms: Option<u64>,

    // =========================================================================
    // Repository settings
    // =========================================================================
    /// Directory holding the checkout-able files. When set, checkout is only
    /// allowed for files that exist there. Relative paths resolve against
    /// the namespace directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_dir: Option<PathBuf>,

    // =========================================================================
    // Lock policy
    // =========================================================================
    /// Minutes after which a held lock is reported as stale.
    #[serde(default = "default_lock_stale_minutes")]
    pub lock_stale_minutes: u32,

    /// Minimum length of an owner name, in characters.
    #[serde(default = "default_min_owner_len")]
    pub min_owner_len: usize,

    /// Maximum length of a checkout note, in characters.
    #[serde(default = "default_max_note_len")]
    pub max_note_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lock_file: default_lock_file(),
            audit_log: default_true(),
            events_file: default_events_file(),
            lock_wait_ms: None,
            repository_dir: None,
            lock_stale_minutes: default_lock_stale_minutes(),
            min_owner_len: default_min_owner_len(),
            max_note_len: default_max_note_len(),
        }
    }
}
