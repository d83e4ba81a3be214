//! Registry type definitions and information structures.

use crate::config::Config;
use crate::store::LockRecord;

/// Limits applied to caller input, and the staleness threshold for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryLimits {
    /// Minimum owner length, in characters.
    pub min_owner_len: usize,

    /// Maximum note length, in characters.
    pub max_note_len: usize,

    /// Minutes after which a hold is reported as stale.
    pub stale_minutes: u32,
}

impl Default for RegistryLimits {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for RegistryLimits {
    fn from(config: &Config) -> Self {
        Self {
            min_owner_len: config.min_owner_len,
            max_note_len: config.max_note_len,
            stale_minutes: config.lock_stale_minutes,
        }
    }
}

/// Information about a held resource, as reported by `list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockInfo {
    /// The current hold.
    pub record: LockRecord,

    /// Whether the hold is older than the staleness threshold.
    pub is_stale: bool,
}

impl std::fmt::Display for LockInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (owner: {}, age: {}, note: {}{})",
            self.record.resource_id,
            self.record.owner,
            self.record.age_string(),
            self.record.note,
            if self.is_stale { ", STALE" } else { "" }
        )
    }
}
