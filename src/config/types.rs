//! Configuration constants and defaults for pdmlock.

/// File name of the configuration inside a namespace directory.
pub const CONFIG_FILE_NAME: &str = "pdmlock.yaml";

// Default value functions for serde
pub(crate) fn default_lock_file() -> String {
    "locks.json".to_string()
}
pub(crate) fn default_events_file() -> String {
    "events.ndjson".to_string()
}
pub(crate) fn default_lock_stale_minutes() -> u32 {
    120
}
pub(crate) fn default_min_owner_len() -> usize {
    3
}
pub(crate) fn default_max_note_len() -> usize {
    500
}
pub(crate) fn default_true() -> bool {
    true
}
