//! Lock table and lock record types.
//!
//! On disk the table is a flat JSON object keyed by resource id:
//!
//! ```json
//! {
//!   "part001.mcam": {
//!     "owner": "alice",
//!     "note": "editing",
//!     "acquired_at": "2026-10-18T09:12:44.118Z"
//!   }
//! }
//! ```
//!
//! Entries with missing or extra fields are rejected when the table is parsed.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One resource's current exclusive hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    /// Stable identifier of the held resource (e.g., a filename).
    pub resource_id: String,

    /// Identity of the holder, opaque to the registry.
    pub owner: String,

    /// Free-form reason supplied at checkout.
    pub note: String,

    /// When the resource was checked out (RFC3339).
    pub acquired_at: DateTime<Utc>,
}

impl LockRecord {
    /// Create a record stamped with the current time.
    pub fn new(
        resource_id: impl Into<String>,
        owner: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            owner: owner.into(),
            note: note.into(),
            acquired_at: Utc::now(),
        }
    }

    /// How long the resource has been held.
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.acquired_at)
    }

    /// Format the age as a human-readable string.
    pub fn age_string(&self) -> String {
        let age = self.age();
        let minutes = age.num_minutes();
        let hours = age.num_hours();
        let days = age.num_days();

        if days > 0 {
            format!("{}d {}h", days, hours % 24)
        } else if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else {
            format!("{}m", minutes)
        }
    }

    /// Check if the hold is older than the given threshold in minutes.
    ///
    /// Staleness is informational only; nothing expires automatically.
    pub fn is_stale(&self, stale_minutes: u32) -> bool {
        self.age().num_minutes() > stale_minutes as i64
    }

    fn from_entry(resource_id: &str, entry: &LockEntry) -> Self {
        Self {
            resource_id: resource_id.to_string(),
            owner: entry.owner.clone(),
            note: entry.note.clone(),
            acquired_at: entry.acquired_at,
        }
    }
}

/// Stored form of a record; the resource id is the map key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct LockEntry {
    owner: String,
    note: String,
    acquired_at: DateTime<Utc>,
}

impl From<LockRecord> for LockEntry {
    fn from(record: LockRecord) -> Self {
        Self {
            owner: record.owner,
            note: record.note,
            acquired_at: record.acquired_at,
        }
    }
}

/// The full persisted lock state: resource id to current hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockTable {
    entries: BTreeMap<String, LockEntry>,
}

impl LockTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current hold on a resource, if any.
    pub fn get(&self, resource_id: &str) -> Option<LockRecord> {
        self.entries
            .get(resource_id)
            .map(|entry| LockRecord::from_entry(resource_id, entry))
    }

    /// Whether the resource is held.
    pub fn contains(&self, resource_id: &str) -> bool {
        self.entries.contains_key(resource_id)
    }

    /// Store a record, returning the hold it replaced.
    ///
    /// The registry only inserts into free slots; replacement exists for
    /// table maintenance and tests.
    pub fn insert(&mut self, record: LockRecord) -> Option<LockRecord> {
        let resource_id = record.resource_id.clone();
        self.entries
            .insert(resource_id.clone(), LockEntry::from(record))
            .map(|old| LockRecord::from_entry(&resource_id, &old))
    }

    /// Remove and return the hold on a resource.
    pub fn remove(&mut self, resource_id: &str) -> Option<LockRecord> {
        self.entries
            .remove(resource_id)
            .map(|entry| LockRecord::from_entry(resource_id, &entry))
    }

    /// All holds, sorted by resource id.
    pub fn records(&self) -> Vec<LockRecord> {
        self.entries
            .iter()
            .map(|(id, entry)| LockRecord::from_entry(id, entry))
            .collect()
    }

    /// Number of held resources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation() {
        let record = LockRecord::new("part001.mcam", "alice", "editing");

        assert_eq!(record.resource_id, "part001.mcam");
        assert_eq!(record.owner, "alice");
        assert_eq!(record.note, "editing");
        assert!(record.age().num_minutes() < 1);
    }

    #[test]
    fn test_record_age_string() {
        let mut record = LockRecord::new("part001.mcam", "alice", "editing");
        assert!(record.age_string().ends_with('m'));

        record.acquired_at = Utc::now() - Duration::hours(2);
        assert!(record.age_string().contains('h'));

        record.acquired_at = Utc::now() - Duration::days(3);
        assert!(record.age_string().contains('d'));
    }

    #[test]
    fn test_record_is_stale() {
        let mut record = LockRecord::new("part001.mcam", "alice", "editing");
        assert!(!record.is_stale(120));

        record.acquired_at = Utc::now() - Duration::minutes(150);
        assert!(record.is_stale(120));
    }

    #[test]
    fn test_table_insert_get_remove() {
        let mut table = LockTable::new();
        assert!(table.is_empty());

        assert!(table.insert(LockRecord::new("a.mcam", "alice", "x")).is_none());
        assert!(table.contains("a.mcam"));
        assert_eq!(table.get("a.mcam").unwrap().owner, "alice");
        assert_eq!(table.len(), 1);

        let removed = table.remove("a.mcam").unwrap();
        assert_eq!(removed.resource_id, "a.mcam");
        assert!(table.get("a.mcam").is_none());
        assert!(table.remove("a.mcam").is_none());
    }

    #[test]
    fn test_table_records_sorted() {
        let mut table = LockTable::new();
        table.insert(LockRecord::new("c.mcam", "carol", "x"));
        table.insert(LockRecord::new("a.mcam", "alice", "y"));
        table.insert(LockRecord::new("b.mcam", "bob", "z"));

        let ids: Vec<String> = table.records().into_iter().map(|r| r.resource_id).collect();
        assert_eq!(ids, vec!["a.mcam", "b.mcam", "c.mcam"]);
    }

    #[test]
    fn test_table_serializes_as_flat_map() {
        let mut table = LockTable::new();
        table.insert(LockRecord::new("part001.mcam", "alice", "editing"));

        let value = serde_json::to_value(&table).unwrap();
        let entry = &value["part001.mcam"];
        assert_eq!(entry["owner"], "alice");
        assert_eq!(entry["note"], "editing");
        assert!(entry["acquired_at"].is_string());
        assert!(entry.get("resource_id").is_none());
    }

    #[test]
    fn test_table_rejects_unknown_fields() {
        let json = r#"{"a.mcam": {"owner": "alice", "note": "x",
            "acquired_at": "2026-01-01T00:00:00Z", "counter": 3}}"#;
        assert!(serde_json::from_str::<LockTable>(json).is_err());
    }

    #[test]
    fn test_table_rejects_missing_fields() {
        let json = r#"{"a.mcam": {"user": "alice"}}"#;
        assert!(serde_json::from_str::<LockTable>(json).is_err());
    }
}
