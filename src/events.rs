//! Audit log of lock transitions.
//!
//! Events are stored in NDJSON format (one JSON object per line) in
//! `<namespace>/events.ndjson`.
//!
//! # Event Format
//!
//! Each event is a JSON object with the following fields:
//! - `ts`: RFC3339 timestamp
//! - `action`: The transition performed (init, checkout, checkin, force_release)
//! - `actor`: Who performed it (the owner, or the administrator for force_release)
//! - `resource`: Optional resource id
//! - `details`: Freeform object with action-specific details
//!
//! The registry appends an event only after the transition's table write has
//! been committed, so a failed write never shows up in the log.

use crate::error::{PdmError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Namespace initialization
    Init,
    /// Resource checked out (Free -> Held)
    Checkout,
    /// Resource checked in by its owner (Held -> Free)
    Checkin,
    /// Resource released by an administrator (Held -> Free)
    ForceRelease,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Init => write!(f, "init"),
            EventAction::Checkout => write!(f, "checkout"),
            EventAction::Checkin => write!(f, "checkin"),
            EventAction::ForceRelease => write!(f, "force_release"),
        }
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// Who performed the action.
    pub actor: String,

    /// Resource the action applied to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event stamped with the current time.
    pub fn new(action: EventAction, actor: impl Into<String>) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: actor.into(),
            resource: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the resource for this event.
    pub fn with_resource(mut self, resource_id: impl Into<String>) -> Self {
        self.resource = Some(resource_id.into());
        self
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| PdmError::InvalidInput(format!("failed to serialize event to JSON: {}", e)))
    }
}

/// Append-only NDJSON event file.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    /// Audit log stored at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the events file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an event as one line, creating the file if needed.
    pub fn append(&self, event: &Event) -> Result<()> {
        let mut json_line = event.to_ndjson_line()?;
        json_line.push('\n');

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                PdmError::Config(format!(
                    "failed to create events directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                PdmError::Config(format!(
                    "failed to open events file '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;

        // One write per event keeps concurrent appenders from interleaving.
        file.write_all(json_line.as_bytes()).map_err(|e| {
            PdmError::Config(format!(
                "failed to write event to '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        file.sync_all().map_err(|e| {
            PdmError::Config(format!(
                "failed to sync events file '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Append an event, logging instead of failing.
    ///
    /// Lock transitions are already committed by the time they are audited,
    /// so an unwritable log must not turn a success into an error.
    pub fn record(&self, event: &Event) {
        if let Err(e) = self.append(event) {
            tracing::warn!(
                path = %self.path.display(),
                action = %event.action,
                error = %e,
                "failed to append audit event"
            );
        }
    }

    /// Read every event in the log, oldest first.
    ///
    /// A missing file reads as an empty log.
    pub fn read_all(&self) -> Result<Vec<Event>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            PdmError::Config(format!(
                "failed to read events file '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(i, line)| {
                serde_json::from_str(line).map_err(|e| {
                    PdmError::Config(format!(
                        "failed to parse event on line {} of '{}': {}",
                        i + 1,
                        self.path.display(),
                        e
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_event_creation() {
        let event = Event::new(EventAction::Init, "alice");

        assert_eq!(event.action, EventAction::Init);
        assert_eq!(event.actor, "alice");
        assert!(event.resource.is_none());
        let age = Utc::now().signed_duration_since(event.ts);
        assert!(age.num_minutes() < 1);
    }

    #[test]
    fn test_event_with_resource_and_details() {
        let event = Event::new(EventAction::Checkout, "alice")
            .with_resource("part001.mcam")
            .with_details(json!({"note": "editing"}));

        assert_eq!(event.resource, Some("part001.mcam".to_string()));
        assert_eq!(event.details["note"], "editing");
    }

    #[test]
    fn test_event_serialization_is_single_line() {
        let event = Event::new(EventAction::ForceRelease, "admin")
            .with_resource("part001.mcam")
            .with_details(json!({"previous_owner": "alice"}));

        let line = event.to_ndjson_line().unwrap();
        assert!(!line.contains('\n'));
        assert!(line.contains("\"action\":\"force_release\""));
    }

    #[test]
    fn test_action_display() {
        assert_eq!(EventAction::Init.to_string(), "init");
        assert_eq!(EventAction::Checkout.to_string(), "checkout");
        assert_eq!(EventAction::Checkin.to_string(), "checkin");
        assert_eq!(EventAction::ForceRelease.to_string(), "force_release");
    }

    #[test]
    fn test_append_and_read_back() {
        let temp_dir = TempDir::new().unwrap();
        let log = AuditLog::new(temp_dir.path().join("events.ndjson"));

        log.append(&Event::new(EventAction::Checkout, "alice").with_resource("a.mcam"))
            .unwrap();
        log.append(&Event::new(EventAction::Checkin, "alice").with_resource("a.mcam"))
            .unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        assert_eq!(content.lines().count(), 2);

        let events = log.read_all().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, EventAction::Checkout);
        assert_eq!(events[1].action, EventAction::Checkin);
    }

    #[test]
    fn test_append_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log = AuditLog::new(temp_dir.path().join("nested").join("events.ndjson"));

        log.append(&Event::new(EventAction::Init, "alice")).unwrap();
        assert!(log.path().exists());
    }

    #[test]
    fn test_read_missing_log_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let log = AuditLog::new(temp_dir.path().join("events.ndjson"));
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_record_swallows_write_failure() {
        let temp_dir = TempDir::new().unwrap();
        // A directory where the file should be makes every append fail.
        let path = temp_dir.path().join("events.ndjson");
        fs::create_dir(&path).unwrap();
        let log = AuditLog::new(&path);

        assert!(log.append(&Event::new(EventAction::Init, "alice")).is_err());
        log.record(&Event::new(EventAction::Init, "alice"));
    }
}
