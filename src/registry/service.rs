//! Checkout, checkin, and release operations on a shared lock table.

use super::types::{LockInfo, RegistryLimits};
use super::validation::{validate_note, validate_owner, validate_resource_id};
use crate::catalog::{AnyResource, DirectoryCatalog, ResourceCatalog};
use crate::config::Config;
use crate::context::Namespace;
use crate::error::{PdmError, Result};
use crate::events::{AuditLog, Event, EventAction};
use crate::store::{LockRecord, LockTable, WaitPolicy, with_exclusive_access_wait};
use serde_json::json;
use std::path::{Path, PathBuf};

/// Registry of checked-out resources backed by one lock table file.
///
/// Every operation opens its own exclusive scope on the file, so any number
/// of registries (in this process or others) may point at the same path.
pub struct LockRegistry {
    table_path: PathBuf,
    wait_policy: WaitPolicy,
    limits: RegistryLimits,
    catalog: Box<dyn ResourceCatalog>,
    audit_log: Option<AuditLog>,
}

impl std::fmt::Debug for LockRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockRegistry")
            .field("table_path", &self.table_path)
            .field("wait_policy", &self.wait_policy)
            .field("limits", &self.limits)
            .field("audit_log", &self.audit_log)
            .finish_non_exhaustive()
    }
}

impl LockRegistry {
    /// Registry over the lock table at `table_path`, with default limits,
    /// blocking waits, no catalog checks, and no audit log.
    pub fn new<P: AsRef<Path>>(table_path: P) -> Self {
        Self {
            table_path: table_path.as_ref().to_path_buf(),
            wait_policy: WaitPolicy::default(),
            limits: RegistryLimits::default(),
            catalog: Box::new(AnyResource),
            audit_log: None,
        }
    }

    /// Build a registry for a namespace using its configuration.
    ///
    /// Wires the lock table path, wait policy, limits, audit log, and, when
    /// `repository_dir` is set, a [`DirectoryCatalog`] over that directory.
    pub fn from_namespace(ns: &Namespace, config: &Config) -> Result<Self> {
        config.validate()?;

        let mut registry = Self::new(ns.lock_table_path(config))
            .with_wait_policy(WaitPolicy::from_millis(config.lock_wait_ms))
            .with_limits(RegistryLimits::from(config));

        if let Some(repo) = ns.repository_dir(config) {
            registry = registry.with_catalog(DirectoryCatalog::new(repo));
        }

        if config.audit_log {
            registry = registry.with_audit_log(AuditLog::new(ns.events_path(config)));
        }

        Ok(registry)
    }

    /// Set how long operations wait for the table lock.
    pub fn with_wait_policy(mut self, policy: WaitPolicy) -> Self {
        self.wait_policy = policy;
        self
    }

    /// Set input limits and the staleness threshold.
    pub fn with_limits(mut self, limits: RegistryLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Check resource existence against `catalog` before checkout.
    pub fn with_catalog(mut self, catalog: impl ResourceCatalog + 'static) -> Self {
        self.catalog = Box::new(catalog);
        self
    }

    /// Append every transition to `log`.
    pub fn with_audit_log(mut self, log: AuditLog) -> Self {
        self.audit_log = Some(log);
        self
    }

    /// Path of the backing lock table.
    pub fn table_path(&self) -> &Path {
        &self.table_path
    }

    /// Current limits.
    pub fn limits(&self) -> &RegistryLimits {
        &self.limits
    }

    /// Check out `resource_id` for `owner`.
    ///
    /// Fails with [`PdmError::AlreadyLocked`] if anyone (including `owner`)
    /// already holds it. Of several concurrent callers exactly one succeeds.
    pub fn checkout(&self, resource_id: &str, owner: &str, note: &str) -> Result<LockRecord> {
        validate_resource_id(resource_id)?;
        validate_owner(owner, &self.limits)?;
        validate_note(note, &self.limits)?;

        if !self.catalog.contains(resource_id)? {
            return Err(PdmError::UnknownResource {
                resource_id: resource_id.to_string(),
            });
        }

        let record = self.with_table(|table| {
            if let Some(existing) = table.get(resource_id) {
                return Err(PdmError::AlreadyLocked {
                    resource_id: resource_id.to_string(),
                    held_by: existing.owner,
                    since: existing.acquired_at,
                });
            }

            let record = LockRecord::new(resource_id, owner, note);
            table.insert(record.clone());
            Ok(record)
        })?;

        self.audit(
            Event::new(EventAction::Checkout, owner)
                .with_resource(resource_id)
                .with_details(json!({ "note": note })),
        );

        tracing::info!(resource = %resource_id, owner = %owner, "checked out");
        Ok(record)
    }

    /// Check in `resource_id`, which must be held by exactly `owner`.
    ///
    /// Returns the record that was released.
    pub fn checkin(&self, resource_id: &str, owner: &str) -> Result<LockRecord> {
        validate_resource_id(resource_id)?;

        let released = self.with_table(|table| {
            let existing = table.get(resource_id).ok_or_else(|| PdmError::NotLocked {
                resource_id: resource_id.to_string(),
            })?;

            if existing.owner != owner {
                return Err(PdmError::NotOwner {
                    resource_id: resource_id.to_string(),
                    actual_owner: existing.owner,
                });
            }

            table.remove(resource_id);
            Ok(existing)
        })?;

        self.audit(
            Event::new(EventAction::Checkin, owner)
                .with_resource(resource_id)
                .with_details(json!({ "held_since": released.acquired_at })),
        );

        tracing::info!(resource = %resource_id, owner = %owner, "checked in");
        Ok(released)
    }

    /// Release `resource_id` regardless of who holds it.
    ///
    /// The caller is responsible for deciding that `acting_as` may do this.
    pub fn force_release(&self, resource_id: &str, acting_as: &str) -> Result<LockRecord> {
        validate_resource_id(resource_id)?;

        let released = self.with_table(|table| {
            table.remove(resource_id).ok_or_else(|| PdmError::NotLocked {
                resource_id: resource_id.to_string(),
            })
        })?;

        self.audit(
            Event::new(EventAction::ForceRelease, acting_as)
                .with_resource(resource_id)
                .with_details(json!({
                    "previous_owner": released.owner,
                    "held_since": released.acquired_at,
                    "note": released.note,
                })),
        );

        tracing::info!(
            resource = %resource_id,
            acting_as = %acting_as,
            previous_owner = %released.owner,
            "force released"
        );
        Ok(released)
    }

    /// Current hold on `resource_id`, if any.
    pub fn lookup(&self, resource_id: &str) -> Result<Option<LockRecord>> {
        validate_resource_id(resource_id)?;
        self.with_table(|table| Ok(table.get(resource_id)))
    }

    /// Whether `resource_id` is currently checked out.
    pub fn is_locked(&self, resource_id: &str) -> Result<bool> {
        validate_resource_id(resource_id)?;
        self.with_table(|table| Ok(table.contains(resource_id)))
    }

    /// Every current hold, sorted by resource id, with its stale flag.
    pub fn list(&self) -> Result<Vec<LockInfo>> {
        let stale_minutes = self.limits.stale_minutes;
        let records = self.with_table(|table| Ok(table.records()))?;

        Ok(records
            .into_iter()
            .map(|record| {
                let is_stale = record.is_stale(stale_minutes);
                LockInfo { record, is_stale }
            })
            .collect())
    }

    fn with_table<R>(&self, f: impl FnOnce(&mut LockTable) -> Result<R>) -> Result<R> {
        with_exclusive_access_wait(&self.table_path, self.wait_policy, f)
    }

    /// Record a transition once its table write has been committed.
    fn audit(&self, event: Event) {
        if let Some(log) = &self.audit_log {
            log.record(&event);
        }
    }
}
