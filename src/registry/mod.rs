//! Lock registry: checkout and checkin of shared resources.
//!
//! Each resource is either free or held by exactly one owner. Transitions:
//!
//! - `checkout`: free -> held (fails with `AlreadyLocked` when held)
//! - `checkin`: held -> free, by the holder only (`NotOwner` otherwise)
//! - `force_release`: held -> free, by anyone the caller trusts
//!
//! Each check-then-act runs inside a single exclusive scope on the lock
//! table, so concurrent callers across threads and processes see a linear
//! history. A transition is appended to the audit log only after its table
//! write has been committed. Abandoned holds never expire on their own; `list` flags them as
//! stale after `stale_minutes`.

mod service;
mod types;
mod validation;


// Re-export public API
pub use service::LockRegistry;
pub use types::{LockInfo, RegistryLimits};
pub use validation::{validate_note, validate_owner, validate_resource_id};
