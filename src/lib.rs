//! pdmlock: checkout/checkin locks for files in a shared parts repository.
//!
//! Holds are recorded in a JSON lock table next to the repository. Every
//! read and write of that table happens under an OS advisory lock on the
//! file itself, so any number of threads and processes on any number of
//! machines sharing the directory see one consistent history.
//!
//! ```no_run
//! use pdmlock::registry::LockRegistry;
//!
//! let registry = LockRegistry::new(".pdmlock/locks.json");
//! let record = registry.checkout("part001.mcam", "alice", "editing toolpaths")?;
//! println!("{} held by {}", record.resource_id, record.owner);
//! registry.checkin("part001.mcam", "alice")?;
//! # Ok::<(), pdmlock::error::PdmError>(())
//! ```

pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod fs;
pub mod registry;
pub mod store;

#[cfg(test)]
mod test_support;
