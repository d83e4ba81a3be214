//! Exclusive record store.
//!
//! Serializes the read-modify-write cycle on a shared record file across
//! threads and processes. Every access goes through an [`ExclusiveAccess`]
//! handle:
//!
//! 1. take an OS advisory exclusive lock (flock / LockFileEx via fs2) on
//!    the sidecar `<name>.lock`, creating it if absent
//! 2. read and parse the whole record file (missing means empty)
//! 3. let the caller mutate the in-memory state
//! 4. write a synced temp file, rename it over the record, unlock
//!
//! Step 4 runs on every exit path, including a failing or panicking caller.
//! The file is never read or written outside such a scope, and a failed
//! write leaves the previous content in place.
//!
//! ```no_run
//! use pdmlock::store::{LockTable, with_exclusive_access};
//!
//! let held = with_exclusive_access("locks.json", |table: &mut LockTable| Ok(table.len()))?;
//! # Ok::<(), pdmlock::error::PdmError>(())
//! ```

mod guard;
mod table;
mod wait;


// Re-export public API
pub use guard::{ExclusiveAccess, StoredState, lock_path_for};
pub use table::{LockRecord, LockTable};
pub use wait::WaitPolicy;

use crate::error::Result;
use std::path::Path;

/// Run `f` against the state in `path` while holding the exclusive lock,
/// blocking until the lock is granted.
pub fn with_exclusive_access<T, R, F>(path: impl AsRef<Path>, f: F) -> Result<R>
where
    T: StoredState,
    F: FnOnce(&mut T) -> Result<R>,
{
    with_exclusive_access_wait(path, WaitPolicy::Block, f)
}

/// Like [`with_exclusive_access`], with an explicit wait policy.
///
/// The state is written back whether or not `f` succeeds. If `f` fails its
/// error wins; otherwise a commit failure is returned in place of `f`'s value.
pub fn with_exclusive_access_wait<T, R, F>(
    path: impl AsRef<Path>,
    policy: WaitPolicy,
    f: F,
) -> Result<R>
where
    T: StoredState,
    F: FnOnce(&mut T) -> Result<R>,
{
    let mut access = ExclusiveAccess::<T>::acquire(path, policy)?;
    let outcome = f(&mut *access);
    let path = access.path().to_path_buf();
    let committed = access.commit();

    match (outcome, committed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(commit_err)) => Err(commit_err),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(commit_err)) => {
            tracing::warn!(
                path = %path.display(),
                error = %commit_err,
                "commit failed after operation error"
            );
            Err(e)
        }
    }
}
