//! How long an acquirer waits for the exclusive lock.

use crate::error::{PdmError, Result};
use fs2::FileExt;
use std::fs::File;
use std::io;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

/// Backoff between try_lock attempts under [`WaitPolicy::Timeout`].
const POLL_INTERVAL_MS: u64 = 50;

/// Waiting behavior when the lock table is held by someone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitPolicy {
    /// Block the calling thread until the lock is granted.
    #[default]
    Block,
    /// Fail immediately with `StoreBusy` if the lock is held.
    NoWait,
    /// Poll until the deadline, then fail with `StoreBusy`.
    Timeout(Duration),
}

impl WaitPolicy {
    /// Build a policy from an optional millisecond budget.
    ///
    /// `None` blocks, `Some(0)` does not wait, anything else polls.
    pub fn from_millis(wait_ms: Option<u64>) -> Self {
        match wait_ms {
            None => WaitPolicy::Block,
            Some(0) => WaitPolicy::NoWait,
            Some(ms) => WaitPolicy::Timeout(Duration::from_millis(ms)),
        }
    }
}

/// Take the exclusive lock on `file` according to `policy`.
///
/// When this returns an error the lock was never granted.
pub(super) fn lock_exclusive(file: &File, path: &Path, policy: WaitPolicy) -> Result<()> {
    match policy {
        WaitPolicy::Block => {
            file.lock_exclusive()
                .map_err(|source| PdmError::StoreUnavailable {
                    path: path.to_path_buf(),
                    source,
                })
        }
        WaitPolicy::NoWait => match file.try_lock_exclusive() {
            Ok(()) => Ok(()),
            Err(e) if is_contended(&e) => Err(PdmError::StoreBusy {
                path: path.to_path_buf(),
                waited_ms: 0,
            }),
            Err(source) => Err(PdmError::StoreUnavailable {
                path: path.to_path_buf(),
                source,
            }),
        },
        WaitPolicy::Timeout(timeout) => {
            let started = Instant::now();
            let deadline = started + timeout;
            let poll = Duration::from_millis(POLL_INTERVAL_MS);

            loop {
                match file.try_lock_exclusive() {
                    Ok(()) => return Ok(()),
                    Err(e) if is_contended(&e) => {
                        let now = Instant::now();
                        if now >= deadline {
                            return Err(PdmError::StoreBusy {
                                path: path.to_path_buf(),
                                waited_ms: started.elapsed().as_millis() as u64,
                            });
                        }
                        thread::sleep(poll.min(deadline - now));
                    }
                    Err(source) => {
                        return Err(PdmError::StoreUnavailable {
                            path: path.to_path_buf(),
                            source,
                        });
                    }
                }
            }
        }
    }
}

/// fs2 reports contention as WouldBlock on most platforms, but the raw
/// OS code is the reliable signal.
fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_millis() {
        assert_eq!(WaitPolicy::from_millis(None), WaitPolicy::Block);
        assert_eq!(WaitPolicy::from_millis(Some(0)), WaitPolicy::NoWait);
        assert_eq!(
            WaitPolicy::from_millis(Some(1500)),
            WaitPolicy::Timeout(Duration::from_millis(1500))
        );
    }

    #[test]
    fn test_default_blocks() {
        assert_eq!(WaitPolicy::default(), WaitPolicy::Block);
    }

    #[test]
    fn test_contended_error_is_recognized() {
        assert!(is_contended(&fs2::lock_contended_error()));
        assert!(!is_contended(&io::Error::new(
            io::ErrorKind::PermissionDenied,
            "denied"
        )));
    }
}
