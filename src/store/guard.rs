//! RAII handle over an exclusively locked record file.

use super::wait::{self, WaitPolicy};
use crate::error::{PdmError, Result};
use crate::fs::replace_file;
use fs2::FileExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

/// State that can live in a record file.
///
/// A missing or blank file reads as `Default::default()`.
pub trait StoredState: Serialize + DeserializeOwned + Default {}

impl<T: Serialize + DeserializeOwned + Default> StoredState for T {}

/// Path of the lock file guarding `path`: the same name with `.lock` appended.
pub fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("record"));
    name.push(".lock");
    path.with_file_name(name)
}

/// Exclusive, scoped access to the state held in one record file.
///
/// Constructing the handle takes an OS advisory exclusive lock on the
/// record's sidecar lock file (`<name>.lock`), then parses the record.
/// Committing (explicitly, or implicitly on drop) replaces the record file
/// atomically and releases the lock. The record itself is never opened for
/// writing in place, so a failed commit leaves the previous content intact.
#[derive(Debug)]
pub struct ExclusiveAccess<T: StoredState> {
    /// Path to the record file.
    path: PathBuf,

    /// Locked sidecar descriptor; `None` once committed.
    lock: Option<File>,

    /// In-memory state, written back on commit.
    state: T,
}

impl<T: StoredState> ExclusiveAccess<T> {
    /// Lock the record file, then read its state.
    ///
    /// # Errors
    ///
    /// * `StoreUnavailable` - the lock file cannot be opened or locked, or
    ///   the record cannot be read
    /// * `StoreBusy` - the lock was not granted under a non-blocking policy
    /// * `CorruptState` - the existing content does not parse; the file is
    ///   left as it was and the lock is released
    pub fn acquire<P: AsRef<Path>>(path: P, policy: WaitPolicy) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let lock_path = lock_path_for(&path);

        let lock = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|source| PdmError::StoreUnavailable {
                path: lock_path.clone(),
                source,
            })?;

        wait::lock_exclusive(&lock, &lock_path, policy)?;
        tracing::debug!(path = %path.display(), "acquired exclusive lock");

        let state = match read_state(&path) {
            Ok(state) => state,
            Err(e) => {
                release(&lock, &path);
                return Err(e);
            }
        };

        Ok(Self {
            path,
            lock: Some(lock),
            state,
        })
    }

    /// Path of the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the state back and release the lock.
    ///
    /// The lock is released even when writing fails; the write error is
    /// returned so the caller never mistakes a lost mutation for a success.
    pub fn commit(mut self) -> Result<()> {
        self.finish()
    }

    fn finish(&mut self) -> Result<()> {
        let Some(lock) = self.lock.take() else {
            return Ok(());
        };

        let written = write_state(&self.path, &self.state).map_err(|source| {
            PdmError::StoreWrite {
                path: self.path.clone(),
                source,
            }
        });

        release(&lock, &self.path);
        drop(lock);

        if written.is_ok() {
            tracing::debug!(path = %self.path.display(), "committed and released exclusive lock");
        }
        written
    }
}

impl<T: StoredState> Deref for ExclusiveAccess<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.state
    }
}

impl<T: StoredState> DerefMut for ExclusiveAccess<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.state
    }
}

impl<T: StoredState> Drop for ExclusiveAccess<T> {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to commit record file on drop");
        }
    }
}

/// Unlock explicitly; closing the descriptor afterwards releases it regardless.
fn release(lock: &File, path: &Path) {
    if let Err(e) = FileExt::unlock(lock) {
        tracing::warn!(path = %path.display(), error = %e, "failed to unlock record file; closing it instead");
    }
}

fn read_state<T: StoredState>(path: &Path) -> Result<T> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            return Err(PdmError::CorruptState {
                path: path.to_path_buf(),
                reason: "content is not valid UTF-8".to_string(),
            });
        }
        Err(source) => {
            return Err(PdmError::StoreUnavailable {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if content.trim().is_empty() {
        return Ok(T::default());
    }

    serde_json::from_str(&content).map_err(|e| PdmError::CorruptState {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Serialize first so a serialization failure never reaches the disk.
fn write_state<T: StoredState>(path: &Path, state: &T) -> io::Result<()> {
    let mut bytes = serde_json::to_vec_pretty(state)?;
    bytes.push(b'\n');
    replace_file(path, &bytes)
}
