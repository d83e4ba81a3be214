//! Atomic file replacement.
//!
//! Content is written to a sibling temporary file, synced, and renamed over
//! the target. Readers see either the old file or the new one, never a
//! partial write. A failed write leaves the target as it was.
//!
//! The lock table is committed through [`replace_file`] while its sidecar
//! lock is held; `pdmlock.yaml` goes through [`atomic_write`].

use crate::error::{PdmError, Result};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Atomically write bytes to `path`, creating parent directories as needed.
///
/// ```no_run
/// use pdmlock::fs::atomic_write;
///
/// atomic_write("pdmlock.yaml", b"lock_file: locks.json\n")?;
/// # Ok::<(), pdmlock::error::PdmError>(())
/// ```
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            PdmError::Config(format!(
                "failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    replace_file(path, content).map_err(|e| {
        PdmError::Config(format!(
            "failed to atomically replace '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Atomically write a string to `path`.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Replace `path` with `content` via a synced temp file and a rename.
///
/// The parent directory must exist. On error the temp file is removed and
/// `path` is untouched.
pub(crate) fn replace_file(path: &Path, content: &[u8]) -> io::Result<()> {
    let temp_path = temp_path_for(path)?;

    let written = write_and_sync(&temp_path, content).and_then(|()| fs::rename(&temp_path, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    // Persist the directory entry as well. Opening a directory fails on Windows.
    if let Some(parent) = path.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }

    Ok(())
}

/// Temporary sibling path, unique per process so concurrent writers do not
/// share a temp file.
pub(crate) fn temp_path_for(target: &Path) -> io::Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid file path '{}'", target.display()),
            )
        })?;

    Ok(parent.join(format!(".{}.{}.tmp", filename, std::process::id())))
}

fn write_and_sync(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}
