use crate::context::Namespace;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// Create an initialized, empty namespace in a temporary directory.
pub(crate) fn create_test_namespace() -> (TempDir, Namespace) {
    let temp_dir = TempDir::new().unwrap();
    let ns = Namespace::at(temp_dir.path().join("ns"));
    std::fs::create_dir_all(&ns.root).unwrap();
    (temp_dir, ns)
}

/// Create a namespace whose config points at a repository directory
/// holding the given part files.
pub(crate) fn create_test_namespace_with_repository(parts: &[&str]) -> (TempDir, Namespace) {
    let (temp_dir, ns) = create_test_namespace();

    let repo = temp_dir.path().join("repo");
    std::fs::create_dir_all(&repo).unwrap();
    for part in parts {
        std::fs::write(repo.join(part), format!("part data for {}\n", part)).unwrap();
    }

    std::fs::write(
        ns.config_path(),
        format!("repository_dir: {}\n", repo.display()),
    )
    .unwrap();

    (temp_dir, ns)
}
