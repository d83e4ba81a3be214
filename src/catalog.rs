//! Resource existence checks.
//!
//! The registry does not know what a resource is. Before a checkout it asks a
//! [`ResourceCatalog`] whether the id names something real; the default
//! [`AnyResource`] accepts everything, [`DirectoryCatalog`] accepts the
//! regular files of a repository directory.

use crate::error::{PdmError, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Answers whether a resource id names something that can be checked out.
pub trait ResourceCatalog: Send + Sync {
    /// Whether `resource_id` exists.
    fn contains(&self, resource_id: &str) -> Result<bool>;
}

/// Catalog that accepts every resource id.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyResource;

impl ResourceCatalog for AnyResource {
    fn contains(&self, _resource_id: &str) -> Result<bool> {
        Ok(true)
    }
}

/// A file in the repository directory, with its size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryFile {
    /// File name, used as the resource id.
    pub name: String,

    /// Size in bytes.
    pub size_bytes: u64,
}

/// Catalog backed by the files directly inside a repository directory.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
}

impl DirectoryCatalog {
    /// Create a catalog over `root`. The directory is not required to exist yet.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The repository directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All regular files in the repository, sorted by name.
    ///
    /// Hidden files (leading dot) are skipped.
    pub fn list(&self) -> Result<Vec<RepositoryFile>> {
        let unavailable = |source| PdmError::RepositoryUnavailable {
            path: self.root.clone(),
            source,
        };

        let entries = fs::read_dir(&self.root).map_err(unavailable)?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(unavailable)?;

            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }

            files.push(RepositoryFile {
                name,
                size_bytes: metadata.len(),
            });
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }
}

impl ResourceCatalog for DirectoryCatalog {
    fn contains(&self, resource_id: &str) -> Result<bool> {
        let mut components = Path::new(resource_id).components();
        let is_plain_name = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !is_plain_name {
            return Err(PdmError::InvalidInput(format!(
                "resource id '{}' must be a plain file name inside the repository",
                resource_id
            )));
        }

        Ok(self.root.join(resource_id).is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_repository() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("4200124.mcam"), vec![0u8; 12]).unwrap();
        fs::write(temp_dir.path().join("4806148.mcam"), b"part").unwrap();
        fs::write(temp_dir.path().join(".hidden"), b"x").unwrap();
        fs::create_dir(temp_dir.path().join("archive")).unwrap();
        temp_dir
    }

    #[test]
    fn test_any_resource_accepts_everything() {
        assert!(AnyResource.contains("whatever").unwrap());
    }

    #[test]
    fn test_directory_catalog_contains_files() {
        let repo = create_repository();
        let catalog = DirectoryCatalog::new(repo.path());

        assert!(catalog.contains("4200124.mcam").unwrap());
        assert!(!catalog.contains("missing.mcam").unwrap());
        assert!(!catalog.contains("archive").unwrap());
    }

    #[test]
    fn test_directory_catalog_rejects_paths() {
        let repo = create_repository();
        let catalog = DirectoryCatalog::new(repo.path());

        for bad in ["../etc/passwd", "archive/4200124.mcam", "/etc/passwd", ".."] {
            let result = catalog.contains(bad);
            assert!(
                matches!(result, Err(PdmError::InvalidInput(_))),
                "expected InvalidInput for {}",
                bad
            );
        }
    }

    #[test]
    fn test_directory_catalog_list() {
        let repo = create_repository();
        let catalog = DirectoryCatalog::new(repo.path());

        let files = catalog.list().unwrap();
        assert_eq!(
            files,
            vec![
                RepositoryFile {
                    name: "4200124.mcam".to_string(),
                    size_bytes: 12,
                },
                RepositoryFile {
                    name: "4806148.mcam".to_string(),
                    size_bytes: 4,
                },
            ]
        );
    }

    #[test]
    fn test_directory_catalog_list_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("gone");
        let catalog = DirectoryCatalog::new(&missing);

        let err = catalog.list().unwrap_err();
        match &err {
            PdmError::RepositoryUnavailable { path, source } => {
                assert_eq!(path, &missing);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected RepositoryUnavailable, got {:?}", other),
        }
        assert!(err.to_string().contains("gone"));
        assert_eq!(err.exit_code(), crate::exit_codes::STORE_FAILURE);
    }
}
