//! Config loading, validation, and utility operations.

use super::model::Config;
use super::types::CONFIG_FILE_NAME;
use crate::error::{PdmError, Result};
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the pdmlock.yaml file
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(PdmError::Config)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            PdmError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from a YAML file, falling back to defaults if it is absent.
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file means all defaults.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| PdmError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| PdmError::Config(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `lock_file` and `events_file` must be non-empty plain file names
    /// - `lock_stale_minutes` must be positive
    /// - `min_owner_len` must be positive
    /// - `max_note_len` must be positive
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [("lock_file", &self.lock_file), ("events_file", &self.events_file)] {
            if value.trim().is_empty() {
                return Err(PdmError::Config(format!(
                    "config validation failed: {} must be non-empty",
                    key
                )));
            }
            if value.contains('/') || value.contains('\\') {
                return Err(PdmError::Config(format!(
                    "config validation failed: {} must be a file name, not a path (found '{}')",
                    key, value
                )));
            }
            if value == "." || value == ".." {
                return Err(PdmError::Config(format!(
                    "config validation failed: {} must name a file (found '{}')",
                    key, value
                )));
            }
        }

        let sidecar = format!("{}.lock", self.lock_file);
        for (key, value) in [("lock_file", &self.lock_file), ("events_file", &self.events_file)] {
            if value == CONFIG_FILE_NAME {
                return Err(PdmError::Config(format!(
                    "config validation failed: {} must not be '{}'",
                    key, CONFIG_FILE_NAME
                )));
            }
        }
        if self.events_file == self.lock_file || self.events_file == sidecar {
            return Err(PdmError::Config(format!(
                "config validation failed: events_file '{}' collides with the lock table",
                self.events_file
            )));
        }

        if self.lock_stale_minutes == 0 {
            return Err(PdmError::Config(
                "config validation failed: lock_stale_minutes must be greater than 0".to_string(),
            ));
        }

        if self.min_owner_len == 0 {
            return Err(PdmError::Config(
                "config validation failed: min_owner_len must be greater than 0".to_string(),
            ));
        }

        if self.max_note_len == 0 {
            return Err(PdmError::Config(
                "config validation failed: max_note_len must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
