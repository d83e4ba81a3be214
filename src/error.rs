//! Error types for pdmlock.
//!
//! Uses thiserror for derive macros. Every operation in the crate returns
//! [`PdmError`]; callers sort variants into conflict, state, and
//! infrastructure failures through [`PdmError::class`].

use crate::exit_codes;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pdmlock operations.
#[derive(Error, Debug)]
pub enum PdmError {
    /// The resource is already checked out.
    #[error("'{resource_id}' is already checked out by {held_by} since {}", since.format("%Y-%m-%d %H:%M:%S UTC"))]
    AlreadyLocked {
        resource_id: String,
        held_by: String,
        since: DateTime<Utc>,
    },

    /// Checkin attempted by someone other than the holder.
    #[error("'{resource_id}' is checked out by {actual_owner}, not by the caller")]
    NotOwner {
        resource_id: String,
        actual_owner: String,
    },

    /// An administrative override was requested without the required privilege.
    #[error("{0}")]
    PrivilegeRequired(String),

    /// Checkin or release of a resource that is not checked out.
    #[error("'{resource_id}' is not checked out")]
    NotLocked { resource_id: String },

    /// The resource catalog does not know the resource.
    #[error("resource '{resource_id}' does not exist")]
    UnknownResource { resource_id: String },

    /// Caller input failed validation.
    #[error("{0}")]
    InvalidInput(String),

    /// Configuration could not be read or is invalid.
    #[error("{0}")]
    Config(String),

    /// The backing file could not be opened, created, or locked.
    #[error("lock table '{}' is unavailable: {source}", path.display())]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but does not hold a valid table.
    #[error("lock table '{}' is corrupt: {reason}", path.display())]
    CorruptState { path: PathBuf, reason: String },

    /// Writing the table back failed after the lock was taken.
    #[error("failed to write lock table '{}': {source}", path.display())]
    StoreWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The repository directory could not be read.
    #[error("repository directory '{}' is unavailable: {source}", path.display())]
    RepositoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The exclusive lock was not obtained within the configured wait.
    #[error("lock table '{}' is busy (gave up after {waited_ms} ms)", path.display())]
    StoreBusy { path: PathBuf, waited_ms: u64 },
}

/// Broad category of a [`PdmError`], used to pick a presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Expected business outcome: the transition is currently disallowed.
    Conflict,
    /// The caller is not allowed to perform the transition.
    Forbidden,
    /// The caller asked for something that makes no sense in the current state.
    BadRequest,
    /// The resource is not part of the repository.
    NotFound,
    /// The backing store is broken or unreachable.
    Infrastructure,
}

impl PdmError {
    /// Classify this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            PdmError::AlreadyLocked { .. } => ErrorClass::Conflict,
            PdmError::NotOwner { .. } | PdmError::PrivilegeRequired(_) => ErrorClass::Forbidden,
            PdmError::NotLocked { .. } | PdmError::InvalidInput(_) | PdmError::Config(_) => {
                ErrorClass::BadRequest
            }
            PdmError::UnknownResource { .. } => ErrorClass::NotFound,
            PdmError::StoreUnavailable { .. }
            | PdmError::CorruptState { .. }
            | PdmError::StoreWrite { .. }
            | PdmError::StoreBusy { .. }
            | PdmError::RepositoryUnavailable { .. } => ErrorClass::Infrastructure,
        }
    }

    /// True for the expected "someone else holds it" outcome.
    pub fn is_conflict(&self) -> bool {
        self.class() == ErrorClass::Conflict
    }

    /// HTTP status an outer web layer would map this error to.
    pub fn http_status(&self) -> u16 {
        match self.class() {
            ErrorClass::Conflict => 409,
            ErrorClass::Forbidden => 403,
            ErrorClass::BadRequest => 400,
            ErrorClass::NotFound => 404,
            ErrorClass::Infrastructure => match self {
                PdmError::StoreBusy { .. } => 503,
                _ => 500,
            },
        }
    }

    /// Returns the appropriate process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self.class() {
            ErrorClass::Conflict => exit_codes::CONFLICT,
            ErrorClass::Forbidden => exit_codes::FORBIDDEN,
            ErrorClass::BadRequest | ErrorClass::NotFound => exit_codes::USER_ERROR,
            ErrorClass::Infrastructure => exit_codes::STORE_FAILURE,
        }
    }
}

/// Result type alias for pdmlock operations.
pub type Result<T> = std::result::Result<T, PdmError>;
