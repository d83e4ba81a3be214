//! Exit code constants for the pdmlock CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, nothing to check in, unknown resource)
//! - 2: Conflict (resource already checked out)
//! - 3: Forbidden (not the lock owner, missing --force)
//! - 4: Store failure (lock table unavailable, corrupt, or busy)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid state, or unknown resource.
pub const USER_ERROR: i32 = 1;

/// Conflict: the resource is checked out by someone else.
pub const CONFLICT: i32 = 2;

/// Forbidden: the caller does not own the lock or lacks the override flag.
pub const FORBIDDEN: i32 = 3;

/// Store failure: the lock table could not be opened, parsed, locked, or written.
pub const STORE_FAILURE: i32 = 4;
