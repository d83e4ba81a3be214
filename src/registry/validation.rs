//! Input validation for registry operations.

use super::types::RegistryLimits;
use crate::error::{PdmError, Result};

/// Validate a resource id: non-empty, no surrounding whitespace, no control characters.
pub fn validate_resource_id(resource_id: &str) -> Result<()> {
    if resource_id.is_empty() {
        return Err(PdmError::InvalidInput(
            "resource id is required".to_string(),
        ));
    }

    if resource_id.trim() != resource_id {
        return Err(PdmError::InvalidInput(format!(
            "resource id '{}' must not start or end with whitespace",
            resource_id
        )));
    }

    if resource_id.chars().any(char::is_control) {
        return Err(PdmError::InvalidInput(
            "resource id must not contain control characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate an owner name against the configured minimum length.
pub fn validate_owner(owner: &str, limits: &RegistryLimits) -> Result<()> {
    let trimmed = owner.trim();
    if trimmed.is_empty() {
        return Err(PdmError::InvalidInput("owner is required".to_string()));
    }

    if trimmed.chars().count() < limits.min_owner_len {
        return Err(PdmError::InvalidInput(format!(
            "owner '{}' is too short (minimum {} characters)",
            owner, limits.min_owner_len
        )));
    }

    Ok(())
}

/// Validate a checkout note: non-blank, at most `max_note_len` characters.
pub fn validate_note(note: &str, limits: &RegistryLimits) -> Result<()> {
    if note.trim().is_empty() {
        return Err(PdmError::InvalidInput(
            "a note describing the checkout is required".to_string(),
        ));
    }

    let len = note.chars().count();
    if len > limits.max_note_len {
        return Err(PdmError::InvalidInput(format!(
            "note is too long ({} characters, maximum {})",
            len, limits.max_note_len
        )));
    }

    Ok(())
}
