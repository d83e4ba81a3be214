//! Implementation of the `pdmlock release` command.
//!
//! Administrative override for holds whose owner is gone. Requires
//! `--force`; the releasing actor is recorded in the audit log.

use super::{format_time, get_owner_string, open_registry};
use crate::cli::ReleaseArgs;
use pdmlock::error::{PdmError, Result};
use std::path::Path;

/// Execute the `pdmlock release` command.
pub fn cmd_release(dir: Option<&Path>, args: ReleaseArgs) -> Result<()> {
    if !args.force {
        return Err(PdmError::PrivilegeRequired(format!(
            "refusing to release '{}' without --force flag.\n\n\
             Releasing a hold lets others edit a file its owner may still have open.\n\
             Only release it if you are certain the owner is done or gone.\n\n\
             To release it, run:\n  pdmlock release {} --force",
            args.resource, args.resource
        )));
    }

    let (_ns, _config, registry) = open_registry(dir)?;

    let acting_as = args.acting_as.unwrap_or_else(get_owner_string);
    let record = registry.force_release(&args.resource, &acting_as)?;

    println!("Released {}", record.resource_id);
    println!("  Was held by: {}", record.owner);
    println!("  Since:       {}", format_time(&record.acquired_at));
    println!("  Note:        {}", record.note);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_helpers::init_namespace;
    use pdmlock::events::{AuditLog, EventAction};
    use pdmlock::registry::LockRegistry;

    fn release_args(force: bool) -> ReleaseArgs {
        ReleaseArgs {
            resource: "part001.mcam".to_string(),
            force,
            acting_as: Some("admin".to_string()),
        }
    }

    #[test]
    fn test_release_requires_force() {
        let (_temp_dir, dir) = init_namespace();
        let registry = LockRegistry::new(dir.join("locks.json"));
        registry.checkout("part001.mcam", "alice", "editing").unwrap();

        let err = cmd_release(Some(&dir), release_args(false)).unwrap_err();
        assert!(matches!(err, PdmError::PrivilegeRequired(_)));
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("--force"));
        assert!(registry.is_locked("part001.mcam").unwrap());
    }

    #[test]
    fn test_release_with_force() {
        let (_temp_dir, dir) = init_namespace();
        let registry = LockRegistry::new(dir.join("locks.json"));
        registry.checkout("part001.mcam", "alice", "editing").unwrap();

        cmd_release(Some(&dir), release_args(true)).unwrap();
        assert!(!registry.is_locked("part001.mcam").unwrap());

        let events = AuditLog::new(dir.join("events.ndjson")).read_all().unwrap();
        let last = events.last().unwrap();
        assert_eq!(last.action, EventAction::ForceRelease);
        assert_eq!(last.actor, "admin");
    }

    #[test]
    fn test_release_free_resource() {
        let (_temp_dir, dir) = init_namespace();
        let err = cmd_release(Some(&dir), release_args(true)).unwrap_err();
        assert!(matches!(err, PdmError::NotLocked { .. }));
    }
}
