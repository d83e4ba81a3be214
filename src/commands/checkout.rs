//! Implementation of the `pdmlock checkout` command.

use super::{format_time, get_owner_string, open_registry};
use crate::cli::CheckoutArgs;
use pdmlock::error::Result;
use pdmlock::store::WaitPolicy;
use std::path::Path;

/// Execute the `pdmlock checkout` command.
///
/// `--no-wait` and `--wait-ms` override `lock_wait_ms` from the config.
pub fn cmd_checkout(dir: Option<&Path>, args: CheckoutArgs) -> Result<()> {
    let (_ns, _config, mut registry) = open_registry(dir)?;

    if args.no_wait {
        registry = registry.with_wait_policy(WaitPolicy::NoWait);
    } else if args.wait_ms.is_some() {
        registry = registry.with_wait_policy(WaitPolicy::from_millis(args.wait_ms));
    }

    let owner = args.owner.unwrap_or_else(get_owner_string);
    let record = registry.checkout(&args.resource, &owner, &args.note)?;

    println!("Checked out {}", record.resource_id);
    println!("  Owner:      {}", record.owner);
    println!("  Since:      {}", format_time(&record.acquired_at));
    println!("  Note:       {}", record.note);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_helpers::init_namespace;
    use pdmlock::error::PdmError;
    use pdmlock::registry::LockRegistry;

    fn args(resource: &str, owner: &str, note: &str) -> CheckoutArgs {
        CheckoutArgs {
            resource: resource.to_string(),
            owner: Some(owner.to_string()),
            note: note.to_string(),
            no_wait: false,
            wait_ms: None,
        }
    }

    #[test]
    fn test_checkout_records_owner_and_note() {
        let (_temp_dir, dir) = init_namespace();

        cmd_checkout(Some(&dir), args("part001.mcam", "alice", "editing")).unwrap();

        let record = LockRegistry::new(dir.join("locks.json"))
            .lookup("part001.mcam")
            .unwrap()
            .unwrap();
        assert_eq!(record.owner, "alice");
        assert_eq!(record.note, "editing");
    }

    #[test]
    fn test_checkout_conflict_exit_code() {
        let (_temp_dir, dir) = init_namespace();

        cmd_checkout(Some(&dir), args("part001.mcam", "alice", "editing")).unwrap();
        let err = cmd_checkout(Some(&dir), args("part001.mcam", "bob", "x")).unwrap_err();

        assert!(matches!(err, PdmError::AlreadyLocked { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_checkout_defaults_owner() {
        let (_temp_dir, dir) = init_namespace();

        let mut a = args("part001.mcam", "ignored", "editing");
        a.owner = None;
        a.no_wait = true;
        cmd_checkout(Some(&dir), a).unwrap();

        let record = LockRegistry::new(dir.join("locks.json"))
            .lookup("part001.mcam")
            .unwrap()
            .unwrap();
        assert_eq!(record.owner, get_owner_string());
    }
}
