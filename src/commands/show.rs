//! Implementation of the `pdmlock show` command.

use super::{format_time, open_registry};
use crate::cli::ShowArgs;
use pdmlock::error::Result;
use std::path::Path;

/// Execute the `pdmlock show` command.
pub fn cmd_show(dir: Option<&Path>, args: ShowArgs) -> Result<()> {
    let (_ns, config, registry) = open_registry(dir)?;

    match registry.lookup(&args.resource)? {
        Some(record) => {
            println!("{} [checked out]", record.resource_id);
            println!("  Owner:      {}", record.owner);
            println!("  Since:      {}", format_time(&record.acquired_at));
            println!("  Age:        {}", record.age_string());
            println!("  Note:       {}", record.note);
            if record.is_stale(config.lock_stale_minutes) {
                println!(
                    "  Status:     STALE (exceeds {} min threshold)",
                    config.lock_stale_minutes
                );
            }
        }
        None => println!("{} [available]", args.resource),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_helpers::init_namespace;

    #[test]
    fn test_show_free_and_held() {
        let (_temp_dir, dir) = init_namespace();
        let args = || ShowArgs {
            resource: "part001.mcam".to_string(),
        };

        cmd_show(Some(&dir), args()).unwrap();

        pdmlock::registry::LockRegistry::new(dir.join("locks.json"))
            .checkout("part001.mcam", "alice", "editing")
            .unwrap();
        cmd_show(Some(&dir), args()).unwrap();
    }

    #[test]
    fn test_show_rejects_empty_resource() {
        let (_temp_dir, dir) = init_namespace();
        let result = cmd_show(
            Some(&dir),
            ShowArgs {
                resource: String::new(),
            },
        );
        assert!(result.is_err());
    }
}
