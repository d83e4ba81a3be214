//! Implementation of the `pdmlock list` command.
//!
//! Without `--all`, prints every current hold. With `--all`, prints every
//! file in the configured repository with its status, in the same order as
//! the directory listing.

use super::{format_time, open_registry};
use crate::cli::ListArgs;
use pdmlock::catalog::DirectoryCatalog;
use pdmlock::error::{PdmError, Result};
use pdmlock::registry::LockInfo;
use std::collections::HashMap;
use std::path::Path;

/// Execute the `pdmlock list` command.
pub fn cmd_list(dir: Option<&Path>, args: ListArgs) -> Result<()> {
    let (ns, config, registry) = open_registry(dir)?;
    let locks = registry.list()?;

    if args.all {
        let repo = ns.repository_dir(&config).ok_or_else(|| {
            PdmError::Config(format!(
                "`list --all` needs a repository directory.\n\
                 Set `repository_dir` in {}",
                ns.config_path().display()
            ))
        })?;
        return print_repository(&DirectoryCatalog::new(repo), &locks);
    }

    if locks.is_empty() {
        println!("No resources checked out.");
        return Ok(());
    }

    println!("Checked out ({}):", locks.len());
    println!();

    for lock in &locks {
        println!("  {}:", lock.record.resource_id);
        println!("    Owner:      {}", lock.record.owner);
        println!("    Since:      {}", format_time(&lock.record.acquired_at));
        println!("    Age:        {}", lock.record.age_string());
        println!("    Note:       {}", lock.record.note);
        if lock.is_stale {
            println!(
                "    Status:     STALE (exceeds {} min threshold)",
                config.lock_stale_minutes
            );
        }
        println!();
    }

    let stale_count = locks.iter().filter(|l| l.is_stale).count();
    if stale_count > 0 {
        println!(
            "Note: {} hold(s) are stale. Use `pdmlock release <resource> --force` to clear.",
            stale_count
        );
    }

    Ok(())
}

fn print_repository(catalog: &DirectoryCatalog, locks: &[LockInfo]) -> Result<()> {
    let files = catalog.list()?;
    let held: HashMap<&str, &LockInfo> = locks
        .iter()
        .map(|l| (l.record.resource_id.as_str(), l))
        .collect();

    if files.is_empty() {
        println!("No files in {}", catalog.root().display());
        return Ok(());
    }

    println!("Files in {} ({}):", catalog.root().display(), files.len());
    println!();

    for file in &files {
        match held.get(file.name.as_str()) {
            Some(lock) => println!(
                "  {:<32} {:>10}  checked out by {}{}",
                file.name,
                format_size(file.size_bytes),
                lock.record.owner,
                if lock.is_stale { " (STALE)" } else { "" }
            ),
            None => println!(
                "  {:<32} {:>10}  available",
                file.name,
                format_size(file.size_bytes)
            ),
        }
    }

    // Holds on files that have since been removed from the repository.
    let orphans: Vec<_> = locks
        .iter()
        .filter(|l| !files.iter().any(|f| f.name == l.record.resource_id))
        .collect();
    if !orphans.is_empty() {
        println!();
        println!("Held but missing from repository:");
        for lock in orphans {
            println!("  {}", lock);
        }
    }

    Ok(())
}

fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;

    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_helpers::init_namespace;
    use pdmlock::registry::LockRegistry;
    use std::fs;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn test_list_held() {
        let (_temp_dir, dir) = init_namespace();
        cmd_list(Some(&dir), ListArgs { all: false }).unwrap();

        LockRegistry::new(dir.join("locks.json"))
            .checkout("part001.mcam", "alice", "editing")
            .unwrap();
        cmd_list(Some(&dir), ListArgs { all: false }).unwrap();
    }

    #[test]
    fn test_list_all_requires_repository() {
        let (_temp_dir, dir) = init_namespace();
        let err = cmd_list(Some(&dir), ListArgs { all: true }).unwrap_err();
        assert!(matches!(err, PdmError::Config(_)));
        assert!(err.to_string().contains("repository_dir"));
    }

    #[test]
    fn test_list_all_with_repository() {
        let (temp_dir, dir) = init_namespace();
        let repo = temp_dir.path().join("parts");
        fs::create_dir_all(&repo).unwrap();
        fs::write(repo.join("part001.mcam"), b"data").unwrap();
        fs::write(repo.join("part002.mcam"), b"data").unwrap();
        fs::write(
            dir.join("pdmlock.yaml"),
            format!("repository_dir: {}\n", repo.display()),
        )
        .unwrap();

        LockRegistry::new(dir.join("locks.json"))
            .checkout("part001.mcam", "alice", "editing")
            .unwrap();

        cmd_list(Some(&dir), ListArgs { all: true }).unwrap();
    }

    #[test]
    fn test_list_all_missing_repository_is_unavailable() {
        let (temp_dir, dir) = init_namespace();
        let repo = temp_dir.path().join("gone");
        fs::write(
            dir.join("pdmlock.yaml"),
            format!("repository_dir: {}\n", repo.display()),
        )
        .unwrap();

        let err = cmd_list(Some(&dir), ListArgs { all: true }).unwrap_err();
        assert!(matches!(err, PdmError::RepositoryUnavailable { .. }));
        assert_eq!(err.exit_code(), pdmlock::exit_codes::STORE_FAILURE);
    }
}
