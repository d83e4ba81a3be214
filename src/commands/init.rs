//! Implementation of the `pdmlock init` command.
//!
//! Creates the namespace directory, writes a default `pdmlock.yaml`
//! atomically, and creates an empty lock table under the table lock. Idempotent: existing files
//! are never overwritten, so re-running init on a live namespace is harmless.

use super::get_owner_string;
use crate::cli::InitArgs;
use pdmlock::config::Config;
use pdmlock::context::Namespace;
use pdmlock::error::{PdmError, Result};
use pdmlock::events::{AuditLog, Event, EventAction};
use pdmlock::fs::atomic_write_file;
use pdmlock::store::{LockTable, with_exclusive_access};
use serde_json::json;
use std::fs;
use std::path::Path;

/// Execute the `pdmlock init` command.
pub fn cmd_init(dir: Option<&Path>, args: InitArgs) -> Result<()> {
    let ns = Namespace::resolve(dir)?;

    fs::create_dir_all(&ns.root).map_err(|e| {
        PdmError::Config(format!(
            "failed to create namespace directory '{}': {}",
            ns.root.display(),
            e
        ))
    })?;

    let config_path = ns.config_path();
    let config = if config_path.exists() {
        if args.repository.is_some() {
            return Err(PdmError::Config(format!(
                "'{}' already exists; edit `repository_dir` there instead of passing --repository",
                config_path.display()
            )));
        }
        println!("Config already exists: {}", config_path.display());
        Config::load(&config_path)?
    } else {
        let config = Config {
            repository_dir: args.repository,
            ..Config::default()
        };
        config.validate()?;
        atomic_write_file(&config_path, &config.to_yaml()?)?;
        println!("Created config: {}", config_path.display());
        config
    };

    // Goes through the locked scope like every other table access; an
    // existing table is read and written back unchanged.
    let table_path = ns.lock_table_path(&config);
    let existed = table_path.exists();
    let held = with_exclusive_access(&table_path, |table: &mut LockTable| Ok(table.len()))?;
    if existed {
        println!(
            "Lock table already exists: {} ({} checked out)",
            table_path.display(),
            held
        );
    } else {
        println!("Created lock table: {}", table_path.display());
    }

    if config.audit_log {
        AuditLog::new(ns.events_path(&config)).record(
            &Event::new(EventAction::Init, get_owner_string())
                .with_details(json!({ "namespace": ns.root.display().to_string() })),
        );
    }

    tracing::info!(namespace = %ns.root.display(), "namespace initialized");
    println!();
    println!("pdmlock namespace ready at {}", ns.root.display());

    Ok(())
}
