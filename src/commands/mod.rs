//! Command implementations for pdmlock.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the helpers they share.

mod checkin;
mod checkout;
mod init;
mod list;
mod release;
mod show;

use crate::cli::Command;
use pdmlock::config::Config;
use pdmlock::context::{Namespace, require_initialized_namespace};
use pdmlock::error::Result;
use pdmlock::registry::LockRegistry;
use std::path::Path;

/// Dispatch a command to its implementation.
///
/// `dir` is the namespace directory from `--dir` / `PDMLOCK_DIR`.
pub fn dispatch(dir: Option<&Path>, command: Command) -> Result<()> {
    match command {
        Command::Init(args) => init::cmd_init(dir, args),
        Command::Checkout(args) => checkout::cmd_checkout(dir, args),
        Command::Checkin(args) => checkin::cmd_checkin(dir, args),
        Command::Release(args) => release::cmd_release(dir, args),
        Command::Show(args) => show::cmd_show(dir, args),
        Command::List(args) => list::cmd_list(dir, args),
    }
}

/// Open the registry for an initialized namespace.
fn open_registry(dir: Option<&Path>) -> Result<(Namespace, Config, LockRegistry)> {
    let ns = require_initialized_namespace(dir)?;
    let config = ns.load_config()?;
    let registry = LockRegistry::from_namespace(&ns, &config)?;
    Ok((ns, config, registry))
}

/// Default owner string: `user@HOST`.
fn get_owner_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Format a timestamp the way every command prints it.
fn format_time(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
