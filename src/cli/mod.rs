//! CLI argument parsing for pdmlock.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pdmlock: checkout/checkin locks for files in a shared parts repository.
///
/// Before editing a shared file, check it out; when done, check it in.
/// Everyone pointing at the same namespace directory sees the same locks.
#[derive(Parser, Debug)]
#[command(name = "pdmlock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Namespace directory holding the lock table (default: ./.pdmlock).
    #[arg(long, global = true, env = "PDMLOCK_DIR")]
    pub dir: Option<PathBuf>,

    /// Log debug diagnostics to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for pdmlock.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a lock namespace.
    ///
    /// Creates the namespace directory, a default `pdmlock.yaml`, and an
    /// empty lock table. Existing files are left alone.
    Init(InitArgs),

    /// Check out a resource for editing.
    ///
    /// Fails if anyone already holds it.
    Checkout(CheckoutArgs),

    /// Check in a resource you hold.
    Checkin(CheckinArgs),

    /// Release someone else's hold on a resource.
    ///
    /// Requires --force flag to prevent accidental release.
    Release(ReleaseArgs),

    /// Show who holds a resource.
    Show(ShowArgs),

    /// List current holds.
    ///
    /// With --all, lists every file in the repository with its status.
    List(ListArgs),
}

/// Arguments for the `init` command.
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Repository directory holding the files that can be checked out.
    #[arg(long)]
    pub repository: Option<PathBuf>,
}

/// Arguments for the `checkout` command.
#[derive(Parser, Debug)]
pub struct CheckoutArgs {
    /// Resource to check out (e.g., part001.mcam).
    pub resource: String,

    /// Owner to record (default: $USER@hostname).
    #[arg(long)]
    pub owner: Option<String>,

    /// What you are doing with the resource (required).
    #[arg(short, long)]
    pub note: String,

    /// Fail immediately if the lock table is busy.
    #[arg(long, conflicts_with = "wait_ms")]
    pub no_wait: bool,

    /// Milliseconds to wait for the lock table before giving up.
    #[arg(long)]
    pub wait_ms: Option<u64>,
}

/// Arguments for the `checkin` command.
#[derive(Parser, Debug)]
pub struct CheckinArgs {
    /// Resource to check in.
    pub resource: String,

    /// Owner that holds the resource (default: $USER@hostname).
    #[arg(long)]
    pub owner: Option<String>,
}

/// Arguments for the `release` command.
#[derive(Parser, Debug)]
pub struct ReleaseArgs {
    /// Resource to release.
    pub resource: String,

    /// Force the release (required for safety).
    #[arg(long)]
    pub force: bool,

    /// Name recorded as the releasing administrator (default: $USER@hostname).
    #[arg(long = "as", value_name = "ACTOR")]
    pub acting_as: Option<String>,
}

/// Arguments for the `show` command.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Resource to show.
    pub resource: String,
}

/// Arguments for the `list` command.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// List every repository file, not only checked-out ones.
    #[arg(long)]
    pub all: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
