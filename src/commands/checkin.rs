//! Implementation of the `pdmlock checkin` command.

use super::{get_owner_string, open_registry};
use crate::cli::CheckinArgs;
use pdmlock::error::Result;
use std::path::Path;

/// Execute the `pdmlock checkin` command.
pub fn cmd_checkin(dir: Option<&Path>, args: CheckinArgs) -> Result<()> {
    let (_ns, _config, registry) = open_registry(dir)?;

    let owner = args.owner.unwrap_or_else(get_owner_string);
    let record = registry.checkin(&args.resource, &owner)?;

    println!(
        "Checked in {} (held for {})",
        record.resource_id,
        record.age_string()
    );

    Ok(())
}
