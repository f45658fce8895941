//! Command dispatch: bridges CLI args -> store hooks -> output formatting.

pub mod config_cmd;
pub mod pets;
pub mod tutors;
pub mod util;

use petadmin_core::Registry;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    registry: &Registry,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Pets(args) => pets::handle(registry, args, global).await,
        Command::Tutors(args) => tutors::handle(registry, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
