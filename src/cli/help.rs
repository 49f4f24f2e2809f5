//! CLI command-name contract for logging and routing.

use crate::cli::parse::Commands;

/// Command name string recorded on the command span (e.g. "genesis").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Genesis { .. } => "genesis",
        Commands::Inspect { .. } => "inspect",
        Commands::Verify { .. } => "verify",
        Commands::Profiles { .. } => "profiles",
    }
}
