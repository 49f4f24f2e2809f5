//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::CliError;

/// Map command errors to a string for CLI output, prefixed with a stable category.
pub fn map_error(e: &CliError) -> String {
    let category = match e {
        CliError::Config(_) => "config",
        CliError::Bootstrap(_) => "bootstrap",
        CliError::Load(_) => "load",
        CliError::Encoding(_) | CliError::DigestMismatch { .. } => "verify",
        CliError::InvalidArgument(_) => "usage",
        CliError::Io { .. } => "io",
    };
    format!("error[{}]: {}", category, e)
}
