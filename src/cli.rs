//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_genesis_summary, format_inspect_json, format_inspect_text, format_profiles_json,
    format_profiles_text, format_verify_result,
};
pub use route::RunContext;
