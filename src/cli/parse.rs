//! CLI parse: clap types for configtxgen. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// configtxgen - compose channel configuration and assemble genesis blocks
#[derive(Debug, Parser)]
#[command(name = "configtxgen")]
#[command(about = "Compose channel configuration templates into deterministic genesis blocks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (holds configtx.toml)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Assemble the genesis block of the sample network
    Genesis {
        /// Channel identifier ([a-z][a-z0-9.-]*, at most 249 characters)
        #[arg(long)]
        channel_id: String,
        /// Profile name (default from configuration)
        #[arg(long)]
        profile: Option<String>,
        /// TOML profiles file (built-in samples remain available)
        #[arg(long)]
        profiles_file: Option<PathBuf>,
        /// Output file (default: <output_dir>/<channel_id>.block)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Sample MSP directory (skips environment-based discovery)
        #[arg(long)]
        msp_dir: Option<PathBuf>,
        /// Organization ID of the sample MSP
        #[arg(long)]
        org_id: Option<String>,
    },
    /// Print the config tree and digest of a block file
    Inspect {
        /// Block file
        block: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Check a block file's integrity
    Verify {
        /// Block file
        block: PathBuf,
        /// Expected config digest (hex)
        #[arg(long)]
        expected_digest: Option<String>,
    },
    /// List available profiles
    Profiles {
        /// TOML profiles file (built-in samples remain available)
        #[arg(long)]
        profiles_file: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
