//! configtxgen CLI Binary
//!
//! Command-line interface for composing channel configuration and assembling
//! genesis blocks.

use anyhow::Context;
use clap::Parser;
use configtx::cli::{map_error, Cli, RunContext};
use configtx::config::ConfigLoader;
use configtx::logging::{init_logging, LoggingConfig};
use configtx::resolve::Environment;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    // Environment is captured once here and threaded through explicitly
    let env = Environment::from_process();

    let logging_config = match build_logging_config(&cli, &env) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("configtxgen starting");

    let context = match RunContext::new(cli.workspace.clone(), cli.config.clone(), env) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error loading configuration: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}

/// Build logging configuration from CLI args and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli, env: &Environment) -> anyhow::Result<LoggingConfig> {
    let mut config = match cli.config {
        Some(ref path) => ConfigLoader::load_from_file_with_env(path, env)
            .with_context(|| format!("loading {}", path.display()))?
            .logging,
        None => ConfigLoader::load_with_env(&cli.workspace, env)
            .with_context(|| format!("loading workspace config in {}", cli.workspace.display()))?
            .logging,
    };

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }

    Ok(config)
}
