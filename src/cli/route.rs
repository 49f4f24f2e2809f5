//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::cli::help::command_name;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_genesis_summary, format_inspect_json, format_inspect_text, format_profiles_json,
    format_profiles_text, format_verify_result,
};
use crate::config::{ConfigLoader, ToolConfig};
use crate::error::CliError;
use crate::genesis::Block;
use crate::profile::{FileProfileLoader, Profile, ProfileLoader, SampleProfiles};
use crate::resolve::Environment;
use crate::sample::SampleConfig;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, info_span};

/// Runtime context for CLI execution: workspace, loaded tool config and the
/// environment snapshot taken at startup.
pub struct RunContext {
    workspace_root: PathBuf,
    config: ToolConfig,
    env: Environment,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        env: Environment,
    ) -> Result<Self, CliError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file_with_env(path, &env)?,
            None => ConfigLoader::load_with_env(&workspace_root, &env)?,
        };
        Ok(Self::with_config(workspace_root, config, env))
    }

    pub fn with_config(workspace_root: PathBuf, config: ToolConfig, env: Environment) -> Self {
        Self {
            workspace_root,
            config,
            env,
        }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Execute a command and return its rendered output.
    pub fn execute(&self, command: &Commands) -> Result<String, CliError> {
        let span = info_span!("command", name = command_name(command));
        let _guard = span.enter();

        match command {
            Commands::Genesis {
                channel_id,
                profile,
                profiles_file,
                output,
                msp_dir,
                org_id,
            } => self.handle_genesis(
                channel_id,
                profile.as_deref(),
                profiles_file.as_deref(),
                output.as_deref(),
                msp_dir.as_deref(),
                org_id.as_deref(),
            ),
            Commands::Inspect { block, format } => {
                let block = read_block(block)?;
                match parse_format(format)? {
                    OutputFormat::Text => Ok(format_inspect_text(&block)),
                    OutputFormat::Json => format_inspect_json(&block),
                }
            }
            Commands::Verify {
                block,
                expected_digest,
            } => {
                let block = read_block(block)?;
                block.verify()?;
                if let Some(expected) = expected_digest {
                    let actual = block.config_digest();
                    if !expected.trim().eq_ignore_ascii_case(&actual) {
                        return Err(CliError::DigestMismatch {
                            expected: expected.clone(),
                            actual,
                        });
                    }
                }
                Ok(format_verify_result(&block))
            }
            Commands::Profiles {
                profiles_file,
                format,
            } => {
                let format = parse_format(format)?;
                let loader = self.profile_loader(profiles_file.as_deref())?;
                let profiles = loader
                    .names()
                    .iter()
                    .map(|name| loader.load(name))
                    .collect::<Result<Vec<Profile>, _>>()?;
                match format {
                    OutputFormat::Text => Ok(format_profiles_text(&profiles)),
                    OutputFormat::Json => format_profiles_json(&profiles),
                }
            }
        }
    }

    fn handle_genesis(
        &self,
        channel_id: &str,
        profile: Option<&str>,
        profiles_file: Option<&Path>,
        output: Option<&Path>,
        msp_dir: Option<&Path>,
        org_id: Option<&str>,
    ) -> Result<String, CliError> {
        let sample = match msp_dir.or(self.config.msp_dir.as_deref()) {
            Some(dir) => SampleConfig::new(self.absolute(dir)),
            None => SampleConfig::discover(&self.env)?,
        };
        let sample = sample
            .with_profile(profile.unwrap_or(&self.config.default_profile))
            .with_org_id(org_id.unwrap_or(&self.config.org_id))
            .with_profile_loader(self.profile_loader(profiles_file)?);

        let block = sample.make_genesis_block(channel_id)?;
        let bytes = block.to_bytes()?;

        let path = match output {
            Some(path) => self.absolute(path),
            None => self.config.output_dir.join(format!("{}.block", channel_id)),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| CliError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&path, &bytes).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), size = bytes.len(), "Wrote genesis block");
        Ok(format_genesis_summary(&block, &path, bytes.len()))
    }

    fn profile_loader(&self, profiles_file: Option<&Path>) -> Result<Arc<dyn ProfileLoader>, CliError> {
        let file = profiles_file
            .map(|p| self.absolute(p))
            .or_else(|| self.config.profiles_file.clone());
        match file {
            Some(path) => Ok(Arc::new(FileProfileLoader::from_file(&path)?.with_samples())),
            None => Ok(Arc::new(SampleProfiles)),
        }
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            self.workspace_root.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_format(format: &str) -> Result<OutputFormat, CliError> {
    match format {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(CliError::InvalidArgument(format!(
            "format must be 'text' or 'json', got '{}'",
            other
        ))),
    }
}

fn read_block(path: &Path) -> Result<Block, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Block::from_bytes(&bytes)?)
}
