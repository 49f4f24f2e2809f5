//! Tool Configuration
//!
//! Settings of the `configtxgen` tool, layered with the `config` crate:
//! built-in defaults, the user's global `config.toml`, the workspace
//! `configtx.toml` and finally `CONFIGTX_*` environment variables
//! (`__` separates nested keys, e.g. `CONFIGTX_LOGGING__LEVEL`).

use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use crate::profile::SAMPLE_INSECURE_SOLO;
use crate::resolve::Environment;
use crate::sample::SAMPLE_ORG_ID;
use crate::tree::path::normalize_name;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

mod merge;
mod sources;

pub use sources::global_file::global_config_path;
pub use sources::environment::ENV_PREFIX;
pub use sources::workspace_file::{ENV_NAME_VAR, WORKSPACE_CONFIG_FILE};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// TOML profiles file; the built-in samples are used when unset
    #[serde(default)]
    pub profiles_file: Option<PathBuf>,

    /// Profile used when the command line names none
    #[serde(default = "default_profile")]
    pub default_profile: String,

    /// Organization ID of the sample MSP
    #[serde(default = "default_org_id")]
    pub org_id: String,

    /// Sample MSP directory; overrides environment-based discovery
    #[serde(default)]
    pub msp_dir: Option<PathBuf>,

    /// Directory genesis blocks are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_profile() -> String {
    SAMPLE_INSECURE_SOLO.to_string()
}

fn default_org_id() -> String {
    SAMPLE_ORG_ID.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            profiles_file: None,
            default_profile: default_profile(),
            org_id: default_org_id(),
            msp_dir: None,
            output_dir: default_output_dir(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Profile(String),
    Organization(String),
    Path(String, String),
    Logging(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Profile(msg) => write!(f, "Profile: {}", msg),
            ValidationError::Organization(msg) => write!(f, "Organization: {}", msg),
            ValidationError::Path(field, msg) => write!(f, "Path '{}': {}", field, msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ToolConfig {
    /// Validate the entire configuration, collecting every problem
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = normalize_name(&self.default_profile) {
            errors.push(ValidationError::Profile(e.to_string()));
        }
        if self.org_id.trim().is_empty() {
            errors.push(ValidationError::Organization(
                "org_id cannot be empty".to_string(),
            ));
        } else if let Err(e) = normalize_name(&self.org_id) {
            errors.push(ValidationError::Organization(e.to_string()));
        }
        if self.output_dir.as_os_str().is_empty() {
            errors.push(ValidationError::Path(
                "output_dir".to_string(),
                "cannot be empty".to_string(),
            ));
        }
        if let Some(file) = &self.profiles_file {
            if file.as_os_str().is_empty() {
                errors.push(ValidationError::Path(
                    "profiles_file".to_string(),
                    "cannot be empty".to_string(),
                ));
            }
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Resolve relative paths against `base`
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let absolutize = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.profiles_file = self.profiles_file.map(absolutize);
        self.msp_dir = self.msp_dir.map(absolutize);
        self.output_dir = absolutize(self.output_dir);
        self
    }
}

/// Loads [`ToolConfig`] from its layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, global file, `<workspace_root>/configtx.toml`, process environment
    pub fn load(workspace_root: &Path) -> Result<ToolConfig, ConfigError> {
        Self::load_with_env(workspace_root, &Environment::from_process())
    }

    /// Same layering as [`ConfigLoader::load`] over an environment snapshot
    pub fn load_with_env(workspace_root: &Path, env: &Environment) -> Result<ToolConfig, ConfigError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::workspace_file::add_to_builder(builder, workspace_root, env)?;
        let builder = sources::environment::add_to_builder(builder, env);
        Self::finish(builder.build()?, workspace_root)
    }

    /// Defaults, an explicit config file, process environment
    pub fn load_from_file(path: &Path) -> Result<ToolConfig, ConfigError> {
        Self::load_from_file_with_env(path, &Environment::from_process())
    }

    pub fn load_from_file_with_env(path: &Path, env: &Environment) -> Result<ToolConfig, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::Invalid(format!(
                "Config file {} does not exist",
                path.display()
            )));
        }
        let builder = merge::merge_policy::builder_with_defaults()?
            .add_source(config::File::from(path).required(true));
        let builder = sources::environment::add_to_builder(builder, env);
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::finish(builder.build()?, base)
    }

    fn finish(settings: config::Config, base: &Path) -> Result<ToolConfig, ConfigError> {
        let config: ToolConfig = settings.try_deserialize()?;
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ConfigError::Invalid(format!(
                "Configuration validation failed:\n{}",
                messages.join("\n")
            ))
        })?;
        Ok(config.resolve_paths(base))
    }
}
