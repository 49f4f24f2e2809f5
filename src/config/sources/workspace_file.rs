//! Workspace config file source: `configtx.toml` and `configtx.{env}.toml`

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use crate::resolve::Environment;
use std::path::Path;

pub const WORKSPACE_CONFIG_FILE: &str = "configtx.toml";

/// Selects an environment-specific overlay file when set
pub const ENV_NAME_VAR: &str = "CONFIGTX_ENV";

/// Add workspace config files to builder.
/// Precedence: configtx.toml (base) then configtx.{CONFIGTX_ENV}.toml.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
    env: &Environment,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let mut builder = builder;

    let base_config_path = workspace_root.join(WORKSPACE_CONFIG_FILE);
    if base_config_path.is_file() {
        builder = builder.add_source(File::from(base_config_path).required(false));
    }

    if let Some(env_name) = env.get(ENV_NAME_VAR) {
        let env_config_path = workspace_root.join(format!("configtx.{}.toml", env_name));
        if env_config_path.is_file() {
            builder = builder.add_source(File::from(env_config_path).required(false));
        }
    }

    Ok(builder)
}
