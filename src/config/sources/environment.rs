//! Environment source: `CONFIGTX_*` variables, `__` between nested keys

use crate::resolve::Environment;
use config::builder::DefaultState;
use config::ConfigBuilder;

pub const ENV_PREFIX: &str = "CONFIGTX";

/// Add the `CONFIGTX_*` variables of `env` as the highest-precedence layer
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    env: &Environment,
) -> ConfigBuilder<DefaultState> {
    let vars: config::Map<String, String> = env
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .source(Some(vars)),
    )
}
