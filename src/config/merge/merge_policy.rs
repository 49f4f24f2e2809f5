//! Merge rules: defaults, override order, conflict handling.
//!
//! Later sources override earlier ones key by key: defaults, global file,
//! workspace file, environment.

use crate::profile::SAMPLE_INSECURE_SOLO;
use crate::sample::SAMPLE_ORG_ID;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("default_profile", SAMPLE_INSECURE_SOLO)?
        .set_default("org_id", SAMPLE_ORG_ID)?
        .set_default("output_dir", ".")
}
