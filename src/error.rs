//! Error types for configuration composition and genesis assembly.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Kind of tree entry two fragments disagreed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Value,
    Policy,
    ModPolicy,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Value => write!(f, "value"),
            EntryKind::Policy => write!(f, "policy"),
            EntryKind::ModPolicy => write!(f, "mod_policy"),
        }
    }
}

/// Config group tree errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("Conflicting {kind} '{key}' at {path}: declared by {existing}, redeclared by {incoming}")]
    Conflict {
        path: String,
        key: String,
        kind: EntryKind,
        existing: String,
        incoming: String,
    },

    #[error("Config group at {path} is sealed and cannot be modified")]
    Immutable { path: String },

    #[error("Invalid config name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },
}

/// Serialization errors from the encoding collaborator
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("Binary encoding failed: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed block: {0}")]
    Malformed(String),
}

/// Failures loading external profile or identity material
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Failed to parse {path:?}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Identity material missing: {0}")]
    MissingMaterial(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors raised while a template produces its fragment
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error(transparent)]
    Tree(TreeError),

    #[error("Invalid fragment: {0}")]
    InvalidFragment(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Identity material error: {0}")]
    Identity(#[from] LoadError),

    #[error("Failed to encode config value: {0}")]
    Encode(#[from] EncodingError),
}

impl From<TreeError> for TemplateError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::InvalidName { .. } => TemplateError::InvalidFragment(err.to_string()),
            other => TemplateError::Tree(other),
        }
    }
}

impl TemplateError {
    /// True when two fragments claimed the same configuration path
    pub fn is_conflict(&self) -> bool {
        matches!(self, TemplateError::Tree(TreeError::Conflict { .. }))
    }
}

/// Genesis factory errors
#[derive(Debug, Error)]
pub enum GenesisError {
    #[error("Invalid channel ID {channel_id:?}: {reason}")]
    InvalidChannelId { channel_id: String, reason: String },

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),
}

impl GenesisError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, GenesisError::Template(e) if e.is_conflict())
    }
}

/// Sample identity directory could not be located
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(
        "Could not find sample MSP configuration (tried {tried:?}); \
         set PEER_CFG_PATH, ORDERER_CFG_PATH, or CONFIGTX_SAMPLE_PATH correctly"
    )]
    NotFound { tried: Vec<PathBuf> },
}

/// Startup failures: anything that prevents a genesis block from being assembled at all
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("{0}")]
    Resolve(#[from] ResolveError),

    #[error("Could not load sample material: {0}")]
    Load(#[from] LoadError),

    #[error("{0}")]
    Genesis(#[from] GenesisError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Tool configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Invalid(String),

    #[error("Configuration source error: {0}")]
    Source(#[from] config::ConfigError),
}

/// Command failures surfaced by the CLI
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Bootstrap(#[from] BootstrapError),

    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("Invalid block: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Config digest mismatch: expected {expected}, found {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
