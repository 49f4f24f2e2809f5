//! Network Profiles
//!
//! A profile is a named set of channel and orderer parameters from which the
//! profile-derived template builds its fragment. Profiles come from a
//! [`ProfileLoader`]: the built-in samples or a TOML profiles file.

use crate::error::LoadError;
use crate::tree::path::normalize_name;
use crate::values::BatchSize;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const SAMPLE_INSECURE_SOLO: &str = "SampleInsecureSolo";
pub const SAMPLE_INSECURE_KAFKA: &str = "SampleInsecureKafka";
pub const SAMPLE_SINGLE_MSP_SOLO: &str = "SampleSingleMSPSolo";

/// Consensus implementations an orderer profile may name
pub const CONSENSUS_TYPES: &[&str] = &["solo", "kafka", "etcdraft"];

/// Hashing algorithms a channel may declare
pub const HASHING_ALGORITHMS: &[&str] = &["SHA256", "SHA3_256"];

/// Channel-level profile data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Profile name (filled from the table key when loaded from a file)
    #[serde(default)]
    pub name: String,

    #[serde(default = "default_hashing_algorithm")]
    pub hashing_algorithm: String,

    #[serde(default = "default_block_data_hashing_width")]
    pub block_data_hashing_width: u32,

    /// Channel capabilities; only enabled entries are written
    #[serde(default)]
    pub capabilities: BTreeMap<String, bool>,

    /// Consortium this channel belongs to
    #[serde(default)]
    pub consortium: Option<String>,

    #[serde(default)]
    pub orderer: Option<OrdererProfile>,

    #[serde(default)]
    pub application: Option<ApplicationProfile>,

    #[serde(default)]
    pub consortiums: BTreeMap<String, ConsortiumProfile>,
}

/// Orderer section of a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdererProfile {
    /// Consensus kind: solo, kafka or etcdraft
    pub orderer_type: String,

    pub addresses: Vec<String>,

    pub batch_timeout_ms: u64,

    pub batch_size: BatchSize,

    #[serde(default)]
    pub kafka_brokers: Vec<String>,

    /// Maximum number of channels (0 = unlimited)
    #[serde(default)]
    pub max_channels: u64,

    /// Orderer organization names
    #[serde(default)]
    pub organizations: Vec<String>,

    #[serde(default)]
    pub capabilities: BTreeMap<String, bool>,
}

/// Application section of a profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationProfile {
    #[serde(default)]
    pub organizations: Vec<String>,

    #[serde(default)]
    pub capabilities: BTreeMap<String, bool>,
}

/// A consortium definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsortiumProfile {
    #[serde(default)]
    pub organizations: Vec<String>,
}

fn default_hashing_algorithm() -> String {
    "SHA256".to_string()
}

fn default_block_data_hashing_width() -> u32 {
    u32::MAX
}

impl Profile {
    /// Check every field the profile-derived layout relies on
    pub fn validate(&self) -> Result<(), String> {
        if !HASHING_ALGORITHMS.contains(&self.hashing_algorithm.as_str()) {
            return Err(format!(
                "unsupported hashing algorithm '{}' (expected one of {:?})",
                self.hashing_algorithm, HASHING_ALGORITHMS
            ));
        }
        if self.block_data_hashing_width == 0 {
            return Err("block data hashing width must be greater than 0".to_string());
        }
        if let Some(consortium) = &self.consortium {
            validate_name("consortium", consortium)?;
        }

        let orderer = self
            .orderer
            .as_ref()
            .ok_or_else(|| "profile has no orderer section".to_string())?;
        orderer.validate()?;

        if let Some(application) = &self.application {
            validate_organizations("application", &application.organizations)?;
        }
        for (name, consortium) in &self.consortiums {
            validate_name("consortium", name)?;
            validate_organizations(&format!("consortium '{}'", name), &consortium.organizations)?;
        }

        Ok(())
    }

    /// Names of enabled channel capabilities, sorted
    pub fn enabled_capabilities(&self) -> Vec<String> {
        enabled(&self.capabilities)
    }
}

impl OrdererProfile {
    pub fn validate(&self) -> Result<(), String> {
        if self.orderer_type.trim().is_empty() {
            return Err("orderer consensus type is empty".to_string());
        }
        if !CONSENSUS_TYPES.contains(&self.orderer_type.as_str()) {
            return Err(format!(
                "unknown orderer consensus type '{}' (expected one of {:?})",
                self.orderer_type, CONSENSUS_TYPES
            ));
        }
        if self.addresses.is_empty() {
            return Err("orderer has no addresses".to_string());
        }
        if self.addresses.iter().any(|a| a.trim().is_empty()) {
            return Err("orderer address is empty".to_string());
        }
        if self.batch_timeout_ms == 0 {
            return Err("batch timeout must be greater than 0".to_string());
        }

        let batch = &self.batch_size;
        if batch.max_message_count == 0 {
            return Err("batch size max message count must be greater than 0".to_string());
        }
        if batch.absolute_max_bytes == 0 {
            return Err("batch size absolute max bytes must be greater than 0".to_string());
        }
        if batch.preferred_max_bytes > batch.absolute_max_bytes {
            return Err(format!(
                "batch size preferred max bytes ({}) exceeds absolute max bytes ({})",
                batch.preferred_max_bytes, batch.absolute_max_bytes
            ));
        }

        if self.orderer_type == "kafka" && self.kafka_brokers.is_empty() {
            return Err("kafka consensus requires at least one broker".to_string());
        }

        validate_organizations("orderer", &self.organizations)
    }

    pub fn enabled_capabilities(&self) -> Vec<String> {
        enabled(&self.capabilities)
    }
}

impl ApplicationProfile {
    pub fn enabled_capabilities(&self) -> Vec<String> {
        enabled(&self.capabilities)
    }
}

fn enabled(capabilities: &BTreeMap<String, bool>) -> Vec<String> {
    capabilities
        .iter()
        .filter(|(_, on)| **on)
        .map(|(name, _)| name.clone())
        .collect()
}

fn validate_name(what: &str, name: &str) -> Result<(), String> {
    normalize_name(name)
        .map(|_| ())
        .map_err(|e| format!("{} name: {}", what, e))
}

fn validate_organizations(section: &str, organizations: &[String]) -> Result<(), String> {
    let mut seen = BTreeSet::new();
    for org in organizations {
        validate_name(&format!("{} organization", section), org)?;
        if !seen.insert(org.as_str()) {
            return Err(format!("duplicate {} organization '{}'", section, org));
        }
    }
    Ok(())
}

/// Source of named profiles
///
/// Implementations must be safe for concurrent reads; a loaded profile is
/// treated as immutable by the templates built from it.
pub trait ProfileLoader: Send + Sync {
    /// Load the profile called `name`
    fn load(&self, name: &str) -> Result<Profile, LoadError>;

    /// Names of every profile this loader can provide, sorted
    fn names(&self) -> Vec<String>;
}

/// The built-in sample profiles
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleProfiles;

impl SampleProfiles {
    fn orderer(orderer_type: &str) -> OrdererProfile {
        OrdererProfile {
            orderer_type: orderer_type.to_string(),
            addresses: vec!["127.0.0.1:7050".to_string()],
            batch_timeout_ms: 2_000,
            batch_size: BatchSize {
                max_message_count: 10,
                absolute_max_bytes: 10 * 1024 * 1024,
                preferred_max_bytes: 512 * 1024,
            },
            kafka_brokers: Vec::new(),
            max_channels: 0,
            organizations: Vec::new(),
            capabilities: BTreeMap::new(),
        }
    }

    fn base(name: &str, orderer: OrdererProfile) -> Profile {
        Profile {
            name: name.to_string(),
            hashing_algorithm: default_hashing_algorithm(),
            block_data_hashing_width: default_block_data_hashing_width(),
            capabilities: BTreeMap::new(),
            consortium: None,
            orderer: Some(orderer),
            application: None,
            consortiums: BTreeMap::new(),
        }
    }

    /// Build a sample profile by name
    pub fn get(name: &str) -> Option<Profile> {
        match name {
            SAMPLE_INSECURE_SOLO => Some(Self::base(name, Self::orderer("solo"))),
            SAMPLE_INSECURE_KAFKA => {
                let mut orderer = Self::orderer("kafka");
                orderer.kafka_brokers = vec!["127.0.0.1:9092".to_string()];
                Some(Self::base(name, orderer))
            }
            SAMPLE_SINGLE_MSP_SOLO => {
                let mut orderer = Self::orderer("solo");
                orderer.organizations = vec!["SampleOrg".to_string()];
                let mut profile = Self::base(name, orderer);
                profile.consortiums.insert(
                    "SampleConsortium".to_string(),
                    ConsortiumProfile {
                        organizations: vec!["SampleOrg".to_string()],
                    },
                );
                Some(profile)
            }
            _ => None,
        }
    }
}

impl ProfileLoader for SampleProfiles {
    fn load(&self, name: &str) -> Result<Profile, LoadError> {
        Self::get(name).ok_or_else(|| LoadError::ProfileNotFound(name.to_string()))
    }

    fn names(&self) -> Vec<String> {
        let mut names = vec![
            SAMPLE_INSECURE_KAFKA.to_string(),
            SAMPLE_INSECURE_SOLO.to_string(),
            SAMPLE_SINGLE_MSP_SOLO.to_string(),
        ];
        names.sort();
        names
    }
}

#[derive(Debug, Deserialize)]
struct ProfilesFile {
    #[serde(default)]
    profiles: BTreeMap<String, Profile>,
}

/// Profiles read from a TOML file with one `[profiles.<name>]` table per profile
#[derive(Debug, Clone)]
pub struct FileProfileLoader {
    path: PathBuf,
    profiles: BTreeMap<String, Profile>,
}

impl FileProfileLoader {
    /// Read and parse a profiles file
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents, path)
    }

    /// Parse profiles from TOML text; `path` is used for error messages only
    pub fn from_toml_str(contents: &str, path: &Path) -> Result<Self, LoadError> {
        let file: ProfilesFile = toml::from_str(contents).map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let profiles = file
            .profiles
            .into_iter()
            .map(|(name, mut profile)| {
                if profile.name.is_empty() {
                    profile.name = name.clone();
                }
                (name, profile)
            })
            .collect::<BTreeMap<_, _>>();

        debug!(path = %path.display(), count = profiles.len(), "Loaded profiles file");

        Ok(Self {
            path: path.to_path_buf(),
            profiles,
        })
    }

    /// Fill in the built-in samples for names the file does not define
    pub fn with_samples(mut self) -> Self {
        for name in SampleProfiles.names() {
            if !self.profiles.contains_key(&name) {
                if let Some(profile) = SampleProfiles::get(&name) {
                    self.profiles.insert(name, profile);
                }
            }
        }
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileLoader for FileProfileLoader {
    fn load(&self, name: &str) -> Result<Profile, LoadError> {
        self.profiles
            .get(name)
            .cloned()
            .ok_or_else(|| LoadError::ProfileNotFound(name.to_string()))
    }

    fn names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }
}
