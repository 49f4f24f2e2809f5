//! Sample identity directory resolution
//!
//! Resolution is a pure function over an explicit [`Environment`] snapshot and
//! a directory probe. The process entry point captures the environment once
//! and threads the resolved path through explicitly.

use crate::error::ResolveError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Role-specific variable consulted first
pub const PEER_CFG_PATH_ENV: &str = "PEER_CFG_PATH";

/// Role-specific variable consulted second
pub const ORDERER_CFG_PATH_ENV: &str = "ORDERER_CFG_PATH";

/// Generic search path (platform path-list syntax) consulted last
pub const SAMPLE_SEARCH_PATH_ENV: &str = "CONFIGTX_SAMPLE_PATH";

/// Location of the sample MSP below every candidate root
pub const SAMPLE_MSP_SUBDIR: &str = "msp/sampleconfig";

/// Snapshot of environment variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Capture the current process environment
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    /// Every captured variable, in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Value of `key`, treating empty values as unset
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

/// Candidate sample directories in search order
pub fn candidate_paths(env: &Environment) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    for var in [PEER_CFG_PATH_ENV, ORDERER_CFG_PATH_ENV] {
        if let Some(root) = env.get(var) {
            candidates.push(Path::new(root).join(SAMPLE_MSP_SUBDIR));
        }
    }

    if let Some(search_path) = env.get(SAMPLE_SEARCH_PATH_ENV) {
        for root in std::env::split_paths(search_path) {
            if root.as_os_str().is_empty() {
                continue;
            }
            candidates.push(root.join(SAMPLE_MSP_SUBDIR));
        }
    }

    candidates
}

/// Resolve the sample MSP directory: the first candidate `probe` accepts
pub fn resolve_sample_msp_path<F>(env: &Environment, probe: F) -> Result<PathBuf, ResolveError>
where
    F: Fn(&Path) -> bool,
{
    let candidates = candidate_paths(env);
    match candidates.iter().find(|c| probe(c)) {
        Some(found) => Ok(found.clone()),
        None => Err(ResolveError::NotFound { tried: candidates }),
    }
}

/// Directory probe backed by the filesystem
pub fn dir_exists(path: &Path) -> bool {
    path.is_dir()
}
