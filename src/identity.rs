//! Identity (MSP) material
//!
//! `IdentityConfig` is the opaque credential bundle an organization
//! contributes to the channel config. It is produced by a
//! [`CredentialLoader`]; the default [`MspDirLoader`] reads the conventional
//! MSP directory layout. Certificates are carried as raw bytes and are not
//! parsed or validated here.

use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

pub const CA_CERTS_DIR: &str = "cacerts";
pub const INTERMEDIATE_CERTS_DIR: &str = "intermediatecerts";
pub const ADMIN_CERTS_DIR: &str = "admincerts";
pub const TLS_CA_CERTS_DIR: &str = "tlscacerts";
pub const TLS_INTERMEDIATE_CERTS_DIR: &str = "tlsintermediatecerts";
pub const SIGN_CERTS_DIR: &str = "signcerts";

/// Verifying identity material for one organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// MSP identifier of the organization
    pub name: String,
    pub root_certs: Vec<Vec<u8>>,
    pub intermediate_certs: Vec<Vec<u8>>,
    pub admins: Vec<Vec<u8>>,
    pub tls_root_certs: Vec<Vec<u8>>,
    pub tls_intermediate_certs: Vec<Vec<u8>>,
    pub signing_certs: Vec<Vec<u8>>,
}

impl IdentityConfig {
    pub fn msp_id(&self) -> &str {
        &self.name
    }
}

/// Replacement certificates applied on top of what was read from disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertOverrides {
    pub admin_certs: Option<Vec<Vec<u8>>>,
    pub signing_certs: Option<Vec<Vec<u8>>>,
}

impl CertOverrides {
    fn apply(&self, identity: &mut IdentityConfig) {
        if let Some(admins) = &self.admin_certs {
            identity.admins = admins.clone();
        }
        if let Some(signing) = &self.signing_certs {
            identity.signing_certs = signing.clone();
        }
    }
}

/// Source of organization identity material
///
/// Implementations must be safe for concurrent reads. A failure here is
/// fatal to the template that needed the identity.
pub trait CredentialLoader: Send + Sync {
    fn load_identity(
        &self,
        dir: &Path,
        overrides: Option<&CertOverrides>,
        org_id: &str,
    ) -> Result<IdentityConfig, LoadError>;
}

/// Loads identity material from an MSP directory
///
/// Layout: `cacerts/` (required, non-empty), `intermediatecerts/`,
/// `admincerts/`, `tlscacerts/`, `tlsintermediatecerts/`, `signcerts/`.
/// Files in each directory are read in file-name order.
#[derive(Debug, Clone, Copy, Default)]
pub struct MspDirLoader;

impl MspDirLoader {
    fn read_certs(dir: &Path, sub: &str, required: bool) -> Result<Vec<Vec<u8>>, LoadError> {
        let cert_dir = dir.join(sub);
        if !cert_dir.is_dir() {
            if required {
                return Err(LoadError::MissingMaterial(format!(
                    "{} does not exist",
                    cert_dir.display()
                )));
            }
            return Ok(Vec::new());
        }

        let mut certs = Vec::new();
        for entry in WalkDir::new(&cert_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let entry = entry.map_err(|e| {
                LoadError::IoError(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Failed to read {}: {}", cert_dir.display(), e),
                ))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let bytes = std::fs::read(entry.path())?;
            if bytes.is_empty() {
                warn!(path = %entry.path().display(), "Skipping empty certificate file");
                continue;
            }
            certs.push(bytes);
        }

        if required && certs.is_empty() {
            return Err(LoadError::MissingMaterial(format!(
                "{} contains no certificates",
                cert_dir.display()
            )));
        }

        Ok(certs)
    }
}

impl CredentialLoader for MspDirLoader {
    #[instrument(skip(self, dir, overrides), fields(dir = %dir.display()))]
    fn load_identity(
        &self,
        dir: &Path,
        overrides: Option<&CertOverrides>,
        org_id: &str,
    ) -> Result<IdentityConfig, LoadError> {
        if org_id.trim().is_empty() {
            return Err(LoadError::MissingMaterial("organization ID is empty".to_string()));
        }
        if !dir.is_dir() {
            return Err(LoadError::MissingMaterial(format!(
                "MSP directory {} does not exist",
                dir.display()
            )));
        }

        let mut identity = IdentityConfig {
            name: org_id.to_string(),
            root_certs: Self::read_certs(dir, CA_CERTS_DIR, true)?,
            intermediate_certs: Self::read_certs(dir, INTERMEDIATE_CERTS_DIR, false)?,
            admins: Self::read_certs(dir, ADMIN_CERTS_DIR, false)?,
            tls_root_certs: Self::read_certs(dir, TLS_CA_CERTS_DIR, false)?,
            tls_intermediate_certs: Self::read_certs(dir, TLS_INTERMEDIATE_CERTS_DIR, false)?,
            signing_certs: Self::read_certs(dir, SIGN_CERTS_DIR, false)?,
        };

        if let Some(overrides) = overrides {
            overrides.apply(&mut identity);
        }

        debug!(
            org_id,
            root_certs = identity.root_certs.len(),
            admins = identity.admins.len(),
            "Loaded identity material"
        );

        Ok(identity)
    }
}
