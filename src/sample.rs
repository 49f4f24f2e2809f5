//! Sample network scaffolding
//!
//! [`SampleConfig`] is computed once by the entry point, from an explicit
//! [`Environment`] snapshot, and carries the resolved sample MSP directory
//! plus the loaders used to build the sample templates.

use crate::error::BootstrapError;
use crate::genesis::{Block, GenesisFactory};
use crate::identity::{CredentialLoader, MspDirLoader};
use crate::keys::{APPLICATION_GROUP_KEY, ORDERER_GROUP_KEY};
use crate::profile::{ProfileLoader, SampleProfiles, SAMPLE_INSECURE_SOLO};
use crate::resolve::{dir_exists, resolve_sample_msp_path, Environment};
use crate::template::{CompositeTemplate, MspTemplate, ProfileTemplate, Template};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Organization ID used for the sample MSP
pub const SAMPLE_ORG_ID: &str = "DEFAULT";

/// Resolved inputs of the sample templates
#[derive(Clone)]
pub struct SampleConfig {
    msp_dir: PathBuf,
    profile: String,
    org_id: String,
    profiles: Arc<dyn ProfileLoader>,
    credentials: Arc<dyn CredentialLoader>,
}

impl fmt::Debug for SampleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampleConfig")
            .field("msp_dir", &self.msp_dir)
            .field("profile", &self.profile)
            .field("org_id", &self.org_id)
            .finish_non_exhaustive()
    }
}

impl SampleConfig {
    /// Sample config rooted at an explicit MSP directory
    pub fn new(msp_dir: PathBuf) -> Self {
        Self {
            msp_dir,
            profile: SAMPLE_INSECURE_SOLO.to_string(),
            org_id: SAMPLE_ORG_ID.to_string(),
            profiles: Arc::new(SampleProfiles),
            credentials: Arc::new(MspDirLoader),
        }
    }

    /// Locate the sample MSP directory from `env`
    ///
    /// Fails with [`BootstrapError::Resolve`] when no candidate exists.
    pub fn discover(env: &Environment) -> Result<Self, BootstrapError> {
        let found = resolve_sample_msp_path(env, dir_exists)?;
        let msp_dir = dunce::canonicalize(&found)?;
        info!(msp_dir = %msp_dir.display(), "Resolved sample MSP directory");
        Ok(Self::new(msp_dir))
    }

    pub fn with_profile(mut self, profile: &str) -> Self {
        self.profile = profile.to_string();
        self
    }

    pub fn with_org_id(mut self, org_id: &str) -> Self {
        self.org_id = org_id.to_string();
        self
    }

    pub fn with_profile_loader(mut self, profiles: Arc<dyn ProfileLoader>) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn with_credential_loader(mut self, credentials: Arc<dyn CredentialLoader>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn msp_dir(&self) -> &Path {
        &self.msp_dir
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn org_id(&self) -> &str {
        &self.org_id
    }

    /// Channel and orderer layout of the configured profile
    pub fn orderer_template(&self) -> Result<Arc<dyn Template>, BootstrapError> {
        let profile = self.profiles.load(&self.profile)?;
        Ok(Arc::new(ProfileTemplate::new(profile)))
    }

    /// Sample organization as an application member
    pub fn application_org_template(&self) -> Result<Arc<dyn Template>, BootstrapError> {
        self.org_template(APPLICATION_GROUP_KEY)
    }

    /// Sample organization as an orderer member
    pub fn orderer_org_template(&self) -> Result<Arc<dyn Template>, BootstrapError> {
        self.org_template(ORDERER_GROUP_KEY)
    }

    fn org_template(&self, section: &str) -> Result<Arc<dyn Template>, BootstrapError> {
        let identity = self
            .credentials
            .load_identity(&self.msp_dir, None, &self.org_id)?;
        Ok(Arc::new(MspTemplate::new(
            &[section, self.org_id.as_str()],
            identity,
        )))
    }

    /// Orderer layout plus the sample organization in both sections
    pub fn composite_template(&self) -> Result<Arc<dyn Template>, BootstrapError> {
        Ok(Arc::new(CompositeTemplate::new(vec![
            self.orderer_template()?,
            self.application_org_template()?,
            self.orderer_org_template()?,
        ])))
    }

    /// Genesis block of the sample network for `channel_id`
    pub fn make_genesis_block(&self, channel_id: &str) -> Result<Block, BootstrapError> {
        let factory = GenesisFactory::new(self.composite_template()?);
        Ok(factory.block(channel_id)?)
    }
}
