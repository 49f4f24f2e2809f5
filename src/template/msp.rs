//! Organization identity template

use crate::error::TemplateError;
use crate::identity::IdentityConfig;
use crate::keys::{ADMINS_POLICY_KEY, MSP_KEY, READERS_POLICY_KEY, WRITERS_POLICY_KEY};
use crate::template::Template;
use crate::tree::{ConfigGroup, ConfigPolicy, ConfigValue, MspRole, Policy, Principal};

/// Template placing an organization's identity material at a group path
///
/// Produces the `MSP` value plus Readers/Writers (any member) and Admins
/// (any admin) signature policies naming the organization's MSP id.
#[derive(Debug, Clone)]
pub struct MspTemplate {
    path: Vec<String>,
    identity: IdentityConfig,
}

impl MspTemplate {
    pub fn new<S: AsRef<str>>(path: &[S], identity: IdentityConfig) -> Self {
        Self {
            path: path.iter().map(|s| s.as_ref().to_string()).collect(),
            identity,
        }
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn identity(&self) -> &IdentityConfig {
        &self.identity
    }

    fn signed_by(&self, role: MspRole) -> ConfigPolicy {
        ConfigPolicy::new(Policy::signed_by(Principal {
            msp_id: self.identity.msp_id().to_string(),
            role,
        }))
        .with_mod_policy(ADMINS_POLICY_KEY)
    }
}

impl Template for MspTemplate {
    fn produce(&self) -> Result<ConfigGroup, TemplateError> {
        if self.path.is_empty() {
            return Err(TemplateError::InvalidFragment(
                "identity material cannot be placed at the channel root".to_string(),
            ));
        }

        let mut group = ConfigGroup::new();
        let value = ConfigValue::encode(&self.identity)?.with_mod_policy(ADMINS_POLICY_KEY);
        group.set_value(&self.path, MSP_KEY, value)?;
        group.set_policy(&self.path, READERS_POLICY_KEY, self.signed_by(MspRole::Member))?;
        group.set_policy(&self.path, WRITERS_POLICY_KEY, self.signed_by(MspRole::Member))?;
        group.set_policy(&self.path, ADMINS_POLICY_KEY, self.signed_by(MspRole::Admin))?;
        group.set_mod_policy(&self.path, ADMINS_POLICY_KEY)?;

        group.attribute(&format!("msp:{}", self.identity.msp_id()));
        Ok(group)
    }
}
