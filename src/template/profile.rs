//! Profile-derived template
//!
//! Maps a [`Profile`] onto the fixed channel layout:
//!
//! ```text
//! /                      HashingAlgorithm, BlockDataHashingStructure,
//!                        OrdererAddresses, [Capabilities], [Consortium]
//! /Orderer               ConsensusType, BatchSize, BatchTimeout,
//!                        ChannelRestrictions, [Capabilities], [KafkaBrokers]
//! /Orderer/<org>         one empty group per orderer organization
//! /Application/<org>     when the profile has an application section
//! /Consortiums/<c>/<org> when the profile defines consortiums
//! ```
//!
//! Every group carries Readers/Writers (ANY) and Admins (MAJORITY) implicit
//! meta policies; the orderer group also carries BlockValidation.

use crate::error::TemplateError;
use crate::keys::*;
use crate::profile::Profile;
use crate::template::Template;
use crate::tree::{ConfigGroup, ConfigPolicy, ConfigValue, ImplicitMetaRule, Policy};
use crate::values::*;
use serde::Serialize;
use tracing::debug;

/// Template producing the channel and orderer layout of one profile
#[derive(Debug, Clone)]
pub struct ProfileTemplate {
    profile: Profile,
}

impl ProfileTemplate {
    pub fn new(profile: Profile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    fn origin(&self) -> String {
        format!("profile:{}", self.profile.name)
    }
}

fn admin_value<T: Serialize>(payload: &T) -> Result<ConfigValue, TemplateError> {
    Ok(ConfigValue::encode(payload)?.with_mod_policy(ADMINS_POLICY_KEY))
}

fn admin_policy(policy: Policy) -> ConfigPolicy {
    ConfigPolicy::new(policy).with_mod_policy(ADMINS_POLICY_KEY)
}

/// Readers, Writers and Admins aggregated from the child groups
fn set_implicit_policies(group: &mut ConfigGroup, path: &[&str]) -> Result<(), TemplateError> {
    for (name, rule) in [
        (READERS_POLICY_KEY, ImplicitMetaRule::Any),
        (WRITERS_POLICY_KEY, ImplicitMetaRule::Any),
        (ADMINS_POLICY_KEY, ImplicitMetaRule::Majority),
    ] {
        group.set_policy(path, name, admin_policy(Policy::implicit_meta(name, rule)))?;
    }
    group.set_mod_policy(path, ADMINS_POLICY_KEY)?;
    Ok(())
}

fn set_organizations(
    group: &mut ConfigGroup,
    path: &[&str],
    organizations: &[String],
) -> Result<(), TemplateError> {
    for org in organizations {
        let mut org_path = path.to_vec();
        org_path.push(org);
        group.set_mod_policy(&org_path, ADMINS_POLICY_KEY)?;
    }
    Ok(())
}

impl Template for ProfileTemplate {
    fn produce(&self) -> Result<ConfigGroup, TemplateError> {
        let profile = &self.profile;
        profile
            .validate()
            .map_err(|reason| TemplateError::InvalidProfile(format!("{}: {}", profile.name, reason)))?;
        let orderer = profile.orderer.as_ref().ok_or_else(|| {
            TemplateError::InvalidProfile(format!("{}: profile has no orderer section", profile.name))
        })?;

        let mut group = ConfigGroup::new();

        // Channel
        let channel: [&str; 0] = [];
        group.set_value(
            &channel,
            HASHING_ALGORITHM_KEY,
            admin_value(&HashingAlgorithm {
                name: profile.hashing_algorithm.clone(),
            })?,
        )?;
        group.set_value(
            &channel,
            BLOCK_DATA_HASHING_STRUCTURE_KEY,
            admin_value(&BlockDataHashingStructure {
                width: profile.block_data_hashing_width,
            })?,
        )?;
        group.set_value(
            &channel,
            ORDERER_ADDRESSES_KEY,
            admin_value(&OrdererAddresses {
                addresses: orderer.addresses.clone(),
            })?,
        )?;
        let capabilities = profile.enabled_capabilities();
        if !capabilities.is_empty() {
            group.set_value(
                &channel,
                CAPABILITIES_KEY,
                admin_value(&Capabilities { names: capabilities })?,
            )?;
        }
        if let Some(consortium) = &profile.consortium {
            group.set_value(
                &channel,
                CONSORTIUM_KEY,
                admin_value(&Consortium {
                    name: consortium.clone(),
                })?,
            )?;
        }
        set_implicit_policies(&mut group, &channel)?;

        // Orderer
        let orderer_path = [ORDERER_GROUP_KEY];
        group.set_value(
            &orderer_path,
            CONSENSUS_TYPE_KEY,
            admin_value(&ConsensusType {
                kind: orderer.orderer_type.clone(),
            })?,
        )?;
        group.set_value(&orderer_path, BATCH_SIZE_KEY, admin_value(&orderer.batch_size)?)?;
        group.set_value(
            &orderer_path,
            BATCH_TIMEOUT_KEY,
            admin_value(&BatchTimeout {
                timeout_ms: orderer.batch_timeout_ms,
            })?,
        )?;
        group.set_value(
            &orderer_path,
            CHANNEL_RESTRICTIONS_KEY,
            admin_value(&ChannelRestrictions {
                max_count: orderer.max_channels,
            })?,
        )?;
        let capabilities = orderer.enabled_capabilities();
        if !capabilities.is_empty() {
            group.set_value(
                &orderer_path,
                CAPABILITIES_KEY,
                admin_value(&Capabilities { names: capabilities })?,
            )?;
        }
        if orderer.orderer_type == "kafka" {
            group.set_value(
                &orderer_path,
                KAFKA_BROKERS_KEY,
                admin_value(&KafkaBrokers {
                    brokers: orderer.kafka_brokers.clone(),
                })?,
            )?;
        }
        set_implicit_policies(&mut group, &orderer_path)?;
        group.set_policy(
            &orderer_path,
            BLOCK_VALIDATION_POLICY_KEY,
            admin_policy(Policy::implicit_meta(WRITERS_POLICY_KEY, ImplicitMetaRule::Any)),
        )?;
        set_organizations(&mut group, &orderer_path, &orderer.organizations)?;

        // Application
        if let Some(application) = &profile.application {
            let application_path = [APPLICATION_GROUP_KEY];
            let capabilities = application.enabled_capabilities();
            if !capabilities.is_empty() {
                group.set_value(
                    &application_path,
                    CAPABILITIES_KEY,
                    admin_value(&Capabilities { names: capabilities })?,
                )?;
            }
            set_implicit_policies(&mut group, &application_path)?;
            set_organizations(&mut group, &application_path, &application.organizations)?;
        }

        // Consortiums
        if !profile.consortiums.is_empty() {
            let consortiums_path = [CONSORTIUMS_GROUP_KEY];
            group.set_mod_policy(&consortiums_path, ADMINS_POLICY_KEY)?;
            group.set_policy(
                &consortiums_path,
                ACCEPT_ALL_POLICY_KEY,
                admin_policy(Policy::accept_all()),
            )?;
            group.set_policy(
                &consortiums_path,
                ADMINS_POLICY_KEY,
                admin_policy(Policy::accept_all()),
            )?;
            for (name, consortium) in &profile.consortiums {
                let consortium_path = [CONSORTIUMS_GROUP_KEY, name.as_str()];
                group.set_mod_policy(&consortium_path, ADMINS_POLICY_KEY)?;
                set_organizations(&mut group, &consortium_path, &consortium.organizations)?;
            }
        }

        group.attribute(&self.origin());
        debug!(profile = %profile.name, "Produced profile fragment");
        Ok(group)
    }
}
