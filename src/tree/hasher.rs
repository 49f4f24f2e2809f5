//! Structural hashing of config trees using BLAKE3

use crate::tree::group::{ConfigGroup, ConfigPolicy, ConfigValue};
use crate::tree::policy::Policy;
use crate::types::Hash;
use blake3::Hasher;

/// Compute the hash of a config value
///
/// ValueHash = hash("value" || version || mod_policy || value_len || value)
pub fn compute_value_hash(value: &ConfigValue) -> Hash {
    let mut hasher = Hasher::new();

    hasher.update(b"value");
    hasher.update(&value.version.to_be_bytes());
    update_str(&mut hasher, &value.mod_policy);
    hasher.update(&(value.value.len() as u64).to_be_bytes());
    hasher.update(&value.value);

    *hasher.finalize().as_bytes()
}

/// Compute the hash of a policy entry
pub fn compute_policy_hash(policy: &ConfigPolicy) -> Hash {
    let mut hasher = Hasher::new();

    hasher.update(b"policy");
    hasher.update(&policy.version.to_be_bytes());
    update_str(&mut hasher, &policy.mod_policy);

    match &policy.policy {
        Policy::Signature { n, principals } => {
            hasher.update(b"signature");
            hasher.update(&n.to_be_bytes());
            hasher.update(&(principals.len() as u64).to_be_bytes());
            for principal in principals {
                update_str(&mut hasher, &principal.msp_id);
                update_str(&mut hasher, &principal.role.to_string());
            }
        }
        Policy::ImplicitMeta { sub_policy, rule } => {
            hasher.update(b"implicit_meta");
            update_str(&mut hasher, sub_policy);
            update_str(&mut hasher, &rule.to_string());
        }
    }

    *hasher.finalize().as_bytes()
}

/// Compute the hash of a group and everything below it
///
/// GroupHash = hash("group" || version || mod_policy || values || policies || groups)
///
/// Each section is prefixed with its entry count and lists `name:hash` pairs
/// in key order, so equal trees hash equally regardless of how they were built.
pub fn compute_group_hash(group: &ConfigGroup) -> Hash {
    let mut hasher = Hasher::new();

    hasher.update(b"group");
    hasher.update(&group.version().to_be_bytes());
    update_str(&mut hasher, group.mod_policy());

    hasher.update(&(group.values().len() as u64).to_be_bytes());
    for (key, value) in group.values() {
        update_str(&mut hasher, key);
        hasher.update(&compute_value_hash(value));
    }

    hasher.update(&(group.policies().len() as u64).to_be_bytes());
    for (name, policy) in group.policies() {
        update_str(&mut hasher, name);
        hasher.update(&compute_policy_hash(policy));
    }

    hasher.update(&(group.groups().len() as u64).to_be_bytes());
    for (name, child) in group.groups() {
        update_str(&mut hasher, name);
        hasher.update(&compute_group_hash(child));
    }

    *hasher.finalize().as_bytes()
}

/// Compute a generic hash of arbitrary data
pub fn compute_hash(data: &[u8]) -> Hash {
    let mut hasher = Hasher::new();
    hasher.update(data);
    *hasher.finalize().as_bytes()
}

// Length-prefixed so adjacent strings cannot be re-split into the same bytes
fn update_str(hasher: &mut Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_be_bytes());
    hasher.update(s.as_bytes());
}
