//! Configuration group tree
//!
//! A `ConfigGroup` is a named, recursive container of values, policies and
//! sub-groups. Fragments produced by independent templates are merged into a
//! single group with insert-or-conflict semantics: an entry may be declared
//! any number of times as long as every declaration is byte-identical.
//! Ordered maps keep iteration, conflict reporting and encoding deterministic.

use crate::error::{EncodingError, EntryKind, TreeError};
use crate::tree::path::{display_path, lookup_key, normalize_name, normalize_path};
use crate::tree::policy::Policy;
use serde::de::DeserializeOwned;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::btree_map::Entry;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::Arc;

/// Origin label used when an entry carries no attribution
const UNATTRIBUTED: &str = "<unattributed>";

/// Deepest group nesting accepted when decoding, counted from the root
pub const MAX_GROUP_DEPTH: usize = 64;

thread_local! {
    static DECODE_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// A typed, encoded configuration value
///
/// Equality covers the encoded content only; the origin label is provenance
/// for conflict messages and is never encoded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigValue {
    pub version: u64,
    pub mod_policy: String,
    pub value: Vec<u8>,
    #[serde(skip)]
    origin: Option<String>,
}

impl PartialEq for ConfigValue {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.mod_policy == other.mod_policy
            && self.value == other.value
    }
}

impl Eq for ConfigValue {}

impl ConfigValue {
    /// Wrap already-encoded bytes
    pub fn new(value: Vec<u8>) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }

    /// Encode a payload as compact JSON
    ///
    /// Payload structs serialize their fields in declaration order and use
    /// ordered maps, so the bytes are stable for equal payloads.
    pub fn encode<T: Serialize>(payload: &T) -> Result<Self, EncodingError> {
        Ok(Self::new(serde_json::to_vec(payload)?))
    }

    /// Decode the payload back into its typed form
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, EncodingError> {
        Ok(serde_json::from_slice(&self.value)?)
    }

    pub fn with_mod_policy(mut self, mod_policy: &str) -> Self {
        self.mod_policy = mod_policy.to_string();
        self
    }

    pub fn with_origin(mut self, origin: &str) -> Self {
        self.origin = Some(origin.to_string());
        self
    }

    /// Label of the fragment that first declared this value
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }
}

/// A policy entry in the config tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigPolicy {
    pub version: u64,
    pub mod_policy: String,
    pub policy: Policy,
    #[serde(skip)]
    origin: Option<String>,
}

impl PartialEq for ConfigPolicy {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.mod_policy == other.mod_policy
            && self.policy == other.policy
    }
}

impl Eq for ConfigPolicy {}

impl ConfigPolicy {
    pub fn new(policy: Policy) -> Self {
        Self {
            version: 0,
            mod_policy: String::new(),
            policy,
            origin: None,
        }
    }

    pub fn with_mod_policy(mut self, mod_policy: &str) -> Self {
        self.mod_policy = mod_policy.to_string();
        self
    }

    pub fn with_origin(mut self, origin: &str) -> Self {
        self.origin = Some(origin.to_string());
        self
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }
}

/// Configuration group tree node
///
/// A group's name is its key in the parent's `groups` map; the root is the
/// channel group. Mutators fail with [`TreeError::Immutable`] once the group
/// has been sealed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigGroup {
    version: u64,
    mod_policy: String,
    values: BTreeMap<String, ConfigValue>,
    policies: BTreeMap<String, ConfigPolicy>,
    groups: BTreeMap<String, ConfigGroup>,
    #[serde(skip)]
    sealed: bool,
}

impl PartialEq for ConfigGroup {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.mod_policy == other.mod_policy
            && self.values == other.values
            && self.policies == other.policies
            && self.groups == other.groups
    }
}

impl Eq for ConfigGroup {}

impl ConfigGroup {
    /// Create an empty, mutable group
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn mod_policy(&self) -> &str {
        &self.mod_policy
    }

    pub fn values(&self) -> &BTreeMap<String, ConfigValue> {
        &self.values
    }

    pub fn policies(&self) -> &BTreeMap<String, ConfigPolicy> {
        &self.policies
    }

    pub fn groups(&self) -> &BTreeMap<String, ConfigGroup> {
        &self.groups
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
            && self.policies.is_empty()
            && self.groups.is_empty()
            && self.mod_policy.is_empty()
    }

    /// Look up the group at `path`, the root for an empty path
    ///
    /// Lookups normalize names the same way inserts do.
    pub fn group<S: AsRef<str>>(&self, path: &[S]) -> Option<&ConfigGroup> {
        let mut current = self;
        for element in path {
            current = current.groups.get(&lookup_key(element.as_ref()))?;
        }
        Some(current)
    }

    pub fn value<S: AsRef<str>>(&self, path: &[S], key: &str) -> Option<&ConfigValue> {
        self.group(path)?.values.get(&lookup_key(key))
    }

    pub fn policy<S: AsRef<str>>(&self, path: &[S], name: &str) -> Option<&ConfigPolicy> {
        self.group(path)?.policies.get(&lookup_key(name))
    }

    /// Insert a value at `path`, creating intermediate groups as needed
    pub fn set_value<S: AsRef<str>>(
        &mut self,
        path: &[S],
        key: &str,
        value: ConfigValue,
    ) -> Result<(), TreeError> {
        let mut fragment = ConfigGroup::new();
        fragment.values.insert(normalize_name(key)?, value);
        self.merge_at(path, fragment)
    }

    /// Insert a policy at `path`, creating intermediate groups as needed
    pub fn set_policy<S: AsRef<str>>(
        &mut self,
        path: &[S],
        name: &str,
        policy: ConfigPolicy,
    ) -> Result<(), TreeError> {
        let mut fragment = ConfigGroup::new();
        fragment.policies.insert(normalize_name(name)?, policy);
        self.merge_at(path, fragment)
    }

    /// Declare the modification policy of the group at `path`
    pub fn set_mod_policy<S: AsRef<str>>(
        &mut self,
        path: &[S],
        mod_policy: &str,
    ) -> Result<(), TreeError> {
        let fragment = ConfigGroup {
            mod_policy: mod_policy.to_string(),
            ..Default::default()
        };
        self.merge_at(path, fragment)
    }

    /// Merge `fragment` under `path/name`
    ///
    /// Every value, policy and sub-group of the fragment is checked against
    /// the existing destination before anything is written, so a conflicting
    /// fragment leaves this group untouched.
    pub fn set_sub_group<S: AsRef<str>>(
        &mut self,
        path: &[S],
        name: &str,
        fragment: ConfigGroup,
    ) -> Result<(), TreeError> {
        let mut full_path = normalize_path(path)?;
        full_path.push(normalize_name(name)?);
        self.merge_at(&full_path, fragment)
    }

    /// Merge a fragment rooted at the same level as this group
    pub fn merge(&mut self, fragment: ConfigGroup) -> Result<(), TreeError> {
        self.ensure_mutable()?;
        let mut trail = Vec::new();
        self.find_conflict(&fragment, &mut trail)?;
        self.absorb(fragment);
        Ok(())
    }

    /// Stamp `origin` on every value and policy that has no attribution yet
    pub fn attribute(&mut self, origin: &str) {
        for value in self.values.values_mut() {
            if value.origin.is_none() {
                value.origin = Some(origin.to_string());
            }
        }
        for policy in self.policies.values_mut() {
            if policy.origin.is_none() {
                policy.origin = Some(origin.to_string());
            }
        }
        for group in self.groups.values_mut() {
            group.attribute(origin);
        }
    }

    /// Seal the tree and hand out a shared read-only view
    pub fn freeze(mut self) -> SealedGroup {
        self.set_sealed(true);
        SealedGroup(Arc::new(self))
    }

    fn merge_at<S: AsRef<str>>(&mut self, path: &[S], fragment: ConfigGroup) -> Result<(), TreeError> {
        self.ensure_mutable()?;
        let path = normalize_path(path)?;
        let wrapped = path.into_iter().rev().fold(fragment, |inner, name| {
            let mut outer = ConfigGroup::new();
            outer.groups.insert(name, inner);
            outer
        });
        self.merge(wrapped)
    }

    fn ensure_mutable(&self) -> Result<(), TreeError> {
        if self.sealed {
            let root: [&str; 0] = [];
            return Err(TreeError::Immutable {
                path: display_path(&root),
            });
        }
        Ok(())
    }

    fn set_sealed(&mut self, sealed: bool) {
        self.sealed = sealed;
        for group in self.groups.values_mut() {
            group.set_sealed(sealed);
        }
    }

    /// Find the first entry (in key order) where `other` disagrees with `self`
    fn find_conflict(&self, other: &ConfigGroup, trail: &mut Vec<String>) -> Result<(), TreeError> {
        if !self.mod_policy.is_empty()
            && !other.mod_policy.is_empty()
            && self.mod_policy != other.mod_policy
        {
            return Err(TreeError::Conflict {
                path: display_path(trail.as_slice()),
                key: "mod_policy".to_string(),
                kind: EntryKind::ModPolicy,
                existing: self.mod_policy.clone(),
                incoming: other.mod_policy.clone(),
            });
        }

        for (key, incoming) in &other.values {
            if let Some(existing) = self.values.get(key) {
                if existing != incoming {
                    return Err(TreeError::Conflict {
                        path: display_path(trail.as_slice()),
                        key: key.clone(),
                        kind: EntryKind::Value,
                        existing: existing.origin().unwrap_or(UNATTRIBUTED).to_string(),
                        incoming: incoming.origin().unwrap_or(UNATTRIBUTED).to_string(),
                    });
                }
            }
        }

        for (name, incoming) in &other.policies {
            if let Some(existing) = self.policies.get(name) {
                if existing != incoming {
                    return Err(TreeError::Conflict {
                        path: display_path(trail.as_slice()),
                        key: name.clone(),
                        kind: EntryKind::Policy,
                        existing: existing.origin().unwrap_or(UNATTRIBUTED).to_string(),
                        incoming: incoming.origin().unwrap_or(UNATTRIBUTED).to_string(),
                    });
                }
            }
        }

        for (name, incoming) in &other.groups {
            if let Some(existing) = self.groups.get(name) {
                trail.push(name.clone());
                existing.find_conflict(incoming, trail)?;
                trail.pop();
            }
        }

        Ok(())
    }

    /// Move every entry of a conflict-free fragment into `self`
    fn absorb(&mut self, other: ConfigGroup) {
        if self.mod_policy.is_empty() {
            self.mod_policy = other.mod_policy;
        }
        self.version = self.version.max(other.version);

        for (key, value) in other.values {
            self.values.entry(key).or_insert(value);
        }
        for (name, policy) in other.policies {
            self.policies.entry(name).or_insert(policy);
        }
        for (name, group) in other.groups {
            match self.groups.entry(name) {
                Entry::Occupied(mut existing) => existing.get_mut().absorb(group),
                Entry::Vacant(slot) => {
                    let mut child = ConfigGroup::new();
                    child.absorb(group);
                    slot.insert(child);
                }
            }
        }
    }
}

/// A sealed, shareable config tree
///
/// Clones share the same allocation. Copies taken with `ConfigGroup::clone`
/// through `Deref` stay sealed; use [`SealedGroup::to_unsealed`] to start a new
/// editable tree from this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedGroup(Arc<ConfigGroup>);

impl SealedGroup {
    /// Editable deep copy of the sealed tree
    pub fn to_unsealed(&self) -> ConfigGroup {
        let mut group = self.0.as_ref().clone();
        group.set_sealed(false);
        group
    }

    pub fn as_group(&self) -> &ConfigGroup {
        &self.0
    }
}

impl Deref for SealedGroup {
    type Target = ConfigGroup;

    fn deref(&self) -> &ConfigGroup {
        &self.0
    }
}

impl Serialize for SealedGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.as_ref().serialize(serializer)
    }
}

/// Wire shape of a group; field order matches the `Serialize` derive
#[derive(Deserialize)]
#[serde(rename = "ConfigGroup")]
struct GroupRecord {
    version: u64,
    mod_policy: String,
    values: BTreeMap<String, ConfigValue>,
    policies: BTreeMap<String, ConfigPolicy>,
    groups: BTreeMap<String, ConfigGroup>,
}

/// Nesting level of the group currently being decoded on this thread
struct DepthGuard;

impl DepthGuard {
    fn enter() -> Option<Self> {
        DECODE_DEPTH.with(|depth| {
            let current = depth.get();
            if current > MAX_GROUP_DEPTH {
                return None;
            }
            depth.set(current + 1);
            Some(DepthGuard)
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DECODE_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

impl<'de> Deserialize<'de> for ConfigGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let _guard = DepthGuard::enter().ok_or_else(|| {
            D::Error::custom(format!(
                "config groups nested deeper than {} levels",
                MAX_GROUP_DEPTH
            ))
        })?;
        let record = GroupRecord::deserialize(deserializer)?;
        Ok(Self {
            version: record.version,
            mod_policy: record.mod_policy,
            values: record.values,
            policies: record.policies,
            groups: record.groups,
            sealed: false,
        })
    }
}

impl<'de> Deserialize<'de> for SealedGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ConfigGroup::deserialize(deserializer).map(ConfigGroup::freeze)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::policy::ImplicitMetaRule;

    fn value(bytes: &[u8], origin: &str) -> ConfigValue {
        ConfigValue::new(bytes.to_vec()).with_origin(origin)
    }

    #[test]
    fn test_set_value_creates_intermediate_groups() {
        let mut group = ConfigGroup::new();
        group
            .set_value(&["Application", "OrgA"], "MSP", value(b"a", "org-a"))
            .unwrap();

        assert!(group.group(&["Application"]).is_some());
        assert_eq!(
            group.value(&["Application", "OrgA"], "MSP").unwrap().value,
            b"a".to_vec()
        );
    }

    #[test]
    fn test_conflicting_value_rejected() {
        let mut group = ConfigGroup::new();
        group
            .set_value(&["Application", "OrgA"], "MSP", value(b"a", "org-a"))
            .unwrap();

        let err = group
            .set_value(&["Application", "OrgA"], "MSP", value(b"b", "org-b"))
            .unwrap_err();

        match err {
            TreeError::Conflict {
                path,
                key,
                kind,
                existing,
                incoming,
            } => {
                assert_eq!(path, "/Application/OrgA");
                assert_eq!(key, "MSP");
                assert_eq!(kind, EntryKind::Value);
                assert_eq!(existing, "org-a");
                assert_eq!(incoming, "org-b");
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_identical_redeclaration_allowed() {
        let mut group = ConfigGroup::new();
        group.set_value(&["Orderer"], "BatchSize", value(b"10", "one")).unwrap();
        group.set_value(&["Orderer"], "BatchSize", value(b"10", "two")).unwrap();

        // First declaration keeps its attribution
        let stored = group.value(&["Orderer"], "BatchSize").unwrap();
        assert_eq!(stored.origin(), Some("one"));
    }

    #[test]
    fn test_conflicting_sub_group_leaves_destination_untouched() {
        let mut group = ConfigGroup::new();
        group.set_value(&["Orderer"], "BatchSize", value(b"10", "one")).unwrap();

        let mut fragment = ConfigGroup::new();
        fragment.set_value(&["OrgB"], "MSP", value(b"b", "two")).unwrap();
        let root: [&str; 0] = [];
        fragment.set_value(&root, "BatchSize", value(b"20", "two")).unwrap();

        let err = group.set_sub_group(&root, "Orderer", fragment).unwrap_err();
        assert!(matches!(err, TreeError::Conflict { .. }));
        assert!(group.group(&["Orderer", "OrgB"]).is_none());
    }

    #[test]
    fn test_mod_policy_conflict() {
        let mut group = ConfigGroup::new();
        group.set_mod_policy(&["Orderer"], "Admins").unwrap();
        group.set_mod_policy(&["Orderer"], "Admins").unwrap();

        let err = group.set_mod_policy(&["Orderer"], "Writers").unwrap_err();
        assert!(matches!(
            err,
            TreeError::Conflict {
                kind: EntryKind::ModPolicy,
                ..
            }
        ));
    }

    #[test]
    fn test_policy_conflict() {
        let mut group = ConfigGroup::new();
        let any = ConfigPolicy::new(Policy::implicit_meta("Readers", ImplicitMetaRule::Any));
        let all = ConfigPolicy::new(Policy::implicit_meta("Readers", ImplicitMetaRule::All));

        group.set_policy(&["Orderer"], "Readers", any.clone()).unwrap();
        group.set_policy(&["Orderer"], "Readers", any).unwrap();
        assert!(group.set_policy(&["Orderer"], "Readers", all).is_err());
    }

    #[test]
    fn test_merge_order_independent() {
        let mut a = ConfigGroup::new();
        a.set_value(&["Application", "OrgA"], "MSP", value(b"a", "a")).unwrap();
        let mut b = ConfigGroup::new();
        b.set_value(&["Application", "OrgB"], "MSP", value(b"b", "b")).unwrap();
        b.set_mod_policy(&["Application"], "Admins").unwrap();

        let mut ab = ConfigGroup::new();
        ab.merge(a.clone()).unwrap();
        ab.merge(b.clone()).unwrap();

        let mut ba = ConfigGroup::new();
        ba.merge(b).unwrap();
        ba.merge(a).unwrap();

        assert_eq!(ab, ba);
        assert_eq!(bincode::serialize(&ab).unwrap(), bincode::serialize(&ba).unwrap());
    }

    #[test]
    fn test_frozen_copies_reject_mutation() {
        let mut group = ConfigGroup::new();
        group.set_value(&["Orderer"], "BatchSize", value(b"10", "one")).unwrap();
        let sealed = group.freeze();
        assert!(sealed.is_sealed());

        let mut copy = sealed.as_group().clone();
        let err = copy
            .set_value(&["Orderer"], "BatchTimeout", value(b"2s", "two"))
            .unwrap_err();
        assert!(matches!(err, TreeError::Immutable { .. }));

        let mut editable = sealed.to_unsealed();
        editable
            .set_value(&["Orderer"], "BatchTimeout", value(b"2s", "two"))
            .unwrap();
        assert!(sealed.value(&["Orderer"], "BatchTimeout").is_none());
    }

    #[test]
    fn test_invalid_key_rejected() {
        let mut group = ConfigGroup::new();
        let err = group
            .set_value(&["Orderer"], "Batch/Size", value(b"10", "one"))
            .unwrap_err();
        assert!(matches!(err, TreeError::InvalidName { .. }));
        assert!(group.is_empty());
    }

    fn nested(depth: usize) -> ConfigGroup {
        let path: Vec<String> = (0..depth).map(|i| format!("G{}", i)).collect();
        let mut group = ConfigGroup::new();
        group.set_value(&path, "Leaf", value(b"x", "deep")).unwrap();
        group
    }

    #[test]
    fn test_decode_accepts_max_depth() {
        let bytes = bincode::serialize(&nested(MAX_GROUP_DEPTH)).unwrap();
        let decoded: ConfigGroup = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, nested(MAX_GROUP_DEPTH));
    }

    #[test]
    fn test_decode_rejects_excessive_depth() {
        let bytes = bincode::serialize(&nested(MAX_GROUP_DEPTH + 1)).unwrap();
        let err = bincode::deserialize::<ConfigGroup>(&bytes).unwrap_err();
        assert!(err.to_string().contains("nested deeper"));

        // The depth counter unwinds after a failed decode
        let bytes = bincode::serialize(&nested(3)).unwrap();
        assert!(bincode::deserialize::<ConfigGroup>(&bytes).is_ok());
    }

    #[test]
    fn test_lookup_normalizes_names() {
        let mut group = ConfigGroup::new();
        group
            .set_value(&["caf\u{e9}"], "cl\u{e9}", value(b"1", "one"))
            .unwrap();

        assert!(group.group(&["cafe\u{301}"]).is_some());
        assert!(group.value(&["cafe\u{301}"], "cle\u{301}").is_some());
        assert!(group.value(&["caf\u{e9}"], "cl\u{e9}").is_some());
    }

    #[test]
    fn test_sealed_roundtrip_through_bincode_stays_sealed() {
        let mut group = ConfigGroup::new();
        group.set_value(&["Orderer"], "BatchSize", value(b"10", "one")).unwrap();
        let sealed = group.freeze();

        let bytes = bincode::serialize(&sealed).unwrap();
        let decoded: SealedGroup = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, sealed);
        assert!(decoded.is_sealed());
    }
}
