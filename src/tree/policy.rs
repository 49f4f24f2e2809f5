//! Policy references stored in the config tree
//!
//! Policies are carried structurally only; nothing in this crate evaluates them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a principal must hold within its MSP
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MspRole {
    Member,
    Admin,
}

impl fmt::Display for MspRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MspRole::Member => write!(f, "member"),
            MspRole::Admin => write!(f, "admin"),
        }
    }
}

/// An MSP identity class named by a signature policy
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Principal {
    pub msp_id: String,
    pub role: MspRole,
}

/// Aggregation rule for implicit meta policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImplicitMetaRule {
    Any,
    All,
    Majority,
}

impl fmt::Display for ImplicitMetaRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImplicitMetaRule::Any => write!(f, "ANY"),
            ImplicitMetaRule::All => write!(f, "ALL"),
            ImplicitMetaRule::Majority => write!(f, "MAJORITY"),
        }
    }
}

/// Policy body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Policy {
    /// Satisfied by `n` signatures from the listed principals
    Signature { n: u32, principals: Vec<Principal> },
    /// Aggregates the same-named sub-policy of every child group
    ImplicitMeta {
        sub_policy: String,
        rule: ImplicitMetaRule,
    },
}

impl Policy {
    pub fn signed_by(principal: Principal) -> Self {
        Policy::Signature {
            n: 1,
            principals: vec![principal],
        }
    }

    /// Zero-of-none signature rule, satisfied by any request
    pub fn accept_all() -> Self {
        Policy::Signature {
            n: 0,
            principals: Vec::new(),
        }
    }

    pub fn implicit_meta(sub_policy: &str, rule: ImplicitMetaRule) -> Self {
        Policy::ImplicitMeta {
            sub_policy: sub_policy.to_string(),
            rule,
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Signature { n, principals } => {
                let names: Vec<String> = principals
                    .iter()
                    .map(|p| format!("{}.{}", p.msp_id, p.role))
                    .collect();
                write!(f, "OutOf({}, {})", n, names.join(", "))
            }
            Policy::ImplicitMeta { sub_policy, rule } => write!(f, "{} {}", rule, sub_policy),
        }
    }
}
