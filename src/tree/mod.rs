//! Configuration Group Tree
//!
//! The hierarchical container that template fragments are merged into, plus
//! deterministic hashing and traversal over it.

pub mod group;
pub mod hasher;
pub mod path;
pub mod policy;
pub mod walker;

pub use group::{ConfigGroup, ConfigPolicy, ConfigValue, SealedGroup};
pub use policy::{ImplicitMetaRule, MspRole, Policy, Principal};
