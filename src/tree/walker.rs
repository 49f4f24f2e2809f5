//! Depth-first traversal of a config tree

use crate::tree::group::ConfigGroup;
use crate::types::ConfigPath;

/// Config tree entry types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A group, identified by its path from the root
    Group { path: ConfigPath },
    /// A value with the size of its encoded bytes
    Value {
        path: ConfigPath,
        key: String,
        size: usize,
    },
    /// A policy entry
    Policy { path: ConfigPath, name: String },
}

impl Entry {
    pub fn path(&self) -> &ConfigPath {
        match self {
            Entry::Group { path } | Entry::Value { path, .. } | Entry::Policy { path, .. } => path,
        }
    }

    /// Rendered location: `/A/B` for groups, `/A/B:Key` for values, `/A/B#Name` for policies
    pub fn location(&self) -> String {
        let base = crate::tree::path::display_path(self.path());
        match self {
            Entry::Group { .. } => base,
            Entry::Value { key, .. } => format!("{}:{}", base.trim_end_matches('/'), key),
            Entry::Policy { name, .. } => format!("{}#{}", base.trim_end_matches('/'), name),
        }
    }
}

/// Config tree walker configuration
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Skip value entries
    pub groups_only: bool,
    /// Maximum group depth to descend (None = unlimited)
    pub max_depth: Option<usize>,
}

/// Config tree walker
pub struct Walker<'a> {
    root: &'a ConfigGroup,
    config: WalkerConfig,
}

impl<'a> Walker<'a> {
    pub fn new(root: &'a ConfigGroup) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    pub fn with_config(root: &'a ConfigGroup, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Walk the tree and collect all entries
    ///
    /// Each group is listed before its values, policies and sub-groups; all
    /// siblings come out in key order, so the listing is deterministic.
    pub fn walk(&self) -> Vec<Entry> {
        let mut entries = Vec::new();
        let mut path = Vec::new();
        self.visit(self.root, &mut path, &mut entries);
        entries
    }

    fn visit(&self, group: &ConfigGroup, path: &mut ConfigPath, entries: &mut Vec<Entry>) {
        entries.push(Entry::Group { path: path.clone() });

        if !self.config.groups_only {
            for (key, value) in group.values() {
                entries.push(Entry::Value {
                    path: path.clone(),
                    key: key.clone(),
                    size: value.value.len(),
                });
            }
            for name in group.policies().keys() {
                entries.push(Entry::Policy {
                    path: path.clone(),
                    name: name.clone(),
                });
            }
        }

        if let Some(max_depth) = self.config.max_depth {
            if path.len() >= max_depth {
                return;
            }
        }

        for (name, child) in group.groups() {
            path.push(name.clone());
            self.visit(child, path, entries);
            path.pop();
        }
    }
}

impl ConfigGroup {
    /// Depth-first listing of every group, value and policy
    pub fn walk(&self) -> Vec<Entry> {
        Walker::new(self).walk()
    }
}
