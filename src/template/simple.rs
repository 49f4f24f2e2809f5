//! Simple template: a fixed list of declarations

use crate::error::TemplateError;
use crate::template::Template;
use crate::tree::{ConfigGroup, ConfigPolicy, ConfigValue};

#[derive(Debug, Clone)]
enum Declaration {
    Value {
        path: Vec<String>,
        key: String,
        value: ConfigValue,
    },
    Policy {
        path: Vec<String>,
        name: String,
        policy: ConfigPolicy,
    },
    Group {
        path: Vec<String>,
        name: String,
        fragment: ConfigGroup,
    },
    ModPolicy {
        path: Vec<String>,
        mod_policy: String,
    },
}

/// Template that replays a list of value, policy and sub-group declarations
///
/// Declarations are validated when the fragment is produced, so a bad path
/// element or key surfaces as [`TemplateError::InvalidFragment`] from
/// `produce`.
#[derive(Debug, Clone, Default)]
pub struct SimpleTemplate {
    declarations: Vec<Declaration>,
    origin: Option<String>,
}

fn owned_path<S: AsRef<str>>(path: &[S]) -> Vec<String> {
    path.iter().map(|s| s.as_ref().to_string()).collect()
}

impl SimpleTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Template declaring exactly one value
    pub fn from_value<S: AsRef<str>>(path: &[S], key: &str, value: ConfigValue) -> Self {
        Self::new().value(path, key, value)
    }

    /// Template declaring exactly one sub-group
    pub fn from_group<S: AsRef<str>>(path: &[S], name: &str, fragment: ConfigGroup) -> Self {
        Self::new().group(path, name, fragment)
    }

    pub fn value<S: AsRef<str>>(mut self, path: &[S], key: &str, value: ConfigValue) -> Self {
        self.declarations.push(Declaration::Value {
            path: owned_path(path),
            key: key.to_string(),
            value,
        });
        self
    }

    pub fn policy<S: AsRef<str>>(mut self, path: &[S], name: &str, policy: ConfigPolicy) -> Self {
        self.declarations.push(Declaration::Policy {
            path: owned_path(path),
            name: name.to_string(),
            policy,
        });
        self
    }

    pub fn group<S: AsRef<str>>(mut self, path: &[S], name: &str, fragment: ConfigGroup) -> Self {
        self.declarations.push(Declaration::Group {
            path: owned_path(path),
            name: name.to_string(),
            fragment,
        });
        self
    }

    pub fn mod_policy<S: AsRef<str>>(mut self, path: &[S], mod_policy: &str) -> Self {
        self.declarations.push(Declaration::ModPolicy {
            path: owned_path(path),
            mod_policy: mod_policy.to_string(),
        });
        self
    }

    /// Label stamped on every unattributed entry of the produced fragment
    pub fn with_origin(mut self, origin: &str) -> Self {
        self.origin = Some(origin.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl Template for SimpleTemplate {
    fn produce(&self) -> Result<ConfigGroup, TemplateError> {
        let mut group = ConfigGroup::new();
        for declaration in &self.declarations {
            match declaration {
                Declaration::Value { path, key, value } => {
                    group.set_value(path, key, value.clone())?
                }
                Declaration::Policy { path, name, policy } => {
                    group.set_policy(path, name, policy.clone())?
                }
                Declaration::Group {
                    path,
                    name,
                    fragment,
                } => group.set_sub_group(path, name, fragment.clone())?,
                Declaration::ModPolicy { path, mod_policy } => {
                    group.set_mod_policy(path, mod_policy)?
                }
            }
        }
        if let Some(origin) = &self.origin {
            group.attribute(origin);
        }
        Ok(group)
    }
}
