//! Composite template: merge of child fragments

use crate::error::TemplateError;
use crate::template::Template;
use crate::tree::ConfigGroup;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Template whose fragment is the merge of its children's fragments
///
/// Children are produced in order and merged into an empty group with the
/// insert-or-conflict rule. Production stops at the first child failure or
/// the first collision. When no collision occurs the result does not depend
/// on child order.
#[derive(Clone, Default)]
pub struct CompositeTemplate {
    children: Vec<Arc<dyn Template>>,
}

impl fmt::Debug for CompositeTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeTemplate")
            .field("children", &self.children.len())
            .finish()
    }
}

impl CompositeTemplate {
    pub fn new(children: Vec<Arc<dyn Template>>) -> Self {
        Self { children }
    }

    pub fn push(&mut self, child: Arc<dyn Template>) {
        self.children.push(child);
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Template for CompositeTemplate {
    #[instrument(skip(self), fields(children = self.children.len()))]
    fn produce(&self) -> Result<ConfigGroup, TemplateError> {
        let mut merged = ConfigGroup::new();
        for (index, child) in self.children.iter().enumerate() {
            let fragment = child.produce().map_err(|e| {
                warn!(index, error = %e, "Child template failed");
                e
            })?;
            merged.merge(fragment).map_err(|e| {
                warn!(index, error = %e, "Child fragment collided");
                TemplateError::from(e)
            })?;
            debug!(index, "Merged child fragment");
        }
        Ok(merged)
    }
}
