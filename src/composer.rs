//! Composer: merge a set of templates into one sealed tree

use crate::error::TemplateError;
use crate::template::{CompositeTemplate, Template};
use crate::tree::SealedGroup;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Produce every template, merge the fragments and seal the result
///
/// The sealed tree may be shared with any number of consumers. A collision
/// or template failure yields an error and no tree.
#[instrument(skip(templates), fields(templates = templates.len()))]
pub fn compose(templates: &[Arc<dyn Template>]) -> Result<SealedGroup, TemplateError> {
    let composite = CompositeTemplate::new(templates.to_vec());
    let group = composite.produce()?;
    debug!(
        groups = group.groups().len(),
        values = group.values().len(),
        "Composed config tree"
    );
    Ok(group.freeze())
}
