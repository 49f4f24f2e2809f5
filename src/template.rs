//! Templates
//!
//! A template is a pure producer of one configuration fragment. Templates
//! never read shared mutable state and never see each other's output; the
//! composite variant and the [`composer`](crate::composer) are the only places
//! fragments meet.

pub mod composite;
pub mod msp;
pub mod profile;
pub mod simple;

pub use composite::CompositeTemplate;
pub use msp::MspTemplate;
pub use profile::ProfileTemplate;
pub use simple::SimpleTemplate;

use crate::error::TemplateError;
use crate::tree::ConfigGroup;
use std::sync::Arc;

/// Producer of a configuration fragment
///
/// `produce` performs no I/O and may be called any number of times; each call
/// returns a fresh, mutable fragment.
pub trait Template: Send + Sync {
    fn produce(&self) -> Result<ConfigGroup, TemplateError>;
}

impl<T: Template + ?Sized> Template for Arc<T> {
    fn produce(&self) -> Result<ConfigGroup, TemplateError> {
        (**self).produce()
    }
}

impl<T: Template + ?Sized> Template for Box<T> {
    fn produce(&self) -> Result<ConfigGroup, TemplateError> {
        (**self).produce()
    }
}
