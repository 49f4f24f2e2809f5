//! configtx: Composable Configuration Templates and Genesis Assembly
//!
//! Independently authored configuration fragments (one per organization, one
//! per network role) are merged into a single hierarchical config tree with
//! insert-or-conflict semantics, sealed, and encoded into a genesis block
//! that every participant can reproduce byte for byte.

pub mod cli;
pub mod composer;
pub mod config;
pub mod error;
pub mod genesis;
pub mod identity;
pub mod keys;
pub mod logging;
pub mod profile;
pub mod resolve;
pub mod sample;
pub mod template;
pub mod tree;
pub mod types;
pub mod values;

pub use composer::compose;
pub use error::{GenesisError, TemplateError, TreeError};
pub use genesis::{Block, GenesisFactory};
pub use template::Template;
pub use tree::{ConfigGroup, SealedGroup};
