//! Genesis Block Assembly
//!
//! Validates a channel identifier, composes and seals the root template and
//! hands the sealed tree to a [`BlockEncoder`]. For a fixed channel ID and
//! fixed inputs the resulting block bytes are identical across runs.

pub mod block;
pub mod channel_id;
pub mod encoder;
pub mod factory;

pub use block::{Block, BlockHeader, BlockMetadata, ConfigEnvelope, MetadataSignature};
pub use channel_id::{validate_channel_id, MAX_CHANNEL_ID_LENGTH};
pub use encoder::{BincodeEncoder, BlockEncoder};
pub use factory::{AssemblyState, GenesisFactory};
