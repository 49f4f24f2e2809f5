//! Block encoding collaborator

use crate::error::EncodingError;
use crate::genesis::block::{Block, ConfigEnvelope};
use crate::tree::SealedGroup;

/// Turns a sealed config tree into a genesis block
pub trait BlockEncoder: Send + Sync {
    fn encode(&self, config: &SealedGroup, channel_id: &str) -> Result<Block, EncodingError>;
}

/// Default encoder: bincode envelope, BLAKE3 data hash, no signatures
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeEncoder;

impl BlockEncoder for BincodeEncoder {
    fn encode(&self, config: &SealedGroup, channel_id: &str) -> Result<Block, EncodingError> {
        Block::genesis(ConfigEnvelope {
            channel_id: channel_id.to_string(),
            sequence: 0,
            config: config.clone(),
        })
    }
}
