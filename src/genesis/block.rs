//! Genesis block structure and wire format

use crate::error::EncodingError;
use crate::genesis::channel_id::validate_channel_id;
use crate::tree::hasher::{compute_group_hash, compute_hash};
use crate::tree::SealedGroup;
use crate::types::Hash;
use serde::{Deserialize, Serialize};

/// Configuration transaction carried as the block's only data entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEnvelope {
    pub channel_id: String,
    /// Config sequence number, 0 at genesis
    pub sequence: u64,
    pub config: SealedGroup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub number: u64,
    pub previous_hash: Option<Hash>,
    /// BLAKE3 hash of the block data
    pub data_hash: Hash,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSignature {
    pub signature_header: Vec<u8>,
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMetadata {
    /// Always empty at genesis
    pub signatures: Vec<MetadataSignature>,
    /// Number of the block holding the latest config
    pub last_config: u64,
}

/// Encoded block layout: the envelope travels only as `data` bytes
#[derive(Serialize, Deserialize)]
struct WireBlock {
    header: BlockHeader,
    data: Vec<u8>,
    metadata: BlockMetadata,
}

/// A genesis block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub header: BlockHeader,
    pub envelope: ConfigEnvelope,
    /// Encoded `envelope`
    pub data: Vec<u8>,
    pub metadata: BlockMetadata,
}

impl Block {
    /// Build a genesis block around an envelope
    pub fn genesis(envelope: ConfigEnvelope) -> Result<Self, EncodingError> {
        let data = bincode::serialize(&envelope)?;
        Ok(Self {
            header: BlockHeader {
                number: 0,
                previous_hash: None,
                data_hash: compute_hash(&data),
            },
            envelope,
            data,
            metadata: BlockMetadata::default(),
        })
    }

    pub fn channel_id(&self) -> &str {
        &self.envelope.channel_id
    }

    pub fn config(&self) -> &SealedGroup {
        &self.envelope.config
    }

    /// Canonical byte encoding of the block
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodingError> {
        let wire = WireBlock {
            header: self.header.clone(),
            data: self.data.clone(),
            metadata: self.metadata.clone(),
        };
        Ok(bincode::serialize(&wire)?)
    }

    /// Decode a block; call [`Block::verify`] before trusting it
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncodingError> {
        let wire: WireBlock = bincode::deserialize(bytes)?;
        let consumed = bincode::serialized_size(&wire)?;
        if consumed != bytes.len() as u64 {
            return Err(EncodingError::Malformed(format!(
                "{} trailing bytes after block",
                bytes.len() as u64 - consumed
            )));
        }
        let envelope: ConfigEnvelope = bincode::deserialize(&wire.data)
            .map_err(|e| EncodingError::Malformed(format!("config envelope: {}", e)))?;
        Ok(Self {
            header: wire.header,
            envelope,
            data: wire.data,
            metadata: wire.metadata,
        })
    }

    /// Check internal consistency of a genesis block
    ///
    /// Verifies the header position, the data hash, that `data` is the
    /// canonical encoding of the envelope, the channel ID and the empty
    /// genesis metadata.
    pub fn verify(&self) -> Result<(), EncodingError> {
        if self.header.number != 0 || self.header.previous_hash.is_some() {
            return Err(EncodingError::Malformed(format!(
                "block {} is not a genesis block",
                self.header.number
            )));
        }
        if self.envelope.sequence != 0 {
            return Err(EncodingError::Malformed(format!(
                "genesis config sequence is {}, expected 0",
                self.envelope.sequence
            )));
        }
        if compute_hash(&self.data) != self.header.data_hash {
            return Err(EncodingError::Malformed(
                "data hash does not match block data".to_string(),
            ));
        }
        if bincode::serialize(&self.envelope)? != self.data {
            return Err(EncodingError::Malformed(
                "block data is not the canonical envelope encoding".to_string(),
            ));
        }
        validate_channel_id(self.channel_id())
            .map_err(|e| EncodingError::Malformed(e.to_string()))?;
        if !self.metadata.signatures.is_empty() {
            return Err(EncodingError::Malformed(
                "genesis block carries signatures".to_string(),
            ));
        }
        if self.metadata.last_config != 0 {
            return Err(EncodingError::Malformed(format!(
                "genesis last config points at block {}",
                self.metadata.last_config
            )));
        }
        Ok(())
    }

    /// Hex BLAKE3 structural hash of the config tree
    ///
    /// Independent of the channel ID, so two channels bootstrapped from the
    /// same inputs report the same digest.
    pub fn config_digest(&self) -> String {
        hex::encode(compute_group_hash(self.config()))
    }
}
