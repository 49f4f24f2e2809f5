//! Integration tests for block encoding and verification

use super::test_utils::network_templates;
use configtx::error::EncodingError;
use configtx::genesis::{Block, ConfigEnvelope};
use configtx::template::CompositeTemplate;
use configtx::tree::group::MAX_GROUP_DEPTH;
use configtx::tree::{ConfigGroup, ConfigValue};
use configtx::GenesisFactory;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn encoded_block() -> Vec<u8> {
    let factory = GenesisFactory::new(Arc::new(CompositeTemplate::new(network_templates())));
    factory.block("testchannel").unwrap().to_bytes().unwrap()
}

#[test]
fn test_decoded_block_verifies() {
    let bytes = encoded_block();
    let block = Block::from_bytes(&bytes).unwrap();
    block.verify().unwrap();
    assert_eq!(block.to_bytes().unwrap(), bytes);
    assert!(block.config().is_sealed());
}

/// Flipping any single byte never yields a block that still verifies
#[test]
fn test_single_byte_tampering_detected() {
    let bytes = encoded_block();
    for index in (0..bytes.len()).step_by(7) {
        let mut tampered = bytes.clone();
        tampered[index] ^= 0x01;
        let accepted = Block::from_bytes(&tampered)
            .map(|block| block.verify().is_ok())
            .unwrap_or(false);
        assert!(!accepted, "tampering at byte {} went unnoticed", index);
    }
}

#[test]
fn test_truncated_block_rejected() {
    let bytes = encoded_block();
    assert!(Block::from_bytes(&bytes[..bytes.len() / 2]).is_err());
}

#[test]
fn test_block_file_with_appended_bytes_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("testchannel.block");
    let mut bytes = encoded_block();
    bytes.extend_from_slice(b"GARBAGE-APPENDED");
    fs::write(&path, &bytes).unwrap();

    let err = Block::from_bytes(&fs::read(&path).unwrap()).unwrap_err();
    assert!(matches!(err, EncodingError::Malformed(_)));
}

#[test]
fn test_deeply_nested_envelope_rejected() {
    let path: Vec<String> = (0..MAX_GROUP_DEPTH + 10).map(|i| format!("G{}", i)).collect();
    let mut group = ConfigGroup::new();
    group
        .set_value(&path, "Leaf", ConfigValue::new(b"x".to_vec()))
        .unwrap();
    let block = Block::genesis(ConfigEnvelope {
        channel_id: "testchannel".to_string(),
        sequence: 0,
        config: group.freeze(),
    })
    .unwrap();

    let err = Block::from_bytes(&block.to_bytes().unwrap()).unwrap_err();
    assert!(matches!(err, EncodingError::Malformed(ref msg) if msg.contains("nested deeper")));
}
