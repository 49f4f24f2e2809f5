//! Integration tests for deterministic genesis assembly

use super::test_utils::{network_templates, solo_profile};
use configtx::keys::{BATCH_SIZE_KEY, MSP_KEY};
use configtx::template::{CompositeTemplate, Template};
use configtx::values::BatchSize;
use configtx::{compose, GenesisFactory};
use std::sync::Arc;

fn factory(templates: Vec<Arc<dyn Template>>) -> GenesisFactory {
    GenesisFactory::new(Arc::new(CompositeTemplate::new(templates)))
}

/// Orderer + OrgA in both sections, sealed for testchannel
#[test]
fn test_sample_scenario_has_every_sub_path() {
    let block = factory(network_templates()).block("testchannel").unwrap();
    let tree = block.config();

    assert!(tree.is_sealed());
    assert!(tree.value(&["Application", "OrgA"], MSP_KEY).is_some());
    assert!(tree.value(&["Orderer", "OrgA"], MSP_KEY).is_some());
    let batch: BatchSize = tree
        .value(&["Orderer"], BATCH_SIZE_KEY)
        .unwrap()
        .decode()
        .unwrap();
    assert_eq!(batch.max_message_count, 10);
    assert_eq!(block.channel_id(), "testchannel");
}

/// Two independent runs produce identical bytes
#[test]
fn test_independent_runs_byte_identical() {
    let first = factory(network_templates()).block("testchannel").unwrap();
    let second = factory(network_templates()).block("testchannel").unwrap();
    assert_eq!(first.to_bytes().unwrap(), second.to_bytes().unwrap());
    assert_eq!(first.config_digest(), second.config_digest());
}

/// Template order does not change the block
#[test]
fn test_template_order_irrelevant() {
    let mut reversed = network_templates();
    reversed.reverse();

    let forward = factory(network_templates()).block("testchannel").unwrap();
    let backward = factory(reversed).block("testchannel").unwrap();
    assert_eq!(forward.to_bytes().unwrap(), backward.to_bytes().unwrap());
}

/// Different channel IDs bind different blocks around the same tree
#[test]
fn test_channel_binding() {
    let factory = factory(network_templates());
    let one = factory.block("channel-one").unwrap();
    let two = factory.block("channel-two").unwrap();

    assert_ne!(one.to_bytes().unwrap(), two.to_bytes().unwrap());
    assert_eq!(one.config(), two.config());
    assert_eq!(one.config_digest(), two.config_digest());
}

/// compose() output matches the tree inside the block
#[test]
fn test_compose_matches_block_config() {
    let sealed = compose(&network_templates()).unwrap();
    let block = factory(network_templates()).block("testchannel").unwrap();
    assert_eq!(&sealed, block.config());
}

/// Changing one input changes the digest
#[test]
fn test_input_change_changes_digest() {
    let mut profile = solo_profile();
    profile.orderer.as_mut().unwrap().batch_size.max_message_count = 11;
    let mut templates = network_templates();
    templates[0] = super::test_utils::orderer_template(profile);

    let base = factory(network_templates()).block("testchannel").unwrap();
    let changed = factory(templates).block("testchannel").unwrap();
    assert_ne!(base.config_digest(), changed.config_digest());
}

/// Concurrent block() calls on a shared factory agree
#[test]
fn test_concurrent_block_calls() {
    let factory = Arc::new(factory(network_templates()));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let factory = Arc::clone(&factory);
            std::thread::spawn(move || factory.block("testchannel").unwrap().to_bytes().unwrap())
        })
        .collect();

    let results: Vec<Vec<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}
