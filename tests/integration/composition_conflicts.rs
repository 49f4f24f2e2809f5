//! Integration tests for collision detection across templates

use super::test_utils::{msp_template, network_templates, orderer_template, solo_profile};
use configtx::error::{EntryKind, GenesisError, TemplateError, TreeError};
use configtx::template::{CompositeTemplate, SimpleTemplate, Template};
use configtx::tree::ConfigValue;
use configtx::{compose, GenesisFactory};
use std::sync::Arc;

/// Two organizations claiming the same slot with different material conflict
#[test]
fn test_conflicting_msp_reports_path_and_key() {
    let templates = vec![
        msp_template(&["Application", "OrgA"], "OrgA", b"genuine-ca"),
        msp_template(&["Application", "OrgA"], "OrgA", b"impostor-ca"),
    ];

    match compose(&templates).unwrap_err() {
        TemplateError::Tree(TreeError::Conflict {
            path, key, kind, ..
        }) => {
            assert_eq!(path, "/Application/OrgA");
            assert_eq!(key, "MSP");
            assert_eq!(kind, EntryKind::Value);
        }
        other => panic!("expected conflict, got {:?}", other),
    }
}

/// Identical declarations from different templates merge cleanly
#[test]
fn test_identical_values_merge() {
    let templates = vec![
        msp_template(&["Application", "OrgA"], "OrgA", b"ca"),
        msp_template(&["Application", "OrgA"], "OrgA", b"ca"),
    ];
    let sealed = compose(&templates).unwrap();
    assert!(sealed.value(&["Application", "OrgA"], "MSP").is_some());
}

/// Composing the same set twice gives the same tree as composing it once
#[test]
fn test_redeclaring_whole_network_is_idempotent() {
    let once = compose(&network_templates()).unwrap();

    let mut twice = network_templates();
    twice.extend(network_templates());
    assert_eq!(compose(&twice).unwrap(), once);
}

/// Duplicate orderer templates only conflict when their profiles differ
#[test]
fn test_duplicate_orderer_templates() {
    let same = vec![orderer_template(solo_profile()), orderer_template(solo_profile())];
    assert!(compose(&same).is_ok());

    let mut bigger = solo_profile();
    bigger.orderer.as_mut().unwrap().batch_size.max_message_count = 20;
    let different = vec![orderer_template(solo_profile()), orderer_template(bigger)];
    let err = compose(&different).unwrap_err();
    assert!(err.is_conflict());
    assert!(err.to_string().contains("BatchSize"));
}

/// A conflict deep inside nested composites surfaces through the factory
#[test]
fn test_nested_conflict_through_factory() {
    let inner: Arc<dyn Template> = Arc::new(CompositeTemplate::new(network_templates()));
    let rogue: Arc<dyn Template> = Arc::new(
        SimpleTemplate::from_value(&["Orderer"], "BatchTimeout", ConfigValue::new(b"1s".to_vec()))
            .with_origin("rogue"),
    );
    let root = Arc::new(CompositeTemplate::new(vec![inner, rogue]));

    let err = GenesisFactory::new(root).block("testchannel").unwrap_err();
    assert!(err.is_conflict());
    assert!(matches!(err, GenesisError::Template(_)));
    assert!(err.to_string().contains("rogue"));
}

/// A conflicting mod_policy is a conflict even when no value collides
#[test]
fn test_mod_policy_collision() {
    let a: Arc<dyn Template> = Arc::new(SimpleTemplate::new().mod_policy(&["Application"], "Admins"));
    let b: Arc<dyn Template> = Arc::new(SimpleTemplate::new().mod_policy(&["Application"], "Writers"));
    let err = compose(&[a, b]).unwrap_err();
    assert!(matches!(
        err,
        TemplateError::Tree(TreeError::Conflict {
            kind: EntryKind::ModPolicy,
            ..
        })
    ));
}
