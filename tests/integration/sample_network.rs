//! Integration tests for sample MSP discovery and the sample network

use super::test_utils::write_sample_msp;
use configtx::error::{BootstrapError, ResolveError};
use configtx::keys::{APPLICATION_GROUP_KEY, CONSORTIUMS_GROUP_KEY, MSP_KEY, ORDERER_GROUP_KEY};
use configtx::profile::SAMPLE_SINGLE_MSP_SOLO;
use configtx::resolve::{
    Environment, ORDERER_CFG_PATH_ENV, PEER_CFG_PATH_ENV, SAMPLE_SEARCH_PATH_ENV,
};
use configtx::sample::{SampleConfig, SAMPLE_ORG_ID};
use tempfile::TempDir;

#[test]
fn test_role_variable_precedes_search_path() {
    let peer = TempDir::new().unwrap();
    let search = TempDir::new().unwrap();
    write_sample_msp(peer.path());
    write_sample_msp(search.path());

    let env = Environment::default()
        .with(PEER_CFG_PATH_ENV, peer.path().to_str().unwrap())
        .with(SAMPLE_SEARCH_PATH_ENV, search.path().to_str().unwrap());
    let config = SampleConfig::discover(&env).unwrap();

    let expected = dunce::canonicalize(peer.path().join("msp").join("sampleconfig")).unwrap();
    assert_eq!(config.msp_dir(), expected.as_path());
}

#[test]
fn test_missing_role_directory_falls_through() {
    let orderer = TempDir::new().unwrap();
    write_sample_msp(orderer.path());

    let env = Environment::default()
        .with(PEER_CFG_PATH_ENV, "/nonexistent/peer/root")
        .with(ORDERER_CFG_PATH_ENV, orderer.path().to_str().unwrap());
    let config = SampleConfig::discover(&env).unwrap();
    assert!(config.msp_dir().starts_with(dunce::canonicalize(orderer.path()).unwrap()));
}

#[test]
fn test_search_path_entries_in_order() {
    let empty = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    write_sample_msp(second.path());

    let joined = std::env::join_paths([empty.path(), second.path()]).unwrap();
    let env = Environment::default().with(SAMPLE_SEARCH_PATH_ENV, joined.to_str().unwrap());
    let config = SampleConfig::discover(&env).unwrap();
    assert!(config.msp_dir().starts_with(dunce::canonicalize(second.path()).unwrap()));
}

#[test]
fn test_unresolvable_environment_is_an_error() {
    let env = Environment::default().with(PEER_CFG_PATH_ENV, "/nonexistent/peer/root");
    match SampleConfig::discover(&env).unwrap_err() {
        BootstrapError::Resolve(ResolveError::NotFound { tried }) => assert_eq!(tried.len(), 1),
        other => panic!("expected resolve failure, got {:?}", other),
    }
}

#[test]
fn test_sample_genesis_block() {
    let root = TempDir::new().unwrap();
    let msp = write_sample_msp(root.path());

    let block = SampleConfig::new(msp).make_genesis_block("testchannel").unwrap();
    let tree = block.config();
    assert!(tree
        .value(&[APPLICATION_GROUP_KEY, SAMPLE_ORG_ID], MSP_KEY)
        .is_some());
    assert!(tree.value(&[ORDERER_GROUP_KEY, SAMPLE_ORG_ID], MSP_KEY).is_some());
    block.verify().unwrap();
}

#[test]
fn test_sample_genesis_is_reproducible() {
    let root = TempDir::new().unwrap();
    let msp = write_sample_msp(root.path());

    let first = SampleConfig::new(msp.clone()).make_genesis_block("testchannel").unwrap();
    let second = SampleConfig::new(msp).make_genesis_block("testchannel").unwrap();
    assert_eq!(first.to_bytes().unwrap(), second.to_bytes().unwrap());
}

#[test]
fn test_single_msp_profile() {
    let root = TempDir::new().unwrap();
    let msp = write_sample_msp(root.path());

    let block = SampleConfig::new(msp)
        .with_profile(SAMPLE_SINGLE_MSP_SOLO)
        .make_genesis_block("testchannel")
        .unwrap();
    assert!(block
        .config()
        .group(&[CONSORTIUMS_GROUP_KEY, "SampleConsortium", "SampleOrg"])
        .is_some());
}

#[test]
fn test_missing_certificates_fail_bootstrap() {
    let root = TempDir::new().unwrap();
    let err = SampleConfig::new(root.path().to_path_buf())
        .make_genesis_block("testchannel")
        .unwrap_err();
    assert!(matches!(err, BootstrapError::Load(_)));
}
