//! Integration tests for the configtxgen binary

use super::test_utils::write_sample_msp;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(workspace: &Path, args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_configtxgen");
    Command::new(bin)
        .arg("--workspace")
        .arg(workspace)
        .arg("--quiet")
        .args(args)
        .env_remove("PEER_CFG_PATH")
        .env_remove("ORDERER_CFG_PATH")
        .env_remove("CONFIGTX_SAMPLE_PATH")
        .output()
        .unwrap()
}

fn genesis(workspace: &TempDir) -> std::path::PathBuf {
    let msp = write_sample_msp(workspace.path());
    let out = workspace.path().join("testchannel.block");
    let output = run(
        workspace.path(),
        &[
            "genesis",
            "--channel-id",
            "testchannel",
            "--msp-dir",
            msp.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ],
    );
    assert!(
        output.status.success(),
        "genesis failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    out
}

#[test]
fn test_genesis_inspect_verify() {
    let workspace = TempDir::new().unwrap();
    let block = genesis(&workspace);
    assert!(block.is_file());

    let output = run(workspace.path(), &["inspect", block.to_str().unwrap(), "--format", "json"]);
    assert!(output.status.success());
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["channel_id"], "testchannel");
    let digest = doc["config_digest"].as_str().unwrap().to_string();

    let output = run(
        workspace.path(),
        &["verify", block.to_str().unwrap(), "--expected-digest", digest.as_str()],
    );
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("OK"));
}

#[test]
fn test_repeated_genesis_is_byte_identical() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let a = std::fs::read(genesis(&first)).unwrap();
    let b = std::fs::read(genesis(&second)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_invalid_channel_id_exits_non_zero() {
    let workspace = TempDir::new().unwrap();
    let msp = write_sample_msp(workspace.path());
    let output = run(
        workspace.path(),
        &[
            "genesis",
            "--channel-id",
            "Bad_Channel",
            "--msp-dir",
            msp.to_str().unwrap(),
        ],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid channel ID"));
    assert!(!workspace.path().join("Bad_Channel.block").exists());
}

#[test]
fn test_unresolvable_msp_exits_non_zero() {
    let workspace = TempDir::new().unwrap();
    let output = run(workspace.path(), &["genesis", "--channel-id", "testchannel"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("PEER_CFG_PATH"));
}

#[test]
fn test_tampered_block_fails_verify() {
    let workspace = TempDir::new().unwrap();
    let block = genesis(&workspace);
    let mut bytes = std::fs::read(&block).unwrap();
    let last = bytes.len() - 20;
    bytes[last] ^= 0xff;
    std::fs::write(&block, bytes).unwrap();

    let output = run(workspace.path(), &["verify", block.to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn test_profiles_lists_samples() {
    let workspace = TempDir::new().unwrap();
    let output = run(workspace.path(), &["profiles", "--format", "json"]);
    assert!(output.status.success());
    let profiles: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = profiles
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["SampleInsecureKafka", "SampleInsecureSolo", "SampleSingleMSPSolo"]
    );
}
