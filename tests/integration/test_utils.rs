//! Shared fixtures for integration tests

use configtx::identity::{IdentityConfig, ADMIN_CERTS_DIR, CA_CERTS_DIR};
use configtx::profile::{Profile, ProfileLoader, SampleProfiles, SAMPLE_INSECURE_SOLO};
use configtx::template::{MspTemplate, ProfileTemplate, Template};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Create `<root>/msp/sampleconfig` with one CA and one admin certificate
pub fn write_sample_msp(root: &Path) -> PathBuf {
    let msp = root.join("msp").join("sampleconfig");
    fs::create_dir_all(msp.join(CA_CERTS_DIR)).unwrap();
    fs::create_dir_all(msp.join(ADMIN_CERTS_DIR)).unwrap();
    fs::write(msp.join(CA_CERTS_DIR).join("ca.pem"), "sample-root-ca").unwrap();
    fs::write(msp.join(ADMIN_CERTS_DIR).join("admin.pem"), "sample-admin").unwrap();
    msp
}

pub fn identity(msp_id: &str, root_cert: &[u8]) -> IdentityConfig {
    IdentityConfig {
        name: msp_id.to_string(),
        root_certs: vec![root_cert.to_vec()],
        intermediate_certs: Vec::new(),
        admins: Vec::new(),
        tls_root_certs: Vec::new(),
        tls_intermediate_certs: Vec::new(),
        signing_certs: Vec::new(),
    }
}

pub fn solo_profile() -> Profile {
    SampleProfiles.load(SAMPLE_INSECURE_SOLO).unwrap()
}

pub fn orderer_template(profile: Profile) -> Arc<dyn Template> {
    Arc::new(ProfileTemplate::new(profile))
}

pub fn msp_template(path: &[&str], msp_id: &str, root_cert: &[u8]) -> Arc<dyn Template> {
    Arc::new(MspTemplate::new(path, identity(msp_id, root_cert)))
}

/// Orderer profile, OrgA as application member and OrgA as orderer member
pub fn network_templates() -> Vec<Arc<dyn Template>> {
    vec![
        orderer_template(solo_profile()),
        msp_template(&["Application", "OrgA"], "OrgA", b"org-a-ca"),
        msp_template(&["Orderer", "OrgA"], "OrgA", b"org-a-ca"),
    ]
}
