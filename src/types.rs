//! Shared primitive types

/// 32-byte BLAKE3 digest
pub type Hash = [u8; 32];

/// Group path from the channel root, outermost name first
pub type ConfigPath = Vec<String>;
