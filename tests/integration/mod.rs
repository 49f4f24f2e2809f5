//! Integration tests for configuration composition and genesis assembly

mod block_verification;
mod cli_commands;
mod composition_conflicts;
mod genesis_determinism;
mod sample_network;
mod test_utils;
