//! Genesis factory

use crate::error::GenesisError;
use crate::genesis::block::Block;
use crate::genesis::channel_id::validate_channel_id;
use crate::genesis::encoder::{BincodeEncoder, BlockEncoder};
use crate::template::Template;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Progress of one `block()` call
///
/// ```text
/// uninitialized -> composing -> {sealed | failed}
/// uninitialized -> failed      (channel ID rejected)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssemblyState {
    Uninitialized,
    Composing,
    Sealed,
    Failed,
}

impl AssemblyState {
    pub fn as_str(self) -> &'static str {
        match self {
            AssemblyState::Uninitialized => "uninitialized",
            AssemblyState::Composing => "composing",
            AssemblyState::Sealed => "sealed",
            AssemblyState::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, AssemblyState::Sealed | AssemblyState::Failed)
    }

    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (AssemblyState::Uninitialized, AssemblyState::Composing)
                | (AssemblyState::Uninitialized, AssemblyState::Failed)
                | (AssemblyState::Composing, AssemblyState::Sealed)
                | (AssemblyState::Composing, AssemblyState::Failed)
        )
    }
}

impl fmt::Display for AssemblyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State tracker local to a single assembly
struct Assembly {
    state: AssemblyState,
}

impl Assembly {
    fn new() -> Self {
        Self {
            state: AssemblyState::Uninitialized,
        }
    }

    fn advance(&mut self, next: AssemblyState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid assembly transition {} -> {}",
            self.state,
            next
        );
        debug!(from = %self.state, to = %next, "Assembly state transition");
        self.state = next;
    }

    fn fail<E: fmt::Display>(&mut self, err: E) -> E {
        warn!(state = %self.state, error = %err, "Genesis assembly failed");
        self.advance(AssemblyState::Failed);
        err
    }
}

/// Produces genesis blocks from a root template
///
/// Each `block()` call runs a fresh composition; the factory holds no
/// mutable state and may be shared across threads.
#[derive(Clone)]
pub struct GenesisFactory {
    root: Arc<dyn Template>,
    encoder: Arc<dyn BlockEncoder>,
}

impl fmt::Debug for GenesisFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenesisFactory").finish_non_exhaustive()
    }
}

impl GenesisFactory {
    /// Factory with the default bincode encoder
    pub fn new(root: Arc<dyn Template>) -> Self {
        Self::with_encoder(root, Arc::new(BincodeEncoder))
    }

    pub fn with_encoder(root: Arc<dyn Template>, encoder: Arc<dyn BlockEncoder>) -> Self {
        Self { root, encoder }
    }

    /// Assemble the genesis block for `channel_id`
    ///
    /// All or nothing: on error no block is returned.
    #[instrument(skip(self))]
    pub fn block(&self, channel_id: &str) -> Result<Block, GenesisError> {
        let mut assembly = Assembly::new();

        validate_channel_id(channel_id).map_err(|e| assembly.fail(e))?;

        assembly.advance(AssemblyState::Composing);
        let group = self
            .root
            .produce()
            .map_err(|e| assembly.fail(GenesisError::from(e)))?;
        let sealed = group.freeze();

        let block = self
            .encoder
            .encode(&sealed, channel_id)
            .map_err(|e| assembly.fail(GenesisError::from(e)))?;

        assembly.advance(AssemblyState::Sealed);
        info!(
            channel_id,
            config_digest = %block.config_digest(),
            "Sealed genesis block"
        );
        Ok(block)
    }
}
