use async_trait::async_trait;
use lodestone_core::{Address, BlockIndex, DecodeError};
use lodestone_models::ModelError;
use serde_json::Value;

/// Errors surfaced by state fetching and resolution.
///
/// `NotFound` is an expected condition (it drives the legacy fallback);
/// `Transport` and `Node` are transient and retried at the cycle level;
/// `Decode` and `Model` are contained to a single entity.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("state not found")]
    NotFound,
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("node returned error status: {0}")]
    Node(u16),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl StateError {
    /// Whether this error is contained to one entity (skip and log) rather
    /// than aborting the whole sync cycle.
    pub fn is_entity_error(&self) -> bool {
        matches!(self, StateError::Decode(_) | StateError::Model(_))
    }
}

/// The state-fetch capability of a ledger node.
///
/// `Ok(None)` means the node answered but no value is stored at the address;
/// `Err(NotFound)` means the address or account does not exist at all. Both
/// are normal for entities written under the legacy layout.
#[async_trait]
pub trait StateService: Send + Sync {
    /// Fetch a value from the legacy top-level account.
    async fn get_state(&self, address: Address) -> Result<Option<Value>, StateError>;

    /// Fetch a value from a current-layout account.
    async fn get_account_state(
        &self,
        address: Address,
        account: Address,
    ) -> Result<Option<Value>, StateError>;

    /// The ledger's current tip, bounding how far a cycle may advance.
    async fn get_tip(&self) -> Result<BlockIndex, StateError>;
}
