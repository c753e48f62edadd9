//! # Inbound Ports
//!
//! API trait defining what a write coordinator offers its UI flows.

use crate::domain::{TransactionAction, TransactionState, TxError, TxHash, WriteRequest};
use async_trait::async_trait;

/// Chain write API - inbound port.
#[async_trait]
pub trait ChainWriteApi: Send + Sync {
    /// Submit a write. Resolves with the hash once the wallet broadcast it;
    /// chain inclusion continues in the background.
    async fn submit(&self, request: WriteRequest) -> Result<TxHash, TxError>;

    /// Back to `idle`. No effect on anything already broadcast.
    fn reset(&self);

    /// Apply a flow-driven action (review, confirm, payload updates).
    fn dispatch(&self, action: TransactionAction);

    /// Snapshot of the current state.
    fn state(&self) -> TransactionState;

    /// Wait until the state is `complete` or `error`.
    async fn settled(&self) -> TransactionState;
}
