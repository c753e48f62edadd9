//! # Outbound Ports
//!
//! Traits for the external collaborators a write depends on.

use crate::domain::{AbiValue, Address, QueryKey, TxError, TxHash, TxReceipt, UnsignedTx};
use async_trait::async_trait;

/// Wallet provider - outbound port.
///
/// Signs and broadcasts on behalf of the session's account, and observes
/// chain inclusion through its node connection.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the user to sign and broadcast.
    ///
    /// Returns [`TxError::UserRejected`] when the signer declines and
    /// [`TxError::NetworkError`] on RPC failure.
    async fn send_transaction(&self, tx: UnsignedTx) -> Result<TxHash, TxError>;

    /// Wait until `hash` is included and return its receipt.
    ///
    /// A reverted execution is still `Ok`; callers inspect the receipt status.
    async fn wait_for_receipt(&self, hash: &TxHash) -> Result<TxReceipt, TxError>;
}

/// Contract call encoder - outbound port.
pub trait CallEncoder: Send + Sync {
    /// Encode `function(args)` as call data.
    ///
    /// Arity or type mismatch fails with [`TxError::EncodingError`].
    fn encode(&self, function: &str, args: &[AbiValue]) -> Result<Vec<u8>, TxError>;

    /// Whether `function` accepts native value.
    fn is_payable(&self, function: &str) -> Option<bool>;
}

/// Read-side query cache - outbound port.
///
/// Shared by every coordinator in a session.
pub trait QueryCache: Send + Sync {
    /// Drop every entry whose key starts with `key`. Returns how many were dropped.
    fn invalidate(&self, key: &QueryKey) -> usize;

    /// Cached value, if present.
    fn get(&self, key: &QueryKey) -> Option<serde_json::Value>;

    /// Store a value.
    fn put(&self, key: QueryKey, value: serde_json::Value);
}

/// Auth session - outbound port.
///
/// The address is trusted as the transaction sender without re-validation.
pub trait SessionProvider: Send + Sync {
    /// Connected wallet address, if logged in.
    fn active_address(&self) -> Option<Address>;
}
