//! # Domain Errors
//!
//! Failure taxonomy for on-chain writes. Every variant collapses into a
//! single display string once it reaches the reducer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message stored in state when the signer declines.
pub const USER_REJECTED_MESSAGE: &str = "User rejected";

/// Transaction lifecycle errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxError {
    /// Signer declined the request.
    #[error("User rejected")]
    UserRejected,

    /// Arguments do not match the target function.
    #[error("Encoding error in {function}: {reason}")]
    EncodingError {
        /// Contract function being encoded
        function: String,
        /// What did not match
        reason: String,
    },

    /// Function is not part of the encoder's ABI.
    #[error("Unknown contract function: {0}")]
    UnknownFunction(String),

    /// RPC or provider failure reaching the wallet or node.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Included on chain but execution failed.
    #[error("Transaction reverted: {tx_hash}")]
    ChainRevert {
        /// Hash of the reverted transaction
        tx_hash: String,
    },

    /// External dependency did not answer in time.
    #[error("Timed out waiting for {phase} after {elapsed_ms}ms")]
    Timeout {
        /// Which wait expired ("signature" or "receipt")
        phase: String,
        /// Configured bound in milliseconds
        elapsed_ms: u64,
    },

    /// No wallet session is active.
    #[error("No active wallet session")]
    NoSession,

    /// Decimal user input could not be converted.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// Stable label for each error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`TxError::UserRejected`].
    UserRejected,
    /// See [`TxError::EncodingError`] and [`TxError::UnknownFunction`].
    Encoding,
    /// See [`TxError::NetworkError`].
    Network,
    /// See [`TxError::ChainRevert`].
    ChainRevert,
    /// See [`TxError::Timeout`].
    Timeout,
    /// See [`TxError::NoSession`].
    NoSession,
    /// See [`TxError::InvalidAmount`].
    InvalidAmount,
}

impl ErrorKind {
    /// Label used in metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserRejected => "user_rejected",
            Self::Encoding => "encoding",
            Self::Network => "network",
            Self::ChainRevert => "chain_revert",
            Self::Timeout => "timeout",
            Self::NoSession => "no_session",
            Self::InvalidAmount => "invalid_amount",
        }
    }

    /// Whether the user can retry the same action and reasonably expect success.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UserRejected | Self::Network | Self::Timeout)
    }
}

impl TxError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UserRejected => ErrorKind::UserRejected,
            Self::EncodingError { .. } | Self::UnknownFunction(_) => ErrorKind::Encoding,
            Self::NetworkError(_) => ErrorKind::Network,
            Self::ChainRevert { .. } => ErrorKind::ChainRevert,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::NoSession => ErrorKind::NoSession,
            Self::InvalidAmount(_) => ErrorKind::InvalidAmount,
        }
    }

    /// String stored in `TransactionState::error`.
    pub fn display_message(&self) -> String {
        match self {
            Self::UserRejected => USER_REJECTED_MESSAGE.to_string(),
            Self::NetworkError(message) => message.clone(),
            other => other.to_string(),
        }
    }

    pub(crate) fn encoding(function: &str, reason: impl Into<String>) -> Self {
        Self::EncodingError {
            function: function.to_string(),
            reason: reason.into(),
        }
    }
}
