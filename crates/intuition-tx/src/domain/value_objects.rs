//! # Domain Value Objects
//!
//! Immutable value types for the transaction lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export U256 from primitive-types for wei amounts and vault ids
pub use primitive_types::U256;

// =============================================================================
// ADDRESS (20 bytes)
// =============================================================================

/// A 20-byte account or contract address.
///
/// Serialized as a `0x`-prefixed lowercase hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an address from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns true if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| format!("invalid address {s}: {e}"))?;
        let array: [u8; 20] = bytes
            .try_into()
            .map_err(|_| format!("invalid address {s}: expected 20 bytes"))?;
        Ok(Self(array))
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.to_string()
    }
}

impl TryFrom<String> for Address {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

// =============================================================================
// TRANSACTION HASH
// =============================================================================

/// Chain transaction identifier as returned by the wallet provider.
///
/// Kept opaque: the wallet owns the format, this crate only records it.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    /// Wrap a wallet-provided identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Render a 32-byte hash as `0x`-prefixed hex.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    /// The identifier as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TxHash {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// =============================================================================
// STATUS & FLOWS
// =============================================================================

/// Phase of one write operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TxStatus {
    /// Nothing started.
    #[default]
    Idle,
    /// Waiting on the wallet to sign.
    Awaiting,
    /// User is reviewing the transaction details.
    ReviewTransaction,
    /// User confirmed the details, about to sign.
    Confirm,
    /// Broadcast, waiting for inclusion.
    TransactionPending,
    /// Included on chain.
    TransactionConfirmed,
    /// Finished; hash and receipt recorded.
    Complete,
    /// Wallet returned a hash.
    Hash,
    /// Failed.
    Error,
}

impl TxStatus {
    /// Wire name, e.g. `review-transaction`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Awaiting => "awaiting",
            Self::ReviewTransaction => "review-transaction",
            Self::Confirm => "confirm",
            Self::TransactionPending => "transaction-pending",
            Self::TransactionConfirmed => "transaction-confirmed",
            Self::Complete => "complete",
            Self::Hash => "hash",
            Self::Error => "error",
        }
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }

    /// A write is outstanding with the wallet or the chain.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            Self::Awaiting | Self::Hash | Self::TransactionPending | Self::TransactionConfirmed
        )
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const SIMPLE_PHASES: &[TxStatus] = &[
    TxStatus::Idle,
    TxStatus::Awaiting,
    TxStatus::Hash,
    TxStatus::TransactionConfirmed,
    TxStatus::Complete,
];

const IDENTITY_PHASES: &[TxStatus] = &[
    TxStatus::Idle,
    TxStatus::ReviewTransaction,
    TxStatus::Confirm,
    TxStatus::Awaiting,
    TxStatus::Hash,
    TxStatus::TransactionPending,
    TxStatus::TransactionConfirmed,
    TxStatus::Complete,
];

/// Shape of a write flow, which fixes its phase ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowKind {
    /// Deposit, redeem, follow, save-list.
    #[default]
    Simple,
    /// Atom/triple creation with review and confirm steps.
    IdentityCreation,
}

impl FlowKind {
    /// Ordered happy-path phases. `Error` is reachable from any of them.
    pub fn phases(&self) -> &'static [TxStatus] {
        match self {
            Self::Simple => SIMPLE_PHASES,
            Self::IdentityCreation => IDENTITY_PHASES,
        }
    }

    /// Position of `status` in this flow, or `None` if it is not part of it.
    pub fn rank(&self, status: TxStatus) -> Option<usize> {
        self.phases().iter().position(|phase| *phase == status)
    }
}

// =============================================================================
// RECEIPT
// =============================================================================

/// Execution outcome recorded in a receipt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    /// Execution succeeded.
    Success,
    /// Execution reverted.
    Reverted,
}

/// Chain inclusion receipt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    /// Hash of the included transaction.
    pub tx_hash: TxHash,
    /// Block that included it.
    pub block_number: u64,
    /// Gas consumed.
    pub gas_used: u64,
    /// Execution outcome.
    pub status: ReceiptStatus,
}

impl TxReceipt {
    /// True when execution succeeded.
    pub fn is_success(&self) -> bool {
        self.status == ReceiptStatus::Success
    }
}

// =============================================================================
// QUERY KEYS
// =============================================================================

/// Key of a cached read-query, e.g. `["vault", "42"]`.
///
/// Invalidation matches by prefix: `["vault"]` covers every vault entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// Build a key from its segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Key segments.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// True when `self` is a prefix of (or equal to) `other`.
    pub fn is_prefix_of(&self, other: &QueryKey) -> bool {
        other.0.len() >= self.0.len() && other.0[..self.0.len()] == self.0[..]
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(","))
    }
}
