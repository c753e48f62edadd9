//! # Domain Entities
//!
//! Transaction state, reducer actions, and write requests.

use super::contract::AbiValue;
use super::value_objects::{Address, QueryKey, TxHash, TxReceipt, TxStatus, U256};
use serde::{Deserialize, Serialize};

/// Context gathered while an identity creation flow progresses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationPayload {
    /// Uploaded image location.
    pub image_url: Option<String>,
    /// Display name of the identity.
    pub display_name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// External link (website, profile).
    pub external_reference: Option<String>,
    /// Id assigned by the indexer once the identity exists.
    pub identity_id: Option<String>,
}

/// Lifecycle of one user-initiated write.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionState {
    /// Current phase.
    pub status: TxStatus,
    /// Set once the wallet returns a hash.
    pub tx_hash: Option<TxHash>,
    /// Set once the chain includes the transaction.
    pub tx_receipt: Option<TxReceipt>,
    /// Failure reason for display.
    pub error: Option<String>,
    /// Creation flow context.
    #[serde(flatten)]
    pub payload: CreationPayload,
}

impl TransactionState {
    /// Fresh `idle` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// True once `complete` or `error`.
    pub fn is_settled(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Reducer input.
///
/// Deserialized from `{"type": "...", ...}`. Unrecognized types become
/// [`TransactionAction::Unknown`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionAction {
    /// → `idle`
    StartTransaction,
    /// → `awaiting`
    ApproveTransaction,
    /// → `review-transaction`
    ReviewTransaction,
    /// → `confirm`
    ConfirmTransaction,
    /// → `transaction-pending`
    TransactionPending,
    /// → `transaction-confirmed`
    TransactionConfirmed,
    /// → `complete`, records hash and receipt
    #[serde(rename_all = "camelCase")]
    TransactionComplete {
        /// Included transaction.
        tx_hash: TxHash,
        /// Its receipt.
        tx_receipt: Option<TxReceipt>,
    },
    /// → `hash`, records hash
    #[serde(rename_all = "camelCase")]
    TransactionHash {
        /// Hash returned by the wallet.
        tx_hash: TxHash,
    },
    /// → `error`, records message
    TransactionError {
        /// Display message.
        error: String,
    },
    /// Records the uploaded image; status unchanged.
    #[serde(rename_all = "camelCase")]
    ImageUploadComplete {
        /// Uploaded image location.
        image_url: String,
    },
    /// Records identity form values; status unchanged.
    #[serde(rename_all = "camelCase")]
    IdentityDetails {
        /// Display name.
        display_name: String,
        /// Description.
        #[serde(default)]
        description: Option<String>,
        /// External link.
        #[serde(default)]
        external_reference: Option<String>,
    },
    /// Records the indexer id of the new identity; status unchanged.
    #[serde(rename_all = "camelCase")]
    IdentityCreated {
        /// Indexer id.
        identity_id: String,
    },
    /// Any type this build does not know.
    #[serde(other)]
    Unknown,
}

impl TransactionAction {
    /// Wire name of the action type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartTransaction => "START_TRANSACTION",
            Self::ApproveTransaction => "APPROVE_TRANSACTION",
            Self::ReviewTransaction => "REVIEW_TRANSACTION",
            Self::ConfirmTransaction => "CONFIRM_TRANSACTION",
            Self::TransactionPending => "TRANSACTION_PENDING",
            Self::TransactionConfirmed => "TRANSACTION_CONFIRMED",
            Self::TransactionComplete { .. } => "TRANSACTION_COMPLETE",
            Self::TransactionHash { .. } => "TRANSACTION_HASH",
            Self::TransactionError { .. } => "TRANSACTION_ERROR",
            Self::ImageUploadComplete { .. } => "IMAGE_UPLOAD_COMPLETE",
            Self::IdentityDetails { .. } => "IDENTITY_DETAILS",
            Self::IdentityCreated { .. } => "IDENTITY_CREATED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// A contract call the coordinator should submit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteRequest {
    /// Target contract.
    pub to: Address,
    /// ABI function name.
    pub function: String,
    /// Arguments in declaration order.
    pub args: Vec<AbiValue>,
    /// Native value attached (wei).
    pub value: U256,
    /// Read-queries made stale by a successful write.
    pub invalidate: Vec<QueryKey>,
}

impl WriteRequest {
    /// Call with no value and no invalidation.
    pub fn new(to: Address, function: impl Into<String>, args: Vec<AbiValue>) -> Self {
        Self {
            to,
            function: function.into(),
            args,
            value: U256::zero(),
            invalidate: Vec::new(),
        }
    }

    /// Attach native value.
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Add query keys to invalidate on success.
    pub fn invalidating(mut self, keys: impl IntoIterator<Item = QueryKey>) -> Self {
        self.invalidate.extend(keys);
        self
    }
}

/// Encoded transaction handed to the wallet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTx {
    /// Sender from the active session.
    pub from: Address,
    /// Target contract.
    pub to: Address,
    /// ABI-encoded call data.
    pub data: Vec<u8>,
    /// Native value (wei).
    pub value: U256,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = TransactionState::new();
        assert_eq!(state.status, TxStatus::Idle);
        assert!(state.tx_hash.is_none());
        assert!(!state.is_settled());
    }

    #[test]
    fn test_action_deserializes_from_wire() {
        let action: TransactionAction =
            serde_json::from_str(r#"{"type":"TRANSACTION_HASH","txHash":"0xabc"}"#).unwrap();
        assert_eq!(
            action,
            TransactionAction::TransactionHash {
                tx_hash: TxHash::new("0xabc")
            }
        );
    }

    #[test]
    fn test_unknown_action_type_deserializes_to_unknown() {
        let action: TransactionAction =
            serde_json::from_str(r#"{"type":"SOMETHING_NEW"}"#).unwrap();
        assert_eq!(action, TransactionAction::Unknown);
    }

    #[test]
    fn test_action_name_matches_wire_tag() {
        let action = TransactionAction::TransactionError {
            error: "boom".to_string(),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], action.name());
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let state = TransactionState {
            tx_hash: Some(TxHash::new("0x01")),
            payload: CreationPayload {
                image_url: Some("ipfs://img".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["status"], "idle");
        assert_eq!(json["txHash"], "0x01");
        assert_eq!(json["imageUrl"], "ipfs://img");
    }

    #[test]
    fn test_write_request_builder() {
        let req = WriteRequest::new(Address::ZERO, "depositAtom", vec![])
            .with_value(U256::from(5u64))
            .invalidating([QueryKey::new(["vault", "1"])]);
        assert_eq!(req.value, U256::from(5u64));
        assert_eq!(req.invalidate.len(), 1);
    }
}
