//! # Transaction State Reducer
//!
//! Deterministic, side-effect-free `(state, action) -> state`.

use crate::domain::{TransactionAction, TransactionState, TxStatus};

/// Apply one action.
///
/// Status follows a fixed lookup table. Hash, receipt, and error are only
/// written by the actions that carry them; nothing here clears them.
/// [`TransactionAction::Unknown`] returns the state unchanged.
pub fn reduce(mut state: TransactionState, action: TransactionAction) -> TransactionState {
    match action {
        TransactionAction::StartTransaction => state.status = TxStatus::Idle,
        TransactionAction::ApproveTransaction => state.status = TxStatus::Awaiting,
        TransactionAction::ReviewTransaction => state.status = TxStatus::ReviewTransaction,
        TransactionAction::ConfirmTransaction => state.status = TxStatus::Confirm,
        TransactionAction::TransactionPending => state.status = TxStatus::TransactionPending,
        TransactionAction::TransactionConfirmed => state.status = TxStatus::TransactionConfirmed,
        TransactionAction::TransactionComplete {
            tx_hash,
            tx_receipt,
        } => {
            state.status = TxStatus::Complete;
            state.tx_hash = Some(tx_hash);
            if tx_receipt.is_some() {
                state.tx_receipt = tx_receipt;
            }
        }
        TransactionAction::TransactionHash { tx_hash } => {
            state.status = TxStatus::Hash;
            state.tx_hash = Some(tx_hash);
        }
        TransactionAction::TransactionError { error } => {
            state.status = TxStatus::Error;
            state.error = Some(error);
        }
        TransactionAction::ImageUploadComplete { image_url } => {
            state.payload.image_url = Some(image_url);
        }
        TransactionAction::IdentityDetails {
            display_name,
            description,
            external_reference,
        } => {
            state.payload.display_name = Some(display_name);
            state.payload.description = description;
            state.payload.external_reference = external_reference;
        }
        TransactionAction::IdentityCreated { identity_id } => {
            state.payload.identity_id = Some(identity_id);
        }
        TransactionAction::Unknown => {}
    }
    state
}
