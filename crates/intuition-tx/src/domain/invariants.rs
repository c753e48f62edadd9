//! # Domain Invariants
//!
//! Ordering and bookkeeping rules for a transaction's lifecycle.

use super::entities::TransactionState;
use super::value_objects::{FlowKind, TxStatus};

/// Invariant: phases advance in flow order.
///
/// `history` is the sequence of statuses one transaction passed through.
/// `Error` may appear once, as the final entry.
pub fn invariant_monotonic_phases(flow: FlowKind, history: &[TxStatus]) -> bool {
    let mut last_rank: Option<usize> = None;

    for (i, status) in history.iter().enumerate() {
        if *status == TxStatus::Error {
            return i == history.len() - 1;
        }
        let Some(rank) = flow.rank(*status) else {
            return false;
        };
        if let Some(prev) = last_rank {
            if rank <= prev {
                return false;
            }
        }
        last_rank = Some(rank);
    }
    true
}

/// Invariant: any phase after the wallet answered carries a hash.
pub fn invariant_hash_recorded(state: &TransactionState) -> bool {
    match state.status {
        TxStatus::Hash
        | TxStatus::TransactionPending
        | TxStatus::TransactionConfirmed
        | TxStatus::Complete => state.tx_hash.is_some(),
        _ => true,
    }
}

/// Invariant: `idle` carries no hash, receipt, or error.
pub fn invariant_idle_is_clean(state: &TransactionState) -> bool {
    state.status != TxStatus::Idle
        || (state.tx_hash.is_none() && state.tx_receipt.is_none() && state.error.is_none())
}
