//! Simulated Wallet Adapter
//!
//! Implements `WalletProvider` without a node. Each send consumes the next
//! scripted behavior; an empty script confirms everything.

use crate::domain::{ReceiptStatus, TxError, TxHash, TxReceipt, UnsignedTx};
use crate::ports::outbound::WalletProvider;
use async_trait::async_trait;
use parking_lot::Mutex;
use sha3::{Digest, Keccak256};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, info};

/// What the wallet does with one transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WalletBehavior {
    /// Sign, broadcast, include successfully.
    Confirm,
    /// Signer declines.
    Reject,
    /// RPC failure while broadcasting.
    NetworkFailure(String),
    /// Included, execution reverted.
    Revert,
    /// Broadcast, then the node fails while waiting for the receipt.
    ReceiptFailure(String),
    /// Signature request never answers.
    HangOnSign,
    /// Receipt never arrives.
    HangOnReceipt,
}

#[derive(Default)]
struct Ledger {
    nonce: u64,
    block_number: u64,
    sent: Vec<UnsignedTx>,
    receipts: HashMap<TxHash, WalletBehavior>,
}

/// Deterministic in-process wallet.
pub struct SimulatedWallet {
    script: Mutex<VecDeque<WalletBehavior>>,
    ledger: Mutex<Ledger>,
    sign_gate: Option<Arc<Notify>>,
    receipt_delay: Duration,
}

impl SimulatedWallet {
    /// Wallet that confirms every transaction immediately.
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            ledger: Mutex::new(Ledger {
                block_number: 1_000,
                ..Default::default()
            }),
            sign_gate: None,
            receipt_delay: Duration::ZERO,
        }
    }

    /// Queue behaviors for upcoming sends.
    pub fn with_script(self, behaviors: impl IntoIterator<Item = WalletBehavior>) -> Self {
        self.script.lock().extend(behaviors);
        self
    }

    /// Hold every signature until [`SimulatedWallet::release_signature`].
    pub fn gated(mut self) -> Self {
        self.sign_gate = Some(Arc::new(Notify::new()));
        self
    }

    /// Delay before each receipt is returned.
    pub fn with_receipt_delay(mut self, delay: Duration) -> Self {
        self.receipt_delay = delay;
        self
    }

    /// Queue one more behavior.
    pub fn push_behavior(&self, behavior: WalletBehavior) {
        self.script.lock().push_back(behavior);
    }

    /// Let one held signature through.
    pub fn release_signature(&self) {
        if let Some(gate) = &self.sign_gate {
            gate.notify_one();
        }
    }

    /// Transactions broadcast so far.
    pub fn sent(&self) -> Vec<UnsignedTx> {
        self.ledger.lock().sent.clone()
    }

    fn next_behavior(&self) -> WalletBehavior {
        self.script
            .lock()
            .pop_front()
            .unwrap_or(WalletBehavior::Confirm)
    }

    fn broadcast(&self, tx: UnsignedTx, behavior: WalletBehavior) -> TxHash {
        let mut ledger = self.ledger.lock();
        let hash = transaction_hash(&tx, ledger.nonce);
        ledger.nonce += 1;
        ledger.sent.push(tx);
        ledger.receipts.insert(hash.clone(), behavior);
        hash
    }
}

impl Default for SimulatedWallet {
    fn default() -> Self {
        Self::new()
    }
}

fn transaction_hash(tx: &UnsignedTx, nonce: u64) -> TxHash {
    let mut value = [0u8; 32];
    tx.value.to_big_endian(&mut value);

    let mut hasher = Keccak256::new();
    hasher.update(tx.from.as_bytes());
    hasher.update(tx.to.as_bytes());
    hasher.update(&tx.data);
    hasher.update(value);
    hasher.update(nonce.to_be_bytes());
    TxHash::from_bytes(hasher.finalize().into())
}

#[async_trait]
impl WalletProvider for SimulatedWallet {
    async fn send_transaction(&self, tx: UnsignedTx) -> Result<TxHash, TxError> {
        let behavior = self.next_behavior();
        debug!(from = %tx.from, to = %tx.to, ?behavior, "Signature requested");

        if let Some(gate) = &self.sign_gate {
            gate.notified().await;
        }

        match behavior {
            WalletBehavior::Reject => Err(TxError::UserRejected),
            WalletBehavior::NetworkFailure(message) => Err(TxError::NetworkError(message)),
            WalletBehavior::HangOnSign => std::future::pending().await,
            other => {
                let hash = self.broadcast(tx, other);
                info!(%hash, "Transaction broadcast");
                Ok(hash)
            }
        }
    }

    async fn wait_for_receipt(&self, hash: &TxHash) -> Result<TxReceipt, TxError> {
        let behavior = self
            .ledger
            .lock()
            .receipts
            .get(hash)
            .cloned()
            .ok_or_else(|| TxError::NetworkError(format!("unknown transaction {hash}")))?;

        if !self.receipt_delay.is_zero() {
            tokio::time::sleep(self.receipt_delay).await;
        }

        let status = match behavior {
            WalletBehavior::HangOnReceipt => return std::future::pending().await,
            WalletBehavior::ReceiptFailure(message) => return Err(TxError::NetworkError(message)),
            WalletBehavior::Revert => ReceiptStatus::Reverted,
            _ => ReceiptStatus::Success,
        };

        let block_number = {
            let mut ledger = self.ledger.lock();
            ledger.block_number += 1;
            ledger.block_number
        };

        Ok(TxReceipt {
            tx_hash: hash.clone(),
            block_number,
            gas_used: 21_000,
            status,
        })
    }
}
