//! # Configuration
//!
//! Contract location, creation costs, and wait bounds.

use crate::domain::{Address, U256};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::warn;

/// Default bound on the wallet signature wait (5 minutes).
pub const DEFAULT_SIGNATURE_TIMEOUT_SECS: u64 = 300;

/// Default bound on the chain inclusion wait (10 minutes).
pub const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 600;

/// Settings for writes against the multivault.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxConfig {
    /// EthMultiVault contract address.
    pub multivault_address: Address,
    /// Chain the contract lives on.
    pub chain_id: u64,
    /// Fee charged by `createAtom`, in wei.
    pub atom_cost: U256,
    /// Fee charged by `createTriple`, in wei.
    pub triple_cost: U256,
    /// Wallet signature bound in seconds. Zero waits forever.
    pub signature_timeout_secs: u64,
    /// Chain inclusion bound in seconds. Zero waits forever.
    pub receipt_timeout_secs: u64,
}

impl Default for TxConfig {
    fn default() -> Self {
        Self {
            multivault_address: Address::ZERO,
            chain_id: 84_532, // Base Sepolia
            atom_cost: U256::from(300_000_000_000_000u64), // 0.0003 ETH
            triple_cost: U256::from(400_000_000_000_000u64), // 0.0004 ETH
            signature_timeout_secs: DEFAULT_SIGNATURE_TIMEOUT_SECS,
            receipt_timeout_secs: DEFAULT_RECEIPT_TIMEOUT_SECS,
        }
    }
}

impl TxConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `INTUITION_MULTIVAULT_ADDRESS`: contract address (default: zero address)
    /// - `INTUITION_CHAIN_ID`: chain id (default: 84532)
    /// - `INTUITION_ATOM_COST_WEI`: atom creation fee (default: 0.0003 ETH)
    /// - `INTUITION_TRIPLE_COST_WEI`: triple creation fee (default: 0.0004 ETH)
    /// - `INTUITION_SIGNATURE_TIMEOUT_SECS`: signature bound (default: 300)
    /// - `INTUITION_RECEIPT_TIMEOUT_SECS`: receipt bound (default: 600)
    ///
    /// Unparseable values fall back to the default with a warning.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            multivault_address: parse_var("INTUITION_MULTIVAULT_ADDRESS", |v| v.parse().ok())
                .unwrap_or(defaults.multivault_address),
            chain_id: parse_var("INTUITION_CHAIN_ID", |v| v.parse().ok())
                .unwrap_or(defaults.chain_id),
            atom_cost: parse_var("INTUITION_ATOM_COST_WEI", |v| U256::from_dec_str(v).ok())
                .unwrap_or(defaults.atom_cost),
            triple_cost: parse_var("INTUITION_TRIPLE_COST_WEI", |v| U256::from_dec_str(v).ok())
                .unwrap_or(defaults.triple_cost),
            signature_timeout_secs: parse_var("INTUITION_SIGNATURE_TIMEOUT_SECS", |v| {
                v.parse().ok()
            })
            .unwrap_or(defaults.signature_timeout_secs),
            receipt_timeout_secs: parse_var("INTUITION_RECEIPT_TIMEOUT_SECS", |v| v.parse().ok())
                .unwrap_or(defaults.receipt_timeout_secs),
        }
    }

    /// Signature bound, `None` when unbounded.
    pub fn signature_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.signature_timeout_secs)
    }

    /// Receipt bound, `None` when unbounded.
    pub fn receipt_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.receipt_timeout_secs)
    }
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn parse_var<T>(name: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<T> {
    let raw = env::var(name).ok()?;
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        warn!(variable = name, value = %raw, "Ignoring unparseable configuration value");
    }
    parsed
}
