//! Deposit into and redeem from atom or triple vaults.

use super::{keys, WriteDescriptor};
use crate::algorithms::parse_ether;
use crate::domain::{functions, AbiValue, Address, QueryKey, TxError, U256};

/// Direction of a stake change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StakeMode {
    /// Add assets; the amount is attached as value.
    Deposit,
    /// Burn shares; the amount is a share count.
    Redeem,
}

/// Which kind of vault a stake targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VaultKind {
    /// Vault of an atom.
    Atom,
    /// Vault of a triple.
    Triple,
}

/// Stake change on one vault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stake {
    /// Deposit or redeem.
    pub mode: StakeMode,
    /// Atom or triple vault.
    pub vault: VaultKind,
    /// Vault id.
    pub id: U256,
    /// Decimal amount, 18 decimals. Blank is zero.
    pub amount: String,
}

impl Stake {
    /// Stake change from its parts.
    pub fn new(mode: StakeMode, vault: VaultKind, id: U256, amount: impl Into<String>) -> Self {
        Self {
            mode,
            vault,
            id,
            amount: amount.into(),
        }
    }

    /// Deposit `amount` ether into atom vault `id`.
    pub fn deposit_atom(id: U256, amount: impl Into<String>) -> Self {
        Self::new(StakeMode::Deposit, VaultKind::Atom, id, amount)
    }

    /// Redeem `amount` shares from atom vault `id`.
    pub fn redeem_atom(id: U256, amount: impl Into<String>) -> Self {
        Self::new(StakeMode::Redeem, VaultKind::Atom, id, amount)
    }

    /// Deposit `amount` ether into triple vault `id`.
    pub fn deposit_triple(id: U256, amount: impl Into<String>) -> Self {
        Self::new(StakeMode::Deposit, VaultKind::Triple, id, amount)
    }

    /// Redeem `amount` shares from triple vault `id`.
    pub fn redeem_triple(id: U256, amount: impl Into<String>) -> Self {
        Self::new(StakeMode::Redeem, VaultKind::Triple, id, amount)
    }
}

/// Arguments of a deposit or redeem on vault `id` for `receiver`.
///
/// Deposits take `(receiver, id)` with the amount as value; redeems take
/// `(shares, receiver, id)`.
pub(super) fn stake_args(
    mode: StakeMode,
    receiver: Address,
    id: U256,
    amount: &str,
) -> Result<Vec<AbiValue>, TxError> {
    Ok(match mode {
        StakeMode::Deposit => vec![AbiValue::Address(receiver), AbiValue::Uint(id)],
        StakeMode::Redeem => vec![
            AbiValue::Uint(parse_ether(amount)?),
            AbiValue::Address(receiver),
            AbiValue::Uint(id),
        ],
    })
}

/// Value attached to a deposit or redeem.
pub(super) fn stake_value(mode: StakeMode, amount: &str) -> Result<U256, TxError> {
    match mode {
        StakeMode::Deposit => parse_ether(amount),
        StakeMode::Redeem => Ok(U256::zero()),
    }
}

impl WriteDescriptor for Stake {
    fn function(&self) -> &'static str {
        match (self.mode, self.vault) {
            (StakeMode::Deposit, VaultKind::Atom) => functions::DEPOSIT_ATOM,
            (StakeMode::Redeem, VaultKind::Atom) => functions::REDEEM_ATOM,
            (StakeMode::Deposit, VaultKind::Triple) => functions::DEPOSIT_TRIPLE,
            (StakeMode::Redeem, VaultKind::Triple) => functions::REDEEM_TRIPLE,
        }
    }

    fn args(&self, sender: Address) -> Result<Vec<AbiValue>, TxError> {
        stake_args(self.mode, sender, self.id, &self.amount)
    }

    fn value(&self) -> Result<U256, TxError> {
        stake_value(self.mode, &self.amount)
    }

    fn invalidates(&self, sender: Address) -> Vec<QueryKey> {
        vec![keys::vault(self.id), keys::positions(sender)]
    }
}
