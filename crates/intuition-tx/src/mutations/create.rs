//! Atom and triple creation.

use super::{keys, TripleRef, WriteDescriptor};
use crate::algorithms::parse_ether;
use crate::domain::{functions, AbiValue, Address, FlowKind, QueryKey, TxError, U256};

fn creation_value(function: &str, cost: U256, deposit: &str) -> Result<U256, TxError> {
    cost.checked_add(parse_ether(deposit)?)
        .ok_or_else(|| TxError::InvalidAmount(format!("{function}: cost plus deposit overflows")))
}

/// `createAtom(bytes)`: mint an identity from its metadata URI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateAtom {
    /// Metadata URI stored as the atom data.
    pub uri: String,
    /// Creation fee (wei).
    pub cost: U256,
    /// Initial deposit in ether, decimal. Blank is zero.
    pub initial_deposit: String,
}

impl CreateAtom {
    /// Atom for `uri` paying `cost` plus `initial_deposit`.
    pub fn new(uri: impl Into<String>, cost: U256, initial_deposit: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            cost,
            initial_deposit: initial_deposit.into(),
        }
    }
}

impl WriteDescriptor for CreateAtom {
    fn function(&self) -> &'static str {
        functions::CREATE_ATOM
    }

    fn args(&self, _sender: Address) -> Result<Vec<AbiValue>, TxError> {
        if self.uri.trim().is_empty() {
            return Err(TxError::encoding(functions::CREATE_ATOM, "atom URI is empty"));
        }
        Ok(vec![AbiValue::Bytes(self.uri.as_bytes().to_vec())])
    }

    fn value(&self) -> Result<U256, TxError> {
        creation_value(functions::CREATE_ATOM, self.cost, &self.initial_deposit)
    }

    fn invalidates(&self, sender: Address) -> Vec<QueryKey> {
        vec![keys::atoms(), keys::positions(sender)]
    }

    fn flow(&self) -> FlowKind {
        FlowKind::IdentityCreation
    }
}

/// `createTriple(uint256,uint256,uint256)`: claim linking three atoms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateTriple {
    /// Atoms making up the claim.
    pub triple: TripleRef,
    /// Creation fee (wei).
    pub cost: U256,
    /// Initial deposit in ether, decimal. Blank is zero.
    pub initial_deposit: String,
}

impl CreateTriple {
    /// Claim for `triple` paying `cost` plus `initial_deposit`.
    pub fn new(triple: TripleRef, cost: U256, initial_deposit: impl Into<String>) -> Self {
        Self {
            triple,
            cost,
            initial_deposit: initial_deposit.into(),
        }
    }
}

impl WriteDescriptor for CreateTriple {
    fn function(&self) -> &'static str {
        functions::CREATE_TRIPLE
    }

    fn args(&self, _sender: Address) -> Result<Vec<AbiValue>, TxError> {
        Ok(self.triple.to_args())
    }

    fn value(&self) -> Result<U256, TxError> {
        creation_value(functions::CREATE_TRIPLE, self.cost, &self.initial_deposit)
    }

    fn invalidates(&self, sender: Address) -> Vec<QueryKey> {
        vec![keys::triples(), keys::positions(sender)]
    }

    fn flow(&self) -> FlowKind {
        FlowKind::IdentityCreation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: Address = Address::new([0x11; 20]);
    const ATOM_COST: u64 = 300_000_000_000_000;

    #[test]
    fn test_create_atom_value_adds_deposit() {
        let atom = CreateAtom::new("ipfs://bafy", U256::from(ATOM_COST), "0.01");
        assert_eq!(
            atom.value().unwrap(),
            U256::from(ATOM_COST + 10_000_000_000_000_000)
        );
    }

    #[test]
    fn test_blank_deposit_is_cost_only() {
        let atom = CreateAtom::new("ipfs://bafy", U256::from(ATOM_COST), "  ");
        assert_eq!(atom.value().unwrap(), U256::from(ATOM_COST));
    }

    #[test]
    fn test_create_atom_args() {
        let atom = CreateAtom::new("ipfs://bafy", U256::zero(), "");
        assert_eq!(
            atom.args(USER).unwrap(),
            vec![AbiValue::Bytes(b"ipfs://bafy".to_vec())]
        );
        assert_eq!(atom.invalidates(USER), vec![keys::atoms(), keys::positions(USER)]);
    }

    #[test]
    fn test_empty_uri_rejected() {
        let atom = CreateAtom::new("", U256::zero(), "");
        assert!(matches!(
            atom.args(USER),
            Err(TxError::EncodingError { .. })
        ));
    }

    #[test]
    fn test_malformed_deposit_rejected() {
        let atom = CreateAtom::new("ipfs://bafy", U256::zero(), "-1");
        assert!(matches!(atom.value(), Err(TxError::InvalidAmount(_))));
    }

    #[test]
    fn test_cost_overflow_rejected() {
        let triple = CreateTriple::new(
            TripleRef::new(U256::one(), U256::one(), U256::one()),
            U256::MAX,
            "1",
        );
        assert!(matches!(triple.value(), Err(TxError::InvalidAmount(_))));
    }

    #[test]
    fn test_create_triple() {
        let triple = CreateTriple::new(
            TripleRef::new(U256::from(10u64), U256::from(11u64), U256::from(12u64)),
            U256::from(400u64),
            "",
        );
        assert_eq!(triple.function(), "createTriple");
        assert_eq!(triple.args(USER).unwrap().len(), 3);
        assert_eq!(triple.value().unwrap(), U256::from(400u64));
        assert_eq!(triple.flow(), FlowKind::IdentityCreation);
    }
}
