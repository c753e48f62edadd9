//! # Contract Interface
//!
//! ABI types and the EthMultiVault write functions this crate drives.

use super::value_objects::{Address, U256};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;

/// Solidity parameter types used by the multivault write functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbiType {
    /// `address`
    Address,
    /// `uint256`
    Uint256,
    /// `bytes` (dynamic)
    Bytes,
    /// `bool`
    Bool,
}

impl AbiType {
    /// Canonical Solidity name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Uint256 => "uint256",
            Self::Bytes => "bytes",
            Self::Bool => "bool",
        }
    }

    /// Dynamic types are encoded by offset in the head.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Bytes)
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One call argument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum AbiValue {
    /// `address`
    Address(Address),
    /// `uint256`
    Uint(U256),
    /// `bytes`
    Bytes(Vec<u8>),
    /// `bool`
    Bool(bool),
}

impl AbiValue {
    /// Type this value encodes as.
    pub fn abi_type(&self) -> AbiType {
        match self {
            Self::Address(_) => AbiType::Address,
            Self::Uint(_) => AbiType::Uint256,
            Self::Bytes(_) => AbiType::Bytes,
            Self::Bool(_) => AbiType::Bool,
        }
    }
}

/// A contract function signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiFunction {
    /// Function name, e.g. `depositAtom`.
    pub name: String,
    /// Parameter types in declaration order.
    pub inputs: Vec<AbiType>,
    /// Accepts native value.
    pub payable: bool,
}

impl AbiFunction {
    /// Create a function description.
    pub fn new(name: impl Into<String>, inputs: Vec<AbiType>, payable: bool) -> Self {
        Self {
            name: name.into(),
            inputs,
            payable,
        }
    }

    /// Canonical signature, e.g. `depositAtom(address,uint256)`.
    pub fn signature(&self) -> String {
        let params: Vec<&str> = self.inputs.iter().map(AbiType::as_str).collect();
        format!("{}({})", self.name, params.join(","))
    }

    /// First four bytes of Keccak-256 over the signature.
    pub fn selector(&self) -> [u8; 4] {
        let digest = Keccak256::digest(self.signature().as_bytes());
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&digest[..4]);
        selector
    }
}

/// EthMultiVault function names.
pub mod functions {
    /// `createAtom(bytes atomUri)`
    pub const CREATE_ATOM: &str = "createAtom";
    /// `createTriple(uint256 subjectId, uint256 predicateId, uint256 objectId)`
    pub const CREATE_TRIPLE: &str = "createTriple";
    /// `depositAtom(address receiver, uint256 id)`
    pub const DEPOSIT_ATOM: &str = "depositAtom";
    /// `redeemAtom(uint256 shares, address receiver, uint256 id)`
    pub const REDEEM_ATOM: &str = "redeemAtom";
    /// `depositTriple(address receiver, uint256 id)`
    pub const DEPOSIT_TRIPLE: &str = "depositTriple";
    /// `redeemTriple(uint256 shares, address receiver, uint256 id)`
    pub const REDEEM_TRIPLE: &str = "redeemTriple";
}

/// Write functions of the EthMultiVault.
pub fn multivault_abi() -> Vec<AbiFunction> {
    use functions::*;
    use AbiType::{Address, Bytes, Uint256};

    vec![
        AbiFunction::new(CREATE_ATOM, vec![Bytes], true),
        AbiFunction::new(CREATE_TRIPLE, vec![Uint256, Uint256, Uint256], true),
        AbiFunction::new(DEPOSIT_ATOM, vec![Address, Uint256], true),
        AbiFunction::new(REDEEM_ATOM, vec![Uint256, Address, Uint256], false),
        AbiFunction::new(DEPOSIT_TRIPLE, vec![Address, Uint256], true),
        AbiFunction::new(REDEEM_TRIPLE, vec![Uint256, Address, Uint256], false),
    ]
}
