//! Static ABI Encoder Adapter
//!
//! Implements `CallEncoder` over a fixed function table.

use crate::algorithms::encode_call;
use crate::domain::{multivault_abi, AbiFunction, AbiValue, TxError};
use crate::ports::outbound::CallEncoder;
use std::collections::HashMap;
use tracing::trace;

/// Encoder backed by a known set of function signatures.
pub struct StaticAbiEncoder {
    functions: HashMap<String, AbiFunction>,
}

impl StaticAbiEncoder {
    /// Encoder with no functions.
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Encoder for the EthMultiVault write functions.
    pub fn multivault() -> Self {
        multivault_abi()
            .into_iter()
            .fold(Self::new(), |encoder, f| encoder.with_function(f))
    }

    /// Add or replace a function.
    pub fn with_function(mut self, function: AbiFunction) -> Self {
        self.functions.insert(function.name.clone(), function);
        self
    }

    /// Look up a function by name.
    pub fn function(&self, name: &str) -> Option<&AbiFunction> {
        self.functions.get(name)
    }
}

impl Default for StaticAbiEncoder {
    fn default() -> Self {
        Self::multivault()
    }
}

impl CallEncoder for StaticAbiEncoder {
    fn encode(&self, function: &str, args: &[AbiValue]) -> Result<Vec<u8>, TxError> {
        let abi = self
            .functions
            .get(function)
            .ok_or_else(|| TxError::UnknownFunction(function.to_string()))?;

        let data = encode_call(abi, args)?;
        trace!(function = %abi.signature(), bytes = data.len(), "Encoded call data");
        Ok(data)
    }

    fn is_payable(&self, function: &str) -> Option<bool> {
        self.functions.get(function).map(|f| f.payable)
    }
}
