//! # ABI Encoding
//!
//! Solidity call-data encoding for the value types in [`AbiValue`].
//! Layout: 4-byte selector, one 32-byte head word per argument, then the
//! tails of dynamic arguments referenced by offset.

use crate::domain::{AbiFunction, AbiValue, TxError, U256};

const WORD: usize = 32;

/// Encode a call to `function` with `args`.
///
/// Fails with [`TxError::EncodingError`] on arity or type mismatch.
pub fn encode_call(function: &AbiFunction, args: &[AbiValue]) -> Result<Vec<u8>, TxError> {
    if args.len() != function.inputs.len() {
        return Err(TxError::encoding(
            &function.name,
            format!(
                "expected {} arguments, got {}",
                function.inputs.len(),
                args.len()
            ),
        ));
    }

    for (i, (expected, arg)) in function.inputs.iter().zip(args).enumerate() {
        if arg.abi_type() != *expected {
            return Err(TxError::encoding(
                &function.name,
                format!("argument {i}: expected {expected}, got {}", arg.abi_type()),
            ));
        }
    }

    let mut out = Vec::with_capacity(4 + WORD * args.len());
    out.extend_from_slice(&function.selector());
    out.extend(encode_args(args));
    Ok(out)
}

/// Encode arguments without a selector.
pub fn encode_args(args: &[AbiValue]) -> Vec<u8> {
    let mut head = Vec::with_capacity(WORD * args.len());
    let mut tail = Vec::new();
    let head_len = WORD * args.len();

    for arg in args {
        match arg {
            AbiValue::Bytes(data) => {
                head.extend_from_slice(&uint_word(U256::from(head_len + tail.len())));
                tail.extend_from_slice(&uint_word(U256::from(data.len())));
                tail.extend_from_slice(data);
                let padding = (WORD - data.len() % WORD) % WORD;
                tail.extend(std::iter::repeat(0u8).take(padding));
            }
            AbiValue::Address(addr) => {
                let mut word = [0u8; WORD];
                word[WORD - 20..].copy_from_slice(addr.as_bytes());
                head.extend_from_slice(&word);
            }
            AbiValue::Uint(v) => head.extend_from_slice(&uint_word(*v)),
            AbiValue::Bool(b) => head.extend_from_slice(&uint_word(U256::from(u8::from(*b)))),
        }
    }

    head.extend(tail);
    head
}

fn uint_word(value: U256) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    value.to_big_endian(&mut word);
    word
}

/// Read the `index`-th head word of encoded call data as a uint.
pub fn read_uint_arg(calldata: &[u8], index: usize) -> Option<U256> {
    let start = 4 + index * WORD;
    calldata
        .get(start..start + WORD)
        .map(U256::from_big_endian)
}
