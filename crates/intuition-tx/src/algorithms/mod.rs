//! # Algorithms Module
//!
//! Pure logic: the state reducer, ABI encoding, fixed-point amounts.

pub mod abi;
pub mod fixed_point;
pub mod reducer;

pub use abi::{encode_args, encode_call, read_uint_arg};
pub use fixed_point::{format_ether, format_units, parse_ether, parse_units, ETHER_DECIMALS};
pub use reducer::reduce;
