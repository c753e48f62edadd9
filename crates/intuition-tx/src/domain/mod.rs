//! # Domain Module
//!
//! Core domain types for the transaction lifecycle.

pub mod contract;
pub mod entities;
pub mod errors;
pub mod invariants;
pub mod value_objects;

pub use contract::*;
pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use value_objects::*;
