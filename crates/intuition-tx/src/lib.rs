//! # Intuition Transaction Lifecycle
//!
//! Submits writes to the EthMultiVault contract and tracks each one from
//! wallet signature to chain inclusion.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Every user-initiated write (create an atom or triple, deposit, redeem,
//! follow, save a list) runs through one [`TransactionCoordinator`]:
//! - a pure reducer owns the status transitions
//! - the coordinator signs, broadcasts, awaits the receipt, and invalidates
//!   stale read-queries
//! - small [`WriteDescriptor`]s pick the function, arguments, and value
//!
//! ## Phases
//!
//! | Flow | Ordering |
//! |------|----------|
//! | Simple | idle → awaiting → hash → transaction-confirmed → complete |
//! | Identity creation | idle → review-transaction → confirm → awaiting → hash → transaction-pending → transaction-confirmed → complete |
//!
//! `error` is reachable from every phase.
//!
//! ## Module Structure
//!
//! ```text
//! intuition-tx/
//! ├── domain/          # State, actions, ABI types, errors, invariants
//! ├── algorithms/      # Reducer, ABI encoding, fixed-point amounts
//! ├── ports/           # ChainWriteApi, WalletProvider, CallEncoder, QueryCache
//! ├── adapters/        # Static encoder, in-memory cache, simulated wallet
//! ├── coordinator.rs   # TransactionCoordinator
//! └── mutations/       # CreateAtom, CreateTriple, Stake, Follow, SaveList
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod config;
pub mod coordinator;
pub mod domain;
pub mod mutations;
pub mod ports;

// Re-exports
pub use adapters::{
    InMemoryQueryCache, SimulatedWallet, StaticAbiEncoder, StaticSession, WalletBehavior,
};
pub use algorithms::{encode_call, format_ether, parse_ether, parse_units, reduce};
pub use config::TxConfig;
pub use coordinator::{CoordinatorSettings, TransactionCoordinator};
pub use domain::{
    invariant_hash_recorded, invariant_idle_is_clean, invariant_monotonic_phases, Address,
    ErrorKind, FlowKind, QueryKey, TransactionAction, TransactionState, TxError, TxHash,
    TxReceipt, TxStatus, WriteRequest, U256,
};
pub use mutations::{
    CreateAtom, CreateTriple, Follow, FollowMode, MutationClient, SaveList, SaveMode, Stake,
    StakeMode, TripleRef, VaultKind, WriteDescriptor,
};
pub use ports::{CallEncoder, ChainWriteApi, QueryCache, SessionProvider, WalletProvider};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
