//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits.

mod abi_encoder;
mod query_cache;
mod session;
mod simulated_wallet;

pub use abi_encoder::StaticAbiEncoder;
pub use query_cache::InMemoryQueryCache;
pub use session::StaticSession;
pub use simulated_wallet::{SimulatedWallet, WalletBehavior};
