//! # Mutation Descriptors
//!
//! Each multivault write is a small [`WriteDescriptor`]: which function,
//! which arguments, how much value, which cached queries go stale. One
//! [`TransactionCoordinator`] runs all of them.

mod create;
mod social;
mod stake;

pub use create::{CreateAtom, CreateTriple};
pub use social::{Follow, FollowMode, SaveList, SaveMode};
pub use stake::{Stake, StakeMode, VaultKind};

use crate::config::TxConfig;
use crate::coordinator::{CoordinatorSettings, TransactionCoordinator};
use crate::domain::{
    AbiValue, Address, FlowKind, QueryKey, TransactionState, TxError, TxHash, WriteRequest, U256,
};
use crate::ports::outbound::{CallEncoder, QueryCache, SessionProvider, WalletProvider};
use std::sync::Arc;
use tracing::debug;

/// Binding of one user action to a contract call.
pub trait WriteDescriptor: Send + Sync {
    /// ABI function name.
    fn function(&self) -> &'static str;

    /// Call arguments for `sender`.
    fn args(&self, sender: Address) -> Result<Vec<AbiValue>, TxError>;

    /// Native value to attach (wei).
    fn value(&self) -> Result<U256, TxError> {
        Ok(U256::zero())
    }

    /// Cached queries made stale by a successful write from `sender`.
    fn invalidates(&self, sender: Address) -> Vec<QueryKey>;

    /// Phase ordering the write follows.
    fn flow(&self) -> FlowKind {
        FlowKind::Simple
    }

    /// Assemble the request sent to `contract`.
    fn build_request(&self, contract: Address, sender: Address) -> Result<WriteRequest, TxError> {
        Ok(WriteRequest::new(contract, self.function(), self.args(sender)?)
            .with_value(self.value()?)
            .invalidating(self.invalidates(sender)))
    }
}

/// Query keys shared by the read side.
pub mod keys {
    use crate::domain::{Address, QueryKey, U256};

    /// Atom listings.
    pub fn atoms() -> QueryKey {
        QueryKey::new(["atoms"])
    }

    /// Triple listings.
    pub fn triples() -> QueryKey {
        QueryKey::new(["triples"])
    }

    /// Totals of one vault.
    pub fn vault(id: U256) -> QueryKey {
        QueryKey::new(["vault".to_string(), id.to_string()])
    }

    /// Positions held by `account`.
    pub fn positions(account: Address) -> QueryKey {
        QueryKey::new(["positions".to_string(), account.to_string()])
    }

    /// Identities `account` follows.
    pub fn following(account: Address) -> QueryKey {
        QueryKey::new(["following".to_string(), account.to_string()])
    }

    /// Lists `account` saved.
    pub fn saved_lists(account: Address) -> QueryKey {
        QueryKey::new(["saved-lists".to_string(), account.to_string()])
    }
}

/// Subject, predicate, object atom ids of a triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TripleRef {
    /// Subject atom.
    pub subject: U256,
    /// Predicate atom.
    pub predicate: U256,
    /// Object atom.
    pub object: U256,
}

impl TripleRef {
    /// Triple from its three atom ids.
    pub fn new(subject: U256, predicate: U256, object: U256) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    pub(crate) fn to_args(self) -> Vec<AbiValue> {
        vec![
            AbiValue::Uint(self.subject),
            AbiValue::Uint(self.predicate),
            AbiValue::Uint(self.object),
        ]
    }
}

/// Builds coordinators for descriptors from shared handles.
pub struct MutationClient<W: WalletProvider, E: CallEncoder> {
    wallet: Arc<W>,
    encoder: Arc<E>,
    session: Arc<dyn SessionProvider>,
    cache: Arc<dyn QueryCache>,
    config: TxConfig,
}

impl<W, E> MutationClient<W, E>
where
    W: WalletProvider + 'static,
    E: CallEncoder + 'static,
{
    /// Client writing to `config.multivault_address`.
    pub fn new(
        wallet: Arc<W>,
        encoder: Arc<E>,
        session: Arc<dyn SessionProvider>,
        cache: Arc<dyn QueryCache>,
        config: TxConfig,
    ) -> Self {
        Self {
            wallet,
            encoder,
            session,
            cache,
            config,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &TxConfig {
        &self.config
    }

    /// Fresh `idle` coordinator suited to `descriptor`.
    pub fn coordinator_for(
        &self,
        descriptor: &dyn WriteDescriptor,
    ) -> TransactionCoordinator<W, E> {
        TransactionCoordinator::new(
            Arc::clone(&self.wallet),
            Arc::clone(&self.encoder),
            Arc::clone(&self.session),
            CoordinatorSettings::from_config(&self.config, descriptor.flow()),
        )
        .with_query_cache(Arc::clone(&self.cache))
    }

    /// Submit `descriptor` on a new coordinator.
    ///
    /// Returns the coordinator so the caller can observe or reset it.
    pub async fn submit(
        &self,
        descriptor: &dyn WriteDescriptor,
    ) -> Result<(TransactionCoordinator<W, E>, TxHash), TxError> {
        let coordinator = self.coordinator_for(descriptor);
        let hash = coordinator
            .submit_mutation(self.config.multivault_address, descriptor)
            .await?;
        Ok((coordinator, hash))
    }

    /// Submit `descriptor` and wait for the terminal state.
    pub async fn execute(
        &self,
        descriptor: &dyn WriteDescriptor,
    ) -> Result<TransactionState, TxError> {
        let (coordinator, hash) = self.submit(descriptor).await?;
        debug!(%hash, function = descriptor.function(), "Waiting for settlement");
        Ok(coordinator.settled().await)
    }
}
