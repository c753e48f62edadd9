//! # Transaction Coordinator
//!
//! Drives one write through wallet signing and chain inclusion, feeding the
//! reducer and publishing every new state to observers.
//!
//! ## Lifecycle
//!
//! ```text
//! submit ─► APPROVE ─► wallet.send_transaction ─► HASH ─► (PENDING) ─┐
//!                                                                    │ spawned
//!            COMPLETE ◄─ CONFIRMED ◄─ wallet.wait_for_receipt ◄──────┘
//! ```
//!
//! Any failure dispatches `TRANSACTION_ERROR`. `reset()` bumps a generation
//! counter; work started under an older generation can no longer write state.

use crate::algorithms::reduce;
use crate::config::TxConfig;
use crate::domain::{
    invariant_monotonic_phases, Address, FlowKind, QueryKey, TransactionAction,
    TransactionState, TxError, TxHash, TxStatus, UnsignedTx, WriteRequest,
};
use crate::mutations::WriteDescriptor;
use crate::ports::inbound::ChainWriteApi;
use crate::ports::outbound::{CallEncoder, QueryCache, SessionProvider, WalletProvider};

use async_trait::async_trait;
use intuition_telemetry::{metrics, InFlightGuard};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Per-coordinator settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoordinatorSettings {
    /// Phase ordering this coordinator follows.
    pub flow: FlowKind,
    /// Bound on the signature wait.
    pub signature_timeout: Option<Duration>,
    /// Bound on the receipt wait.
    pub receipt_timeout: Option<Duration>,
}

impl CoordinatorSettings {
    /// Settings for `flow` with the bounds from `config`.
    pub fn from_config(config: &TxConfig, flow: FlowKind) -> Self {
        Self {
            flow,
            signature_timeout: config.signature_timeout(),
            receipt_timeout: config.receipt_timeout(),
        }
    }
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self::from_config(&TxConfig::default(), FlowKind::Simple)
    }
}

struct Inner {
    state: TransactionState,
    generation: u64,
    history: Vec<TxStatus>,
}

/// Generic chain write coordinator.
///
/// Owns exactly one [`TransactionState`]. Cloning yields another handle to
/// the same state, not a new transaction.
pub struct TransactionCoordinator<W: WalletProvider, E: CallEncoder> {
    wallet: Arc<W>,
    encoder: Arc<E>,
    session: Arc<dyn SessionProvider>,
    cache: Option<Arc<dyn QueryCache>>,
    settings: CoordinatorSettings,
    inner: Arc<Mutex<Inner>>,
    updates: Arc<watch::Sender<TransactionState>>,
}

impl<W: WalletProvider, E: CallEncoder> Clone for TransactionCoordinator<W, E> {
    fn clone(&self) -> Self {
        Self {
            wallet: Arc::clone(&self.wallet),
            encoder: Arc::clone(&self.encoder),
            session: Arc::clone(&self.session),
            cache: self.cache.clone(),
            settings: self.settings,
            inner: Arc::clone(&self.inner),
            updates: Arc::clone(&self.updates),
        }
    }
}

impl<W, E> TransactionCoordinator<W, E>
where
    W: WalletProvider + 'static,
    E: CallEncoder + 'static,
{
    /// Create an `idle` coordinator.
    pub fn new(
        wallet: Arc<W>,
        encoder: Arc<E>,
        session: Arc<dyn SessionProvider>,
        settings: CoordinatorSettings,
    ) -> Self {
        let (updates, _) = watch::channel(TransactionState::default());
        Self {
            wallet,
            encoder,
            session,
            cache: None,
            settings,
            inner: Arc::new(Mutex::new(Inner {
                state: TransactionState::default(),
                generation: 0,
                history: vec![TxStatus::Idle],
            })),
            updates: Arc::new(updates),
        }
    }

    /// Invalidate entries of `cache` after each successful write.
    pub fn with_query_cache(mut self, cache: Arc<dyn QueryCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Settings in use.
    pub fn settings(&self) -> CoordinatorSettings {
        self.settings
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> TransactionState {
        self.inner.lock().state.clone()
    }

    /// Statuses the current transaction passed through.
    pub fn history(&self) -> Vec<TxStatus> {
        self.inner.lock().history.clone()
    }

    /// Receive every new state.
    pub fn subscribe(&self) -> watch::Receiver<TransactionState> {
        self.updates.subscribe()
    }

    /// Apply a flow-driven action to the current transaction.
    pub fn dispatch(&self, action: TransactionAction) {
        self.apply(None, action);
    }

    /// Back to `idle`, dropping hash, receipt, error, and payload.
    ///
    /// Anything already broadcast stays on chain; its late results are ignored.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.state = TransactionState::default();
        inner.history = vec![TxStatus::Idle];
        self.updates.send_replace(inner.state.clone());
        debug!(generation = inner.generation, "Transaction reset");
    }

    /// Wait until the state is `complete` or `error`.
    ///
    /// Never returns if nothing is submitted.
    pub async fn settled(&self) -> TransactionState {
        let mut rx = self.updates.subscribe();
        loop {
            let state = rx.borrow_and_update().clone();
            if state.is_settled() {
                return state;
            }
            if rx.changed().await.is_err() {
                return self.state();
            }
        }
    }

    /// Submit a write. Resolves with the hash once broadcast.
    #[instrument(skip(self, request), fields(function = %request.function))]
    pub async fn submit(&self, request: WriteRequest) -> Result<TxHash, TxError> {
        let generation = self.begin_submission();
        let request = self
            .session
            .active_address()
            .ok_or(TxError::NoSession)
            .map(|from| (from, request));
        self.run(generation, request).await
    }

    /// Build a request from `descriptor` for the session's account and submit it.
    #[instrument(skip(self, descriptor), fields(function = descriptor.function()))]
    pub async fn submit_mutation(
        &self,
        contract: Address,
        descriptor: &dyn WriteDescriptor,
    ) -> Result<TxHash, TxError> {
        let generation = self.begin_submission();
        let request = self
            .session
            .active_address()
            .ok_or(TxError::NoSession)
            .and_then(|sender| Ok((sender, descriptor.build_request(contract, sender)?)));
        self.run(generation, request).await
    }

    /// Start a new transaction and return its generation.
    ///
    /// A settled or in-flight predecessor is cleared; payload collected by a
    /// creation flow is kept.
    fn begin_submission(&self) -> u64 {
        let mut inner = self.inner.lock();
        let status = inner.state.status;

        if status.is_in_flight() {
            warn!(%status, "Submit while a previous write is outstanding; superseding it");
        }
        if status.is_in_flight() || status.is_terminal() {
            let payload = std::mem::take(&mut inner.state.payload);
            inner.state = TransactionState {
                payload,
                ..Default::default()
            };
            inner.history = vec![TxStatus::Idle];
            self.updates.send_replace(inner.state.clone());
        }

        inner.generation += 1;
        inner.generation
    }

    /// `request` carries the sender it was built for; the session is not read again.
    async fn run(
        &self,
        generation: u64,
        request: Result<(Address, WriteRequest), TxError>,
    ) -> Result<TxHash, TxError> {
        let function = request
            .as_ref()
            .map(|(_, r)| r.function.clone())
            .unwrap_or_default();

        match self.broadcast(generation, request).await {
            Ok((hash, invalidate)) => {
                if !self.apply(
                    Some(generation),
                    TransactionAction::TransactionHash {
                        tx_hash: hash.clone(),
                    },
                ) {
                    info!(%hash, "Transaction superseded before the wallet answered; not tracking");
                    return Ok(hash);
                }
                if self.settings.flow == FlowKind::IdentityCreation {
                    self.apply(Some(generation), TransactionAction::TransactionPending);
                }
                self.spawn_receipt_watch(generation, hash.clone(), function, invalidate);
                Ok(hash)
            }
            Err(err) => {
                self.fail(generation, &function, &err);
                Err(err)
            }
        }
    }

    async fn broadcast(
        &self,
        generation: u64,
        request: Result<(Address, WriteRequest), TxError>,
    ) -> Result<(TxHash, Vec<QueryKey>), TxError> {
        let (from, request) = request?;
        let data = self.encoder.encode(&request.function, &request.args)?;

        if !request.value.is_zero() && self.encoder.is_payable(&request.function) == Some(false) {
            return Err(TxError::EncodingError {
                function: request.function,
                reason: "value attached to a non-payable function".to_string(),
            });
        }

        self.apply(Some(generation), TransactionAction::ApproveTransaction);
        metrics::record_submitted(&request.function);
        debug!(%from, to = %request.to, value = %request.value, "Requesting signature");

        let tx = UnsignedTx {
            from,
            to: request.to,
            data,
            value: request.value,
        };
        let hash = bounded(
            self.settings.signature_timeout,
            "signature",
            self.wallet.send_transaction(tx),
        )
        .await?;

        Ok((hash, request.invalidate))
    }

    fn spawn_receipt_watch(
        &self,
        generation: u64,
        hash: TxHash,
        function: String,
        invalidate: Vec<QueryKey>,
    ) {
        let this = self.clone();
        tokio::spawn(async move {
            this.track_receipt(generation, hash, function, invalidate)
                .await;
        });
    }

    async fn track_receipt(
        &self,
        generation: u64,
        hash: TxHash,
        function: String,
        invalidate: Vec<QueryKey>,
    ) {
        let _in_flight = InFlightGuard::start();
        let started = Instant::now();

        let outcome = bounded(
            self.settings.receipt_timeout,
            "receipt",
            self.wallet.wait_for_receipt(&hash),
        )
        .await;

        match outcome {
            Ok(receipt) if receipt.is_success() => {
                // Chain state changed whether or not anyone still watches this transaction.
                self.invalidate(&invalidate);
                metrics::record_completed(&function, started.elapsed().as_secs_f64());

                if self.apply(Some(generation), TransactionAction::TransactionConfirmed) {
                    self.apply(
                        Some(generation),
                        TransactionAction::TransactionComplete {
                            tx_hash: hash.clone(),
                            tx_receipt: Some(receipt.clone()),
                        },
                    );
                }
                info!(%hash, block = receipt.block_number, %function, "Transaction complete");
            }
            Ok(receipt) => {
                let err = TxError::ChainRevert {
                    tx_hash: hash.to_string(),
                };
                debug!(block = receipt.block_number, "Receipt reports revert");
                self.fail(generation, &function, &err);
            }
            Err(err) => self.fail(generation, &function, &err),
        }
    }

    fn invalidate(&self, keys: &[QueryKey]) {
        if let Some(cache) = &self.cache {
            for key in keys {
                cache.invalidate(key);
            }
        }
    }

    fn fail(&self, generation: u64, function: &str, err: &TxError) {
        let kind = err.kind();
        metrics::record_failed(function, kind.as_str());
        warn!(%function, kind = kind.as_str(), error = %err, "Transaction failed");

        self.apply(
            Some(generation),
            TransactionAction::TransactionError {
                error: err.display_message(),
            },
        );
    }

    /// Reduce `action` into the state. With `Some(generation)`, the action
    /// is dropped unless that generation is still current.
    fn apply(&self, generation: Option<u64>, action: TransactionAction) -> bool {
        let mut inner = self.inner.lock();

        if let Some(generation) = generation {
            if generation != inner.generation {
                debug!(
                    action = action.name(),
                    stale = generation,
                    current = inner.generation,
                    "Dropping action from a superseded transaction"
                );
                return false;
            }
        }

        if action == TransactionAction::Unknown {
            debug!("Ignoring unrecognized transaction action");
            return true;
        }

        let before = inner.state.status;
        let state = std::mem::take(&mut inner.state);
        inner.state = reduce(state, action);

        let after = inner.state.status;
        if after != before {
            inner.history.push(after);
            if !invariant_monotonic_phases(self.settings.flow, &inner.history) {
                warn!(from = %before, to = %after, flow = ?self.settings.flow, "Out-of-order transaction phase");
            }
        }

        self.updates.send_replace(inner.state.clone());
        true
    }
}

async fn bounded<T, F>(limit: Option<Duration>, phase: &str, fut: F) -> Result<T, TxError>
where
    F: Future<Output = Result<T, TxError>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| TxError::Timeout {
                phase: phase.to_string(),
                elapsed_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            })?,
        None => fut.await,
    }
}

#[async_trait]
impl<W, E> ChainWriteApi for TransactionCoordinator<W, E>
where
    W: WalletProvider + 'static,
    E: CallEncoder + 'static,
{
    async fn submit(&self, request: WriteRequest) -> Result<TxHash, TxError> {
        TransactionCoordinator::submit(self, request).await
    }

    fn reset(&self) {
        TransactionCoordinator::reset(self)
    }

    fn dispatch(&self, action: TransactionAction) {
        TransactionCoordinator::dispatch(self, action)
    }

    fn state(&self) -> TransactionState {
        TransactionCoordinator::state(self)
    }

    async fn settled(&self) -> TransactionState {
        TransactionCoordinator::settled(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{
        InMemoryQueryCache, SimulatedWallet, StaticAbiEncoder, StaticSession, WalletBehavior,
    };
    use crate::algorithms::read_uint_arg;
    use crate::domain::{functions, invariant_hash_recorded, AbiValue, U256};
    use crate::mutations::Stake;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type TestCoordinator = TransactionCoordinator<SimulatedWallet, StaticAbiEncoder>;

    const SENDER: Address = Address::new([0xAA; 20]);
    const VAULT: Address = Address::new([0xCC; 20]);

    fn coordinator_with(wallet: SimulatedWallet, flow: FlowKind) -> TestCoordinator {
        TransactionCoordinator::new(
            Arc::new(wallet),
            Arc::new(StaticAbiEncoder::multivault()),
            Arc::new(StaticSession::connected(SENDER)),
            CoordinatorSettings {
                flow,
                signature_timeout: None,
                receipt_timeout: None,
            },
        )
    }

    fn deposit_request() -> WriteRequest {
        WriteRequest::new(
            VAULT,
            functions::DEPOSIT_ATOM,
            vec![AbiValue::Address(SENDER), AbiValue::Uint(U256::from(7u64))],
        )
        .with_value(U256::from(1_000u64))
        .invalidating([QueryKey::new(["vault", "7"])])
    }

    #[tokio::test]
    async fn test_deposit_happy_path() {
        let coordinator = coordinator_with(SimulatedWallet::new(), FlowKind::Simple);

        let hash = coordinator.submit(deposit_request()).await.unwrap();
        let state = coordinator.settled().await;

        assert_eq!(state.status, TxStatus::Complete);
        assert_eq!(state.tx_hash, Some(hash.clone()));
        assert_eq!(state.tx_receipt.unwrap().tx_hash, hash);
        assert_eq!(
            coordinator.history(),
            vec![
                TxStatus::Idle,
                TxStatus::Awaiting,
                TxStatus::Hash,
                TxStatus::TransactionConfirmed,
                TxStatus::Complete,
            ]
        );
    }

    #[tokio::test]
    async fn test_hash_dispatched_before_complete() {
        let coordinator = coordinator_with(SimulatedWallet::new(), FlowKind::Simple);
        let mut rx = coordinator.subscribe();

        coordinator.submit(deposit_request()).await.unwrap();
        coordinator.settled().await;

        // Every snapshot past `hash` carries the hash.
        let last = rx.borrow_and_update().clone();
        assert!(invariant_hash_recorded(&last));
        assert!(invariant_monotonic_phases(
            FlowKind::Simple,
            &coordinator.history()
        ));
    }

    #[tokio::test]
    async fn test_user_rejection() {
        let wallet = SimulatedWallet::new().with_script([WalletBehavior::Reject]);
        let coordinator = coordinator_with(wallet, FlowKind::Simple);

        let err = coordinator.submit(deposit_request()).await.unwrap_err();
        assert_eq!(err, TxError::UserRejected);

        let state = coordinator.state();
        assert_eq!(state.status, TxStatus::Error);
        assert_eq!(state.error.as_deref(), Some("User rejected"));
        assert!(state.tx_hash.is_none());
    }

    #[tokio::test]
    async fn test_network_failure_message() {
        let wallet = SimulatedWallet::new()
            .with_script([WalletBehavior::NetworkFailure("rpc unavailable".into())]);
        let coordinator = coordinator_with(wallet, FlowKind::Simple);

        assert!(coordinator.submit(deposit_request()).await.is_err());
        assert_eq!(coordinator.state().error.as_deref(), Some("rpc unavailable"));
    }

    #[tokio::test]
    async fn test_revert_becomes_error_with_hash_kept() {
        let wallet = SimulatedWallet::new().with_script([WalletBehavior::Revert]);
        let coordinator = coordinator_with(wallet, FlowKind::Simple);

        let hash = coordinator.submit(deposit_request()).await.unwrap();
        let state = coordinator.settled().await;

        assert_eq!(state.status, TxStatus::Error);
        assert_eq!(state.tx_hash, Some(hash));
        assert!(state.error.unwrap().contains("reverted"));
    }

    #[tokio::test]
    async fn test_encoding_error_dispatches_error() {
        let coordinator = coordinator_with(SimulatedWallet::new(), FlowKind::Simple);
        let request = WriteRequest::new(VAULT, functions::DEPOSIT_ATOM, vec![]);

        let err = coordinator.submit(request).await.unwrap_err();
        assert!(matches!(err, TxError::EncodingError { .. }));
        assert_eq!(coordinator.state().status, TxStatus::Error);
    }

    #[tokio::test]
    async fn test_value_on_non_payable_is_rejected() {
        let wallet = Arc::new(SimulatedWallet::new());
        let coordinator = TransactionCoordinator::new(
            Arc::clone(&wallet),
            Arc::new(StaticAbiEncoder::multivault()),
            Arc::new(StaticSession::connected(SENDER)),
            CoordinatorSettings::default(),
        );
        let request = WriteRequest::new(
            VAULT,
            functions::REDEEM_ATOM,
            vec![
                AbiValue::Uint(U256::one()),
                AbiValue::Address(SENDER),
                AbiValue::Uint(U256::one()),
            ],
        )
        .with_value(U256::one());

        assert!(coordinator.submit(request).await.is_err());
        assert!(wallet.sent().is_empty());
    }

    #[tokio::test]
    async fn test_no_session() {
        let coordinator: TestCoordinator = TransactionCoordinator::new(
            Arc::new(SimulatedWallet::new()),
            Arc::new(StaticAbiEncoder::multivault()),
            Arc::new(StaticSession::disconnected()),
            CoordinatorSettings::default(),
        );

        let err = coordinator.submit(deposit_request()).await.unwrap_err();
        assert_eq!(err, TxError::NoSession);
        assert_eq!(coordinator.state().status, TxStatus::Error);
    }

    #[tokio::test]
    async fn test_reset_after_terminal_states() {
        for behavior in [WalletBehavior::Confirm, WalletBehavior::Reject] {
            let wallet = SimulatedWallet::new().with_script([behavior]);
            let coordinator = coordinator_with(wallet, FlowKind::Simple);
            let _ = coordinator.submit(deposit_request()).await;
            let settled = coordinator.settled().await;
            assert!(settled.is_settled());

            coordinator.reset();
            let state = coordinator.state();
            assert_eq!(state.status, TxStatus::Idle);
            assert!(state.tx_hash.is_none());
            assert!(state.tx_receipt.is_none());
            assert!(state.error.is_none());
        }
    }

    #[tokio::test]
    async fn test_reset_mid_flight_ignores_late_wallet_answer() {
        let wallet = Arc::new(SimulatedWallet::new().gated());
        let coordinator = TransactionCoordinator::new(
            Arc::clone(&wallet),
            Arc::new(StaticAbiEncoder::multivault()),
            Arc::new(StaticSession::connected(SENDER)),
            CoordinatorSettings::default(),
        );

        let mut rx = coordinator.subscribe();
        let submitter = coordinator.clone();
        let handle = tokio::spawn(async move { submitter.submit(deposit_request()).await });

        while rx.borrow_and_update().status != TxStatus::Awaiting {
            rx.changed().await.unwrap();
        }

        coordinator.reset();
        wallet.release_signature();

        // The wallet still answers; the coordinator no longer listens.
        assert!(handle.await.unwrap().is_ok());
        tokio::task::yield_now().await;

        let state = coordinator.state();
        assert_eq!(state.status, TxStatus::Idle);
        assert!(state.tx_hash.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_signature_timeout() {
        let wallet = SimulatedWallet::new().with_script([WalletBehavior::HangOnSign]);
        let coordinator = TransactionCoordinator::new(
            Arc::new(wallet),
            Arc::new(StaticAbiEncoder::multivault()),
            Arc::new(StaticSession::connected(SENDER)),
            CoordinatorSettings {
                flow: FlowKind::Simple,
                signature_timeout: Some(Duration::from_secs(30)),
                receipt_timeout: None,
            },
        );

        let err = coordinator.submit(deposit_request()).await.unwrap_err();
        assert!(matches!(err, TxError::Timeout { ref phase, .. } if phase == "signature"));
        assert_eq!(coordinator.state().status, TxStatus::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_receipt_timeout() {
        let wallet = SimulatedWallet::new().with_script([WalletBehavior::HangOnReceipt]);
        let coordinator = TransactionCoordinator::new(
            Arc::new(wallet),
            Arc::new(StaticAbiEncoder::multivault()),
            Arc::new(StaticSession::connected(SENDER)),
            CoordinatorSettings {
                flow: FlowKind::Simple,
                signature_timeout: None,
                receipt_timeout: Some(Duration::from_secs(60)),
            },
        );

        let hash = coordinator.submit(deposit_request()).await.unwrap();
        let state = coordinator.settled().await;

        assert_eq!(state.status, TxStatus::Error);
        assert_eq!(state.tx_hash, Some(hash));
        assert!(state.error.unwrap().contains("receipt"));
    }

    #[tokio::test]
    async fn test_success_invalidates_query_keys() {
        let cache = Arc::new(InMemoryQueryCache::new());
        cache.put(QueryKey::new(["vault", "7"]), serde_json::json!({"assets": "1"}));
        let coordinator = coordinator_with(SimulatedWallet::new(), FlowKind::Simple)
            .with_query_cache(cache.clone());

        coordinator.submit(deposit_request()).await.unwrap();
        coordinator.settled().await;

        assert!(cache.get(&QueryKey::new(["vault", "7"])).is_none());
        assert_eq!(cache.invalidation_log(), vec![QueryKey::new(["vault", "7"])]);
    }

    #[tokio::test]
    async fn test_failure_leaves_cache_alone() {
        let cache = Arc::new(InMemoryQueryCache::new());
        let wallet = SimulatedWallet::new().with_script([WalletBehavior::Revert]);
        let coordinator = coordinator_with(wallet, FlowKind::Simple).with_query_cache(cache.clone());

        coordinator.submit(deposit_request()).await.unwrap();
        coordinator.settled().await;

        assert!(cache.invalidation_log().is_empty());
    }

    #[tokio::test]
    async fn test_identity_flow_phases() {
        let coordinator = coordinator_with(SimulatedWallet::new(), FlowKind::IdentityCreation);

        coordinator.dispatch(TransactionAction::ReviewTransaction);
        coordinator.dispatch(TransactionAction::ImageUploadComplete {
            image_url: "ipfs://avatar".to_string(),
        });
        coordinator.dispatch(TransactionAction::ConfirmTransaction);

        let request = WriteRequest::new(
            VAULT,
            functions::CREATE_ATOM,
            vec![AbiValue::Bytes(b"ipfs://atom".to_vec())],
        );
        coordinator.submit(request).await.unwrap();
        let state = coordinator.settled().await;

        assert_eq!(state.status, TxStatus::Complete);
        assert_eq!(state.payload.image_url.as_deref(), Some("ipfs://avatar"));
        assert_eq!(
            coordinator.history(),
            FlowKind::IdentityCreation.phases().to_vec()
        );
    }

    #[tokio::test]
    async fn test_resubmit_after_reset_is_new_transaction() {
        let wallet = Arc::new(SimulatedWallet::new());
        let coordinator = TransactionCoordinator::new(
            Arc::clone(&wallet),
            Arc::new(StaticAbiEncoder::multivault()),
            Arc::new(StaticSession::connected(SENDER)),
            CoordinatorSettings::default(),
        );

        let first = coordinator.submit(deposit_request()).await.unwrap();
        coordinator.settled().await;
        coordinator.reset();
        let second = coordinator.submit(deposit_request()).await.unwrap();
        coordinator.settled().await;

        assert_ne!(first, second);
        assert_eq!(wallet.sent().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submit_supersedes_receipt_wait() {
        let wallet = SimulatedWallet::new().with_receipt_delay(Duration::from_secs(10));
        let coordinator = coordinator_with(wallet, FlowKind::Simple);

        let first = coordinator.submit(deposit_request()).await.unwrap();
        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(coordinator.state().status, TxStatus::Hash);

        let second = coordinator.submit(deposit_request()).await.unwrap();
        assert_ne!(first, second);

        let state = coordinator.settled().await;
        assert_eq!(state.status, TxStatus::Complete);
        assert_eq!(state.tx_hash, Some(second.clone()));
        assert_eq!(state.tx_receipt.unwrap().tx_hash, second);
        assert_eq!(
            coordinator.history(),
            vec![
                TxStatus::Idle,
                TxStatus::Awaiting,
                TxStatus::Hash,
                TxStatus::TransactionConfirmed,
                TxStatus::Complete,
            ]
        );

        // Both receipts have long since landed; nothing moves.
        let before = coordinator.state();
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(coordinator.state(), before);
    }

    #[tokio::test]
    async fn test_second_submit_supersedes_awaiting() {
        let wallet = Arc::new(SimulatedWallet::new().gated());
        let coordinator = TransactionCoordinator::new(
            Arc::clone(&wallet),
            Arc::new(StaticAbiEncoder::multivault()),
            Arc::new(StaticSession::connected(SENDER)),
            CoordinatorSettings::default(),
        );

        let mut rx = coordinator.subscribe();
        let submitter = coordinator.clone();
        let first = tokio::spawn(async move { submitter.submit(deposit_request()).await });
        while rx.borrow_and_update().status != TxStatus::Awaiting {
            rx.changed().await.unwrap();
        }

        let submitter = coordinator.clone();
        let second = tokio::spawn(async move { submitter.submit(deposit_request()).await });
        // The second submission resets and reaches the wallet in one poll.
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().status, TxStatus::Awaiting);

        wallet.release_signature();
        wallet.release_signature();
        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();
        assert_ne!(first, second);

        let state = coordinator.settled().await;
        assert_eq!(state.status, TxStatus::Complete);
        assert_eq!(state.tx_hash, Some(second));
        assert_eq!(wallet.sent().len(), 2);
        assert!(invariant_monotonic_phases(
            FlowKind::Simple,
            &coordinator.history()
        ));
    }

    /// Hands out a different account on every lookup.
    struct RotatingSession {
        accounts: [Address; 2],
        lookups: AtomicUsize,
    }

    impl SessionProvider for RotatingSession {
        fn active_address(&self) -> Option<Address> {
            let n = self.lookups.fetch_add(1, Ordering::SeqCst);
            Some(self.accounts[n % 2])
        }
    }

    #[tokio::test]
    async fn test_mutation_signed_by_the_account_it_was_built_for() {
        let wallet = Arc::new(SimulatedWallet::new());
        let session = Arc::new(RotatingSession {
            accounts: [SENDER, Address::new([0xBB; 20])],
            lookups: AtomicUsize::new(0),
        });
        let coordinator = TransactionCoordinator::new(
            Arc::clone(&wallet),
            Arc::new(StaticAbiEncoder::multivault()),
            Arc::clone(&session) as Arc<dyn SessionProvider>,
            CoordinatorSettings::default(),
        );

        coordinator
            .submit_mutation(VAULT, &Stake::deposit_atom(U256::from(7u64), "1"))
            .await
            .unwrap();
        coordinator.settled().await;

        let sent = wallet.sent();
        let receiver = read_uint_arg(&sent[0].data, 0).unwrap();
        assert_eq!(sent[0].from, SENDER);
        assert_eq!(receiver, U256::from_big_endian(SENDER.as_bytes()));
        assert_eq!(session.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_dispatch_is_noop() {
        let coordinator = coordinator_with(SimulatedWallet::new(), FlowKind::Simple);
        coordinator.dispatch(TransactionAction::ApproveTransaction);
        let before = coordinator.state();

        coordinator.dispatch(TransactionAction::Unknown);
        assert_eq!(coordinator.state(), before);
    }
}
