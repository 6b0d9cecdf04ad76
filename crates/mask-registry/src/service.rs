//! # Mask Registry Service
//!
//! Async service that owns the registry state and wires it to the driven
//! ports.
//!
//! ## Commit Model
//!
//! Every mutating call takes the state write guard and holds it until the
//! call is finished, including the membership-balance await. Calls are
//! therefore applied one at a time in lock order, and two mints racing for
//! the last identifier resolve to one winner and one `MaxSupplyExceeded`.
//!
//! A rejected call mutates nothing and emits nothing. A committed call
//! appends its events to the log while still holding the guard, so the log
//! order equals the commit order.

use crate::adapters::{InMemoryBlockHashes, InMemoryMembershipLedger, OriginCallerClassifier};
use crate::config::RegistryConfig;
use crate::domain::entities::{Allocation, BlockContext, CallContext};
use crate::domain::invariants::{check_all_invariants, InvariantCheckResult};
use crate::domain::registry::{Committed, RegistryState};
use crate::domain::value_objects::{Address, Hash, TokenId, U256};
use crate::errors::{ConfigError, OracleError, RegistryError};
use crate::events::RegistryEvent;
use crate::ports::inbound::MaskRegistryApi;
use crate::ports::outbound::{BalanceOracle, BlockHashOracle, CallerClassifier};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

/// Statistics for the Mask Registry Service.
#[derive(Debug, Default, Clone)]
pub struct ServiceStats {
    /// Successful public mints.
    pub mints: u64,
    /// Records issued to the owner through reservations.
    pub reserved_records: u64,
    /// Calls rejected with a `RegistryError`.
    pub rejected_calls: u64,
    /// Rejections caused by the balance oracle.
    pub oracle_failures: u64,
}

/// The main Mask Registry Service.
pub struct MaskRegistryService<O: BalanceOracle, C: CallerClassifier, H: BlockHashOracle> {
    /// Registry state; the write guard is the commit lock.
    state: Arc<RwLock<RegistryState>>,
    /// Membership balance oracle.
    oracle: Arc<O>,
    /// Direct-caller detector.
    classifier: C,
    /// Historical block hashes.
    block_hashes: Arc<H>,
    /// Append-only log of committed events.
    events: Arc<RwLock<Vec<RegistryEvent>>>,
    /// Service statistics.
    stats: Arc<RwLock<ServiceStats>>,
}

impl<O: BalanceOracle, C: CallerClassifier, H: BlockHashOracle> MaskRegistryService<O, C, H> {
    /// Create a registry owned by `owner`.
    pub fn new(
        config: RegistryConfig,
        owner: Address,
        oracle: Arc<O>,
        classifier: C,
        block_hashes: Arc<H>,
    ) -> Result<Self, ConfigError> {
        let state = RegistryState::new(config, owner)?;
        info!(
            %owner,
            max_supply = state.config().max_total_records,
            "mask registry created"
        );

        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            oracle,
            classifier,
            block_hashes,
            events: Arc::new(RwLock::new(Vec::new())),
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        })
    }

    /// Get current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// Every event committed so far, in commit order.
    pub async fn events(&self) -> Vec<RegistryEvent> {
        self.events.read().await.clone()
    }

    /// Copy of the full registry state.
    pub async fn snapshot(&self) -> RegistryState {
        self.state.read().await.clone()
    }

    /// The membership balance oracle.
    pub fn oracle(&self) -> &Arc<O> {
        &self.oracle
    }

    // =========================================================================
    // COMMIT HELPERS
    // =========================================================================

    /// Publishes a committed call's events and verifies the invariants.
    ///
    /// Must be called while the state write guard is held.
    async fn publish<T>(&self, state: &RegistryState, committed: Committed<T>) -> T {
        let check = check_all_invariants(state);
        if let InvariantCheckResult::Invalid(violations) = &check {
            for violation in violations {
                error!(%violation, "registry invariant violated");
            }
        }
        debug_assert!(check.is_valid(), "registry invariants violated: {check:?}");

        if !committed.events.is_empty() {
            debug!(count = committed.events.len(), "publishing events");
            self.events.write().await.extend(committed.events);
        }
        committed.output
    }

    /// Logs and counts a rejected call.
    async fn reject(&self, operation: &'static str, err: RegistryError) -> RegistryError {
        warn!(operation, reason = err.reason(), error = %err, "call rejected");

        let mut stats = self.stats.write().await;
        stats.rejected_calls += 1;
        if matches!(err, RegistryError::OracleUnavailable(_)) {
            stats.oracle_failures += 1;
        }
        err
    }

    /// Membership balance of `holder`, bounded by the configured time limit.
    async fn query_balance(&self, holder: Address, timeout_ms: u64) -> Result<U256, OracleError> {
        let timeout = Duration::from_millis(timeout_ms);
        match tokio::time::timeout(timeout, self.oracle.balance_of(holder)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(%holder, timeout_ms, "membership balance query timed out");
                Err(OracleError::Timeout)
            }
        }
    }

    /// Intermediary, payment and balance checks, then the domain mint.
    async fn mint_locked(
        &self,
        state: &mut RegistryState,
        ctx: &CallContext,
    ) -> Result<Committed<TokenId>, RegistryError> {
        if !self.classifier.is_direct_caller(ctx) {
            return Err(RegistryError::IntermediaryRejected {
                caller: ctx.caller,
                origin: ctx.origin,
            });
        }

        // Cheap rejection before the oracle round-trip.
        state.check_payment(ctx.value)?;

        let timeout_ms = state.config().oracle_timeout_ms;
        let balance = self.query_balance(ctx.caller, timeout_ms).await?;
        state.mint(ctx, balance)
    }

    /// Resolves the seed block hash, then derives the index.
    async fn starting_index_locked(
        &self,
        state: &mut RegistryState,
        current_block: u64,
    ) -> Result<Committed<u64>, RegistryError> {
        let source = state.starting_index_source(current_block)?;
        let hash = self
            .block_hashes
            .get_block_hash(source, current_block)
            .await
            .ok_or(RegistryError::BlockHashUnavailable { number: source })?;
        state.set_starting_index(hash)
    }

    // =========================================================================
    // SUPPLEMENTARY OPERATIONS
    // =========================================================================

    /// Derive the starting index from the recorded block. Callable by anyone, once.
    #[instrument(skip(self))]
    pub async fn set_starting_index(&self, current_block: u64) -> Result<u64, RegistryError> {
        let mut state = self.state.write().await;
        match self.starting_index_locked(&mut state, current_block).await {
            Ok(committed) => {
                let index = self.publish(&state, committed).await;
                info!(starting_index = index, "starting index set");
                Ok(index)
            }
            Err(e) => Err(self.reject("set_starting_index", e).await),
        }
    }

    /// Owner-only. Record the current block as the starting-index seed.
    #[instrument(skip(self, block), fields(block = block.number))]
    pub async fn emergency_set_starting_index_block(
        &self,
        caller: Address,
        block: BlockContext,
    ) -> Result<u64, RegistryError> {
        let mut state = self.state.write().await;
        match state.emergency_set_starting_index_block(caller, &block) {
            Ok(committed) => {
                let recorded = self.publish(&state, committed).await;
                info!(block_number = recorded, "starting index block recorded");
                Ok(recorded)
            }
            Err(e) => Err(self.reject("emergency_set_starting_index_block", e).await),
        }
    }

    /// Owner-only. Pay the treasury out to the owner.
    #[instrument(skip(self))]
    pub async fn withdraw(&self, caller: Address) -> Result<U256, RegistryError> {
        let mut state = self.state.write().await;
        match state.withdraw(caller) {
            Ok(committed) => {
                let amount = self.publish(&state, committed).await;
                info!(%amount, "treasury withdrawn");
                Ok(amount)
            }
            Err(e) => Err(self.reject("withdraw", e).await),
        }
    }

    /// Owner-only. Hand ownership to `new_owner`.
    #[instrument(skip(self))]
    pub async fn transfer_ownership(
        &self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), RegistryError> {
        let mut state = self.state.write().await;
        match state.transfer_ownership(caller, new_owner) {
            Ok(committed) => {
                self.publish(&state, committed).await;
                info!(%new_owner, "ownership transferred");
                Ok(())
            }
            Err(e) => Err(self.reject("transfer_ownership", e).await),
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Total records issued.
    pub async fn total_supply(&self) -> u64 {
        self.state.read().await.total_supply()
    }

    /// Holder of record `id`.
    pub async fn owner_of(&self, id: TokenId) -> Result<Address, RegistryError> {
        self.state.read().await.owner_of(id)
    }

    /// Records held by `holder`.
    pub async fn balance_of(&self, holder: Address) -> u64 {
        self.state.read().await.balance_of(&holder)
    }

    /// Public mints made by `caller`.
    pub async fn mints_of(&self, caller: Address) -> u32 {
        self.state.read().await.mints_of(&caller)
    }

    /// Provenance commitment, if written.
    pub async fn provenance_hash(&self) -> Option<Hash> {
        self.state.read().await.provenance_hash()
    }

    /// Supply cap.
    pub async fn max_supply(&self) -> u64 {
        self.state.read().await.config().max_total_records
    }

    /// Price of one mint.
    pub async fn mint_price(&self) -> U256 {
        self.state.read().await.config().mint_price
    }

    /// Returns true once metadata is revealed.
    pub async fn is_revealed(&self) -> bool {
        self.state.read().await.is_revealed()
    }

    /// Recorded starting-index seed block.
    pub async fn starting_index_block(&self) -> Option<u64> {
        self.state.read().await.starting_index_block()
    }

    /// Derived starting index.
    pub async fn starting_index(&self) -> Option<u64> {
        self.state.read().await.starting_index()
    }

    /// Undistributed mint payments.
    pub async fn treasury(&self) -> U256 {
        self.state.read().await.treasury()
    }
}

/// Create a service with default configuration and in-memory adapters (for testing).
pub fn create_test_service(
    owner: Address,
) -> Result<
    MaskRegistryService<InMemoryMembershipLedger, OriginCallerClassifier, InMemoryBlockHashes>,
    ConfigError,
> {
    create_test_service_with_config(RegistryConfig::default(), owner)
}

/// Create a service with `config` and in-memory adapters (for testing).
pub fn create_test_service_with_config(
    config: RegistryConfig,
    owner: Address,
) -> Result<
    MaskRegistryService<InMemoryMembershipLedger, OriginCallerClassifier, InMemoryBlockHashes>,
    ConfigError,
> {
    MaskRegistryService::new(
        config,
        owner,
        Arc::new(InMemoryMembershipLedger::new()),
        OriginCallerClassifier,
        Arc::new(InMemoryBlockHashes::deterministic()),
    )
}

// =============================================================================
// MaskRegistryApi Implementation
// =============================================================================

#[async_trait]
impl<O: BalanceOracle, C: CallerClassifier, H: BlockHashOracle> MaskRegistryApi
    for MaskRegistryService<O, C, H>
{
    #[instrument(skip(self, ctx), fields(caller = %ctx.caller, block = ctx.block.number))]
    async fn mint_mask(&self, ctx: CallContext) -> Result<TokenId, RegistryError> {
        let mut state = self.state.write().await;
        match self.mint_locked(&mut state, &ctx).await {
            Ok(committed) => {
                let id = self.publish(&state, committed).await;
                self.stats.write().await.mints += 1;
                info!(token_id = id, "mask minted");
                Ok(id)
            }
            Err(e) => Err(self.reject("mint_mask", e).await),
        }
    }

    #[instrument(skip(self))]
    async fn reserve_tokens_to_owner(
        &self,
        caller: Address,
        count: u64,
    ) -> Result<Allocation, RegistryError> {
        let mut state = self.state.write().await;
        match state.reserve_to_owner(caller, count) {
            Ok(committed) => {
                let allocation = self.publish(&state, committed).await;
                self.stats.write().await.reserved_records += allocation.count;
                info!(
                    first_id = allocation.first_id,
                    last_id = allocation.last_id(),
                    reserved_total = state.reserved_tokens(),
                    "tokens reserved to owner"
                );
                Ok(allocation)
            }
            Err(e) => Err(self.reject("reserve_tokens_to_owner", e).await),
        }
    }

    #[instrument(skip(self))]
    async fn set_provenance_hash(&self, caller: Address, hash: Hash) -> Result<(), RegistryError> {
        let mut state = self.state.write().await;
        match state.set_provenance_hash(caller, hash) {
            Ok(committed) => {
                self.publish(&state, committed).await;
                info!(%hash, "provenance hash set");
                Ok(())
            }
            Err(e) => Err(self.reject("set_provenance_hash", e).await),
        }
    }

    #[instrument(skip(self))]
    async fn set_base_uri(&self, caller: Address, base_uri: String) -> Result<(), RegistryError> {
        let mut state = self.state.write().await;
        match state.set_base_uri(caller, base_uri) {
            Ok(committed) => {
                let outcome = self.publish(&state, committed).await;
                info!(?outcome, "base uri set");
                Ok(())
            }
            Err(e) => Err(self.reject("set_base_uri", e).await),
        }
    }

    async fn token_uri(&self, id: TokenId) -> Result<String, RegistryError> {
        self.state.read().await.token_uri(id)
    }

    async fn owner(&self) -> Address {
        self.state.read().await.owner()
    }

    async fn reserved_tokens(&self) -> u64 {
        self.state.read().await.reserved_tokens()
    }

    async fn can_reserve(&self) -> bool {
        self.state.read().await.can_reserve()
    }

    async fn is_eligible(&self, holder: Address) -> Result<bool, RegistryError> {
        let timeout_ms = self.state.read().await.config().oracle_timeout_ms;
        let balance = self.query_balance(holder, timeout_ms).await?;
        Ok(self.state.read().await.is_eligible(balance))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::whole_units;

    const OWNER: Address = Address::new([0xAA; 20]);
    const ALICE: Address = Address::new([0x01; 20]);

    fn service() -> MaskRegistryService<InMemoryMembershipLedger, OriginCallerClassifier, InMemoryBlockHashes>
    {
        create_test_service(OWNER).unwrap()
    }

    async fn paid_call(
        service: &MaskRegistryService<
            InMemoryMembershipLedger,
            OriginCallerClassifier,
            InMemoryBlockHashes,
        >,
        caller: Address,
    ) -> CallContext {
        CallContext::direct(caller, service.mint_price().await, BlockContext::new(100, 1_000))
    }

    #[tokio::test]
    async fn test_create_service() {
        let service = service();
        assert_eq!(service.owner().await, OWNER);
        assert_eq!(service.stats().await.mints, 0);
        assert!(service.events().await.is_empty());
    }

    #[tokio::test]
    async fn test_mint_records_events_and_stats() {
        let service = service();
        service.oracle().set_balance(ALICE, whole_units(5000));

        let ctx = paid_call(&service, ALICE).await;
        let id = service.mint_mask(ctx).await.unwrap();

        assert_eq!(id, 1);
        assert_eq!(service.events().await, vec![RegistryEvent::minted(ALICE, 1)]);
        assert_eq!(service.stats().await.mints, 1);
        assert_eq!(service.treasury().await, service.mint_price().await);
    }

    #[tokio::test]
    async fn test_rejection_counted_and_silent() {
        let service = service();
        let ctx = paid_call(&service, ALICE).await;

        let result = service.mint_mask(ctx).await;
        assert!(matches!(result, Err(RegistryError::NotEligible { .. })));

        let stats = service.stats().await;
        assert_eq!(stats.rejected_calls, 1);
        assert_eq!(stats.mints, 0);
        assert!(service.events().await.is_empty());
    }

    #[tokio::test]
    async fn test_oracle_outage_is_not_eligibility() {
        let service = service();
        service.oracle().set_balance(ALICE, whole_units(5000));
        service.oracle().fail_with(OracleError::Unavailable);

        let ctx = paid_call(&service, ALICE).await;
        let err = service.mint_mask(ctx).await.unwrap_err();
        assert_eq!(err.reason(), "ORACLE_UNAVAILABLE");
        assert_eq!(service.stats().await.oracle_failures, 1);
        assert!(service.is_eligible(ALICE).await.is_err());

        service.oracle().restore();
        assert!(service.is_eligible(ALICE).await.unwrap());
    }

    #[tokio::test]
    async fn test_underpayment_checked_before_oracle() {
        let service = service();
        service.oracle().fail_with(OracleError::Timeout);

        let ctx = CallContext::direct(ALICE, U256::one(), BlockContext::default());
        assert!(matches!(
            service.mint_mask(ctx).await,
            Err(RegistryError::InsufficientPayment { .. })
        ));
        assert_eq!(service.stats().await.oracle_failures, 0);
    }

    #[tokio::test]
    #[should_panic(expected = "registry invariants violated")]
    async fn test_publish_trips_on_broken_invariant() {
        let service = service();
        let mut state = RegistryState::new(RegistryConfig::default(), OWNER).unwrap();
        state.reserve_to_owner(OWNER, 2).unwrap();
        state.records = crate::domain::records::RecordBook::new();

        service.publish(&state, Committed::new((), Vec::new())).await;
    }

    /// Membership ledger that never answers.
    struct StalledLedger;

    #[async_trait]
    impl BalanceOracle for StalledLedger {
        async fn balance_of(&self, _holder: Address) -> Result<U256, OracleError> {
            std::future::pending().await
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_stalled_oracle_times_out_and_releases_state() {
        let config = RegistryConfig::default().with_oracle_timeout_ms(50);
        let service = Arc::new(
            MaskRegistryService::new(
                config,
                OWNER,
                Arc::new(StalledLedger),
                OriginCallerClassifier,
                Arc::new(InMemoryBlockHashes::new()),
            )
            .unwrap(),
        );

        let minting = {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                let price = service.mint_price().await;
                let ctx = CallContext::direct(ALICE, price, BlockContext::new(100, 1_000));
                service.mint_mask(ctx).await
            })
        };

        // Reads are not held hostage by the stalled mint.
        let reserved = tokio::time::timeout(Duration::from_secs(2), service.reserved_tokens())
            .await
            .expect("read must not block behind a stalled oracle");
        assert_eq!(reserved, 0);

        let err = minting.await.unwrap().unwrap_err();
        assert_eq!(err, RegistryError::from(OracleError::Timeout));
        assert!(err.is_transient());
        assert_eq!(service.total_supply().await, 0);
        assert_eq!(service.stats().await.oracle_failures, 1);
        assert!(service.events().await.is_empty());

        assert!(service.is_eligible(ALICE).await.is_err());
    }

    #[tokio::test]
    async fn test_reserve_updates_stats() {
        let service = service();
        let allocation = service.reserve_tokens_to_owner(OWNER, 10).await.unwrap();
        assert_eq!(allocation.first_id, 1);
        assert_eq!(service.stats().await.reserved_records, 10);
        assert_eq!(service.reserved_tokens().await, 10);
        assert_eq!(service.events().await.len(), 10);
    }

    #[tokio::test]
    async fn test_starting_index_flow() {
        let service = service();
        assert!(matches!(
            service.set_starting_index(10).await,
            Err(RegistryError::StartingIndexBlockNotSet)
        ));

        service
            .emergency_set_starting_index_block(OWNER, BlockContext::new(10, 0))
            .await
            .unwrap();
        let index = service.set_starting_index(20).await.unwrap();

        assert!(index >= 1 && index < service.max_supply().await);
        assert_eq!(service.starting_index().await, Some(index));
        assert!(service.set_starting_index(21).await.is_err());
    }

    #[tokio::test]
    async fn test_withdraw_after_mint() {
        let service = service();
        service.oracle().set_balance(ALICE, whole_units(5000));
        let ctx = paid_call(&service, ALICE).await;
        service.mint_mask(ctx).await.unwrap();

        assert!(service.withdraw(ALICE).await.is_err());
        let amount = service.withdraw(OWNER).await.unwrap();
        assert_eq!(amount, service.mint_price().await);
        assert!(service.treasury().await.is_zero());
    }

    #[tokio::test]
    async fn test_transfer_ownership_moves_admin_rights() {
        let service = service();
        service.transfer_ownership(OWNER, ALICE).await.unwrap();

        assert_eq!(service.owner().await, ALICE);
        assert!(service.reserve_tokens_to_owner(OWNER, 1).await.is_err());
        assert!(service.reserve_tokens_to_owner(ALICE, 1).await.is_ok());
        assert_eq!(service.owner_of(1).await.unwrap(), ALICE);
    }
}
