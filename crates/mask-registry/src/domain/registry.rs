//! # Registry State
//!
//! The aggregate every call operates on: configuration, ownership, the
//! provenance registry, the issuance counter, the record book, the metadata
//! resolver, the starting-index state and the treasury.
//!
//! Every mutating method validates first and mutates after, so an `Err`
//! return leaves the state exactly as it was. Minting lives in `mint.rs`,
//! owner reservations in `reservation.rs`.

use crate::config::RegistryConfig;
use crate::domain::access::MembershipGate;
use crate::domain::entities::{Allocation, BlockContext, Record};
use crate::domain::issuance::IssuanceCounter;
use crate::domain::metadata::{MetadataResolver, RevealOutcome};
use crate::domain::provenance::ProvenanceRegistry;
use crate::domain::records::RecordBook;
use crate::domain::starting_index::StartingIndex;
use crate::domain::value_objects::{Address, Hash, TokenId, U256};
use crate::errors::{ConfigError, RegistryError};
use crate::events::RegistryEvent;

/// Result of a committed call: its output plus the events it emitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Committed<T> {
    /// Call output.
    pub output: T,
    /// Events, in emission order.
    pub events: Vec<RegistryEvent>,
}

impl<T> Committed<T> {
    pub(crate) fn new(output: T, events: Vec<RegistryEvent>) -> Self {
        Self { output, events }
    }
}

/// Complete registry state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryState {
    pub(crate) config: RegistryConfig,
    pub(crate) owner: Address,
    pub(crate) gate: MembershipGate,
    pub(crate) provenance: ProvenanceRegistry,
    pub(crate) issuance: IssuanceCounter,
    pub(crate) records: RecordBook,
    pub(crate) metadata: MetadataResolver,
    pub(crate) starting_index: StartingIndex,
    pub(crate) treasury: U256,
}

impl RegistryState {
    /// Creates a registry owned by `owner`. The configuration is validated.
    pub fn new(config: RegistryConfig, owner: Address) -> Result<Self, ConfigError> {
        config.validate()?;
        if owner.is_zero() {
            return Err(ConfigError::InvalidParameters(
                "owner cannot be the zero address".to_string(),
            ));
        }

        Ok(Self {
            gate: MembershipGate::new(config.membership_threshold),
            issuance: IssuanceCounter::new(config.max_total_records, config.max_reserved_records),
            metadata: MetadataResolver::new(config.hidden_uri.clone()),
            provenance: ProvenanceRegistry::new(),
            records: RecordBook::new(),
            starting_index: StartingIndex::new(),
            treasury: U256::zero(),
            owner,
            config,
        })
    }

    /// Fails with `Unauthorized` unless `caller` is the owner.
    pub fn ensure_owner(&self, caller: Address) -> Result<(), RegistryError> {
        if caller == self.owner {
            Ok(())
        } else {
            Err(RegistryError::Unauthorized { caller })
        }
    }

    // =========================================================================
    // ISSUANCE (shared by mint and reservation)
    // =========================================================================

    /// Commits an allocation: locks provenance on first issuance and creates
    /// one record per identifier, all held by `owner`.
    pub(crate) fn issue(&mut self, allocation: &Allocation, owner: Address) -> Vec<RegistryEvent> {
        self.provenance.lock_on_first_issuance();
        self.records
            .issue(allocation, owner)
            .into_iter()
            .map(|record: Record| RegistryEvent::minted(record.owner, record.id))
            .collect()
    }

    // =========================================================================
    // PROVENANCE
    // =========================================================================

    /// Owner-only. Writes the provenance commitment once, before anything is issued.
    pub fn set_provenance_hash(
        &mut self,
        caller: Address,
        hash: Hash,
    ) -> Result<Committed<()>, RegistryError> {
        self.ensure_owner(caller)?;
        self.provenance.set_commitment(hash)?;
        Ok(Committed::new((), vec![RegistryEvent::ProvenanceSet { hash }]))
    }

    // =========================================================================
    // METADATA
    // =========================================================================

    /// Owner-only. Reveals metadata under `base_uri`.
    pub fn set_base_uri(
        &mut self,
        caller: Address,
        base_uri: String,
    ) -> Result<Committed<RevealOutcome>, RegistryError> {
        self.ensure_owner(caller)?;
        let outcome = self.metadata.reveal(base_uri.clone())?;
        let events = match outcome {
            RevealOutcome::Revealed => vec![RegistryEvent::BaseUriSet { base_uri }],
            RevealOutcome::Unchanged => Vec::new(),
        };
        Ok(Committed::new(outcome, events))
    }

    /// Metadata location of record `id`.
    pub fn token_uri(&self, id: TokenId) -> Result<String, RegistryError> {
        self.metadata.resolve(id, &self.records)
    }

    // =========================================================================
    // STARTING INDEX
    // =========================================================================

    /// Records `block` as the starting-index seed if a mint at that block
    /// should do so.
    pub(crate) fn maybe_record_starting_block(
        &mut self,
        block: &BlockContext,
    ) -> Option<RegistryEvent> {
        let due = self.starting_index.should_record(
            self.issuance.is_sold_out(),
            block.timestamp,
            self.config.reveal_timestamp,
        );
        if due && self.starting_index.record_block(block.number) {
            Some(RegistryEvent::StartingIndexBlockSet {
                block_number: block.number,
            })
        } else {
            None
        }
    }

    /// Block whose hash seeds the starting index when derived at `current_block`.
    pub fn starting_index_source(&self, current_block: u64) -> Result<u64, RegistryError> {
        self.starting_index.source_block(current_block)
    }

    /// Derives the starting index from the seed block's hash.
    pub fn set_starting_index(&mut self, block_hash: Hash) -> Result<Committed<u64>, RegistryError> {
        let index = self
            .starting_index
            .finalize(block_hash, self.config.max_total_records)?;
        Ok(Committed::new(
            index,
            vec![RegistryEvent::StartingIndexSet {
                starting_index: index,
            }],
        ))
    }

    /// Owner-only. Records the current block as seed when none was recorded.
    pub fn emergency_set_starting_index_block(
        &mut self,
        caller: Address,
        block: &BlockContext,
    ) -> Result<Committed<u64>, RegistryError> {
        self.ensure_owner(caller)?;
        if self.starting_index.index().is_some() {
            return Err(RegistryError::StartingIndexAlreadySet);
        }
        if !self.starting_index.record_block(block.number) {
            // Already recorded: report the existing seed, emit nothing.
            let recorded = self.starting_index.block().unwrap_or(block.number);
            return Ok(Committed::new(recorded, Vec::new()));
        }
        Ok(Committed::new(
            block.number,
            vec![RegistryEvent::StartingIndexBlockSet {
                block_number: block.number,
            }],
        ))
    }

    // =========================================================================
    // TREASURY & OWNERSHIP
    // =========================================================================

    /// Owner-only. Pays out the treasury to the owner.
    pub fn withdraw(&mut self, caller: Address) -> Result<Committed<U256>, RegistryError> {
        self.ensure_owner(caller)?;
        if self.treasury.is_zero() {
            return Err(RegistryError::NothingToWithdraw);
        }
        let amount = std::mem::replace(&mut self.treasury, U256::zero());
        Ok(Committed::new(
            amount,
            vec![RegistryEvent::Withdrawal { to: caller, amount }],
        ))
    }

    /// Owner-only. Hands ownership to `new_owner`.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<Committed<()>, RegistryError> {
        self.ensure_owner(caller)?;
        if new_owner.is_zero() {
            return Err(RegistryError::InvalidOwner);
        }
        let previous = std::mem::replace(&mut self.owner, new_owner);
        Ok(Committed::new(
            (),
            vec![RegistryEvent::OwnershipTransferred {
                previous,
                new: new_owner,
            }],
        ))
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Current owner.
    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Configuration the registry was created with.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Total records issued.
    #[must_use]
    pub fn total_supply(&self) -> u64 {
        self.issuance.total_minted()
    }

    /// Holder of record `id`.
    pub fn owner_of(&self, id: TokenId) -> Result<Address, RegistryError> {
        self.records.owner_of(id)
    }

    /// Records held by `holder`.
    #[must_use]
    pub fn balance_of(&self, holder: &Address) -> u64 {
        self.records.balance_of(holder)
    }

    /// Public mints made by `caller`.
    #[must_use]
    pub fn mints_of(&self, caller: &Address) -> u32 {
        self.issuance.mints_of(caller)
    }

    /// Provenance commitment, if written.
    #[must_use]
    pub fn provenance_hash(&self) -> Option<Hash> {
        self.provenance.commitment()
    }

    /// Returns true once the provenance commitment is locked.
    #[must_use]
    pub fn is_provenance_locked(&self) -> bool {
        self.provenance.is_locked()
    }

    /// Returns true once metadata is revealed.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.metadata.is_revealed()
    }

    /// Recorded starting-index seed block.
    #[must_use]
    pub fn starting_index_block(&self) -> Option<u64> {
        self.starting_index.block()
    }

    /// Derived starting index.
    #[must_use]
    pub fn starting_index(&self) -> Option<u64> {
        self.starting_index.index()
    }

    /// Undistributed mint payments.
    #[must_use]
    pub fn treasury(&self) -> U256 {
        self.treasury
    }

    /// The issuance counter, read-only.
    #[must_use]
    pub fn issuance(&self) -> &IssuanceCounter {
        &self.issuance
    }

    /// The record book, read-only.
    #[must_use]
    pub fn records(&self) -> &RecordBook {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::AllocationKind;

    const OWNER: Address = Address::new([0xAA; 20]);
    const STRANGER: Address = Address::new([0x55; 20]);

    fn state() -> RegistryState {
        RegistryState::new(RegistryConfig::default(), OWNER).unwrap()
    }

    fn issue_one(state: &mut RegistryState) {
        let allocation = state
            .issuance
            .reserve_next_id(1, AllocationKind::Mint)
            .unwrap();
        state.issue(&allocation, STRANGER);
    }

    #[test]
    fn test_new_rejects_zero_owner_and_bad_config() {
        assert!(RegistryState::new(RegistryConfig::default(), Address::ZERO).is_err());
        assert!(
            RegistryState::new(RegistryConfig::default().with_max_total_records(0), OWNER).is_err()
        );
    }

    #[test]
    fn test_provenance_owner_only() {
        let mut state = state();
        let result = state.set_provenance_hash(STRANGER, Hash::new([1u8; 32]));
        assert_eq!(result, Err(RegistryError::Unauthorized { caller: STRANGER }));
        assert!(state.provenance_hash().is_none());
    }

    #[test]
    fn test_provenance_locked_by_issuance() {
        let mut state = state();
        let committed = state.set_provenance_hash(OWNER, Hash::new([1u8; 32])).unwrap();
        assert_eq!(committed.events.len(), 1);

        issue_one(&mut state);
        assert!(state.is_provenance_locked());
        assert_eq!(
            state.set_provenance_hash(OWNER, Hash::new([2u8; 32])),
            Err(RegistryError::ProvenanceLocked)
        );
        assert_eq!(state.provenance_hash(), Some(Hash::new([1u8; 32])));
    }

    #[test]
    fn test_set_base_uri_events() {
        let mut state = state();
        issue_one(&mut state);
        assert_eq!(state.token_uri(1).unwrap(), "ipfs://hidden");

        let first = state.set_base_uri(OWNER, "ipfs://base/".into()).unwrap();
        assert_eq!(first.events.len(), 1);
        let again = state.set_base_uri(OWNER, "ipfs://base/".into()).unwrap();
        assert!(again.events.is_empty());
        assert_eq!(state.token_uri(1).unwrap(), "ipfs://base/1.json");
    }

    #[test]
    fn test_set_base_uri_owner_only() {
        let mut state = state();
        assert!(matches!(
            state.set_base_uri(STRANGER, "ipfs://evil/".into()),
            Err(RegistryError::Unauthorized { .. })
        ));
        assert!(!state.is_revealed());
    }

    #[test]
    fn test_withdraw() {
        let mut state = state();
        assert_eq!(state.withdraw(OWNER), Err(RegistryError::NothingToWithdraw));

        state.treasury = U256::from(100);
        assert!(matches!(
            state.withdraw(STRANGER),
            Err(RegistryError::Unauthorized { .. })
        ));
        let committed = state.withdraw(OWNER).unwrap();
        assert_eq!(committed.output, U256::from(100));
        assert!(state.treasury().is_zero());
    }

    #[test]
    fn test_transfer_ownership() {
        let mut state = state();
        assert_eq!(
            state.transfer_ownership(OWNER, Address::ZERO),
            Err(RegistryError::InvalidOwner)
        );
        state.transfer_ownership(OWNER, STRANGER).unwrap();
        assert_eq!(state.owner(), STRANGER);
        assert!(state.ensure_owner(OWNER).is_err());
    }

    #[test]
    fn test_emergency_starting_block() {
        let mut state = state();
        let block = BlockContext::new(42, 1_000);

        assert!(state
            .emergency_set_starting_index_block(STRANGER, &block)
            .is_err());

        let committed = state
            .emergency_set_starting_index_block(OWNER, &block)
            .unwrap();
        assert_eq!(committed.output, 42);
        assert_eq!(committed.events.len(), 1);

        let again = state
            .emergency_set_starting_index_block(OWNER, &BlockContext::new(50, 2_000))
            .unwrap();
        assert_eq!(again.output, 42);
        assert!(again.events.is_empty());
    }

    #[test]
    fn test_set_starting_index() {
        let mut state = state();
        assert_eq!(
            state.set_starting_index(Hash::new([1u8; 32])),
            Err(RegistryError::StartingIndexBlockNotSet)
        );

        state
            .emergency_set_starting_index_block(OWNER, &BlockContext::new(1, 0))
            .unwrap();
        let committed = state.set_starting_index(Hash::new([1u8; 32])).unwrap();
        assert!(committed.output >= 1 && committed.output < 10_000);
        assert_eq!(state.starting_index(), Some(committed.output));
    }
}
