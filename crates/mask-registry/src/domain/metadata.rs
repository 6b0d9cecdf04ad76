//! # Metadata Resolver
//!
//! Maps an issued record to its metadata location.
//!
//! ## State Machine
//!
//! ```text
//! [Hidden] ──reveal(base_uri)──→ [Revealed { base_uri }]   (terminal)
//! ```
//!
//! While hidden every record resolves to the same placeholder. Once revealed,
//! record `id` resolves to `{base_uri}{id}.json`. There is no way back to
//! `Hidden`: the state is an enum with no transition out of `Revealed`.

use crate::domain::records::RecordBook;
use crate::domain::value_objects::TokenId;
use crate::errors::RegistryError;
use serde::{Deserialize, Serialize};

/// Reveal phase of the collection metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealState {
    /// All records share the hidden placeholder.
    Hidden,
    /// Records resolve under `base_uri`.
    Revealed {
        /// Prefix every per-record path is appended to.
        base_uri: String,
    },
}

/// Outcome of a reveal request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Hidden → Revealed happened on this call.
    Revealed,
    /// Already revealed with the same base URI; nothing changed.
    Unchanged,
}

/// Two-phase metadata resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataResolver {
    hidden_uri: String,
    state: RevealState,
}

impl MetadataResolver {
    /// Creates a resolver in the hidden phase.
    #[must_use]
    pub fn new(hidden_uri: impl Into<String>) -> Self {
        Self {
            hidden_uri: hidden_uri.into(),
            state: RevealState::Hidden,
        }
    }

    /// Resolves the metadata location of record `id`.
    pub fn resolve(&self, id: TokenId, records: &RecordBook) -> Result<String, RegistryError> {
        if !records.exists(id) {
            return Err(RegistryError::NonexistentRecord(id));
        }

        Ok(match &self.state {
            RevealState::Hidden => self.hidden_uri.clone(),
            RevealState::Revealed { base_uri } => format!("{base_uri}{id}.json"),
        })
    }

    /// Moves to the revealed phase.
    ///
    /// Repeating the reveal with the same base URI is a no-op; a different
    /// base URI after reveal is refused.
    pub fn reveal(&mut self, base_uri: String) -> Result<RevealOutcome, RegistryError> {
        if base_uri.trim().is_empty() {
            return Err(RegistryError::InvalidBaseUri);
        }

        match &self.state {
            RevealState::Hidden => {
                self.state = RevealState::Revealed { base_uri };
                Ok(RevealOutcome::Revealed)
            }
            RevealState::Revealed { base_uri: current } if *current == base_uri => {
                Ok(RevealOutcome::Unchanged)
            }
            RevealState::Revealed { base_uri: current } => Err(RegistryError::AlreadyRevealed {
                current: current.clone(),
            }),
        }
    }

    /// Current phase.
    #[must_use]
    pub fn state(&self) -> &RevealState {
        &self.state
    }

    /// Returns true once revealed.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        matches!(self.state, RevealState::Revealed { .. })
    }

    /// Placeholder served before reveal.
    #[must_use]
    pub fn hidden_uri(&self) -> &str {
        &self.hidden_uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Allocation, AllocationKind};
    use crate::domain::value_objects::Address;

    fn book_with(count: u64) -> RecordBook {
        let mut book = RecordBook::new();
        book.issue(
            &Allocation {
                first_id: 1,
                count,
                kind: AllocationKind::Mint,
            },
            Address::new([1u8; 20]),
        );
        book
    }

    #[test]
    fn test_hidden_uri_for_every_record() {
        let resolver = MetadataResolver::new("ipfs://QmHidden");
        let book = book_with(3);
        for id in 1..=3 {
            assert_eq!(resolver.resolve(id, &book).unwrap(), "ipfs://QmHidden");
        }
    }

    #[test]
    fn test_revealed_uri_is_per_record() {
        let mut resolver = MetadataResolver::new("ipfs://QmHidden");
        let book = book_with(2);

        let outcome = resolver.reveal("ipfs://QmBase/".to_string()).unwrap();
        assert_eq!(outcome, RevealOutcome::Revealed);
        assert!(resolver.is_revealed());
        assert_eq!(resolver.resolve(1, &book).unwrap(), "ipfs://QmBase/1.json");
        assert_eq!(resolver.resolve(2, &book).unwrap(), "ipfs://QmBase/2.json");
    }

    #[test]
    fn test_nonexistent_record_fails_in_both_phases() {
        let mut resolver = MetadataResolver::new("ipfs://QmHidden");
        let book = book_with(1);

        assert_eq!(
            resolver.resolve(2, &book),
            Err(RegistryError::NonexistentRecord(2))
        );
        resolver.reveal("ipfs://QmBase/".to_string()).unwrap();
        assert_eq!(
            resolver.resolve(0, &book),
            Err(RegistryError::NonexistentRecord(0))
        );
    }

    #[test]
    fn test_reveal_is_idempotent_for_same_uri() {
        let mut resolver = MetadataResolver::new("ipfs://h");
        resolver.reveal("ipfs://b/".to_string()).unwrap();
        assert_eq!(
            resolver.reveal("ipfs://b/".to_string()).unwrap(),
            RevealOutcome::Unchanged
        );
    }

    #[test]
    fn test_reveal_cannot_be_redirected() {
        let mut resolver = MetadataResolver::new("ipfs://h");
        resolver.reveal("ipfs://b/".to_string()).unwrap();

        let result = resolver.reveal("ipfs://other/".to_string());
        assert!(matches!(result, Err(RegistryError::AlreadyRevealed { .. })));
        assert_eq!(
            resolver.state(),
            &RevealState::Revealed {
                base_uri: "ipfs://b/".to_string()
            }
        );
    }

    #[test]
    fn test_empty_base_uri_rejected() {
        let mut resolver = MetadataResolver::new("ipfs://h");
        assert_eq!(
            resolver.reveal(String::new()),
            Err(RegistryError::InvalidBaseUri)
        );
        assert!(!resolver.is_revealed());
    }
}
