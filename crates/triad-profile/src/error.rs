use thiserror::Error;

use crate::resolver::ResolutionState;
use crate::types::Role;

/// Errors from the profile engine.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("no archetype candidates to rank")]
    EmptyCandidateSet,

    #[error("invalid trigram id {0}: expected 1..=8")]
    InvalidTrigramId(u8),

    #[error("invalid archetype id {0}: expected 1..=64")]
    InvalidArchetypeId(u8),

    #[error("incomplete archetype table: expected {expected} {what}, found {found}")]
    IncompleteTable {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("inconsistent archetype table: {0}")]
    InconsistentTable(String),

    #[error("exemplar library is empty")]
    EmptyExemplarLibrary,

    #[error("invalid exemplar {name}: {reason}")]
    InvalidExemplar { name: String, reason: String },

    #[error(
        "insufficient discrimination for {role}: no candidate survived exclusion of engine archetype {excluded}; collect more scenario answers"
    )]
    InsufficientDiscrimination { role: Role, excluded: u8 },

    #[error("no compatibility data for archetype pair ({a}, {b})")]
    UnknownArchetypePair { a: u8, b: u8 },

    #[error("role resolution out of order: expected state {expected:?}, found {found:?}")]
    ResolutionOutOfOrder {
        expected: ResolutionState,
        found: ResolutionState,
    },

    #[error("source error: {0}")]
    Source(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProfileError {
    /// Configuration errors abort engine construction; nothing is substituted.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ProfileError::IncompleteTable { .. }
                | ProfileError::InconsistentTable(_)
                | ProfileError::EmptyExemplarLibrary
                | ProfileError::InvalidExemplar { .. }
                | ProfileError::Source(_)
                | ProfileError::Config(_)
                | ProfileError::Io(_)
                | ProfileError::Json(_)
        )
    }
}

pub type ProfileResult<T> = Result<T, ProfileError>;
