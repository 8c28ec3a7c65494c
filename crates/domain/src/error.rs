//! Unified error type for entity graph operations
//!
//! Every mutating graph operation validates before it mutates; a returned
//! `InvariantViolation` means the graph is unchanged.

use thiserror::Error;

/// A rejected graph mutation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A referenced id does not resolve in the owning novel.
    #[error("Dangling reference: {entity_type} with id {id}")]
    DanglingReference {
        entity_type: &'static str,
        id: String,
    },

    /// The targeted entity does not exist in the graph.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// A reorder would leave scene indices non-contiguous or duplicated.
    #[error("Invalid scene ordering: {0}")]
    InvalidOrdering(String),

    /// The beat is already linked to a different scene.
    #[error("Story beat {beat_id} is already linked to scene {scene_id}")]
    BeatAlreadyLinked { beat_id: String, scene_id: String },

    /// The beat does not belong to the active story structure.
    #[error("Story beat {0} is not part of the active structure")]
    BeatNotInActiveStructure(String),

    /// An entity with this id is already present.
    #[error("Duplicate {entity_type} id: {id}")]
    DuplicateId {
        entity_type: &'static str,
        id: String,
    },
}

impl InvariantViolation {
    pub fn dangling(entity_type: &'static str, id: impl ToString) -> Self {
        Self::DanglingReference {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn duplicate(entity_type: &'static str, id: impl ToString) -> Self {
        Self::DuplicateId {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn invalid_ordering(msg: impl Into<String>) -> Self {
        Self::InvalidOrdering(msg.into())
    }
}
