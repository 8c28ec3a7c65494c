//! Storage port traits
//!
//! The persistence manager and workspace talk to disk only through these
//! traits; the filesystem implementations live in the store module and
//! tests substitute mockall automocks.

use async_trait::async_trait;

use plotweave_domain::{DocumentId, Novel, NovelDescriptor, NovelId};

/// Storage operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Addressable unit not found - includes entity type and ID for
    /// actionable error messages.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Disk operation failed - includes operation name for tracing.
    #[error("I/O error in {operation}: {message}")]
    Io {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Create a NotFound error with entity type and ID context.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create an Io error with operation context.
    pub fn io(operation: &'static str, message: impl ToString) -> Self {
        Self::Io {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Port for the structured per-novel metadata file.
///
/// One addressable unit per novel id; document content is stored
/// separately through [`DocumentStore`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NovelStore: Send + Sync {
    async fn load_novel(&self, id: NovelId) -> Result<Novel, StoreError>;
    async fn save_novel(&self, novel: &Novel) -> Result<(), StoreError>;
    async fn delete_novel(&self, id: NovelId) -> Result<(), StoreError>;
    async fn list_novels(&self) -> Result<Vec<NovelDescriptor>, StoreError>;
}

/// Port for lazily loaded document content blobs.
///
/// `save` is invoked only from the persistence manager's flush, never by
/// UI-facing code, to preserve the write-behind guarantee.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn load(&self, id: DocumentId) -> Result<String, StoreError>;
    async fn save(&self, id: DocumentId, content: &str) -> Result<(), StoreError>;
    async fn delete(&self, id: DocumentId) -> Result<(), StoreError>;
}
