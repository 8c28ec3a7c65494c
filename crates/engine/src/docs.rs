//! Document content API
//!
//! Thin wrapper over the [`DocumentStore`] port that enforces the lazy
//! loading contract: metadata always lives in the entity graph, content is
//! fetched from storage on first access only, and saves go through the
//! write-behind queue rather than hitting disk inline.

use std::sync::Arc;

use tracing::debug;

use plotweave_domain::{DocumentId, EntityGraph};

use crate::persistence::{EntityKind, RepositoryPersistenceManager};
use crate::ports::{DocumentStore, StoreError};

/// Failure while resolving a document's content.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The id is not present in the open novel's graph.
    #[error("document not in novel: {0}")]
    UnknownDocument(DocumentId),

    /// Storage rejected the read; the document stays unloaded.
    #[error(transparent)]
    Load(#[from] StoreError),
}

/// UI-facing service for document content.
///
/// Reads go straight to the store on a cache miss; writes only mutate the
/// graph and record an intent, so typing in a manuscript never waits on
/// disk I/O.
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
    persistence: Arc<RepositoryPersistenceManager>,
}

impl DocumentService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        persistence: Arc<RepositoryPersistenceManager>,
    ) -> Self {
        Self { store, persistence }
    }

    /// Returns the document's content, fetching it from storage at most
    /// once. Repeated calls after a successful load are served from memory.
    /// On a failed load the document stays unloaded, so a later call
    /// retries the store.
    pub async fn load_document(
        &self,
        graph: &mut EntityGraph,
        id: DocumentId,
    ) -> Result<String, DocumentError> {
        let document = graph
            .novel()
            .document(id)
            .ok_or(DocumentError::UnknownDocument(id))?;

        if let Some(text) = document.content().text() {
            return Ok(text.to_owned());
        }

        let text = self.store.load(id).await?;
        debug!(document_id = %id, bytes = text.len(), "document content loaded");
        graph
            .update_document(id, |d| d.set_content(text.clone()))
            .map_err(|_| DocumentError::UnknownDocument(id))?;
        Ok(text)
    }

    /// Replaces the document's content in memory and queues the durable
    /// write. The blob reaches disk on the next flush.
    pub fn save_document(
        &self,
        graph: &mut EntityGraph,
        id: DocumentId,
        text: impl Into<String>,
    ) -> Result<(), DocumentError> {
        graph
            .update_document(id, |d| d.set_content(text))
            .map_err(|_| DocumentError::UnknownDocument(id))?;
        self.persistence.update(EntityKind::Document, id.to_uuid());
        self.persistence
            .update(EntityKind::Novel, graph.id().to_uuid());
        Ok(())
    }

    /// Drops the cached content; the next [`Self::load_document`] call hits
    /// the store again. Callers must flush first or the edit is lost.
    pub fn unload_document(
        &self,
        graph: &mut EntityGraph,
        id: DocumentId,
    ) -> Result<(), DocumentError> {
        graph
            .update_document(id, |d| d.unload())
            .map_err(|_| DocumentError::UnknownDocument(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use plotweave_domain::{Document, DocumentKind, Novel};

    use crate::ports::{MockDocumentStore, MockNovelStore};

    fn service_with(store: MockDocumentStore) -> (DocumentService, Arc<RepositoryPersistenceManager>) {
        let persistence = Arc::new(RepositoryPersistenceManager::new(
            Arc::new(MockNovelStore::new()),
            Arc::new(MockDocumentStore::new()),
        ));
        (
            DocumentService::new(Arc::new(store), persistence.clone()),
            persistence,
        )
    }

    fn graph_with_document() -> (EntityGraph, DocumentId) {
        let mut graph = EntityGraph::new(Novel::new("Test Novel"));
        let id = graph
            .add_document(Document::new("Notes", DocumentKind::Note))
            .expect("add document");
        (graph, id)
    }

    #[tokio::test]
    async fn second_load_is_served_from_memory() {
        let (mut graph, id) = graph_with_document();
        let mut store = MockDocumentStore::new();
        store
            .expect_load()
            .times(1)
            .returning(|_| Ok("chapter one".to_string()));
        let (service, _) = service_with(store);

        let first = service.load_document(&mut graph, id).await.expect("load");
        let second = service.load_document(&mut graph, id).await.expect("cached");
        assert_eq!(first, "chapter one");
        assert_eq!(second, "chapter one");
    }

    #[tokio::test]
    async fn failed_load_leaves_document_unloaded() {
        let (mut graph, id) = graph_with_document();
        let mut store = MockDocumentStore::new();
        store
            .expect_load()
            .times(2)
            .returning(|id| Err(StoreError::not_found("Document", id)));
        let (service, _) = service_with(store);

        let err = service
            .load_document(&mut graph, id)
            .await
            .expect_err("missing blob");
        assert!(matches!(err, DocumentError::Load(e) if e.is_not_found()));
        let doc = graph.novel().document(id).expect("document");
        assert!(doc.content().text().is_none());

        // The failure did not poison the cache; the next call retries.
        let err = service.load_document(&mut graph, id).await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn save_queues_the_write_instead_of_hitting_disk() {
        let (mut graph, id) = graph_with_document();
        // No expectations set: any store call would panic the test.
        let (service, persistence) = service_with(MockDocumentStore::new());

        service
            .save_document(&mut graph, id, "revised draft")
            .expect("save");

        let doc = graph.novel().document(id).expect("document");
        assert_eq!(doc.content().text(), Some("revised draft"));
        assert!(persistence.is_dirty());
    }

    #[tokio::test]
    async fn unknown_document_is_rejected() {
        let mut graph = EntityGraph::new(Novel::new("Test Novel"));
        let (service, _) = service_with(MockDocumentStore::new());

        let err = service
            .load_document(&mut graph, DocumentId::new())
            .await
            .expect_err("not in graph");
        assert!(matches!(err, DocumentError::UnknownDocument(_)));
    }
}
