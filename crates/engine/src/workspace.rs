//! Session lifecycle for the one open novel.
//!
//! The workspace owns the entity graph, the event bus and the flush
//! policy around destructive transitions: switching novels, closing the
//! open one and process exit all gate on a strict flush, so edits are
//! never silently dropped.

use std::sync::Arc;

use tracing::{info, warn};

use plotweave_domain::{ComponentId, EntityGraph, NovelDescriptor, NovelEvent, NovelId};

use crate::bus::EventBus;
use crate::persistence::{PersistenceError, RepositoryPersistenceManager};
use crate::ports::{NovelStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    /// Pending edits could not be written; the transition is aborted and
    /// the current novel stays open.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no novel is open")]
    NothingOpen,
}

/// Owns the open novel's graph and bus. Lives on the UI thread; nothing
/// here is shared across threads except the persistence manager.
pub struct NovelWorkspace {
    novel_store: Arc<dyn NovelStore>,
    persistence: Arc<RepositoryPersistenceManager>,
    bus: EventBus,
    component: ComponentId,
    open: Option<EntityGraph>,
}

impl NovelWorkspace {
    pub fn new(
        novel_store: Arc<dyn NovelStore>,
        persistence: Arc<RepositoryPersistenceManager>,
    ) -> Self {
        Self {
            novel_store,
            persistence,
            bus: EventBus::new(),
            component: ComponentId::new(),
            open: None,
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn persistence(&self) -> &Arc<RepositoryPersistenceManager> {
        &self.persistence
    }

    pub fn graph(&self) -> Option<&EntityGraph> {
        self.open.as_ref()
    }

    pub fn graph_mut(&mut self) -> Option<&mut EntityGraph> {
        self.open.as_mut()
    }

    pub async fn list_novels(&self) -> Result<Vec<NovelDescriptor>, WorkspaceError> {
        Ok(self.novel_store.list_novels().await?)
    }

    /// Opens `id`, first closing the current novel if one is open. Any
    /// unflushed edit that fails to write aborts the switch and leaves the
    /// current novel in place.
    pub async fn open_novel(&mut self, id: NovelId) -> Result<(), WorkspaceError> {
        if self.open.is_some() {
            self.close_novel().await?;
        }

        let novel = self.novel_store.load_novel(id).await?;
        info!(novel_id = %id, title = novel.title(), "novel opened");
        self.open = Some(EntityGraph::new(novel));
        self.bus.set_scope(id);
        Ok(())
    }

    /// Strict-flushes and discards the open graph. Listeners registered
    /// under the novel's scope are dropped with it.
    pub async fn close_novel(&mut self) -> Result<(), WorkspaceError> {
        let graph = self.open.as_ref().ok_or(WorkspaceError::NothingOpen)?;
        self.sync(graph).await?;

        let novel_id = graph.id();
        info!(novel_id = %novel_id, "novel closed");
        self.bus.clear();
        self.open = None;
        Ok(())
    }

    /// Called at application exit. A failed flush aborts the exit; the
    /// caller must surface the error and keep the process alive.
    pub async fn shutdown(&mut self) -> Result<(), WorkspaceError> {
        if let Some(graph) = self.open.take() {
            if let Err(error) = self.sync(&graph).await {
                // Keep the graph so the user can retry or export.
                warn!(%error, "exit blocked by failed flush");
                self.open = Some(graph);
                return Err(error);
            }
            self.bus.clear();
        }
        Ok(())
    }

    /// Best-effort flush for idle moments; failures stay queued.
    pub async fn flush(&self) -> usize {
        match self.open.as_ref() {
            Some(graph) => {
                let report = self.persistence.flush(graph).await;
                report.failures.len()
            }
            None => 0,
        }
    }

    async fn sync(&self, graph: &EntityGraph) -> Result<(), WorkspaceError> {
        self.bus.dispatch(&NovelEvent::NovelAboutToSync {
            source: self.component,
            novel_id: graph.id(),
        });
        self.persistence.flush_or_fail(graph).await?;
        self.bus.dispatch(&NovelEvent::NovelSynced {
            source: self.component,
            novel_id: graph.id(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::rc::Rc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use plotweave_domain::{EventKind, Novel, Scene};

    use crate::persistence::EntityKind;
    use crate::ports::{MockDocumentStore, MockNovelStore};

    fn workspace_with(novel_store: MockNovelStore) -> NovelWorkspace {
        let novel_store: Arc<dyn NovelStore> = Arc::new(novel_store);
        let persistence = Arc::new(RepositoryPersistenceManager::new(
            novel_store.clone(),
            Arc::new(MockDocumentStore::new()),
        ));
        NovelWorkspace::new(novel_store, persistence)
    }

    fn stored_novel(title: &str) -> (Novel, NovelId) {
        let novel = Novel::new(title);
        let id = novel.id();
        (novel, id)
    }

    #[tokio::test]
    async fn open_close_cycle_scopes_the_bus() {
        let (novel, id) = stored_novel("First");
        let mut store = MockNovelStore::new();
        store
            .expect_load_novel()
            .returning(move |_| Ok(novel.clone()));
        let mut workspace = workspace_with(store);

        workspace.open_novel(id).await.expect("open");
        assert_eq!(workspace.graph().map(EntityGraph::id), Some(id));

        let seen = Arc::new(AtomicUsize::new(0));
        let seen_in = seen.clone();
        workspace.bus().register(
            EventKind::NovelSynced,
            Rc::new(move |_: &NovelEvent| {
                seen_in.fetch_add(1, Ordering::SeqCst);
            }),
        );

        workspace.close_novel().await.expect("close");
        assert!(workspace.graph().is_none());
        // The scoped listener saw the sync that ran before teardown.
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn switching_novels_flushes_the_first() {
        let (first, first_id) = stored_novel("First");
        let (second, second_id) = stored_novel("Second");
        let mut store = MockNovelStore::new();
        store.expect_load_novel().returning(move |id| {
            if id == first_id {
                Ok(first.clone())
            } else {
                Ok(second.clone())
            }
        });
        store.expect_save_novel().times(1).returning(|_| Ok(()));
        let mut workspace = workspace_with(store);

        workspace.open_novel(first_id).await.expect("open first");
        workspace
            .graph_mut()
            .expect("graph")
            .add_scene(Scene::new("Opening"))
            .expect("scene");
        workspace
            .persistence()
            .update(EntityKind::Novel, first_id.to_uuid());

        workspace.open_novel(second_id).await.expect("switch");
        assert_eq!(workspace.graph().map(EntityGraph::id), Some(second_id));
        assert!(!workspace.persistence().is_dirty());
    }

    #[tokio::test]
    async fn failed_flush_aborts_exit() {
        let (novel, id) = stored_novel("Fragile");
        let mut store = MockNovelStore::new();
        store
            .expect_load_novel()
            .returning(move |_| Ok(novel.clone()));
        store
            .expect_save_novel()
            .returning(|_| Err(StoreError::io("save_novel", "read-only filesystem")));
        let mut workspace = workspace_with(store);

        workspace.open_novel(id).await.expect("open");
        workspace
            .persistence()
            .update(EntityKind::Novel, id.to_uuid());

        let err = workspace.shutdown().await.expect_err("exit must abort");
        assert!(matches!(err, WorkspaceError::Persistence(_)));
        // Novel stays open and the edit stays queued for a retry.
        assert!(workspace.graph().is_some());
        assert!(workspace.persistence().is_dirty());
    }

    #[tokio::test]
    async fn close_without_open_novel_is_an_error() {
        let mut workspace = workspace_with(MockNovelStore::new());
        let err = workspace.close_novel().await.expect_err("nothing open");
        assert!(matches!(err, WorkspaceError::NothingOpen));
    }
}
