//! Novel repository facade.
//!
//! UI-facing components mutate the entity graph themselves, then call one
//! of these methods to queue the durable write, then publish the matching
//! event. Every method records an intent and returns immediately.

use std::sync::Arc;

use plotweave_domain::{
    CharacterId, ConflictId, DocumentId, EntityGraph, NovelId, PlotId, Scene, SceneId, TaskId,
};

use crate::persistence::{EntityKind, RepositoryPersistenceManager};

#[derive(Clone)]
pub struct NovelRepository {
    persistence: Arc<RepositoryPersistenceManager>,
}

impl NovelRepository {
    pub fn new(persistence: Arc<RepositoryPersistenceManager>) -> Self {
        Self { persistence }
    }

    pub fn insert_novel(&self, id: NovelId) {
        self.persistence.insert(EntityKind::Novel, id.to_uuid());
    }

    pub fn update_novel(&self, id: NovelId) {
        self.persistence.update(EntityKind::Novel, id.to_uuid());
    }

    /// Queues deletion of the novel together with every document blob it
    /// owns, so no orphaned content files survive the flush.
    pub fn delete_novel(&self, graph: &EntityGraph) {
        for document in graph.novel().documents() {
            self.persistence
                .delete(EntityKind::Document, document.id().to_uuid());
        }
        self.persistence
            .delete(EntityKind::Novel, graph.id().to_uuid());
    }

    pub fn insert_character(&self, novel: NovelId, id: CharacterId) {
        self.graph_change(novel, EntityKind::Character, id.to_uuid(), Op::Insert);
    }

    pub fn update_character(&self, novel: NovelId, id: CharacterId) {
        self.graph_change(novel, EntityKind::Character, id.to_uuid(), Op::Update);
    }

    pub fn delete_character(&self, novel: NovelId, id: CharacterId) {
        self.graph_change(novel, EntityKind::Character, id.to_uuid(), Op::Delete);
    }

    pub fn insert_scene(&self, novel: NovelId, id: SceneId) {
        self.graph_change(novel, EntityKind::Scene, id.to_uuid(), Op::Insert);
    }

    pub fn update_scene(&self, novel: NovelId, id: SceneId) {
        self.graph_change(novel, EntityKind::Scene, id.to_uuid(), Op::Update);
    }

    /// Queues deletion for a scene removed from the graph. Takes the
    /// removed scene so its manuscript blob, if any, is swept too rather
    /// than orphaned on disk.
    pub fn delete_scene(&self, novel: NovelId, scene: &Scene) {
        if let Some(doc_id) = scene.manuscript() {
            self.persistence.delete(EntityKind::Document, doc_id.to_uuid());
        }
        self.graph_change(novel, EntityKind::Scene, scene.id().to_uuid(), Op::Delete);
    }

    pub fn insert_plot(&self, novel: NovelId, id: PlotId) {
        self.graph_change(novel, EntityKind::Plot, id.to_uuid(), Op::Insert);
    }

    pub fn update_plot(&self, novel: NovelId, id: PlotId) {
        self.graph_change(novel, EntityKind::Plot, id.to_uuid(), Op::Update);
    }

    pub fn delete_plot(&self, novel: NovelId, id: PlotId) {
        self.graph_change(novel, EntityKind::Plot, id.to_uuid(), Op::Delete);
    }

    pub fn insert_conflict(&self, novel: NovelId, id: ConflictId) {
        self.graph_change(novel, EntityKind::Conflict, id.to_uuid(), Op::Insert);
    }

    pub fn update_conflict(&self, novel: NovelId, id: ConflictId) {
        self.graph_change(novel, EntityKind::Conflict, id.to_uuid(), Op::Update);
    }

    pub fn delete_conflict(&self, novel: NovelId, id: ConflictId) {
        self.graph_change(novel, EntityKind::Conflict, id.to_uuid(), Op::Delete);
    }

    pub fn update_structure(&self, novel: NovelId) {
        // The active structure has no file of its own; it rides in the
        // novel metadata.
        self.graph_change(novel, EntityKind::Structure, novel.to_uuid(), Op::Update);
    }

    pub fn insert_document(&self, novel: NovelId, id: DocumentId) {
        self.graph_change(novel, EntityKind::Document, id.to_uuid(), Op::Insert);
    }

    pub fn update_document(&self, novel: NovelId, id: DocumentId) {
        self.graph_change(novel, EntityKind::Document, id.to_uuid(), Op::Update);
    }

    pub fn delete_doc(&self, novel: NovelId, id: DocumentId) {
        self.graph_change(novel, EntityKind::Document, id.to_uuid(), Op::Delete);
    }

    pub fn insert_task(&self, novel: NovelId, id: TaskId) {
        self.graph_change(novel, EntityKind::Task, id.to_uuid(), Op::Insert);
    }

    pub fn update_task(&self, novel: NovelId, id: TaskId) {
        self.graph_change(novel, EntityKind::Task, id.to_uuid(), Op::Update);
    }

    pub fn delete_task(&self, novel: NovelId, id: TaskId) {
        self.graph_change(novel, EntityKind::Task, id.to_uuid(), Op::Delete);
    }

    /// Any entity-level change also dirties the owning novel's metadata
    /// file, so the flush writes it even when the only other intents are
    /// document blobs.
    fn graph_change(&self, novel: NovelId, kind: EntityKind, id: uuid::Uuid, op: Op) {
        match op {
            Op::Insert => self.persistence.insert(kind, id),
            Op::Update => self.persistence.update(kind, id),
            Op::Delete => self.persistence.delete(kind, id),
        }
        self.persistence.update(EntityKind::Novel, novel.to_uuid());
    }
}

enum Op {
    Insert,
    Update,
    Delete,
}

#[cfg(test)]
mod tests {
    use super::*;

    use plotweave_domain::{Document, DocumentKind, Novel};

    use crate::ports::{MockDocumentStore, MockNovelStore};

    fn repository() -> (NovelRepository, Arc<RepositoryPersistenceManager>) {
        let persistence = Arc::new(RepositoryPersistenceManager::new(
            Arc::new(MockNovelStore::new()),
            Arc::new(MockDocumentStore::new()),
        ));
        (NovelRepository::new(persistence.clone()), persistence)
    }

    #[test]
    fn entity_change_also_dirties_the_novel_metadata() {
        let (repository, persistence) = repository();
        let novel = NovelId::new();

        repository.update_scene(novel, SceneId::new());
        // Scene intent plus the novel metadata intent.
        assert_eq!(persistence.pending_count(), 2);

        repository.update_scene(novel, SceneId::new());
        // New scene coalesces; the novel intent does not duplicate.
        assert_eq!(persistence.pending_count(), 3);
    }

    #[test]
    fn delete_scene_sweeps_its_manuscript_blob() {
        let (repository, persistence) = repository();
        let mut graph = EntityGraph::new(Novel::new("Test Novel"));
        let scene_id = graph.add_scene(Scene::new("Opening")).expect("scene");
        graph
            .attach_manuscript(scene_id, Document::new("Draft", DocumentKind::Manuscript))
            .expect("manuscript");

        let removed = graph.remove_scene(scene_id).expect("remove");
        repository.delete_scene(graph.id(), &removed);

        // Manuscript delete, scene delete, novel metadata update.
        assert_eq!(persistence.pending_count(), 3);
    }

    #[test]
    fn delete_novel_sweeps_owned_document_blobs() {
        let (repository, persistence) = repository();
        let mut graph = EntityGraph::new(Novel::new("Doomed"));
        graph
            .add_document(Document::new("Notes", DocumentKind::Note))
            .expect("doc one");
        graph
            .add_document(Document::new("Draft", DocumentKind::Manuscript))
            .expect("doc two");

        repository.delete_novel(&graph);
        // Two document deletes plus the novel delete.
        assert_eq!(persistence.pending_count(), 3);
    }
}
