//! Entity graph for one open novel
//!
//! Wraps the novel aggregate and enforces its referential invariants on
//! every mutating operation:
//!
//! 1. Every referenced id resolves in the owning novel, or the reference
//!    is null.
//! 2. Removing an entity removes or nulls all dependent references.
//! 3. Scene ordering indices are contiguous and unique after any reorder.
//! 4. A story beat is linked to at most one scene at a time.
//!
//! All operations are synchronous and side-effect-free beyond the graph
//! itself: no I/O, no event emission. Callers trigger persistence and
//! notification after a successful mutation. A returned error means the
//! graph is unchanged (validation happens before any mutation).

use crate::entities::{
    Character, Conflict, Document, DocumentOwner, Novel, Plot, Scene, ScenePlotReference,
    StoryStructure, Task,
};
use crate::error::InvariantViolation;
use crate::ids::{
    BeatId, CharacterId, ConflictId, DocumentId, NovelId, PlotId, SceneId, TaskId,
};

/// The in-memory object graph for one open novel
#[derive(Debug, Clone)]
pub struct EntityGraph {
    novel: Novel,
}

impl EntityGraph {
    pub fn new(novel: Novel) -> Self {
        Self { novel }
    }

    pub fn id(&self) -> NovelId {
        self.novel.id()
    }

    pub fn novel(&self) -> &Novel {
        &self.novel
    }

    pub fn novel_mut(&mut self) -> &mut Novel {
        &mut self.novel
    }

    pub fn into_novel(self) -> Novel {
        self.novel
    }

    // =========================================================================
    // Characters
    // =========================================================================

    pub fn add_character(&mut self, character: Character) -> Result<CharacterId, InvariantViolation> {
        let id = character.id();
        if self.novel.contains_character(id) {
            return Err(InvariantViolation::duplicate("Character", id));
        }
        self.novel.characters_mut().push(character);
        self.novel.touch();
        Ok(id)
    }

    pub fn update_character(
        &mut self,
        id: CharacterId,
        update: impl FnOnce(&mut Character),
    ) -> Result<(), InvariantViolation> {
        let character = self
            .novel
            .character_mut(id)
            .ok_or_else(|| InvariantViolation::not_found("Character", id))?;
        update(character);
        self.novel.touch();
        Ok(())
    }

    /// Remove a character, cascading to every dependent reference: POV and
    /// participant slots on scenes, conflict opposition, plot associations
    /// and task links.
    pub fn remove_character(&mut self, id: CharacterId) -> Result<Character, InvariantViolation> {
        if !self.novel.contains_character(id) {
            return Err(InvariantViolation::not_found("Character", id));
        }

        for scene in self.novel.scenes_mut() {
            if scene.pov() == Some(id) {
                scene.set_pov(None);
            }
            scene.remove_participant(id);
        }
        for conflict in self.novel.conflicts_mut() {
            if conflict.character_id() == Some(id) {
                conflict.clear_character();
            }
        }
        for plot in self.novel.plots_mut() {
            plot.unlink_character(id);
        }
        for task in self.novel.tasks_mut() {
            if task.character_id() == Some(id) {
                task.clear_character();
            }
        }

        let index = self
            .novel
            .characters()
            .iter()
            .position(|c| c.id() == id)
            .ok_or_else(|| InvariantViolation::not_found("Character", id))?;
        let removed = self.novel.characters_mut().remove(index);
        self.novel.touch();
        Ok(removed)
    }

    // =========================================================================
    // Scenes
    // =========================================================================

    /// Add a scene at the end of the ordering. Every reference the scene
    /// carries must resolve in this novel.
    pub fn add_scene(&mut self, scene: Scene) -> Result<SceneId, InvariantViolation> {
        let id = scene.id();
        if self.novel.scene(id).is_some() {
            return Err(InvariantViolation::duplicate("Scene", id));
        }
        self.validate_scene_refs(&scene)?;

        let ordering = self.novel.scenes().len();
        let mut scene = scene;
        scene.set_ordering(ordering);
        self.novel.scenes_mut().push(scene);
        self.novel.touch();
        Ok(id)
    }

    pub fn update_scene(
        &mut self,
        id: SceneId,
        update: impl FnOnce(&mut Scene),
    ) -> Result<(), InvariantViolation> {
        let scene = self
            .novel
            .scene_mut(id)
            .ok_or_else(|| InvariantViolation::not_found("Scene", id))?;
        update(scene);
        self.novel.touch();
        Ok(())
    }

    /// Remove a scene. Its manuscript document, if any, is dropped with it,
    /// and the remaining ordering indices are compacted.
    pub fn remove_scene(&mut self, id: SceneId) -> Result<Scene, InvariantViolation> {
        let index = self
            .novel
            .scenes()
            .iter()
            .position(|s| s.id() == id)
            .ok_or_else(|| InvariantViolation::not_found("Scene", id))?;
        let removed = self.novel.scenes_mut().remove(index);

        if let Some(doc_id) = removed.manuscript() {
            self.novel.documents_mut().remove(&doc_id);
        }
        self.reindex_scenes();
        self.novel.touch();
        Ok(removed)
    }

    /// Reorder scenes to match `order`, which must name every scene exactly
    /// once. Indices are reassigned contiguously from zero.
    pub fn reorder_scenes(&mut self, order: &[SceneId]) -> Result<(), InvariantViolation> {
        if order.len() != self.novel.scenes().len() {
            return Err(InvariantViolation::invalid_ordering(format!(
                "expected {} scene ids, got {}",
                self.novel.scenes().len(),
                order.len()
            )));
        }
        for id in order {
            if self.novel.scene(*id).is_none() {
                return Err(InvariantViolation::not_found("Scene", id));
            }
        }
        let mut seen = std::collections::HashSet::new();
        for id in order {
            if !seen.insert(*id) {
                return Err(InvariantViolation::invalid_ordering(format!(
                    "scene {id} appears more than once"
                )));
            }
        }

        self.novel.scenes_mut().sort_by_key(|scene| {
            order
                .iter()
                .position(|id| *id == scene.id())
                .unwrap_or(usize::MAX)
        });
        self.reindex_scenes();
        self.novel.touch();
        Ok(())
    }

    pub fn set_scene_pov(
        &mut self,
        scene_id: SceneId,
        pov: Option<CharacterId>,
    ) -> Result<(), InvariantViolation> {
        if let Some(character_id) = pov {
            if !self.novel.contains_character(character_id) {
                return Err(InvariantViolation::dangling("Character", character_id));
            }
        }
        let scene = self
            .novel
            .scene_mut(scene_id)
            .ok_or_else(|| InvariantViolation::not_found("Scene", scene_id))?;
        scene.set_pov(pov);
        self.novel.touch();
        Ok(())
    }

    pub fn add_scene_participant(
        &mut self,
        scene_id: SceneId,
        character_id: CharacterId,
    ) -> Result<(), InvariantViolation> {
        if !self.novel.contains_character(character_id) {
            return Err(InvariantViolation::dangling("Character", character_id));
        }
        let scene = self
            .novel
            .scene_mut(scene_id)
            .ok_or_else(|| InvariantViolation::not_found("Scene", scene_id))?;
        scene.add_participant(character_id);
        self.novel.touch();
        Ok(())
    }

    pub fn remove_scene_participant(
        &mut self,
        scene_id: SceneId,
        character_id: CharacterId,
    ) -> Result<(), InvariantViolation> {
        let scene = self
            .novel
            .scene_mut(scene_id)
            .ok_or_else(|| InvariantViolation::not_found("Scene", scene_id))?;
        scene.remove_participant(character_id);
        self.novel.touch();
        Ok(())
    }

    /// Link a story beat to a scene. The beat must belong to the active
    /// structure and must not be linked to any other scene.
    pub fn link_beat(
        &mut self,
        scene_id: SceneId,
        beat_id: BeatId,
    ) -> Result<(), InvariantViolation> {
        let in_structure = self
            .novel
            .structure()
            .map(|s| s.contains_beat(beat_id))
            .unwrap_or(false);
        if !in_structure {
            return Err(InvariantViolation::BeatNotInActiveStructure(
                beat_id.to_string(),
            ));
        }
        if let Some(other) = self
            .novel
            .scenes()
            .iter()
            .find(|s| s.id() != scene_id && s.has_beat(beat_id))
        {
            return Err(InvariantViolation::BeatAlreadyLinked {
                beat_id: beat_id.to_string(),
                scene_id: other.id().to_string(),
            });
        }
        let scene = self
            .novel
            .scene_mut(scene_id)
            .ok_or_else(|| InvariantViolation::not_found("Scene", scene_id))?;
        scene.add_beat(beat_id);
        self.novel.touch();
        Ok(())
    }

    pub fn unlink_beat(
        &mut self,
        scene_id: SceneId,
        beat_id: BeatId,
    ) -> Result<(), InvariantViolation> {
        let scene = self
            .novel
            .scene_mut(scene_id)
            .ok_or_else(|| InvariantViolation::not_found("Scene", scene_id))?;
        scene.remove_beat(beat_id);
        self.novel.touch();
        Ok(())
    }

    pub fn add_scene_plot_ref(
        &mut self,
        scene_id: SceneId,
        plot_ref: ScenePlotReference,
    ) -> Result<(), InvariantViolation> {
        if !self.novel.contains_plot(plot_ref.plot_id()) {
            return Err(InvariantViolation::dangling("Plot", plot_ref.plot_id()));
        }
        let scene = self
            .novel
            .scene_mut(scene_id)
            .ok_or_else(|| InvariantViolation::not_found("Scene", scene_id))?;
        scene.add_plot_ref(plot_ref);
        self.novel.touch();
        Ok(())
    }

    pub fn remove_scene_plot_ref(
        &mut self,
        scene_id: SceneId,
        plot_id: PlotId,
    ) -> Result<(), InvariantViolation> {
        let scene = self
            .novel
            .scene_mut(scene_id)
            .ok_or_else(|| InvariantViolation::not_found("Scene", scene_id))?;
        scene.remove_plot_ref(plot_id);
        self.novel.touch();
        Ok(())
    }

    /// Create a manuscript document for a scene and attach it. Replaces a
    /// previous manuscript document if one existed.
    pub fn attach_manuscript(
        &mut self,
        scene_id: SceneId,
        document: Document,
    ) -> Result<DocumentId, InvariantViolation> {
        if self.novel.scene(scene_id).is_none() {
            return Err(InvariantViolation::not_found("Scene", scene_id));
        }
        let doc_id = document.id();
        if self.novel.contains_document(doc_id) {
            return Err(InvariantViolation::duplicate("Document", doc_id));
        }

        let document = document.with_owner(DocumentOwner::Scene(scene_id));
        if let Some(scene) = self.novel.scene_mut(scene_id) {
            if let Some(previous) = scene.manuscript() {
                self.novel.documents_mut().remove(&previous);
            }
        }
        self.novel.documents_mut().insert(doc_id, document);
        if let Some(scene) = self.novel.scene_mut(scene_id) {
            scene.set_manuscript(Some(doc_id));
        }
        self.novel.touch();
        Ok(doc_id)
    }

    // =========================================================================
    // Plots and conflicts
    // =========================================================================

    pub fn add_plot(&mut self, plot: Plot) -> Result<PlotId, InvariantViolation> {
        let id = plot.id();
        if self.novel.contains_plot(id) {
            return Err(InvariantViolation::duplicate("Plot", id));
        }
        for character_id in plot.character_ids() {
            if !self.novel.contains_character(*character_id) {
                return Err(InvariantViolation::dangling("Character", character_id));
            }
        }
        self.novel.plots_mut().push(plot);
        self.novel.touch();
        Ok(id)
    }

    pub fn update_plot(
        &mut self,
        id: PlotId,
        update: impl FnOnce(&mut Plot),
    ) -> Result<(), InvariantViolation> {
        let plot = self
            .novel
            .plot_mut(id)
            .ok_or_else(|| InvariantViolation::not_found("Plot", id))?;
        update(plot);
        self.novel.touch();
        Ok(())
    }

    /// Associate a character with a plot. Both ids must resolve in this
    /// novel; linking twice is a no-op.
    pub fn link_plot_character(
        &mut self,
        plot_id: PlotId,
        character_id: CharacterId,
    ) -> Result<(), InvariantViolation> {
        if !self.novel.contains_character(character_id) {
            return Err(InvariantViolation::dangling("Character", character_id));
        }
        let plot = self
            .novel
            .plot_mut(plot_id)
            .ok_or_else(|| InvariantViolation::not_found("Plot", plot_id))?;
        plot.link_character(character_id);
        self.novel.touch();
        Ok(())
    }

    pub fn unlink_plot_character(
        &mut self,
        plot_id: PlotId,
        character_id: CharacterId,
    ) -> Result<(), InvariantViolation> {
        let plot = self
            .novel
            .plot_mut(plot_id)
            .ok_or_else(|| InvariantViolation::not_found("Plot", plot_id))?;
        plot.unlink_character(character_id);
        self.novel.touch();
        Ok(())
    }

    /// Remove a plot, clearing every scene's reference to it.
    pub fn remove_plot(&mut self, id: PlotId) -> Result<Plot, InvariantViolation> {
        let index = self
            .novel
            .plots()
            .iter()
            .position(|p| p.id() == id)
            .ok_or_else(|| InvariantViolation::not_found("Plot", id))?;

        for scene in self.novel.scenes_mut() {
            scene.remove_plot_ref(id);
        }
        let removed = self.novel.plots_mut().remove(index);
        self.novel.touch();
        Ok(removed)
    }

    pub fn add_conflict(&mut self, conflict: Conflict) -> Result<ConflictId, InvariantViolation> {
        let id = conflict.id();
        if self.novel.conflict(id).is_some() {
            return Err(InvariantViolation::duplicate("Conflict", id));
        }
        if let Some(character_id) = conflict.character_id() {
            if !self.novel.contains_character(character_id) {
                return Err(InvariantViolation::dangling("Character", character_id));
            }
        }
        self.novel.conflicts_mut().push(conflict);
        self.novel.touch();
        Ok(id)
    }

    pub fn update_conflict(
        &mut self,
        id: ConflictId,
        update: impl FnOnce(&mut Conflict),
    ) -> Result<(), InvariantViolation> {
        let conflict = self
            .novel
            .conflict_mut(id)
            .ok_or_else(|| InvariantViolation::not_found("Conflict", id))?;
        update(conflict);
        self.novel.touch();
        Ok(())
    }

    pub fn remove_conflict(&mut self, id: ConflictId) -> Result<Conflict, InvariantViolation> {
        let index = self
            .novel
            .conflicts()
            .iter()
            .position(|c| c.id() == id)
            .ok_or_else(|| InvariantViolation::not_found("Conflict", id))?;
        let removed = self.novel.conflicts_mut().remove(index);
        self.novel.touch();
        Ok(removed)
    }

    // =========================================================================
    // Story structure
    // =========================================================================

    /// Activate a story structure. Beat links that do not resolve in the
    /// new structure are dropped from every scene, preserving invariant 1
    /// across structure switches.
    pub fn activate_structure(&mut self, structure: StoryStructure) {
        for scene in self.novel.scenes_mut() {
            scene.retain_beats(|beat_id| structure.contains_beat(beat_id));
        }
        *self.novel.structure_mut() = Some(structure);
        self.novel.touch();
    }

    // =========================================================================
    // Documents
    // =========================================================================

    pub fn add_document(&mut self, document: Document) -> Result<DocumentId, InvariantViolation> {
        let id = document.id();
        if self.novel.contains_document(id) {
            return Err(InvariantViolation::duplicate("Document", id));
        }
        match document.owner() {
            Some(DocumentOwner::Character(character_id)) => {
                if !self.novel.contains_character(character_id) {
                    return Err(InvariantViolation::dangling("Character", character_id));
                }
            }
            Some(DocumentOwner::Scene(scene_id)) => {
                if self.novel.scene(scene_id).is_none() {
                    return Err(InvariantViolation::dangling("Scene", scene_id));
                }
            }
            None => {}
        }
        self.novel.documents_mut().insert(id, document);
        self.novel.touch();
        Ok(id)
    }

    pub fn update_document(
        &mut self,
        id: DocumentId,
        update: impl FnOnce(&mut Document),
    ) -> Result<(), InvariantViolation> {
        let document = self
            .novel
            .document_mut(id)
            .ok_or_else(|| InvariantViolation::not_found("Document", id))?;
        update(document);
        self.novel.touch();
        Ok(())
    }

    pub fn remove_document(&mut self, id: DocumentId) -> Result<Document, InvariantViolation> {
        let removed = self
            .novel
            .documents_mut()
            .remove(&id)
            .ok_or_else(|| InvariantViolation::not_found("Document", id))?;

        if let Some(DocumentOwner::Scene(scene_id)) = removed.owner() {
            if let Some(scene) = self.novel.scene_mut(scene_id) {
                if scene.manuscript() == Some(id) {
                    scene.set_manuscript(None);
                }
            }
        }
        self.novel.touch();
        Ok(removed)
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    pub fn add_task(&mut self, task: Task) -> Result<TaskId, InvariantViolation> {
        let id = task.id();
        if self.novel.task(id).is_some() {
            return Err(InvariantViolation::duplicate("Task", id));
        }
        if let Some(character_id) = task.character_id() {
            if !self.novel.contains_character(character_id) {
                return Err(InvariantViolation::dangling("Character", character_id));
            }
        }
        self.novel.tasks_mut().push(task);
        self.novel.touch();
        Ok(id)
    }

    pub fn update_task(
        &mut self,
        id: TaskId,
        update: impl FnOnce(&mut Task),
    ) -> Result<(), InvariantViolation> {
        let task = self
            .novel
            .tasks_mut()
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or_else(|| InvariantViolation::not_found("Task", id))?;
        update(task);
        self.novel.touch();
        Ok(())
    }

    pub fn remove_task(&mut self, id: TaskId) -> Result<Task, InvariantViolation> {
        let index = self
            .novel
            .tasks()
            .iter()
            .position(|t| t.id() == id)
            .ok_or_else(|| InvariantViolation::not_found("Task", id))?;
        let removed = self.novel.tasks_mut().remove(index);
        self.novel.touch();
        Ok(removed)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn reindex_scenes(&mut self) {
        for (index, scene) in self.novel.scenes_mut().iter_mut().enumerate() {
            scene.set_ordering(index);
        }
    }

    fn validate_scene_refs(&self, scene: &Scene) -> Result<(), InvariantViolation> {
        if let Some(pov) = scene.pov() {
            if !self.novel.contains_character(pov) {
                return Err(InvariantViolation::dangling("Character", pov));
            }
        }
        for participant in scene.participants() {
            if !self.novel.contains_character(*participant) {
                return Err(InvariantViolation::dangling("Character", participant));
            }
        }
        for plot_ref in scene.plot_refs() {
            if !self.novel.contains_plot(plot_ref.plot_id()) {
                return Err(InvariantViolation::dangling("Plot", plot_ref.plot_id()));
            }
        }
        for beat_id in scene.beats() {
            let in_structure = self
                .novel
                .structure()
                .map(|s| s.contains_beat(*beat_id))
                .unwrap_or(false);
            if !in_structure {
                return Err(InvariantViolation::BeatNotInActiveStructure(
                    beat_id.to_string(),
                ));
            }
            if let Some(other) = self.novel.scenes().iter().find(|s| s.has_beat(*beat_id)) {
                return Err(InvariantViolation::BeatAlreadyLinked {
                    beat_id: beat_id.to_string(),
                    scene_id: other.id().to_string(),
                });
            }
        }
        if let Some(doc_id) = scene.manuscript() {
            if !self.novel.contains_document(doc_id) {
                return Err(InvariantViolation::dangling("Document", doc_id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CharacterRole, ConflictKind, DocumentKind, PlotKind};

    fn graph_with_characters() -> (EntityGraph, CharacterId, CharacterId) {
        let mut graph = EntityGraph::new(Novel::new("Test Novel"));
        let a = graph
            .add_character(Character::new("Alice").with_role(CharacterRole::Protagonist))
            .expect("add character");
        let b = graph
            .add_character(Character::new("Bran"))
            .expect("add character");
        (graph, a, b)
    }

    #[test]
    fn pov_must_resolve() {
        let (mut graph, a, _) = graph_with_characters();
        let scene_id = graph.add_scene(Scene::new("Opening")).expect("add scene");

        graph.set_scene_pov(scene_id, Some(a)).expect("set pov");
        assert_eq!(graph.novel().scene(scene_id).map(|s| s.pov()), Some(Some(a)));

        let unknown = CharacterId::new();
        let err = graph
            .set_scene_pov(scene_id, Some(unknown))
            .expect_err("dangling pov");
        assert!(matches!(err, InvariantViolation::DanglingReference { .. }));
        // graph unchanged
        assert_eq!(graph.novel().scene(scene_id).map(|s| s.pov()), Some(Some(a)));
    }

    #[test]
    fn removing_character_cascades() {
        let (mut graph, a, b) = graph_with_characters();
        let scene_id = graph.add_scene(Scene::new("Opening")).expect("add scene");
        graph.set_scene_pov(scene_id, Some(a)).expect("set pov");
        graph.add_scene_participant(scene_id, a).expect("participant");
        graph.add_scene_participant(scene_id, b).expect("participant");
        graph
            .add_conflict(Conflict::new("Rivalry", ConflictKind::Character).with_character(a))
            .expect("add conflict");

        graph.remove_character(a).expect("remove character");

        let scene = graph.novel().scene(scene_id).expect("scene");
        assert_eq!(scene.pov(), None);
        assert_eq!(scene.participants(), &[b]);
        assert!(graph
            .novel()
            .conflicts()
            .iter()
            .all(|c| c.character_id().is_none()));
    }

    #[test]
    fn beat_links_to_at_most_one_scene() {
        let (mut graph, _, _) = graph_with_characters();
        graph.activate_structure(StoryStructure::three_act());
        let hook = graph.novel().structure().expect("structure").beats()[0].id();

        let first = graph.add_scene(Scene::new("First")).expect("add scene");
        let second = graph.add_scene(Scene::new("Second")).expect("add scene");

        graph.link_beat(first, hook).expect("link beat");
        let err = graph.link_beat(second, hook).expect_err("beat taken");
        assert!(matches!(err, InvariantViolation::BeatAlreadyLinked { .. }));

        graph.unlink_beat(first, hook).expect("unlink");
        graph.link_beat(second, hook).expect("relink after free");
    }

    #[test]
    fn beat_link_requires_active_structure() {
        let (mut graph, _, _) = graph_with_characters();
        let scene_id = graph.add_scene(Scene::new("Opening")).expect("add scene");
        let err = graph
            .link_beat(scene_id, BeatId::new())
            .expect_err("no structure");
        assert!(matches!(
            err,
            InvariantViolation::BeatNotInActiveStructure(_)
        ));
    }

    #[test]
    fn structure_switch_drops_unresolvable_beat_links() {
        let (mut graph, _, _) = graph_with_characters();
        graph.activate_structure(StoryStructure::three_act());
        let hook = graph.novel().structure().expect("structure").beats()[0].id();
        let scene_id = graph.add_scene(Scene::new("Opening")).expect("add scene");
        graph.link_beat(scene_id, hook).expect("link");

        graph.activate_structure(StoryStructure::new("Empty"));

        let scene = graph.novel().scene(scene_id).expect("scene");
        assert!(scene.beats().is_empty());
    }

    #[test]
    fn reorder_reassigns_contiguous_indices() {
        let (mut graph, _, _) = graph_with_characters();
        let s1 = graph.add_scene(Scene::new("One")).expect("add");
        let s2 = graph.add_scene(Scene::new("Two")).expect("add");
        let s3 = graph.add_scene(Scene::new("Three")).expect("add");

        graph.reorder_scenes(&[s3, s1, s2]).expect("reorder");

        let orderings: Vec<(SceneId, usize)> = graph
            .novel()
            .scenes()
            .iter()
            .map(|s| (s.id(), s.ordering()))
            .collect();
        assert_eq!(orderings, vec![(s3, 0), (s1, 1), (s2, 2)]);
    }

    #[test]
    fn reorder_rejects_duplicates_and_partial_lists() {
        let (mut graph, _, _) = graph_with_characters();
        let s1 = graph.add_scene(Scene::new("One")).expect("add");
        let s2 = graph.add_scene(Scene::new("Two")).expect("add");

        assert!(graph.reorder_scenes(&[s1]).is_err());
        assert!(graph.reorder_scenes(&[s1, s1]).is_err());
        // graph unchanged
        assert_eq!(graph.novel().scenes()[0].id(), s1);
        assert_eq!(graph.novel().scenes()[1].id(), s2);
    }

    #[test]
    fn removing_scene_compacts_ordering_and_drops_manuscript() {
        let (mut graph, _, _) = graph_with_characters();
        let s1 = graph.add_scene(Scene::new("One")).expect("add");
        let s2 = graph.add_scene(Scene::new("Two")).expect("add");
        let s3 = graph.add_scene(Scene::new("Three")).expect("add");
        let doc_id = graph
            .attach_manuscript(s2, Document::new("Two", DocumentKind::Manuscript))
            .expect("attach");

        graph.remove_scene(s2).expect("remove");

        assert!(graph.novel().document(doc_id).is_none());
        let orderings: Vec<usize> = graph.novel().scenes().iter().map(|s| s.ordering()).collect();
        assert_eq!(orderings, vec![0, 1]);
        assert_eq!(graph.novel().scenes()[0].id(), s1);
        assert_eq!(graph.novel().scenes()[1].id(), s3);
    }

    #[test]
    fn removing_plot_clears_scene_references() {
        let (mut graph, _, _) = graph_with_characters();
        let plot_id = graph
            .add_plot(Plot::new("Find the key", PlotKind::Main))
            .expect("add plot");
        let scene_id = graph.add_scene(Scene::new("Opening")).expect("add scene");
        graph
            .add_scene_plot_ref(scene_id, ScenePlotReference::new(plot_id).with_progress(2))
            .expect("plot ref");

        graph.remove_plot(plot_id).expect("remove plot");

        assert!(graph
            .novel()
            .scene(scene_id)
            .expect("scene")
            .plot_refs()
            .is_empty());
    }

    #[test]
    fn document_owner_must_resolve() {
        let (mut graph, a, _) = graph_with_characters();
        let owned = Document::new("Backstory", DocumentKind::Note)
            .with_owner(DocumentOwner::Character(a));
        graph.add_document(owned).expect("add document");

        let dangling = Document::new("Orphan", DocumentKind::Note)
            .with_owner(DocumentOwner::Character(CharacterId::new()));
        assert!(graph.add_document(dangling).is_err());
    }

    #[test]
    fn plot_character_link_must_resolve() {
        let (mut graph, a, _) = graph_with_characters();
        let plot_id = graph
            .add_plot(Plot::new("Main arc", PlotKind::Main))
            .expect("add plot");

        let unknown = CharacterId::new();
        let err = graph
            .link_plot_character(plot_id, unknown)
            .expect_err("dangling link");
        assert!(matches!(err, InvariantViolation::DanglingReference { .. }));
        // Every retained character id still resolves.
        let plot = graph.novel().plot(plot_id).expect("plot");
        assert!(plot.character_ids().is_empty());

        graph.link_plot_character(plot_id, a).expect("valid link");
        let plot = graph.novel().plot(plot_id).expect("plot");
        assert_eq!(plot.character_ids(), &[a]);

        graph.unlink_plot_character(plot_id, a).expect("unlink");
        assert!(graph
            .novel()
            .plot(plot_id)
            .expect("plot")
            .character_ids()
            .is_empty());
    }

    #[test]
    fn conflict_is_mutable_after_insertion() {
        let (mut graph, _, _) = graph_with_characters();
        let conflict_id = graph
            .add_conflict(Conflict::new("Rivalry", ConflictKind::Character))
            .expect("add conflict");

        graph
            .update_conflict(conflict_id, |c| c.set_text("Blood feud"))
            .expect("update");
        assert_eq!(
            graph.novel().conflict(conflict_id).map(|c| c.text()),
            Some("Blood feud")
        );

        let err = graph
            .update_conflict(ConflictId::new(), |c| c.set_text("ghost"))
            .expect_err("unknown conflict");
        assert!(matches!(err, InvariantViolation::NotFound { .. }));
    }

    #[test]
    fn example_scenario_from_contract() {
        // Create novel; add A and B; scene with POV=A, participants=[A,B];
        // link beat "Hook"; delete A.
        let mut graph = EntityGraph::new(Novel::new("N"));
        let a = graph.add_character(Character::new("A")).expect("a");
        let b = graph.add_character(Character::new("B")).expect("b");
        graph.activate_structure(StoryStructure::three_act());
        let hook = graph.novel().structure().expect("structure").beats()[0].id();

        let s = graph.add_scene(Scene::new("S")).expect("scene");
        graph.set_scene_pov(s, Some(a)).expect("pov");
        graph.add_scene_participant(s, a).expect("participant a");
        graph.add_scene_participant(s, b).expect("participant b");
        graph.link_beat(s, hook).expect("hook");

        graph.remove_character(a).expect("delete A");

        let scene = graph.novel().scene(s).expect("scene");
        assert_eq!(scene.pov(), None);
        assert_eq!(scene.participants(), &[b]);
        // Beat link cascade is independent of POV.
        assert!(scene.has_beat(hook));
    }
}
