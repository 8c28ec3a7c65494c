//! Novel aggregate - the root that owns every entity of one open novel
//!
//! All cross-entity references are ids resolved through the lookup methods
//! here. Mutations that touch references go through the entity graph, which
//! validates them against this aggregate first.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CharacterId, ConflictId, DocumentId, NovelId, PlotId, SceneId, TaskId};

use super::character::Character;
use super::conflict::Conflict;
use super::document::Document;
use super::plot::Plot;
use super::scene::Scene;
use super::structure::StoryStructure;
use super::task::Task;

/// Free-form per-novel settings (panel toggles and similar)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NovelSettings {
    toggles: HashMap<String, bool>,
}

impl NovelSettings {
    pub fn is_enabled(&self, key: &str) -> bool {
        self.toggles.get(key).copied().unwrap_or(true)
    }

    pub fn set_enabled(&mut self, key: impl Into<String>, enabled: bool) {
        self.toggles.insert(key.into(), enabled);
    }
}

/// Lightweight projection of a novel for listing without loading the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NovelDescriptor {
    id: NovelId,
    title: String,
    subtitle: Option<String>,
}

impl NovelDescriptor {
    pub fn new(id: NovelId, title: impl Into<String>, subtitle: Option<String>) -> Self {
        Self {
            id,
            title: title.into(),
            subtitle,
        }
    }

    pub fn id(&self) -> NovelId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }
}

/// A complete novel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Novel {
    // Identity
    id: NovelId,
    title: String,
    subtitle: Option<String>,

    // Owned entities
    characters: Vec<Character>,
    scenes: Vec<Scene>,
    plots: Vec<Plot>,
    conflicts: Vec<Conflict>,
    documents: HashMap<DocumentId, Document>,
    tasks: Vec<Task>,

    // Active story structure template
    structure: Option<StoryStructure>,

    // Settings
    settings: NovelSettings,

    // Timestamps
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Novel {
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: NovelId::new(),
            title: title.into(),
            subtitle: None,
            characters: Vec::new(),
            scenes: Vec::new(),
            plots: Vec::new(),
            conflicts: Vec::new(),
            documents: HashMap::new(),
            tasks: Vec::new(),
            structure: None,
            settings: NovelSettings::default(),
            created_at: now,
            updated_at: now,
        }
    }

    // =========================================================================
    // Identity accessors
    // =========================================================================

    pub fn id(&self) -> NovelId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    pub fn descriptor(&self) -> NovelDescriptor {
        NovelDescriptor::new(self.id, self.title.clone(), self.subtitle.clone())
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    pub fn set_subtitle(&mut self, subtitle: Option<String>) {
        self.subtitle = subtitle;
        self.touch();
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    // =========================================================================
    // Entity collections
    // =========================================================================

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn plots(&self) -> &[Plot] {
        &self.plots
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn structure(&self) -> Option<&StoryStructure> {
        self.structure.as_ref()
    }

    pub fn settings(&self) -> &NovelSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut NovelSettings {
        &mut self.settings
    }

    // =========================================================================
    // Lookup tables
    // =========================================================================

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id() == id)
    }

    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id() == id)
    }

    pub fn plot(&self, id: PlotId) -> Option<&Plot> {
        self.plots.iter().find(|p| p.id() == id)
    }

    pub fn conflict(&self, id: ConflictId) -> Option<&Conflict> {
        self.conflicts.iter().find(|c| c.id() == id)
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(&id)
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn contains_character(&self, id: CharacterId) -> bool {
        self.character(id).is_some()
    }

    pub fn contains_plot(&self, id: PlotId) -> bool {
        self.plot(id).is_some()
    }

    pub fn contains_document(&self, id: DocumentId) -> bool {
        self.documents.contains_key(&id)
    }

    // Crate-internal mutable access for the entity graph.

    pub(crate) fn characters_mut(&mut self) -> &mut Vec<Character> {
        &mut self.characters
    }

    pub(crate) fn scenes_mut(&mut self) -> &mut Vec<Scene> {
        &mut self.scenes
    }

    pub(crate) fn plots_mut(&mut self) -> &mut Vec<Plot> {
        &mut self.plots
    }

    pub(crate) fn conflicts_mut(&mut self) -> &mut Vec<Conflict> {
        &mut self.conflicts
    }

    pub(crate) fn documents_mut(&mut self) -> &mut HashMap<DocumentId, Document> {
        &mut self.documents
    }

    pub(crate) fn tasks_mut(&mut self) -> &mut Vec<Task> {
        &mut self.tasks
    }

    pub(crate) fn structure_mut(&mut self) -> &mut Option<StoryStructure> {
        &mut self.structure
    }

    pub fn character_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.id() == id)
    }

    pub fn scene_mut(&mut self, id: SceneId) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| s.id() == id)
    }

    pub fn plot_mut(&mut self, id: PlotId) -> Option<&mut Plot> {
        self.plots.iter_mut().find(|p| p.id() == id)
    }

    pub fn conflict_mut(&mut self, id: ConflictId) -> Option<&mut Conflict> {
        self.conflicts.iter_mut().find(|c| c.id() == id)
    }

    pub fn document_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.get_mut(&id)
    }
}
