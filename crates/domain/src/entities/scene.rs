//! Scene entity
//!
//! All cross-entity links (POV, participants, beats, plots, manuscript)
//! are stored as ids and resolved through the owning novel. The ordering
//! index is maintained by the entity graph and kept contiguous across
//! reorder operations.

use serde::{Deserialize, Serialize};

use crate::ids::{BeatId, CharacterId, DocumentId, PlotId, SceneId};

/// Data for the link between a scene and a plot
///
/// Carries per-scene progression instead of embedding the plot itself, so
/// many scenes can reference one plot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenePlotReference {
    plot_id: PlotId,
    /// How far this scene advances the storyline, -5..=5.
    progress: i8,
    /// Free-form note on what happens to the storyline here.
    note: Option<String>,
}

impl ScenePlotReference {
    pub fn new(plot_id: PlotId) -> Self {
        Self {
            plot_id,
            progress: 0,
            note: None,
        }
    }

    pub fn plot_id(&self) -> PlotId {
        self.plot_id
    }

    pub fn progress(&self) -> i8 {
        self.progress
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn with_progress(mut self, progress: i8) -> Self {
        self.progress = progress.clamp(-5, 5);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn set_progress(&mut self, progress: i8) {
        self.progress = progress.clamp(-5, 5);
    }
}

/// A scene in the novel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    id: SceneId,
    title: String,
    synopsis: String,
    /// Position within the novel, contiguous and unique.
    ordering: usize,
    pov: Option<CharacterId>,
    participants: Vec<CharacterId>,
    beats: Vec<BeatId>,
    plot_refs: Vec<ScenePlotReference>,
    /// Manuscript content for this scene, if any.
    manuscript: Option<DocumentId>,
}

impl Scene {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: SceneId::new(),
            title: title.into(),
            synopsis: String::new(),
            ordering: 0,
            pov: None,
            participants: Vec::new(),
            beats: Vec::new(),
            plot_refs: Vec::new(),
            manuscript: None,
        }
    }

    // Read-only accessors

    pub fn id(&self) -> SceneId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn synopsis(&self) -> &str {
        &self.synopsis
    }

    pub fn ordering(&self) -> usize {
        self.ordering
    }

    pub fn pov(&self) -> Option<CharacterId> {
        self.pov
    }

    pub fn participants(&self) -> &[CharacterId] {
        &self.participants
    }

    pub fn beats(&self) -> &[BeatId] {
        &self.beats
    }

    pub fn plot_refs(&self) -> &[ScenePlotReference] {
        &self.plot_refs
    }

    pub fn manuscript(&self) -> Option<DocumentId> {
        self.manuscript
    }

    pub fn has_beat(&self, beat_id: BeatId) -> bool {
        self.beats.contains(&beat_id)
    }

    // Builder methods

    pub fn with_synopsis(mut self, synopsis: impl Into<String>) -> Self {
        self.synopsis = synopsis.into();
        self
    }

    // Mutators. Reference-changing mutations go through the entity graph,
    // which validates against the owning novel first.

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_synopsis(&mut self, synopsis: impl Into<String>) {
        self.synopsis = synopsis.into();
    }

    pub(crate) fn set_ordering(&mut self, ordering: usize) {
        self.ordering = ordering;
    }

    pub(crate) fn set_pov(&mut self, pov: Option<CharacterId>) {
        self.pov = pov;
    }

    pub(crate) fn add_participant(&mut self, id: CharacterId) {
        if !self.participants.contains(&id) {
            self.participants.push(id);
        }
    }

    pub(crate) fn remove_participant(&mut self, id: CharacterId) {
        self.participants.retain(|c| *c != id);
    }

    pub(crate) fn add_beat(&mut self, id: BeatId) {
        if !self.beats.contains(&id) {
            self.beats.push(id);
        }
    }

    pub(crate) fn remove_beat(&mut self, id: BeatId) {
        self.beats.retain(|b| *b != id);
    }

    pub(crate) fn retain_beats(&mut self, keep: impl Fn(BeatId) -> bool) {
        self.beats.retain(|b| keep(*b));
    }

    pub(crate) fn add_plot_ref(&mut self, plot_ref: ScenePlotReference) {
        if !self
            .plot_refs
            .iter()
            .any(|r| r.plot_id() == plot_ref.plot_id())
        {
            self.plot_refs.push(plot_ref);
        }
    }

    pub(crate) fn remove_plot_ref(&mut self, plot_id: PlotId) {
        self.plot_refs.retain(|r| r.plot_id() != plot_id);
    }

    pub fn plot_ref_mut(&mut self, plot_id: PlotId) -> Option<&mut ScenePlotReference> {
        self.plot_refs.iter_mut().find(|r| r.plot_id() == plot_id)
    }

    pub(crate) fn set_manuscript(&mut self, id: Option<DocumentId>) {
        self.manuscript = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_ref_progress_is_clamped() {
        let plot_ref = ScenePlotReference::new(PlotId::new()).with_progress(9);
        assert_eq!(plot_ref.progress(), 5);
    }

    #[test]
    fn participants_are_deduplicated() {
        let mut scene = Scene::new("Opening");
        let id = CharacterId::new();
        scene.add_participant(id);
        scene.add_participant(id);
        assert_eq!(scene.participants().len(), 1);
    }

    #[test]
    fn duplicate_plot_refs_are_ignored() {
        let mut scene = Scene::new("Opening");
        let plot_id = PlotId::new();
        scene.add_plot_ref(ScenePlotReference::new(plot_id).with_progress(1));
        scene.add_plot_ref(ScenePlotReference::new(plot_id).with_progress(3));
        assert_eq!(scene.plot_refs().len(), 1);
        assert_eq!(scene.plot_refs()[0].progress(), 1);
    }
}
