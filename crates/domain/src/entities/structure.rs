//! Story structure templates
//!
//! A structure is an ordered template of narrative beats grouped into acts.
//! Scenes link to beats by id; the graph enforces that a beat is linked to
//! at most one scene at a time.

use serde::{Deserialize, Serialize};

use crate::ids::{BeatId, StructureId};

/// A named point in a story structure template
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryBeat {
    id: BeatId,
    text: String,
    /// Act number the beat belongs to, 1-based.
    act: u8,
    /// Position of the beat within the whole structure, as a percentage.
    percentage: f32,
}

impl StoryBeat {
    pub fn new(text: impl Into<String>, act: u8, percentage: f32) -> Self {
        Self {
            id: BeatId::new(),
            text: text.into(),
            act,
            percentage,
        }
    }

    pub fn id(&self) -> BeatId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn act(&self) -> u8 {
        self.act
    }

    pub fn percentage(&self) -> f32 {
        self.percentage
    }
}

/// An ordered template of story beats grouped into acts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryStructure {
    id: StructureId,
    title: String,
    beats: Vec<StoryBeat>,
}

impl StoryStructure {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: StructureId::new(),
            title: title.into(),
            beats: Vec::new(),
        }
    }

    /// The classic three-act template.
    pub fn three_act() -> Self {
        let mut structure = Self::new("Three Act Structure");
        structure.beats = vec![
            StoryBeat::new("Hook", 1, 1.0),
            StoryBeat::new("Inciting Incident", 1, 10.0),
            StoryBeat::new("First Plot Point", 1, 25.0),
            StoryBeat::new("First Pinch Point", 2, 35.0),
            StoryBeat::new("Midpoint", 2, 50.0),
            StoryBeat::new("Second Pinch Point", 2, 62.0),
            StoryBeat::new("Dark Moment", 2, 75.0),
            StoryBeat::new("Climax", 3, 90.0),
            StoryBeat::new("Resolution", 3, 99.0),
        ];
        structure
    }

    pub fn id(&self) -> StructureId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn beats(&self) -> &[StoryBeat] {
        &self.beats
    }

    pub fn beat(&self, id: BeatId) -> Option<&StoryBeat> {
        self.beats.iter().find(|b| b.id() == id)
    }

    pub fn contains_beat(&self, id: BeatId) -> bool {
        self.beat(id).is_some()
    }

    pub fn add_beat(&mut self, beat: StoryBeat) {
        self.beats.push(beat);
        self.beats
            .sort_by(|a, b| a.percentage.total_cmp(&b.percentage));
    }

    /// Beats of one act, in template order.
    pub fn act_beats(&self, act: u8) -> Vec<&StoryBeat> {
        self.beats.iter().filter(|b| b.act == act).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_act_template_is_ordered() {
        let structure = StoryStructure::three_act();
        assert_eq!(structure.beats().len(), 9);
        assert_eq!(structure.beats()[0].text(), "Hook");
        let percentages: Vec<f32> = structure.beats().iter().map(|b| b.percentage()).collect();
        let mut sorted = percentages.clone();
        sorted.sort_by(f32::total_cmp);
        assert_eq!(percentages, sorted);
    }

    #[test]
    fn add_beat_keeps_percentage_order() {
        let mut structure = StoryStructure::new("Custom");
        structure.add_beat(StoryBeat::new("End", 3, 95.0));
        structure.add_beat(StoryBeat::new("Start", 1, 5.0));
        assert_eq!(structure.beats()[0].text(), "Start");
    }

    #[test]
    fn act_beats_filters_by_act() {
        let structure = StoryStructure::three_act();
        assert_eq!(structure.act_beats(1).len(), 3);
        assert_eq!(structure.act_beats(3).len(), 2);
    }
}
