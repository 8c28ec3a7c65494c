//! Plot and Conflict entities
//!
//! Scenes reference plots through `ScenePlotReference` value objects (see
//! the scene module) instead of embedding them, so many scenes can share
//! one plot without duplication.

use serde::{Deserialize, Serialize};

use crate::ids::{CharacterId, PlotId};

/// Kind of storyline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlotKind {
    Main,
    Internal,
    Subplot,
}

impl std::fmt::Display for PlotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Main => write!(f, "Main"),
            Self::Internal => write!(f, "Internal"),
            Self::Subplot => write!(f, "Subplot"),
        }
    }
}

/// A storyline tracked across scenes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plot {
    id: PlotId,
    text: String,
    kind: PlotKind,
    /// Display color for storyline visuals, e.g. "#6a0dad".
    color_hexa: String,
    /// Characters associated with this storyline.
    character_ids: Vec<CharacterId>,
}

impl Plot {
    pub fn new(text: impl Into<String>, kind: PlotKind) -> Self {
        Self {
            id: PlotId::new(),
            text: text.into(),
            kind,
            color_hexa: String::new(),
            character_ids: Vec::new(),
        }
    }

    pub fn id(&self) -> PlotId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> PlotKind {
        self.kind
    }

    pub fn color_hexa(&self) -> &str {
        &self.color_hexa
    }

    pub fn character_ids(&self) -> &[CharacterId] {
        &self.character_ids
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color_hexa = color.into();
        self
    }

    pub fn with_character(mut self, id: CharacterId) -> Self {
        if !self.character_ids.contains(&id) {
            self.character_ids.push(id);
        }
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_kind(&mut self, kind: PlotKind) {
        self.kind = kind;
    }

    // Character links are reference-changing and only the graph may apply
    // them, after resolving the id.
    pub(crate) fn link_character(&mut self, id: CharacterId) {
        if !self.character_ids.contains(&id) {
            self.character_ids.push(id);
        }
    }

    pub(crate) fn unlink_character(&mut self, id: CharacterId) {
        self.character_ids.retain(|c| *c != id);
    }
}
