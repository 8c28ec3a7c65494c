//! Conflict entity

use serde::{Deserialize, Serialize};

use crate::ids::{CharacterId, ConflictId};

/// What the conflict is fought against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictKind {
    Character,
    Society,
    Nature,
    Technology,
    Supernatural,
    Self_,
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Character => write!(f, "Character"),
            Self::Society => write!(f, "Society"),
            Self::Nature => write!(f, "Nature"),
            Self::Technology => write!(f, "Technology"),
            Self::Supernatural => write!(f, "Supernatural"),
            Self::Self_ => write!(f, "Self"),
        }
    }
}

/// A narrative conflict, optionally opposing a specific character
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    id: ConflictId,
    text: String,
    kind: ConflictKind,
    /// The opposing character, only meaningful for `ConflictKind::Character`.
    character_id: Option<CharacterId>,
}

impl Conflict {
    pub fn new(text: impl Into<String>, kind: ConflictKind) -> Self {
        Self {
            id: ConflictId::new(),
            text: text.into(),
            kind,
            character_id: None,
        }
    }

    pub fn id(&self) -> ConflictId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> ConflictKind {
        self.kind
    }

    pub fn character_id(&self) -> Option<CharacterId> {
        self.character_id
    }

    pub fn with_character(mut self, id: CharacterId) -> Self {
        self.character_id = Some(id);
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear_character(&mut self) {
        self.character_id = None;
    }
}
