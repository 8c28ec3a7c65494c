//! Character entity
//!
//! Characters are owned by the novel and referenced by id from scenes
//! (POV, participants), conflicts and tasks. Those are non-owning
//! back-references resolved through the novel's lookup tables.

use serde::{Deserialize, Serialize};

use crate::ids::CharacterId;

/// Narrative role a character plays in the novel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CharacterRole {
    Protagonist,
    Antagonist,
    Major,
    Secondary,
    Minor,
}

impl std::fmt::Display for CharacterRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Protagonist => write!(f, "Protagonist"),
            Self::Antagonist => write!(f, "Antagonist"),
            Self::Major => write!(f, "Major"),
            Self::Secondary => write!(f, "Secondary"),
            Self::Minor => write!(f, "Minor"),
        }
    }
}

/// A character in the novel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    id: CharacterId,
    name: String,
    role: CharacterRole,
    personality: String,
    age: Option<u16>,
    /// Reference to an avatar asset, resolved outside the core.
    avatar: Option<String>,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            role: CharacterRole::Minor,
            personality: String::new(),
            age: None,
            avatar: None,
        }
    }

    /// Reconstitute a character from storage.
    pub fn from_parts(
        id: CharacterId,
        name: String,
        role: CharacterRole,
        personality: String,
        age: Option<u16>,
        avatar: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            role,
            personality,
            age,
            avatar,
        }
    }

    // Read-only accessors

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> CharacterRole {
        self.role
    }

    pub fn personality(&self) -> &str {
        &self.personality
    }

    pub fn age(&self) -> Option<u16> {
        self.age
    }

    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    // Builder methods

    pub fn with_role(mut self, role: CharacterRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_personality(mut self, personality: impl Into<String>) -> Self {
        self.personality = personality.into();
        self
    }

    pub fn with_age(mut self, age: u16) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    // Mutators

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_role(&mut self, role: CharacterRole) {
        self.role = role;
    }

    pub fn set_personality(&mut self, personality: impl Into<String>) {
        self.personality = personality.into();
    }

    pub fn set_age(&mut self, age: Option<u16>) {
        self.age = age;
    }
}
