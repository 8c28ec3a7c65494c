//! Document entity
//!
//! Document metadata lives in the novel's in-memory graph at all times;
//! content is a tagged state that starts `Unloaded` and is fetched from the
//! document store on first access only. "Loaded but absent" is
//! unrepresentable.

use serde::{Deserialize, Serialize};

use crate::ids::{CharacterId, DocumentId, SceneId};

/// What kind of text a document holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    Note,
    Manuscript,
    CauseAndEffect,
}

/// The entity a document belongs to, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentOwner {
    Character(CharacterId),
    Scene(SceneId),
}

/// Lazily loaded document content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DocumentContent {
    #[default]
    Unloaded,
    Loaded(String),
}

impl DocumentContent {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Unloaded => None,
            Self::Loaded(text) => Some(text),
        }
    }
}

/// A unit of free text content addressed by id
///
/// Content is deliberately not serialized with the metadata: it lives in
/// the document store as its own addressable blob and starts `Unloaded`
/// after every reconstitution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    id: DocumentId,
    title: String,
    kind: DocumentKind,
    icon: Option<String>,
    owner: Option<DocumentOwner>,
    #[serde(skip)]
    content: DocumentContent,
}

impl Document {
    pub fn new(title: impl Into<String>, kind: DocumentKind) -> Self {
        Self {
            id: DocumentId::new(),
            title: title.into(),
            kind,
            icon: None,
            owner: None,
            content: DocumentContent::Unloaded,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn owner(&self) -> Option<DocumentOwner> {
        self.owner
    }

    pub fn content(&self) -> &DocumentContent {
        &self.content
    }

    pub fn is_loaded(&self) -> bool {
        self.content.is_loaded()
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_owner(mut self, owner: DocumentOwner) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Mark the content as loaded. Called by the document content API after
    /// a successful store read, and by editors overwriting content in memory.
    pub fn set_content(&mut self, text: impl Into<String>) {
        self.content = DocumentContent::Loaded(text.into());
    }

    /// Drop the in-memory content, returning the document to `Unloaded`.
    pub fn unload(&mut self) {
        self.content = DocumentContent::Unloaded;
    }
}
