//! Novel events
//!
//! Immutable value objects dispatched over the event bus when the graph
//! changes. Events carry the affected ids plus the originating component
//! identity so a listener can ignore its own emissions; listeners re-derive
//! any richer state from the entity graph.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ids::{BeatId, CharacterId, NovelId, PlotId, SceneId, TaskId};

/// Identity of the component that emitted an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentId(Uuid);

impl ComponentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ComponentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discriminant used for event bus registrations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    CharacterChanged,
    CharacterDeleted,
    SceneAdded,
    SceneChanged,
    SceneDeleted,
    SceneSelected,
    SceneSelectionCleared,
    SceneOrderChanged,
    SceneStoryBeatChanged,
    NovelUpdated,
    NovelDeleted,
    NovelAboutToSync,
    NovelSynced,
    StorylineCreated,
    StorylineRemoved,
    StorylineChanged,
    NovelStoryStructureUpdated,
    TaskChanged,
    TaskDeleted,
}

/// A notification about a change to the entity graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum NovelEvent {
    CharacterChanged {
        source: ComponentId,
        character_id: CharacterId,
    },
    CharacterDeleted {
        source: ComponentId,
        character_id: CharacterId,
    },
    SceneAdded {
        source: ComponentId,
        scene_id: SceneId,
    },
    SceneChanged {
        source: ComponentId,
        scene_id: SceneId,
    },
    SceneDeleted {
        source: ComponentId,
        scene_id: SceneId,
    },
    SceneSelected {
        source: ComponentId,
        scene_id: SceneId,
    },
    SceneSelectionCleared {
        source: ComponentId,
    },
    SceneOrderChanged {
        source: ComponentId,
    },
    SceneStoryBeatChanged {
        source: ComponentId,
        scene_id: SceneId,
        beat_id: BeatId,
        linked: bool,
    },
    NovelUpdated {
        source: ComponentId,
        novel_id: NovelId,
    },
    NovelDeleted {
        source: ComponentId,
        novel_id: NovelId,
    },
    NovelAboutToSync {
        source: ComponentId,
        novel_id: NovelId,
    },
    NovelSynced {
        source: ComponentId,
        novel_id: NovelId,
    },
    StorylineCreated {
        source: ComponentId,
        plot_id: PlotId,
    },
    StorylineRemoved {
        source: ComponentId,
        plot_id: PlotId,
    },
    StorylineChanged {
        source: ComponentId,
        plot_id: PlotId,
    },
    NovelStoryStructureUpdated {
        source: ComponentId,
        novel_id: NovelId,
    },
    TaskChanged {
        source: ComponentId,
        task_id: TaskId,
    },
    TaskDeleted {
        source: ComponentId,
        task_id: TaskId,
    },
}

impl NovelEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::CharacterChanged { .. } => EventKind::CharacterChanged,
            Self::CharacterDeleted { .. } => EventKind::CharacterDeleted,
            Self::SceneAdded { .. } => EventKind::SceneAdded,
            Self::SceneChanged { .. } => EventKind::SceneChanged,
            Self::SceneDeleted { .. } => EventKind::SceneDeleted,
            Self::SceneSelected { .. } => EventKind::SceneSelected,
            Self::SceneSelectionCleared { .. } => EventKind::SceneSelectionCleared,
            Self::SceneOrderChanged { .. } => EventKind::SceneOrderChanged,
            Self::SceneStoryBeatChanged { .. } => EventKind::SceneStoryBeatChanged,
            Self::NovelUpdated { .. } => EventKind::NovelUpdated,
            Self::NovelDeleted { .. } => EventKind::NovelDeleted,
            Self::NovelAboutToSync { .. } => EventKind::NovelAboutToSync,
            Self::NovelSynced { .. } => EventKind::NovelSynced,
            Self::StorylineCreated { .. } => EventKind::StorylineCreated,
            Self::StorylineRemoved { .. } => EventKind::StorylineRemoved,
            Self::StorylineChanged { .. } => EventKind::StorylineChanged,
            Self::NovelStoryStructureUpdated { .. } => EventKind::NovelStoryStructureUpdated,
            Self::TaskChanged { .. } => EventKind::TaskChanged,
            Self::TaskDeleted { .. } => EventKind::TaskDeleted,
        }
    }

    /// The component that emitted the event.
    pub fn source(&self) -> ComponentId {
        match self {
            Self::CharacterChanged { source, .. }
            | Self::CharacterDeleted { source, .. }
            | Self::SceneAdded { source, .. }
            | Self::SceneChanged { source, .. }
            | Self::SceneDeleted { source, .. }
            | Self::SceneSelected { source, .. }
            | Self::SceneSelectionCleared { source }
            | Self::SceneOrderChanged { source }
            | Self::SceneStoryBeatChanged { source, .. }
            | Self::NovelUpdated { source, .. }
            | Self::NovelDeleted { source, .. }
            | Self::NovelAboutToSync { source, .. }
            | Self::NovelSynced { source, .. }
            | Self::StorylineCreated { source, .. }
            | Self::StorylineRemoved { source, .. }
            | Self::StorylineChanged { source, .. }
            | Self::NovelStoryStructureUpdated { source, .. }
            | Self::TaskChanged { source, .. }
            | Self::TaskDeleted { source, .. } => *source,
        }
    }
}
