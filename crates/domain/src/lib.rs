//! Domain model for plotweave
//!
//! The in-memory object graph for one open novel: entities, typed ids,
//! referential invariants and the event vocabulary. Pure data and checks -
//! no I/O, no event emission. The engine crate layers persistence, the
//! event bus and background work on top of this.

pub mod entities;
pub mod error;
pub mod events;
pub mod graph;
pub mod ids;

pub use entities::{
    Character, CharacterRole, Conflict, ConflictKind, Document, DocumentContent, DocumentKind,
    DocumentOwner, Novel, NovelDescriptor, NovelSettings, Plot, PlotKind, Scene,
    ScenePlotReference, StoryBeat, StoryStructure, Task, TaskStatus,
};
pub use error::InvariantViolation;
pub use events::{ComponentId, EventKind, NovelEvent};
pub use graph::EntityGraph;
pub use ids::{
    BeatId, CharacterId, ConflictId, DocumentId, NovelId, PlotId, SceneId, StructureId, TaskId,
};
