//! Domain entities owned by the novel aggregate

pub mod character;
pub mod conflict;
pub mod document;
pub mod novel;
pub mod plot;
pub mod scene;
pub mod structure;
pub mod task;

pub use character::{Character, CharacterRole};
pub use conflict::{Conflict, ConflictKind};
pub use document::{Document, DocumentContent, DocumentKind, DocumentOwner};
pub use novel::{Novel, NovelDescriptor, NovelSettings};
pub use plot::{Plot, PlotKind};
pub use scene::{Scene, ScenePlotReference};
pub use structure::{StoryBeat, StoryStructure};
pub use task::{Task, TaskStatus};
