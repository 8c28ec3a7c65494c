//! Task entity for the per-novel management board

use serde::{Deserialize, Serialize};

use crate::ids::{CharacterId, TaskId};

/// Board column a task sits in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    #[default]
    Backlog,
    InProgress,
    Done,
}

/// A writing task, optionally tied to a character
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    title: String,
    status: TaskStatus,
    character_id: Option<CharacterId>,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            title: title.into(),
            status: TaskStatus::Backlog,
            character_id: None,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn character_id(&self) -> Option<CharacterId> {
        self.character_id
    }

    pub fn with_character(mut self, id: CharacterId) -> Self {
        self.character_id = Some(id);
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    pub(crate) fn clear_character(&mut self) {
        self.character_id = None;
    }
}
