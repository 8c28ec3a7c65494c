//! Filesystem-backed stores
//!
//! One JSON metadata file per novel under `novels/`, one plain content blob
//! per document under `docs/`, located in a per-user application data
//! directory (or any explicit root, e.g. for tests).

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;

use plotweave_domain::{DocumentId, Novel, NovelDescriptor, NovelId};

use crate::ports::{DocumentStore, NovelStore, StoreError};

/// On-disk layout of a plotweave workspace.
#[derive(Debug, Clone)]
pub struct WorkspacePaths {
    root: PathBuf,
}

impl WorkspacePaths {
    /// Rooted at an explicit directory.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Rooted at the per-user application data directory.
    pub fn per_user() -> Option<Self> {
        directories::ProjectDirs::from("", "", "plotweave")
            .map(|dirs| Self::at(dirs.data_dir()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn novels_dir(&self) -> PathBuf {
        self.root.join("novels")
    }

    pub fn docs_dir(&self) -> PathBuf {
        self.root.join("docs")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.root.join("settings.json")
    }
}

/// Free-form application settings, one JSON file per workspace root.
///
/// Unknown fields are preserved-by-default semantics: missing file or
/// missing fields fall back to `Default`, so adding a setting never
/// invalidates an existing workspace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkspaceSettings {
    /// Novel to reopen on startup.
    pub last_opened: Option<NovelId>,
    /// Background worker pool size; `None` uses the built-in default.
    pub background_workers: Option<usize>,
    /// Named feature toggles.
    pub toggles: HashMap<String, bool>,
}

impl WorkspaceSettings {
    /// Reads the settings file, falling back to defaults when it does not
    /// exist yet.
    pub async fn load(paths: &WorkspacePaths) -> Result<Self, StoreError> {
        let content = match fs::read_to_string(paths.settings_file()).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(StoreError::io("load_settings", e)),
        };
        serde_json::from_str(&content).map_err(StoreError::serialization)
    }

    pub async fn save(&self, paths: &WorkspacePaths) -> Result<(), StoreError> {
        fs::create_dir_all(paths.root())
            .await
            .map_err(|e| StoreError::io("save_settings", e))?;
        let content = serde_json::to_string_pretty(self).map_err(StoreError::serialization)?;
        fs::write(paths.settings_file(), content)
            .await
            .map_err(|e| StoreError::io("save_settings", e))
    }
}

/// Novel metadata store writing one JSON file per novel.
pub struct FsNovelStore {
    dir: PathBuf,
}

impl FsNovelStore {
    pub fn new(paths: &WorkspacePaths) -> Self {
        Self {
            dir: paths.novels_dir(),
        }
    }

    fn novel_path(&self, id: NovelId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

/// Just enough of the novel file to list it without loading the graph.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartialNovel {
    id: NovelId,
    title: String,
    #[serde(default)]
    subtitle: Option<String>,
}

#[async_trait]
impl NovelStore for FsNovelStore {
    async fn load_novel(&self, id: NovelId) -> Result<Novel, StoreError> {
        let path = self.novel_path(id);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::not_found("Novel", id));
            }
            Err(e) => return Err(StoreError::io("load_novel", e)),
        };
        serde_json::from_str(&content).map_err(StoreError::serialization)
    }

    async fn save_novel(&self, novel: &Novel) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::io("save_novel", e))?;
        let content =
            serde_json::to_string_pretty(novel).map_err(StoreError::serialization)?;
        fs::write(self.novel_path(novel.id()), content)
            .await
            .map_err(|e| StoreError::io("save_novel", e))
    }

    async fn delete_novel(&self, id: NovelId) -> Result<(), StoreError> {
        match fs::remove_file(self.novel_path(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io("delete_novel", e)),
        }
    }

    async fn list_novels(&self) -> Result<Vec<NovelDescriptor>, StoreError> {
        let mut descriptors = Vec::new();
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(descriptors),
            Err(e) => return Err(StoreError::io("list_novels", e)),
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io("list_novels", e))?
        {
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                let content = fs::read_to_string(&path)
                    .await
                    .map_err(|e| StoreError::io("list_novels", e))?;
                match serde_json::from_str::<PartialNovel>(&content) {
                    Ok(partial) => descriptors.push(NovelDescriptor::new(
                        partial.id,
                        partial.title,
                        partial.subtitle,
                    )),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable novel file");
                    }
                }
            }
        }

        descriptors.sort_by(|a, b| a.title().cmp(b.title()));
        Ok(descriptors)
    }
}

/// Document content store writing one blob file per document id.
pub struct FsDocumentStore {
    dir: PathBuf,
}

impl FsDocumentStore {
    pub fn new(paths: &WorkspacePaths) -> Self {
        Self {
            dir: paths.docs_dir(),
        }
    }

    fn doc_path(&self, id: DocumentId) -> PathBuf {
        self.dir.join(format!("{id}.md"))
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn load(&self, id: DocumentId) -> Result<String, StoreError> {
        match fs::read_to_string(self.doc_path(id)).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::not_found("Document", id))
            }
            Err(e) => Err(StoreError::io("load_document", e)),
        }
    }

    async fn save(&self, id: DocumentId, content: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::io("save_document", e))?;
        fs::write(self.doc_path(id), content)
            .await
            .map_err(|e| StoreError::io("save_document", e))
    }

    async fn delete(&self, id: DocumentId) -> Result<(), StoreError> {
        match fs::remove_file(self.doc_path(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io("delete_document", e)),
        }
    }
}
