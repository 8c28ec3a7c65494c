//! Filesystem storage implementations

pub mod fs;

pub use fs::{FsDocumentStore, FsNovelStore, WorkspacePaths, WorkspaceSettings};
