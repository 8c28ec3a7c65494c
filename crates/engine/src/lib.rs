//! Plotweave runtime substrate.
//!
//! This crate contains everything around the entity graph that makes the
//! application run:
//!
//! - `bus` - Typed publish/subscribe channel, scoped per open novel
//! - `persistence` - Write-behind intent queue and the flush cycle
//! - `store/` - Filesystem implementations of the storage ports
//! - `docs` - Lazy document content service
//! - `tasks` - Bounded, cancellable background worker pool
//! - `repository` - Intent-recording facade consumed by UI components
//! - `workspace` - Session lifecycle for the one open novel

pub mod bus;
pub mod docs;
pub mod persistence;
pub mod ports;
pub mod repository;
pub mod store;
pub mod tasks;
pub mod workspace;

pub use bus::{EventBus, EventListener, ListenerId};
pub use docs::{DocumentError, DocumentService};
pub use persistence::{
    EntityKind, FlushFailure, FlushReport, Intent, Operation, PersistenceError,
    RepositoryPersistenceManager,
};
pub use ports::{DocumentStore, NovelStore, StoreError};
pub use repository::NovelRepository;
pub use store::{FsDocumentStore, FsNovelStore, WorkspacePaths, WorkspaceSettings};
pub use tasks::{BackgroundTaskRunner, TaskError, TaskHandle, TaskOutcome, TaskResults};
pub use workspace::{NovelWorkspace, WorkspaceError};
