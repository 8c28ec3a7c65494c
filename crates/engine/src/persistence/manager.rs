//! Write-behind persistence manager
//!
//! Durable mutations are recorded as intents and return immediately; a
//! keystroke never waits on disk I/O. `flush` drains the queue and performs
//! the actual writes: one metadata write per novel per flush, plus one blob
//! write per touched document. Failed intents stay queued for a later
//! retry. At most one flush is in flight at a time.

use std::sync::{Arc, Mutex};

use uuid::Uuid;

use plotweave_domain::EntityGraph;

use crate::ports::{DocumentStore, NovelStore, StoreError};

use super::intent::{EntityKind, Intent, Operation, PendingQueue};

/// One intent that could not be written during a flush.
#[derive(Debug)]
pub struct FlushFailure {
    pub intent: Intent,
    pub error: StoreError,
}

/// Outcome of a best-effort flush.
#[derive(Debug, Default)]
pub struct FlushReport {
    /// How many coalesced intents the flush attempted to write.
    pub attempted: usize,
    /// Intents that failed; they remain queued for the next flush.
    pub failures: Vec<FlushFailure>,
}

impl FlushReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fatal persistence failure, raised only by the strict flush variant.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("{failed} of {attempted} pending writes failed; edits remain queued")]
    FlushFailed {
        attempted: usize,
        failed: usize,
        details: Vec<String>,
    },
}

/// Serializes all durable mutations into a write-behind queue.
///
/// Constructed once at startup and passed to the components that need it;
/// the one-writer-at-a-time guarantee comes from the internal flush guard,
/// not from global state.
pub struct RepositoryPersistenceManager {
    novel_store: Arc<dyn NovelStore>,
    doc_store: Arc<dyn DocumentStore>,
    pending: Mutex<PendingQueue>,
    flush_guard: tokio::sync::Mutex<()>,
}

impl RepositoryPersistenceManager {
    pub fn new(novel_store: Arc<dyn NovelStore>, doc_store: Arc<dyn DocumentStore>) -> Self {
        Self {
            novel_store,
            doc_store,
            pending: Mutex::new(PendingQueue::new()),
            flush_guard: tokio::sync::Mutex::new(()),
        }
    }

    // =========================================================================
    // Intent recording (returns immediately, no I/O)
    // =========================================================================

    pub fn insert(&self, kind: EntityKind, id: Uuid) {
        self.record(Intent::new(kind, id, Operation::Insert));
    }

    pub fn update(&self, kind: EntityKind, id: Uuid) {
        self.record(Intent::new(kind, id, Operation::Update));
    }

    pub fn delete(&self, kind: EntityKind, id: Uuid) {
        self.record(Intent::new(kind, id, Operation::Delete));
    }

    fn record(&self, intent: Intent) {
        tracing::trace!(?intent, "Recording persistence intent");
        self.pending_lock().record(intent);
    }

    /// Whether any intent is waiting for the next flush.
    pub fn is_dirty(&self) -> bool {
        !self.pending_lock().is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending_lock().len()
    }

    // =========================================================================
    // Flushing
    // =========================================================================

    /// Drain the pending queue and perform the writes, best effort.
    ///
    /// Each failure is reported and its intent re-queued; the caller
    /// decides whether a partial failure is acceptable. Concurrent calls
    /// serialize on an internal guard so writes to the same backing files
    /// never interleave.
    pub async fn flush(&self, graph: &EntityGraph) -> FlushReport {
        let _guard = self.flush_guard.lock().await;

        let drained = self.pending_lock().drain();
        if drained.is_empty() {
            return FlushReport::default();
        }
        let attempted = drained.len();
        tracing::debug!(attempted, "Flushing pending writes");

        let mut failures = Vec::new();

        // Novel deletions are individual file removals.
        let mut deleted_novels = Vec::new();
        for intent in drained
            .iter()
            .filter(|i| i.kind == EntityKind::Novel && i.op == Operation::Delete)
        {
            deleted_novels.push(intent.id);
            if let Err(error) = self.novel_store.delete_novel(intent.id.into()).await {
                failures.push(FlushFailure {
                    intent: *intent,
                    error,
                });
            }
        }

        // Every graph-shape intent is durable through the novel's single
        // metadata file: one write per flush covers them all.
        let novel_just_deleted = deleted_novels.contains(&graph.id().to_uuid());
        let metadata_intents: Vec<Intent> = drained
            .iter()
            .copied()
            .filter(|i| i.kind != EntityKind::Document)
            .filter(|i| !(i.kind == EntityKind::Novel && i.op == Operation::Delete))
            .collect();

        if !metadata_intents.is_empty() && !novel_just_deleted {
            if let Err(error) = self.novel_store.save_novel(graph.novel()).await {
                tracing::error!(%error, "Novel metadata write failed");
                // Every metadata-backed intent shares the failed write.
                failures.push(FlushFailure {
                    intent: metadata_intents[0],
                    error,
                });
                for intent in metadata_intents.into_iter().skip(1) {
                    failures.push(FlushFailure {
                        intent,
                        error: StoreError::io("save_novel", "metadata write failed"),
                    });
                }
            }
        }

        // Document content blobs, in first-touch order.
        for intent in drained.iter().filter(|i| i.kind == EntityKind::Document) {
            let doc_id = intent.id.into();
            let result = match intent.op {
                Operation::Insert | Operation::Update => {
                    match graph.novel().document(doc_id).and_then(|d| d.content().text()) {
                        // Content never loaded or already gone: nothing to write.
                        None => Ok(()),
                        Some(text) => self.doc_store.save(doc_id, text).await,
                    }
                }
                Operation::Delete => self.doc_store.delete(doc_id).await,
            };
            if let Err(error) = result {
                failures.push(FlushFailure {
                    intent: *intent,
                    error,
                });
            }
        }

        if failures.is_empty() {
            tracing::debug!(attempted, "Flush completed");
        } else {
            tracing::warn!(
                attempted,
                failed = failures.len(),
                "Flush completed with failures; intents re-queued"
            );
            let failed_intents = failures.iter().map(|f| f.intent).collect();
            self.pending_lock().requeue_front(failed_intents);
        }

        FlushReport {
            attempted,
            failures,
        }
    }

    /// Strict flush used before destructive transitions (closing a novel,
    /// switching novels, application exit). Any failure aborts the
    /// transition; edits remain queued.
    pub async fn flush_or_fail(&self, graph: &EntityGraph) -> Result<(), PersistenceError> {
        let report = self.flush(graph).await;
        if report.is_ok() {
            Ok(())
        } else {
            Err(PersistenceError::FlushFailed {
                attempted: report.attempted,
                failed: report.failures.len(),
                details: report
                    .failures
                    .iter()
                    .map(|f| format!("{:?} {}: {}", f.intent.kind, f.intent.id, f.error))
                    .collect(),
            })
        }
    }

    fn pending_lock(&self) -> std::sync::MutexGuard<'_, PendingQueue> {
        // A poisoned queue only means a panic mid-record; the data is a
        // plain Vec and safe to keep using.
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
