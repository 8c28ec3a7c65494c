//! Pending write intents
//!
//! Each durable mutation is recorded as an intent (entity kind + id +
//! operation) and coalesced per entity until the next flush: the latest
//! operation per (kind, id) survives, and first-touch order is preserved
//! across distinct entities so a flush writes them in roughly the order
//! they were touched.

use uuid::Uuid;

/// Kind of entity a pending write refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Novel,
    Character,
    Scene,
    Plot,
    Conflict,
    Structure,
    Document,
    Task,
}

/// Durable mutation requested for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert,
    Update,
    Delete,
}

/// One pending durable write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intent {
    pub kind: EntityKind,
    pub id: Uuid,
    pub op: Operation,
}

impl Intent {
    pub fn new(kind: EntityKind, id: Uuid, op: Operation) -> Self {
        Self { kind, id, op }
    }

    fn key(&self) -> (EntityKind, Uuid) {
        (self.kind, self.id)
    }
}

/// Ordered, coalescing queue of pending intents.
#[derive(Debug, Default)]
pub struct PendingQueue {
    intents: Vec<Intent>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an intent, coalescing with any pending intent for the same
    /// entity. The latest operation wins in place, except that a delete
    /// cancels an unflushed insert outright - the entity never reached
    /// disk, so there is nothing to write or remove.
    pub fn record(&mut self, intent: Intent) {
        if let Some(index) = self
            .intents
            .iter()
            .position(|pending| pending.key() == intent.key())
        {
            if self.intents[index].op == Operation::Insert && intent.op == Operation::Delete {
                self.intents.remove(index);
            } else {
                self.intents[index].op = intent.op;
            }
        } else {
            self.intents.push(intent);
        }
    }

    /// Take every pending intent, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<Intent> {
        std::mem::take(&mut self.intents)
    }

    /// Put failed intents back at the front so a retrying flush keeps the
    /// original write order. An intent re-recorded in the meantime wins
    /// over the stale failed one.
    pub fn requeue_front(&mut self, failed: Vec<Intent>) {
        let newer = std::mem::take(&mut self.intents);
        self.intents = failed;
        for intent in newer {
            self.record(intent);
        }
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(kind: EntityKind, id: Uuid, op: Operation) -> Intent {
        Intent::new(kind, id, op)
    }

    #[test]
    fn repeated_updates_coalesce_to_one_intent() {
        let mut queue = PendingQueue::new();
        let id = Uuid::new_v4();
        for _ in 0..5 {
            queue.record(intent(EntityKind::Scene, id, Operation::Update));
        }
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn latest_operation_wins_in_place() {
        let mut queue = PendingQueue::new();
        let scene = Uuid::new_v4();
        let character = Uuid::new_v4();

        queue.record(intent(EntityKind::Scene, scene, Operation::Update));
        queue.record(intent(EntityKind::Character, character, Operation::Update));
        queue.record(intent(EntityKind::Scene, scene, Operation::Delete));

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        // First-touch order preserved, operation replaced.
        assert_eq!(drained[0].id, scene);
        assert_eq!(drained[0].op, Operation::Delete);
        assert_eq!(drained[1].id, character);
    }

    #[test]
    fn delete_cancels_unflushed_insert() {
        let mut queue = PendingQueue::new();
        let id = Uuid::new_v4();
        queue.record(intent(EntityKind::Document, id, Operation::Insert));
        queue.record(intent(EntityKind::Document, id, Operation::Delete));
        assert!(queue.is_empty());
    }

    #[test]
    fn requeue_front_keeps_failed_order_but_newer_ops_win() {
        let mut queue = PendingQueue::new();
        let failed_id = Uuid::new_v4();
        let failed = vec![intent(EntityKind::Document, failed_id, Operation::Update)];

        // Recorded after the failing flush drained the queue.
        queue.record(intent(EntityKind::Document, failed_id, Operation::Delete));
        let other = Uuid::new_v4();
        queue.record(intent(EntityKind::Scene, other, Operation::Update));

        queue.requeue_front(failed);

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].id, failed_id);
        // The delete recorded mid-flush supersedes the stale failed update.
        assert_eq!(drained[0].op, Operation::Delete);
    }
}
