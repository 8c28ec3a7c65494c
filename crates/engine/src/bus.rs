//! Typed publish/subscribe channel, scoped per open novel
//!
//! The bus is deliberately single-threaded: `dispatch` runs listeners
//! synchronously, in registration order, on the thread that owns the
//! entity graph. Background workers hand results back over a channel (see
//! the tasks module) and never call `dispatch` themselves.

use std::cell::{Cell, RefCell};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use plotweave_domain::{EventKind, NovelEvent, NovelId};

/// Handle to a registration, used to deregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A component reacting to novel events.
///
/// Closures work too: any `Fn(&NovelEvent)` implements this.
pub trait EventListener {
    fn on_event(&self, event: &NovelEvent);
}

impl<F: Fn(&NovelEvent)> EventListener for F {
    fn on_event(&self, event: &NovelEvent) {
        self(event)
    }
}

/// Lifetime a registration is tied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Dropped in one call when the novel closes.
    Novel(NovelId),
    /// Survives novel switches.
    Global,
}

struct Registration {
    id: ListenerId,
    kind: EventKind,
    scope: Scope,
    listener: Rc<dyn EventListener>,
}

/// Scoped event bus for one UI thread.
#[derive(Default)]
pub struct EventBus {
    current_scope: Cell<Option<NovelId>>,
    next_id: Cell<u64>,
    registrations: RefCell<Vec<Registration>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate the scope for a newly opened novel. Registrations made from
    /// now on are dropped by the next `clear`.
    pub fn set_scope(&self, novel_id: NovelId) {
        self.current_scope.set(Some(novel_id));
    }

    /// Register a listener for one event kind, bound to the currently open
    /// novel (or globally if none is open). Listeners are invoked in
    /// registration order.
    pub fn register(&self, kind: EventKind, listener: Rc<dyn EventListener>) -> ListenerId {
        let scope = match self.current_scope.get() {
            Some(novel_id) => Scope::Novel(novel_id),
            None => Scope::Global,
        };
        self.register_scoped(kind, listener, scope)
    }

    /// Register a listener that survives novel switches.
    pub fn register_global(&self, kind: EventKind, listener: Rc<dyn EventListener>) -> ListenerId {
        self.register_scoped(kind, listener, Scope::Global)
    }

    /// Register one listener for several event kinds at once.
    pub fn register_kinds(
        &self,
        kinds: &[EventKind],
        listener: Rc<dyn EventListener>,
    ) -> Vec<ListenerId> {
        kinds
            .iter()
            .map(|kind| self.register(*kind, listener.clone()))
            .collect()
    }

    fn register_scoped(
        &self,
        kind: EventKind,
        listener: Rc<dyn EventListener>,
        scope: Scope,
    ) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.registrations.borrow_mut().push(Registration {
            id,
            kind,
            scope,
            listener,
        });
        id
    }

    /// Remove one registration. Safe to call from inside a listener.
    pub fn deregister(&self, id: ListenerId) {
        self.registrations.borrow_mut().retain(|r| r.id != id);
    }

    /// Drop every registration scoped to the currently open novel and
    /// deactivate the scope. Called when a novel closes so stale listeners
    /// cannot fire against a graph that no longer exists.
    pub fn clear(&self) {
        if let Some(novel_id) = self.current_scope.take() {
            self.registrations
                .borrow_mut()
                .retain(|r| r.scope != Scope::Novel(novel_id));
        }
    }

    /// Dispatch an event to every matching listener, in registration order,
    /// synchronously on the calling thread.
    ///
    /// The listener list is snapshotted first, so listeners may register or
    /// deregister (themselves included) while handling the event. A listener
    /// that panics is logged and isolated; dispatch continues with the rest.
    pub fn dispatch(&self, event: &NovelEvent) {
        let kind = event.kind();
        let snapshot: Vec<(ListenerId, Rc<dyn EventListener>)> = self
            .registrations
            .borrow()
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| (r.id, r.listener.clone()))
            .collect();

        for (id, listener) in snapshot {
            // A deregistration that happened earlier in this dispatch wins.
            let still_registered = self.registrations.borrow().iter().any(|r| r.id == id);
            if !still_registered {
                continue;
            }
            let result = catch_unwind(AssertUnwindSafe(|| listener.on_event(event)));
            if let Err(panic) = result {
                let message = panic_message(panic.as_ref());
                tracing::error!(kind = ?kind, listener = ?id, %message, "Event listener panicked");
            }
        }
    }

    #[cfg(test)]
    fn registration_count(&self) -> usize {
        self.registrations.borrow().len()
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
