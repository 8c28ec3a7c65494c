//! Bounded runner for long, cancellable background work.
//!
//! Submitted tasks run on the tokio pool and never touch the entity graph
//! or the event bus; they produce an outcome that the UI loop drains via
//! [`TaskResults`] and applies on its own thread. That indirection is what
//! keeps event dispatch single-threaded.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Failure produced by a background task.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("background task failed: {0}")]
    Failed(String),
}

impl TaskError {
    pub fn failed(message: impl ToString) -> Self {
        Self::Failed(message.to_string())
    }
}

/// Result of one finished task, tagged with the label it was submitted
/// under. Cancelled tasks produce no outcome at all.
#[derive(Debug)]
pub struct TaskOutcome<R> {
    pub label: String,
    pub result: Result<R, TaskError>,
}

/// Handle returned by [`BackgroundTaskRunner::submit`]; dropping it does
/// not cancel the task.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    label: String,
    token: CancellationToken,
}

impl TaskHandle {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Requests cancellation. A task that has not started yet never runs;
    /// a running task stops at its next await point.
    pub fn cancel(&self) {
        debug!(label = %self.label, "background task cancelled");
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Consumer side of the outcome channel; the UI loop polls this.
pub struct TaskResults<R> {
    receiver: mpsc::UnboundedReceiver<TaskOutcome<R>>,
}

impl<R> TaskResults<R> {
    /// Non-blocking drain step for an event-loop tick.
    pub fn try_recv(&mut self) -> Option<TaskOutcome<R>> {
        self.receiver.try_recv().ok()
    }

    /// Waits for the next outcome; `None` once the runner is gone and the
    /// channel is drained.
    pub async fn recv(&mut self) -> Option<TaskOutcome<R>> {
        self.receiver.recv().await
    }
}

/// Worker pool with a fixed concurrency bound.
pub struct BackgroundTaskRunner<R> {
    permits: Arc<Semaphore>,
    outcomes: mpsc::UnboundedSender<TaskOutcome<R>>,
    shutdown: CancellationToken,
}

impl<R: Send + 'static> BackgroundTaskRunner<R> {
    /// Creates a runner allowing at most `workers` tasks in flight, plus
    /// the receiver the UI loop drains.
    pub fn new(workers: usize) -> (Self, TaskResults<R>) {
        let (outcomes, receiver) = mpsc::unbounded_channel();
        let runner = Self {
            permits: Arc::new(Semaphore::new(workers.max(1))),
            outcomes,
            shutdown: CancellationToken::new(),
        };
        (runner, TaskResults { receiver })
    }

    /// Queues `task` for execution. It starts once a worker permit is
    /// free; the returned handle cancels it at any point before or during
    /// execution.
    pub fn submit<F>(&self, label: impl Into<String>, task: F) -> TaskHandle
    where
        F: Future<Output = Result<R, TaskError>> + Send + 'static,
    {
        let label = label.into();
        let handle = TaskHandle {
            label: label.clone(),
            token: self.shutdown.child_token(),
        };

        let permits = Arc::clone(&self.permits);
        let outcomes = self.outcomes.clone();
        let token = handle.token.clone();
        tokio::spawn(async move {
            let _permit = tokio::select! {
                permit = permits.acquire_owned() => match permit {
                    Ok(permit) => permit,
                    // Semaphore closed only at shutdown.
                    Err(_) => return,
                },
                () = token.cancelled() => return,
            };

            let result = tokio::select! {
                result = task => result,
                () = token.cancelled() => return,
            };

            if let Err(error) = &result {
                warn!(label = %label, %error, "background task failed");
            }
            // The UI side dropping its receiver means nobody wants the
            // outcome anymore.
            let _ = outcomes.send(TaskOutcome { label, result });
        });

        handle
    }

    /// Cancels every outstanding task. Used at application exit.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
        self.permits.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::time::sleep;

    #[tokio::test]
    async fn outcomes_carry_labels_and_failure_branch() {
        let (runner, mut results) = BackgroundTaskRunner::new(2);
        runner.submit("grammar-check", async { Ok(42usize) });
        runner.submit("download", async {
            Err(TaskError::failed("connection refused"))
        });

        let mut seen = Vec::new();
        for _ in 0..2 {
            seen.push(results.recv().await.expect("outcome"));
        }
        seen.sort_by(|a, b| a.label.cmp(&b.label));

        assert_eq!(seen[0].label, "download");
        assert!(seen[0].result.is_err());
        assert_eq!(seen[1].label, "grammar-check");
        assert_eq!(*seen[1].result.as_ref().expect("ok"), 42);
    }

    #[tokio::test]
    async fn concurrency_never_exceeds_worker_count() {
        let (runner, mut results) = BackgroundTaskRunner::new(2);
        let active = Arc::new(AtomicUsize::new(0));
        let max_active = Arc::new(AtomicUsize::new(0));

        for i in 0..6 {
            let active = Arc::clone(&active);
            let max_active = Arc::clone(&max_active);
            runner.submit(format!("task-{i}"), async move {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                max_active.fetch_max(now, Ordering::SeqCst);
                sleep(Duration::from_millis(10)).await;
                active.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            });
        }

        for _ in 0..6 {
            results.recv().await.expect("outcome");
        }
        assert!(max_active.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn cancelled_task_produces_no_outcome() {
        let (runner, mut results) = BackgroundTaskRunner::new(1);

        // Occupy the single worker so the second task is still queued when
        // we cancel it.
        let blocker = runner.submit("blocker", async {
            sleep(Duration::from_millis(20)).await;
            Ok(1usize)
        });
        let queued = runner.submit("never-runs", async { Ok(2usize) });
        queued.cancel();
        assert!(queued.is_cancelled());

        let outcome = results.recv().await.expect("blocker outcome");
        assert_eq!(outcome.label, "blocker");
        drop(blocker);

        // Only the blocker ever reports.
        sleep(Duration::from_millis(20)).await;
        assert!(results.try_recv().is_none());
    }

    #[tokio::test]
    async fn shutdown_cancels_everything_outstanding() {
        let (runner, mut results) = BackgroundTaskRunner::<()>::new(1);
        runner.submit("long-haul", async {
            sleep(Duration::from_secs(30)).await;
            Ok(())
        });
        runner.shutdown();

        sleep(Duration::from_millis(20)).await;
        assert!(results.try_recv().is_none());
    }
}
