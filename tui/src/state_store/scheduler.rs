use std::time::Duration;

use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::AbortHandle,
};

/// Identifies one scheduled task, firings carrying an outdated id are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Return to the init screen some time after the partner has left
    ResetAfterPartnerLeft,
}

/// A task whose delay has elapsed, delivered back to the state store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTask {
    pub id: TaskId,
    pub kind: TaskKind,
}

/// Handle to a scheduled task that has not fired yet.
#[derive(Debug)]
pub struct TaskHandle {
    id: TaskId,
    abort_handle: Option<AbortHandle>,
}

impl TaskHandle {
    pub fn new(id: TaskId, abort_handle: Option<AbortHandle>) -> Self {
        Self { id, abort_handle }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Stops the task from firing. A firing that is already queued is not recalled,
    /// the receiver has to compare ids.
    pub fn cancel(self) {
        if let Some(abort_handle) = self.abort_handle {
            abort_handle.abort();
        }
    }
}

/// One-shot timers used by the controller.
pub trait Scheduler {
    /// Delivers `kind` back once `delay` has elapsed.
    fn schedule(&mut self, delay: Duration, kind: TaskKind) -> TaskHandle;
}

/// [Scheduler] backed by tokio timers; fired tasks are sent over a channel.
pub struct TokioScheduler {
    next_id: u64,
    task_tx: UnboundedSender<ScheduledTask>,
}

impl TokioScheduler {
    pub fn new() -> (Self, UnboundedReceiver<ScheduledTask>) {
        let (task_tx, task_rx) = mpsc::unbounded_channel();

        (
            TokioScheduler {
                next_id: 0,
                task_tx,
            },
            task_rx,
        )
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration, kind: TaskKind) -> TaskHandle {
        let id = TaskId(self.next_id);
        self.next_id += 1;

        let task_tx = self.task_tx.clone();
        let join_handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = task_tx.send(ScheduledTask { id, kind });
        });

        TaskHandle::new(id, Some(join_handle.abort_handle()))
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;

    /// Records every scheduled task instead of running a timer.
    #[derive(Debug, Default)]
    pub struct ManualScheduler {
        next_id: u64,
        pub scheduled: Vec<(Duration, ScheduledTask)>,
    }

    impl ManualScheduler {
        /// The most recently scheduled task, as if its delay had elapsed.
        pub fn last_fired(&self) -> Option<ScheduledTask> {
            self.scheduled.last().map(|(_, task)| *task)
        }
    }

    impl Scheduler for ManualScheduler {
        fn schedule(&mut self, delay: Duration, kind: TaskKind) -> TaskHandle {
            let id = TaskId(self.next_id);
            self.next_id += 1;
            self.scheduled.push((delay, ScheduledTask { id, kind }));

            TaskHandle::new(id, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let (mut scheduler, mut task_rx) = TokioScheduler::new();

        let handle = scheduler.schedule(Duration::from_secs(5), TaskKind::ResetAfterPartnerLeft);

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert!(task_rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(
            task_rx.try_recv().unwrap(),
            ScheduledTask {
                id: handle.id(),
                kind: TaskKind::ResetAfterPartnerLeft,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_task_never_fires() {
        let (mut scheduler, mut task_rx) = TokioScheduler::new();

        let cancelled = scheduler.schedule(Duration::from_secs(5), TaskKind::ResetAfterPartnerLeft);
        let kept = scheduler.schedule(Duration::from_secs(6), TaskKind::ResetAfterPartnerLeft);
        assert_ne!(cancelled.id(), kept.id());
        cancelled.cancel();

        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(task_rx.try_recv().unwrap().id, kept.id());
        assert!(task_rx.try_recv().is_err());
    }
}
