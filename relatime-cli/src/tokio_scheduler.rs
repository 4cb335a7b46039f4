// Scheduler implementation backed by tokio timer tasks

use std::collections::HashMap;
use std::time::Duration;

use relatime_core::{Scheduler, TimerId};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// A timer expiry. The REPL loop answers each one with a refresh pass.
#[derive(Debug, Clone, Copy)]
pub struct Tick;

/// Runs engine timers as tokio tasks that send [`Tick`]s back to the REPL
/// loop. The engine stays single-threaded; only these notifications cross
/// task boundaries.
pub struct TokioScheduler {
    ticks: UnboundedSender<Tick>,
    tasks: HashMap<TimerId, JoinHandle<()>>,
    next_id: TimerId,
}

impl TokioScheduler {
    pub fn new(ticks: UnboundedSender<Tick>) -> Self {
        TokioScheduler {
            ticks,
            tasks: HashMap::new(),
            next_id: 0,
        }
    }

    fn allocate_id(&mut self) -> TimerId {
        self.next_id += 1;
        self.next_id
    }

    /// Completed one-shots leave finished handles in the map; drop them
    /// before installing more.
    fn prune_finished(&mut self) {
        self.tasks.retain(|_, handle| !handle.is_finished());
    }
}

impl Scheduler for TokioScheduler {
    fn install(&mut self, every: Duration) -> TimerId {
        self.prune_finished();
        let id = self.allocate_id();
        let ticks = self.ticks.clone();
        // tokio::time::interval panics on a zero period
        let every = every.max(Duration::from_millis(1));
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            // The first tick of an interval completes immediately; the
            // engine already handles the initial render, so skip it.
            interval.tick().await;
            loop {
                interval.tick().await;
                if ticks.send(Tick).is_err() {
                    break;
                }
            }
        });
        self.tasks.insert(id, handle);
        id
    }

    fn install_once(&mut self, after: Duration) -> TimerId {
        self.prune_finished();
        let id = self.allocate_id();
        let ticks = self.ticks.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = ticks.send(Tick);
        });
        self.tasks.insert(id, handle);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(handle) = self.tasks.remove(&id) {
            handle.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_finished_one_shots_are_pruned() {
        let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
        let mut scheduler = TokioScheduler::new(tick_tx);

        scheduler.install_once(Duration::from_millis(1));
        assert!(tick_rx.recv().await.is_some(), "Expected the one-shot to fire");

        // Let the runtime retire the completed task.
        while scheduler.tasks.values().any(|handle| !handle.is_finished()) {
            tokio::task::yield_now().await;
        }

        let id = scheduler.install_once(Duration::from_secs(3600));
        assert_eq!(scheduler.tasks.len(), 1, "Expected the finished handle to be dropped");
        assert!(scheduler.tasks.contains_key(&id));
        scheduler.cancel(id);
    }

    #[tokio::test]
    async fn test_cancel_removes_the_task() {
        let (tick_tx, _tick_rx) = mpsc::unbounded_channel();
        let mut scheduler = TokioScheduler::new(tick_tx);

        let id = scheduler.install(Duration::from_secs(3600));
        assert_eq!(scheduler.tasks.len(), 1);

        scheduler.cancel(id);
        assert!(scheduler.tasks.is_empty());
    }
}
