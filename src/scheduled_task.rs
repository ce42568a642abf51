use std::future::Future;
use std::sync::Arc;

use tokio::{
    sync::Notify,
    task::JoinHandle,
    time::{self, Duration, MissedTickBehavior},
};

/// A task that repeats on a fixed cadence.
/// It runs once immediately, then once per period, until cancelled.
/// A run can also be triggered early without waiting for the next tick.
pub struct PeriodicTask {
    handle: JoinHandle<()>,
    trigger: Arc<Notify>,
}

impl PeriodicTask {
    /// Spawn the given task body, firing it immediately and then every `period`.
    pub fn spawn<F, Fut>(period: Duration, mut body: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        // Create the early-trigger signal.
        let trigger = Arc::new(Notify::new());

        let task_trigger = trigger.clone();
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    _ = task_trigger.notified() => {}
                }
                body().await;
            }
        });

        Self { handle, trigger }
    }

    /// Run the task body now instead of waiting for the next tick.
    pub fn trigger_now(&self) {
        self.trigger.notify_one();
    }

    /// Stop the task. Returns true iff it was still running when cancelled.
    pub async fn cancel(self) -> bool {
        self.handle.abort();
        self.handle.await.is_err()
    }
}
