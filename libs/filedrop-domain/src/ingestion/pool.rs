//! Bounded executor for detached processing runs

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, Semaphore};
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

/// Default cap on concurrently executing runs
pub const DEFAULT_MAX_CONCURRENT_TASKS: usize = 32;

/// Runs detached tasks with a concurrency cap
///
/// [`spawn`](Self::spawn) never blocks: the task is started immediately and
/// waits for a permit before doing any work, so at most `max_concurrent`
/// tasks make progress at once while the rest queue on the semaphore.
/// Every spawned task is tracked, which lets callers wait for all of them
/// with [`drain`](Self::drain).
#[derive(Debug, Clone)]
pub struct ProcessingPool {
    permits: Arc<Semaphore>,
    tracker: TaskTracker,
    draining: Arc<Mutex<()>>,
    max_concurrent: usize,
}

impl ProcessingPool {
    /// Create a pool allowing `max_concurrent` tasks at once (minimum 1)
    pub fn new(max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent)),
            tracker: TaskTracker::new(),
            draining: Arc::new(Mutex::new(())),
            max_concurrent,
        }
    }

    /// Start `task` in the background
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let permits = Arc::clone(&self.permits);
        self.tracker.spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                warn!("Processing pool closed, dropping task");
                return;
            };
            task.await;
        });
    }

    /// Tasks spawned and not yet finished, queued ones included
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Wait until every task spawned so far has finished
    ///
    /// Tasks spawned while draining are waited for as well. The pool accepts
    /// new work again once this returns. Concurrent drains run one after the
    /// other, so one caller reopening the tracker cannot stall another.
    pub async fn drain(&self) {
        let _guard = self.draining.lock().await;
        debug!(in_flight = self.in_flight(), "Draining processing pool");
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}

impl Default for ProcessingPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT_TASKS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_drain_waits_for_all_tasks() {
        let pool = ProcessingPool::new(4);
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..10 {
            let done = Arc::clone(&done);
            pool.spawn(async move {
                tokio::task::yield_now().await;
                done.fetch_add(1, Ordering::SeqCst);
            });
        }

        pool.drain().await;

        assert_eq!(done.load(Ordering::SeqCst), 10);
        assert_eq!(pool.in_flight(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_drains_both_return() {
        let pool = ProcessingPool::new(2);
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..6 {
            let done = Arc::clone(&done);
            pool.spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                done.fetch_add(1, Ordering::SeqCst);
            });
        }

        let first = pool.clone();
        let second = pool.clone();
        let drains = async {
            tokio::join!(first.drain(), second.drain());
        };
        tokio::time::timeout(Duration::from_secs(5), drains)
            .await
            .unwrap();

        assert_eq!(done.load(Ordering::SeqCst), 6);
        assert_eq!(pool.in_flight(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_is_capped() {
        let pool = ProcessingPool::new(2);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        for _ in 0..8 {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            pool.spawn(async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                running.fetch_sub(1, Ordering::SeqCst);
            });
        }

        pool.drain().await;

        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_pool_accepts_work_after_drain() {
        let pool = ProcessingPool::new(1);
        let done = Arc::new(AtomicUsize::new(0));

        pool.drain().await;

        let counter = Arc::clone(&done);
        pool.spawn(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        pool.drain().await;

        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        assert_eq!(ProcessingPool::new(0).max_concurrent(), 1);
    }
}
