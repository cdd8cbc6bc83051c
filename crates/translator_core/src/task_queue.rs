//! Bounded background task queue (A6, §9 redesign note): the source's
//! unawaited `spawn`-and-forget analytics/durable-cache writes become an
//! explicit bounded channel with a single worker here, so a burst of
//! requests can't fan out an unbounded number of tasks. When the channel
//! is full the oldest-style overflow is simply the newest job being
//! dropped, with a single warning logged — callers on the request path
//! never block on queue capacity.

use std::future::Future;
use std::pin::Pin;
use tokio::sync::mpsc;

type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

const QUEUE_CAPACITY: usize = 256;

/// A handle to the background worker. Cheap to clone; dropping every
/// clone closes the channel and lets the worker task exit.
#[derive(Clone)]
pub struct TaskQueue {
    sender: mpsc::Sender<Job>,
}

impl TaskQueue {
    /// Spawn the worker and return a handle to submit jobs to it.
    pub fn spawn() -> Self {
        let (sender, mut receiver) = mpsc::channel::<Job>(QUEUE_CAPACITY);

        tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                job.await;
            }
        });

        Self { sender }
    }

    /// Submit a fire-and-forget job. If the queue is at capacity the job
    /// is dropped and a warning is logged rather than blocking the
    /// caller or growing the queue without bound.
    pub fn submit<F>(&self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.sender.try_send(Box::pin(job)).is_err() {
            tracing::warn!("background task queue full, dropping job");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn submitted_jobs_eventually_run() {
        let queue = TaskQueue::spawn();
        let counter = Arc::new(AtomicUsize::new(0));

        let c = counter.clone();
        queue.submit(async move {
            c.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn many_jobs_all_run_within_capacity() {
        let queue = TaskQueue::spawn();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..50 {
            let c = counter.clone();
            queue.submit(async move {
                c.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 50);
    }
}
