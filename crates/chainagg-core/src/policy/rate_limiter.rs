//! Fixed-interval rate limiter.
//!
//! Operations are queued FIFO and a background tick releases one every
//! `60s / calls_per_minute`, so at most `calls_per_minute` start within any
//! rolling minute and they are spread evenly instead of bursting. The first
//! release happens one interval after construction.
//!
//! Released operations run as their own tokio tasks: start order follows
//! submission order, completion order does not.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::error::PolicyError;

/// Rate limiter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Maximum operations started per rolling minute.
    #[serde(default = "default_calls_per_minute")]
    pub calls_per_minute: u32,
}

fn default_calls_per_minute() -> u32 { 600 }

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            calls_per_minute: default_calls_per_minute(),
        }
    }
}

type Job = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

#[derive(Default)]
struct JobQueue(Mutex<VecDeque<Job>>);

impl JobQueue {
    fn lock(&self) -> MutexGuard<'_, VecDeque<Job>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Queue-based rate limiter. Must be created inside a tokio runtime; the
/// dispatch task is stopped when the limiter is dropped.
pub struct RateLimiter {
    queue: Arc<JobQueue>,
    interval: Duration,
    dispatcher: JoinHandle<()>,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Result<Self, PolicyError> {
        if config.calls_per_minute == 0 {
            return Err(PolicyError::ZeroRate);
        }
        let interval = Duration::from_secs(60) / config.calls_per_minute;
        let queue = Arc::new(JobQueue::default());

        let mut ticks = time::interval_at(Instant::now() + interval, interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let dispatcher = tokio::spawn(dispatch_loop(queue.clone(), ticks));

        Ok(Self {
            queue,
            interval,
            dispatcher,
        })
    }

    /// Spacing between two consecutive dispatches.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of queued operations not yet dispatched.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Queue `op`. The returned handle resolves with `op`'s own result once
    /// it has been dispatched and completed.
    pub fn call<F, Fut, T, E>(&self, op: F) -> RateLimited<T, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job: Job = Box::new(move || {
            let fut = op();
            Box::pin(async move {
                let _ = tx.send(fut.await);
            })
        });
        self.queue.lock().push_back(job);
        RateLimited {
            rx,
            abandoned: false,
        }
    }

    /// Drop every operation that has not been dispatched yet. Their handles
    /// never resolve.
    pub fn clear(&self) {
        let dropped = {
            let mut queue = self.queue.lock();
            let n = queue.len();
            queue.clear();
            n
        };
        if dropped > 0 {
            tracing::debug!(dropped, "rate limiter queue cleared");
        }
    }
}

impl Drop for RateLimiter {
    fn drop(&mut self) {
        self.dispatcher.abort();
    }
}

async fn dispatch_loop(queue: Arc<JobQueue>, mut ticks: time::Interval) {
    loop {
        ticks.tick().await;
        let next = queue.lock().pop_front();
        if let Some(job) = next {
            tracing::trace!(remaining = queue.lock().len(), "dispatching rate-limited call");
            // A panicking operation only takes its own task down.
            tokio::spawn(async move { job().await });
        }
    }
}

/// Handle for an operation queued on a [`RateLimiter`].
///
/// Resolves to the operation's result, error included, untouched. If the
/// operation is discarded by [`RateLimiter::clear`] (or the limiter is
/// dropped first) the handle stays pending forever.
#[must_use = "a rate-limited call does nothing observable unless awaited"]
pub struct RateLimited<T, E> {
    rx: oneshot::Receiver<Result<T, E>>,
    abandoned: bool,
}

impl<T, E> Future for RateLimited<T, E> {
    type Output = Result<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.abandoned {
            return Poll::Pending;
        }
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(out)) => Poll::Ready(out),
            Poll::Ready(Err(_)) => {
                self.abandoned = true;
                Poll::Pending
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
