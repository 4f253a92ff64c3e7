/**
 * Keyed Debouncer
 *
 * A cancellable scheduled task per key: scheduling a job for a key that
 * already has one pending aborts the previous task and starts the quiet
 * period over. This is the single timer primitive behind both the
 * persistence flush window (2000 ms per room/session) and the participant
 * search window (400 ms per user).
 *
 * The job itself runs after the quiet period on a spawned task; callers
 * that care about the result keep the returned `JoinHandle` (an aborted
 * handle resolves to a cancelled `JoinError`).
 */
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::{AbortHandle, JoinHandle};

/// Schedule-or-replace debouncer keyed by `K`
#[derive(Debug)]
pub struct Debouncer<K> {
    /// Quiet period before a scheduled job runs
    window: Duration,
    /// Abort handles for pending (not yet fired) jobs
    pending: Mutex<HashMap<K, AbortHandle>>,
}

impl<K> Debouncer<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    /// Create a debouncer with the given quiet period
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Quiet period this debouncer applies
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Schedule `job` to run after the quiet period, replacing any pending
    /// job under the same key
    ///
    /// Returns the handle of the newly scheduled task. The previous task
    /// for `key`, if still pending, is aborted; its holder observes a
    /// cancelled `JoinError`.
    pub fn schedule<F, T>(&self, key: K, job: F) -> JoinHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let window = self.window;
        let mut pending = self.pending.lock().expect("debouncer lock poisoned");
        pending.retain(|_, h| !h.is_finished());
        // Abort before spawning the replacement, so the old job can never
        // fire concurrently with the new schedule.
        if let Some(previous) = pending.remove(&key) {
            previous.abort();
        }
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            job.await
        });
        pending.insert(key, handle.abort_handle());
        handle
    }

    /// Cancel the pending job for `key`, if any
    ///
    /// Returns true when a pending job was aborted.
    pub fn cancel(&self, key: &K) -> bool {
        let mut pending = self.pending.lock().expect("debouncer lock poisoned");
        match pending.remove(key) {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_job_runs_after_quiet_period() {
        let debouncer = Debouncer::new(Duration::from_millis(2000));
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        let handle = debouncer.schedule("room-a", async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        handle.await.unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_cancels_pending_job() {
        let debouncer = Debouncer::new(Duration::from_millis(2000));
        let fired = Arc::new(AtomicUsize::new(0));

        let first_counter = fired.clone();
        let first = debouncer.schedule("room-a", async move {
            first_counter.fetch_add(1, Ordering::SeqCst);
            "first"
        });

        // Part of the way through the window a new job arrives for the
        // same key; the first must never fire.
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let second_counter = fired.clone();
        let second = debouncer.schedule("room-a", async move {
            second_counter.fetch_add(1, Ordering::SeqCst);
            "second"
        });

        let first_err = first.await.unwrap_err();
        assert!(first_err.is_cancelled());
        assert_eq!(second.await.unwrap(), "second");
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_independent_keys_do_not_interfere() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let fired = Arc::new(AtomicUsize::new(0));

        let a_counter = fired.clone();
        let a = debouncer.schedule("a", async move {
            a_counter.fetch_add(1, Ordering::SeqCst);
        });
        let b_counter = fired.clone();
        let b = debouncer.schedule("b", async move {
            b_counter.fetch_add(1, Ordering::SeqCst);
        });

        a.await.unwrap();
        b.await.unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_pending_job() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let handle = debouncer.schedule("a", async { 42 });

        assert!(debouncer.cancel(&"a"));
        assert!(handle.await.unwrap_err().is_cancelled());
        assert!(!debouncer.cancel(&"a"));
    }
}
