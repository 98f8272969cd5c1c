//! Debounced search input
//!
//! Each call to [`Debouncer::on_text_changed`] replaces the single pending
//! trigger: the previous timer task is aborted and a new one is scheduled a
//! quiet period after this call. Only the last value of a burst reaches the
//! sink. Triggers carry a generation stamp; a trigger whose generation is no
//! longer current is stale and may be ignored by the consumer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Quiet period used by the menu search box
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// A fired debounce trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub generation: u64,
    pub text: String,
}

type Sink = Box<dyn Fn(Trigger) + Send + Sync>;

struct Inner {
    quiet_period: Duration,
    generation: AtomicU64,
    pending: Mutex<Option<JoinHandle<()>>>,
    sink: Sink,
    runtime: Handle,
}

/// Single-slot debouncer for text input
#[derive(Clone)]
pub struct Debouncer {
    inner: Arc<Inner>,
}

impl Debouncer {
    /// Create a debouncer on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime; use
    /// [`Debouncer::with_handle`] from synchronous code.
    pub fn new<F>(quiet_period: Duration, sink: F) -> Self
    where
        F: Fn(Trigger) + Send + Sync + 'static,
    {
        Self::with_handle(Handle::current(), quiet_period, sink)
    }

    pub fn with_handle<F>(runtime: Handle, quiet_period: Duration, sink: F) -> Self
    where
        F: Fn(Trigger) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                quiet_period,
                generation: AtomicU64::new(0),
                pending: Mutex::new(None),
                sink: Box::new(sink),
                runtime,
            }),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.inner.quiet_period
    }

    /// Schedule a trigger for `text`, superseding any pending one.
    ///
    /// Returns the generation the trigger will carry.
    pub fn on_text_changed(&self, text: impl Into<String>) -> u64 {
        let text = text.into();
        let mut pending = lock(&self.inner.pending);

        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(task) = pending.take() {
            task.abort();
        }

        let inner = self.inner.clone();
        *pending = Some(self.inner.runtime.spawn(async move {
            tokio::time::sleep(inner.quiet_period).await;
            if inner.generation.load(Ordering::SeqCst) == generation {
                tracing::debug!(generation, %text, "debounced search fired");
                (inner.sink)(Trigger { generation, text });
            }
        }));

        generation
    }

    /// Whether `generation` is still the latest scheduled input
    pub fn is_current(&self, generation: u64) -> bool {
        self.inner.generation.load(Ordering::SeqCst) == generation
    }

    /// True while a trigger is scheduled but has not fired yet
    pub fn is_pending(&self) -> bool {
        lock(&self.inner.pending)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Drop the pending trigger, if any
    pub fn cancel(&self) {
        let mut pending = lock(&self.inner.pending);
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = pending.take() {
            task.abort();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, Instant};

    type Fired = Arc<Mutex<Vec<(Duration, String)>>>;

    fn recording_debouncer(start: Instant) -> (Debouncer, Fired) {
        let fired: Fired = Arc::new(Mutex::new(Vec::new()));
        let sink = fired.clone();
        let debouncer = Debouncer::new(DEFAULT_QUIET_PERIOD, move |trigger| {
            sink.lock().unwrap().push((start.elapsed(), trigger.text));
        });
        (debouncer, fired)
    }

    fn assert_near(actual: Duration, expected_ms: u64) {
        let expected = Duration::from_millis(expected_ms);
        assert!(
            actual >= expected && actual <= expected + Duration::from_millis(5),
            "fired at {:?}, expected ~{:?}",
            actual,
            expected
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_fires_once_with_final_text() {
        let start = Instant::now();
        let (debouncer, fired) = recording_debouncer(start);

        debouncer.on_text_changed("a");
        sleep(Duration::from_millis(100)).await;
        debouncer.on_text_changed("ab");
        sleep(Duration::from_millis(100)).await;
        debouncer.on_text_changed("abc");
        sleep(Duration::from_millis(100)).await;
        debouncer.on_text_changed("abcd");
        sleep(Duration::from_millis(1000)).await;

        let fired = fired.lock().unwrap();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].1, "abcd");
        assert_near(fired[0].0, 800);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_keystroke_fires_after_its_own_quiet_period() {
        let start = Instant::now();
        let (debouncer, fired) = recording_debouncer(start);

        debouncer.on_text_changed("a");
        sleep(Duration::from_millis(100)).await;
        debouncer.on_text_changed("ab");
        sleep(Duration::from_millis(100)).await;
        debouncer.on_text_changed("abc");
        sleep(Duration::from_millis(600)).await;
        debouncer.on_text_changed("abcd");
        sleep(Duration::from_millis(1000)).await;

        let fired = fired.lock().unwrap();
        let abcd: Vec<_> = fired.iter().filter(|(_, text)| text == "abcd").collect();
        assert_eq!(abcd.len(), 1);
        assert_near(abcd[0].0, 1300);
        // "a" and "ab" were superseded inside their quiet period
        assert!(fired.iter().all(|(_, text)| text != "a" && text != "ab"));
        assert_eq!(fired.last().unwrap().1, "abcd");
    }

    #[tokio::test(start_paused = true)]
    async fn test_generation_tracks_latest_call() {
        let (debouncer, _fired) = recording_debouncer(Instant::now());

        let first = debouncer.on_text_changed("pa");
        let second = debouncer.on_text_changed("pas");

        assert!(second > first);
        assert!(!debouncer.is_current(first));
        assert!(debouncer.is_current(second));
        assert!(debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_trigger() {
        let (debouncer, fired) = recording_debouncer(Instant::now());

        debouncer.on_text_changed("pasta");
        debouncer.cancel();
        sleep(Duration::from_millis(1000)).await;

        assert!(fired.lock().unwrap().is_empty());
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_carries_generation() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let debouncer = Debouncer::new(Duration::from_millis(50), move |trigger: Trigger| {
            sink.lock().unwrap().push(trigger);
        });

        let generation = debouncer.on_text_changed("fish");
        sleep(Duration::from_millis(100)).await;

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![Trigger {
                generation,
                text: "fish".to_string()
            }]
        );
        assert!(debouncer.is_current(generation));
    }
}
