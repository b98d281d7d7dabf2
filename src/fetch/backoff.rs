// src/fetch/backoff.rs
// =============================================================================
// Rate-limit backoff policy and the injectable sleep used by the whole crawl.
//
// Policy on HTTP 429:
//   wait `initial`, retry; each further 429 waits the previous wait plus
//   `step` plus a uniform jitter in [-jitter, +jitter).
//
// There is NO retry cap. A host that keeps answering 429 keeps the crawl
// waiting forever, with ever longer pauses. That is the intended policy for
// a one-shot collection run; wrap the process in a timeout if that matters.
//
// Every sleep in the crate goes through a `Delay`, so tests can record the
// requested pauses instead of actually waiting.
// =============================================================================

use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use std::time::Duration;

/// Async sleep function. The default is `tokio::time::sleep`.
pub type Delay = Arc<dyn Fn(Duration) -> BoxFuture<'static, ()> + Send + Sync>;

/// Sleeps on the tokio timer.
pub fn tokio_delay() -> Delay {
    Arc::new(|duration| tokio::time::sleep(duration).boxed())
}

/// Returns immediately and remembers every requested pause.
#[cfg(test)]
pub fn recording_delay() -> (Delay, Arc<std::sync::Mutex<Vec<Duration>>>) {
    let log = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let delay: Delay = Arc::new(move |duration| {
        if let Ok(mut pauses) = sink.lock() {
            pauses.push(duration);
        }
        futures::future::ready(()).boxed()
    });
    (delay, log)
}

/// Growing, jittered wait between retries of a rate-limited request.
#[derive(Debug, Clone, PartialEq)]
pub struct Backoff {
    /// Wait before the first retry
    pub initial: Duration,
    /// Added to the wait after every retry
    pub step: Duration,
    /// Half-width of the uniform jitter added with each step
    pub jitter: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(120),
            step: Duration::from_secs(60),
            jitter: Duration::from_millis(7_500),
        }
    }
}

impl Backoff {
    /// Backoff starting at `initial`, with the default step and jitter.
    pub fn starting_at(initial: Duration) -> Self {
        Self {
            initial,
            ..Self::default()
        }
    }

    /// The wait that follows `current`.
    ///
    /// `unit` is a sample from [0, 1); 0.5 means "no jitter". Kept as a
    /// parameter so the arithmetic is testable without an RNG.
    pub fn next_wait(&self, current: Duration, unit: f64) -> Duration {
        let offset = (unit - 0.5) * 2.0 * self.jitter.as_secs_f64();
        let next = current.as_secs_f64() + self.step.as_secs_f64() + offset;
        Duration::from_secs_f64(next.max(0.0))
    }
}
