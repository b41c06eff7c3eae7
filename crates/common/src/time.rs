//! Time abstraction for the retry loop
//!
//! The executor never calls `tokio::time::sleep` or `Instant::now`
//! directly; it goes through a [`Clock`]. Production code uses
//! [`SystemClock`]; tests use [`MockClock`], whose `sleep` advances virtual
//! time and returns immediately, so a sweep that would wait minutes in real
//! time finishes instantly with exact, repeatable durations.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use retrylab_common::time::{Clock, MockClock};
//!
//! # tokio_test::block_on(async {
//! let clock = MockClock::new();
//! let start = clock.now();
//! clock.sleep(Duration::from_secs(5)).await;
//! assert_eq!(clock.now().duration_since(start), Duration::from_secs(5));
//! assert_eq!(clock.sleeps(), vec![Duration::from_secs(5)]);
//! # });
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant, SystemTime};

use async_trait::async_trait;

/// Source of time and of the wait between retry attempts
#[async_trait]
pub trait Clock: Send + Sync {
    /// Get current instant (monotonic time)
    fn now(&self) -> Instant;

    /// Get current system time (wall clock)
    fn system_time(&self) -> SystemTime;

    /// Wait for `duration` to pass
    ///
    /// There is no early-wake path: once started, the wait completes.
    async fn sleep(&self, duration: Duration);
}

/// Real system clock backed by tokio's timer
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Default)]
struct MockClockState {
    elapsed: Duration,
    sleeps: Vec<Duration>,
}

/// Virtual clock for deterministic tests
///
/// Clones share the same virtual timeline.
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    base_system_time: SystemTime,
    state: Arc<Mutex<MockClockState>>,
}

impl MockClock {
    /// Create a new mock clock anchored at the current real time
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            base_system_time: SystemTime::now(),
            state: Arc::new(Mutex::new(MockClockState::default())),
        }
    }

    /// Virtual time elapsed since the clock was created
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.with_state(|state| state.elapsed)
    }

    /// Every duration passed to [`Clock::sleep`], in call order
    #[must_use]
    pub fn sleeps(&self) -> Vec<Duration> {
        self.with_state(|state| state.sleeps.clone())
    }

    /// Total virtual time spent sleeping
    #[must_use]
    pub fn total_slept(&self) -> Duration {
        self.with_state(|state| state.sleeps.iter().sum())
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut MockClockState) -> R) -> R {
        // A panic while holding this lock cannot leave the state half-updated.
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed()
    }

    fn system_time(&self) -> SystemTime {
        self.base_system_time + self.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        self.with_state(|state| {
            state.elapsed += duration;
            state.sleeps.push(duration);
        });
    }
}
