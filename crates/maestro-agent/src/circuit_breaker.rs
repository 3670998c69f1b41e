//! Circuit breaker guarding the generation service
//!
//! After `threshold` consecutive hard failures the breaker opens and
//! rejects calls until the cool-down has passed; then one probe is
//! let through. A success closes it again.

use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    /// Rejecting calls until the cool-down passes
    Open,
    /// Cool-down passed, next call is a probe
    HalfOpen,
}

#[derive(Debug, Default)]
struct Tally {
    consecutive_failures: u32,
    last_failure: Option<Instant>,
}

/// Breaker owned by a single client
///
/// ```
/// use maestro_agent::{CircuitBreaker, CircuitState};
///
/// let breaker = CircuitBreaker::new(2, 60);
/// breaker.record_failure();
/// breaker.record_failure();
/// assert_eq!(breaker.state(), CircuitState::Open);
/// assert!(!breaker.can_execute());
/// ```
#[derive(Debug)]
pub struct CircuitBreaker {
    tally: Mutex<Tally>,
    threshold: u32,
    cool_down: Duration,
}

impl CircuitBreaker {
    pub fn new(threshold: u32, cool_down_secs: u64) -> Self {
        Self::with_cool_down(threshold, Duration::from_secs(cool_down_secs))
    }

    pub fn with_cool_down(threshold: u32, cool_down: Duration) -> Self {
        Self {
            tally: Mutex::new(Tally::default()),
            threshold: threshold.max(1),
            cool_down,
        }
    }

    /// Run `f` over the tally, recovering it if a holder panicked
    fn with_tally<T>(&self, f: impl FnOnce(&mut Tally) -> T) -> T {
        let mut guard = match self.tally.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    /// Remaining cool-down, `None` while closed
    fn remaining(&self) -> Option<Duration> {
        self.with_tally(|t| {
            if t.consecutive_failures < self.threshold {
                return None;
            }
            let since = t.last_failure.map(|at| at.elapsed()).unwrap_or_default();
            Some(self.cool_down.saturating_sub(since))
        })
    }

    pub fn state(&self) -> CircuitState {
        match self.remaining() {
            None => CircuitState::Closed,
            Some(left) if left.is_zero() => CircuitState::HalfOpen,
            Some(_) => CircuitState::Open,
        }
    }

    pub fn record_success(&self) {
        self.with_tally(|t| *t = Tally::default());
    }

    pub fn record_failure(&self) {
        self.with_tally(|t| {
            t.consecutive_failures = t.consecutive_failures.saturating_add(1);
            t.last_failure = Some(Instant::now());
        });
    }

    pub fn can_execute(&self) -> bool {
        self.state() != CircuitState::Open
    }

    pub fn failure_count(&self) -> u32 {
        self.with_tally(|t| t.consecutive_failures)
    }

    /// Zero unless the breaker is open
    pub fn time_until_retry(&self) -> Duration {
        self.remaining().unwrap_or(Duration::ZERO)
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(3, 60)
    }
}
