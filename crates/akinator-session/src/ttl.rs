//! Clock abstraction and expiry policy.

use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// Source of wall-clock time, in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync + Debug {
    /// Current time in epoch milliseconds.
    fn now_millis(&self) -> i64;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Manually driven clock for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    /// Create a clock frozen at `start_millis`.
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    /// Move the clock forward, saturating at `i64::MAX`.
    pub fn advance(&self, by: Duration) {
        let by = duration_millis(by);
        let _ = self
            .now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| {
                Some(now.saturating_add(by))
            });
    }

    /// Jump to an absolute time.
    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Computes expiry timestamps and decides liveness against a clock.
#[derive(Debug, Clone)]
pub struct ExpiryPolicy {
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ExpiryPolicy {
    /// Create a policy with the given TTL, using the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a policy with an explicit clock.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { ttl, clock }
    }

    /// Current time according to the policy's clock.
    pub fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Expiry for an entry written now.
    pub fn expiry_from_now(&self) -> i64 {
        self.now().saturating_add(duration_millis(self.ttl))
    }

    /// Get the configured TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

fn duration_millis(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(1_000);
        clock.advance(Duration::from_millis(250));
        assert_eq!(clock.now_millis(), 1_250);

        clock.set(10);
        assert_eq!(clock.now_millis(), 10);
    }

    #[test]
    fn test_manual_clock_saturates() {
        let clock = ManualClock::new(i64::MAX - 10);
        clock.advance(Duration::from_secs(1));
        assert_eq!(clock.now_millis(), i64::MAX);

        clock.advance(Duration::MAX);
        assert_eq!(clock.now_millis(), i64::MAX);
    }

    #[test]
    fn test_expiry_is_write_time_plus_ttl() {
        let clock = Arc::new(ManualClock::new(5_000));
        let policy = ExpiryPolicy::with_clock(Duration::from_secs(600), clock.clone());
        assert_eq!(policy.expiry_from_now(), 5_000 + 600_000);

        clock.advance(Duration::from_secs(1));
        assert_eq!(policy.expiry_from_now(), 6_000 + 600_000);
    }

    #[test]
    fn test_system_clock_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }
}
