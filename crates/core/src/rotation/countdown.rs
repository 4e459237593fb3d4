use std::time::Duration;

/// Wait before the next auto-rotated render.
///
/// Purely arithmetic: callers feed elapsed time from their own clock, so the
/// countdown can be driven by a tokio interval or checked in tests directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    total: Duration,
}

impl Countdown {
    pub const fn new(total: Duration) -> Self {
        Self { total }
    }

    pub const fn total(&self) -> Duration {
        self.total
    }

    pub fn remaining(&self, elapsed: Duration) -> Duration {
        self.total.saturating_sub(elapsed)
    }

    pub fn is_elapsed(&self, elapsed: Duration) -> bool {
        elapsed >= self.total
    }

    /// Whole seconds left, rounded up so the display never shows 0 early.
    pub fn seconds_remaining(&self, elapsed: Duration) -> u64 {
        let remaining = self.remaining(elapsed);
        let whole = remaining.as_secs();
        if remaining.subsec_nanos() > 0 {
            whole + 1
        } else {
            whole
        }
    }

    /// Fraction of the wait already elapsed, in `[0, 1]`.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.total.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.total.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn status_line(&self, elapsed: Duration) -> String {
        format!("Próximo relatório em {} segundos...", self.seconds_remaining(elapsed))
    }
}
