use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 120;

/// Fraction of a delay added on top when jitter is enabled.
const JITTER_FRACTION: f64 = 0.1;

/// Capped exponential growth of the poll interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    pub multiplier: f64,
    pub max_interval: Duration,
    pub jitter: bool,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            multiplier: 1.5,
            max_interval: Duration::from_secs(10),
            jitter: true,
        }
    }
}

/// How often and how long to poll for a job's status.
///
/// The default is fixed-interval polling: 120 checks, one second apart.
/// Attempts are counted, not wall-clock time, so the real elapsed time also
/// includes every request's latency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollPolicy {
    interval: Duration,
    max_attempts: u32,
    backoff: Option<Backoff>,
}

impl PollPolicy {
    /// A policy always allows at least one status check; `max_attempts = 0`
    /// is raised to 1.
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
            backoff: None,
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = Some(backoff);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> Option<&Backoff> {
        self.backoff.as_ref()
    }

    /// Wait before status check number `attempt` (1-based).
    ///
    /// `jitter_sample` is a value in `[0, 1)`; it is ignored unless the backoff
    /// has jitter enabled. Jitter only lengthens a delay and never pushes it
    /// past `max_interval`, so a wait stays between the base interval and the
    /// cap.
    pub fn delay_for(&self, attempt: u32, jitter_sample: f64) -> Duration {
        let Some(backoff) = self.backoff else {
            return self.interval;
        };

        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let grown = self.interval.as_secs_f64() * backoff.multiplier.max(1.0).powi(exponent);
        let cap = backoff.max_interval.max(self.interval).as_secs_f64();
        let mut secs = grown.min(cap);

        if backoff.jitter {
            secs += secs * JITTER_FRACTION * jitter_sample.clamp(0.0, 1.0);
        }

        Duration::from_secs_f64(secs.min(cap))
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_ATTEMPTS)
    }
}
