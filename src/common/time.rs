use std::time::{Duration, Instant};

/// How long a single poll call may block.
///
/// `Infinite` maps to the `-1` millisecond sentinel of the poll contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollTimeout {
    Infinite,
    After(Duration),
}

impl PollTimeout {
    /// Negative values mean "block indefinitely".
    pub fn from_millis(timeout_ms: i32) -> Self {
        if timeout_ms < 0 {
            PollTimeout::Infinite
        } else {
            PollTimeout::After(Duration::from_millis(timeout_ms as u64))
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, PollTimeout::Infinite)
    }

    /// Milliseconds for the platform wait primitive, rounded up so a
    /// sub-millisecond remainder never turns into a busy non-blocking wait.
    pub fn as_millis(&self) -> i32 {
        match self {
            PollTimeout::Infinite => -1,
            PollTimeout::After(remaining) => {
                let mut millis = remaining.as_millis();
                if remaining.subsec_nanos() % 1_000_000 != 0 {
                    millis += 1;
                }
                millis.min(i32::MAX as u128) as i32
            }
        }
    }

    /// Charges the time spent since `started` against the budget.
    ///
    /// Returns `false` once a finite budget is exhausted.
    pub fn consume_since(&mut self, started: Instant) -> bool {
        match self {
            PollTimeout::Infinite => true,
            PollTimeout::After(remaining) => {
                *remaining = remaining.saturating_sub(started.elapsed());
                !remaining.is_zero()
            }
        }
    }

    pub fn remaining(&self) -> Option<Duration> {
        match self {
            PollTimeout::Infinite => None,
            PollTimeout::After(remaining) => Some(*remaining),
        }
    }
}

impl From<Option<Duration>> for PollTimeout {
    fn from(timeout: Option<Duration>) -> Self {
        match timeout {
            Some(duration) => PollTimeout::After(duration),
            None => PollTimeout::Infinite,
        }
    }
}
