//! Two-state circuit breaker guarding the external CLI.
//!
//! A timeout opens the breaker for a cooldown period; while open, callers
//! fail fast without spawning a process. Expiry is evaluated lazily on
//! `should_allow`, there is no background timer. A repeat timeout while open
//! extends the cooldown from now rather than stacking onto the old expiry.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

/// Injectable time source so breaker expiry is deterministic in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, Copy)]
enum BreakerState {
    Closed,
    Open { expires_at: Instant },
}

pub struct CircuitBreaker {
    cooldown: Duration,
    clock: Box<dyn Clock>,
    state: Mutex<BreakerState>,
}

impl CircuitBreaker {
    pub fn new(cooldown: Duration) -> Self {
        Self::with_clock(cooldown, SystemClock)
    }

    pub fn with_clock(cooldown: Duration, clock: impl Clock + 'static) -> Self {
        Self {
            cooldown,
            clock: Box::new(clock),
            state: Mutex::new(BreakerState::Closed),
        }
    }

    /// True when a call may proceed. An open breaker whose cooldown has
    /// elapsed closes here, as a side effect of the check.
    pub fn should_allow(&self) -> bool {
        let mut state = self.lock_state();
        match *state {
            BreakerState::Closed => true,
            BreakerState::Open { expires_at } => {
                if self.clock.now() >= expires_at {
                    debug!("circuit breaker cooldown elapsed, closing");
                    *state = BreakerState::Closed;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Open (or re-open) the breaker for a full cooldown starting now.
    pub fn record_timeout(&self) {
        let expires_at = self.clock.now() + self.cooldown;
        *self.lock_state() = BreakerState::Open { expires_at };
        warn!(
            cooldown_secs = self.cooldown.as_secs(),
            "circuit breaker opened after timeout"
        );
    }

    pub fn record_success(&self) {
        *self.lock_state() = BreakerState::Closed;
    }

    pub fn reset(&self) {
        *self.lock_state() = BreakerState::Closed;
    }

    /// Remaining cooldown, or `None` when the breaker is closed or expired.
    pub fn remaining_cooldown(&self) -> Option<Duration> {
        match *self.lock_state() {
            BreakerState::Closed => None,
            BreakerState::Open { expires_at } => {
                let remaining = expires_at.saturating_duration_since(self.clock.now());
                (remaining > Duration::ZERO).then_some(remaining)
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, BreakerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
