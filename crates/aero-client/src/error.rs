//! Error types for the AeroSpace CLI client.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AeroError {
    /// The external command exceeded its time budget. Reported to the
    /// circuit breaker by the client; everything else is not.
    #[error("aerospace command timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The circuit breaker is open; no process was spawned.
    #[error("aerospace circuit breaker open, retry in {}s", retry_after.as_secs())]
    CircuitOpen { retry_after: Duration },

    /// The CLI ran and reported a domain-level failure.
    #[error("aerospace command failed (exit {exit_code}): {stderr}")]
    Command { exit_code: i32, stderr: String },

    /// Rejected before any process was spawned.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The binary could not be found or started.
    #[error("failed to run aerospace: {0}")]
    Spawn(String),

    /// The CLI produced output the client could not interpret.
    #[error("unexpected aerospace output: {0}")]
    Parse(String),
}

impl AeroError {
    pub fn is_circuit_open(&self) -> bool {
        matches!(self, Self::CircuitOpen { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, AeroError>;
