//! Client for the AeroSpace tiling-window-manager CLI.
//!
//! The crate knows nothing about projects; it provides the resilient command
//! gateway the rest of the system builds on: typed verbs over the external
//! binary, a circuit breaker that fails fast after timeouts, version-skew
//! fallbacks for verbs that changed shape across CLI releases, and binary
//! discovery.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod breaker;
pub mod client;
pub mod discovery;
pub mod error;
pub mod exec;
pub mod types;

pub use breaker::{CircuitBreaker, Clock, SystemClock};
pub use client::{AeroClient, WindowScope, is_compat_mismatch};
pub use discovery::{AEROSPACE_BIN_ENV, find_aerospace_executable};
pub use error::{AeroError, Result};
pub use exec::{CommandOutput, CommandRunner, CommandSpec, ProcessRunner};
pub use types::{WINDOW_FORMAT, WORKSPACE_FORMAT, WmWindow};
