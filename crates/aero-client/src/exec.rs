//! External-process execution behind a narrow capability trait so tests can
//! substitute a scripted runner for the real CLI.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;

use crate::error::{AeroError, Result};

/// One invocation of an external binary.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }
}

/// Captured result of a completed invocation. A non-zero exit code is not an
/// error at this layer; callers decide what it means.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion within the spec's timeout. `Err` is reserved for the
    /// process failing to run at all (spawn failure) or running too long
    /// (timeout); an unhappy exit code still yields `Ok`.
    async fn run(&self, spec: CommandSpec) -> Result<CommandOutput>;
}

/// Production runner backed by `tokio::process`.
#[derive(Debug, Default, Clone)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, spec: CommandSpec) -> Result<CommandOutput> {
        let mut command = Command::new(&spec.program);
        command.args(&spec.args);
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());
        // A timed-out CLI call must not leave a child behind.
        command.kill_on_drop(true);

        let started_at = Instant::now();
        let output = timeout(spec.timeout, command.output())
            .await
            .map_err(|_| AeroError::Timeout {
                secs: spec.timeout.as_secs(),
            })?
            .map_err(|err| AeroError::Spawn(format!("{}: {err}", spec.program.display())))?;

        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration_ms: started_at.elapsed().as_millis() as u64,
        })
    }
}
