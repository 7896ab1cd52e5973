//! Command gateway over the AeroSpace CLI.
//!
//! One method per verb. Every call is gated by the circuit breaker (an open
//! breaker means no process is spawned at all), runs under the configured
//! timeout, and reports timeouts back to the breaker; nothing else trips it.
//! Verbs whose surface changed across CLI versions retry once with the older
//! form when stderr says the newer one is unknown.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::breaker::CircuitBreaker;
use crate::error::{AeroError, Result};
use crate::exec::{CommandOutput, CommandRunner, CommandSpec, ProcessRunner};
use crate::types::{
    WINDOW_FORMAT, WORKSPACE_FORMAT, WmWindow, parse_window_lines, parse_workspace_lines,
};

/// Which windows `list_windows` should return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowScope {
    All,
    Workspace(String),
    App(String),
}

/// Stderr signatures that mean the CLI predates a verb or flag, as opposed
/// to an operational failure. Only these trigger the fallback form.
const COMPAT_MISMATCH_MARKERS: &[&str] = &[
    "unknown command",
    "unknown option",
    "unknown flag",
    "unrecognized",
    "unexpected argument",
];

pub fn is_compat_mismatch(stderr: &str) -> bool {
    let lowered = stderr.to_lowercase();
    COMPAT_MISMATCH_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

pub struct AeroClient {
    runner: Arc<dyn CommandRunner>,
    breaker: Arc<CircuitBreaker>,
    bin: PathBuf,
    command_timeout: Duration,
}

impl AeroClient {
    pub fn new(bin: PathBuf, command_timeout: Duration, breaker_cooldown: Duration) -> Self {
        Self::with_runner(
            Arc::new(ProcessRunner),
            bin,
            command_timeout,
            Arc::new(CircuitBreaker::new(breaker_cooldown)),
        )
    }

    /// Full dependency injection: tests supply a scripted runner and a
    /// breaker they can inspect.
    pub fn with_runner(
        runner: Arc<dyn CommandRunner>,
        bin: PathBuf,
        command_timeout: Duration,
        breaker: Arc<CircuitBreaker>,
    ) -> Self {
        Self {
            runner,
            breaker,
            bin,
            command_timeout,
        }
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub async fn list_workspaces(&self) -> Result<Vec<String>> {
        let output = self
            .run(vec![
                "list-workspaces".to_string(),
                "--all".to_string(),
                "--format".to_string(),
                WORKSPACE_FORMAT.to_string(),
            ])
            .await?;
        ensure_success(&output)?;
        Ok(parse_workspace_lines(&output.stdout))
    }

    pub async fn focused_workspace(&self) -> Result<Option<String>> {
        let output = self
            .run(vec![
                "list-workspaces".to_string(),
                "--focused".to_string(),
                "--format".to_string(),
                WORKSPACE_FORMAT.to_string(),
            ])
            .await?;
        ensure_success(&output)?;
        Ok(parse_workspace_lines(&output.stdout).into_iter().next())
    }

    pub async fn list_windows(&self, scope: WindowScope) -> Result<Vec<WmWindow>> {
        let mut args = vec!["list-windows".to_string()];
        match &scope {
            WindowScope::All => args.push("--all".to_string()),
            WindowScope::Workspace(name) => {
                let name = validated_workspace_name(name)?;
                args.push("--workspace".to_string());
                args.push(name.to_string());
            }
            WindowScope::App(bundle_id) => {
                let bundle_id = bundle_id.trim();
                if bundle_id.is_empty() {
                    return Err(AeroError::InvalidArgument(
                        "app bundle id must not be empty".to_string(),
                    ));
                }
                args.push("--all".to_string());
                args.push("--app-bundle-id".to_string());
                args.push(bundle_id.to_string());
            }
        }
        args.push("--format".to_string());
        args.push(WINDOW_FORMAT.to_string());

        let output = self.run(args).await?;
        ensure_success(&output)?;
        parse_window_lines(&output.stdout)
    }

    /// The window currently holding focus, if the window manager reports one.
    pub async fn focused_window(&self) -> Result<Option<WmWindow>> {
        let output = self
            .run(vec![
                "list-windows".to_string(),
                "--focused".to_string(),
                "--format".to_string(),
                WINDOW_FORMAT.to_string(),
            ])
            .await?;
        ensure_success(&output)?;
        Ok(parse_window_lines(&output.stdout)?.into_iter().next())
    }

    pub async fn focus_window(&self, window_id: i64) -> Result<()> {
        validated_window_id(window_id)?;
        let output = self
            .run(vec![
                "focus".to_string(),
                "--window-id".to_string(),
                window_id.to_string(),
            ])
            .await?;
        ensure_success(&output)
    }

    /// Focus a workspace by name. Newer CLIs summon the workspace to the
    /// focused monitor; older ones only know the plain `workspace` verb, so
    /// an unknown-command answer downgrades to that form once.
    pub async fn focus_workspace(&self, name: &str) -> Result<()> {
        let name = validated_workspace_name(name)?.to_string();
        let output = self
            .run(vec!["summon-workspace".to_string(), name.clone()])
            .await?;
        if output.success() {
            return Ok(());
        }
        if is_compat_mismatch(&output.stderr) {
            debug!(
                workspace = %name,
                "summon-workspace unsupported, falling back to workspace verb"
            );
            let fallback = self.run(vec!["workspace".to_string(), name]).await?;
            return ensure_success(&fallback);
        }
        Err(command_error(&output))
    }

    /// AeroSpace materializes a workspace the moment it is focused, so
    /// creation is a focus.
    pub async fn create_workspace(&self, name: &str) -> Result<()> {
        self.focus_workspace(name).await
    }

    /// Move a window to a workspace, optionally following it with focus.
    /// Older CLIs lack `--focus-follows-window`; for those the move and the
    /// focus are issued as two calls.
    pub async fn move_window(
        &self,
        window_id: i64,
        workspace: &str,
        focus_follows: bool,
    ) -> Result<()> {
        validated_window_id(window_id)?;
        let workspace = validated_workspace_name(workspace)?.to_string();

        let plain = vec![
            "move-node-to-workspace".to_string(),
            "--window-id".to_string(),
            window_id.to_string(),
            workspace.clone(),
        ];
        if !focus_follows {
            let output = self.run(plain).await?;
            return ensure_success(&output);
        }

        let output = self
            .run(vec![
                "move-node-to-workspace".to_string(),
                "--window-id".to_string(),
                window_id.to_string(),
                "--focus-follows-window".to_string(),
                workspace.clone(),
            ])
            .await?;
        if output.success() {
            return Ok(());
        }
        if is_compat_mismatch(&output.stderr) {
            debug!(
                window_id,
                workspace = %workspace,
                "--focus-follows-window unsupported, falling back to move-then-focus"
            );
            let moved = self.run(plain).await?;
            ensure_success(&moved)?;
            return self.focus_workspace(&workspace).await;
        }
        Err(command_error(&output))
    }

    pub async fn close_window(&self, window_id: i64) -> Result<()> {
        validated_window_id(window_id)?;
        let output = self
            .run(vec![
                "close".to_string(),
                "--window-id".to_string(),
                window_id.to_string(),
            ])
            .await?;
        ensure_success(&output)
    }

    /// Close every window in a workspace. Success requires every close to
    /// land; anything less is reported with per-window detail.
    pub async fn close_workspace(&self, name: &str) -> Result<()> {
        let name = validated_workspace_name(name)?.to_string();
        let windows = self
            .list_windows(WindowScope::Workspace(name.clone()))
            .await?;
        let total = windows.len();
        let mut failures = Vec::new();
        for window in windows {
            if let Err(err) = self.close_window(window.window_id).await {
                warn!(window_id = window.window_id, error = %err, "window refused to close");
                failures.push(format!("window {}: {err}", window.window_id));
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(AeroError::Command {
                exit_code: 1,
                stderr: format!(
                    "closed {} of {total} windows in {name}: {}",
                    total - failures.len(),
                    failures.join("; ")
                ),
            })
        }
    }

    async fn run(&self, args: Vec<String>) -> Result<CommandOutput> {
        if !self.breaker.should_allow() {
            let retry_after = self.breaker.remaining_cooldown().unwrap_or_default();
            debug!(
                args = ?args,
                retry_after_secs = retry_after.as_secs(),
                "circuit breaker open, refusing call"
            );
            return Err(AeroError::CircuitOpen { retry_after });
        }

        let spec = CommandSpec::new(self.bin.clone(), args, self.command_timeout);
        debug!(args = ?spec.args, "running aerospace");
        match self.runner.run(spec).await {
            Ok(output) => {
                debug!(
                    exit_code = output.exit_code,
                    duration_ms = output.duration_ms,
                    "aerospace finished"
                );
                Ok(output)
            }
            Err(err @ AeroError::Timeout { .. }) => {
                // Only timeouts trip the breaker.
                self.breaker.record_timeout();
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}

fn ensure_success(output: &CommandOutput) -> Result<()> {
    if output.success() {
        Ok(())
    } else {
        Err(command_error(output))
    }
}

fn command_error(output: &CommandOutput) -> AeroError {
    AeroError::Command {
        exit_code: output.exit_code,
        stderr: output.stderr.trim().to_string(),
    }
}

fn validated_workspace_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AeroError::InvalidArgument(
            "workspace name must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

fn validated_window_id(window_id: i64) -> Result<()> {
    if window_id <= 0 {
        return Err(AeroError::InvalidArgument(format!(
            "window id must be positive, got {window_id}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compat_mismatch_matches_version_skew_signatures() {
        assert!(is_compat_mismatch("unknown command: summon-workspace"));
        assert!(is_compat_mismatch("ERROR: Unknown option --focus-follows-window"));
        assert!(is_compat_mismatch("unrecognized subcommand"));
        assert!(is_compat_mismatch("unexpected argument '--window-id'"));
    }

    #[test]
    fn compat_mismatch_ignores_operational_failures() {
        assert!(!is_compat_mismatch("workspace not found"));
        assert!(!is_compat_mismatch("permission denied"));
        assert!(!is_compat_mismatch(""));
        assert!(!is_compat_mismatch("window 42 does not exist"));
    }

    #[test]
    fn rejects_blank_workspace_names() {
        assert!(validated_workspace_name("  ").is_err());
        assert!(validated_workspace_name("").is_err());
        assert_eq!(validated_workspace_name(" ap-web ").ok(), Some("ap-web"));
    }

    #[test]
    fn rejects_non_positive_window_ids() {
        assert!(validated_window_id(0).is_err());
        assert!(validated_window_id(-7).is_err());
        assert!(validated_window_id(1).is_ok());
    }
}
