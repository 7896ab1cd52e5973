//! Shared wiring for the subcommands: path resolution, config loading, and
//! construction of the production manager stack.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use aero_client::{AeroClient, CommandRunner, ProcessRunner, find_aerospace_executable};
use aeroproj_core::{
    Config, DesktopBoundsProbe, FocusHistoryStore, FrameStore, MacBrowserLauncher,
    MacEditorLauncher, OsascriptPositioner, OsascriptTabCapture, ProjectCollaborators,
    ProjectManager, paths,
};
use anyhow::{Context, Result};
use tracing::debug;

/// Names the agent-layer editor CLI: an absolute path or a bare binary name.
pub const EDITOR_CLI_ENV: &str = "AEROPROJ_EDITOR_CLI";

pub struct CliPaths {
    pub config_file: PathBuf,
    pub focus_history_file: PathBuf,
    pub frames_file: PathBuf,
}

/// `--config-dir` relocates the config file only; state files keep following
/// the state-dir rules in `aeroproj_core::paths`.
pub fn resolve_paths(config_dir: Option<&Path>) -> Result<CliPaths> {
    let config_file = match config_dir {
        Some(dir) => dir.join("config.toml"),
        None => paths::config_file()?,
    };
    Ok(CliPaths {
        config_file,
        focus_history_file: paths::focus_history_file()?,
        frames_file: paths::frames_file()?,
    })
}

pub fn load_config(cli_paths: &CliPaths) -> Result<Config> {
    Config::load_from(&cli_paths.config_file)
        .with_context(|| format!("loading {}", cli_paths.config_file.display()))
}

/// Wire the full production stack behind a manager. Fails when the
/// window-manager CLI cannot be found at all; everything else degrades at
/// call time instead.
pub fn build_manager(config_dir: Option<&Path>) -> Result<ProjectManager> {
    let cli_paths = resolve_paths(config_dir)?;
    let config = load_config(&cli_paths)?;

    let bin = find_aerospace_executable()
        .context("aerospace CLI not found; install AeroSpace or set AEROPROJ_AEROSPACE_BIN")?;
    debug!(bin = %bin.display(), "resolved window-manager CLI");

    let timeout = config.settings.command_timeout();
    let client = Arc::new(AeroClient::new(
        bin,
        timeout,
        config.settings.breaker_cooldown(),
    ));

    let runner: Arc<dyn CommandRunner> = Arc::new(ProcessRunner);
    let collaborators = ProjectCollaborators {
        editor: Arc::new(MacEditorLauncher::new(
            runner.clone(),
            timeout,
            agent_editor_cli(),
        )),
        browser: Arc::new(MacBrowserLauncher::new(runner.clone(), timeout)),
        tabs: Arc::new(OsascriptTabCapture::new(
            runner.clone(),
            timeout,
            config.settings.browser_bundle_id.clone(),
        )),
        probe: Arc::new(DesktopBoundsProbe::new(runner.clone(), timeout)),
        positioner: Arc::new(OsascriptPositioner::new(runner, timeout)),
    };

    let focus_history = FocusHistoryStore::new(
        cli_paths.focus_history_file,
        config.settings.history_capacity,
        config.settings.history_max_age(),
    );
    let frames = FrameStore::new(cli_paths.frames_file);

    Ok(ProjectManager::new(
        client,
        config,
        focus_history,
        frames,
        collaborators,
    ))
}

/// Resolve the agent-layer editor CLI. A miss is fine; the launcher degrades
/// to a direct launch with a warning.
fn agent_editor_cli() -> Option<PathBuf> {
    if let Some(path) = resolve_editor_cli_from_env() {
        return Some(path);
    }
    which::which("code").ok()
}

fn resolve_editor_cli_from_env() -> Option<PathBuf> {
    let value = env::var(EDITOR_CLI_ENV).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let candidate = PathBuf::from(trimmed);
    if candidate.exists() && candidate.is_file() {
        return Some(candidate);
    }
    which::which(trimmed).ok()
}
