//! Wire types for the tab-separated `--format` output of the AeroSpace CLI.

use serde::Serialize;

use crate::error::{AeroError, Result};

/// Format template passed to `list-windows`. Four tab-separated fields; the
/// title comes last because it may itself contain tabs.
pub const WINDOW_FORMAT: &str =
    "%{window-id}%{tab}%{app-bundle-id}%{tab}%{workspace}%{tab}%{window-title}";

/// Format template passed to `list-workspaces`.
pub const WORKSPACE_FORMAT: &str = "%{workspace}";

/// A window as reported by the window manager. Ephemeral: always freshly
/// queried, never cached beyond a single operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WmWindow {
    pub window_id: i64,
    pub app_bundle_id: String,
    pub workspace: String,
    pub title: String,
}

/// Parse `list-windows` output. Blank lines are skipped; a malformed line is
/// a parse error rather than a silent drop, so schema drift in the CLI shows
/// up immediately.
pub fn parse_window_lines(stdout: &str) -> Result<Vec<WmWindow>> {
    let mut windows = Vec::new();
    for line in stdout.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        // At most 4 splits: everything after the third tab is the title.
        let mut fields = line.splitn(4, '\t');
        let raw_id = fields
            .next()
            .ok_or_else(|| AeroError::Parse(format!("missing window id in line: {line}")))?;
        let window_id = raw_id
            .trim()
            .parse::<i64>()
            .map_err(|_| AeroError::Parse(format!("bad window id {raw_id:?} in line: {line}")))?;
        let app_bundle_id = fields
            .next()
            .ok_or_else(|| AeroError::Parse(format!("missing app bundle id in line: {line}")))?
            .trim()
            .to_string();
        let workspace = fields
            .next()
            .ok_or_else(|| AeroError::Parse(format!("missing workspace in line: {line}")))?
            .trim()
            .to_string();
        let title = fields.next().unwrap_or_default().trim().to_string();
        windows.push(WmWindow {
            window_id,
            app_bundle_id,
            workspace,
            title,
        });
    }
    Ok(windows)
}

/// Parse `list-workspaces` output: one workspace name per line.
pub fn parse_workspace_lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}
