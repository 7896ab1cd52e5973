//! Reading and writing concrete window geometry.
//!
//! AeroSpace moves windows between workspaces but does not expose pixel
//! geometry, so frames go through the Accessibility API via osascript.
//! Permission denial is its own error; the layout engine downgrades it to a
//! warning rather than failing a workflow over it.

use std::sync::Arc;
use std::time::Duration;

use aero_client::{CommandRunner, CommandSpec, WmWindow};
use async_trait::async_trait;
use thiserror::Error;

use crate::layout::Frame;

#[derive(Debug, Error)]
pub enum PositionError {
    #[error("window {0} not found")]
    NotFound(i64),
    #[error("accessibility permission denied: {0}")]
    PermissionDenied(String),
    #[error("window positioning failed: {0}")]
    Backend(String),
}

#[async_trait]
pub trait WindowPositioner: Send + Sync {
    async fn frame(&self, window: &WmWindow) -> Result<Frame, PositionError>;
    async fn set_frame(&self, window: &WmWindow, frame: &Frame) -> Result<(), PositionError>;
}

/// Production positioner addressing windows by app bundle id and title
/// through System Events.
pub struct OsascriptPositioner {
    runner: Arc<dyn CommandRunner>,
    timeout: Duration,
}

impl OsascriptPositioner {
    pub fn new(runner: Arc<dyn CommandRunner>, timeout: Duration) -> Self {
        Self { runner, timeout }
    }

    async fn run_script(&self, window: &WmWindow, script: String) -> Result<String, PositionError> {
        let spec = CommandSpec::new("osascript", vec!["-e".to_string(), script], self.timeout);
        let output = self
            .runner
            .run(spec)
            .await
            .map_err(|err| PositionError::Backend(err.to_string()))?;
        if !output.success() {
            return Err(classify_osascript_failure(window.window_id, &output.stderr));
        }
        Ok(output.stdout)
    }
}

#[async_trait]
impl WindowPositioner for OsascriptPositioner {
    async fn frame(&self, window: &WmWindow) -> Result<Frame, PositionError> {
        let script = format!(
            "tell application \"System Events\" to tell (first application process whose bundle identifier is {}) to get {{position, size}} of (first window whose name is {})",
            applescript_string(&window.app_bundle_id),
            applescript_string(&window.title),
        );
        let stdout = self.run_script(window, script).await?;
        parse_frame_reply(&stdout).ok_or_else(|| {
            PositionError::Backend(format!("unparseable geometry reply: {}", stdout.trim()))
        })
    }

    async fn set_frame(&self, window: &WmWindow, frame: &Frame) -> Result<(), PositionError> {
        let script = format!(
            "tell application \"System Events\" to tell (first application process whose bundle identifier is {}) to set {{position, size}} of (first window whose name is {}) to {{{{{}, {}}}, {{{}, {}}}}}",
            applescript_string(&window.app_bundle_id),
            applescript_string(&window.title),
            frame.x.round(),
            frame.y.round(),
            frame.width.round(),
            frame.height.round(),
        );
        self.run_script(window, script).await.map(|_| ())
    }
}

fn classify_osascript_failure(window_id: i64, stderr: &str) -> PositionError {
    let lowered = stderr.to_lowercase();
    if lowered.contains("assistive access") || lowered.contains("not authorized") {
        PositionError::PermissionDenied(stderr.trim().to_string())
    } else if lowered.contains("can't get window") || lowered.contains("invalid index") {
        PositionError::NotFound(window_id)
    } else {
        PositionError::Backend(stderr.trim().to_string())
    }
}

pub(crate) fn applescript_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Parse `position, size` replies of the form `10, 25, 1200, 900`.
fn parse_frame_reply(raw: &str) -> Option<Frame> {
    let parts: Vec<f64> = raw
        .trim()
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    if parts.len() != 4 {
        return None;
    }
    Some(Frame::new(parts[0], parts[1], parts[2], parts[3]))
}
