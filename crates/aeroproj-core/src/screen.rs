//! Screen detection behind a capability trait.

use std::sync::Arc;
use std::time::Duration;

use aero_client::{CommandRunner, CommandSpec};
use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::layout::Frame;

/// What layout needs to know about the active display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenInfo {
    pub visible_frame: Frame,
    /// Point width used for mode classification; `None` when the probe
    /// could not read it.
    pub physical_width: Option<f64>,
}

#[async_trait]
pub trait ScreenProbe: Send + Sync {
    /// The screen the user is working on, or `None` when none can be
    /// located.
    async fn main_screen(&self) -> Result<Option<ScreenInfo>>;
}

/// Menu bar allowance subtracted from the top of the desktop bounds.
const MENU_BAR_HEIGHT: f64 = 25.0;

/// Production probe: asks Finder for the desktop bounds over osascript.
/// Every failure degrades to "no screen"; layout decides what that means.
pub struct DesktopBoundsProbe {
    runner: Arc<dyn CommandRunner>,
    timeout: Duration,
}

impl DesktopBoundsProbe {
    pub fn new(runner: Arc<dyn CommandRunner>, timeout: Duration) -> Self {
        Self { runner, timeout }
    }
}

#[async_trait]
impl ScreenProbe for DesktopBoundsProbe {
    async fn main_screen(&self) -> Result<Option<ScreenInfo>> {
        let spec = CommandSpec::new(
            "osascript",
            vec![
                "-e".to_string(),
                "tell application \"Finder\" to get bounds of window of desktop".to_string(),
            ],
            self.timeout,
        );
        let output = match self.runner.run(spec).await {
            Ok(output) if output.success() => output,
            Ok(output) => {
                debug!(stderr = %output.stderr.trim(), "desktop bounds query failed");
                return Ok(None);
            }
            Err(err) => {
                debug!(error = %err, "desktop bounds query did not run");
                return Ok(None);
            }
        };
        Ok(parse_desktop_bounds(&output.stdout))
    }
}

/// Parse osascript output of the form `0, 0, 1728, 1117` (left, top, right,
/// bottom).
fn parse_desktop_bounds(raw: &str) -> Option<ScreenInfo> {
    let parts: Vec<f64> = raw
        .trim()
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .ok()?;
    if parts.len() != 4 {
        return None;
    }
    let (left, top, right, bottom) = (parts[0], parts[1], parts[2], parts[3]);
    let width = right - left;
    let height = bottom - top;
    if width <= 0.0 || height <= MENU_BAR_HEIGHT {
        return None;
    }
    Some(ScreenInfo {
        visible_frame: Frame::new(left, top + MENU_BAR_HEIGHT, width, height - MENU_BAR_HEIGHT),
        physical_width: Some(width),
    })
}
