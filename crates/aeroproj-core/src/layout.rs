//! Window geometry: screen-mode classification, target-frame computation,
//! and recovery of oversized or off-screen windows.
//!
//! Detection failures never fail an operation. A missing screen skips layout
//! with a warning; an unreadable width degrades to the configured fallback
//! width. Partial positioning is reported with exact counts instead of being
//! swallowed.

use std::sync::Arc;

use aero_client::WmWindow;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::frames::SavedWindowFrames;
use crate::position::{PositionError, WindowPositioner};
use crate::screen::{ScreenInfo, ScreenProbe};

/// Coarse display classification selecting a layout strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenMode {
    Wide,
    Narrow,
}

impl ScreenMode {
    pub fn classify(physical_width: f64, wide_min_width: f64) -> Self {
        if physical_width >= wide_min_width {
            Self::Wide
        } else {
            Self::Narrow
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wide => "wide",
            Self::Narrow => "narrow",
        }
    }
}

/// A window frame in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when this frame lies entirely inside `outer`.
    pub fn fits_within(&self, outer: &Frame) -> bool {
        self.x >= outer.x
            && self.y >= outer.y
            && self.x + self.width <= outer.x + outer.width
            && self.y + self.height <= outer.y + outer.height
    }

    /// Shrink and shift this frame until it fits inside `outer`.
    pub fn clamped_to(&self, outer: &Frame) -> Frame {
        let width = self.width.min(outer.width);
        let height = self.height.min(outer.height);
        let x = self.x.max(outer.x).min(outer.x + outer.width - width);
        let y = self.y.max(outer.y).min(outer.y + outer.height - height);
        Frame {
            x,
            y,
            width,
            height,
        }
    }

    fn offset(&self, dx: f64, dy: f64) -> Frame {
        Frame {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Editor share of the visible width per mode; the browser takes the rest.
const WIDE_EDITOR_FRACTION: f64 = 0.62;
const NARROW_EDITOR_FRACTION: f64 = 0.5;

/// Offset applied per additional window of the same app.
pub const CASCADE_OFFSET: f64 = 28.0;

/// Target frames for one project on one screen.
#[derive(Debug, Clone)]
pub struct ComputedLayout {
    pub mode: ScreenMode,
    pub visible_frame: Frame,
    pub editor: Frame,
    pub browser: Frame,
    pub editor_from_saved: bool,
    pub browser_from_saved: bool,
}

/// How many of the matched windows were actually moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOutcome {
    pub positioned: usize,
    pub matched: usize,
}

impl PositionOutcome {
    pub fn is_partial(&self) -> bool {
        self.positioned < self.matched
    }
}

/// Warning text for partial positioning; carries the exact counts.
pub fn position_warning(app_label: &str, outcome: PositionOutcome) -> String {
    format!(
        "positioned {} of {} {app_label} windows",
        outcome.positioned, outcome.matched
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryOutcome {
    Recovered { frame: Frame },
    Unchanged,
    /// The window disappeared between discovery and action.
    NotFound,
}

pub struct LayoutEngine {
    probe: Arc<dyn ScreenProbe>,
    positioner: Arc<dyn WindowPositioner>,
    wide_min_width: f64,
    fallback_width: f64,
}

impl LayoutEngine {
    pub fn new(
        probe: Arc<dyn ScreenProbe>,
        positioner: Arc<dyn WindowPositioner>,
        wide_min_width: f64,
        fallback_width: f64,
    ) -> Self {
        Self {
            probe,
            positioner,
            wide_min_width,
            fallback_width,
        }
    }

    /// Locate the screen and classify its mode. `None` means layout should
    /// be skipped entirely; any degradation comes back as warning text.
    pub async fn detect_screen(&self) -> (Option<(ScreenInfo, ScreenMode)>, Vec<String>) {
        let mut warnings = Vec::new();
        let screen = match self.probe.main_screen().await {
            Ok(Some(screen)) => screen,
            Ok(None) => {
                warnings.push("could not detect any screen, skipping window layout".to_string());
                return (None, warnings);
            }
            Err(err) => {
                warnings.push(format!(
                    "screen detection failed ({err}), skipping window layout"
                ));
                return (None, warnings);
            }
        };
        let mode = match screen.physical_width {
            Some(width) => ScreenMode::classify(width, self.wide_min_width),
            None => {
                let mode = ScreenMode::classify(self.fallback_width, self.wide_min_width);
                warnings.push(format!(
                    "screen width unavailable, assuming {:.0}pt ({})",
                    self.fallback_width,
                    mode.as_str()
                ));
                mode
            }
        };
        (Some((screen, mode)), warnings)
    }

    /// Compute target frames. Saved frames win when they fit the current
    /// screen; a saved editor frame with no saved browser frame restores the
    /// editor and computes the browser fresh.
    pub fn plan(
        &self,
        screen: &ScreenInfo,
        mode: ScreenMode,
        saved: Option<&SavedWindowFrames>,
    ) -> ComputedLayout {
        let visible = screen.visible_frame;
        let editor_fraction = match mode {
            ScreenMode::Wide => WIDE_EDITOR_FRACTION,
            ScreenMode::Narrow => NARROW_EDITOR_FRACTION,
        };
        let editor_width = (visible.width * editor_fraction).floor();
        let computed_editor = Frame::new(visible.x, visible.y, editor_width, visible.height);
        let computed_browser = Frame::new(
            visible.x + editor_width,
            visible.y,
            visible.width - editor_width,
            visible.height,
        );

        let saved_editor = saved.map(|s| s.ide).filter(|f| f.fits_within(&visible));
        let saved_browser = saved
            .and_then(|s| s.chrome)
            .filter(|f| f.fits_within(&visible));
        if saved.is_some() && saved_editor.is_none() {
            debug!("saved editor frame invalid for current screen, using computed layout");
        }

        ComputedLayout {
            mode,
            visible_frame: visible,
            editor_from_saved: saved_editor.is_some(),
            browser_from_saved: saved_browser.is_some(),
            editor: saved_editor.unwrap_or(computed_editor),
            browser: saved_browser.unwrap_or(computed_browser),
        }
    }

    /// Apply `primary` to the first window and cascade the rest, clamping
    /// everything into the visible frame. Individual failures are logged and
    /// counted, never fatal.
    pub async fn position_windows(
        &self,
        windows: &[WmWindow],
        primary: Frame,
        visible: &Frame,
    ) -> PositionOutcome {
        let mut positioned = 0;
        for (index, window) in windows.iter().enumerate() {
            let shift = CASCADE_OFFSET * index as f64;
            let target = primary.offset(shift, shift).clamped_to(visible);
            match self.positioner.set_frame(window, &target).await {
                Ok(()) => positioned += 1,
                Err(err) => {
                    warn!(
                        window_id = window.window_id,
                        error = %err,
                        "window positioning failed"
                    );
                }
            }
        }
        PositionOutcome {
            positioned,
            matched: windows.len(),
        }
    }

    /// Fix a single damaged window: an oversized or off-screen frame is
    /// clamped into the visible area, an intact window is left alone. A
    /// window that vanished between discovery and action is `NotFound`;
    /// a positioning failure propagates for the caller to downgrade.
    pub async fn recover_window(
        &self,
        window: &WmWindow,
        visible: &Frame,
    ) -> Result<RecoveryOutcome, PositionError> {
        let current = match self.positioner.frame(window).await {
            Ok(frame) => frame,
            Err(PositionError::NotFound(_)) => return Ok(RecoveryOutcome::NotFound),
            Err(err) => return Err(err),
        };
        if current.fits_within(visible) {
            return Ok(RecoveryOutcome::Unchanged);
        }
        let target = current.clamped_to(visible);
        match self.positioner.set_frame(window, &target).await {
            Ok(()) => Ok(RecoveryOutcome::Recovered { frame: target }),
            Err(PositionError::NotFound(_)) => Ok(RecoveryOutcome::NotFound),
            Err(err) => Err(err),
        }
    }
}
