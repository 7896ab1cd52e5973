//! Orchestration core for project workspaces.
//!
//! A project owns one desktop workspace holding an editor and a browser
//! window. This crate supplies everything above the raw window-manager
//! gateway: workspace naming, the persisted focus-history stack, saved
//! window frames, layout computation and recovery, launch collaborators,
//! configuration, and the `ProjectManager` that sequences it all into
//! activate, close, and exit operations.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod config;
pub mod error;
pub mod focus;
pub mod frames;
pub mod launch;
pub mod layout;
pub mod paths;
pub mod position;
pub mod project;
pub mod screen;
pub mod workspace;

pub use config::{Config, ProjectConfig, Settings};
pub use error::{CoreError, Result};
pub use focus::{CapturedFocus, FOCUS_HISTORY_VERSION, FocusHistoryState, FocusHistoryStore};
pub use frames::{FRAMES_VERSION, FrameStore, FramesState, ProjectSnapshot, SavedWindowFrames};
pub use launch::{
    BrowserLauncher, EditorLauncher, EditorWindowRequest, MacBrowserLauncher, MacEditorLauncher,
    OsascriptTabCapture, TabCapture,
};
pub use layout::{
    CASCADE_OFFSET, ComputedLayout, Frame, LayoutEngine, PositionOutcome, RecoveryOutcome,
    ScreenMode, position_warning,
};
pub use position::{OsascriptPositioner, PositionError, WindowPositioner};
pub use project::{
    CloseOutcome, ExitOutcome, FocusRestore, ProjectCollaborators, ProjectManager, ProjectPhase,
    ProjectStatus, RecoverReport, SelectOutcome,
};
pub use screen::{DesktopBoundsProbe, ScreenInfo, ScreenProbe};
pub use workspace::{
    FALLBACK_WORKSPACE, PROJECT_WORKSPACE_PREFIX, is_project_workspace,
    preferred_non_project_workspace, project_id, workspace_name,
};
