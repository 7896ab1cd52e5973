//! Project activation, teardown, and focus restoration.
//!
//! One `ProjectManager` owns the whole workflow: it remembers where the user
//! came from, makes sure the project workspace and its windows exist, waits
//! for the window manager to catch up, lays the windows out, and on the way
//! out restores focus through a three-tier fallback chain. Hard failures are
//! reserved for workspace creation and the editor launch; everything else
//! degrades to warnings carried on the result.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use aero_client::{AeroClient, WindowScope, WmWindow};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{Config, ProjectConfig};
use crate::error::{CoreError, Result};
use crate::focus::{CapturedFocus, FocusHistoryStore};
use crate::frames::{FrameStore, SavedWindowFrames};
use crate::launch::{BrowserLauncher, EditorLauncher, EditorWindowRequest, TabCapture};
use crate::layout::{LayoutEngine, RecoveryOutcome, ScreenMode, position_warning};
use crate::position::WindowPositioner;
use crate::screen::{ScreenInfo, ScreenProbe};
use crate::workspace;

/// Lifecycle phase of one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectPhase {
    Inactive,
    Activating,
    Active,
    Closing,
    Exiting,
}

/// Which restoration tier ended up receiving focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusRestore {
    /// A window popped from the history stack.
    HistoryWindow(i64),
    /// The most recently observed non-project window.
    MostRecentWindow(i64),
    /// No usable window remained; a non-project workspace was focused.
    Workspace(String),
}

/// Result of a successful activation.
#[derive(Debug, Clone)]
pub struct SelectOutcome {
    pub project_id: String,
    pub workspace: String,
    pub editor_window_id: i64,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CloseOutcome {
    pub project_id: String,
    /// `None` when focus could not be restored at any tier; teardown still
    /// ran and the reason rides in `warnings`.
    pub restored: Option<FocusRestore>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ExitOutcome {
    pub restored: FocusRestore,
    pub warnings: Vec<String>,
}

/// Result of a single-window recovery pass.
#[derive(Debug, Clone)]
pub struct RecoverReport {
    pub outcome: RecoveryOutcome,
    pub warnings: Vec<String>,
}

/// One row of `list`: a configured project joined with live workspace state.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectStatus {
    pub project_id: String,
    pub workspace: String,
    pub configured: bool,
    pub active: bool,
    pub focused: bool,
    pub window_count: usize,
}

/// Launch and platform collaborators handed to the manager at construction,
/// so tests wire in fakes without touching the manager itself.
pub struct ProjectCollaborators {
    pub editor: Arc<dyn EditorLauncher>,
    pub browser: Arc<dyn BrowserLauncher>,
    pub tabs: Arc<dyn TabCapture>,
    pub probe: Arc<dyn ScreenProbe>,
    pub positioner: Arc<dyn WindowPositioner>,
}

pub struct ProjectManager {
    client: Arc<AeroClient>,
    config: Config,
    focus_history: FocusHistoryStore,
    frames: FrameStore,
    layout: LayoutEngine,
    positioner: Arc<dyn WindowPositioner>,
    editor: Arc<dyn EditorLauncher>,
    browser: Arc<dyn BrowserLauncher>,
    tabs: Arc<dyn TabCapture>,
    phases: Mutex<HashMap<String, ProjectPhase>>,
}

impl ProjectManager {
    pub fn new(
        client: Arc<AeroClient>,
        config: Config,
        focus_history: FocusHistoryStore,
        frames: FrameStore,
        collaborators: ProjectCollaborators,
    ) -> Self {
        let layout = LayoutEngine::new(
            collaborators.probe,
            collaborators.positioner.clone(),
            config.settings.wide_screen_min_width,
            config.settings.fallback_screen_width,
        );
        Self {
            client,
            config,
            focus_history,
            frames,
            layout,
            positioner: collaborators.positioner,
            editor: collaborators.editor,
            browser: collaborators.browser,
            tabs: collaborators.tabs,
            phases: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn phase(&self, project_id: &str) -> ProjectPhase {
        self.lock_phases()
            .get(project_id)
            .copied()
            .unwrap_or(ProjectPhase::Inactive)
    }

    /// Capture the currently focused window and remember it as the most
    /// recent focus. Callers grab this right before switching away; a failed
    /// capture means nothing to remember, never a failed workflow.
    pub async fn capture_focus(&self) -> Option<CapturedFocus> {
        match self.focus_history.capture_current(&self.client).await {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "focus capture failed");
                None
            }
        }
    }

    /// Activate `project_id`: remember the origin, ensure the workspace and
    /// its windows exist, wait for the window manager to settle, then lay the
    /// windows out and focus the editor.
    pub async fn select_project(
        &self,
        project_id: &str,
        pre_captured: Option<CapturedFocus>,
    ) -> Result<SelectOutcome> {
        let project = self.config.project(project_id)?.clone();
        let target_workspace = workspace::workspace_name(project_id);

        self.set_phase(project_id, ProjectPhase::Activating);
        let result = self
            .activate(project_id, &project, &target_workspace, pre_captured)
            .await;
        match &result {
            Ok(_) => self.set_phase(project_id, ProjectPhase::Active),
            Err(_) => self.set_phase(project_id, ProjectPhase::Inactive),
        }
        result
    }

    /// Deactivate `project_id`: snapshot its geometry, hand focus back, then
    /// close the project workspace window by window.
    ///
    /// Deliberately does not consult the project table: a workspace whose
    /// config entry was removed must still close.
    pub async fn close_project(&self, project_id: &str) -> Result<CloseOutcome> {
        let workspace_name = workspace::workspace_name(project_id);
        self.set_phase(project_id, ProjectPhase::Closing);
        let result = self.close_inner(project_id, &workspace_name).await;
        self.set_phase(project_id, ProjectPhase::Inactive);
        result
    }

    /// Return to wherever the user was before entering project land, leaving
    /// every project's windows in place. Fails only when all three
    /// restoration tiers are exhausted.
    pub async fn exit_to_non_project_window(&self) -> Result<ExitOutcome> {
        let mut warnings = Vec::new();
        let current_project = match self.client.focused_workspace().await {
            Ok(Some(name)) => workspace::project_id(&name).map(ToString::to_string),
            _ => None,
        };
        if let Some(project_id) = &current_project {
            self.set_phase(project_id, ProjectPhase::Exiting);
        }
        let result = self.restore_previous_focus(&mut warnings).await;
        if let Some(project_id) = &current_project {
            self.set_phase(project_id, ProjectPhase::Inactive);
        }
        let restored = result?;
        info!("returned to non-project window");
        Ok(ExitOutcome { restored, warnings })
    }

    /// Check one window against the visible screen area and pull it back on
    /// screen if it strayed. `None` targets the focused window. Positioning
    /// failures come back as warnings, not errors.
    pub async fn recover_window(&self, window_id: Option<i64>) -> Result<RecoverReport> {
        let mut warnings = Vec::new();
        let Some(window) = self.locate_window(window_id).await? else {
            return Ok(RecoverReport {
                outcome: RecoveryOutcome::NotFound,
                warnings,
            });
        };
        let (detected, layout_warnings) = self.layout.detect_screen().await;
        warnings.extend(layout_warnings);
        let Some((screen, _mode)) = detected else {
            return Ok(RecoverReport {
                outcome: RecoveryOutcome::Unchanged,
                warnings,
            });
        };
        match self
            .layout
            .recover_window(&window, &screen.visible_frame)
            .await
        {
            Ok(outcome) => Ok(RecoverReport { outcome, warnings }),
            Err(err) => {
                warn!(window_id = window.window_id, error = %err, "window recovery failed");
                warnings.push(format!("window {} not recovered ({err})", window.window_id));
                Ok(RecoverReport {
                    outcome: RecoveryOutcome::Unchanged,
                    warnings,
                })
            }
        }
    }

    /// Configured projects joined with live workspace state. Project
    /// workspaces that exist without a config entry are listed too.
    pub async fn project_statuses(&self) -> Result<Vec<ProjectStatus>> {
        let workspaces = self.client.list_workspaces().await?;
        let focused = self.client.focused_workspace().await.ok().flatten();
        let windows = self.client.list_windows(WindowScope::All).await?;

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for window in &windows {
            *counts.entry(window.workspace.as_str()).or_insert(0) += 1;
        }
        let live: HashSet<&str> = workspaces.iter().map(String::as_str).collect();

        let mut statuses = Vec::new();
        for project_id in self.config.projects.keys() {
            let name = workspace::workspace_name(project_id);
            statuses.push(ProjectStatus {
                project_id: project_id.clone(),
                configured: true,
                active: live.contains(name.as_str()),
                focused: focused.as_deref() == Some(name.as_str()),
                window_count: counts.get(name.as_str()).copied().unwrap_or(0),
                workspace: name,
            });
        }
        for name in &workspaces {
            if let Some(project_id) = workspace::project_id(name) {
                if !self.config.projects.contains_key(project_id) {
                    statuses.push(ProjectStatus {
                        project_id: project_id.to_string(),
                        workspace: name.clone(),
                        configured: false,
                        active: true,
                        focused: focused.as_deref() == Some(name.as_str()),
                        window_count: counts.get(name.as_str()).copied().unwrap_or(0),
                    });
                }
            }
        }
        Ok(statuses)
    }

    async fn activate(
        &self,
        project_id: &str,
        project: &ProjectConfig,
        target_workspace: &str,
        pre_captured: Option<CapturedFocus>,
    ) -> Result<SelectOutcome> {
        let mut warnings = Vec::new();
        info!(project = project_id, workspace = target_workspace, "activating project");

        if let Some(origin) = pre_captured {
            self.remember_origin(project_id, &origin, &mut warnings)
                .await;
        }

        // Focusing the workspace materializes it, and makes it the landing
        // spot for every window launched below.
        self.client
            .create_workspace(target_workspace)
            .await
            .map_err(|err| CoreError::WorkspaceCreate {
                workspace: target_workspace.to_string(),
                reason: err.to_string(),
            })?;

        let existing = self
            .client
            .list_windows(WindowScope::Workspace(target_workspace.to_string()))
            .await?;
        let settings = &self.config.settings;
        let editor_present = existing
            .iter()
            .any(|window| window.app_bundle_id == settings.editor_bundle_id);
        let browser_present = existing
            .iter()
            .any(|window| window.app_bundle_id == settings.browser_bundle_id);

        if !editor_present {
            if let Some(adopted) = self
                .adopt_stray_editor(project, project_id, target_workspace)
                .await
            {
                debug!(window_id = adopted, "editor adopted into workspace");
            } else {
                let request = self.editor_request(project);
                warnings.extend(self.editor.open_new_window(&request).await?);
            }
        }
        let browser_expected = if browser_present {
            true
        } else {
            self.launch_browser(project_id, project, &mut warnings).await
        };

        let editor_window_id = self
            .await_project_ready(target_workspace, browser_expected)
            .await?;

        let (detected, layout_warnings) = self.layout.detect_screen().await;
        warnings.extend(layout_warnings);
        if let Some((screen, mode)) = detected {
            self.apply_layout(project_id, target_workspace, screen, mode, &mut warnings)
                .await;
        }

        if let Err(err) = self.client.focus_window(editor_window_id).await {
            warn!(error = %err, "could not focus editor window");
            warnings.push(format!("editor window not focused ({err})"));
        }

        info!(
            project = project_id,
            editor_window_id,
            warnings = warnings.len(),
            "project active"
        );
        Ok(SelectOutcome {
            project_id: project_id.to_string(),
            workspace: target_workspace.to_string(),
            editor_window_id,
            warnings,
        })
    }

    /// A non-project origin goes onto the history stack; leaving another
    /// project snapshots that project's geometry instead of pushing.
    async fn remember_origin(
        &self,
        target_project_id: &str,
        origin: &CapturedFocus,
        warnings: &mut Vec<String>,
    ) {
        match workspace::project_id(&origin.workspace) {
            Some(source_project) if source_project != target_project_id => {
                let source_project = source_project.to_string();
                debug!(source = %source_project, "switching projects, snapshotting source");
                self.snapshot_project(&source_project, warnings).await;
            }
            Some(_) => {
                // Re-activating the project the user is already in.
            }
            None => {
                debug!(workspace = %origin.workspace, "remembering non-project origin");
                if let Err(err) = self.focus_history.push(origin.clone()) {
                    warn!(error = %err, "could not persist focus history");
                    warnings.push(format!("focus history not saved ({err})"));
                }
            }
        }
    }

    /// A stray editor window already showing the project is moved into the
    /// workspace instead of launching a duplicate. Best-effort: any failure
    /// just means a fresh launch.
    async fn adopt_stray_editor(
        &self,
        project: &ProjectConfig,
        project_id: &str,
        target_workspace: &str,
    ) -> Option<i64> {
        let marker = project_title_marker(project, project_id);
        let candidates = match self
            .client
            .list_windows(WindowScope::App(
                self.config.settings.editor_bundle_id.clone(),
            ))
            .await
        {
            Ok(windows) => windows,
            Err(err) => {
                debug!(error = %err, "stray-editor scan failed, launching instead");
                return None;
            }
        };
        let window = candidates.into_iter().find(|window| {
            !workspace::is_project_workspace(&window.workspace)
                && window.title.contains(marker.as_str())
        })?;
        info!(
            window_id = window.window_id,
            title = %window.title,
            "adopting existing editor window"
        );
        if let Err(err) = self
            .client
            .move_window(window.window_id, target_workspace, true)
            .await
        {
            warn!(window_id = window.window_id, error = %err, "adoption move failed");
            return None;
        }
        Some(window.window_id)
    }

    fn editor_request(&self, project: &ProjectConfig) -> EditorWindowRequest {
        EditorWindowRequest {
            bundle_id: self.config.settings.editor_bundle_id.clone(),
            project_path: project.path.clone(),
            remote_authority: project.remote.clone(),
            window_color: project.color.clone(),
            use_agent: project.use_agent_editor,
        }
    }

    /// Launch the browser with the project's tabs, retrying once without
    /// tabs. Browser failures never fail activation. Returns whether a
    /// browser window is expected to register in the workspace.
    async fn launch_browser(
        &self,
        project_id: &str,
        project: &ProjectConfig,
        warnings: &mut Vec<String>,
    ) -> bool {
        let bundle = &self.config.settings.browser_bundle_id;
        let urls = self.initial_tabs(project_id, project);
        match self.browser.open_new_window(bundle, &urls).await {
            Ok(()) => true,
            Err(err) if !urls.is_empty() => {
                warn!(error = %err, "tabbed browser launch failed, retrying without tabs");
                match self.browser.open_new_window(bundle, &[]).await {
                    Ok(()) => {
                        warnings
                            .push("Chrome launched without tabs (tab restore failed)".to_string());
                        true
                    }
                    Err(retry_err) => {
                        warnings.push(format!("browser window not launched ({retry_err})"));
                        false
                    }
                }
            }
            Err(err) => {
                warnings.push(format!("browser window not launched ({err})"));
                false
            }
        }
    }

    /// Snapshot tabs win over the configured URL list.
    fn initial_tabs(&self, project_id: &str, project: &ProjectConfig) -> Vec<String> {
        match self.frames.tabs(project_id) {
            Ok(tabs) if !tabs.is_empty() => tabs,
            Ok(_) => project.urls.clone(),
            Err(err) => {
                debug!(error = %err, "tab snapshot unreadable, using configured urls");
                project.urls.clone()
            }
        }
    }

    /// The window manager settles asynchronously after launch and move
    /// commands, so readiness is observed by polling: the target workspace
    /// must hold focus and contain an editor window, plus a browser window
    /// when one was launched. Probe failures keep polling; only the
    /// deadline ends it.
    async fn await_project_ready(
        &self,
        target_workspace: &str,
        expect_browser: bool,
    ) -> Result<i64> {
        let deadline = self.config.settings.poll_deadline();
        let interval = self.config.settings.poll_interval();
        let started_at = Instant::now();
        loop {
            if let Some(editor_window_id) =
                self.probe_ready(target_workspace, expect_browser).await
            {
                return Ok(editor_window_id);
            }
            if started_at.elapsed() >= deadline {
                return Err(CoreError::ActivationTimeout {
                    secs: deadline.as_secs(),
                });
            }
            tokio::time::sleep(interval).await;
        }
    }

    async fn probe_ready(&self, target_workspace: &str, expect_browser: bool) -> Option<i64> {
        let focused = match self.client.focused_workspace().await {
            Ok(focused) => focused,
            Err(err) => {
                debug!(error = %err, "focused-workspace probe failed, retrying");
                return None;
            }
        };
        if focused.as_deref() != Some(target_workspace) {
            return None;
        }
        let windows = match self
            .client
            .list_windows(WindowScope::Workspace(target_workspace.to_string()))
            .await
        {
            Ok(windows) => windows,
            Err(err) => {
                debug!(error = %err, "window probe failed, retrying");
                return None;
            }
        };
        if expect_browser
            && !windows
                .iter()
                .any(|window| window.app_bundle_id == self.config.settings.browser_bundle_id)
        {
            return None;
        }
        windows
            .iter()
            .find(|window| window.app_bundle_id == self.config.settings.editor_bundle_id)
            .map(|window| window.window_id)
    }

    async fn apply_layout(
        &self,
        project_id: &str,
        target_workspace: &str,
        screen: ScreenInfo,
        mode: ScreenMode,
        warnings: &mut Vec<String>,
    ) {
        let saved = match self.frames.saved_frames(project_id, mode) {
            Ok(saved) => saved,
            Err(err) => {
                debug!(error = %err, "saved frames unreadable, computing layout");
                None
            }
        };
        let layout = self.layout.plan(&screen, mode, saved.as_ref());

        let windows = match self
            .client
            .list_windows(WindowScope::Workspace(target_workspace.to_string()))
            .await
        {
            Ok(windows) => windows,
            Err(err) => {
                warnings.push(format!("window layout skipped ({err})"));
                return;
            }
        };
        let settings = &self.config.settings;
        let editors: Vec<WmWindow> = windows
            .iter()
            .filter(|window| window.app_bundle_id == settings.editor_bundle_id)
            .cloned()
            .collect();
        let browsers: Vec<WmWindow> = windows
            .iter()
            .filter(|window| window.app_bundle_id == settings.browser_bundle_id)
            .cloned()
            .collect();

        let outcome = self
            .layout
            .position_windows(&editors, layout.editor, &layout.visible_frame)
            .await;
        if outcome.is_partial() {
            warnings.push(position_warning("editor", outcome));
        }
        let outcome = self
            .layout
            .position_windows(&browsers, layout.browser, &layout.visible_frame)
            .await;
        if outcome.is_partial() {
            warnings.push(position_warning("browser", outcome));
        }
    }

    async fn close_inner(&self, project_id: &str, workspace_name: &str) -> Result<CloseOutcome> {
        let mut warnings = Vec::new();
        info!(project = project_id, "closing project");

        self.snapshot_project(project_id, &mut warnings).await;

        let restored = match self.restore_previous_focus(&mut warnings).await {
            Ok(restored) => Some(restored),
            Err(err) => {
                warn!(error = %err, "focus not restored");
                warnings.push(format!("previous focus not restored ({err})"));
                None
            }
        };

        if let Err(err) = self.client.close_workspace(workspace_name).await {
            warn!(error = %err, workspace = workspace_name, "workspace teardown incomplete");
            warnings.push(format!("workspace not fully closed ({err})"));
        }

        Ok(CloseOutcome {
            project_id: project_id.to_string(),
            restored,
            warnings,
        })
    }

    /// Capture the project's window geometry and browser tabs. Entirely
    /// best-effort: an unreadable editor frame skips the frame save, an
    /// unreadable browser frame saves editor-only.
    async fn snapshot_project(&self, project_id: &str, warnings: &mut Vec<String>) {
        let workspace_name = workspace::workspace_name(project_id);
        let windows = match self
            .client
            .list_windows(WindowScope::Workspace(workspace_name))
            .await
        {
            Ok(windows) => windows,
            Err(err) => {
                debug!(error = %err, "snapshot skipped, could not list windows");
                return;
            }
        };
        let settings = &self.config.settings;
        let editor = windows
            .iter()
            .find(|window| window.app_bundle_id == settings.editor_bundle_id);
        let browser = windows
            .iter()
            .find(|window| window.app_bundle_id == settings.browser_bundle_id);

        // The screen mode keys the snapshot; without one nothing is saved.
        let (detected, _) = self.layout.detect_screen().await;
        let Some((_screen, mode)) = detected else {
            debug!("snapshot skipped, no screen detected");
            return;
        };

        if let Some(editor) = editor {
            match self.positioner.frame(editor).await {
                Ok(ide_frame) => {
                    let chrome = match browser {
                        Some(window) => match self.positioner.frame(window).await {
                            Ok(frame) => Some(frame),
                            Err(err) => {
                                debug!(error = %err, "browser frame unreadable, saving editor only");
                                None
                            }
                        },
                        None => None,
                    };
                    let saved = SavedWindowFrames {
                        ide: ide_frame,
                        chrome,
                    };
                    if let Err(err) = self.frames.record_frames(project_id, mode, saved) {
                        warn!(error = %err, "could not save window frames");
                        warnings.push(format!("window frames not saved ({err})"));
                    }
                }
                Err(err) => {
                    debug!(error = %err, "editor frame unreadable, skipping frame save");
                }
            }
        }

        if let Some(window) = browser {
            match self.tabs.capture_tab_urls(&window.title).await {
                Ok(tabs) if !tabs.is_empty() => {
                    if let Err(err) = self.frames.record_tabs(project_id, tabs) {
                        debug!(error = %err, "could not save tab snapshot");
                    }
                }
                Ok(_) => debug!("no tabs captured"),
                Err(err) => debug!(error = %err, "tab capture failed"),
            }
        }
    }

    /// Three-tier focus restoration: pop the history stack, then the most
    /// recent non-project focus, then a non-project workspace preferring
    /// populated ones. A stale entry falls through to the next tier.
    async fn restore_previous_focus(&self, warnings: &mut Vec<String>) -> Result<FocusRestore> {
        match self.focus_history.pop() {
            Ok(Some(entry)) => match self.client.focus_window(entry.window_id).await {
                Ok(()) => {
                    debug!(window_id = entry.window_id, "focus restored from history");
                    return Ok(FocusRestore::HistoryWindow(entry.window_id));
                }
                Err(err) => {
                    debug!(window_id = entry.window_id, error = %err, "history entry stale");
                }
            },
            Ok(None) => debug!("focus history empty"),
            Err(err) => {
                warn!(error = %err, "focus history unreadable");
                warnings.push(format!("focus history unreadable ({err})"));
            }
        }

        if let Ok(Some(recent)) = self.focus_history.most_recent() {
            if !workspace::is_project_workspace(&recent.workspace) {
                match self.client.focus_window(recent.window_id).await {
                    Ok(()) => {
                        debug!(window_id = recent.window_id, "focus restored from most recent");
                        return Ok(FocusRestore::MostRecentWindow(recent.window_id));
                    }
                    Err(err) => {
                        debug!(window_id = recent.window_id, error = %err, "most recent focus stale");
                    }
                }
            }
        }

        let workspaces = match self.client.list_workspaces().await {
            Ok(workspaces) => workspaces,
            Err(err) => {
                debug!(error = %err, "workspace listing failed, using fixed fallback");
                Vec::new()
            }
        };
        let populated: HashSet<String> = match self.client.list_windows(WindowScope::All).await {
            Ok(windows) => windows.into_iter().map(|window| window.workspace).collect(),
            Err(err) => {
                debug!(error = %err, "window listing failed, ignoring population");
                HashSet::new()
            }
        };
        let target = workspace::preferred_non_project_workspace(&workspaces, |name| {
            populated.contains(name)
        });
        match self.client.focus_workspace(&target).await {
            Ok(()) => {
                debug!(workspace = %target, "focus restored to workspace");
                Ok(FocusRestore::Workspace(target))
            }
            Err(err) => {
                warn!(error = %err, workspace = %target, "workspace-level restore failed");
                Err(CoreError::NoPreviousWindow)
            }
        }
    }

    async fn locate_window(&self, window_id: Option<i64>) -> Result<Option<WmWindow>> {
        match window_id {
            Some(id) => Ok(self
                .client
                .list_windows(WindowScope::All)
                .await?
                .into_iter()
                .find(|window| window.window_id == id)),
            None => Ok(self.client.focused_window().await?),
        }
    }

    fn set_phase(&self, project_id: &str, phase: ProjectPhase) {
        let mut phases = self.lock_phases();
        if phase == ProjectPhase::Inactive {
            phases.remove(project_id);
        } else {
            phases.insert(project_id.to_string(), phase);
        }
    }

    fn lock_phases(&self) -> MutexGuard<'_, HashMap<String, ProjectPhase>> {
        self.phases.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Substring of the editor window title identifying the project: the last
/// path component when a path is configured, the project id otherwise.
fn project_title_marker(project: &ProjectConfig, project_id: &str) -> String {
    project
        .path
        .as_ref()
        .and_then(|path| path.file_name())
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| project_id.to_string())
}
