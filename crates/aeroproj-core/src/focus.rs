//! Focus history: where the user was before a project swallowed the screen.
//!
//! A bounded stack of captured foci plus a `most_recent` pointer, persisted
//! as one JSON document. The stack answers "take me back where I came from";
//! `most_recent` is the fallback when the stack has nothing usable. Entries
//! age out and the stack is trimmed to capacity on every load and save.

use std::fs;
use std::path::PathBuf;

use aero_client::AeroClient;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, Result};

pub const FOCUS_HISTORY_VERSION: u32 = 1;

fn default_focus_history_version() -> u32 {
    FOCUS_HISTORY_VERSION
}

/// A window that held focus at a point in time. Never mutated after capture;
/// consumed when focus is restored to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedFocus {
    pub window_id: i64,
    pub app_bundle_id: String,
    pub workspace: String,
    pub captured_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusHistoryState {
    #[serde(default = "default_focus_history_version")]
    pub version: u32,
    #[serde(default)]
    pub stack: Vec<CapturedFocus>,
    #[serde(default)]
    pub most_recent: Option<CapturedFocus>,
}

impl Default for FocusHistoryState {
    fn default() -> Self {
        Self {
            version: FOCUS_HISTORY_VERSION,
            stack: Vec::new(),
            most_recent: None,
        }
    }
}

/// Owns the focus-history file. Mutating operations are whole-document
/// read-modify-writes; last writer wins at the file level.
pub struct FocusHistoryStore {
    path: PathBuf,
    capacity: usize,
    max_age: Duration,
}

impl FocusHistoryStore {
    pub fn new(path: PathBuf, capacity: usize, max_age: Duration) -> Self {
        Self {
            path,
            capacity,
            max_age,
        }
    }

    pub fn load(&self) -> Result<FocusHistoryState> {
        if !self.path.exists() {
            return Ok(FocusHistoryState::default());
        }
        let raw = fs::read_to_string(&self.path)
            .map_err(|err| CoreError::State(format!("read {}: {err}", self.path.display())))?;
        let mut state: FocusHistoryState = serde_json::from_str(&raw)
            .map_err(|err| CoreError::State(format!("parse {}: {err}", self.path.display())))?;
        if state.version > FOCUS_HISTORY_VERSION {
            return Err(CoreError::StateVersion {
                found: state.version,
                supported: FOCUS_HISTORY_VERSION,
            });
        }
        self.prune(&mut state);
        Ok(state)
    }

    pub fn save(&self, state: &mut FocusHistoryState) -> Result<()> {
        self.prune(state);
        state.version = FOCUS_HISTORY_VERSION;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                CoreError::State(format!("create {}: {err}", parent.display()))
            })?;
        }
        let serialized = serde_json::to_string_pretty(state)
            .map_err(|err| CoreError::State(format!("serialize focus history: {err}")))?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serialized)
            .map_err(|err| CoreError::State(format!("write {}: {err}", tmp_path.display())))?;
        fs::rename(&tmp_path, &self.path)
            .map_err(|err| CoreError::State(format!("rename {}: {err}", self.path.display())))?;
        Ok(())
    }

    /// Push onto the stack, evicting the oldest entry once over capacity.
    pub fn push(&self, entry: CapturedFocus) -> Result<()> {
        let mut state = self.load()?;
        state.stack.push(entry);
        while state.stack.len() > self.capacity {
            state.stack.remove(0);
        }
        self.save(&mut state)
    }

    /// Pop the newest entry, removing it from the persisted stack.
    pub fn pop(&self) -> Result<Option<CapturedFocus>> {
        let mut state = self.load()?;
        let entry = state.stack.pop();
        if entry.is_some() {
            self.save(&mut state)?;
        }
        Ok(entry)
    }

    pub fn most_recent(&self) -> Result<Option<CapturedFocus>> {
        Ok(self.load()?.most_recent)
    }

    /// Record the last focus observed without touching the stack.
    pub fn record_most_recent(&self, entry: CapturedFocus) -> Result<()> {
        let mut state = self.load()?;
        state.most_recent = Some(entry);
        self.save(&mut state)
    }

    /// Ask the window manager for the focused window and remember it as
    /// `most_recent`. Query failures are not errors; focus capture is always
    /// best-effort.
    pub async fn capture_current(&self, client: &AeroClient) -> Result<Option<CapturedFocus>> {
        let window = match client.focused_window().await {
            Ok(Some(window)) => window,
            Ok(None) => return Ok(None),
            Err(err) => {
                debug!(error = %err, "focused-window query failed, skipping capture");
                return Ok(None);
            }
        };
        let entry = CapturedFocus {
            window_id: window.window_id,
            app_bundle_id: window.app_bundle_id,
            workspace: window.workspace,
            captured_at: Utc::now(),
        };
        self.record_most_recent(entry.clone())?;
        Ok(Some(entry))
    }

    fn prune(&self, state: &mut FocusHistoryState) {
        let cutoff = Utc::now() - self.max_age;
        state.stack.retain(|entry| entry.captured_at >= cutoff);
        while state.stack.len() > self.capacity {
            state.stack.remove(0);
        }
        if let Some(recent) = &state.most_recent {
            if recent.captured_at < cutoff {
                state.most_recent = None;
            }
        }
    }
}
