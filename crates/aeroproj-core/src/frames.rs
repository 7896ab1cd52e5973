//! Persisted per-project window geometry and captured browser tabs.
//!
//! Snapshots are keyed by `(project, screen mode)` so a project carries one
//! layout per display class. A snapshot with only an editor frame is a
//! legitimate partial save, distinct from no snapshot at all.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::layout::{Frame, ScreenMode};

pub const FRAMES_VERSION: u32 = 1;

fn default_frames_version() -> u32 {
    FRAMES_VERSION
}

/// Window geometry captured at close time. `chrome` is absent when the
/// browser frame could not be read (partial save).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedWindowFrames {
    pub ide: Frame,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome: Option<Frame>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    /// Keyed by screen-mode name (`wide` / `narrow`).
    #[serde(default)]
    pub frames: BTreeMap<String, SavedWindowFrames>,
    /// Chrome tab URLs captured on the last close, replayed on the next
    /// activation.
    #[serde(default)]
    pub tabs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FramesState {
    #[serde(default = "default_frames_version")]
    pub version: u32,
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectSnapshot>,
}

impl Default for FramesState {
    fn default() -> Self {
        Self {
            version: FRAMES_VERSION,
            projects: BTreeMap::new(),
        }
    }
}

pub struct FrameStore {
    path: PathBuf,
}

impl FrameStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<FramesState> {
        if !self.path.exists() {
            return Ok(FramesState::default());
        }
        let raw = fs::read_to_string(&self.path)
            .map_err(|err| CoreError::State(format!("read {}: {err}", self.path.display())))?;
        let state: FramesState = serde_json::from_str(&raw)
            .map_err(|err| CoreError::State(format!("parse {}: {err}", self.path.display())))?;
        if state.version > FRAMES_VERSION {
            return Err(CoreError::StateVersion {
                found: state.version,
                supported: FRAMES_VERSION,
            });
        }
        Ok(state)
    }

    pub fn save(&self, state: &FramesState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| CoreError::State(format!("create {}: {err}", parent.display())))?;
        }
        let serialized = serde_json::to_string_pretty(state)
            .map_err(|err| CoreError::State(format!("serialize frames: {err}")))?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serialized)
            .map_err(|err| CoreError::State(format!("write {}: {err}", tmp_path.display())))?;
        fs::rename(&tmp_path, &self.path)
            .map_err(|err| CoreError::State(format!("rename {}: {err}", self.path.display())))?;
        Ok(())
    }

    pub fn saved_frames(
        &self,
        project_id: &str,
        mode: ScreenMode,
    ) -> Result<Option<SavedWindowFrames>> {
        Ok(self
            .load()?
            .projects
            .get(project_id)
            .and_then(|snapshot| snapshot.frames.get(mode.as_str()))
            .copied())
    }

    pub fn record_frames(
        &self,
        project_id: &str,
        mode: ScreenMode,
        frames: SavedWindowFrames,
    ) -> Result<()> {
        let mut state = self.load()?;
        state
            .projects
            .entry(project_id.to_string())
            .or_default()
            .frames
            .insert(mode.as_str().to_string(), frames);
        self.save(&state)
    }

    pub fn tabs(&self, project_id: &str) -> Result<Vec<String>> {
        Ok(self
            .load()?
            .projects
            .get(project_id)
            .map(|snapshot| snapshot.tabs.clone())
            .unwrap_or_default())
    }

    pub fn record_tabs(&self, project_id: &str, tabs: Vec<String>) -> Result<()> {
        let mut state = self.load()?;
        state
            .projects
            .entry(project_id.to_string())
            .or_default()
            .tabs = tabs;
        self.save(&state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &tempfile::TempDir) -> FrameStore {
        FrameStore::new(dir.path().join("frames.json"))
    }

    fn frames(chrome: Option<Frame>) -> SavedWindowFrames {
        SavedWindowFrames {
            ide: Frame::new(0.0, 25.0, 1000.0, 900.0),
            chrome,
        }
    }

    #[test]
    fn records_and_reads_frames_per_mode() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store(&dir);
        let wide = frames(Some(Frame::new(1000.0, 25.0, 700.0, 900.0)));
        let narrow = frames(None);

        store.record_frames("web", ScreenMode::Wide, wide).expect("record");
        store
            .record_frames("web", ScreenMode::Narrow, narrow)
            .expect("record");

        assert_eq!(
            store.saved_frames("web", ScreenMode::Wide).expect("load"),
            Some(wide)
        );
        assert_eq!(
            store.saved_frames("web", ScreenMode::Narrow).expect("load"),
            Some(narrow)
        );
        assert_eq!(store.saved_frames("api", ScreenMode::Wide).expect("load"), None);
    }

    #[test]
    fn partial_save_round_trips_without_chrome() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store(&dir);
        store
            .record_frames("web", ScreenMode::Wide, frames(None))
            .expect("record");

        let loaded = store
            .saved_frames("web", ScreenMode::Wide)
            .expect("load")
            .expect("present");
        assert!(loaded.chrome.is_none());
    }

    #[test]
    fn tabs_round_trip_and_default_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store(&dir);
        assert!(store.tabs("web").expect("load").is_empty());

        let urls = vec![
            "http://localhost:3000".to_string(),
            "https://docs.rs".to_string(),
        ];
        store.record_tabs("web", urls.clone()).expect("record");
        assert_eq!(store.tabs("web").expect("load"), urls);
    }

    #[test]
    fn newer_version_is_a_hard_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("frames.json");
        std::fs::write(&path, r#"{"version": 99, "projects": {}}"#).expect("write");

        let store = FrameStore::new(path);
        assert!(matches!(
            store.load(),
            Err(CoreError::StateVersion { found: 99, .. })
        ));
    }

    #[test]
    fn frames_and_tabs_coexist_per_project() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store(&dir);
        store
            .record_frames("web", ScreenMode::Wide, frames(None))
            .expect("record");
        store
            .record_tabs("web", vec!["https://crates.io".to_string()])
            .expect("record");

        let state = store.load().expect("load");
        let snapshot = state.projects.get("web").expect("snapshot");
        assert_eq!(snapshot.frames.len(), 1);
        assert_eq!(snapshot.tabs.len(), 1);
    }
}
