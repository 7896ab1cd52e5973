//! TOML configuration: global tunables plus the per-project table.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Tunables with defaults matching a stock setup. Every field has a serde
/// default so a partial file works.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Physical width at or above which a screen counts as wide, in points.
    pub wide_screen_min_width: f64,
    /// Assumed physical width when detection cannot report one.
    pub fallback_screen_width: f64,
    pub command_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub poll_deadline_secs: u64,
    pub breaker_cooldown_secs: u64,
    pub history_capacity: usize,
    pub history_max_age_days: i64,
    pub editor_bundle_id: String,
    pub browser_bundle_id: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wide_screen_min_width: 1800.0,
            fallback_screen_width: 1728.0,
            command_timeout_secs: 10,
            poll_interval_ms: 500,
            poll_deadline_secs: 15,
            breaker_cooldown_secs: 30,
            history_capacity: 10,
            history_max_age_days: 7,
            editor_bundle_id: "com.microsoft.VSCode".to_string(),
            browser_bundle_id: "com.google.Chrome".to_string(),
        }
    }
}

impl Settings {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn poll_deadline(&self) -> Duration {
        Duration::from_secs(self.poll_deadline_secs)
    }

    pub fn breaker_cooldown(&self) -> Duration {
        Duration::from_secs(self.breaker_cooldown_secs)
    }

    pub fn history_max_age(&self) -> chrono::Duration {
        chrono::Duration::try_days(self.history_max_age_days).unwrap_or(chrono::Duration::MAX)
    }
}

/// One `[projects.<id>]` table entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Optional editor window tint, agent CLI only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Optional remote authority, e.g. `ssh-remote+dev`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    #[serde(default)]
    pub use_agent_editor: bool,
    /// Browser tabs opened when no snapshot exists for the project.
    #[serde(default)]
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub settings: Settings,
    pub projects: BTreeMap<String, ProjectConfig>,
}

impl Config {
    /// Missing file yields the defaults with an empty project table.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .map_err(|err| CoreError::Config(format!("read {}: {err}", path.display())))?;
        toml::from_str(&raw)
            .map_err(|err| CoreError::Config(format!("parse {}: {err}", path.display())))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| CoreError::Config(format!("create {}: {err}", parent.display())))?;
        }
        let serialized = toml::to_string_pretty(self)
            .map_err(|err| CoreError::Config(format!("serialize config: {err}")))?;
        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, serialized)
            .map_err(|err| CoreError::Config(format!("write {}: {err}", tmp_path.display())))?;
        fs::rename(&tmp_path, path)
            .map_err(|err| CoreError::Config(format!("rename {}: {err}", path.display())))?;
        Ok(())
    }

    /// Starter document written by `init`: stock settings plus one example
    /// project entry to edit.
    pub fn starter() -> Self {
        let mut projects = BTreeMap::new();
        projects.insert(
            "example".to_string(),
            ProjectConfig {
                path: Some(PathBuf::from("/Users/me/src/example")),
                urls: vec!["http://localhost:3000".to_string()],
                ..ProjectConfig::default()
            },
        );
        Self {
            settings: Settings::default(),
            projects,
        }
    }

    pub fn project(&self, project_id: &str) -> Result<&ProjectConfig> {
        self.projects
            .get(project_id)
            .ok_or_else(|| CoreError::UnknownProject(project_id.to_string()))
    }
}
