//! Config and state file locations, each overridable by environment.

use std::env;
use std::path::PathBuf;

use crate::error::{CoreError, Result};

pub const CONFIG_DIR_ENV: &str = "AEROPROJ_CONFIG_DIR";
pub const STATE_DIR_ENV: &str = "AEROPROJ_STATE_DIR";

pub fn config_dir() -> Result<PathBuf> {
    resolve_dir(env_override(CONFIG_DIR_ENV), &[".config", "aeroproj"])
}

pub fn state_dir() -> Result<PathBuf> {
    resolve_dir(env_override(STATE_DIR_ENV), &[".local", "state", "aeroproj"])
}

pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn focus_history_file() -> Result<PathBuf> {
    Ok(state_dir()?.join("focus_history.json"))
}

pub fn frames_file() -> Result<PathBuf> {
    Ok(state_dir()?.join("frames.json"))
}

fn env_override(var: &str) -> Option<PathBuf> {
    let value = env::var(var).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

fn resolve_dir(override_dir: Option<PathBuf>, home_relative: &[&str]) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir);
    }
    let mut dir = dirs::home_dir()
        .ok_or_else(|| CoreError::Config("could not determine home directory".to_string()))?;
    for part in home_relative {
        dir.push(part);
    }
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_over_home() {
        let dir = resolve_dir(Some(PathBuf::from("/tmp/aeroproj-test")), &[".config"])
            .expect("resolve");
        assert_eq!(dir, PathBuf::from("/tmp/aeroproj-test"));
    }

    #[test]
    fn falls_back_to_home_relative_path() {
        if let Ok(dir) = resolve_dir(None, &[".config", "aeroproj"]) {
            assert!(dir.ends_with(".config/aeroproj"));
        }
    }
}
