//! Locating the `aerospace` binary.
//!
//! Resolution order: explicit env override, then `$PATH`, then the handful of
//! directories package managers install into without touching `$PATH`.

use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

/// Overrides binary resolution with an absolute path or a bare name.
pub const AEROSPACE_BIN_ENV: &str = "AEROPROJ_AEROSPACE_BIN";

const AEROSPACE_BIN_NAME: &str = "aerospace";

pub fn find_aerospace_executable() -> Option<PathBuf> {
    if let Some(path) = resolve_bin_from_env() {
        return Some(path);
    }

    if let Ok(path) = which::which(AEROSPACE_BIN_NAME) {
        return Some(path);
    }

    find_in_common_bins(AEROSPACE_BIN_NAME)
}

fn resolve_bin_from_env() -> Option<PathBuf> {
    let value = env::var(AEROSPACE_BIN_ENV).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let candidate = PathBuf::from(trimmed);
    if candidate.exists() && candidate.is_file() {
        return Some(candidate);
    }
    which::which(trimmed).ok()
}

fn find_in_common_bins(name: &str) -> Option<PathBuf> {
    for dir in common_bin_dirs() {
        let candidate = dir.join(name);
        if candidate.exists() && candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

fn common_bin_dirs() -> Vec<PathBuf> {
    let mut dirs_out = Vec::new();
    let mut seen = HashSet::new();
    let mut push = |path: PathBuf| {
        if seen.insert(path.clone()) {
            dirs_out.push(path);
        }
    };

    push(PathBuf::from("/opt/homebrew/bin"));
    push(PathBuf::from("/usr/local/bin"));
    push(PathBuf::from("/run/current-system/sw/bin"));

    if let Some(home) = dirs::home_dir() {
        push(home.join(".local/bin"));
        push(home.join("Applications/AeroSpace.app/Contents/MacOS"));
    }
    push(PathBuf::from(
        "/Applications/AeroSpace.app/Contents/MacOS",
    ));

    dirs_out
}
