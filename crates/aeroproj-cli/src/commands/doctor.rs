//! `aeroproj doctor [--json]`: diagnose the window-manager binary, the
//! config file, and the state files without modifying any of them.

use std::path::{Path, PathBuf};

use aero_client::{AeroClient, find_aerospace_executable};
use aeroproj_core::{Config, FocusHistoryStore, FrameStore};
use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::context::{self, CliPaths};

#[derive(Args)]
pub struct DoctorArgs {
    /// Emit the report as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct DoctorReport {
    aerospace: AerospaceCheck,
    config: ConfigCheck,
    focus_history: StateFileCheck,
    frames: StateFileCheck,
}

#[derive(Serialize)]
struct AerospaceCheck {
    binary: Option<PathBuf>,
    reachable: bool,
    workspaces: usize,
    /// Cooldown remaining when the reachability probe tripped the breaker.
    breaker_open_secs: Option<u64>,
    error: Option<String>,
}

#[derive(Serialize)]
struct ConfigCheck {
    path: PathBuf,
    exists: bool,
    projects: usize,
    error: Option<String>,
}

#[derive(Serialize)]
struct StateFileCheck {
    path: PathBuf,
    exists: bool,
    entries: usize,
    error: Option<String>,
}

impl DoctorReport {
    /// Missing files are informational; broken ones count.
    fn problem_count(&self) -> usize {
        let mut problems = 0;
        if self.aerospace.binary.is_none() || !self.aerospace.reachable {
            problems += 1;
        }
        if self.config.error.is_some() {
            problems += 1;
        }
        if self.focus_history.error.is_some() {
            problems += 1;
        }
        if self.frames.error.is_some() {
            problems += 1;
        }
        problems
    }
}

pub async fn run(config_dir: Option<&Path>, args: DoctorArgs) -> Result<()> {
    let cli_paths = context::resolve_paths(config_dir)?;
    let report = build_report(&cli_paths).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}

async fn build_report(cli_paths: &CliPaths) -> DoctorReport {
    let (config, config_check) = check_config(&cli_paths.config_file);
    let aerospace = check_aerospace(&config).await;
    let focus_history = check_focus_history(&cli_paths.focus_history_file, &config);
    let frames = check_frames(&cli_paths.frames_file);
    DoctorReport {
        aerospace,
        config: config_check,
        focus_history,
        frames,
    }
}

/// A parse failure still yields usable settings so the remaining checks can
/// run with the defaults.
fn check_config(path: &Path) -> (Config, ConfigCheck) {
    let exists = path.exists();
    match Config::load_from(path) {
        Ok(config) => {
            let check = ConfigCheck {
                path: path.to_path_buf(),
                exists,
                projects: config.projects.len(),
                error: None,
            };
            (config, check)
        }
        Err(err) => {
            let check = ConfigCheck {
                path: path.to_path_buf(),
                exists,
                projects: 0,
                error: Some(err.to_string()),
            };
            (Config::default(), check)
        }
    }
}

async fn check_aerospace(config: &Config) -> AerospaceCheck {
    let Some(bin) = find_aerospace_executable() else {
        return AerospaceCheck {
            binary: None,
            reachable: false,
            workspaces: 0,
            breaker_open_secs: None,
            error: Some(format!(
                "binary not found (install AeroSpace or set {})",
                aero_client::AEROSPACE_BIN_ENV
            )),
        };
    };
    let client = AeroClient::new(
        bin.clone(),
        config.settings.command_timeout(),
        config.settings.breaker_cooldown(),
    );
    match client.list_workspaces().await {
        Ok(workspaces) => AerospaceCheck {
            binary: Some(bin),
            reachable: true,
            workspaces: workspaces.len(),
            breaker_open_secs: None,
            error: None,
        },
        Err(err) => AerospaceCheck {
            binary: Some(bin),
            reachable: false,
            workspaces: 0,
            breaker_open_secs: client
                .breaker()
                .remaining_cooldown()
                .map(|cooldown| cooldown.as_secs()),
            error: Some(err.to_string()),
        },
    }
}

fn check_focus_history(path: &Path, config: &Config) -> StateFileCheck {
    let store = FocusHistoryStore::new(
        path.to_path_buf(),
        config.settings.history_capacity,
        config.settings.history_max_age(),
    );
    match store.load() {
        Ok(state) => StateFileCheck {
            path: path.to_path_buf(),
            exists: path.exists(),
            entries: state.stack.len(),
            error: None,
        },
        Err(err) => StateFileCheck {
            path: path.to_path_buf(),
            exists: path.exists(),
            entries: 0,
            error: Some(err.to_string()),
        },
    }
}

fn check_frames(path: &Path) -> StateFileCheck {
    let store = FrameStore::new(path.to_path_buf());
    match store.load() {
        Ok(state) => StateFileCheck {
            path: path.to_path_buf(),
            exists: path.exists(),
            entries: state.projects.len(),
            error: None,
        },
        Err(err) => StateFileCheck {
            path: path.to_path_buf(),
            exists: path.exists(),
            entries: 0,
            error: Some(err.to_string()),
        },
    }
}

fn render_text(report: &DoctorReport) -> String {
    let mut out = String::new();
    out.push_str("Aeroproj Doctor\n");
    out.push_str("===============\n\n");

    out.push_str("AeroSpace:\n");
    match (&report.aerospace.binary, report.aerospace.reachable) {
        (Some(bin), true) => {
            out.push_str(&format!(
                "  [OK] {} ({} workspace(s))\n",
                bin.display(),
                report.aerospace.workspaces
            ));
        }
        (Some(bin), false) => {
            let reason = report.aerospace.error.as_deref().unwrap_or("unreachable");
            out.push_str(&format!("  [--] {} ({reason})\n", bin.display()));
        }
        (None, _) => {
            let reason = report
                .aerospace
                .error
                .as_deref()
                .unwrap_or("binary not found");
            out.push_str(&format!("  [--] {reason}\n"));
        }
    }
    match report.aerospace.breaker_open_secs {
        Some(secs) => out.push_str(&format!(
            "  [--] circuit breaker open ({secs}s cooldown remaining)\n"
        )),
        None => out.push_str("  [OK] circuit breaker closed\n"),
    }

    out.push_str("\nConfig:\n");
    out.push_str(&render_file_row(
        &report.config.path,
        report.config.exists,
        report.config.error.as_deref(),
        &format!("{} project(s)", report.config.projects),
        "missing, defaults in effect",
    ));

    out.push_str("\nState:\n");
    out.push_str(&render_file_row(
        &report.focus_history.path,
        report.focus_history.exists,
        report.focus_history.error.as_deref(),
        &format!("{} stack entry(ies)", report.focus_history.entries),
        "missing, starts empty",
    ));
    out.push_str(&render_file_row(
        &report.frames.path,
        report.frames.exists,
        report.frames.error.as_deref(),
        &format!("{} project snapshot(s)", report.frames.entries),
        "missing, starts empty",
    ));

    out.push_str("\nSummary:\n");
    match report.problem_count() {
        0 => out.push_str("  No problems found\n"),
        n => out.push_str(&format!("  {n} problem(s) found\n")),
    }
    out
}

fn render_file_row(
    path: &Path,
    exists: bool,
    error: Option<&str>,
    ok_detail: &str,
    missing_detail: &str,
) -> String {
    match (exists, error) {
        (_, Some(reason)) => format!("  [--] {} ({reason})\n", path.display()),
        (true, None) => format!("  [OK] {} ({ok_detail})\n", path.display()),
        (false, None) => format!("  [OK] {} ({missing_detail})\n", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy_report() -> DoctorReport {
        DoctorReport {
            aerospace: AerospaceCheck {
                binary: Some(PathBuf::from("/opt/homebrew/bin/aerospace")),
                reachable: true,
                workspaces: 4,
                breaker_open_secs: None,
                error: None,
            },
            config: ConfigCheck {
                path: PathBuf::from("/home/me/.config/aeroproj/config.toml"),
                exists: true,
                projects: 2,
                error: None,
            },
            focus_history: StateFileCheck {
                path: PathBuf::from("/home/me/.local/state/aeroproj/focus_history.json"),
                exists: false,
                entries: 0,
                error: None,
            },
            frames: StateFileCheck {
                path: PathBuf::from("/home/me/.local/state/aeroproj/frames.json"),
                exists: true,
                entries: 1,
                error: None,
            },
        }
    }

    #[test]
    fn healthy_report_renders_all_ok() {
        let text = render_text(&healthy_report());
        assert!(text.starts_with("Aeroproj Doctor\n===============\n"));
        assert!(text.contains("[OK] /opt/homebrew/bin/aerospace (4 workspace(s))"));
        assert!(text.contains("[OK] circuit breaker closed"));
        assert!(text.contains("(2 project(s))"));
        assert!(text.contains("(missing, starts empty)"));
        assert!(text.contains("(1 project snapshot(s))"));
        assert!(text.contains("No problems found"));
        assert!(!text.contains("[--]"));
    }

    #[test]
    fn missing_binary_and_broken_config_are_counted() {
        let mut report = healthy_report();
        report.aerospace = AerospaceCheck {
            binary: None,
            reachable: false,
            workspaces: 0,
            breaker_open_secs: None,
            error: Some("binary not found (install AeroSpace or set AEROPROJ_AEROSPACE_BIN)".to_string()),
        };
        report.config.error = Some("parse config.toml: expected table".to_string());

        let text = render_text(&report);
        assert!(text.contains("[--] binary not found"));
        assert!(text.contains("[--] /home/me/.config/aeroproj/config.toml (parse config.toml"));
        assert!(text.contains("2 problem(s) found"));
    }

    #[test]
    fn open_breaker_shows_remaining_cooldown() {
        let mut report = healthy_report();
        report.aerospace.reachable = false;
        report.aerospace.error = Some("command timed out after 10s".to_string());
        report.aerospace.breaker_open_secs = Some(27);

        let text = render_text(&report);
        assert!(text.contains("circuit breaker open (27s cooldown remaining)"));
        assert!(text.contains("1 problem(s) found"));
    }

    #[test]
    fn missing_state_files_are_not_problems() {
        let mut report = healthy_report();
        report.focus_history.exists = false;
        report.frames.exists = false;
        report.frames.entries = 0;

        assert_eq!(report.problem_count(), 0);
    }

    #[test]
    fn corrupt_state_file_is_a_problem() {
        let mut report = healthy_report();
        report.frames.error = Some("parse frames.json: key must be a string".to_string());

        assert_eq!(report.problem_count(), 1);
        let text = render_text(&report);
        assert!(text.contains("[--] /home/me/.local/state/aeroproj/frames.json (parse frames.json"));
    }

    #[test]
    fn config_check_reports_parse_failure_and_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "settings = 3").expect("write");

        let (config, check) = check_config(&path);
        assert!(check.exists);
        assert!(check.error.is_some());
        assert_eq!(check.projects, 0);
        assert_eq!(config.settings.history_capacity, 10);
    }

    #[test]
    fn state_checks_read_entry_counts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let focus_path = dir.path().join("focus_history.json");
        let frames_path = dir.path().join("frames.json");
        std::fs::write(
            &focus_path,
            r#"{"version": 1, "stack": [], "most_recent": null}"#,
        )
        .expect("write");
        std::fs::write(&frames_path, "{oops").expect("write");

        let config = Config::default();
        let focus = check_focus_history(&focus_path, &config);
        assert!(focus.error.is_none());
        assert_eq!(focus.entries, 0);

        let frames = check_frames(&frames_path);
        assert!(frames.error.is_some());
    }
}
