//! Launch collaborators: editor windows, browser windows, tab capture.
//!
//! Each collaborator is a narrow async trait so the orchestrator can be
//! exercised against scripted fakes. The production implementations shell out
//! through the shared `CommandRunner`, never through a direct spawn.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use aero_client::{CommandOutput, CommandRunner, CommandSpec};
use async_trait::async_trait;
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::position::applescript_string;

/// Everything needed to open one project editor window.
#[derive(Debug, Clone)]
pub struct EditorWindowRequest {
    pub bundle_id: String,
    pub project_path: Option<PathBuf>,
    pub remote_authority: Option<String>,
    pub window_color: Option<String>,
    /// Launch through the agent-layer CLI instead of the app bundle.
    pub use_agent: bool,
}

#[async_trait]
pub trait EditorLauncher: Send + Sync {
    /// Opens a new editor window. Returns any non-fatal warnings; an error
    /// means no window was opened.
    async fn open_new_window(&self, request: &EditorWindowRequest) -> Result<Vec<String>>;
}

#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// Opens a new browser window with `urls` as its initial tabs.
    async fn open_new_window(&self, bundle_id: &str, urls: &[String]) -> Result<()>;
}

#[async_trait]
pub trait TabCapture: Send + Sync {
    /// URLs of every tab in the browser window bearing `window_title`.
    async fn capture_tab_urls(&self, window_title: &str) -> Result<Vec<String>>;
}

/// Editor launcher backed by `open(1)`, with an optional agent-layer CLI for
/// projects that request it. When the agent CLI is requested but was not
/// found on this machine, the launch degrades to the direct form and reports
/// a warning instead of failing.
pub struct MacEditorLauncher {
    runner: Arc<dyn CommandRunner>,
    timeout: Duration,
    agent_cli: Option<PathBuf>,
}

impl MacEditorLauncher {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        timeout: Duration,
        agent_cli: Option<PathBuf>,
    ) -> Self {
        Self {
            runner,
            timeout,
            agent_cli,
        }
    }

    async fn run_checked(&self, spec: CommandSpec) -> Result<()> {
        let label = spec.program.display().to_string();
        let output = self
            .runner
            .run(spec)
            .await
            .map_err(|err| CoreError::EditorLaunch(err.to_string()))?;
        if !output.success() {
            return Err(CoreError::EditorLaunch(format!(
                "{label} exited with code {}: {}",
                output.exit_code,
                output.stderr.trim()
            )));
        }
        Ok(())
    }

    fn direct_spec(&self, request: &EditorWindowRequest) -> CommandSpec {
        let mut args = vec![
            "-n".to_string(),
            "-b".to_string(),
            request.bundle_id.clone(),
            "--args".to_string(),
            "--new-window".to_string(),
        ];
        if let Some(authority) = &request.remote_authority {
            args.push("--remote".to_string());
            args.push(authority.clone());
        }
        if let Some(path) = &request.project_path {
            args.push(path.display().to_string());
        }
        CommandSpec::new("/usr/bin/open", args, self.timeout)
    }

    fn agent_spec(&self, cli: &Path, request: &EditorWindowRequest) -> CommandSpec {
        let mut args = vec!["--new-window".to_string()];
        if let Some(authority) = &request.remote_authority {
            args.push("--remote".to_string());
            args.push(authority.clone());
        }
        if let Some(color) = &request.window_color {
            args.push("--window-color".to_string());
            args.push(color.clone());
        }
        if let Some(path) = &request.project_path {
            args.push(path.display().to_string());
        }
        CommandSpec::new(cli, args, self.timeout)
    }
}

#[async_trait]
impl EditorLauncher for MacEditorLauncher {
    async fn open_new_window(&self, request: &EditorWindowRequest) -> Result<Vec<String>> {
        let mut warnings = Vec::new();
        if request.use_agent {
            match &self.agent_cli {
                Some(cli) => {
                    debug!(cli = %cli.display(), "launching editor through agent CLI");
                    self.run_checked(self.agent_spec(cli, request)).await?;
                    return Ok(warnings);
                }
                None => warnings.push(
                    "agent editor CLI not found, launching editor directly".to_string(),
                ),
            }
        }
        if request.window_color.is_some() {
            // Only the agent CLI understands the color flag.
            debug!("skipping window color for direct editor launch");
        }
        debug!(bundle = %request.bundle_id, "launching editor through open");
        self.run_checked(self.direct_spec(request)).await?;
        Ok(warnings)
    }
}

/// Browser launcher backed by `open(1)`. The URL list rides along as the new
/// window's initial tabs.
pub struct MacBrowserLauncher {
    runner: Arc<dyn CommandRunner>,
    timeout: Duration,
}

impl MacBrowserLauncher {
    pub fn new(runner: Arc<dyn CommandRunner>, timeout: Duration) -> Self {
        Self { runner, timeout }
    }
}

#[async_trait]
impl BrowserLauncher for MacBrowserLauncher {
    async fn open_new_window(&self, bundle_id: &str, urls: &[String]) -> Result<()> {
        let mut args = vec![
            "-n".to_string(),
            "-b".to_string(),
            bundle_id.to_string(),
            "--args".to_string(),
            "--new-window".to_string(),
        ];
        args.extend(urls.iter().cloned());
        debug!(bundle = bundle_id, tabs = urls.len(), "launching browser window");
        let output = self
            .runner
            .run(CommandSpec::new("/usr/bin/open", args, self.timeout))
            .await
            .map_err(|err| CoreError::Launch(err.to_string()))?;
        check_launch(&output, "open")
    }
}

/// Reads the open tab URLs of a browser window over AppleScript. Used only
/// when snapshotting an outgoing project; callers downgrade every failure.
pub struct OsascriptTabCapture {
    runner: Arc<dyn CommandRunner>,
    timeout: Duration,
    browser_bundle_id: String,
}

impl OsascriptTabCapture {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        timeout: Duration,
        browser_bundle_id: String,
    ) -> Self {
        Self {
            runner,
            timeout,
            browser_bundle_id,
        }
    }
}

#[async_trait]
impl TabCapture for OsascriptTabCapture {
    async fn capture_tab_urls(&self, window_title: &str) -> Result<Vec<String>> {
        let script = format!(
            "tell application id {} to get URL of tabs of (first window whose name is {})",
            applescript_string(&self.browser_bundle_id),
            applescript_string(window_title),
        );
        let spec = CommandSpec::new("osascript", vec!["-e".to_string(), script], self.timeout);
        let output = self
            .runner
            .run(spec)
            .await
            .map_err(|err| CoreError::Launch(err.to_string()))?;
        if !output.success() {
            return Err(CoreError::Launch(format!(
                "tab capture failed: {}",
                output.stderr.trim()
            )));
        }
        Ok(parse_tab_urls(&output.stdout))
    }
}

fn check_launch(output: &CommandOutput, label: &str) -> Result<()> {
    if output.success() {
        Ok(())
    } else {
        Err(CoreError::Launch(format!(
            "{label} exited with code {}: {}",
            output.exit_code,
            output.stderr.trim()
        )))
    }
}

/// osascript renders an AppleScript list as `url, url, url` on one line.
fn parse_tab_urls(raw: &str) -> Vec<String> {
    raw.trim()
        .split(", ")
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct RecordingRunner {
        calls: Mutex<Vec<CommandSpec>>,
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(&self, spec: CommandSpec) -> aero_client::Result<CommandOutput> {
            self.calls.lock().expect("lock").push(spec);
            Ok(CommandOutput {
                exit_code: 0,
                stdout: String::new(),
                stderr: String::new(),
                duration_ms: 1,
            })
        }
    }

    fn request() -> EditorWindowRequest {
        EditorWindowRequest {
            bundle_id: "com.microsoft.VSCode".to_string(),
            project_path: Some(PathBuf::from("/Users/me/src/web")),
            remote_authority: None,
            window_color: None,
            use_agent: false,
        }
    }

    #[tokio::test]
    async fn direct_launch_goes_through_open() {
        let runner = Arc::new(RecordingRunner::default());
        let launcher = MacEditorLauncher::new(runner.clone(), Duration::from_secs(5), None);

        let warnings = launcher.open_new_window(&request()).await.expect("launch");
        assert!(warnings.is_empty());

        let calls = runner.calls.lock().expect("lock");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, PathBuf::from("/usr/bin/open"));
        assert_eq!(
            calls[0].args,
            vec![
                "-n",
                "-b",
                "com.microsoft.VSCode",
                "--args",
                "--new-window",
                "/Users/me/src/web",
            ]
        );
    }

    #[tokio::test]
    async fn agent_launch_uses_cli_with_remote_and_color() {
        let runner = Arc::new(RecordingRunner::default());
        let launcher = MacEditorLauncher::new(
            runner.clone(),
            Duration::from_secs(5),
            Some(PathBuf::from("/usr/local/bin/agent-code")),
        );
        let mut request = request();
        request.use_agent = true;
        request.remote_authority = Some("ssh-remote+dev".to_string());
        request.window_color = Some("#d08770".to_string());

        launcher.open_new_window(&request).await.expect("launch");

        let calls = runner.calls.lock().expect("lock");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, PathBuf::from("/usr/local/bin/agent-code"));
        assert_eq!(
            calls[0].args,
            vec![
                "--new-window",
                "--remote",
                "ssh-remote+dev",
                "--window-color",
                "#d08770",
                "/Users/me/src/web",
            ]
        );
    }

    #[tokio::test]
    async fn missing_agent_cli_degrades_to_direct_launch_with_warning() {
        let runner = Arc::new(RecordingRunner::default());
        let launcher = MacEditorLauncher::new(runner.clone(), Duration::from_secs(5), None);
        let mut request = request();
        request.use_agent = true;

        let warnings = launcher.open_new_window(&request).await.expect("launch");
        assert_eq!(
            warnings,
            vec!["agent editor CLI not found, launching editor directly".to_string()]
        );

        let calls = runner.calls.lock().expect("lock");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, PathBuf::from("/usr/bin/open"));
    }

    #[tokio::test]
    async fn browser_launch_appends_urls_after_new_window() {
        let runner = Arc::new(RecordingRunner::default());
        let launcher = MacBrowserLauncher::new(runner.clone(), Duration::from_secs(5));
        let urls = vec![
            "http://localhost:3000".to_string(),
            "https://docs.rs".to_string(),
        ];

        launcher
            .open_new_window("com.google.Chrome", &urls)
            .await
            .expect("launch");

        let calls = runner.calls.lock().expect("lock");
        assert_eq!(
            calls[0].args,
            vec![
                "-n",
                "-b",
                "com.google.Chrome",
                "--args",
                "--new-window",
                "http://localhost:3000",
                "https://docs.rs",
            ]
        );
    }

    #[test]
    fn parses_applescript_url_list() {
        assert_eq!(
            parse_tab_urls("http://localhost:3000, https://docs.rs/tokio\n"),
            vec!["http://localhost:3000", "https://docs.rs/tokio"]
        );
        assert!(parse_tab_urls("").is_empty());
        assert!(parse_tab_urls("\n").is_empty());
    }
}
