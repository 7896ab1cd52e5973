//! Gateway behavior against a scripted runner: breaker gating, timeout
//! classification, version-skew fallbacks, argument validation, and
//! workspace teardown aggregation. No real CLI is spawned anywhere here.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use aero_client::{
    AeroClient, AeroError, CircuitBreaker, CommandOutput, CommandRunner, CommandSpec, WindowScope,
};
use async_trait::async_trait;

struct FakeRunner {
    calls: Mutex<Vec<Vec<String>>>,
    responses: Mutex<VecDeque<aero_client::Result<CommandOutput>>>,
}

impl FakeRunner {
    fn new(responses: Vec<aero_client::Result<CommandOutput>>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            responses: Mutex::new(responses.into_iter().collect()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }

    fn call(&self, index: usize) -> Vec<String> {
        self.calls.lock().expect("calls lock")[index].clone()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, spec: CommandSpec) -> aero_client::Result<CommandOutput> {
        self.calls.lock().expect("calls lock").push(spec.args);
        self.responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| Ok(ok_output("")))
    }
}

fn ok_output(stdout: &str) -> CommandOutput {
    CommandOutput {
        exit_code: 0,
        stdout: stdout.to_string(),
        stderr: String::new(),
        duration_ms: 1,
    }
}

fn failed_output(exit_code: i32, stderr: &str) -> CommandOutput {
    CommandOutput {
        exit_code,
        stdout: String::new(),
        stderr: stderr.to_string(),
        duration_ms: 1,
    }
}

fn client_with(
    responses: Vec<aero_client::Result<CommandOutput>>,
) -> (AeroClient, Arc<FakeRunner>, Arc<CircuitBreaker>) {
    let runner = FakeRunner::new(responses);
    let breaker = Arc::new(CircuitBreaker::new(Duration::from_secs(60)));
    let client = AeroClient::with_runner(
        runner.clone(),
        PathBuf::from("/fake/aerospace"),
        Duration::from_secs(10),
        breaker.clone(),
    );
    (client, runner, breaker)
}

#[tokio::test]
async fn open_breaker_refuses_calls_without_spawning() {
    // One timeout trips the breaker; everything after must fail fast.
    let (client, runner, breaker) = client_with(vec![Err(AeroError::Timeout { secs: 10 })]);

    let err = client.list_workspaces().await.expect_err("timeout");
    assert!(err.is_timeout());
    assert!(breaker.remaining_cooldown().is_some());
    assert_eq!(runner.call_count(), 1);

    for _ in 0..3 {
        let err = client.focus_window(7).await.expect_err("breaker open");
        assert!(err.is_circuit_open(), "got {err:?}");
    }
    // Zero additional process invocations while open.
    assert_eq!(runner.call_count(), 1);
}

#[tokio::test]
async fn circuit_open_error_carries_remaining_cooldown() {
    let (client, _runner, breaker) = client_with(vec![Err(AeroError::Timeout { secs: 10 })]);
    let _ = client.list_workspaces().await;
    assert!(breaker.remaining_cooldown().is_some());

    match client.focus_workspace("1").await {
        Err(AeroError::CircuitOpen { retry_after }) => {
            assert!(retry_after <= Duration::from_secs(60));
            assert!(retry_after > Duration::from_secs(50));
        }
        other => panic!("expected CircuitOpen, got {other:?}"),
    }
}

#[tokio::test]
async fn non_timeout_failures_do_not_trip_breaker() {
    let (client, runner, breaker) =
        client_with(vec![Ok(failed_output(1, "workspace not found"))]);

    let err = client.focus_window(3).await.expect_err("command failed");
    assert!(matches!(err, AeroError::Command { exit_code: 1, .. }));
    assert!(breaker.remaining_cooldown().is_none());

    // Next call goes straight through.
    client.focus_window(3).await.expect("second call allowed");
    assert_eq!(runner.call_count(), 2);
}

/// Runner that opens the shared breaker while its own call is in flight,
/// standing in for a concurrent call timing out underneath us.
struct TrippingRunner {
    breaker: Arc<CircuitBreaker>,
    calls: Mutex<usize>,
}

#[async_trait]
impl CommandRunner for TrippingRunner {
    async fn run(&self, _spec: CommandSpec) -> aero_client::Result<CommandOutput> {
        *self.calls.lock().expect("calls lock") += 1;
        self.breaker.record_timeout();
        Ok(ok_output(""))
    }
}

#[tokio::test]
async fn completed_call_does_not_close_a_breaker_tripped_mid_flight() {
    let breaker = Arc::new(CircuitBreaker::new(Duration::from_secs(60)));
    let runner = Arc::new(TrippingRunner {
        breaker: breaker.clone(),
        calls: Mutex::new(0),
    });
    let client = AeroClient::with_runner(
        runner.clone(),
        PathBuf::from("/fake/aerospace"),
        Duration::from_secs(10),
        breaker.clone(),
    );

    client.focus_window(7).await.expect("focus");

    // Only timeouts talk to the breaker; the call that was already in
    // flight when it opened must not cancel the cooldown on completion.
    assert!(breaker.remaining_cooldown().is_some());

    let err = client.focus_window(7).await.expect_err("breaker open");
    assert!(err.is_circuit_open(), "got {err:?}");
    assert_eq!(*runner.calls.lock().expect("calls lock"), 1);
}

#[tokio::test]
async fn focus_workspace_falls_back_when_summon_is_unknown() {
    let (client, runner, _breaker) = client_with(vec![
        Ok(failed_output(1, "unknown command: summon-workspace")),
        Ok(ok_output("")),
    ]);

    client.focus_workspace("ap-test").await.expect("fallback lands");

    assert_eq!(runner.call_count(), 2);
    assert_eq!(runner.call(0), vec!["summon-workspace", "ap-test"]);
    assert_eq!(runner.call(1), vec!["workspace", "ap-test"]);
}

#[tokio::test]
async fn focus_workspace_does_not_retry_operational_failures() {
    let (client, runner, _breaker) =
        client_with(vec![Ok(failed_output(1, "workspace not found: ap-test"))]);

    let err = client
        .focus_workspace("ap-test")
        .await
        .expect_err("operational failure surfaces");
    assert!(matches!(err, AeroError::Command { .. }));
    assert_eq!(runner.call_count(), 1);
}

#[tokio::test]
async fn focus_workspace_surfaces_fallback_failure() {
    let (client, runner, _breaker) = client_with(vec![
        Ok(failed_output(1, "unknown command: summon-workspace")),
        Ok(failed_output(1, "workspace not found: ap-test")),
    ]);

    let err = client.focus_workspace("ap-test").await.expect_err("both fail");
    assert!(matches!(err, AeroError::Command { .. }));
    assert_eq!(runner.call_count(), 2);
}

#[tokio::test]
async fn move_window_falls_back_to_move_then_focus() {
    let (client, runner, _breaker) = client_with(vec![
        Ok(failed_output(1, "unknown option: --focus-follows-window")),
        Ok(ok_output("")),
        Ok(ok_output("")),
    ]);

    client
        .move_window(12, "ap-api", true)
        .await
        .expect("two-call fallback lands");

    assert_eq!(runner.call_count(), 3);
    assert_eq!(
        runner.call(0),
        vec![
            "move-node-to-workspace",
            "--window-id",
            "12",
            "--focus-follows-window",
            "ap-api"
        ]
    );
    assert_eq!(
        runner.call(1),
        vec!["move-node-to-workspace", "--window-id", "12", "ap-api"]
    );
    assert_eq!(runner.call(2), vec!["summon-workspace", "ap-api"]);
}

#[tokio::test]
async fn move_window_without_focus_follow_uses_plain_form() {
    let (client, runner, _breaker) = client_with(vec![Ok(ok_output(""))]);

    client.move_window(5, "3", false).await.expect("plain move");

    assert_eq!(runner.call_count(), 1);
    assert_eq!(
        runner.call(0),
        vec!["move-node-to-workspace", "--window-id", "5", "3"]
    );
}

#[tokio::test]
async fn invalid_arguments_are_rejected_before_spawn() {
    let (client, runner, _breaker) = client_with(vec![]);

    let err = client.focus_workspace("   ").await.expect_err("blank name");
    assert!(matches!(err, AeroError::InvalidArgument(_)));

    let err = client.focus_window(0).await.expect_err("zero id");
    assert!(matches!(err, AeroError::InvalidArgument(_)));

    let err = client.move_window(-4, "1", true).await.expect_err("negative id");
    assert!(matches!(err, AeroError::InvalidArgument(_)));

    let err = client
        .list_windows(WindowScope::Workspace("\t".to_string()))
        .await
        .expect_err("blank scope");
    assert!(matches!(err, AeroError::InvalidArgument(_)));

    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn close_workspace_aggregates_per_window_failures() {
    let (client, runner, _breaker) = client_with(vec![
        Ok(ok_output(
            "10\tcom.microsoft.VSCode\tap-web\teditor\n11\tcom.google.Chrome\tap-web\tchrome\n",
        )),
        Ok(failed_output(1, "window 10 does not exist")),
        Ok(ok_output("")),
    ]);

    let err = client.close_workspace("ap-web").await.expect_err("partial close");
    match err {
        AeroError::Command { stderr, .. } => {
            assert!(stderr.contains("closed 1 of 2"), "stderr: {stderr}");
            assert!(stderr.contains("window 10"), "stderr: {stderr}");
        }
        other => panic!("expected Command error, got {other:?}"),
    }
    assert_eq!(runner.call_count(), 3);
}

#[tokio::test]
async fn close_workspace_succeeds_when_every_window_closes() {
    let (client, runner, _breaker) = client_with(vec![
        Ok(ok_output("10\tapp\tap-web\ta\n11\tapp\tap-web\tb\n")),
        Ok(ok_output("")),
        Ok(ok_output("")),
    ]);

    client.close_workspace("ap-web").await.expect("all closed");
    assert_eq!(runner.call(1), vec!["close", "--window-id", "10"]);
    assert_eq!(runner.call(2), vec!["close", "--window-id", "11"]);
    assert_eq!(runner.call_count(), 3);
}

#[tokio::test]
async fn focused_window_parses_single_line() {
    let (client, _runner, _breaker) =
        client_with(vec![Ok(ok_output("42\tcom.google.Chrome\t3\tInbox\n"))]);

    let window = client
        .focused_window()
        .await
        .expect("query ok")
        .expect("one focused window");
    assert_eq!(window.window_id, 42);
    assert_eq!(window.workspace, "3");
}

#[tokio::test]
async fn focused_window_is_none_on_empty_output() {
    let (client, _runner, _breaker) = client_with(vec![Ok(ok_output(""))]);
    assert!(client.focused_window().await.expect("query ok").is_none());
}

#[tokio::test]
async fn list_windows_scopes_map_to_cli_flags() {
    let (client, runner, _breaker) = client_with(vec![
        Ok(ok_output("")),
        Ok(ok_output("")),
        Ok(ok_output("")),
    ]);

    client.list_windows(WindowScope::All).await.expect("all");
    client
        .list_windows(WindowScope::Workspace("ap-web".to_string()))
        .await
        .expect("workspace");
    client
        .list_windows(WindowScope::App("com.google.Chrome".to_string()))
        .await
        .expect("app");

    assert_eq!(runner.call(0)[..2], ["list-windows", "--all"]);
    assert_eq!(runner.call(1)[..3], ["list-windows", "--workspace", "ap-web"]);
    assert_eq!(
        runner.call(2)[..4],
        ["list-windows", "--all", "--app-bundle-id", "com.google.Chrome"]
    );
}
