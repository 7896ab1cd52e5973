//! Error types for the orchestration core.

use aero_client::AeroError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A window-manager call failed; propagated verbatim from the gateway.
    #[error(transparent)]
    Gateway(#[from] AeroError),

    /// A persisted document is newer than this build understands. Always a
    /// hard load failure, never a silent downgrade.
    #[error("state file version {found} is newer than supported version {supported}")]
    StateVersion { found: u32, supported: u32 },

    #[error("state error: {0}")]
    State(String),

    #[error("config error: {0}")]
    Config(String),

    /// The editor window could not be launched. The only launch failure that
    /// is fatal to activation.
    #[error("editor launch failed: {0}")]
    EditorLaunch(String),

    /// A launcher or capture collaborator failed. Callers decide whether
    /// this is fatal; for browser and tab work it never is.
    #[error("launch failed: {0}")]
    Launch(String),

    #[error("could not create workspace {workspace}: {reason}")]
    WorkspaceCreate { workspace: String, reason: String },

    /// Readiness polling exhausted its deadline.
    #[error("timed out after {secs}s waiting for project windows")]
    ActivationTimeout { secs: u64 },

    /// Every focus-restoration tier was exhausted.
    #[error("no previous window to return to")]
    NoPreviousWindow,

    #[error("unknown project: {0}")]
    UnknownProject(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
