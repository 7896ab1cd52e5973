//! `aeroproj open <project>`: activate a project workspace.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::commands::print_warnings;
use crate::context;

#[derive(Args)]
pub struct OpenArgs {
    /// Project id from the config file
    pub project: String,
}

pub async fn run(config_dir: Option<&Path>, args: OpenArgs) -> Result<()> {
    let manager = context::build_manager(config_dir)?;
    // Capture where the user is before any workspace changes happen.
    let origin = manager.capture_focus().await;
    let outcome = manager.select_project(&args.project, origin).await?;
    print_warnings(&outcome.warnings);
    println!(
        "{} active on workspace {} (editor window {})",
        outcome.project_id, outcome.workspace, outcome.editor_window_id
    );
    Ok(())
}
