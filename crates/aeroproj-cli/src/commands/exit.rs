//! `aeroproj exit`: return to the previous non-project window without
//! touching any project's windows.

use std::path::Path;

use anyhow::Result;

use crate::commands::{describe_restore, print_warnings};
use crate::context;

pub async fn run(config_dir: Option<&Path>) -> Result<()> {
    let manager = context::build_manager(config_dir)?;
    let outcome = manager.exit_to_non_project_window().await?;
    print_warnings(&outcome.warnings);
    println!("{}", describe_restore(&outcome.restored));
    Ok(())
}
