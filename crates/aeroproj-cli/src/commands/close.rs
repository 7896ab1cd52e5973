//! `aeroproj close <project>`: snapshot, tear down, restore focus.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::commands::{describe_restore, print_warnings};
use crate::context;

#[derive(Args)]
pub struct CloseArgs {
    /// Project id from the config file
    pub project: String,
}

pub async fn run(config_dir: Option<&Path>, args: CloseArgs) -> Result<()> {
    let manager = context::build_manager(config_dir)?;
    let outcome = manager.close_project(&args.project).await?;
    print_warnings(&outcome.warnings);
    match outcome.restored {
        Some(restore) => println!(
            "{} closed, {}",
            outcome.project_id,
            describe_restore(&restore)
        ),
        None => println!("{} closed", outcome.project_id),
    }
    Ok(())
}
