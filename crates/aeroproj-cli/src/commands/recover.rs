//! `aeroproj recover [--window-id <id>]`: pull one window back into the
//! visible screen area.

use std::path::Path;

use aeroproj_core::RecoveryOutcome;
use anyhow::Result;
use clap::Args;

use crate::commands::print_warnings;
use crate::context;

#[derive(Args)]
pub struct RecoverArgs {
    /// Window to recover (defaults to the focused window)
    #[arg(long, value_name = "ID")]
    pub window_id: Option<i64>,
}

pub async fn run(config_dir: Option<&Path>, args: RecoverArgs) -> Result<()> {
    let manager = context::build_manager(config_dir)?;
    let report = manager.recover_window(args.window_id).await?;
    print_warnings(&report.warnings);
    match report.outcome {
        RecoveryOutcome::Recovered { frame } => println!(
            "window resized to {:.0}x{:.0} at ({:.0}, {:.0})",
            frame.width, frame.height, frame.x, frame.y
        ),
        RecoveryOutcome::Unchanged => {
            println!("window already fits the visible screen area");
        }
        RecoveryOutcome::NotFound => println!("no such window"),
    }
    Ok(())
}
