//! `aeroproj list [--json]`: configured projects joined with live workspace
//! state.

use std::path::Path;

use aeroproj_core::ProjectStatus;
use anyhow::Result;
use clap::Args;

use crate::context;

#[derive(Args)]
pub struct ListArgs {
    /// Emit the statuses as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub async fn run(config_dir: Option<&Path>, args: ListArgs) -> Result<()> {
    let manager = context::build_manager(config_dir)?;
    let statuses = manager.project_statuses().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    println!("Projects");
    println!("========\n");

    if statuses.is_empty() {
        println!("  None configured (run `aeroproj init` to start a config)");
        return Ok(());
    }
    for status in &statuses {
        let marker = if status.active { "[OK]" } else { "[--]" };
        println!(
            "  {marker} {} ({}) - {}",
            status.project_id,
            status.workspace,
            status_notes(status)
        );
    }

    let active = statuses.iter().filter(|status| status.active).count();
    let configured = statuses.iter().filter(|status| status.configured).count();
    println!("\nSummary:");
    println!("  {active} active, {configured} configured project(s)");
    Ok(())
}

fn status_notes(status: &ProjectStatus) -> String {
    let mut notes = if status.active {
        format!("{} window(s)", status.window_count)
    } else {
        "inactive".to_string()
    };
    if status.focused {
        notes.push_str(", focused");
    }
    if !status.configured {
        notes.push_str(", not in config");
    }
    notes
}
