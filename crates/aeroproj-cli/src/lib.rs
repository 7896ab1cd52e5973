//! `aeroproj` binary: per-project desktop workspaces on the AeroSpace
//! window manager.
//!
//! Subcommands map one-to-one onto the orchestrator operations. Hard
//! failures exit nonzero; degraded outcomes print their warnings and exit
//! zero.

// Terminal output is this crate's job.
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

mod commands;
mod context;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "aeroproj")]
#[command(about = "Per-project desktop workspaces on the AeroSpace window manager")]
#[command(version)]
pub struct Cli {
    /// Directory holding config.toml (defaults to ~/.config/aeroproj)
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG wins when set
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Open a project: workspace, editor and browser windows, layout
    Open(commands::open::OpenArgs),
    /// Close a project's workspace and return to the previous window
    Close(commands::close::CloseArgs),
    /// Return to the previous non-project window, leaving windows in place
    Exit,
    /// Configured projects joined with live workspace state
    List(commands::list::ListArgs),
    /// Diagnose the aerospace binary, config, and state files
    Doctor(commands::doctor::DoctorArgs),
    /// Write a starter config file
    Init,
    /// Pull an oversized or off-screen window back into view
    Recover(commands::recover::RecoverArgs),
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_dir = cli.config_dir;
    match cli.command {
        Commands::Open(args) => commands::open::run(config_dir.as_deref(), args).await,
        Commands::Close(args) => commands::close::run(config_dir.as_deref(), args).await,
        Commands::Exit => commands::exit::run(config_dir.as_deref()).await,
        Commands::List(args) => commands::list::run(config_dir.as_deref(), args).await,
        Commands::Doctor(args) => commands::doctor::run(config_dir.as_deref(), args).await,
        Commands::Init => commands::init::run(config_dir.as_deref()),
        Commands::Recover(args) => commands::recover::run(config_dir.as_deref(), args).await,
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let default = format!("aero_client={level},aeroproj_core={level},aeroproj_cli={level}");
    // Logs go to stderr so --json output on stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use clap::error::ErrorKind;

    use super::{Cli, Commands};

    #[test]
    fn cli_requires_subcommand() {
        let err = match Cli::try_parse_from(["aeroproj"]) {
            Ok(_) => panic!("expected missing subcommand parse error"),
            Err(err) => err,
        };
        assert_eq!(
            err.kind(),
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
    }

    #[test]
    fn cli_rejects_unknown_subcommand() {
        let err = match Cli::try_parse_from(["aeroproj", "unknown-subcommand"]) {
            Ok(_) => panic!("expected invalid subcommand parse error"),
            Err(err) => err,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn open_takes_project_and_global_flags() {
        let cli = Cli::try_parse_from(["aeroproj", "-v", "--config-dir", "/tmp/ap", "open", "web"])
            .expect("parse");
        assert_eq!(cli.verbose, 1);
        assert_eq!(cli.config_dir.as_deref(), Some(std::path::Path::new("/tmp/ap")));
        match cli.command {
            Commands::Open(args) => assert_eq!(args.project, "web"),
            _ => panic!("expected open subcommand"),
        }
    }

    #[test]
    fn global_flags_parse_after_the_subcommand() {
        let cli = Cli::try_parse_from(["aeroproj", "list", "--json", "-vv"]).expect("parse");
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::List(args) => assert!(args.json),
            _ => panic!("expected list subcommand"),
        }
    }

    #[test]
    fn recover_window_id_is_optional() {
        let cli = Cli::try_parse_from(["aeroproj", "recover"]).expect("parse");
        match cli.command {
            Commands::Recover(args) => assert!(args.window_id.is_none()),
            _ => panic!("expected recover subcommand"),
        }

        let cli = Cli::try_parse_from(["aeroproj", "recover", "--window-id", "42"]).expect("parse");
        match cli.command {
            Commands::Recover(args) => assert_eq!(args.window_id, Some(42)),
            _ => panic!("expected recover subcommand"),
        }
    }
}
