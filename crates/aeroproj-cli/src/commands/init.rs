//! `aeroproj init`: write a starter config file.

use std::path::Path;

use aeroproj_core::Config;
use anyhow::{Result, bail};

use crate::context;

pub fn run(config_dir: Option<&Path>) -> Result<()> {
    let cli_paths = context::resolve_paths(config_dir)?;
    let path = cli_paths.config_file;
    if path.exists() {
        bail!("{} already exists; refusing to overwrite", path.display());
    }
    Config::starter().save_to(&path)?;
    println!("wrote starter config to {}", path.display());
    println!("edit the [projects] table, then run `aeroproj open <project>`");
    Ok(())
}
