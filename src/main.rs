/* src/main.rs */

mod build;
mod clean;
mod config;
mod deps;
mod langs;
mod shell;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use config::{BlockworkConfig, find_build_config, load_build_config};

#[derive(Parser)]
#[command(name = "blockwork-build", about = "Blockwork build tool")]
struct Cli {
  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Generate uncompressed, compressed, and language bundles
  Build {
    /// Path to blockwork.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
  /// Remove generated bundles and extracted message files
  Clean {
    /// Path to blockwork.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
}

/// Resolve the config and the directory builds run from. An explicit path
/// must parse; an absent blockwork.toml means the default layout in cwd.
fn resolve_config(explicit: Option<PathBuf>) -> Result<(PathBuf, BlockworkConfig)> {
  if let Some(path) = explicit {
    let config = load_build_config(&path)?;
    return Ok((base_dir_of(&path), config));
  }
  let cwd = std::env::current_dir().context("failed to get cwd")?;
  match find_build_config(&cwd) {
    Ok(path) => {
      let config = load_build_config(&path)?;
      Ok((base_dir_of(&path), config))
    }
    Err(_) => Ok((cwd, BlockworkConfig::default())),
  }
}

fn base_dir_of(config_path: &Path) -> PathBuf {
  match config_path.parent() {
    Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
    _ => PathBuf::from("."),
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  match cli.command.unwrap_or(Command::Build { config: None }) {
    Command::Build { config } => {
      let (base_dir, build_config) = resolve_config(config)?;
      build::run_build(&build_config, &base_dir).await?;
    }
    Command::Clean { config } => {
      let (base_dir, build_config) = resolve_config(config)?;
      clean::run_clean(&build_config, &base_dir)?;
    }
  }

  Ok(())
}
