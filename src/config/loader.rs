/* src/config/loader.rs */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::BlockworkConfig;

/// Walk upward from `start` to find `blockwork.toml`, like Cargo.toml discovery.
pub fn find_build_config(start: &Path) -> Result<PathBuf> {
  let mut dir =
    start.canonicalize().with_context(|| format!("failed to canonicalize {}", start.display()))?;
  loop {
    let candidate = dir.join("blockwork.toml");
    if candidate.is_file() {
      return Ok(candidate);
    }
    if !dir.pop() {
      bail!("blockwork.toml not found (searched upward from {})", start.display());
    }
  }
}

pub fn load_build_config(path: &Path) -> Result<BlockworkConfig> {
  let content =
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  let config: BlockworkConfig =
    toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
  config.validate()?;
  Ok(config)
}
