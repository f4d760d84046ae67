/* src/clean.rs */

// `blockwork-build clean`: removes generated bundles, the language script
// directory, and the JSON files extracted from the master message file.
// Translated JSON and the key file are inputs, not products, and stay.

use std::path::Path;

use anyhow::{Context, Result};

use crate::build::config::{BuildPlan, LangPlan};
use crate::config::BlockworkConfig;
use crate::ui;

pub fn run_clean(config: &BlockworkConfig, base_dir: &Path) -> Result<()> {
  ui::arrow("cleaning generated artifacts");

  let plan = BuildPlan::from_config(config);
  for target in plan.bundle_targets() {
    delete_file_if_exists(&base_dir.join(target))?;
  }

  let langs = LangPlan::from_config(config);
  delete_dir_if_exists(&base_dir.join(&langs.js_dir))?;
  for extracted in [langs.source_json(), langs.qqq_json(), langs.synonyms_json()] {
    delete_file_if_exists(&base_dir.join(extracted))?;
  }

  ui::ok("clean complete");
  Ok(())
}

fn delete_file_if_exists(path: &Path) -> Result<()> {
  if path.is_file() {
    std::fs::remove_file(path).with_context(|| format!("failed to remove {}", path.display()))?;
    ui::detail(&format!("deleted {}", path.display()));
  }
  Ok(())
}

fn delete_dir_if_exists(path: &Path) -> Result<()> {
  if path.exists() {
    std::fs::remove_dir_all(path)
      .with_context(|| format!("failed to remove {}", path.display()))?;
    ui::detail(&format!("deleted {}", path.display()));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;

  #[test]
  fn clean_removes_generated_artifacts_only() {
    let tmp = tempfile::tempdir().unwrap();
    let base = tmp.path();
    fs::create_dir_all(base.join("msg/json")).unwrap();
    fs::create_dir_all(base.join("msg/js")).unwrap();
    for bundle in [
      "blockwork_uncompressed.js",
      "blockwork_compressed.js",
      "blocks_compressed.js",
      "javascript_compressed.js",
    ] {
      fs::write(base.join(bundle), "x").unwrap();
    }
    fs::write(base.join("msg/js/de.js"), "x").unwrap();
    for json in ["en.json", "de.json", "qqq.json", "synonyms.json", "keys.json"] {
      fs::write(base.join("msg/json").join(json), "{}").unwrap();
    }

    run_clean(&BlockworkConfig::default(), base).unwrap();

    assert!(!base.join("blockwork_uncompressed.js").exists());
    assert!(!base.join("blockwork_compressed.js").exists());
    assert!(!base.join("blocks_compressed.js").exists());
    assert!(!base.join("javascript_compressed.js").exists());
    assert!(!base.join("msg/js").exists());
    assert!(!base.join("msg/json/en.json").exists());
    assert!(!base.join("msg/json/qqq.json").exists());
    assert!(!base.join("msg/json/synonyms.json").exists());
    // Translator inputs survive.
    assert!(base.join("msg/json/de.json").exists());
    assert!(base.join("msg/json/keys.json").exists());
  }

  #[test]
  fn clean_is_a_noop_on_a_fresh_tree() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(run_clean(&BlockworkConfig::default(), tmp.path()).is_ok());
  }

  #[test]
  fn delete_dir_if_exists_removes_recursively() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("msg/js");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("en.js"), "x").unwrap();

    delete_dir_if_exists(&dir).unwrap();
    assert!(!dir.exists());
  }
}
