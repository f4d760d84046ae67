/* src/build/mod.rs */

// Build orchestration: locate the dependency tool, then run the three
// generators concurrently. They write disjoint files, so all three run to
// completion even when one fails; every artifact gets its success or
// failure line and the first failure decides the exit.

pub mod config;

mod compiler;
mod compressed;
mod license;
mod uncompressed;

use std::path::Path;
use std::time::Instant;

use anyhow::{Result, anyhow};
use tokio::task::JoinError;

use crate::config::BlockworkConfig;
use crate::deps::DepsTool;
use crate::langs;
use crate::ui;

use config::{BuildPlan, LangPlan};

pub async fn run_build(config: &BlockworkConfig, base_dir: &Path) -> Result<()> {
  let started = Instant::now();
  ui::banner("build", Some(&config.project.name));

  let plan = BuildPlan::from_config(config);
  let lang_plan = LangPlan::from_config(config);

  ui::step(1, 2, "Locating dependency tool");
  let tool = DepsTool::locate(base_dir, &plan.deps_dir)?;
  ui::detail_ok(&tool.script().display().to_string());
  ui::blank();

  ui::step(2, 2, "Running generators");

  let uncompressed = {
    let base = base_dir.to_path_buf();
    let plan = plan.clone();
    let tool = tool.clone();
    tokio::task::spawn_blocking(move || uncompressed::generate(&base, &plan, &tool))
  };
  let compressed = {
    let base = base_dir.to_path_buf();
    let plan = plan.clone();
    let tool = tool.clone();
    tokio::spawn(async move { compressed::generate_all(&base, &plan, &tool).await })
  };
  let languages = {
    let base = base_dir.to_path_buf();
    let lang_plan = lang_plan.clone();
    tokio::task::spawn_blocking(move || langs::run(&base, &lang_plan))
  };

  let (uncompressed, compressed, languages) = tokio::join!(uncompressed, compressed, languages);

  let mut first_error = None;
  if let Err(err) = flatten(uncompressed, "uncompressed generator") {
    note_failure("uncompressed generator", err, &mut first_error);
  }
  if let Err(err) = flatten(compressed, "compressed generator") {
    note_failure("compressed generator", err, &mut first_error);
  }
  let lang_count = match flatten(languages, "language generator") {
    Ok(count) => count,
    Err(err) => {
      note_failure("language generator", err, &mut first_error);
      0
    }
  };
  if let Some(err) = first_error {
    return Err(err);
  }

  ui::blank();
  let elapsed = started.elapsed().as_secs_f64();
  ui::ok(&format!("build complete in {elapsed:.1}s"));
  ui::detail(&format!(
    "{} bundles \u{00b7} {lang_count} language files",
    plan.bundle_targets().len()
  ));
  Ok(())
}

fn flatten<T>(result: Result<Result<T>, JoinError>, label: &str) -> Result<T> {
  match result {
    Ok(inner) => inner,
    Err(err) => Err(anyhow!("{label} task panicked: {err}")),
  }
}

/// Report a generator failure; the first one becomes the build's error.
fn note_failure(label: &str, err: anyhow::Error, first: &mut Option<anyhow::Error>) {
  ui::fail(&format!("{label}: {err:#}"));
  first.get_or_insert(err);
}
