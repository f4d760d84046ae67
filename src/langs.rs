/* src/langs.rs */

// Localization pipeline: the master message file becomes per-language
// JSON, which becomes per-language script files, via two external
// scripts. Modification times gate both steps so unchanged inputs skip
// the subprocess entirely.

use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result, bail};

use crate::build::config::LangPlan;
use crate::shell;
use crate::ui;

/// Run both steps; returns how many language script files are in place.
pub fn run(base_dir: &Path, plan: &LangPlan) -> Result<usize> {
  extract_json(base_dir, plan)?;

  let json_files = translated_json_files(base_dir, plan)?;
  if json_files.is_empty() {
    bail!("no language JSON files found under {}", plan.json_dir);
  }
  let js_outputs: Vec<String> = json_files.iter().map(|f| js_output(plan, f)).collect();

  let mut sources = json_files.clone();
  sources.push(plan.synonyms_json());
  sources.push(plan.keys_json());
  if !needs_rebuild(base_dir, &sources, &js_outputs)? {
    ui::arrow(&format!("{} up to date ({} languages)", plan.js_dir, json_files.len()));
    return Ok(json_files.len());
  }

  std::fs::create_dir_all(base_dir.join(&plan.js_dir))
    .with_context(|| format!("failed to create {}", plan.js_dir))?;
  let source_json = plan.source_json();
  let synonyms_json = plan.synonyms_json();
  let keys_json = plan.keys_json();
  let mut args = vec![
    "--source_lang_file",
    source_json.as_str(),
    "--source_synonym_file",
    synonyms_json.as_str(),
    "--key_file",
    keys_json.as_str(),
    "--output_dir",
    plan.js_dir.as_str(),
    "--quiet",
  ];
  args.extend(json_files.iter().map(String::as_str));
  shell::run_script(
    base_dir,
    Path::new(&plan.generate_script),
    &args,
    "message generation script",
  )?;

  let mut written = 0usize;
  for js_file in &js_outputs {
    if base_dir.join(js_file).is_file() {
      ui::ok(js_file);
      written += 1;
    } else {
      ui::fail(&format!("failed to create {js_file}"));
    }
  }
  Ok(written)
}

/// Step 1: refresh the extracted JSON when the master file is newer.
fn extract_json(base_dir: &Path, plan: &LangPlan) -> Result<()> {
  let outputs = [plan.source_json(), plan.qqq_json(), plan.synonyms_json()];
  if !needs_rebuild(base_dir, std::slice::from_ref(&plan.messages), &outputs)? {
    ui::arrow(&format!("{} up to date", plan.json_dir));
    return Ok(());
  }

  std::fs::create_dir_all(base_dir.join(&plan.json_dir))
    .with_context(|| format!("failed to create {}", plan.json_dir))?;
  shell::run_script(
    base_dir,
    Path::new(&plan.extract_script),
    &["--input_file", &plan.messages, "--output_dir", &plan.json_dir, "--quiet"],
    "message extraction script",
  )?;
  Ok(())
}

/// Translated JSON files under the JSON directory, sorted. The key,
/// description, and synonym files are pipeline metadata, not languages.
fn translated_json_files(base_dir: &Path, plan: &LangPlan) -> Result<Vec<String>> {
  let entries = std::fs::read_dir(base_dir.join(&plan.json_dir))
    .with_context(|| format!("language JSON directory not found: {}", plan.json_dir))?;
  let mut files = Vec::new();
  for entry in entries {
    let entry = entry.with_context(|| format!("failed to list {}", plan.json_dir))?;
    let name = entry.file_name().to_string_lossy().into_owned();
    if !entry.path().is_file() || !name.ends_with(".json") {
      continue;
    }
    if matches!(name.as_str(), "keys.json" | "qqq.json" | "synonyms.json") {
      continue;
    }
    files.push(format!("{}/{name}", plan.json_dir));
  }
  files.sort();
  Ok(files)
}

/// Script file a translated JSON file compiles to.
fn js_output(plan: &LangPlan, json_file: &str) -> String {
  let stem = Path::new(json_file).file_stem().unwrap_or_default().to_string_lossy();
  format!("{}/{stem}.js", plan.js_dir)
}

/// Read modification times and decide whether a step must run.
fn needs_rebuild(base_dir: &Path, sources: &[String], outputs: &[String]) -> Result<bool> {
  let source_times: Vec<(String, Option<SystemTime>)> =
    sources.iter().map(|p| (p.clone(), mtime(&base_dir.join(p)))).collect();
  let output_times: Vec<Option<SystemTime>> =
    outputs.iter().map(|p| mtime(&base_dir.join(p))).collect();
  decide(&source_times, &output_times)
}

/// Rebuild exactly when the newest source is strictly newer than the
/// oldest output. A missing source is fatal; a missing output forces a
/// rebuild.
fn decide(
  sources: &[(String, Option<SystemTime>)],
  outputs: &[Option<SystemTime>],
) -> Result<bool> {
  let mut newest_source: Option<SystemTime> = None;
  for (path, time) in sources {
    match time {
      Some(t) => newest_source = Some(newest_source.map_or(*t, |cur| cur.max(*t))),
      None => bail!("source file missing: {path}"),
    }
  }
  let Some(newest_source) = newest_source else {
    bail!("no source files to compare");
  };

  let mut oldest_output: Option<SystemTime> = None;
  for time in outputs {
    match time {
      Some(t) => oldest_output = Some(oldest_output.map_or(*t, |cur| cur.min(*t))),
      None => return Ok(true),
    }
  }
  match oldest_output {
    Some(oldest) => Ok(newest_source > oldest),
    None => Ok(true),
  }
}

fn mtime(path: &Path) -> Option<SystemTime> {
  std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
