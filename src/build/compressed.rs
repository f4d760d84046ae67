/* src/build/compressed.rs */

// Remote-compiled bundles: core, blocks, and one generator bundle per
// language. Sources are read up front so a missing file aborts before any
// network traffic; submissions then run one at a time against the service.

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::build::compiler::{CompileJob, CompileOutcome, Compiler};
use crate::build::config::{BLOCKS_TARGET, BuildPlan, lang_target};
use crate::build::license::{GENERATED_HEADER, trim_licenses};
use crate::deps::DepsTool;
use crate::ui::{self, DIM, RESET};

/// Synthetic input name for the injected provide line.
const PLACEHOLDER_NAME: &str = "[goog.provide]";

pub async fn generate_all(base_dir: &Path, plan: &BuildPlan, tool: &DepsTool) -> Result<()> {
  let mut jobs = Vec::with_capacity(plan.languages.len() + 2);
  jobs.push(core_job(base_dir, plan, tool)?);
  jobs.push(blocks_job(base_dir, plan)?);
  for lang in &plan.languages {
    jobs.push(generator_job(base_dir, plan, lang)?);
  }

  let compiler = Compiler::new(&plan.endpoint);
  for job in &jobs {
    let outcome = compiler.compile(job).await?;
    write_bundle(base_dir, job, &outcome)?;
  }
  Ok(())
}

fn base_params(level: &str, use_closure_library: bool) -> Vec<(String, String)> {
  let mut params = vec![("compilation_level".to_string(), level.to_string())];
  if use_closure_library {
    params.push(("use_closure_library".to_string(), "true".to_string()));
  }
  params.push(("output_format".to_string(), "json".to_string()));
  for info in ["compiled_code", "warnings", "errors", "statistics"] {
    params.push(("output_info".to_string(), info.to_string()));
  }
  params
}

/// Core bundle: the entry file's dependency-ordered closure, minus tool
/// modules (the service pulls those in itself via `use_closure_library`).
fn core_job(base_dir: &Path, plan: &BuildPlan, tool: &DepsTool) -> Result<CompileJob> {
  let search_paths = [plan.core_dir.as_str(), plan.deps_dir.as_str()];
  let ordered = tool.ordered_inputs(base_dir, &search_paths, &plan.entry)?;

  let mut params = base_params(&plan.level, true);
  let mut inputs = Vec::new();
  for path in ordered {
    if under_tool_dir(&path, &plan.deps_dir) {
      continue;
    }
    params.push(("js_code".to_string(), read_source(base_dir, &path)?));
    inputs.push(path);
  }
  if inputs.is_empty() {
    bail!("dependency tool returned no library inputs for {}", plan.entry);
  }
  Ok(CompileJob { target: plan.core_target(), params, inputs, remove: None })
}

/// Blocks bundle: every block definition directly inside the configured
/// directories, compiled against an injected namespace provide.
fn blocks_job(base_dir: &Path, plan: &BuildPlan) -> Result<CompileJob> {
  let mut files = Vec::new();
  for dir in &plan.blocks_dirs {
    files.extend(js_files_in(base_dir, dir)?);
  }
  if files.is_empty() {
    bail!("no block definitions found under {:?}", plan.blocks_dirs);
  }

  let provide = format!("goog.provide('{}.Blocks');", plan.namespace);
  let remove = format!("var {}={{Blocks:{{}}}};", plan.namespace);
  job_with_placeholder(base_dir, BLOCKS_TARGET.to_string(), plan, &provide, remove, files)
}

/// Generator bundle for one language: `<dir>/<lang>.js` first, then the
/// files under `<dir>/<lang>/`.
fn generator_job(base_dir: &Path, plan: &BuildPlan, lang: &str) -> Result<CompileJob> {
  let mut files = vec![format!("{}/{lang}.js", plan.generators_dir)];
  files.extend(js_files_in(base_dir, &format!("{}/{lang}", plan.generators_dir))?);

  let provide = format!("goog.provide('{}.Generator');", plan.namespace);
  let remove = format!("var {}={{Generator:{{}}}};", plan.namespace);
  job_with_placeholder(base_dir, lang_target(lang), plan, &provide, remove, files)
}

fn job_with_placeholder(
  base_dir: &Path,
  target: String,
  plan: &BuildPlan,
  provide: &str,
  remove: String,
  files: Vec<String>,
) -> Result<CompileJob> {
  let mut params = base_params(&plan.level, false);
  params.push(("js_code".to_string(), provide.to_string()));
  let mut inputs = vec![PLACEHOLDER_NAME.to_string()];
  for file in files {
    params.push(("js_code".to_string(), read_source(base_dir, &file)?));
    inputs.push(file);
  }
  Ok(CompileJob { target, params, inputs, remove: Some(remove) })
}

/// `*.js` directly inside `dir`, sorted, as `dir`-prefixed relative paths.
/// A missing directory is a missing-sources error, not an empty bundle.
fn js_files_in(base_dir: &Path, dir: &str) -> Result<Vec<String>> {
  let entries = std::fs::read_dir(base_dir.join(dir))
    .with_context(|| format!("source directory not found: {dir}"))?;
  let mut files = Vec::new();
  for entry in entries {
    let entry = entry.with_context(|| format!("failed to list {dir}"))?;
    let path = entry.path();
    if path.is_file() && path.extension().is_some_and(|ext| ext == "js") {
      files.push(format!("{dir}/{}", entry.file_name().to_string_lossy()));
    }
  }
  files.sort();
  Ok(files)
}

fn under_tool_dir(path: &str, deps_dir: &str) -> bool {
  Path::new(path).starts_with(deps_dir)
}

fn read_source(base_dir: &Path, path: &str) -> Result<String> {
  std::fs::read_to_string(base_dir.join(path))
    .with_context(|| format!("failed to read source file {path}"))
}

fn post_process(code: &str, remove: Option<&str>) -> String {
  let mut out = format!("{GENERATED_HEADER}\n{code}");
  if let Some(snippet) = remove {
    out = out.replace(snippet, "");
  }
  trim_licenses(&out)
}

fn write_bundle(base_dir: &Path, job: &CompileJob, outcome: &CompileOutcome) -> Result<()> {
  let content = post_process(&outcome.code, job.remove.as_deref());
  std::fs::write(base_dir.join(&job.target), &content)
    .with_context(|| format!("failed to write {}", job.target))?;

  let ratio = (outcome.compressed_size as f64 / outcome.original_size as f64 * 100.0).round();
  ui::ok(&format!(
    "{} {DIM}({} -> {}, {ratio}%){RESET}",
    job.target,
    ui::format_size(outcome.original_size),
    ui::format_size(outcome.compressed_size)
  ));
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::BlockworkConfig;
  use std::fs;

  fn plan() -> BuildPlan {
    BuildPlan::from_config(&BlockworkConfig::default())
  }

  #[test]
  fn base_params_order_and_flags() {
    let params = base_params("SIMPLE_OPTIMIZATIONS", true);
    assert_eq!(params[0], ("compilation_level".to_string(), "SIMPLE_OPTIMIZATIONS".to_string()));
    assert_eq!(params[1], ("use_closure_library".to_string(), "true".to_string()));
    assert_eq!(params[2], ("output_format".to_string(), "json".to_string()));
    let infos: Vec<&str> =
      params.iter().filter(|(k, _)| k == "output_info").map(|(_, v)| v.as_str()).collect();
    assert_eq!(infos, vec!["compiled_code", "warnings", "errors", "statistics"]);

    let without = base_params("SIMPLE_OPTIMIZATIONS", false);
    assert!(!without.iter().any(|(k, _)| k == "use_closure_library"));
  }

  #[test]
  fn js_files_are_sorted_and_filtered() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("blocks/nested")).unwrap();
    fs::write(tmp.path().join("blocks/logic.js"), "x").unwrap();
    fs::write(tmp.path().join("blocks/colour.js"), "x").unwrap();
    fs::write(tmp.path().join("blocks/README.md"), "x").unwrap();
    fs::write(tmp.path().join("blocks/nested/inner.js"), "x").unwrap();

    let files = js_files_in(tmp.path(), "blocks").unwrap();
    assert_eq!(files, vec!["blocks/colour.js", "blocks/logic.js"]);
  }

  #[test]
  fn missing_directory_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let err = js_files_in(tmp.path(), "blocks").unwrap_err().to_string();
    assert!(err.contains("blocks"), "error: {err}");
  }

  #[test]
  fn blocks_job_injects_placeholder_first() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("blocks")).unwrap();
    fs::write(tmp.path().join("blocks/logic.js"), "var logic;").unwrap();

    let job = blocks_job(tmp.path(), &plan()).unwrap();
    assert_eq!(job.target, "blocks_compressed.js");
    assert_eq!(job.inputs, vec!["[goog.provide]", "blocks/logic.js"]);
    assert_eq!(job.remove.as_deref(), Some("var Blockwork={Blocks:{}};"));
    let js_code: Vec<&str> =
      job.params.iter().filter(|(k, _)| k == "js_code").map(|(_, v)| v.as_str()).collect();
    assert_eq!(js_code, vec!["goog.provide('Blockwork.Blocks');", "var logic;"]);
  }

  #[test]
  fn generator_job_puts_language_entry_first() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("generators/lua")).unwrap();
    fs::write(tmp.path().join("generators/lua.js"), "top").unwrap();
    fs::write(tmp.path().join("generators/lua/text.js"), "text").unwrap();
    fs::write(tmp.path().join("generators/lua/logic.js"), "logic").unwrap();

    let job = generator_job(tmp.path(), &plan(), "lua").unwrap();
    assert_eq!(job.target, "lua_compressed.js");
    assert_eq!(
      job.inputs,
      vec!["[goog.provide]", "generators/lua.js", "generators/lua/logic.js", "generators/lua/text.js"]
    );
    assert_eq!(job.remove.as_deref(), Some("var Blockwork={Generator:{}};"));
  }

  #[test]
  fn missing_generator_entry_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("generators/lua")).unwrap();

    let err = generator_job(tmp.path(), &plan(), "lua").unwrap_err().to_string();
    assert!(err.contains("generators/lua.js"), "error: {err}");
  }

  #[test]
  fn tool_modules_are_recognized_by_path() {
    assert!(under_tool_dir("../closure-library/closure/goog/base.js", "../closure-library"));
    assert!(!under_tool_dir("core/blockwork.js", "../closure-library"));
    assert!(!under_tool_dir("../closure-library-extra/a.js", "../closure-library"));
  }

  #[test]
  fn post_process_strips_placeholder_and_adds_header() {
    let out = post_process("var Blockwork={Blocks:{}};var a=1;", Some("var Blockwork={Blocks:{}};"));
    assert!(out.starts_with("// Do not edit this file;"), "out: {out}");
    assert!(out.contains("'use strict';"), "out: {out}");
    assert!(out.contains("var a=1;"), "out: {out}");
    assert!(!out.contains("var Blockwork={Blocks:{}};"), "out: {out}");
  }
}
