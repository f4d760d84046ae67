/* src/deps.rs */

// Client for the external module-dependency tool (calcdeps.py from the
// Closure library). The tool owns dependency resolution; this side only
// locates it, shells out, and parses its output.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Result, bail};
use regex::Regex;

use crate::shell;

/// Tool script location inside a Closure library checkout.
const TOOL_SCRIPT: &str = "closure/bin/calcdeps.py";

/// Checkout names older installers produce; present-but-misnamed checkouts
/// get a rename hint instead of a generic not-found error.
const RENAMED_CHECKOUTS: [&str; 2] = ["closure-library-read-only", "google-closure-library"];

#[derive(Debug, Clone)]
pub struct DepsTool {
  script: PathBuf,
}

/// One `goog.addDependency(...)` registration emitted by the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepEntry {
  pub path: String,
  pub provides: Vec<String>,
}

fn dep_line_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(r#"goog\.addDependency\(\s*['"]([^'"]*)['"]\s*,\s*\[([^\]]*)\]"#).unwrap()
  })
}

impl DepsTool {
  /// Resolve the tool script under `dir` (relative to `base_dir`).
  pub fn locate(base_dir: &Path, dir: &str) -> Result<Self> {
    let checkout = base_dir.join(dir);
    let script = checkout.join(TOOL_SCRIPT);
    if script.is_file() {
      return Ok(Self { script: PathBuf::from(dir).join(TOOL_SCRIPT) });
    }

    let expected = Path::new(dir).file_name().map_or_else(
      || dir.to_string(),
      |name| name.to_string_lossy().into_owned(),
    );
    if let Some(parent) = checkout.parent() {
      for alt in RENAMED_CHECKOUTS {
        if alt != expected && parent.join(alt).is_dir() {
          bail!(
            "dependency tool checkout is named {alt:?}; rename the directory to {expected:?} so it resolves as {}",
            checkout.display()
          );
        }
      }
    }
    bail!(
      "dependency tool not found at {} -- install the Closure library next to this checkout (developers.google.com/closure/library)",
      script.display()
    );
  }

  /// Tool script path, relative to the build base directory.
  pub fn script(&self) -> &Path {
    &self.script
  }

  /// Emit `goog.addDependency` registration lines for every module under
  /// the search paths.
  pub fn deps_lines(&self, base_dir: &Path, search_paths: &[&str]) -> Result<String> {
    let mut args = path_args(search_paths);
    args.extend(["-o", "deps"]);
    shell::run_script(base_dir, &self.script, &args, "dependency tool")
  }

  /// Compute the dependency-ordered input list for `entry`.
  pub fn ordered_inputs(
    &self,
    base_dir: &Path,
    search_paths: &[&str],
    entry: &str,
  ) -> Result<Vec<String>> {
    let mut args = path_args(search_paths);
    args.extend(["-i", entry, "-o", "list"]);
    let stdout = shell::run_script(base_dir, &self.script, &args, "dependency tool")?;
    let inputs: Vec<String> =
      stdout.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect();
    if inputs.is_empty() {
      bail!("dependency tool returned no inputs for {entry}");
    }
    Ok(inputs)
  }
}

fn path_args<'a>(search_paths: &[&'a str]) -> Vec<&'a str> {
  let mut args = Vec::with_capacity(search_paths.len() * 2 + 4);
  for path in search_paths {
    args.push("-p");
    args.push(path);
  }
  args
}

/// Parse registration lines into `(path, provides)` pairs. The tool emits
/// double-quoted paths while hand-maintained deps files use single quotes;
/// both forms parse. Lines that are not registrations (logging, blanks)
/// are skipped.
pub fn parse_deps_lines(text: &str) -> Vec<DepEntry> {
  let re = dep_line_re();
  let mut entries = Vec::new();
  for caps in re.captures_iter(text) {
    let path = caps[1].to_string();
    let provides = caps[2]
      .split(',')
      .map(|s| s.trim().trim_matches('\'').trim_matches('"'))
      .filter(|s| !s.is_empty())
      .map(String::from)
      .collect();
    entries.push(DepEntry { path, provides });
  }
  entries
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;

  #[test]
  fn parse_tool_emitted_registration() {
    let text = "goog.addDependency(\"../../../blockwork/core/blockwork.js\", ['Blockwork'], ['Blockwork.Workspace']);\n";
    let entries = parse_deps_lines(text);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "../../../blockwork/core/blockwork.js");
    assert_eq!(entries[0].provides, vec!["Blockwork"]);
  }

  #[test]
  fn parse_single_quoted_registration() {
    let text = "goog.addDependency('array/array.js', ['goog.array'], []);\n";
    let entries = parse_deps_lines(text);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "array/array.js");
    assert_eq!(entries[0].provides, vec!["goog.array"]);
  }

  #[test]
  fn parse_skips_noise_lines() {
    let text = "\
// This file was autogenerated.\n\
goog.addDependency(\"array/array.js\", ['goog.array'], []);\n\
\n\
goog.addDependency(\"../../../blockwork/core/field.js\", ['Blockwork.Field', 'Blockwork.FieldLabel'], ['Blockwork.Tooltip']);\n";
    let entries = parse_deps_lines(text);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].path, "array/array.js");
    assert_eq!(entries[0].provides, vec!["goog.array"]);
    assert_eq!(entries[1].provides, vec!["Blockwork.Field", "Blockwork.FieldLabel"]);
  }

  #[test]
  fn parse_empty_provides_list() {
    let text = "goog.addDependency(\"base.js\", [], []);\n";
    let entries = parse_deps_lines(text);
    assert_eq!(entries.len(), 1);
    assert!(entries[0].provides.is_empty());
  }

  #[test]
  fn locate_finds_tool_script() {
    let tmp = tempfile::tempdir().unwrap();
    let bin = tmp.path().join("closure-library/closure/bin");
    fs::create_dir_all(&bin).unwrap();
    fs::write(bin.join("calcdeps.py"), "#!/usr/bin/env python\n").unwrap();

    let tool = DepsTool::locate(tmp.path(), "closure-library");
    assert!(tool.is_ok());
  }

  #[test]
  fn locate_hints_renamed_checkout() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("closure-library-read-only")).unwrap();

    let err = DepsTool::locate(tmp.path(), "closure-library").unwrap_err().to_string();
    assert!(err.contains("closure-library-read-only"), "error: {err}");
    assert!(err.contains("rename"), "error: {err}");
  }

  #[test]
  fn locate_hints_npm_checkout_name() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("google-closure-library")).unwrap();

    let err = DepsTool::locate(tmp.path(), "closure-library").unwrap_err().to_string();
    assert!(err.contains("google-closure-library"), "error: {err}");
  }

  #[test]
  fn locate_reports_expected_path_when_absent() {
    let tmp = tempfile::tempdir().unwrap();

    let err = DepsTool::locate(tmp.path(), "closure-library").unwrap_err().to_string();
    assert!(err.contains("calcdeps.py"), "error: {err}");
    assert!(err.contains("not found"), "error: {err}");
  }
}
