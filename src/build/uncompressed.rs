/* src/build/uncompressed.rs */

// Development loader: registers every module with the Closure loader and
// requires the library namespaces, so a page can run straight from source
// checkouts without a compile round-trip.

use std::path::Path;

use anyhow::{Context, Result, bail};
use regex::Regex;

use crate::build::config::BuildPlan;
use crate::build::license::GENERATED_HEADER;
use crate::deps::{self, DepEntry, DepsTool};
use crate::ui::{self, DIM, RESET};

pub fn generate(base_dir: &Path, plan: &BuildPlan, tool: &DepsTool) -> Result<()> {
  let search_paths = [plan.core_dir.as_str(), plan.deps_dir.as_str()];
  let deps_text = tool.deps_lines(base_dir, &search_paths)?;

  let lib_re = library_path_re(&deps_text, &plan.entry, &plan.core_dir)?;
  let entries = deps::parse_deps_lines(&deps_text);
  let provides = own_provides(&entries, &lib_re);
  if provides.is_empty() {
    bail!("no provided namespaces found under {}", plan.core_dir);
  }
  let registrations = rewrite_repo_dir(deps_text.trim_end(), &lib_re);

  let target = plan.uncompressed_target();
  let content = render_loader(plan, &registrations, &provides);
  std::fs::write(base_dir.join(&target), &content)
    .with_context(|| format!("failed to write {target}"))?;

  ui::ok(&format!("{target} {DIM}({}){RESET}", ui::format_size(content.len() as u64)));
  Ok(())
}

/// Matcher for library-own registered paths. Registered paths are relative
/// to the tool's base module, and tool-internal files can climb out of it
/// too (`../../third_party/...`), so library files are recognized by their
/// `/<checkout>/<core-dir>/` segment; the checkout component is discovered
/// from the entry file's own registration.
fn library_path_re(deps_text: &str, entry: &str, core_dir: &str) -> Result<Regex> {
  let entry_pat =
    entry.split('/').map(regex::escape).collect::<Vec<_>>().join(r"[/\\]");
  let finder = Regex::new(&format!(r"[/\\]([^/\\]+)[/\\]{entry_pat}"))
    .context("building the entry locator pattern")?;
  let Some(caps) = finder.captures(deps_text) else {
    bail!("entry {entry} was never registered by the dependency tool; is the file present?");
  };
  let checkout = regex::escape(&caps[1]);

  let dir_pat =
    core_dir.split('/').map(regex::escape).collect::<Vec<_>>().join(r"[/\\]");
  Regex::new(&format!(r"([/\\]){checkout}([/\\]{dir_pat}[/\\])"))
    .context("building the library path pattern")
}

/// Replace the checkout directory component in library paths with a
/// runtime token, so a loader generated in one checkout works in another
/// with a different directory name.
fn rewrite_repo_dir(deps_text: &str, lib_re: &Regex) -> String {
  lib_re.replace_all(deps_text, r#"${1}" + dir + "${2}"#).into_owned()
}

/// Namespaces provided by library-own sources, sorted and deduplicated.
fn own_provides(entries: &[DepEntry], lib_re: &Regex) -> Vec<String> {
  let mut provides: Vec<String> = entries
    .iter()
    .filter(|e| lib_re.is_match(&e.path))
    .flat_map(|e| e.provides.iter().cloned())
    .collect();
  provides.sort();
  provides.dedup();
  provides
}

fn render_loader(plan: &BuildPlan, registrations: &str, provides: &[String]) -> String {
  let token = plan.boot_token();
  let name = &plan.name;
  let namespace = &plan.namespace;
  let deps_dir = &plan.deps_dir;

  let mut out = String::new();
  out.push_str(GENERATED_HEADER);
  out.push_str(
    "\nvar isNodeJS = !!(typeof module !== 'undefined' && module.exports &&\n                  typeof window === 'undefined');\n\n",
  );
  out.push_str(&format!(
    "if (isNodeJS) {{\n  var window = {{}};\n  require('{deps_dir}/closure/goog/bootstrap/nodejs');\n}}\n\n"
  ));

  out.push_str(&format!("window.{token}_DIR = (function() {{\n"));
  out.push_str("  if (!isNodeJS) {\n");
  out.push_str("    // Find name of current directory.\n");
  out.push_str("    var scripts = document.getElementsByTagName('script');\n");
  out.push_str(&format!(
    r"    var re = new RegExp('(.+)[\\/]{name}_uncompressed\\.js$');"
  ));
  out.push('\n');
  out.push_str("    for (var i = 0, script; script = scripts[i]; i++) {\n");
  out.push_str("      var match = re.exec(script.src);\n");
  out.push_str("      if (match) {\n        return match[1];\n      }\n    }\n");
  out.push_str(&format!(
    r"    alert('Could not detect the directory name of {name}_uncompressed.js');"
  ));
  out.push('\n');
  out.push_str("  }\n  return '';\n})();\n\n");

  out.push_str(&format!("window.{token}_BOOT = function() {{\n"));
  out.push_str("  var dir = '';\n");
  out.push_str("  if (isNodeJS) {\n");
  out.push_str(&format!("    require('{deps_dir}/closure/goog/bootstrap/nodejs');\n"));
  out.push_str(&format!("    dir = '{name}';\n"));
  out.push_str("  } else {\n");
  out.push_str("    // Closure must already be on the page.\n");
  out.push_str("    if (!window.goog) {\n");
  out.push_str(
    r"      alert('Error: Closure not found.  Read this:\n' + 'developers.google.com/closure/library');",
  );
  out.push('\n');
  out.push_str("    }\n");
  out.push_str(&format!(r"    dir = window.{token}_DIR.match(/[^\/]+$/)[0];"));
  out.push('\n');
  out.push_str("  }\n");
  out.push_str(registrations);
  out.push('\n');

  out.push_str(&format!("\n// Load {namespace}.\n"));
  for provide in provides {
    out.push_str(&format!("goog.require('{provide}');\n"));
  }

  out.push_str(&format!("\ndelete this.{token}_DIR;\ndelete this.{token}_BOOT;\n}};\n\n"));
  out.push_str("if (isNodeJS) {\n");
  out.push_str(&format!("  window.{token}_BOOT()\n"));
  out.push_str(&format!("  module.exports = {namespace};\n"));
  out.push_str("} else {\n");
  out.push_str("  // Clear any pre-existing Closure before loading a fresh copy.\n");
  out.push_str("  document.write('<script>var goog = undefined;</script>');\n");
  out.push_str(&format!(
    "  document.write('<script src=\"' + window.{token}_DIR + '/{deps_dir}/closure/goog/base.js\"></script>');\n"
  ));
  out.push_str(&format!("  document.write('<script>window.{token}_BOOT();</script>');\n"));
  out.push_str("}\n");
  out
}
