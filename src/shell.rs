/* src/shell.rs */

// Subprocess helpers shared by the dependency tool client and the
// localization pipeline. External scripts are Python; the runtime is
// resolved once per call so `python3`-less hosts still work.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};

use crate::ui::{self, DIM, RESET};

/// Pick the Python runtime available on this host.
pub(crate) fn python_runtime() -> &'static str {
  if which_exists("python3") { "python3" } else { "python" }
}

/// Run a Python script with the given arguments, returning captured stdout.
/// Bails on a non-zero exit, showing both stderr and stdout.
pub(crate) fn run_script(
  base_dir: &Path,
  script: &Path,
  args: &[&str],
  label: &str,
) -> Result<String> {
  let runtime = python_runtime();
  let script_str = script.to_string_lossy();
  ui::detail(&format!("{DIM}{runtime} {script_str} {}{RESET}", args.join(" ")));

  let mut cmd = Command::new(runtime);
  cmd.arg(script.as_os_str());
  cmd.args(args);
  cmd.current_dir(base_dir);

  let output = cmd.output().with_context(|| format!("failed to run {label} ({script_str})"))?;
  if !output.status.success() {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let mut msg = format!("{label} exited with status {}", output.status);
    if !stderr.is_empty() {
      msg.push('\n');
      msg.push_str(&stderr);
    }
    if !stdout.is_empty() {
      msg.push('\n');
      msg.push_str(&stdout);
    }
    bail!("{msg}");
  }

  Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Check if a command exists on PATH.
pub(crate) fn which_exists(cmd: &str) -> bool {
  Command::new("which")
    .arg(cmd)
    .stdout(std::process::Stdio::null())
    .stderr(std::process::Stdio::null())
    .status()
    .map(|s| s.success())
    .unwrap_or(false)
}
