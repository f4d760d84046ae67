/* src/build/compiler.rs */

// Client for the remote compilation service. Each bundle is one POST of
// URL-encoded form fields; the JSON response carries compiled code,
// diagnostics keyed by synthetic input names, and size statistics.

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::ui;

/// One bundle submission: ordered form parameters plus the input names
/// used to resolve diagnostics back to source files.
#[derive(Debug)]
pub struct CompileJob {
  pub target: String,
  pub params: Vec<(String, String)>,
  pub inputs: Vec<String>,
  pub remove: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompileResponse {
  #[serde(rename = "compiledCode")]
  pub compiled_code: Option<String>,
  #[serde(default)]
  pub warnings: Vec<Diagnostic>,
  #[serde(default)]
  pub errors: Vec<Diagnostic>,
  #[serde(rename = "serverErrors", default)]
  pub server_errors: Vec<ServerError>,
  pub statistics: Option<Statistics>,
}

/// Error or warning entry. The service uses `error` or `warning` for the
/// message key depending on the list the entry sits in.
#[derive(Debug, Deserialize)]
pub struct Diagnostic {
  #[serde(default)]
  pub file: Option<String>,
  #[serde(default)]
  pub lineno: Option<u32>,
  #[serde(default)]
  pub charno: Option<u32>,
  #[serde(default)]
  pub line: Option<String>,
  #[serde(rename = "error", alias = "warning", default)]
  pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ServerError {
  #[serde(default)]
  pub code: Option<i64>,
  pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct Statistics {
  #[serde(rename = "originalSize")]
  pub original_size: i64,
  #[serde(rename = "compressedSize")]
  pub compressed_size: i64,
}

/// Compiled code plus the sizes reported by the service.
#[derive(Debug)]
pub struct CompileOutcome {
  pub code: String,
  pub original_size: u64,
  pub compressed_size: u64,
}

pub struct Compiler {
  client: reqwest::Client,
  endpoint: String,
}

impl Compiler {
  pub fn new(endpoint: &str) -> Self {
    Self { client: reqwest::Client::new(), endpoint: endpoint.to_string() }
  }

  pub async fn compile(&self, job: &CompileJob) -> Result<CompileOutcome> {
    let response = self
      .client
      .post(&self.endpoint)
      .form(&job.params)
      .send()
      .await
      .with_context(|| format!("failed to reach the compile service for {}", job.target))?;
    if !response.status().is_success() {
      bail!("compile service returned HTTP {} for {}", response.status(), job.target);
    }
    let data: CompileResponse = response
      .json()
      .await
      .with_context(|| format!("failed to decode the compile response for {}", job.target))?;
    evaluate_response(job, data)
  }
}

/// Turn a decoded response into compiled code, printing diagnostics along
/// the way. Warnings are reported and kept non-fatal; everything else that
/// is not a clean result fails the bundle.
pub(super) fn evaluate_response(job: &CompileJob, data: CompileResponse) -> Result<CompileOutcome> {
  if !data.server_errors.is_empty() {
    let mut msg = format!("compile service rejected {}", job.target);
    for err in &data.server_errors {
      msg.push('\n');
      match err.code {
        Some(code) => msg.push_str(&format!("server error {code}: {}", err.error)),
        None => msg.push_str(&format!("server error: {}", err.error)),
      }
    }
    bail!("{msg}");
  }

  if !data.errors.is_empty() {
    print_diagnostics(&job.target, &data.errors, &job.inputs, ui::fail);
    bail!("{} compile error(s) in {}", data.errors.len(), job.target);
  }

  if !data.warnings.is_empty() {
    print_diagnostics(&job.target, &data.warnings, &job.inputs, ui::warn);
  }

  let Some(code) = data.compiled_code else {
    bail!("compile service returned no compiled code for {}", job.target);
  };

  let stats = match data.statistics {
    Some(s) if s.original_size > 0 && s.compressed_size > 0 => s,
    _ => bail!("compile service returned empty size statistics for {}", job.target),
  };

  Ok(CompileOutcome {
    code,
    original_size: stats.original_size as u64,
    compressed_size: stats.compressed_size as u64,
  })
}

/// Print each diagnostic with its source context: resolved file name, line
/// number, offending line, and a caret at the reported column.
fn print_diagnostics(target: &str, items: &[Diagnostic], inputs: &[String], show: fn(&str)) {
  for item in items {
    let message = item.message.as_deref().unwrap_or("(no message)");
    show(&format!("{target}: {message}"));
    if let Some(ref file) = item.file {
      let lineno = item.lineno.unwrap_or(0);
      ui::detail(&format!("{} at line {lineno}:", resolve_input_name(inputs, file)));
      if let Some(ref line) = item.line {
        ui::detail(line);
        let charno = item.charno.unwrap_or(0) as usize;
        ui::detail(&format!("{}^", " ".repeat(charno)));
      }
    }
  }
}

/// Map the service's synthetic `Input_N` names back to submitted inputs.
/// `Input_1` is the first submission; anything unrecognized becomes `???`.
pub(super) fn resolve_input_name(inputs: &[String], name: &str) -> String {
  let Some(num) = name.strip_prefix("Input_") else {
    return "???".to_string();
  };
  num
    .parse::<usize>()
    .ok()
    .and_then(|n| n.checked_sub(1))
    .and_then(|i| inputs.get(i))
    .map_or_else(|| "???".to_string(), Clone::clone)
}
