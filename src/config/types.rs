/* src/config/types.rs */

use anyhow::{Result, bail};
use serde::Deserialize;

/// Parsed `blockwork.toml`. Every field has a default reproducing the
/// canonical source layout, so a missing config file means a plain build.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlockworkConfig {
  pub project: ProjectSection,
  pub deps: DepsSection,
  pub compile: CompileSection,
  pub sources: SourcesSection,
  pub langs: LangsSection,
}

impl BlockworkConfig {
  pub fn validate(&self) -> Result<()> {
    self.project.validate()?;
    self.deps.validate()?;
    self.compile.validate()?;
    self.sources.validate()?;
    self.langs.validate()?;
    Ok(())
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
  /// Artifact prefix: `<name>_uncompressed.js`, `<name>_compressed.js`.
  #[serde(default = "default_name")]
  pub name: String,
  /// Root JavaScript object the sources provide under.
  #[serde(default = "default_namespace")]
  pub namespace: String,
}

impl ProjectSection {
  fn validate(&self) -> Result<()> {
    if !identifier_shaped(&self.name) {
      bail!(
        "project.name must start with a letter and use only letters, digits, or underscores, got {:?}",
        self.name
      );
    }
    if !identifier_shaped(&self.namespace) {
      bail!("project.namespace must be a JavaScript identifier, got {:?}", self.namespace);
    }
    Ok(())
  }
}

/// Both project fields reach generated JavaScript (the loader's boot token
/// and a RegExp literal), so they must stay identifier-shaped.
fn identifier_shaped(value: &str) -> bool {
  let mut chars = value.chars();
  chars.next().is_some_and(|c| c.is_ascii_alphabetic())
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Default for ProjectSection {
  fn default() -> Self {
    Self { name: default_name(), namespace: default_namespace() }
  }
}

fn default_name() -> String {
  "blockwork".to_string()
}

fn default_namespace() -> String {
  "Blockwork".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepsSection {
  /// Dependency tool checkout, relative to the base directory.
  #[serde(default = "default_deps_dir")]
  pub dir: String,
}

impl DepsSection {
  fn validate(&self) -> Result<()> {
    if self.dir.is_empty() {
      bail!("deps.dir must not be empty");
    }
    Ok(())
  }
}

impl Default for DepsSection {
  fn default() -> Self {
    Self { dir: default_deps_dir() }
  }
}

fn default_deps_dir() -> String {
  "../closure-library".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompileSection {
  #[serde(default = "default_endpoint")]
  pub endpoint: String,
  #[serde(default = "default_level")]
  pub level: String,
}

const COMPILE_LEVELS: [&str; 3] =
  ["WHITESPACE_ONLY", "SIMPLE_OPTIMIZATIONS", "ADVANCED_OPTIMIZATIONS"];

impl CompileSection {
  fn validate(&self) -> Result<()> {
    if !COMPILE_LEVELS.contains(&self.level.as_str()) {
      bail!("compile.level must be one of {COMPILE_LEVELS:?}, got {:?}", self.level);
    }
    Ok(())
  }
}

impl Default for CompileSection {
  fn default() -> Self {
    Self { endpoint: default_endpoint(), level: default_level() }
  }
}

fn default_endpoint() -> String {
  "https://closure-compiler.appspot.com/compile".to_string()
}

fn default_level() -> String {
  "SIMPLE_OPTIMIZATIONS".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesSection {
  #[serde(default = "default_core_dir")]
  pub core_dir: String,
  /// Entry module; defaults to `<core_dir>/<project.name>.js`.
  #[serde(default)]
  pub entry: Option<String>,
  #[serde(default = "default_blocks_dirs")]
  pub blocks_dirs: Vec<String>,
  #[serde(default = "default_generators_dir")]
  pub generators_dir: String,
  #[serde(default = "default_languages")]
  pub languages: Vec<String>,
}

impl SourcesSection {
  fn validate(&self) -> Result<()> {
    if self.languages.is_empty() {
      bail!("sources.languages must not be empty");
    }
    if self.blocks_dirs.is_empty() {
      bail!("sources.blocks_dirs must not be empty");
    }
    if let Some(ref entry) = self.entry {
      let prefix = format!("{}/", self.core_dir);
      if !entry.starts_with(&prefix) {
        bail!("sources.entry {entry:?} must live under sources.core_dir {:?}", self.core_dir);
      }
    }
    Ok(())
  }
}

impl Default for SourcesSection {
  fn default() -> Self {
    Self {
      core_dir: default_core_dir(),
      entry: None,
      blocks_dirs: default_blocks_dirs(),
      generators_dir: default_generators_dir(),
      languages: default_languages(),
    }
  }
}

fn default_core_dir() -> String {
  "core".to_string()
}

fn default_blocks_dirs() -> Vec<String> {
  vec!["blocks".to_string()]
}

fn default_generators_dir() -> String {
  "generators".to_string()
}

fn default_languages() -> Vec<String> {
  ["javascript", "python", "php", "dart", "lua"].map(String::from).to_vec()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LangsSection {
  /// Master message definition file.
  #[serde(default = "default_messages")]
  pub messages: String,
  #[serde(default = "default_json_dir")]
  pub json_dir: String,
  #[serde(default = "default_js_dir")]
  pub js_dir: String,
  #[serde(default = "default_source_lang")]
  pub source_lang: String,
  #[serde(default = "default_extract_script")]
  pub extract_script: String,
  #[serde(default = "default_generate_script")]
  pub generate_script: String,
}

impl LangsSection {
  fn validate(&self) -> Result<()> {
    if self.source_lang.is_empty() {
      bail!("langs.source_lang must not be empty");
    }
    Ok(())
  }
}

impl Default for LangsSection {
  fn default() -> Self {
    Self {
      messages: default_messages(),
      json_dir: default_json_dir(),
      js_dir: default_js_dir(),
      source_lang: default_source_lang(),
      extract_script: default_extract_script(),
      generate_script: default_generate_script(),
    }
  }
}

fn default_messages() -> String {
  "msg/messages.js".to_string()
}

fn default_json_dir() -> String {
  "msg/json".to_string()
}

fn default_js_dir() -> String {
  "msg/js".to_string()
}

fn default_source_lang() -> String {
  "en".to_string()
}

fn default_extract_script() -> String {
  "i18n/js_to_json.py".to_string()
}

fn default_generate_script() -> String {
  "i18n/create_messages.py".to_string()
}
