/* src/build/config.rs */

use crate::config::BlockworkConfig;

/// Core bundle inputs and remote compile settings, derived from a
/// validated config.
#[derive(Debug, Clone)]
pub struct BuildPlan {
  pub name: String,
  pub namespace: String,
  pub entry: String,
  pub core_dir: String,
  pub blocks_dirs: Vec<String>,
  pub generators_dir: String,
  pub languages: Vec<String>,
  pub endpoint: String,
  pub level: String,
  pub deps_dir: String,
}

pub const BLOCKS_TARGET: &str = "blocks_compressed.js";

pub fn lang_target(lang: &str) -> String {
  format!("{lang}_compressed.js")
}

impl BuildPlan {
  pub fn from_config(config: &BlockworkConfig) -> Self {
    let entry = config
      .sources
      .entry
      .clone()
      .unwrap_or_else(|| format!("{}/{}.js", config.sources.core_dir, config.project.name));

    Self {
      name: config.project.name.clone(),
      namespace: config.project.namespace.clone(),
      entry,
      core_dir: config.sources.core_dir.clone(),
      blocks_dirs: config.sources.blocks_dirs.clone(),
      generators_dir: config.sources.generators_dir.clone(),
      languages: config.sources.languages.clone(),
      endpoint: config.compile.endpoint.clone(),
      level: config.compile.level.clone(),
      deps_dir: config.deps.dir.clone(),
    }
  }

  pub fn uncompressed_target(&self) -> String {
    format!("{}_uncompressed.js", self.name)
  }

  pub fn core_target(&self) -> String {
    format!("{}_compressed.js", self.name)
  }

  /// Upper-cased artifact name, used for the loader's global tokens
  /// (`<TOKEN>_DIR`, `<TOKEN>_BOOT`).
  pub fn boot_token(&self) -> String {
    self.name.to_uppercase()
  }

  /// Every bundle file a build writes, in report order.
  pub fn bundle_targets(&self) -> Vec<String> {
    let mut targets = vec![self.uncompressed_target(), self.core_target(), BLOCKS_TARGET.to_string()];
    for lang in &self.languages {
      targets.push(lang_target(lang));
    }
    targets
  }
}

/// Localization pipeline inputs, derived from a validated config.
#[derive(Debug, Clone)]
pub struct LangPlan {
  pub messages: String,
  pub json_dir: String,
  pub js_dir: String,
  pub source_lang: String,
  pub extract_script: String,
  pub generate_script: String,
}

impl LangPlan {
  pub fn from_config(config: &BlockworkConfig) -> Self {
    let langs = &config.langs;
    Self {
      messages: langs.messages.clone(),
      json_dir: langs.json_dir.clone(),
      js_dir: langs.js_dir.clone(),
      source_lang: langs.source_lang.clone(),
      extract_script: langs.extract_script.clone(),
      generate_script: langs.generate_script.clone(),
    }
  }

  /// JSON file the extraction step writes for the source language.
  pub fn source_json(&self) -> String {
    format!("{}/{}.json", self.json_dir, self.source_lang)
  }

  pub fn synonyms_json(&self) -> String {
    format!("{}/synonyms.json", self.json_dir)
  }

  pub fn qqq_json(&self) -> String {
    format!("{}/qqq.json", self.json_dir)
  }

  pub fn keys_json(&self) -> String {
    format!("{}/keys.json", self.json_dir)
  }
}
