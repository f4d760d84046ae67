/* src/config/tests/parsing.rs */

use crate::config::BlockworkConfig;

#[test]
fn parse_empty_config() {
  let config: BlockworkConfig = toml::from_str("").unwrap();
  assert_eq!(config.project.name, "blockwork");
  assert_eq!(config.project.namespace, "Blockwork");
  assert_eq!(config.deps.dir, "../closure-library");
  assert_eq!(config.compile.endpoint, "https://closure-compiler.appspot.com/compile");
  assert_eq!(config.compile.level, "SIMPLE_OPTIMIZATIONS");
  assert_eq!(config.sources.core_dir, "core");
  assert!(config.sources.entry.is_none());
  assert_eq!(config.sources.blocks_dirs, vec!["blocks"]);
  assert_eq!(config.sources.generators_dir, "generators");
  assert_eq!(config.sources.languages, vec!["javascript", "python", "php", "dart", "lua"]);
  assert_eq!(config.langs.messages, "msg/messages.js");
  assert_eq!(config.langs.json_dir, "msg/json");
  assert_eq!(config.langs.js_dir, "msg/js");
  assert_eq!(config.langs.source_lang, "en");
}

#[test]
fn parse_minimal_config() {
  let toml_str = r#"
[project]
name = "workbench"
"#;
  let config: BlockworkConfig = toml::from_str(toml_str).unwrap();
  assert_eq!(config.project.name, "workbench");
  assert_eq!(config.project.namespace, "Blockwork");
  assert_eq!(config.compile.level, "SIMPLE_OPTIMIZATIONS");
}

#[test]
fn parse_full_config() {
  let toml_str = r#"
[project]
name = "workbench"
namespace = "Workbench"

[deps]
dir = "../third_party/closure-library"

[compile]
endpoint = "https://compile.example.com/compile"
level = "WHITESPACE_ONLY"

[sources]
core_dir = "core"
entry = "core/workbench.js"
blocks_dirs = ["blocks", "blocks/extra"]
generators_dir = "generators"
languages = ["javascript", "lua"]

[langs]
messages = "msg/messages.js"
json_dir = "msg/json"
js_dir = "msg/js"
source_lang = "en"
extract_script = "i18n/js_to_json.py"
generate_script = "i18n/create_messages.py"
"#;
  let config: BlockworkConfig = toml::from_str(toml_str).unwrap();
  assert_eq!(config.project.namespace, "Workbench");
  assert_eq!(config.deps.dir, "../third_party/closure-library");
  assert_eq!(config.compile.endpoint, "https://compile.example.com/compile");
  assert_eq!(config.compile.level, "WHITESPACE_ONLY");
  assert_eq!(config.sources.entry.as_deref(), Some("core/workbench.js"));
  assert_eq!(config.sources.blocks_dirs, vec!["blocks", "blocks/extra"]);
  assert_eq!(config.sources.languages, vec!["javascript", "lua"]);
}

#[test]
fn parse_partial_sections_keep_defaults() {
  let toml_str = r#"
[sources]
languages = ["javascript"]
"#;
  let config: BlockworkConfig = toml::from_str(toml_str).unwrap();
  assert_eq!(config.sources.languages, vec!["javascript"]);
  assert_eq!(config.sources.core_dir, "core");
  assert_eq!(config.project.name, "blockwork");
}
