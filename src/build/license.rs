/* src/build/license.rs */

use std::sync::OnceLock;

use regex::Regex;

/// First lines of every generated artifact.
pub const GENERATED_HEADER: &str =
  "// Do not edit this file; automatically generated by blockwork-build.\n'use strict';\n";

// The compilation service preserves license comments verbatim, so a bundle
// of N source files carries N copies of the same Apache block. Matches the
// block as the service re-emits it: product line, copyright line, project
// URL line, then the fixed license body.
fn license_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(concat!(
      r"/\*\n\n",
      r" [\w ]+\n\n",
      r" (Copyright \d+ [^\n]+)\n",
      r" [^\n]+\n\n",
      r#" Licensed under the Apache License, Version 2\.0 \(the "License"\);\n"#,
      r" you may not use this file except in compliance with the License\.\n",
      r" You may obtain a copy of the License at\n\n",
      r"   http://www\.apache\.org/licenses/LICENSE-2\.0\n\n",
      r" Unless required by applicable law or agreed to in writing, software\n",
      r#" distributed under the License is distributed on an "AS IS" BASIS,\n"#,
      r" WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied\.\n",
      r" See the License for the specific language governing permissions and\n",
      r" limitations under the License\.\n",
      r"\*/",
    ))
    .unwrap()
  })
}

/// Collapse each full Apache license block into a one-line attribution.
pub fn trim_licenses(code: &str) -> String {
  license_re().replace_all(code, "\n// ${1}  Apache License 2.0").into_owned()
}
