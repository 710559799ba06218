use crate::error::{CodemodError, Result, RuleError};
use crate::rules::RewriteRule;
use regex::{Captures, Regex};

/// Extensions rewritten by default, longest first.
pub const DEFAULT_FROM: &[&str] = &["tsx", "ts"];

/// Extension written in their place by default.
pub const DEFAULT_TO: &str = "js";

/// Declaration files keep their specifier untouched.
const RESERVED_SUFFIXES: &[&str] = &[".d.ts"];

/// Rewrites the extension of module specifiers in import statements.
///
/// `import Foo from './Foo.tsx'` becomes `import Foo from './Foo.js'`.
/// Matches `from '...'`, `import '...'`, `import('...')` and `require('...')`
/// with either quote style; everything around the extension is kept.
#[derive(Debug)]
pub struct ImportExtension {
	name: String,
	to: String,
	pattern: Regex,
}

impl ImportExtension {
	/// Rewrite `.tsx` and `.ts` specifiers to `.js`.
	pub fn with_defaults() -> Result<Self> {
		let from: Vec<String> = DEFAULT_FROM.iter().map(|ext| ext.to_string()).collect();
		Self::new(&from, DEFAULT_TO)
	}

	/// Rewrite specifiers ending in any of `from` to end in `to`.
	pub fn new(from: &[String], to: &str) -> Result<Self> {
		let mut from: Vec<&str> = from
			.iter()
			.map(|ext| ext.trim_start_matches('.'))
			.filter(|ext| !ext.is_empty())
			.collect();

		if from.is_empty() {
			return Err(CodemodError::MissingRuleField {
				kind: "import-extension".to_string(),
				field: "from".to_string(),
			});
		}

		// Longest first so `tsx` is tried before `ts`.
		from.sort_by_key(|ext| std::cmp::Reverse(ext.len()));
		let alternation = from
			.iter()
			.map(|ext| regex::escape(ext))
			.collect::<Vec<_>>()
			.join("|");

		let pattern = format!(
			r#"(?P<lead>\bfrom\s+|\bimport\s+|\bimport\s*\(\s*|\brequire\s*\(\s*)(?P<open>['"])(?P<path>[^'"\r\n]+?)\.(?P<ext>{alternation})(?P<close>['"])"#
		);
		let pattern = Regex::new(&pattern)
			.map_err(|source| CodemodError::InvalidRegex { pattern, source })?;

		let to = to.trim().trim_start_matches('.').to_string();
		if to.is_empty() {
			return Err(CodemodError::MissingRuleField {
				kind: "import-extension".to_string(),
				field: "to".to_string(),
			});
		}

		Ok(ImportExtension {
			name: format!("import-extension({} -> {to})", from.join(",")),
			to,
			pattern,
		})
	}

	fn replace(&self, caps: &Captures) -> Option<String> {
		let open = &caps["open"];
		let path = &caps["path"];
		let ext = &caps["ext"];

		if open != &caps["close"] || ext == self.to {
			return None;
		}

		let full = format!("{path}.{ext}");
		if RESERVED_SUFFIXES.iter().any(|suffix| full.ends_with(suffix)) {
			return None;
		}

		Some(format!("{}{open}{path}.{}{open}", &caps["lead"], self.to))
	}
}

impl RewriteRule for ImportExtension {
	fn name(&self) -> &str {
		&self.name
	}

	fn rewrite(&self, content: &str) -> std::result::Result<Option<String>, RuleError> {
		let mut changed = false;

		let output = self.pattern.replace_all(content, |caps: &Captures| {
			match self.replace(caps) {
				Some(rewritten) => {
					changed = true;
					rewritten
				}
				None => caps[0].to_string(),
			}
		});

		Ok(changed.then(|| output.into_owned()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rule() -> ImportExtension {
		ImportExtension::with_defaults().unwrap()
	}

	fn rewrite_path(path: &str) -> String {
		let input = format!("import Thing from '{path}';");
		let output = rule().rewrite(&input).unwrap().unwrap_or(input);
		output
			.trim_start_matches("import Thing from '")
			.trim_end_matches("';")
			.to_string()
	}

	#[test]
	fn test_extension_table() {
		let cases = [
			("./Foo.tsx", "./Foo.js"),
			("../bar/Baz.ts", "../bar/Baz.js"),
			("./types.d.ts", "./types.d.ts"),
		];
		for (input, expected) in cases {
			assert_eq!(rewrite_path(input), expected, "input: {input}");
		}
	}

	#[test]
	fn test_all_statement_shapes() {
		let input = r#"import A from "./A.tsx";
import { b } from './b.ts';
export * from "./c.ts";
import './side-effect.ts';
const lazy = import('./Lazy.tsx');
const legacy = require("./legacy.ts");
"#;
		let expected = r#"import A from "./A.js";
import { b } from './b.js';
export * from "./c.js";
import './side-effect.js';
const lazy = import('./Lazy.js');
const legacy = require("./legacy.js");
"#;
		assert_eq!(rule().rewrite(input).unwrap().unwrap(), expected);
	}

	#[test]
	fn test_declaration_only_file_is_unchanged() {
		let input = "import type { Props } from './types.d.ts';\n";
		assert_eq!(rule().rewrite(input).unwrap(), None);
	}

	#[test]
	fn test_mixed_quotes_are_not_rewritten() {
		let input = "import A from './A.tsx\";\n";
		assert_eq!(rule().rewrite(input).unwrap(), None);
	}

	#[test]
	fn test_non_import_strings_are_untouched() {
		let input = "const file = './notes.ts';\nconsole.log(file);\n";
		assert_eq!(rule().rewrite(input).unwrap(), None);
	}

	#[test]
	fn test_already_normalized() {
		let input = "import A from './A.js';\n";
		assert_eq!(rule().rewrite(input).unwrap(), None);
	}

	#[test]
	fn test_custom_extensions() {
		let rule = ImportExtension::new(&[".jsx".to_string()], ".js").unwrap();
		let output = rule
			.rewrite("import App from './App.jsx';\nimport x from './x.ts';\n")
			.unwrap()
			.unwrap();
		assert_eq!(
			output,
			"import App from './App.js';\nimport x from './x.ts';\n"
		);
	}

	#[test]
	fn test_target_extension_in_from_list_is_stable() {
		let rule = ImportExtension::new(&["js".to_string(), "mjs".to_string()], "js").unwrap();
		assert_eq!(rule.rewrite("import a from './a.js';").unwrap(), None);
		assert_eq!(
			rule.rewrite("import a from './a.mjs';").unwrap().unwrap(),
			"import a from './a.js';"
		);
	}

	#[test]
	fn test_empty_target_extension_is_rejected() {
		for to in ["", ".", " "] {
			match ImportExtension::new(&["tsx".to_string()], to) {
				Err(CodemodError::MissingRuleField { kind, field }) => {
					assert_eq!(kind, "import-extension");
					assert_eq!(field, "to");
				}
				other => panic!("Expected MissingRuleField error for {to:?}, got {other:?}"),
			}
		}
	}

	#[test]
	fn test_empty_from_list_is_rejected() {
		let result = ImportExtension::new(&[], "js");
		assert!(matches!(
			result,
			Err(CodemodError::MissingRuleField { .. })
		));
	}
}
