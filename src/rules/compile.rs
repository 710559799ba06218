use crate::config::types::{MergedConfig, RuleConfig, RuleKind, RuleWithSource};
use crate::error::{CodemodError, Result, RuleError};
use crate::rules::extensions::{DEFAULT_FROM, DEFAULT_TO};
use crate::rules::{ImportExtension, MissingImport, RewriteRule, Substitution, has_extension};
use std::path::{Path, PathBuf};

/// A configured rule ready to run, with its optional per-rule file filter.
pub struct CompiledRule {
	/// The rule implementation.
	pub rule: Box<dyn RewriteRule>,

	/// Only files with these extensions are handed to the rule.
	pub extensions: Option<Vec<String>>,

	/// Source config path (for debugging).
	pub source: Option<PathBuf>,
}

impl std::fmt::Debug for CompiledRule {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CompiledRule")
			.field("rule", &self.rule.name())
			.field("extensions", &self.extensions)
			.field("source", &self.source)
			.finish()
	}
}

impl CompiledRule {
	/// Wrap a rule that applies to every file the walker hands it.
	pub fn new(rule: impl RewriteRule + 'static) -> Self {
		CompiledRule {
			rule: Box::new(rule),
			extensions: None,
			source: None,
		}
	}

	/// Restrict the rule to files with the given extensions.
	pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
		self.extensions = Some(extensions.iter().map(|ext| ext.to_string()).collect());
		self
	}

	/// Compile a rule from a RuleWithSource.
	pub fn from_rule_with_source(rws: &RuleWithSource) -> Result<Self> {
		Ok(CompiledRule {
			rule: compile_rule(&rws.rule)?,
			extensions: rws.rule.extensions.clone(),
			source: Some(rws.source.clone()),
		})
	}
}

impl RewriteRule for CompiledRule {
	fn name(&self) -> &str {
		self.rule.name()
	}

	fn applies_to(&self, path: &Path) -> bool {
		let extension_ok = match self.extensions {
			Some(ref extensions) => has_extension(path, extensions),
			None => true,
		};
		extension_ok && self.rule.applies_to(path)
	}

	fn rewrite(&self, content: &str) -> std::result::Result<Option<String>, RuleError> {
		self.rule.rewrite(content)
	}
}

/// Build the rule implementation described by a config entry.
pub fn compile_rule(config: &RuleConfig) -> Result<Box<dyn RewriteRule>> {
	config.validate()?;

	let missing = |field: &str| CodemodError::MissingRuleField {
		kind: config.kind.as_str().to_string(),
		field: field.to_string(),
	};

	let rule: Box<dyn RewriteRule> = match config.kind {
		RuleKind::MissingImport => {
			let binding = config.binding.as_deref().ok_or_else(|| missing("binding"))?;
			let source = config.source.as_deref().ok_or_else(|| missing("source"))?;
			Box::new(MissingImport::with_trigger(
				binding,
				source,
				config.trigger.as_deref(),
			)?)
		}
		RuleKind::ImportExtension => {
			let from = match config.from {
				Some(ref from) => from.clone(),
				None => DEFAULT_FROM.iter().map(|ext| ext.to_string()).collect(),
			};
			let to = config.to.as_deref().unwrap_or(DEFAULT_TO);
			Box::new(ImportExtension::new(&from, to)?)
		}
		RuleKind::Substitute => {
			let pattern = config.pattern.as_deref().ok_or_else(|| missing("pattern"))?;
			Box::new(Substitution::parse(pattern)?)
		}
	};

	Ok(rule)
}

/// Compile all rules in a merged config, in cascade order.
pub fn compile_rules(config: &MergedConfig) -> Result<Vec<CompiledRule>> {
	config
		.rules
		.iter()
		.map(CompiledRule::from_rule_with_source)
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn make_rule_with_source(rule: RuleConfig) -> RuleWithSource {
		RuleWithSource {
			rule,
			source: PathBuf::from("test.toml"),
		}
	}

	#[test]
	fn test_compile_missing_import() {
		let rule = RuleConfig {
			kind: RuleKind::MissingImport,
			binding: Some("React".to_string()),
			source: Some("react".to_string()),
			..Default::default()
		};
		let compiled = CompiledRule::from_rule_with_source(&make_rule_with_source(rule)).unwrap();

		assert_eq!(compiled.name(), "missing-import(React)");
		assert_eq!(
			compiled.rewrite("React.createElement('a')").unwrap(),
			Some("import React from \"react\";\nReact.createElement('a')".to_string())
		);
		assert_eq!(compiled.source, Some(PathBuf::from("test.toml")));
	}

	#[test]
	fn test_compile_import_extension_defaults() {
		let rule = RuleConfig {
			kind: RuleKind::ImportExtension,
			..Default::default()
		};
		let compiled = compile_rule(&rule).unwrap();
		assert_eq!(
			compiled.rewrite("import A from './A.tsx';").unwrap(),
			Some("import A from './A.js';".to_string())
		);
	}

	#[test]
	fn test_compile_rejects_empty_target_extension() {
		let rule = RuleConfig {
			kind: RuleKind::ImportExtension,
			to: Some(String::new()),
			..Default::default()
		};
		match compile_rule(&rule) {
			Err(CodemodError::MissingRuleField { field, .. }) => assert_eq!(field, "to"),
			other => panic!("Expected MissingRuleField error, got {:?}", other.map(|r| r.name().to_string())),
		}
	}

	#[test]
	fn test_compile_invalid_substitution() {
		let rule = RuleConfig {
			kind: RuleKind::Substitute,
			pattern: Some("s/[bad/x/".to_string()),
			..Default::default()
		};
		match compile_rule(&rule) {
			Err(CodemodError::InvalidRegex { pattern, .. }) => assert_eq!(pattern, "[bad"),
			other => panic!("Expected InvalidRegex error, got {:?}", other.map(|r| r.name().to_string())),
		}
	}

	#[test]
	fn test_compile_rejects_invalid_config() {
		let rule = RuleConfig {
			kind: RuleKind::Substitute,
			..Default::default()
		};
		assert!(matches!(
			compile_rule(&rule),
			Err(CodemodError::MissingRuleField { .. })
		));
	}

	#[test]
	fn test_per_rule_extension_filter() {
		let rule = RuleConfig {
			kind: RuleKind::ImportExtension,
			extensions: Some(vec!["js".to_string()]),
			..Default::default()
		};
		let compiled = CompiledRule::from_rule_with_source(&make_rule_with_source(rule)).unwrap();

		assert!(compiled.applies_to(Path::new("src/index.js")));
		assert!(!compiled.applies_to(Path::new("src/App.jsx")));
	}

	#[test]
	fn test_compile_rules_keeps_order() {
		let config = MergedConfig {
			rules: vec![
				make_rule_with_source(RuleConfig {
					kind: RuleKind::Substitute,
					pattern: Some("s/a/b/".to_string()),
					..Default::default()
				}),
				make_rule_with_source(RuleConfig {
					kind: RuleKind::ImportExtension,
					..Default::default()
				}),
			],
			..Default::default()
		};

		let compiled = compile_rules(&config).unwrap();
		let names: Vec<&str> = compiled.iter().map(|r| r.name()).collect();
		assert_eq!(names, vec!["s/a/b/", "import-extension(tsx,ts -> js)"]);
	}
}
