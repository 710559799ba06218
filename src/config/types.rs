use crate::error::{CodemodError, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Eligible extensions when no config in the cascade sets `extensions`.
pub const DEFAULT_EXTENSIONS: &[&str] = &["js", "jsx"];

/// Top-level configuration from a `.codemod.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop the directory cascade here and skip ~/.codemod.toml.
	#[serde(default)]
	pub root: bool,

	/// Directory to rewrite, relative to this config file.
	pub source_dir: Option<PathBuf>,

	/// File extensions eligible for rewriting (without the dot).
	pub extensions: Option<Vec<String>>,

	/// Directory names (or `*.suffix` patterns) to skip during traversal.
	#[serde(default)]
	pub exclude: Vec<String>,

	/// Process files on a thread pool.
	pub parallel: Option<bool>,

	/// Rewrite rules, applied in order to every eligible file.
	#[serde(default)]
	pub rules: Vec<RuleConfig>,
}

/// Which rewrite a configured rule performs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
	/// Insert an import for a binding that is used but never imported.
	#[default]
	MissingImport,

	/// Rewrite module specifier extensions (e.g. `.tsx` to `.js`).
	ImportExtension,

	/// Apply a sed-like `s/pattern/replacement/flags` substitution.
	Substitute,
}

impl RuleKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			RuleKind::MissingImport => "missing-import",
			RuleKind::ImportExtension => "import-extension",
			RuleKind::Substitute => "substitute",
		}
	}

	/// Fields that must be present, and fields that may be present.
	fn fields(&self) -> (&'static [&'static str], &'static [&'static str]) {
		match self {
			RuleKind::MissingImport => (&["binding", "source"], &["binding", "source", "trigger"]),
			RuleKind::ImportExtension => (&[], &["from", "to"]),
			RuleKind::Substitute => (&["pattern"], &["pattern"]),
		}
	}
}

/// A configured rewrite rule.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RuleConfig {
	/// The kind of rewrite.
	pub kind: RuleKind,

	/// Identifier to import (missing-import).
	pub binding: Option<String>,

	/// Module to import it from (missing-import).
	pub source: Option<String>,

	/// Text whose presence means the binding is used (missing-import).
	/// Defaults to `<binding>.`.
	pub trigger: Option<String>,

	/// Specifier extensions to rewrite (import-extension). Defaults to `["tsx", "ts"]`.
	pub from: Option<Vec<String>>,

	/// Replacement extension (import-extension). Defaults to `js`.
	pub to: Option<String>,

	/// Substitution in `s/pattern/replacement/flags` form (substitute).
	pub pattern: Option<String>,

	/// Restrict this rule to files with these extensions.
	pub extensions: Option<Vec<String>>,
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Effective settings after merging every config in the cascade.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	/// Directory to rewrite, already resolved against its config file.
	pub source_dir: Option<PathBuf>,

	/// Eligible extensions from the most specific config that sets them.
	pub extensions: Option<Vec<String>>,

	/// Union of all exclusion patterns.
	pub exclude: Vec<String>,

	/// Parallel processing, from the most specific config that sets it.
	pub parallel: bool,

	/// All rules from all configs, most specific config first.
	pub rules: Vec<RuleWithSource>,
}

impl MergedConfig {
	/// Configured extensions, or [`DEFAULT_EXTENSIONS`] when none is set.
	pub fn extensions_or_default(&self) -> Vec<String> {
		match &self.extensions {
			Some(extensions) => extensions.clone(),
			None => DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
		}
	}
}

/// A rule with its source config path for debugging/display.
#[derive(Debug, Clone)]
pub struct RuleWithSource {
	/// The rule itself.
	pub rule: RuleConfig,

	/// The config file this rule came from.
	pub source: PathBuf,
}

impl RuleConfig {
	/// Validate that the fields set match the rule kind.
	pub fn validate(&self) -> Result<()> {
		let set_fields = [
			("binding", is_set(&self.binding)),
			("source", is_set(&self.source)),
			("trigger", is_set(&self.trigger)),
			("from", self.from.as_ref().is_some_and(|v| !v.is_empty())),
			("to", is_set(&self.to)),
			("pattern", is_set(&self.pattern)),
		];

		let (required, allowed) = self.kind.fields();

		for field in required {
			let present = set_fields
				.iter()
				.any(|(name, is_set)| name == field && *is_set);
			if !present {
				return Err(CodemodError::MissingRuleField {
					kind: self.kind.as_str().to_string(),
					field: field.to_string(),
				});
			}
		}

		if let Some((name, _)) = set_fields
			.iter()
			.find(|(name, is_set)| *is_set && !allowed.contains(name))
		{
			return Err(CodemodError::UnexpectedRuleField {
				kind: self.kind.as_str().to_string(),
				field: name.to_string(),
			});
		}

		Ok(())
	}
}

fn is_set(value: &Option<String>) -> bool {
	value.as_deref().is_some_and(|v| !v.is_empty())
}

impl Config {
	/// Validate all rules in this config.
	pub fn validate(&self) -> Result<()> {
		for rule in &self.rules {
			rule.validate()?;
		}
		Ok(())
	}
}
