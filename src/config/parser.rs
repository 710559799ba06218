use crate::config::types::Config;
use crate::error::{CodemodError, Result};
use std::path::Path;

/// Parse a config file from the given path.
pub fn parse_config_file(path: &Path) -> Result<Config> {
	let content = std::fs::read_to_string(path).map_err(|source| CodemodError::ConfigReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_config_str(&content, path)
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path) -> Result<Config> {
	let config: Config =
		toml::from_str(content).map_err(|source| CodemodError::ConfigParseError {
			path: path.to_path_buf(),
			source,
		})?;

	config.validate()?;

	Ok(config)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::types::RuleKind;
	use std::path::PathBuf;

	#[test]
	fn test_parse_empty_config() {
		let path = PathBuf::from("test.toml");
		let config = parse_config_str("", &path).unwrap();

		assert!(!config.root);
		assert!(config.source_dir.is_none());
		assert!(config.extensions.is_none());
		assert!(config.exclude.is_empty());
		assert!(config.parallel.is_none());
		assert!(config.rules.is_empty());
	}

	#[test]
	fn test_parse_top_level_settings() {
		let content = r#"
root = true
source-dir = "app/src"
extensions = ["js", "jsx"]
exclude = ["node_modules", "*.generated"]
parallel = true
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert!(config.root);
		assert_eq!(config.source_dir, Some(PathBuf::from("app/src")));
		assert_eq!(
			config.extensions,
			Some(vec!["js".to_string(), "jsx".to_string()])
		);
		assert_eq!(config.exclude, vec!["node_modules", "*.generated"]);
		assert_eq!(config.parallel, Some(true));
	}

	#[test]
	fn test_parse_rules_array_of_tables() {
		let content = r#"
[[rules]]
kind = "missing-import"
binding = "React"
source = "react"
extensions = ["jsx"]

[[rules]]
kind = "import-extension"
from = ["tsx"]
to = "js"

[[rules]]
kind = "substitute"
pattern = "s/PropTypes\\.any/PropTypes.node/g"
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert_eq!(config.rules.len(), 3);

		let imports = &config.rules[0];
		assert_eq!(imports.kind, RuleKind::MissingImport);
		assert_eq!(imports.binding, Some("React".to_string()));
		assert_eq!(imports.source, Some("react".to_string()));
		assert_eq!(imports.extensions, Some(vec!["jsx".to_string()]));

		let extensions = &config.rules[1];
		assert_eq!(extensions.kind, RuleKind::ImportExtension);
		assert_eq!(extensions.from, Some(vec!["tsx".to_string()]));
		assert_eq!(extensions.to, Some("js".to_string()));

		let substitute = &config.rules[2];
		assert_eq!(substitute.kind, RuleKind::Substitute);
		assert_eq!(
			substitute.pattern,
			Some(r"s/PropTypes\.any/PropTypes.node/g".to_string())
		);
	}

	#[test]
	fn test_parse_rules_inline_tables() {
		let content = r#"
rules = [
    { kind = "import-extension" },
    { kind = "missing-import", binding = "h", source = "preact", trigger = "h(" },
]
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert_eq!(config.rules.len(), 2);
		assert_eq!(config.rules[1].trigger, Some("h(".to_string()));
	}

	#[test]
	fn test_missing_required_field() {
		let content = r#"
[[rules]]
kind = "missing-import"
binding = "React"
"#;
		let path = PathBuf::from("test.toml");
		let result = parse_config_str(content, &path);

		match result.unwrap_err() {
			CodemodError::MissingRuleField { kind, field } => {
				assert_eq!(kind, "missing-import");
				assert_eq!(field, "source");
			}
			other => panic!("Expected MissingRuleField error, got {other:?}"),
		}
	}

	#[test]
	fn test_field_from_other_kind_is_rejected() {
		let content = r#"
[[rules]]
kind = "substitute"
pattern = "s/a/b/"
binding = "React"
"#;
		let path = PathBuf::from("test.toml");
		let result = parse_config_str(content, &path);

		match result.unwrap_err() {
			CodemodError::UnexpectedRuleField { kind, field } => {
				assert_eq!(kind, "substitute");
				assert_eq!(field, "binding");
			}
			other => panic!("Expected UnexpectedRuleField error, got {other:?}"),
		}
	}

	#[test]
	fn test_unknown_kind_is_a_parse_error() {
		let content = r#"
[[rules]]
kind = "rename-file"
"#;
		let path = PathBuf::from("test.toml");
		assert!(matches!(
			parse_config_str(content, &path),
			Err(CodemodError::ConfigParseError { .. })
		));
	}

	#[test]
	fn test_parse_config_file_missing() {
		let result = parse_config_file(Path::new("/nonexistent/.codemod.toml"));
		assert!(matches!(result, Err(CodemodError::ConfigReadError { .. })));
	}
}
