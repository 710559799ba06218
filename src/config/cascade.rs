use crate::config::parser::parse_config_file;
use crate::config::types::{LoadedConfig, MergedConfig, RuleWithSource};
use crate::error::{CodemodError, Result};
use std::path::{Path, PathBuf};

/// File name looked up in every directory of the cascade.
pub const CONFIG_FILE_NAME: &str = ".codemod.toml";

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.codemod.toml`
/// 2. If found and `root = true`, stop there
/// 3. Otherwise, continue up the directory tree
/// 4. Finally, check ~/.codemod.toml (unless a root config was found)
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();
	let mut current_dir = Some(start_dir);

	while let Some(dir) = current_dir {
		let config_path = dir.join(CONFIG_FILE_NAME);

		if config_path.is_file() {
			let config = parse_config_file(&config_path)?;
			let is_root = config.root;

			tracing::debug!(path = %config_path.display(), root = is_root, "loaded config");
			configs.push(LoadedConfig {
				config,
				path: config_path,
			});

			if is_root {
				return Ok(configs);
			}
		}

		current_dir = dir.parent();
	}

	if let Some(user_config) = load_user_config(&configs)? {
		configs.push(user_config);
	}

	Ok(configs)
}

/// Load the user's ~/.codemod.toml if it exists and wasn't already seen.
fn load_user_config(existing_configs: &[LoadedConfig]) -> Result<Option<LoadedConfig>> {
	let user_config_path = user_config_path()?;

	// The cascade may already have walked through the home directory
	if existing_configs
		.iter()
		.any(|loaded| loaded.path == user_config_path)
	{
		return Ok(None);
	}

	if user_config_path.is_file() {
		let config = parse_config_file(&user_config_path)?;
		Ok(Some(LoadedConfig {
			config,
			path: user_config_path,
		}))
	} else {
		Ok(None)
	}
}

/// Merge multiple configs into a single effective config.
///
/// Scalar settings come from the most specific config that sets them,
/// exclusion patterns are unioned, and rules are concatenated in cascade
/// order. `source-dir` is resolved against the directory of its config file.
pub fn merge_configs(configs: &[LoadedConfig]) -> MergedConfig {
	let mut merged = MergedConfig::default();
	let mut parallel = None;

	for loaded in configs {
		let config = &loaded.config;

		if merged.source_dir.is_none()
			&& let Some(ref source_dir) = config.source_dir
		{
			let base = loaded.path.parent().unwrap_or(Path::new("."));
			merged.source_dir = Some(base.join(source_dir));
		}

		if merged.extensions.is_none() {
			merged.extensions = config.extensions.clone();
		}

		if parallel.is_none() {
			parallel = config.parallel;
		}

		for pattern in &config.exclude {
			if !merged.exclude.contains(pattern) {
				merged.exclude.push(pattern.clone());
			}
		}

		for rule in &config.rules {
			merged.rules.push(RuleWithSource {
				rule: rule.clone(),
				source: loaded.path.clone(),
			});
		}
	}

	merged.parallel = parallel.unwrap_or(false);
	merged
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_merged_config(start_dir: &Path) -> Result<MergedConfig> {
	let configs = discover_configs(start_dir)?;
	Ok(merge_configs(&configs))
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(CodemodError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::types::{Config, RuleConfig, RuleKind};
	use std::fs;

	fn loaded(path: &str, config: Config) -> LoadedConfig {
		LoadedConfig {
			config,
			path: PathBuf::from(path),
		}
	}

	#[test]
	fn test_merge_scalars_most_specific_wins() {
		let inner = Config {
			extensions: Some(vec!["jsx".to_string()]),
			..Default::default()
		};
		let outer = Config {
			source_dir: Some(PathBuf::from("src")),
			extensions: Some(vec!["js".to_string()]),
			parallel: Some(true),
			..Default::default()
		};

		let merged = merge_configs(&[
			loaded("/repo/web/.codemod.toml", inner),
			loaded("/repo/.codemod.toml", outer),
		]);

		assert_eq!(merged.extensions, Some(vec!["jsx".to_string()]));
		assert_eq!(merged.source_dir, Some(PathBuf::from("/repo/src")));
		assert!(merged.parallel);
	}

	#[test]
	fn test_merge_exclude_union_and_rule_order() {
		let inner = Config {
			exclude: vec!["build".to_string()],
			rules: vec![RuleConfig {
				kind: RuleKind::ImportExtension,
				..Default::default()
			}],
			..Default::default()
		};
		let outer = Config {
			exclude: vec!["build".to_string(), "node_modules".to_string()],
			rules: vec![RuleConfig {
				kind: RuleKind::Substitute,
				pattern: Some("s/a/b/".to_string()),
				..Default::default()
			}],
			..Default::default()
		};

		let merged = merge_configs(&[
			loaded("/repo/web/.codemod.toml", inner),
			loaded("/repo/.codemod.toml", outer),
		]);

		assert_eq!(merged.exclude, vec!["build", "node_modules"]);
		assert_eq!(merged.rules.len(), 2);
		assert_eq!(merged.rules[0].rule.kind, RuleKind::ImportExtension);
		assert_eq!(merged.rules[0].source, PathBuf::from("/repo/web/.codemod.toml"));
		assert_eq!(merged.rules[1].rule.kind, RuleKind::Substitute);
	}

	#[test]
	fn test_merge_empty() {
		let merged = merge_configs(&[]);
		assert!(merged.source_dir.is_none());
		assert!(!merged.parallel);
		assert!(merged.rules.is_empty());
	}

	#[test]
	fn test_extensions_default_when_unset() {
		let merged = merge_configs(&[]);
		assert_eq!(merged.extensions_or_default(), vec!["js", "jsx"]);

		let configured = Config {
			extensions: Some(vec!["ts".to_string()]),
			..Default::default()
		};
		let merged = merge_configs(&[loaded("/repo/.codemod.toml", configured)]);
		assert_eq!(merged.extensions_or_default(), vec!["ts"]);
	}

	#[test]
	fn test_discover_stops_at_root_config() {
		let temp_dir = tempfile::tempdir().unwrap();
		let outer = temp_dir.path();
		let inner = outer.join("web");
		fs::create_dir_all(&inner).unwrap();

		fs::write(outer.join(CONFIG_FILE_NAME), "root = true\nparallel = true\n").unwrap();
		fs::write(inner.join(CONFIG_FILE_NAME), "source-dir = \"src\"\n").unwrap();

		let configs = discover_configs(&inner).unwrap();
		assert_eq!(configs.len(), 2);
		assert_eq!(configs[0].path, inner.join(CONFIG_FILE_NAME));
		assert_eq!(configs[1].path, outer.join(CONFIG_FILE_NAME));

		let merged = merge_configs(&configs);
		assert_eq!(merged.source_dir, Some(inner.join("src")));
		assert!(merged.parallel);
	}

	#[test]
	fn test_discover_propagates_parse_errors() {
		let temp_dir = tempfile::tempdir().unwrap();
		fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "root = \"yes\"\n").unwrap();

		let result = discover_configs(temp_dir.path());
		assert!(matches!(result, Err(CodemodError::ConfigParseError { .. })));
	}

	#[test]
	fn test_user_config_path() {
		let path = user_config_path().unwrap();
		assert!(path.ends_with(CONFIG_FILE_NAME));
	}
}
