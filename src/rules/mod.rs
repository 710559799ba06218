//! Content rewrite rules for codemod.
//!
//! This module handles:
//! - The `RewriteRule` seam used by the tree walker
//! - Missing import insertion and import path extension rewriting
//! - sed-like substitutions declared in config
//! - Compiling configured rules and the built-in presets

pub mod compile;
pub mod extensions;
pub mod imports;
pub mod presets;
pub mod substitute;

pub use compile::{CompiledRule, compile_rule, compile_rules};
pub use extensions::ImportExtension;
pub use imports::MissingImport;
pub use substitute::Substitution;

use crate::error::RuleError;
use std::path::Path;

/// A pure text transform applied to each eligible file.
///
/// `rewrite` returns `Ok(None)` when the input is left as-is and
/// `Ok(Some(text))` with the new content otherwise.
pub trait RewriteRule: Send + Sync {
	/// Short name used in logs and error messages.
	fn name(&self) -> &str;

	/// Whether this rule should see the file at `path` at all.
	fn applies_to(&self, _path: &Path) -> bool {
		true
	}

	/// Transform `content`.
	fn rewrite(&self, content: &str) -> Result<Option<String>, RuleError>;
}

impl<R: RewriteRule + ?Sized> RewriteRule for Box<R> {
	fn name(&self) -> &str {
		(**self).name()
	}

	fn applies_to(&self, path: &Path) -> bool {
		(**self).applies_to(path)
	}

	fn rewrite(&self, content: &str) -> Result<Option<String>, RuleError> {
		(**self).rewrite(content)
	}
}

/// Check whether `path` has one of `extensions` (compared without a leading dot).
///
/// An empty extension list accepts every path.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
	if extensions.is_empty() {
		return true;
	}

	match path.extension().and_then(|ext| ext.to_str()) {
		Some(ext) => extensions
			.iter()
			.any(|wanted| wanted.trim_start_matches('.') == ext),
		None => false,
	}
}
