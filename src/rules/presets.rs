//! Built-in passes that run without any config file.

use crate::error::Result;
use crate::rules::{CompiledRule, ImportExtension, MissingImport};

/// Default binding added by the `add-imports` pass.
pub const REACT_BINDING: &str = "React";

/// Default module the binding is imported from.
pub const REACT_SOURCE: &str = "react";

/// Extensions scanned by the `add-imports` pass.
pub const ADD_IMPORTS_EXTENSIONS: &[&str] = &["js", "jsx"];

/// Extensions scanned by the `fix-extensions` pass.
pub const FIX_EXTENSIONS_EXTENSIONS: &[&str] = &["js"];

/// Directory rewritten when no root is given.
pub const DEFAULT_SOURCE_DIR: &str = "src";

/// Add a missing `import <binding> from "<source>";` to every file using it.
pub fn add_imports(binding: &str, source: &str) -> Result<Vec<CompiledRule>> {
	Ok(vec![CompiledRule::new(MissingImport::new(binding, source)?)])
}

/// Rewrite `.tsx`/`.ts` module specifiers to `to`.
pub fn fix_extensions(to: &str) -> Result<Vec<CompiledRule>> {
	let from: Vec<String> = crate::rules::extensions::DEFAULT_FROM
		.iter()
		.map(|ext| ext.to_string())
		.collect();
	Ok(vec![CompiledRule::new(ImportExtension::new(&from, to)?)])
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::rules::RewriteRule;

	#[test]
	fn test_add_imports_preset() {
		let rules = add_imports(REACT_BINDING, REACT_SOURCE).unwrap();
		assert_eq!(rules.len(), 1);
		assert_eq!(
			rules[0].rewrite("React.createElement('div')").unwrap(),
			Some("import React from \"react\";\nReact.createElement('div')".to_string())
		);
	}

	#[test]
	fn test_fix_extensions_preset() {
		let rules = fix_extensions("js").unwrap();
		assert_eq!(
			rules[0].rewrite("import T from './types.d.ts';\nimport F from './Foo.tsx';").unwrap(),
			Some("import T from './types.d.ts';\nimport F from './Foo.js';".to_string())
		);
	}
}
