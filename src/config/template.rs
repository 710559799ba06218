/// Template written by `codemod --init`.
pub fn init_template() -> &'static str {
	r#"# codemod configuration
#
# Settings in the closest .codemod.toml win; rules from every config in the
# cascade are applied, closest first. `root = true` stops the upward search.
root = true

# Directory to rewrite, relative to this file.
source-dir = "src"

# Only files with these extensions are rewritten.
extensions = ["js", "jsx"]

# Directory names (or "*.suffix" patterns) that are never entered.
exclude = ["node_modules", "build", "dist"]

# Process files on a thread pool.
parallel = false

# Add `import React from "react";` where React is used but not imported.
[[rules]]
kind = "missing-import"
binding = "React"
source = "react"

# Point imports of .tsx/.ts modules at their compiled .js output.
[[rules]]
kind = "import-extension"
from = ["tsx", "ts"]
to = "js"
extensions = ["js"]

# Arbitrary sed-like substitutions are also supported:
# [[rules]]
# kind = "substitute"
# pattern = "s/from 'prop-types'/from \"prop-types\"/g"
"#
}
