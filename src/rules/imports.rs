use crate::error::{CodemodError, Result, RuleError};
use crate::rules::RewriteRule;
use regex::Regex;

/// Inserts `import <binding> from "<source>";` into files that use the
/// binding without importing it.
///
/// This is a textual heuristic: a file "uses" the binding when it contains
/// the trigger text, and "imports" it when an `import <binding>` or
/// `import * as <binding>` statement is present anywhere in the file.
#[derive(Debug)]
pub struct MissingImport {
	name: String,
	binding: String,
	source: String,
	trigger: String,
	existing: Regex,
}

impl MissingImport {
	/// Create a rule triggered by `<binding>.` (e.g. `React.createElement`).
	pub fn new(binding: &str, source: &str) -> Result<Self> {
		Self::with_trigger(binding, source, None)
	}

	/// Create a rule with an explicit trigger text.
	///
	/// An empty `trigger` falls back to the default `<binding>.`.
	pub fn with_trigger(binding: &str, source: &str, trigger: Option<&str>) -> Result<Self> {
		let binding = binding.trim();
		let source = source.trim();
		for (field, value) in [("binding", binding), ("source", source)] {
			if value.is_empty() {
				return Err(CodemodError::MissingRuleField {
					kind: "missing-import".to_string(),
					field: field.to_string(),
				});
			}
		}

		let pattern = format!(r"\bimport\s+(?:\*\s+as\s+)?{}\b", regex::escape(binding));
		let existing = Regex::new(&pattern)
			.map_err(|source| CodemodError::InvalidRegex { pattern, source })?;

		Ok(MissingImport {
			name: format!("missing-import({binding})"),
			binding: binding.to_string(),
			source: source.to_string(),
			trigger: trigger
				.filter(|trigger| !trigger.is_empty())
				.map(str::to_string)
				.unwrap_or_else(|| format!("{binding}.")),
			existing,
		})
	}

	/// The statement this rule inserts.
	pub fn import_line(&self) -> String {
		format!("import {} from \"{}\";", self.binding, self.source)
	}

	/// Whether `content` uses the binding but lacks an import of it.
	pub fn needs_import(&self, content: &str) -> bool {
		content.contains(&self.trigger) && !self.existing.is_match(content)
	}
}

impl RewriteRule for MissingImport {
	fn name(&self) -> &str {
		&self.name
	}

	fn rewrite(&self, content: &str) -> std::result::Result<Option<String>, RuleError> {
		if !self.needs_import(content) {
			return Ok(None);
		}

		let lines: Vec<&str> = content.split('\n').collect();
		let at = insertion_index(lines.iter().copied());

		// Keep CRLF files consistent; `split('\n')` leaves the '\r' on each line.
		let cr = if content.contains("\r\n") { "\r" } else { "" };
		let inserted = format!("{}{cr}", self.import_line());

		let mut out: Vec<&str> = Vec::with_capacity(lines.len() + 1);
		out.extend_from_slice(&lines[..at]);
		out.push(&inserted);
		out.extend_from_slice(&lines[at..]);

		Ok(Some(out.join("\n")))
	}
}

/// Line index right after the leading run of import statements.
///
/// Blank lines are skipped; the first line that is neither blank nor an
/// import ends the scan. Returns 0 when the file has no leading imports.
pub fn insertion_index<'a>(lines: impl IntoIterator<Item = &'a str>) -> usize {
	let mut insert_at = 0;

	for (index, line) in lines.into_iter().enumerate() {
		let trimmed = line.trim();
		if is_import_line(trimmed) {
			insert_at = index + 1;
		} else if !trimmed.is_empty() {
			break;
		}
	}

	insert_at
}

fn is_import_line(trimmed: &str) -> bool {
	match trimmed.strip_prefix("import") {
		Some(rest) => !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_' || c == '$'),
		None => false,
	}
}
