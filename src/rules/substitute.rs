use crate::error::{CodemodError, Result, RuleError};
use crate::rules::RewriteRule;
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;

/// Parsed substitution command (sed-like syntax).
#[derive(Debug)]
pub struct Substitution {
	/// The source text, kept for logs.
	pub source: String,

	/// The pattern to match.
	pub pattern: Regex,

	/// The replacement string (`$1`, `${name}` expand capture groups).
	pub replacement: String,

	/// Whether to replace all occurrences (global flag).
	pub global: bool,
}

impl Substitution {
	/// Parse a substitution in sed-like format: `s/pattern/replacement/flags`.
	///
	/// Any character after the `s` is the delimiter. Supported flags are
	/// `g` (global), `i` (case-insensitive) and `m` (`^`/`$` match per line).
	pub fn parse(input: &str) -> Result<Self> {
		let invalid = |reason: &str| CodemodError::InvalidSubstitution {
			input: input.to_string(),
			reason: reason.to_string(),
		};

		let rest = input
			.strip_prefix('s')
			.ok_or_else(|| invalid("must start with 's'"))?;

		let delimiter = rest.chars().next().ok_or_else(|| invalid("too short"))?;
		if delimiter.is_alphanumeric() || delimiter == '\\' || delimiter.is_whitespace() {
			return Err(invalid("delimiter must be a punctuation character"));
		}

		let parts = split_by_delimiter(&rest[delimiter.len_utf8()..], delimiter);
		if parts.len() < 2 {
			return Err(invalid("must have pattern and replacement"));
		}
		if parts.len() > 3 {
			return Err(invalid("unescaped delimiter in replacement"));
		}

		let pattern_str = &parts[0];
		if pattern_str.is_empty() {
			return Err(invalid("pattern is empty"));
		}

		let replacement = parts[1].clone();
		let flags = parts.get(2).map(String::as_str).unwrap_or("");

		let mut global = false;
		let mut builder = RegexBuilder::new(pattern_str);
		for flag in flags.chars() {
			match flag {
				'g' => global = true,
				'i' => {
					builder.case_insensitive(true);
				}
				'm' => {
					builder.multi_line(true);
				}
				other => return Err(invalid(&format!("unknown flag '{other}'"))),
			}
		}

		let pattern = builder
			.build()
			.map_err(|source| CodemodError::InvalidRegex {
				pattern: pattern_str.to_string(),
				source,
			})?;

		Ok(Substitution {
			source: input.to_string(),
			pattern,
			replacement,
			global,
		})
	}

	/// Apply this substitution to a string.
	pub fn apply<'a>(&self, input: &'a str) -> Cow<'a, str> {
		if self.global {
			self.pattern.replace_all(input, self.replacement.as_str())
		} else {
			self.pattern.replace(input, self.replacement.as_str())
		}
	}
}

impl RewriteRule for Substitution {
	fn name(&self) -> &str {
		&self.source
	}

	fn rewrite(&self, content: &str) -> std::result::Result<Option<String>, RuleError> {
		match self.apply(content) {
			Cow::Borrowed(_) => Ok(None),
			Cow::Owned(output) if output == content => Ok(None),
			Cow::Owned(output) => Ok(Some(output)),
		}
	}
}

/// Split a string by a delimiter, respecting backslash escapes of the delimiter.
fn split_by_delimiter(input: &str, delimiter: char) -> Vec<String> {
	let mut parts = Vec::new();
	let mut current = String::new();
	let mut chars = input.chars().peekable();

	while let Some(c) = chars.next() {
		if c == '\\' && chars.peek() == Some(&delimiter) {
			current.push(delimiter);
			chars.next();
		} else if c == delimiter {
			parts.push(std::mem::take(&mut current));
		} else {
			current.push(c);
		}
	}

	// Trailing text after the last delimiter holds the flags
	parts.push(current);

	parts
}
