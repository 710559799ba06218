use std::path::PathBuf;

/// Library-level structured errors for codemod.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum CodemodError {
	#[error("Root directory not found: {path}")]
	RootNotFound { path: PathBuf },

	#[error("Root directory is not accessible: {path}")]
	RootAccess {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to traverse: {path}")]
	Walk {
		path: PathBuf,
		#[source]
		source: walkdir::Error,
	},

	#[error("Failed to read file: {path}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write file: {path}")]
	FileWrite {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Rule '{rule}' failed on {path}")]
	Transform {
		path: PathBuf,
		rule: String,
		#[source]
		source: RuleError,
	},

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Rule kind '{kind}' requires field '{field}'")]
	MissingRuleField { kind: String, field: String },

	#[error("Field '{field}' is not valid for rule kind '{kind}'")]
	UnexpectedRuleField { kind: String, field: String },

	#[error("Invalid regex pattern: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Invalid substitution '{input}': {reason}")]
	InvalidSubstitution { input: String, reason: String },

	#[error("No rewrite rules configured")]
	NoRulesConfigured,

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Failure raised by a single rule while transforming file content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RuleError {
	pub message: String,
}

impl RuleError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

/// Result type alias using CodemodError.
pub type Result<T> = std::result::Result<T, CodemodError>;
