use crate::error::CodemodError;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::error::Error as _;
use std::path::{Path, PathBuf};

/// Where a per-file failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
	Walk,
	Read,
	Transform,
	Write,
}

impl FailureStage {
	pub fn as_str(&self) -> &'static str {
		match self {
			FailureStage::Walk => "walk",
			FailureStage::Read => "read",
			FailureStage::Transform => "transform",
			FailureStage::Write => "write",
		}
	}
}

/// A recovered failure attached to one file of the report.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FileFailure {
	pub stage: FailureStage,

	/// The error and its source chain, joined with ": ".
	pub message: String,
}

impl From<&CodemodError> for FileFailure {
	fn from(err: &CodemodError) -> Self {
		let stage = match err {
			CodemodError::Walk { .. } => FailureStage::Walk,
			CodemodError::Transform { .. } => FailureStage::Transform,
			CodemodError::FileWrite { .. } => FailureStage::Write,
			_ => FailureStage::Read,
		};

		let mut message = err.to_string();
		let mut source = err.source();
		while let Some(cause) = source {
			message.push_str(": ");
			message.push_str(&cause.to_string());
			source = cause.source();
		}

		FileFailure { stage, message }
	}
}

/// The result of visiting one file.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FileOutcome {
	pub path: PathBuf,

	/// True when the file was rewritten (or would be, in a dry run).
	pub applied: bool,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<FileFailure>,
}

impl FileOutcome {
	pub fn unchanged(path: PathBuf) -> Self {
		FileOutcome {
			path,
			applied: false,
			error: None,
		}
	}

	pub fn applied(path: PathBuf) -> Self {
		FileOutcome {
			path,
			applied: true,
			error: None,
		}
	}

	pub fn failed(path: PathBuf, err: &CodemodError) -> Self {
		FileOutcome {
			path,
			applied: false,
			error: Some(FileFailure::from(err)),
		}
	}
}

/// Counts derived from a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ReportSummary {
	pub scanned: usize,
	pub changed: usize,
	pub failed: usize,
}

/// Accumulated result of one traversal.
#[derive(Debug, Clone)]
pub struct RewriteReport {
	/// The root that was walked.
	pub root: PathBuf,

	/// Whether writes were suppressed.
	pub dry_run: bool,

	/// One entry per eligible file (and per entry the walk could not read).
	pub files: Vec<FileOutcome>,
}

impl RewriteReport {
	pub fn new(root: &Path, dry_run: bool) -> Self {
		RewriteReport {
			root: root.to_path_buf(),
			dry_run,
			files: Vec::new(),
		}
	}

	/// Files that were rewritten.
	pub fn changed(&self) -> impl Iterator<Item = &FileOutcome> {
		self.files.iter().filter(|outcome| outcome.applied)
	}

	/// Files that failed and were skipped.
	pub fn failures(&self) -> impl Iterator<Item = (&Path, &FileFailure)> {
		self.files
			.iter()
			.filter_map(|outcome| outcome.error.as_ref().map(|err| (outcome.path.as_path(), err)))
	}

	pub fn changed_count(&self) -> usize {
		self.changed().count()
	}

	pub fn failed_count(&self) -> usize {
		self.failures().count()
	}

	pub fn has_failures(&self) -> bool {
		self.failures().next().is_some()
	}

	pub fn summary(&self) -> ReportSummary {
		ReportSummary {
			scanned: self.files.len(),
			changed: self.changed_count(),
			failed: self.failed_count(),
		}
	}

	/// The outcome recorded for `path`, if it was visited.
	pub fn outcome(&self, path: &Path) -> Option<&FileOutcome> {
		self.files.iter().find(|outcome| outcome.path == path)
	}
}

impl Serialize for RewriteReport {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut state = serializer.serialize_struct("RewriteReport", 4)?;
		state.serialize_field("root", &self.root)?;
		state.serialize_field("dry_run", &self.dry_run)?;
		state.serialize_field("summary", &self.summary())?;
		state.serialize_field("files", &self.files)?;
		state.end()
	}
}
