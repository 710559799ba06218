//! Directory traversal and in-place rewriting for codemod.
//!
//! This module handles:
//! - Walking a root directory depth-first, honoring exclusions
//! - Threading each eligible file through the configured rules
//! - Writing back only files whose content changed
//! - Collecting a per-file report, recovering from per-file failures

pub mod report;

pub use report::{FailureStage, FileFailure, FileOutcome, ReportSummary, RewriteReport};

use crate::error::{CodemodError, Result};
use crate::rules::{RewriteRule, has_extension};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Settings for one traversal.
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
	/// Eligible file extensions, without the dot. Empty means every file.
	pub extensions: Vec<String>,

	/// Directory names (or `*.suffix` patterns) that are not entered.
	pub exclude: Vec<String>,

	/// Compute the report without writing anything.
	pub dry_run: bool,

	/// Process files on rayon's thread pool.
	pub parallel: bool,
}

type ExcludePredicate = Box<dyn Fn(&Path) -> bool + Send + Sync>;

/// Walks a tree and applies rewrite rules to each eligible file.
pub struct TreeRewriter {
	options: WalkOptions,
	exclude_when: Option<ExcludePredicate>,
}

/// An entry produced by the walk, in traversal order.
enum Visit {
	File(PathBuf),
	Failed(PathBuf, CodemodError),
}

impl TreeRewriter {
	pub fn new(options: WalkOptions) -> Self {
		TreeRewriter {
			options,
			exclude_when: None,
		}
	}

	/// Skip any directory for which `predicate` returns true, in addition
	/// to the names listed in `WalkOptions::exclude`.
	pub fn exclude_when(mut self, predicate: impl Fn(&Path) -> bool + Send + Sync + 'static) -> Self {
		self.exclude_when = Some(Box::new(predicate));
		self
	}

	pub fn options(&self) -> &WalkOptions {
		&self.options
	}

	/// Rewrite every eligible file under `root`.
	///
	/// Fails only when `root` itself is missing or unreadable. Failures on
	/// individual files are logged, recorded in the report, and skipped.
	pub fn run<R: RewriteRule>(&self, root: &Path, rules: &[R]) -> Result<RewriteReport> {
		check_root(root)?;

		debug!(
			root = %root.display(),
			rules = rules.len(),
			dry_run = self.options.dry_run,
			"starting rewrite"
		);

		let visits = self.collect_visits(root);

		let files: Vec<FileOutcome> = if self.options.parallel {
			visits
				.into_par_iter()
				.map(|visit| self.process(visit, rules))
				.collect()
		} else {
			visits
				.into_iter()
				.map(|visit| self.process(visit, rules))
				.collect()
		};

		let mut report = RewriteReport::new(root, self.options.dry_run);
		report.files = files;
		Ok(report)
	}

	fn collect_visits(&self, root: &Path) -> Vec<Visit> {
		let walker = WalkDir::new(root)
			.sort_by_file_name()
			.into_iter()
			.filter_entry(|entry| {
				entry.depth() == 0 || !entry.file_type().is_dir() || !self.is_excluded_dir(entry.path())
			});

		let mut visits = Vec::new();
		for entry in walker {
			match entry {
				Ok(entry) => {
					if entry.file_type().is_file()
						&& has_extension(entry.path(), &self.options.extensions)
					{
						visits.push(Visit::File(entry.into_path()));
					}
				}
				Err(source) => {
					let path = source
						.path()
						.map(Path::to_path_buf)
						.unwrap_or_else(|| root.to_path_buf());
					visits.push(Visit::Failed(
						path.clone(),
						CodemodError::Walk { path, source },
					));
				}
			}
		}

		visits
	}

	fn is_excluded_dir(&self, path: &Path) -> bool {
		let by_name = path
			.file_name()
			.and_then(|name| name.to_str())
			.is_some_and(|name| is_excluded(name, &self.options.exclude));

		by_name || self.exclude_when.as_ref().is_some_and(|predicate| predicate(path))
	}

	fn process<R: RewriteRule>(&self, visit: Visit, rules: &[R]) -> FileOutcome {
		let (path, result) = match visit {
			Visit::File(path) => {
				let result = self.rewrite_file(&path, rules);
				(path, result)
			}
			Visit::Failed(path, err) => (path, Err(err)),
		};

		match result {
			Ok(true) => {
				info!(path = %path.display(), dry_run = self.options.dry_run, "rewrote file");
				FileOutcome::applied(path)
			}
			Ok(false) => FileOutcome::unchanged(path),
			Err(err) => {
				let outcome = FileOutcome::failed(path, &err);
				if let Some(ref failure) = outcome.error {
					warn!(
						path = %outcome.path.display(),
						stage = failure.stage.as_str(),
						"skipping file: {}",
						failure.message
					);
				}
				outcome
			}
		}
	}

	/// Read once, thread through the rules, write once if the text changed.
	fn rewrite_file<R: RewriteRule>(&self, path: &Path, rules: &[R]) -> Result<bool> {
		let applicable: Vec<&R> = rules.iter().filter(|rule| rule.applies_to(path)).collect();
		if applicable.is_empty() {
			return Ok(false);
		}

		let original = fs::read_to_string(path).map_err(|source| CodemodError::FileRead {
			path: path.to_path_buf(),
			source,
		})?;

		let mut current: Option<String> = None;
		for rule in applicable {
			let input = current.as_deref().unwrap_or(&original);
			let output = rule
				.rewrite(input)
				.map_err(|source| CodemodError::Transform {
					path: path.to_path_buf(),
					rule: rule.name().to_string(),
					source,
				})?;

			if let Some(output) = output {
				debug!(path = %path.display(), rule = rule.name(), "rule changed content");
				current = Some(output);
			}
		}

		match current {
			Some(updated) if updated != original => {
				if !self.options.dry_run {
					fs::write(path, updated).map_err(|source| CodemodError::FileWrite {
						path: path.to_path_buf(),
						source,
					})?;
				}
				Ok(true)
			}
			_ => Ok(false),
		}
	}
}

/// Checks if a directory name matches any exclusion pattern.
/// Supports exact matching and wildcard patterns starting with `*.`.
pub fn is_excluded(name: &str, excludes: &[String]) -> bool {
	excludes.iter().any(|exclude| match exclude.strip_prefix('*') {
		Some(suffix) if suffix.starts_with('.') => name.ends_with(suffix),
		_ => name == exclude.as_str(),
	})
}

fn check_root(root: &Path) -> Result<()> {
	let metadata = fs::metadata(root).map_err(|source| {
		if source.kind() == std::io::ErrorKind::NotFound {
			CodemodError::RootNotFound {
				path: root.to_path_buf(),
			}
		} else {
			CodemodError::RootAccess {
				path: root.to_path_buf(),
				source,
			}
		}
	})?;

	if metadata.is_dir() {
		fs::read_dir(root).map_err(|source| CodemodError::RootAccess {
			path: root.to_path_buf(),
			source,
		})?;
	}

	Ok(())
}
