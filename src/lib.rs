//! Codemod - build-time source rewrites for the Campus Connect frontend.
//!
//! This library provides the core functionality for codemod, including:
//! - A tree walker that rewrites eligible files in place, writing only on change
//! - Rewrite rules: missing import insertion, import path extensions, substitutions
//! - Configuration file parsing and cascade discovery
//! - A per-file report that survives individual file failures
//!
//! # Example
//!
//! ```no_run
//! use campus_codemod::rules::presets;
//! use campus_codemod::tree::{TreeRewriter, WalkOptions};
//! use std::path::Path;
//!
//! let rules = presets::add_imports("React", "react").unwrap();
//! let options = WalkOptions {
//!     extensions: vec!["js".to_string(), "jsx".to_string()],
//!     ..Default::default()
//! };
//!
//! let report = TreeRewriter::new(options).run(Path::new("src"), &rules).unwrap();
//! for outcome in report.changed() {
//!     println!("Updated: {}", outcome.path.display());
//! }
//! ```

pub mod config;
pub mod error;
pub mod rules;
pub mod tree;

pub use error::{CodemodError, Result, RuleError};
