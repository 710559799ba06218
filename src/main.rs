use anyhow::{Context, Result};
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use campus_codemod::CodemodError;
use campus_codemod::config::{
	CONFIG_FILE_NAME, discover_configs, init_template, load_merged_config, user_config_path,
};
use campus_codemod::rules::presets::{
	ADD_IMPORTS_EXTENSIONS, DEFAULT_SOURCE_DIR, FIX_EXTENSIONS_EXTENSIONS, REACT_BINDING,
	REACT_SOURCE, add_imports, fix_extensions,
};
use campus_codemod::rules::{CompiledRule, compile_rules};
use campus_codemod::tree::{RewriteReport, TreeRewriter, WalkOptions};

#[derive(Parser)]
#[command(name = "codemod")]
#[command(
	author,
	version,
	about = "Build-time codemods for the Campus Connect frontend source tree"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Create a template .codemod.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .codemod.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	#[command(flatten)]
	flags: RunFlags,

	/// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,
}

#[derive(Args, Clone, Copy)]
struct RunFlags {
	/// Report what would change without writing any file
	#[arg(long, global = true)]
	dry_run: bool,

	/// Process files on a thread pool
	#[arg(long, global = true)]
	parallel: bool,

	/// Exit with a failure code if any file could not be processed
	#[arg(long, global = true)]
	strict: bool,

	/// Print the report as JSON
	#[arg(long, global = true)]
	json: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Add `import React from "react";` to files that use React without importing it
	AddImports {
		/// Directory to rewrite (defaults to ./src)
		root: Option<PathBuf>,

		/// Identifier to import
		#[arg(long, default_value = REACT_BINDING)]
		binding: String,

		/// Module to import it from
		#[arg(long, default_value = REACT_SOURCE)]
		source: String,

		/// File extension to scan (repeatable; defaults to js and jsx)
		#[arg(short = 'e', long = "ext", value_name = "EXT")]
		extensions: Vec<String>,
	},

	/// Rewrite `.tsx`/`.ts` import specifiers to a compiled extension
	FixExtensions {
		/// Directory to rewrite (defaults to ./src)
		root: Option<PathBuf>,

		/// Extension written in place of .tsx/.ts
		#[arg(long, default_value = "js")]
		to: String,

		/// File extension to scan (repeatable; defaults to js)
		#[arg(short = 'e', long = "ext", value_name = "EXT")]
		extensions: Vec<String>,
	},

	/// Apply the rules from the .codemod.toml cascade
	Run {
		/// Directory to rewrite (defaults to `source-dir`, then ./src)
		root: Option<PathBuf>,
	},

	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display every config file in the cascade with its settings and rules
	Show,
	/// Check all config files for errors without rewriting anything
	Validate,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	// Handle --init
	if cli.init {
		return handle_init(cli.force);
	}

	let flags = cli.flags;

	match cli.command {
		Some(Commands::AddImports {
			root,
			binding,
			source,
			extensions,
		}) => {
			let rules = add_imports(&binding, &source).context("Failed to build add-imports rule")?;
			let extensions = or_defaults(extensions, ADD_IMPORTS_EXTENSIONS);
			handle_rewrite(root, extensions, Vec::new(), &rules, flags)
		}
		Some(Commands::FixExtensions {
			root,
			to,
			extensions,
		}) => {
			let rules = fix_extensions(&to).context("Failed to build fix-extensions rule")?;
			let extensions = or_defaults(extensions, FIX_EXTENSIONS_EXTENSIONS);
			handle_rewrite(root, extensions, Vec::new(), &rules, flags)
		}
		Some(Commands::Run { root }) => handle_run(root, flags),
		Some(Commands::Config { action }) => match action {
			ConfigAction::Show => handle_config_show(),
			ConfigAction::Validate => handle_config_validate(),
		},
		// Global flags alone get past arg_required_else_help
		None => Cli::command()
			.error(
				clap::error::ErrorKind::MissingSubcommand,
				"a subcommand or --init is required",
			)
			.exit(),
	}
}

fn init_logging(verbose: u8) {
	let default_level = match verbose {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	// Logs go to stderr so stdout stays parseable with --json
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.try_init();
}

fn or_defaults(extensions: Vec<String>, defaults: &[&str]) -> Vec<String> {
	if extensions.is_empty() {
		defaults.iter().map(|ext| ext.to_string()).collect()
	} else {
		extensions
	}
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, init_template())
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn handle_run(root: Option<PathBuf>, flags: RunFlags) -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	let config = load_merged_config(&cwd).context("Failed to load configuration")?;
	if config.rules.is_empty() {
		return Err(CodemodError::NoRulesConfigured).with_context(|| {
			format!("No rules found in any {CONFIG_FILE_NAME}; run `codemod --init` to create one")
		});
	}

	let rules = compile_rules(&config).context("Failed to compile rules")?;

	let root = root.or(config.source_dir.clone());
	let extensions = config.extensions_or_default();
	let flags = RunFlags {
		parallel: flags.parallel || config.parallel,
		..flags
	};

	handle_rewrite(root, extensions, config.exclude, &rules, flags)
}

fn handle_rewrite(
	root: Option<PathBuf>,
	extensions: Vec<String>,
	exclude: Vec<String>,
	rules: &[CompiledRule],
	flags: RunFlags,
) -> Result<ExitCode> {
	let root = root.unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR));

	let options = WalkOptions {
		extensions,
		exclude,
		dry_run: flags.dry_run,
		parallel: flags.parallel,
	};

	let report = TreeRewriter::new(options)
		.run(&root, rules)
		.with_context(|| format!("Failed to rewrite {}", root.display()))?;

	if flags.json {
		let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
		println!("{json}");
	} else {
		print_report(&report);
	}

	if flags.strict && report.has_failures() {
		return Ok(ExitCode::FAILURE);
	}

	Ok(ExitCode::SUCCESS)
}

fn print_report(report: &RewriteReport) {
	let label = if report.dry_run {
		"Would update"
	} else {
		"Updated"
	};

	for outcome in report.changed() {
		println!("{label}: {}", outcome.path.display());
	}

	let summary = report.summary();
	let verb = if report.dry_run {
		"would be updated"
	} else {
		"updated"
	};
	println!(
		"{} file(s) {verb}, {} failed ({} scanned)",
		summary.changed, summary.failed, summary.scanned
	);
}

fn handle_config_show() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let configs = discover_configs(&cwd).context("Failed to discover config files")?;

	if configs.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	println!("Configuration files (in cascade order):\n");

	for loaded in &configs {
		let config = &loaded.config;
		println!("# Source: {}", loaded.path.display());
		println!("# root: {}", config.root);
		if let Some(ref dir) = config.source_dir {
			println!("# source-dir: {}", dir.display());
		}
		if let Some(ref extensions) = config.extensions {
			println!("# extensions: {}", extensions.join(", "));
		}
		if !config.exclude.is_empty() {
			println!("# exclude: {}", config.exclude.join(", "));
		}
		if let Some(parallel) = config.parallel {
			println!("# parallel: {parallel}");
		}
		println!("# rules: {}", config.rules.len());
		println!();

		for (i, rule) in config.rules.iter().enumerate() {
			println!("  Rule {}: {}", i + 1, rule.kind.as_str());
			print_field("binding", rule.binding.as_deref());
			print_field("source", rule.source.as_deref());
			print_field("trigger", rule.trigger.as_deref());
			print_field("from", rule.from.as_ref().map(|v| v.join(", ")).as_deref());
			print_field("to", rule.to.as_deref());
			print_field("pattern", rule.pattern.as_deref());
			print_field(
				"extensions",
				rule.extensions.as_ref().map(|v| v.join(", ")).as_deref(),
			);
			println!();
		}
	}

	if let Ok(user_path) = user_config_path() {
		print_user_config_path(&user_path);
	}

	Ok(ExitCode::SUCCESS)
}

fn print_field(name: &str, value: Option<&str>) {
	if let Some(value) = value {
		println!("    {name}: {value}");
	}
}

fn print_user_config_path(path: &Path) {
	println!("User config path: {}", path.display());
	if path.exists() {
		println!("  (exists)");
	} else {
		println!("  (not found)");
	}
}

fn handle_config_validate() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	let configs = match discover_configs(&cwd) {
		Ok(configs) => configs,
		Err(e) => {
			eprintln!("Configuration error: {e}");
			return Ok(ExitCode::FAILURE);
		}
	};

	if configs.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	// Parsing validates fields; compiling catches bad regexes and substitutions
	let merged = campus_codemod::config::merge_configs(&configs);
	if let Err(e) = compile_rules(&merged) {
		eprintln!("Configuration error: {e}");
		return Ok(ExitCode::FAILURE);
	}

	println!("All configuration files are valid:");
	for loaded in &configs {
		println!(
			"  {} ({} rules)",
			loaded.path.display(),
			loaded.config.rules.len()
		);
	}

	Ok(ExitCode::SUCCESS)
}
