#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hashbench_core::{augment, loader, Publisher, ReportConfig, ReportFormat};
use std::path::PathBuf;
use tracing::info;

mod logging;
mod summary;

#[derive(Parser, Debug)]
#[command(name = "hashbench", version, about = "Turn hash function benchmark JSON into charts, CSV, and reports")]
struct Cli {
	/// Benchmark JSON file [default: benchmark_results.json]
	input: Option<PathBuf>,
	/// Output directory [default: results, or docs for html]
	output: Option<PathBuf>,
	#[arg(long, value_name = "png|html|markdown")]
	format: Option<ReportFormat>,
	/// Commit the output directory after writing (always on for markdown)
	#[arg(long)]
	commit: bool,
	/// Base URL for image links in readme.md, e.g. https://raw.githubusercontent.com/OWNER/REPO
	#[arg(long)]
	raw_base_url: Option<String>,
	/// PNG scale factor
	#[arg(long)]
	scale: Option<u32>,
	/// TOML config file (also HASHBENCH_CONFIG)
	#[arg(long, global = true)]
	config: Option<PathBuf>,
	#[arg(long, global = true)]
	log_level: Option<String>,
	#[command(subcommand)]
	command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Inspect or scaffold the config file
	Config {
		#[command(subcommand)]
		action: ConfigCmd,
	},
}

#[derive(Subcommand, Debug)]
enum ConfigCmd {
	/// Print the resolved configuration as JSON
	Show,
	/// Write a commented config template
	WriteTemplate {
		/// Destination [default: hashbench.toml]
		#[arg(long)]
		path: Option<PathBuf>,
		/// Overwrite an existing file
		#[arg(long)]
		force: bool,
	},
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	match &cli.command {
		Some(Commands::Config { action: ConfigCmd::Show }) => {
			let cfg = resolve_config(&cli)?;
			println!("{}", serde_json::to_string_pretty(&cfg)?);
			Ok(())
		}
		Some(Commands::Config { action: ConfigCmd::WriteTemplate { path, force } }) => {
			let path = path.clone().unwrap_or_else(|| PathBuf::from("hashbench.toml"));
			if path.exists() && !force {
				eprintln!("refusing to overwrite existing file: {} (use --force)", path.display());
				std::process::exit(2);
			}
			std::fs::write(&path, TEMPLATE_HASHBENCH_TOML).with_context(|| format!("writing {}", path.display()))?;
			eprintln!("wrote {}", path.display());
			Ok(())
		}
		None => run(&resolve_config(&cli)?),
	}
}

/// defaults < config file < HASHBENCH_* env < flags
fn resolve_config(cli: &Cli) -> Result<ReportConfig> {
	let file = cli.config.clone().or_else(|| std::env::var_os("HASHBENCH_CONFIG").map(PathBuf::from));
	let mut cfg = match &file {
		Some(path) => ReportConfig::read_file(path).with_context(|| format!("loading config {}", path.display()))?,
		None => ReportConfig::default(),
	};
	cfg.apply_env().context("reading HASHBENCH_* environment")?;

	if let Some(input) = &cli.input { cfg.input = input.clone(); }
	if let Some(output) = &cli.output { cfg.output_dir = Some(output.clone()); }
	if let Some(format) = cli.format { cfg.format = format; }
	if cli.commit { cfg.publish.commit = true; }
	if let Some(url) = &cli.raw_base_url { cfg.publish.raw_base_url = url.clone(); }
	if let Some(scale) = cli.scale { cfg.image.scale = scale; }
	if let Some(level) = &cli.log_level { cfg.log_level = level.to_lowercase(); }

	cfg.validate().context("invalid configuration")?;
	Ok(cfg)
}

fn run(cfg: &ReportConfig) -> Result<()> {
	logging::init(&cfg.log_level)?;
	info!(input = %cfg.input.display(), format = %cfg.format, out = %cfg.output_dir().display(), "starting");

	let records = loader::load_path(&cfg.input, &cfg.benchmarks_field)
		.with_context(|| format!("loading {}", cfg.input.display()))?;
	let table = augment(records, &cfg.legend_order());
	let outcome = Publisher::from_config(cfg)
		.publish(&table)
		.with_context(|| format!("publishing to {}", cfg.output_dir().display()))?;

	summary::print(&table, &outcome);
	Ok(())
}

const TEMPLATE_HASHBENCH_TOML: &str = r#"# hashbench configuration
# Precedence: defaults < this file < HASHBENCH_* environment < command line flags.

# trace | debug | info | warn | error
log_level = "info"
input = "benchmark_results.json"
# Defaults to "results", or "docs" for the html format.
# output_dir = "results"
# png | html | markdown
format = "png"
# Name of the array holding the benchmark records.
benchmarks_field = "benchmarks"

[image]
width = 1000
height = 500
# Raster multiplier for PNGs, 1..=16.
scale = 8

[legend]
# Legend and sort order, matched case-insensitively.
order = [
	"donothinghash",
	"rankhash",
	"recsplit_leaf12_bucket9",
	"compacttrie",
	"fastsuccincttrie",
	"simplehollowtrie",
	"hollowtrie",
	"mwhc",
	"compressedmwhc",
	"compactedmwhc",
	"learnedlinear",
	"mapomphf",
]
# Where hash functions missing from `order` go: "first" or "last".
unknown = "first"

[publish]
# Commit the output directory with git after writing. Markdown always commits.
commit = false
message = "Update benchmark results"
# Required for markdown, e.g. "https://raw.githubusercontent.com/OWNER/REPO".
raw_base_url = ""
"#;
