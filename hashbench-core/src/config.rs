use crate::error::{Error, Result};
use crate::legend::{LegendOrder, UnknownPlacement, DEFAULT_ORDER};
use crate::loader::DEFAULT_FIELD;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::Path, path::PathBuf, str::FromStr};

/// Which artifacts a run produces besides `results.csv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
	/// One PNG per chart and zoom level.
	#[default]
	Png,
	/// A single `index.html` with inline SVG charts and the raw table.
	Html,
	/// PNGs, a git commit, and a `readme.md` linking the committed images.
	Markdown,
}

impl ReportFormat {
	pub fn default_output_dir(self) -> &'static str {
		match self {
			ReportFormat::Html => "docs",
			_ => "results",
		}
	}
}

impl FromStr for ReportFormat {
	type Err = Error;
	fn from_str(s: &str) -> Result<Self> {
		match s.to_ascii_lowercase().as_str() {
			"png" => Ok(Self::Png),
			"html" => Ok(Self::Html),
			"markdown" | "md" => Ok(Self::Markdown),
			other => Err(Error::config(format!("unknown report format: {other}"))),
		}
	}
}

impl fmt::Display for ReportFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self { Self::Png => "png", Self::Html => "html", Self::Markdown => "markdown" })
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImageConfig {
	pub width: u32,
	pub height: u32,
	/// Raster multiplier; fonts and strokes scale with it.
	pub scale: u32,
}

impl Default for ImageConfig {
	fn default() -> Self { Self { width: 1000, height: 500, scale: 8 } }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LegendConfig {
	pub order: Vec<String>,
	pub unknown: UnknownPlacement,
}

impl Default for LegendConfig {
	fn default() -> Self {
		Self { order: DEFAULT_ORDER.iter().map(|s| s.to_string()).collect(), unknown: UnknownPlacement::First }
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PublishConfig {
	/// Commit the output directory after writing.
	pub commit: bool,
	pub message: String,
	/// Prefix for image links in `readme.md`; the commit and path are appended.
	pub raw_base_url: String,
}

impl Default for PublishConfig {
	fn default() -> Self {
		Self { commit: false, message: "Update benchmark results".into(), raw_base_url: String::new() }
	}
}

/// Everything a run needs. Precedence: defaults < file < env < CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
	pub log_level: String,
	pub input: PathBuf,
	/// `None` picks the format's default directory.
	pub output_dir: Option<PathBuf>,
	pub format: ReportFormat,
	pub benchmarks_field: String,
	pub image: ImageConfig,
	pub legend: LegendConfig,
	pub publish: PublishConfig,
}

impl Default for ReportConfig {
	fn default() -> Self {
		Self {
			log_level: "info".into(),
			input: PathBuf::from("benchmark_results.json"),
			output_dir: None,
			format: ReportFormat::Png,
			benchmarks_field: DEFAULT_FIELD.into(),
			image: ImageConfig::default(),
			legend: LegendConfig::default(),
			publish: PublishConfig::default(),
		}
	}
}

pub const MAX_SCALE: u32 = 16;
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl ReportConfig {
	pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
		let cfg = Self::read_file(path)?;
		cfg.validate()?;
		Ok(cfg)
	}

	/// Parse without validating, for callers that layer env and flags on top.
	pub fn read_file(path: impl AsRef<Path>) -> Result<Self> {
		let data = fs::read_to_string(path)?;
		toml::from_str(&data).map_err(|e| Error::config(format!("toml parse error: {e}")))
	}

	/// Apply `HASHBENCH_*` variables from the process environment.
	pub fn apply_env(&mut self) -> Result<()> { self.apply_env_from(|k| std::env::var(k).ok()) }

	/// Same as [`Self::apply_env`] with an injectable lookup.
	pub fn apply_env_from(&mut self, get: impl Fn(&str) -> Option<String>) -> Result<()> {
		let get = |k: &str| get(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
		if let Some(v) = get("HASHBENCH_LOG_LEVEL") { self.log_level = v.to_lowercase(); }
		if let Some(v) = get("HASHBENCH_OUTPUT_DIR") { self.output_dir = Some(PathBuf::from(v)); }
		if let Some(v) = get("HASHBENCH_FORMAT") { self.format = v.parse()?; }
		if let Some(v) = get("HASHBENCH_SCALE") {
			self.image.scale = v.parse().map_err(|_| Error::config(format!("invalid HASHBENCH_SCALE: {v}")))?;
		}
		if let Some(v) = get("HASHBENCH_RAW_BASE_URL") { self.publish.raw_base_url = v; }
		Ok(())
	}

	pub fn validate(&self) -> Result<()> {
		if !LOG_LEVELS.contains(&self.log_level.as_str()) {
			return Err(Error::config(format!("invalid log_level: {}", self.log_level)));
		}
		if self.image.width == 0 || self.image.height == 0 {
			return Err(Error::config("image dimensions must be positive"));
		}
		if self.image.scale == 0 || self.image.scale > MAX_SCALE {
			return Err(Error::config(format!("image scale must be within 1..={MAX_SCALE}, got {}", self.image.scale)));
		}
		if self.benchmarks_field.trim().is_empty() {
			return Err(Error::config("benchmarks_field must not be empty"));
		}
		if self.legend.order.iter().any(|n| n.trim().is_empty()) {
			return Err(Error::config("legend order contains an empty name"));
		}
		if self.format == ReportFormat::Markdown && self.publish.raw_base_url.trim().is_empty() {
			return Err(Error::config("markdown reports need publish.raw_base_url"));
		}
		Ok(())
	}

	pub fn output_dir(&self) -> PathBuf {
		self.output_dir.clone().unwrap_or_else(|| PathBuf::from(self.format.default_output_dir()))
	}

	/// Markdown reports always commit; the others only when asked.
	pub fn commits(&self) -> bool { self.publish.commit || self.format == ReportFormat::Markdown }

	pub fn legend_order(&self) -> LegendOrder { LegendOrder::new(&self.legend.order, self.legend.unknown) }
}
