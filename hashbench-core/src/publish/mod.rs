//! Writing run artifacts to the output directory and, optionally, committing
//! them.
//!
//! Outputs are written one after another with no cleanup on failure. When a
//! report follows a commit, a failed report write leaves the commit in place
//! and the returned [`Error::Report`] names it.

pub mod html;
pub mod markdown;
pub mod vcs;

use crate::chart::{self, ChartPlan, View};
use crate::config::{ImageConfig, ReportConfig, ReportFormat};
use crate::error::{Error, Result};
use crate::legend::ColorMap;
use crate::render::render_png;
use crate::table::ResultTable;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;
use tracing::info;

pub use vcs::{GitCli, VersionControl};

pub const CSV_FILE: &str = "results.csv";
pub const HTML_FILE: &str = "index.html";
pub const MARKDOWN_FILE: &str = "readme.md";

/// What a publish run left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishOutcome {
	/// Every file written, in write order.
	pub written: Vec<PathBuf>,
	/// HEAD after committing, when a commit was requested.
	pub commit: Option<String>,
}

pub struct Publisher<V = GitCli> {
	out_dir: PathBuf,
	format: ReportFormat,
	image: ImageConfig,
	commit: bool,
	message: String,
	raw_base_url: String,
	vcs: V,
}

impl Publisher<GitCli> {
	pub fn from_config(config: &ReportConfig) -> Self { Self::with_vcs(config, GitCli::default()) }
}

impl<V: VersionControl> Publisher<V> {
	pub fn with_vcs(config: &ReportConfig, vcs: V) -> Self {
		Self {
			out_dir: config.output_dir(),
			format: config.format,
			image: config.image.clone(),
			commit: config.commits(),
			message: config.publish.message.clone(),
			raw_base_url: config.publish.raw_base_url.clone(),
			vcs,
		}
	}

	pub fn publish(&self, table: &ResultTable) -> Result<PublishOutcome> {
		self.publish_at(table, Utc::now())
	}

	/// [`Self::publish`] with a fixed report timestamp.
	pub fn publish_at(&self, table: &ResultTable, generated: DateTime<Utc>) -> Result<PublishOutcome> {
		fs::create_dir_all(&self.out_dir)?;
		let mut outcome = PublishOutcome::default();

		let csv = self.out_dir.join(CSV_FILE);
		table.write_csv_path(&csv)?;
		outcome.written.push(csv);

		let colors = ColorMap::new(table.hashfns());
		let plans = chart::plan_all(table, &colors);

		match self.format {
			ReportFormat::Png | ReportFormat::Markdown => outcome.written.extend(self.write_pngs(&plans)?),
			ReportFormat::Html => {
				let page = html::render_page(table, &plans, &self.image, generated)?;
				let path = self.out_dir.join(HTML_FILE);
				fs::write(&path, page)?;
				info!(path = %path.display(), "wrote html report");
				outcome.written.push(path);
			}
		}

		if self.commit {
			outcome.commit = Some(self.commit_outputs()?);
		}

		if self.format == ReportFormat::Markdown {
			let commit = outcome.commit.clone().ok_or_else(|| Error::vcs("markdown report needs a commit"))?;
			let path = self.write_markdown(&plans, &commit, generated).map_err(|e| Error::Report {
				commit: commit.clone(),
				source: Box::new(e),
			})?;
			outcome.written.push(path);
		}
		Ok(outcome)
	}

	fn write_pngs(&self, plans: &[ChartPlan]) -> Result<Vec<PathBuf>> {
		let mut written = Vec::with_capacity(plans.len() * View::ALL.len());
		for plan in plans {
			for view in View::ALL {
				let path = self.out_dir.join(format!("{}.png", view.file_stem(plan.metric)));
				render_png(plan, view, &path, &self.image)?;
				written.push(path);
			}
		}
		Ok(written)
	}

	fn commit_outputs(&self) -> Result<String> {
		let dir = &self.out_dir;
		self.vcs.stage(dir)?;
		if self.vcs.has_staged_changes(dir)? {
			self.vcs.commit(dir, &self.message)?;
			info!(dir = %dir.display(), "committed results");
		} else {
			info!(dir = %dir.display(), "results unchanged, nothing to commit");
		}
		self.vcs.head(dir)
	}

	fn write_markdown(&self, plans: &[ChartPlan], commit: &str, generated: DateTime<Utc>) -> Result<PathBuf> {
		let repo_path = self.vcs.repo_path(&self.out_dir)?;
		let md = markdown::render_report(plans, &self.raw_base_url, commit, &repo_path, generated);
		let path = self.out_dir.join(MARKDOWN_FILE);
		fs::write(&path, md)?;
		info!(path = %path.display(), commit, "wrote markdown report");
		Ok(path)
	}
}
