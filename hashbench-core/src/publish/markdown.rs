use crate::chart::{ChartPlan, View};
use crate::publish::CSV_FILE;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;

/// Where a file committed at `commit` can be fetched from.
pub fn raw_url(base: &str, commit: &str, repo_path: &str, file: &str) -> String {
	let base = base.trim_end_matches('/');
	let repo_path = repo_path.trim_matches('/');
	if repo_path.is_empty() {
		format!("{base}/{commit}/{file}")
	} else {
		format!("{base}/{commit}/{repo_path}/{file}")
	}
}

/// Report whose images point at the committed PNGs, not the working tree.
pub fn render_report(plans: &[ChartPlan], base: &str, commit: &str, repo_path: &str, generated: DateTime<Utc>) -> String {
	let short = commit.get(..7).unwrap_or(commit);
	let mut md = String::from("# Benchmark results\n\n");
	let _ = writeln!(md, "Generated {} from commit `{short}`.\n", generated.format("%Y-%m-%d %H:%M UTC"));
	for plan in plans {
		let _ = writeln!(md, "## {}\n", plan.metric.title());
		for view in View::ALL {
			let file = format!("{}.png", view.file_stem(plan.metric));
			let _ = writeln!(md, "![{}]({})\n", plan.title(view), raw_url(base, commit, repo_path, &file));
		}
	}
	let _ = writeln!(md, "Raw data: [{CSV_FILE}]({})", raw_url(base, commit, repo_path, CSV_FILE));
	md
}
