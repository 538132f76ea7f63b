use crate::chart::{ChartPlan, View};
use crate::config::ImageConfig;
use crate::error::Result;
use crate::render::render_svg;
use crate::table::ResultTable;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 2rem auto; max-width: 1100px; color: #222; }
h1 { margin-bottom: 0.2rem; }
.meta { color: #777; margin-top: 0; }
section.chart { margin: 2rem 0; }
section.chart svg { max-width: 100%; height: auto; }
table { border-collapse: collapse; font-size: 0.8rem; }
th, td { border: 1px solid #ddd; padding: 0.2rem 0.4rem; text-align: right; white-space: nowrap; }
th { background: #f4f4f4; }
.scroll { overflow-x: auto; }
"#;

/// Escape text for element content and double-quoted attributes.
pub fn escape(s: &str) -> String {
	let mut out = String::with_capacity(s.len());
	for c in s.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			c => out.push(c),
		}
	}
	out
}

/// Self-contained page: every chart as inline SVG, then the raw table.
pub fn render_page(table: &ResultTable, plans: &[ChartPlan], image: &ImageConfig, generated: DateTime<Utc>) -> Result<String> {
	let mut h = String::new();
	h.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>Benchmark results</title>\n<style>");
	h.push_str(STYLE);
	h.push_str("</style>\n</head>\n<body>\n<h1>Benchmark results</h1>\n");
	let _ = writeln!(
		h,
		"<p class=\"meta\">Generated {} from {} records.</p>",
		generated.format("%Y-%m-%d %H:%M UTC"),
		table.len()
	);

	for plan in plans {
		for view in View::ALL {
			let svg = render_svg(plan, view, image)?;
			let _ = writeln!(
				h,
				"<section class=\"chart\" id=\"{}\">\n<h2>{}</h2>\n{}\n</section>",
				escape(&view.file_stem(plan.metric)),
				escape(&plan.title(view)),
				svg
			);
		}
	}

	h.push_str("<h2>Raw data</h2>\n<div class=\"scroll\">\n<table>\n<thead><tr>");
	for header in table.csv_headers() {
		let _ = write!(h, "<th>{}</th>", escape(&header));
	}
	h.push_str("</tr></thead>\n<tbody>\n");
	for record in table.csv_records() {
		h.push_str("<tr>");
		for value in record {
			let _ = write!(h, "<td>{}</td>", escape(&value));
		}
		h.push_str("</tr>\n");
	}
	h.push_str("</tbody>\n</table>\n</div>\n</body>\n</html>\n");
	Ok(h)
}
