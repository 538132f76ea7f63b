//! Drawing of [`ChartPlan`]s with plotters, as PNG files or SVG markup.

use crate::chart::{bar_top, clip_segments, ChartPlan, Series, View, XAxis};
use crate::config::ImageConfig;
use crate::error::{Error, Result};
use crate::legend::Rgb;
use once_cell::sync::OnceCell;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::{debug, info};

static FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
const FAMILY: &str = "sans-serif";

const TITLE_FONT_SIZE: u32 = 22;
const FACET_FONT_SIZE: u32 = 14;
const LABEL_FONT_SIZE: u32 = 11;
const LEGEND_FONT_SIZE: u32 = 13;
const LEGEND_WIDTH: u32 = 190;

// plotters looks fonts up by family name in a process-wide table.
fn ensure_font() -> Result<()> {
	static REGISTERED: OnceCell<()> = OnceCell::new();
	REGISTERED
		.get_or_try_init(|| {
			plotters::style::register_font(FAMILY, FontStyle::Normal, FONT)
				.map_err(|_| Error::render("bundled font could not be parsed"))
		})
		.map(|_| ())
}

fn backend_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> Error { Error::render(e.to_string()) }

fn color(c: Rgb) -> RGBColor { RGBColor(c.0, c.1, c.2) }

/// Write `plan` as a PNG of `width*scale × height*scale` pixels.
pub fn render_png(plan: &ChartPlan, view: View, path: &Path, image: &ImageConfig) -> Result<()> {
	ensure_font()?;
	let scale = image.scale.max(1);
	let size = (image.width * scale, image.height * scale);
	{
		let root = BitMapBackend::new(path, size).into_drawing_area();
		draw(&root, plan, view, scale)?;
		root.present().map_err(backend_err)?;
	}
	info!(path = %path.display(), width = size.0, height = size.1, "wrote chart");
	Ok(())
}

/// Render `plan` at logical size as standalone SVG markup.
pub fn render_svg(plan: &ChartPlan, view: View, image: &ImageConfig) -> Result<String> {
	ensure_font()?;
	let mut out = String::new();
	{
		let root = SVGBackend::with_string(&mut out, (image.width, image.height)).into_drawing_area();
		draw(&root, plan, view, 1)?;
		root.present().map_err(backend_err)?;
	}
	debug!(chart = plan.metric.stem(), ?view, bytes = out.len(), "rendered svg");
	Ok(out)
}

fn draw<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, plan: &ChartPlan, view: View, s: u32) -> Result<()> {
	root.fill(&WHITE).map_err(backend_err)?;
	let body = root.titled(&plan.title(view), (FAMILY, TITLE_FONT_SIZE * s)).map_err(backend_err)?;
	let width = body.dim_in_pixel().0;
	let (grid, legend) = body.split_horizontally(width.saturating_sub(LEGEND_WIDTH * s));

	let rows = plan.rows.len().max(1);
	let cols = plan.columns.len().max(1);
	let cells = grid.split_evenly((rows, cols));
	for (i, cell) in cells.iter().enumerate() {
		let (row, col) = (i / cols, i % cols);
		let series: Vec<&Series> = plan.series_in(row, col).collect();
		match &plan.x_axis {
			XAxis::Log => draw_lines(cell, plan, view, row, col, &series, s)?,
			XAxis::Category(cats) => draw_bars(cell, plan, view, row, col, cats, &series, s)?,
		}
	}
	draw_legend(&legend, plan, s)
}

fn draw_lines<DB: DrawingBackend>(
	area: &DrawingArea<DB, Shift>,
	plan: &ChartPlan,
	view: View,
	row: usize,
	col: usize,
	series: &[&Series],
	s: u32,
) -> Result<()> {
	let (x0, x1) = plan.x_range();
	let (y0, y1) = plan.y_range(view, row);
	let mut chart = ChartBuilder::on(area)
		.caption(plan.facet_title(row, col), (FAMILY, FACET_FONT_SIZE * s))
		.margin(8 * s)
		.x_label_area_size(34 * s)
		.y_label_area_size(56 * s)
		.build_cartesian_2d((x0..x1).log_scale(), y0..y1)
		.map_err(backend_err)?;

	chart
		.configure_mesh()
		.x_desc(plan.metric.x_desc())
		.y_desc(plan.metric.y_desc())
		.x_label_formatter(&|x| format_count(*x))
		.y_label_formatter(&|y| format_value(*y))
		.label_style((FAMILY, LABEL_FONT_SIZE * s))
		.axis_desc_style((FAMILY, LABEL_FONT_SIZE * s))
		.draw()
		.map_err(backend_err)?;

	for series in series {
		let c = color(series.color);
		let segments = match view {
			View::Full => vec![series.points.clone()],
			View::Zoomed => clip_segments(&series.points, (y0, y1)),
		};
		for segment in segments {
			chart.draw_series(LineSeries::new(segment.iter().copied(), c.stroke_width(2 * s))).map_err(backend_err)?;
			chart
				.draw_series(segment.iter().map(|p| Circle::new(*p, 3 * s, c.filled())))
				.map_err(backend_err)?;
		}
	}
	Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_bars<DB: DrawingBackend>(
	area: &DrawingArea<DB, Shift>,
	plan: &ChartPlan,
	view: View,
	row: usize,
	col: usize,
	categories: &[String],
	series: &[&Series],
	s: u32,
) -> Result<()> {
	let (x0, x1) = plan.x_range();
	let (y0, y1) = plan.y_range(view, row);
	let n = categories.len().max(1);
	let mut chart = ChartBuilder::on(area)
		.caption(plan.facet_title(row, col), (FAMILY, FACET_FONT_SIZE * s))
		.margin(8 * s)
		.x_label_area_size(34 * s)
		.y_label_area_size(56 * s)
		.build_cartesian_2d(x0..x1, y0..y1)
		.map_err(backend_err)?;

	chart
		.configure_mesh()
		.disable_x_mesh()
		.x_labels(n)
		.x_label_formatter(&|x| category_label(categories, *x))
		.y_label_formatter(&|y| format_value(*y))
		.x_desc(plan.metric.x_desc())
		.y_desc(plan.metric.y_desc())
		.label_style((FAMILY, LABEL_FONT_SIZE * s))
		.axis_desc_style((FAMILY, LABEL_FONT_SIZE * s))
		.draw()
		.map_err(backend_err)?;

	let groups = series.len().max(1) as f64;
	let bar_width = 0.8 / groups;
	let base = 0f64.clamp(y0, y1);
	for (i, series) in series.iter().enumerate() {
		let c = color(series.color);
		let offset = (i as f64 - (groups - 1.0) / 2.0) * bar_width;
		let bars = series.points.iter().filter(|(_, y)| y.is_finite()).map(|&(x, y)| {
			let top = bar_top(y, (y0, y1));
			let left = x + offset - bar_width / 2.0;
			Rectangle::new([(left, base), (left + bar_width, top)], c.filled())
		});
		chart.draw_series(bars).map_err(backend_err)?;
	}
	Ok(())
}

fn draw_legend<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, plan: &ChartPlan, s: u32) -> Result<()> {
	let style = TextStyle::from((FAMILY, LEGEND_FONT_SIZE * s).into_font());
	let (x, mut y) = ((10 * s) as i32, (30 * s) as i32);
	let step = (20 * s) as i32;
	let swatch = (12 * s) as i32;
	area.draw_text("hashfn", &style, (x, y)).map_err(backend_err)?;
	for (name, c) in &plan.legend {
		y += step;
		area.draw(&Rectangle::new([(x, y), (x + swatch, y + swatch)], color(*c).filled())).map_err(backend_err)?;
		area.draw_text(name, &style, (x + swatch + (6 * s) as i32, y)).map_err(backend_err)?;
	}
	Ok(())
}

fn category_label(categories: &[String], x: f64) -> String {
	let idx = x.round();
	if idx < 0.0 || (x - idx).abs() > 0.3 {
		return String::new();
	}
	categories.get(idx as usize).cloned().unwrap_or_default()
}

/// Element counts on the log axis: `10^k` for exact powers, compact otherwise.
pub fn format_count(x: f64) -> String {
	if x <= 0.0 {
		return String::new();
	}
	let exp = x.log10();
	if (exp - exp.round()).abs() < 1e-9 {
		format!("1e{}", exp.round() as i32)
	} else {
		format_value(x)
	}
}

/// Compact tick labels: `1.2k`, `3.4M`, `5G`.
pub fn format_value(v: f64) -> String {
	let a = v.abs();
	let (div, unit) = if a >= 1e9 {
		(1e9, "G")
	} else if a >= 1e6 {
		(1e6, "M")
	} else if a >= 1e3 {
		(1e3, "k")
	} else {
		(1.0, "")
	};
	let scaled = v / div;
	if (scaled - scaled.round()).abs() < 1e-9 {
		format!("{}{unit}", scaled.round())
	} else {
		format!("{scaled:.1}{unit}")
	}
}
