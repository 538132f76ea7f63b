//! Chart plans: which points go in which facet, in which color, under which
//! axis ranges. Plans are plain data; [`crate::render`] draws them.

use crate::augment::BenchmarkRow;
use crate::legend::{ColorMap, Rgb};
use crate::table::ResultTable;
use std::fmt;

/// Element counts kept for the throughput bars.
pub const THROUGHPUT_COUNTS: [u64; 3] = [10_000, 1_000_000, 100_000_000];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
	LookupTime,
	BitsPerKey,
	LookupThroughput,
	BuildTime,
}

impl Metric {
	pub const ALL: [Metric; 4] = [Metric::LookupTime, Metric::BitsPerKey, Metric::LookupThroughput, Metric::BuildTime];

	pub fn stem(self) -> &'static str {
		match self {
			Metric::LookupTime => "lookup_time",
			Metric::BitsPerKey => "bits_per_key",
			Metric::LookupThroughput => "lookup_throughput",
			Metric::BuildTime => "build_time",
		}
	}

	pub fn title(self) -> &'static str {
		match self {
			Metric::LookupTime => "Lookup Time",
			Metric::BitsPerKey => "Bits per Key",
			Metric::LookupThroughput => "Lookup Throughput",
			Metric::BuildTime => "Build time per Key",
		}
	}

	pub fn x_desc(self) -> &'static str {
		match self {
			Metric::LookupThroughput => "elem_magnitude",
			_ => "dataset_elem_count",
		}
	}

	pub fn y_desc(self) -> &'static str {
		match self {
			Metric::LookupTime => "cpu_time",
			Metric::BitsPerKey => "hashfn_bits_per_key",
			Metric::LookupThroughput => "throughput",
			Metric::BuildTime => "cpu_time_per_key",
		}
	}

	fn value(self, row: &BenchmarkRow) -> f64 {
		match self {
			Metric::LookupTime => row.record.cpu_time,
			Metric::BitsPerKey => row.record.hashfn_bits_per_key,
			Metric::LookupThroughput => row.throughput,
			Metric::BuildTime => row.cpu_time_per_key,
		}
	}

	fn zoom(self, sorted_row: bool) -> (f64, f64) {
		match self {
			Metric::LookupTime => (-5.0, 1400.0),
			Metric::BitsPerKey => (-5.0, 170.0),
			Metric::LookupThroughput => (0.0, 30e6),
			Metric::BuildTime if sorted_row => (-50.0, 2350.0),
			Metric::BuildTime => (-50.0, 4650.0),
		}
	}
}

impl fmt::Display for Metric {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.title()) }
}

/// Full range or the fixed zoom window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
	Full,
	Zoomed,
}

impl View {
	pub const ALL: [View; 2] = [View::Full, View::Zoomed];

	pub fn file_stem(self, metric: Metric) -> String {
		match self {
			View::Full => metric.stem().to_string(),
			View::Zoomed => format!("zoomed_{}", metric.stem()),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum XAxis {
	/// Element count on a log10 axis.
	Log,
	/// Magnitude buckets; points carry the bucket index as x.
	Category(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
	pub hashfn: String,
	pub color: Rgb,
	pub row: usize,
	pub col: usize,
	pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPlan {
	pub metric: Metric,
	pub x_axis: XAxis,
	/// Column facets, one per dataset.
	pub columns: Vec<String>,
	/// Row facet titles; a single empty title when the chart has no row facet.
	pub rows: Vec<String>,
	pub series: Vec<Series>,
	/// Hash functions present in this chart, in legend order.
	pub legend: Vec<(String, Rgb)>,
	zoom: Vec<(f64, f64)>,
}

impl ChartPlan {
	pub fn title(&self, view: View) -> String {
		match view {
			View::Full => self.metric.title().to_string(),
			View::Zoomed => format!("{} (zoomed)", self.metric.title()),
		}
	}

	pub fn facet_title(&self, row: usize, col: usize) -> String {
		let column = self.columns.get(col).map(|d| format!("dataset={d}")).unwrap_or_default();
		match self.rows.get(row) {
			Some(r) if !r.is_empty() => format!("{column}, {r}"),
			_ => column,
		}
	}

	pub fn series_in(&self, row: usize, col: usize) -> impl Iterator<Item = &Series> {
		self.series.iter().filter(move |s| s.row == row && s.col == col)
	}

	pub fn is_empty(&self) -> bool { self.series.iter().all(|s| s.points.is_empty()) }

	/// Shared y range of the full view, or the zoom window of `row`.
	pub fn y_range(&self, view: View, row: usize) -> (f64, f64) {
		match view {
			View::Zoomed => self.zoom.get(row).copied().unwrap_or((0.0, 1.0)),
			View::Full => {
				let ys = self.series.iter().flat_map(|s| s.points.iter().map(|p| p.1)).filter(|y| y.is_finite());
				let bars = matches!(self.x_axis, XAxis::Category(_));
				auto_range(ys, bars)
			}
		}
	}

	/// Padded x range; for the log axis in element counts, otherwise bucket indices.
	pub fn x_range(&self) -> (f64, f64) {
		match &self.x_axis {
			XAxis::Category(c) => (-0.5, c.len().max(1) as f64 - 0.5),
			XAxis::Log => {
				let xs: Vec<f64> = self.series.iter().flat_map(|s| s.points.iter().map(|p| p.0)).filter(|x| *x > 0.0).collect();
				let lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
				let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
				if xs.is_empty() { (1.0, 10.0) } else { (lo / 1.5, hi * 1.5) }
			}
		}
	}
}

fn auto_range(ys: impl Iterator<Item = f64>, from_zero: bool) -> (f64, f64) {
	let (mut lo, mut hi) = ys.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| (lo.min(y), hi.max(y)));
	if !lo.is_finite() || !hi.is_finite() {
		return (0.0, 1.0);
	}
	if from_zero { lo = lo.min(0.0); }
	if hi == lo { hi = lo + lo.abs().max(1.0); }
	let pad = (hi - lo) * 0.05;
	(if from_zero && lo >= 0.0 { lo } else { lo - pad }, hi + pad)
}

/// Break a polyline wherever a point leaves `range`.
pub fn clip_segments(points: &[(f64, f64)], (lo, hi): (f64, f64)) -> Vec<Vec<(f64, f64)>> {
	let mut out: Vec<Vec<(f64, f64)>> = Vec::new();
	let mut current: Vec<(f64, f64)> = Vec::new();
	for &p in points {
		if p.1.is_finite() && p.1 >= lo && p.1 <= hi {
			current.push(p);
		} else if !current.is_empty() {
			out.push(std::mem::take(&mut current));
		}
	}
	if !current.is_empty() { out.push(current); }
	out
}

/// Height a bar is drawn to: values past the window stop at its edge.
pub fn bar_top(y: f64, (lo, hi): (f64, f64)) -> f64 { y.clamp(lo, hi) }

/// Plans for all four metrics, in output order.
pub fn plan_all(table: &ResultTable, colors: &ColorMap) -> Vec<ChartPlan> {
	Metric::ALL.iter().map(|m| plan(*m, table, colors)).collect()
}

pub fn plan(metric: Metric, table: &ResultTable, colors: &ColorMap) -> ChartPlan {
	let rows: Vec<&BenchmarkRow> = match metric {
		Metric::BuildTime => table.build(),
		Metric::LookupThroughput => {
			table.lookup().into_iter().filter(|r| THROUGHPUT_COUNTS.contains(&r.record.dataset_elem_count)).collect()
		}
		Metric::LookupTime | Metric::BitsPerKey => table.lookup(),
	};

	let columns = distinct(rows.iter().map(|r| r.dataset.clone()));
	let facet_rows: Vec<bool> = match metric {
		Metric::BuildTime => vec![false, true],
		_ => vec![false],
	};

	let x_axis = match metric {
		Metric::LookupThroughput => {
			let mut counts: Vec<u64> = rows.iter().map(|r| r.record.dataset_elem_count).collect();
			counts.sort_unstable();
			counts.dedup();
			XAxis::Category(distinct(counts.iter().map(|c| crate::augment::Magnitude::of(*c).to_string())))
		}
		_ => XAxis::Log,
	};

	let mut series: Vec<Series> = Vec::new();
	for row in &rows {
		let col = columns.iter().position(|d| *d == row.dataset).unwrap_or(0);
		let facet_row = if metric == Metric::BuildTime { usize::from(row.sorted) } else { 0 };
		let x = match &x_axis {
			XAxis::Log => row.record.dataset_elem_count as f64,
			XAxis::Category(cats) => {
				let label = row.elem_magnitude.to_string();
				cats.iter().position(|c| *c == label).unwrap_or(0) as f64
			}
		};
		let point = (x, metric.value(row));
		match series.iter_mut().find(|s| s.hashfn == row.hashfn && s.row == facet_row && s.col == col) {
			Some(s) => s.points.push(point),
			None => series.push(Series {
				hashfn: row.hashfn.clone(),
				color: colors.color(&row.hashfn),
				row: facet_row,
				col,
				points: vec![point],
			}),
		}
	}

	let legend = distinct(rows.iter().map(|r| r.hashfn.clone())).into_iter().map(|h| {
		let c = colors.color(&h);
		(h, c)
	}).collect();

	ChartPlan {
		metric,
		x_axis,
		columns,
		rows: facet_rows.iter().map(|s| if metric == Metric::BuildTime { format!("sorted={s}") } else { String::new() }).collect(),
		series,
		legend,
		zoom: facet_rows.iter().map(|s| metric.zoom(*s)).collect(),
	}
}

fn distinct<T: PartialEq>(items: impl Iterator<Item = T>) -> Vec<T> {
	let mut out = Vec::new();
	for item in items {
		if !out.contains(&item) { out.push(item); }
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clip_breaks_at_out_of_range_points() {
		let pts = [(1.0, 5.0), (2.0, 50.0), (3.0, 6.0), (4.0, 7.0), (5.0, f64::INFINITY)];
		assert_eq!(clip_segments(&pts, (0.0, 10.0)), vec![vec![(1.0, 5.0)], vec![(3.0, 6.0), (4.0, 7.0)]]);
		assert!(clip_segments(&[], (0.0, 1.0)).is_empty());
	}

	#[test]
	fn auto_range_pads_and_anchors_bars() {
		let (lo, hi) = auto_range([10.0, 20.0].into_iter(), false);
		assert!(lo < 10.0 && hi > 20.0);
		assert_eq!(auto_range([10.0, 20.0].into_iter(), true).0, 0.0);
		assert_eq!(auto_range(std::iter::empty(), false), (0.0, 1.0));
		let (lo, hi) = auto_range([3.0].into_iter(), false);
		assert!(lo < 3.0 && hi > 3.0);
	}

	use crate::{augment, BenchmarkRecord, LegendOrder};

	fn sample() -> (ResultTable, ColorMap) {
		let mut records = Vec::new();
		for (hashfn, base) in [("MWHC", 100.0), ("RankHash", 40.0)] {
			for count in [10_000u64, 100_000, 1_000_000] {
				let label = format!("{hashfn}:uniform");
				records.push(BenchmarkRecord::new("LookupTime", label.clone(), base, count, 3.0));
				records.push(BenchmarkRecord::new("BuildTime", label.clone(), base * count as f64, count, 3.0));
				records.push(BenchmarkRecord::new("PresortedBuildTime", label, base * count as f64 / 2.0, count, 3.0));
			}
		}
		records.push(BenchmarkRecord::new("LookupTime", "MWHC:normal", 90.0, 10_000, 3.0));
		let table = augment(records, &LegendOrder::default());
		let colors = ColorMap::new(table.hashfns());
		(table, colors)
	}

	#[test]
	fn throughput_keeps_only_representative_counts() {
		let (table, colors) = sample();
		let plan = plan(Metric::LookupThroughput, &table, &colors);
		assert_eq!(plan.x_axis, XAxis::Category(vec!["1 × 10^4".to_string(), "1 × 10^6".to_string()]));
		let points: usize = plan.series.iter().map(|s| s.points.len()).sum();
		assert_eq!(points, 2 * 2 + 1);
		assert!(plan.series.iter().flat_map(|s| &s.points).all(|p| p.0 == 0.0 || p.0 == 1.0));
	}

	#[test]
	fn lookup_charts_keep_every_count_on_a_log_axis() {
		let (table, colors) = sample();
		let plan = plan(Metric::LookupTime, &table, &colors);
		assert_eq!(plan.x_axis, XAxis::Log);
		assert_eq!(plan.rows, vec![String::new()]);
		assert_eq!(plan.columns, vec!["uniform", "normal"]);
		let rank = plan.series.iter().find(|s| s.hashfn == "RankHash" && s.col == 0).unwrap();
		assert_eq!(rank.points, vec![(1e4, 40.0), (1e5, 40.0), (1e6, 40.0)]);
		assert_eq!(plan.y_range(View::Zoomed, 0), (-5.0, 1400.0));
		assert_eq!(plan.facet_title(0, 1), "dataset=normal");
	}

	#[test]
	fn build_chart_facets_unsorted_above_sorted() {
		let (table, colors) = sample();
		let plan = plan(Metric::BuildTime, &table, &colors);
		assert_eq!(plan.rows, vec!["sorted=false", "sorted=true"]);
		assert_eq!(plan.y_range(View::Zoomed, 0), (-50.0, 4650.0));
		assert_eq!(plan.y_range(View::Zoomed, 1), (-50.0, 2350.0));
		for s in &plan.series {
			let expected = if s.row == 0 { 1.0 } else { 0.5 };
			let base = if s.hashfn == "MWHC" { 100.0 } else { 40.0 };
			assert!(s.points.iter().all(|p| (p.1 - base * expected).abs() < 1e-9), "{s:?}");
		}
		assert_eq!(plan.facet_title(1, 0), "dataset=uniform, sorted=true");
	}

	#[test]
	fn colors_are_stable_across_plans() {
		let (table, colors) = sample();
		let plans = plan_all(&table, &colors);
		assert_eq!(plans.len(), 4);
		for p in &plans {
			assert_eq!(p.legend.iter().map(|(h, _)| h.as_str()).collect::<Vec<_>>(), vec!["RankHash", "MWHC"]);
			for s in &p.series {
				assert_eq!(s.color, colors.color(&s.hashfn));
			}
		}
		assert_ne!(colors.color("RankHash"), colors.color("MWHC"));
	}

	#[test]
	fn bars_stop_at_the_zoom_window() {
		let window = Metric::LookupThroughput.zoom(false);
		assert_eq!(bar_top(4e7, window), 30e6);
		assert_eq!(bar_top(2e7, window), 2e7);
		assert_eq!(bar_top(-1.0, window), 0.0);
	}

	#[test]
	fn zoomed_file_stems() {
		assert_eq!(View::Zoomed.file_stem(Metric::BuildTime), "zoomed_build_time");
		assert_eq!(View::Full.file_stem(Metric::LookupThroughput), "lookup_throughput");
	}
}
