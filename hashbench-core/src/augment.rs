use crate::legend::LegendOrder;
use crate::record::BenchmarkRecord;
use crate::table::ResultTable;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, warn};

/// Measurement category, decided by a substring of the record name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
	Lookup,
	Build,
}

impl fmt::Display for Phase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self { Phase::Lookup => "lookup", Phase::Build => "build" })
	}
}

/// `mantissa × 10^exponent`, a bucket label for element counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Magnitude {
	pub mantissa: f64,
	pub exponent: i32,
}

impl Magnitude {
	/// Nearest power of ten and the 2-decimal mantissa against it.
	pub fn of(count: u64) -> Self {
		if count == 0 {
			return Self { mantissa: 0.0, exponent: 0 };
		}
		let value = count as f64;
		let exponent = value.log10().round() as i32;
		let mantissa = (value / 10f64.powi(exponent) * 100.0).round() / 100.0;
		Self { mantissa, exponent }
	}
}

impl fmt::Display for Magnitude {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{} × 10^{}", self.mantissa, self.exponent) }
}

/// A record plus every derived column.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRow {
	/// Position in the input array, kept through sorting.
	pub index: usize,
	pub record: BenchmarkRecord,
	pub hashfn: String,
	pub dataset: String,
	pub phase: Option<Phase>,
	pub sorted: bool,
	pub order: u32,
	pub cpu_time_per_key: f64,
	pub throughput: f64,
	pub elem_magnitude: Magnitude,
}

/// Split on the first colon. Without a colon the whole label is the hash
/// function and the dataset is empty.
pub fn split_label(label: &str) -> (&str, &str) {
	label.split_once(':').unwrap_or((label, ""))
}

/// `lookup` wins over `build` when a name contains both.
pub fn classify(name: &str) -> Option<Phase> {
	let name = name.to_lowercase();
	if name.contains("lookup") {
		Some(Phase::Lookup)
	} else if name.contains("build") {
		Some(Phase::Build)
	} else {
		None
	}
}

pub fn is_presorted(name: &str) -> bool { name.to_lowercase().contains("presorted") }

/// Build times are measured for the whole dataset, lookups per key.
pub fn cpu_time_per_key(phase: Option<Phase>, cpu_time: f64, count: u64) -> f64 {
	match phase {
		Some(Phase::Build) => cpu_time / count as f64,
		_ => cpu_time,
	}
}

/// Keys per second; infinite for a zero per-key time.
pub fn throughput(cpu_time_per_key: f64) -> f64 { 1e9 / cpu_time_per_key }

impl BenchmarkRow {
	pub fn derive(record: BenchmarkRecord, legend: &LegendOrder) -> Self {
		let (hashfn, dataset) = split_label(&record.label);
		let (hashfn, dataset) = (hashfn.to_string(), dataset.to_string());
		let phase = classify(&record.name);
		let per_key = cpu_time_per_key(phase, record.cpu_time, record.dataset_elem_count);
		Self {
			index: 0,
			sorted: is_presorted(&record.name),
			order: legend.rank(&hashfn),
			cpu_time_per_key: per_key,
			throughput: throughput(per_key),
			elem_magnitude: Magnitude::of(record.dataset_elem_count),
			hashfn,
			dataset,
			phase,
			record,
		}
	}
}

/// Derive all columns and sort by (rank, element count).
pub fn augment(records: Vec<BenchmarkRecord>, legend: &LegendOrder) -> ResultTable {
	let mut unknown = BTreeSet::new();
	let mut rows: Vec<BenchmarkRow> = Vec::with_capacity(records.len());
	for (index, record) in records.into_iter().enumerate() {
		if !record.label.contains(':') {
			warn!(label = %record.label, "label has no ':' separator, dataset left empty");
		}
		let row = BenchmarkRow { index, ..BenchmarkRow::derive(record, legend) };
		if legend.known_rank(&row.hashfn).is_none() {
			unknown.insert(row.hashfn.clone());
		}
		rows.push(row);
	}
	for name in &unknown {
		warn!(hashfn = %name, rank = legend.unknown_rank(), "hash function missing from legend order");
	}

	rows.sort_by(|a, b| a.order.cmp(&b.order).then(a.record.dataset_elem_count.cmp(&b.record.dataset_elem_count)));

	let table = ResultTable::new(rows);
	let unclassified = table.unclassified().count();
	if unclassified > 0 {
		warn!(rows = unclassified, "rows match neither lookup nor build and are left out of every chart");
	}
	debug!(rows = table.len(), lookup = table.lookup().len(), build = table.build().len(), "augmented results");
	table
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn split_on_first_colon_only() {
		assert_eq!(split_label("MWHC:uniform"), ("MWHC", "uniform"));
		assert_eq!(split_label("a:b:c"), ("a", "b:c"));
		assert_eq!(split_label("nocolon"), ("nocolon", ""));
	}

	#[test]
	fn classification_is_case_insensitive() {
		assert_eq!(classify("LookupTime"), Some(Phase::Lookup));
		assert_eq!(classify("PRESORTEDBUILDTIME"), Some(Phase::Build));
		assert_eq!(classify("SpaceUsage"), None);
	}

	#[test]
	fn magnitude_labels() {
		assert_eq!(Magnitude::of(1_000_000).to_string(), "1 × 10^6");
		assert_eq!(Magnitude::of(10_000).to_string(), "1 × 10^4");
		assert_eq!(Magnitude::of(20_000).to_string(), "2 × 10^4");
		assert_eq!(Magnitude::of(5_000_000), Magnitude { mantissa: 0.5, exponent: 7 });
		assert_eq!(Magnitude::of(31_415), Magnitude { mantissa: 3.14, exponent: 4 });
	}

	#[test]
	fn rows_sorted_by_rank_then_count() {
		let legend = LegendOrder::default();
		let table = augment(
			vec![
				BenchmarkRecord::new("LookupTime", "CompactedMWHC:seq", 90.0, 100, 2.0),
				BenchmarkRecord::new("LookupTime", "MWHC:seq", 80.0, 1000, 3.0),
				BenchmarkRecord::new("LookupTime", "MWHC:seq", 70.0, 10, 3.0),
				BenchmarkRecord::new("LookupTime", "Fresh:seq", 60.0, 10, 3.0),
			],
			&legend,
		);
		let order: Vec<(&str, u64)> = table.rows().iter().map(|r| (r.hashfn.as_str(), r.record.dataset_elem_count)).collect();
		assert_eq!(order, vec![("Fresh", 10), ("MWHC", 10), ("MWHC", 1000), ("CompactedMWHC", 100)]);
	}

	#[test]
	fn per_key_cost_only_divides_build_rows() {
		assert_eq!(cpu_time_per_key(Some(Phase::Build), 2_000_000.0, 1_000_000), 2.0);
		assert_eq!(cpu_time_per_key(Some(Phase::Lookup), 50.0, 1_000_000), 50.0);
		assert!(throughput(0.0).is_infinite());
	}
}
