use crate::augment::{BenchmarkRow, Phase};
use crate::error::Result;
use serde_json::Value;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Columns every export starts with, in order.
pub const BASE_COLUMNS: &[&str] = &[
	"index",
	"name",
	"label",
	"cpu_time",
	"dataset_elem_count",
	"hashfn_bits_per_key",
	"run_name",
	"run_type",
	"iterations",
	"real_time",
	"time_unit",
];

/// Derived columns, appended after any extra record fields.
pub const DERIVED_COLUMNS: &[&str] = &[
	"hashfn",
	"dataset",
	"phase",
	"order",
	"sorted",
	"cpu_time_per_key",
	"throughput",
	"elem_magnitude",
];

/// Augmented rows in their final order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
	rows: Vec<BenchmarkRow>,
}

impl ResultTable {
	/// Rows are taken in the given order.
	pub fn new(rows: Vec<BenchmarkRow>) -> Self { Self { rows } }

	pub fn rows(&self) -> &[BenchmarkRow] { &self.rows }
	pub fn len(&self) -> usize { self.rows.len() }
	pub fn is_empty(&self) -> bool { self.rows.is_empty() }

	pub fn phase(&self, phase: Phase) -> Vec<&BenchmarkRow> {
		self.rows.iter().filter(|r| r.phase == Some(phase)).collect()
	}
	pub fn lookup(&self) -> Vec<&BenchmarkRow> { self.phase(Phase::Lookup) }
	pub fn build(&self) -> Vec<&BenchmarkRow> { self.phase(Phase::Build) }
	pub fn unclassified(&self) -> impl Iterator<Item = &BenchmarkRow> { self.rows.iter().filter(|r| r.phase.is_none()) }

	/// Distinct datasets in row order.
	pub fn datasets(&self) -> Vec<&str> { distinct(self.rows.iter().map(|r| r.dataset.as_str())) }

	/// Distinct hash functions in row order, which is legend order.
	pub fn hashfns(&self) -> Vec<&str> { distinct(self.rows.iter().map(|r| r.hashfn.as_str())) }

	fn extra_columns(&self) -> Vec<&str> {
		let set: BTreeSet<&str> = self.rows.iter().flat_map(|r| r.record.extra.keys().map(String::as_str)).collect();
		set.into_iter().filter(|k| !BASE_COLUMNS.contains(k) && !DERIVED_COLUMNS.contains(k)).collect()
	}

	pub fn csv_headers(&self) -> Vec<String> {
		BASE_COLUMNS
			.iter()
			.copied()
			.chain(self.extra_columns())
			.chain(DERIVED_COLUMNS.iter().copied())
			.map(str::to_string)
			.collect()
	}

	/// One string per column of [`Self::csv_headers`] for every row.
	pub fn csv_records(&self) -> Vec<Vec<String>> {
		let extras = self.extra_columns();
		self.rows
			.iter()
			.map(|row| {
				let r = &row.record;
				let mut out = vec![
					row.index.to_string(),
					r.name.clone(),
					r.label.clone(),
					r.cpu_time.to_string(),
					r.dataset_elem_count.to_string(),
					r.hashfn_bits_per_key.to_string(),
					r.run_name.clone().unwrap_or_default(),
					r.run_type.clone().unwrap_or_default(),
					opt(r.iterations),
					opt(r.real_time),
					opt(r.time_unit),
				];
				out.extend(extras.iter().map(|k| r.extra.get(*k).map(cell).unwrap_or_default()));
				out.extend([
					row.hashfn.clone(),
					row.dataset.clone(),
					opt(row.phase),
					row.order.to_string(),
					row.sorted.to_string(),
					row.cpu_time_per_key.to_string(),
					row.throughput.to_string(),
					row.elem_magnitude.to_string(),
				]);
				out
			})
			.collect()
	}

	pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
		let mut w = csv::Writer::from_writer(writer);
		w.write_record(self.csv_headers())?;
		for record in self.csv_records() {
			w.write_record(&record)?;
		}
		w.flush()?;
		Ok(())
	}

	pub fn write_csv_path(&self, path: impl AsRef<Path>) -> Result<()> {
		let path = path.as_ref();
		let file = std::fs::File::create(path)?;
		self.write_csv(std::io::BufWriter::new(file))?;
		info!(path = %path.display(), rows = self.len(), "wrote csv");
		Ok(())
	}
}

/// Untyped CSV contents, used to read exports back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
	pub headers: Vec<String>,
	pub rows: Vec<Vec<String>>,
}

impl CsvTable {
	pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
		let mut rdr = csv::Reader::from_reader(reader);
		let headers = rdr.headers()?.iter().map(str::to_string).collect();
		let mut rows = Vec::new();
		for record in rdr.records() {
			rows.push(record?.iter().map(str::to_string).collect());
		}
		Ok(Self { headers, rows })
	}

	pub fn column(&self, name: &str) -> Option<Vec<&str>> {
		let idx = self.headers.iter().position(|h| h == name)?;
		Some(self.rows.iter().map(|r| r.get(idx).map(String::as_str).unwrap_or("")).collect())
	}
}

pub fn read_csv(path: impl AsRef<Path>) -> Result<CsvTable> {
	let file = std::fs::File::open(path)?;
	CsvTable::from_reader(std::io::BufReader::new(file))
}

fn distinct<'a>(items: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
	let mut out: Vec<&str> = Vec::new();
	for item in items {
		if !out.contains(&item) { out.push(item); }
	}
	out
}

fn opt<T: ToString>(v: Option<T>) -> String { v.map(|v| v.to_string()).unwrap_or_default() }

fn cell(v: &Value) -> String {
	match v {
		Value::String(s) => s.clone(),
		Value::Null => String::new(),
		other => other.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{augment, BenchmarkRecord, LegendOrder};

	#[test]
	fn csv_carries_extra_fields_between_base_and_derived() {
		let mut rec = BenchmarkRecord::new("LookupTime", "MWHC:seq", 10.0, 100, 3.5);
		rec.extra.insert("threads".into(), Value::from(1));
		rec.extra.insert("family_index".into(), Value::from("x"));
		let table = augment(vec![rec, BenchmarkRecord::new("BuildTime", "MWHC:seq", 1000.0, 100, 3.5)], &LegendOrder::default());

		let mut buf = Vec::new();
		table.write_csv(&mut buf).unwrap();
		let back = CsvTable::from_reader(buf.as_slice()).unwrap();
		assert_eq!(back.headers, table.csv_headers());
		assert_eq!(back.rows.len(), 2);
		let pos = |h: &str| back.headers.iter().position(|x| x == h).unwrap();
		assert!(pos("time_unit") < pos("family_index"));
		assert!(pos("threads") < pos("hashfn"));
		assert_eq!(back.column("threads").unwrap(), vec!["1", ""]);
		assert_eq!(back.column("cpu_time_per_key").unwrap(), vec!["10", "10"]);
		assert_eq!(back.column("phase").unwrap(), vec!["lookup", "build"]);
	}

	#[test]
	fn index_column_is_input_position_not_sorted_position() {
		let records = vec![
			BenchmarkRecord::new("LookupTime", "MWHC:u", 10.0, 100, 3.0),
			BenchmarkRecord::new("LookupTime", "RankHash:u", 10.0, 100, 3.0),
		];
		let table = augment(records, &LegendOrder::default());
		assert_eq!(table.hashfns(), vec!["RankHash", "MWHC"]);

		let mut buf = Vec::new();
		table.write_csv(&mut buf).unwrap();
		let back = CsvTable::from_reader(buf.as_slice()).unwrap();
		assert_eq!(back.column("index").unwrap(), vec!["1", "0"]);
		assert_eq!(back.column("label").unwrap(), vec!["RankHash:u", "MWHC:u"]);
	}

	#[test]
	fn distinct_keeps_first_appearance() {
		assert_eq!(distinct(["b", "a", "b", "c", "a"].into_iter()), vec!["b", "a", "c"]);
	}
}
