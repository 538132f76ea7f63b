use crate::error::{Error, Result};
use crate::record::BenchmarkRecord;
use serde::Deserialize;
use serde_json::Value;
use std::{fs, path::Path};
use tracing::{debug, info};

/// Top-level array holding the records in Google-benchmark documents.
pub const DEFAULT_FIELD: &str = "benchmarks";

/// Read and parse a results document from disk.
pub fn load_path(path: impl AsRef<Path>, field: &str) -> Result<Vec<BenchmarkRecord>> {
	let path = path.as_ref();
	let text = fs::read_to_string(path)?;
	let records = load_str(&text, field)?;
	info!(path = %path.display(), records = records.len(), "loaded benchmark results");
	Ok(records)
}

/// Parse a results document held in memory.
///
/// Other top-level fields (`context`, ...) are ignored. Records are flattened
/// one-to-one, in document order, with times normalized to nanoseconds.
pub fn load_str(text: &str, field: &str) -> Result<Vec<BenchmarkRecord>> {
	let doc: Value = serde_json::from_str(text)?;
	let items = doc
		.get(field)
		.and_then(Value::as_array)
		.ok_or_else(|| Error::MissingField(field.to_string()))?;
	debug!(field, entries = items.len(), "parsing benchmark entries");
	items
		.iter()
		.enumerate()
		.map(|(index, item)| {
			let mut record = BenchmarkRecord::deserialize(item)
				.map_err(|e| Error::invalid_record(index, e.to_string()))?;
			record.normalize_time_unit();
			Ok(record)
		})
		.collect()
}
