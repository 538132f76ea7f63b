use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// One measured run as emitted by the benchmark harness.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BenchmarkRecord {
	/// Variant/phase, e.g. `LookupTime` or `PresortedBuildTime`.
	pub name: String,
	/// Composite `hashfn:dataset`.
	pub label: String,
	/// Nanoseconds once loaded (see [`TimeUnit`]).
	pub cpu_time: f64,
	#[serde(deserialize_with = "positive_count")]
	pub dataset_elem_count: u64,
	pub hashfn_bits_per_key: f64,
	#[serde(default)]
	pub run_name: Option<String>,
	#[serde(default)]
	pub run_type: Option<String>,
	#[serde(default)]
	pub iterations: Option<u64>,
	#[serde(default)]
	pub real_time: Option<f64>,
	#[serde(default)]
	pub time_unit: Option<TimeUnit>,
	/// Every other field of the record, kept verbatim.
	#[serde(flatten)]
	pub extra: BTreeMap<String, Value>,
}

impl BenchmarkRecord {
	/// Minimal record, mostly useful for tests and synthetic inputs.
	pub fn new(
		name: impl Into<String>,
		label: impl Into<String>,
		cpu_time: f64,
		dataset_elem_count: u64,
		hashfn_bits_per_key: f64,
	) -> Self {
		Self {
			name: name.into(),
			label: label.into(),
			cpu_time,
			dataset_elem_count,
			hashfn_bits_per_key,
			run_name: None,
			run_type: None,
			iterations: None,
			real_time: None,
			time_unit: None,
			extra: BTreeMap::new(),
		}
	}

	/// Rescale `cpu_time`/`real_time` to nanoseconds according to `time_unit`.
	pub fn normalize_time_unit(&mut self) {
		let Some(unit) = self.time_unit else { return };
		if unit == TimeUnit::Ns { return; }
		let factor = unit.nanos();
		self.cpu_time *= factor;
		if let Some(real) = self.real_time.as_mut() { *real *= factor; }
		self.time_unit = Some(TimeUnit::Ns);
	}
}

/// Unit attached to `cpu_time` by Google-benchmark style documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit { Ns, Us, Ms, S }

impl TimeUnit {
	/// Nanoseconds per unit.
	pub fn nanos(self) -> f64 {
		match self {
			TimeUnit::Ns => 1.0,
			TimeUnit::Us => 1e3,
			TimeUnit::Ms => 1e6,
			TimeUnit::S => 1e9,
		}
	}
}

impl fmt::Display for TimeUnit {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self { TimeUnit::Ns => "ns", TimeUnit::Us => "us", TimeUnit::Ms => "ms", TimeUnit::S => "s" };
		f.write_str(s)
	}
}

// Counters come out of the harness as doubles (`1.0e+06`), so accept any
// integral JSON number.
fn positive_count<'de, D: Deserializer<'de>>(de: D) -> Result<u64, D::Error> {
	let v = f64::deserialize(de)?;
	if !v.is_finite() || v < 1.0 || v.fract() != 0.0 || v > u64::MAX as f64 {
		return Err(D::Error::custom(format!("dataset_elem_count must be a positive integer, got {v}")));
	}
	Ok(v as u64)
}
