use comfy_table::{presets::UTF8_FULL, Cell, Table};
use hashbench_core::{Phase, PublishOutcome, ResultTable};

/// Per hash function row counts, in legend order.
pub fn table(results: &ResultTable) -> Table {
	let mut t = Table::new();
	t.load_preset(UTF8_FULL);
	t.set_header(vec!["hash function", "lookup rows", "build rows"]);
	for hashfn in results.hashfns() {
		let count = |phase| results.rows().iter().filter(|r| r.hashfn == hashfn && r.phase == Some(phase)).count();
		t.add_row(vec![Cell::new(&hashfn), Cell::new(count(Phase::Lookup)), Cell::new(count(Phase::Build))]);
	}
	t
}

pub fn print(results: &ResultTable, outcome: &PublishOutcome) {
	println!("{}", table(results));
	let skipped = results.unclassified().count();
	if skipped > 0 {
		println!("{skipped} rows were neither lookup nor build and are left out of the charts");
	}
	println!("wrote {} files", outcome.written.len());
	if let Some(commit) = &outcome.commit {
		println!("commit {commit}");
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use hashbench_core::{augment, BenchmarkRecord, LegendOrder};

	#[test]
	fn counts_by_phase() {
		let records = vec![
			BenchmarkRecord::new("LookupTime", "MWHC:u", 1.0, 10, 2.0),
			BenchmarkRecord::new("BuildTime", "MWHC:u", 1.0, 10, 2.0),
			BenchmarkRecord::new("PresortedBuildTime", "MWHC:u", 1.0, 10, 2.0),
		];
		let rendered = table(&augment(records, &LegendOrder::default())).to_string();
		assert!(rendered.contains("MWHC"));
		assert!(rendered.contains('2'));
	}
}
