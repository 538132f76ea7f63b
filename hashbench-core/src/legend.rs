//! Legend ordering and colors.
//!
//! The rank table decides both the row order and, through it, which palette
//! entry every hash function gets. A hash function missing from the table
//! still renders, but its color shifts whenever the set of benchmarked
//! functions changes, so the table has to follow new variants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Known hash functions, lowercase, in legend order (rank 1 first).
pub const DEFAULT_ORDER: &[&str] = &[
	"donothinghash",
	"rankhash",
	"recsplit_leaf12_bucket9",
	"compacttrie",
	"fastsuccincttrie",
	"simplehollowtrie",
	"hollowtrie",
	"mwhc",
	"compressedmwhc",
	"compactedmwhc",
	"learnedlinear",
	"mapomphf",
];

/// Where names missing from the table end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownPlacement {
	/// Rank 0, ahead of every known name.
	#[default]
	First,
	/// One past the last known rank.
	Last,
}

/// Case-insensitive name → rank table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendOrder {
	names: Vec<String>,
	unknown: UnknownPlacement,
}

impl Default for LegendOrder {
	fn default() -> Self { Self::new(DEFAULT_ORDER.iter().copied(), UnknownPlacement::First) }
}

impl LegendOrder {
	pub fn new<I, S>(names: I, unknown: UnknownPlacement) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self { names: names.into_iter().map(|n| n.as_ref().to_lowercase()).collect(), unknown }
	}

	/// Rank of a known name, starting at 1.
	pub fn known_rank(&self, hashfn: &str) -> Option<u32> {
		let needle = hashfn.to_lowercase();
		self.names.iter().position(|n| *n == needle).map(|i| i as u32 + 1)
	}

	pub fn unknown_rank(&self) -> u32 {
		match self.unknown {
			UnknownPlacement::First => 0,
			UnknownPlacement::Last => self.names.len() as u32 + 1,
		}
	}

	pub fn rank(&self, hashfn: &str) -> u32 { self.known_rank(hashfn).unwrap_or_else(|| self.unknown_rank()) }

}

/// 8-bit sRGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2) }
}

/// Fixed 14 color sequence: three grays for the baselines, then the bright
/// qualitative colors.
pub const PALETTE: [Rgb; 14] = [
	Rgb(0xBB, 0xBB, 0xBB),
	Rgb(0x77, 0x77, 0x77),
	Rgb(0x11, 0x11, 0x11),
	Rgb(0xFE, 0xCB, 0x52),
	Rgb(0xFF, 0xA1, 0x5A),
	Rgb(0xFF, 0x66, 0x92),
	Rgb(0xEF, 0x55, 0x3B),
	Rgb(0x63, 0x6E, 0xFA),
	Rgb(0x58, 0xA2, 0xC4),
	Rgb(0x19, 0xD3, 0xF3),
	Rgb(0x00, 0xCC, 0x96),
	Rgb(0xB6, 0xE8, 0x80),
	Rgb(0xFF, 0x97, 0xFF),
	Rgb(0xAB, 0x63, 0xFA),
];

/// Colors assigned in order of first appearance, cycling through [`PALETTE`].
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
	entries: Vec<(String, Rgb)>,
}

impl ColorMap {
	pub fn new<I, S>(hashfns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut entries: Vec<(String, Rgb)> = Vec::new();
		for name in hashfns {
			let name = name.into();
			if entries.iter().any(|(n, _)| *n == name) { continue; }
			let color = PALETTE[entries.len() % PALETTE.len()];
			entries.push((name, color));
		}
		Self { entries }
	}

	/// Color of a name, falling back to the first palette entry.
	pub fn color(&self, hashfn: &str) -> Rgb {
		self.entries.iter().find(|(n, _)| n == hashfn).map(|(_, c)| *c).unwrap_or(PALETTE[0])
	}

}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn mwhc_ranks_before_compacted_variant() {
		let order = LegendOrder::default();
		assert_eq!(order.rank("mwhc"), 8);
		assert_eq!(order.rank("CompactedMWHC"), 10);
		assert!(order.rank("MWHC") < order.rank("compactedmwhc"));
	}

	#[test]
	fn unknown_placement() {
		let first = LegendOrder::default();
		assert_eq!(first.rank("BBHash"), 0);
		let last = LegendOrder::new(DEFAULT_ORDER.iter().copied(), UnknownPlacement::Last);
		assert_eq!(last.rank("BBHash"), DEFAULT_ORDER.len() as u32 + 1);
		assert_eq!(last.rank("DoNothingHash"), 1);
	}

	#[test]
	fn colors_follow_first_appearance_and_cycle() {
		let names: Vec<String> = (0..16).map(|i| format!("h{i}")).collect();
		let map = ColorMap::new(names.iter().cloned().chain(["h0".to_string()]));
		assert_eq!(map.color("h0"), PALETTE[0]);
		assert_eq!(map.color("h13"), PALETTE[13]);
		assert_eq!(map.color("h14"), PALETTE[0]);
		assert_eq!(map.color("h15"), PALETTE[1]);
		assert_eq!(PALETTE[3].to_string(), "#FECB52");
	}
}
