#![forbid(unsafe_code)]
//! Benchmark result reporting for hash function experiments.
//!
//! The pipeline is strictly sequential: [`loader`] reads the JSON document,
//! [`augment`] derives the computed columns and sorts the rows into a
//! [`ResultTable`], [`chart`] turns the table into chart plans that [`render`]
//! draws, and [`publish`] writes everything to the output directory.

pub mod augment;
pub mod chart;
pub mod config;
pub mod error;
pub mod legend;
pub mod loader;
pub mod publish;
pub mod record;
pub mod render;
pub mod table;

pub use augment::{augment, BenchmarkRow, Magnitude, Phase};
pub use chart::{ChartPlan, Metric, View};
pub use config::{ReportConfig, ReportFormat};
pub use error::{Error, Result};
pub use legend::{ColorMap, LegendOrder, Rgb, UnknownPlacement};
pub use publish::{PublishOutcome, Publisher};
pub use record::{BenchmarkRecord, TimeUnit};
pub use table::{CsvTable, ResultTable};
