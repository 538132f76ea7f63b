use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Every failure the report pipeline can surface.
#[derive(Debug, Error)]
pub enum Error {
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	#[error("csv: {0}")]
	Csv(#[from] csv::Error),
	#[error("config: {0}")]
	Config(String),
	#[error("missing field: {0}")]
	MissingField(String),
	#[error("invalid record #{index}: {reason}")]
	InvalidRecord { index: usize, reason: String },
	#[error("render: {0}")]
	Render(String),
	#[error("vcs: {0}")]
	Vcs(String),
	/// The commit went through but the report could not be written afterwards.
	#[error("report for commit {commit} not written: {source}")]
	Report { commit: String, #[source] source: Box<Error> },
}

impl Error {
	pub fn config(msg: impl Into<String>) -> Self { Self::Config(msg.into()) }
	pub fn render(msg: impl Into<String>) -> Self { Self::Render(msg.into()) }
	pub fn vcs(msg: impl Into<String>) -> Self { Self::Vcs(msg.into()) }
	pub fn invalid_record(index: usize, reason: impl Into<String>) -> Self {
		Self::InvalidRecord { index, reason: reason.into() }
	}
}
