use anyhow::{anyhow, Result};
use tracing::Level;

/// Install the stderr fmt subscriber. Calling twice is harmless.
pub fn init(level: &str) -> Result<()> {
	let level: Level = level.parse().map_err(|_| anyhow!("invalid log level: {level}"))?;
	let _ = tracing_subscriber::fmt()
		.with_max_level(level)
		.with_target(false)
		.with_writer(std::io::stderr)
		.try_init();
	Ok(())
}
