use crate::error::{Error, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Output};
use tracing::debug;

/// The handful of version control operations publishing needs. Every
/// operation is scoped to `dir`, the output directory.
pub trait VersionControl {
	fn stage(&self, dir: &Path) -> Result<()>;
	fn has_staged_changes(&self, dir: &Path) -> Result<bool>;
	fn commit(&self, dir: &Path, message: &str) -> Result<()>;
	/// Full hash of the current HEAD commit.
	fn head(&self, dir: &Path) -> Result<String>;
	/// `dir` relative to the repository root, `/`-separated, no trailing slash.
	fn repo_path(&self, dir: &Path) -> Result<String>;
}

impl<V: VersionControl + ?Sized> VersionControl for &V {
	fn stage(&self, dir: &Path) -> Result<()> { (**self).stage(dir) }
	fn has_staged_changes(&self, dir: &Path) -> Result<bool> { (**self).has_staged_changes(dir) }
	fn commit(&self, dir: &Path, message: &str) -> Result<()> { (**self).commit(dir, message) }
	fn head(&self, dir: &Path) -> Result<String> { (**self).head(dir) }
	fn repo_path(&self, dir: &Path) -> Result<String> { (**self).repo_path(dir) }
}

/// Shells out to the `git` binary.
#[derive(Debug, Clone)]
pub struct GitCli {
	program: OsString,
}

impl Default for GitCli {
	fn default() -> Self { Self { program: OsString::from("git") } }
}

impl GitCli {
	pub fn with_program(program: impl Into<OsString>) -> Self { Self { program: program.into() } }

	fn run(&self, dir: &Path, args: &[&str]) -> Result<Output> {
		debug!(dir = %dir.display(), ?args, "git");
		Command::new(&self.program)
			.arg("-C")
			.arg(dir)
			.args(args)
			.output()
			.map_err(|e| Error::vcs(format!("failed to run git: {e}")))
	}

	fn run_ok(&self, dir: &Path, args: &[&str]) -> Result<String> {
		let out = self.run(dir, args)?;
		if !out.status.success() {
			return Err(Error::vcs(format!(
				"git {} failed ({}): {}",
				args.join(" "),
				out.status,
				String::from_utf8_lossy(&out.stderr).trim()
			)));
		}
		Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
	}
}

impl VersionControl for GitCli {
	fn stage(&self, dir: &Path) -> Result<()> { self.run_ok(dir, &["add", "--all", "--", "."]).map(|_| ()) }

	fn has_staged_changes(&self, dir: &Path) -> Result<bool> {
		let out = self.run(dir, &["diff", "--cached", "--quiet", "--", "."])?;
		match out.status.code() {
			Some(0) => Ok(false),
			Some(1) => Ok(true),
			_ => Err(Error::vcs(format!("git diff --cached failed: {}", String::from_utf8_lossy(&out.stderr).trim()))),
		}
	}

	fn commit(&self, dir: &Path, message: &str) -> Result<()> {
		self.run_ok(dir, &["commit", "--quiet", "-m", message, "--", "."]).map(|_| ())
	}

	fn head(&self, dir: &Path) -> Result<String> { self.run_ok(dir, &["rev-parse", "HEAD"]) }

	fn repo_path(&self, dir: &Path) -> Result<String> {
		Ok(self.run_ok(dir, &["rev-parse", "--show-prefix"])?.trim_end_matches('/').to_string())
	}
}
