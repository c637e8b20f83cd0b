//! Implementation of the `neon-build build` command.
//!
//! Builds the crate in `<path>/native` with cargo and stages the library as
//! `<path>/native/index.node`.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use neon_build_lib::{BuildRequest, Configuration, Toolchain, build_with_cancel};
use tracing::debug;

use crate::output::{format_bytes, format_duration, print_success, symbols};

/// Execute the build command.
///
/// Ctrl-C kills cargo and aborts the run without touching `index.node`.
pub fn cmd_build(path: &Path, release: bool, rust: &str, abi: Option<String>) -> Result<()> {
  let root = dunce::canonicalize(path).with_context(|| format!("Project directory not found: {}", path.display()))?;

  debug!(root = %root.display(), "project root");

  let configuration = if release {
    Configuration::Release
  } else {
    Configuration::Debug
  };
  let mut request = BuildRequest::new(root)
    .with_toolchain(Toolchain::parse(rust))
    .with_configuration(configuration);
  if let Some(abi) = abi {
    request = request.with_abi_version(abi);
  }

  let started = Instant::now();
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let outcome = rt
    .block_on(build_with_cancel(&request, interrupted()))
    .context("Build failed")?;

  let size = std::fs::metadata(&outcome.staged).map(|m| m.len()).unwrap_or(0);
  print_success(&format!(
    "Built {} ({}) in {}",
    outcome.library_name,
    configuration,
    format_duration(started.elapsed())
  ));
  println!(
    "  {} {} {} ({})",
    outcome.build_output.display(),
    symbols::ARROW,
    outcome.staged.display(),
    format_bytes(size)
  );

  Ok(())
}

/// Completes on Ctrl-C. If the signal handler can't be installed, never completes.
async fn interrupted() {
  if tokio::signal::ctrl_c().await.is_err() {
    std::future::pending::<()>().await;
  }
}
