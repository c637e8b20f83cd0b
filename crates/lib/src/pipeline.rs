//! The build pipeline.
//!
//! Runs the stages in order and stops at the first failure:
//!
//! 1. Read `native/Cargo.toml` for the library name
//! 2. Resolve the host platform's naming convention and target
//! 3. Run cargo
//! 4. Stage the library as `native/index.node`

use std::future::Future;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::build::{BuildRequest, CargoCommand, Invoker, ProcessInvoker, run_cargo};
use crate::consts::ABI_ENV_VAR;
use crate::error::Result;
use crate::host::HostInfo;
use crate::manifest::read_manifest;
use crate::platform::ResolvedPlatform;
use crate::stage::{ArtifactPaths, stage_artifact};

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
  pub library_name: String,
  /// The cargo command line that ran.
  pub command: String,
  pub build_output: PathBuf,
  pub staged: PathBuf,
}

/// Build the crate under `request.root` and stage it.
pub async fn build(request: &BuildRequest) -> Result<BuildOutcome> {
  build_with_cancel(request, std::future::pending()).await
}

/// Like [`build`], but gives up when `cancel` completes.
///
/// A cancelled run kills cargo, fails with `BuildError::Cancelled` and leaves
/// the staged artifact untouched.
pub async fn build_with_cancel(request: &BuildRequest, cancel: impl Future<Output = ()>) -> Result<BuildOutcome> {
  build_with(request, &HostInfo::current(), &ProcessInvoker::default(), cancel).await
}

/// Run the pipeline against an explicit host snapshot and invoker.
///
/// The host runtime is only asked for its module ABI once the manifest and
/// platform have been validated, and only if the request doesn't carry one.
pub async fn build_with(
  request: &BuildRequest,
  host: &HostInfo,
  invoker: &impl Invoker,
  cancel: impl Future<Output = ()>,
) -> Result<BuildOutcome> {
  let manifest = read_manifest(&request.root).await?;

  let platform = ResolvedPlatform::resolve(&host.os_id, host.arch_override.as_deref(), &host.arch)?;
  debug!(os = %platform.os, target = ?platform.target, "resolved platform");

  let abi_version = match &request.abi_version {
    Some(abi) => Some(abi.clone()),
    None => host.resolve_module_abi().await,
  };
  if abi_version.is_none() {
    warn!("could not determine the module ABI version; {ABI_ENV_VAR} will not be set");
  }

  let command = CargoCommand::new(request, &platform, abi_version.as_deref());
  let paths = ArtifactPaths::new(
    &request.root,
    &manifest.library_name,
    &platform.profile,
    request.configuration,
    platform.target.as_ref(),
  );
  debug!(output = %paths.build_output.display(), "expected build output");

  run_cargo(invoker, &command, cancel).await?;
  stage_artifact(&paths).await?;

  info!(staged = %paths.staged.display(), "build complete");

  Ok(BuildOutcome {
    library_name: manifest.library_name,
    command: command.to_string(),
    build_output: paths.build_output,
    staged: paths.staged,
  })
}
