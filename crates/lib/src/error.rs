//! Error type for the build pipeline.

use thiserror::Error;

use crate::build::BuildError;
use crate::manifest::ManifestError;
use crate::platform::PlatformError;
use crate::stage::StageError;

/// Any failure that aborts a build run.
#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Manifest(#[from] ManifestError),

  #[error(transparent)]
  Platform(#[from] PlatformError),

  #[error(transparent)]
  Build(#[from] BuildError),

  #[error(transparent)]
  Stage(#[from] StageError),
}

pub type Result<T> = std::result::Result<T, Error>;
