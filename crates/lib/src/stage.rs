//! Artifact staging.
//!
//! Copies the library cargo produced to the fixed `native/index.node` path the
//! host runtime loads.
//!
//! # Layout
//!
//! ```text
//! {root}/native/
//! ├── index.node                              # staged artifact
//! └── target/[{triple}/]{configuration}/
//!     └── {prefix}{library}{suffix}           # build output (left in place)
//! ```

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};

use crate::build::Configuration;
use crate::consts::{NATIVE_DIR, STAGED_ARTIFACT, TARGET_DIR};
use crate::platform::{ExplicitTarget, PlatformProfile};

/// Errors that can occur while staging the built library.
#[derive(Debug, Error)]
pub enum StageError {
  /// Cargo reported success but the expected library isn't there.
  #[error("build output not found: {}", .path.display())]
  ArtifactMissing { path: PathBuf },

  /// Removing, copying or renaming failed.
  #[error("failed to stage {}: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Source and destination of the staging copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
  /// `root/native/target/[triple/]configuration/<prefix><name><suffix>`
  pub build_output: PathBuf,
  /// `root/native/index.node`
  pub staged: PathBuf,
}

impl ArtifactPaths {
  pub fn new(
    root: &Path,
    library_name: &str,
    profile: &PlatformProfile,
    configuration: Configuration,
    target: Option<&ExplicitTarget>,
  ) -> Self {
    let native = root.join(NATIVE_DIR);

    let mut output_dir = native.join(TARGET_DIR);
    if let Some(target) = target {
      output_dir.push(target.as_str());
    }
    output_dir.push(configuration.as_str());

    Self {
      build_output: output_dir.join(profile.library_file_name(library_name)),
      staged: native.join(STAGED_ARTIFACT),
    }
  }

  /// Scratch file the copy lands in before it is renamed over `staged`.
  pub fn temp_path(&self) -> PathBuf {
    self.staged.with_file_name(format!("{STAGED_ARTIFACT}.tmp"))
  }
}

/// Replace the staged artifact with a copy of the build output.
///
/// The build output is checked before anything is touched, so a missing
/// library leaves the previous `index.node` in place. The copy is written to a
/// temporary file and renamed into place so readers never see a partial file.
pub async fn stage_artifact(paths: &ArtifactPaths) -> Result<(), StageError> {
  match fs::metadata(&paths.build_output).await {
    Ok(_) => {}
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      return Err(StageError::ArtifactMissing {
        path: paths.build_output.clone(),
      });
    }
    Err(source) => {
      return Err(StageError::Io {
        path: paths.build_output.clone(),
        source,
      });
    }
  }

  info!("generating {}", Path::new(NATIVE_DIR).join(STAGED_ARTIFACT).display());
  debug!(from = %paths.build_output.display(), to = %paths.staged.display(), "staging artifact");

  remove_stale_dir(&paths.staged).await?;

  let temp = paths.temp_path();
  if let Err(source) = fs::copy(&paths.build_output, &temp).await {
    let _ = fs::remove_file(&temp).await;
    return Err(StageError::Io { path: temp, source });
  }

  if let Err(source) = fs::rename(&temp, &paths.staged).await {
    let _ = fs::remove_file(&temp).await;
    return Err(StageError::Io {
      path: paths.staged.clone(),
      source,
    });
  }

  Ok(())
}

/// A directory at the staged path would block the rename; files are replaced by it.
async fn remove_stale_dir(staged: &Path) -> Result<(), StageError> {
  match fs::symlink_metadata(staged).await {
    Ok(meta) if meta.is_dir() => fs::remove_dir_all(staged).await.map_err(|source| StageError::Io {
      path: staged.to_path_buf(),
      source,
    }),
    _ => Ok(()),
  }
}
