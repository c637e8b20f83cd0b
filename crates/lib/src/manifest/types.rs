//! Manifest types for neon-build.
//!
//! Only the `[lib] name` field of the crate's `Cargo.toml` is consumed; every
//! other table and key is ignored.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Dotted path of the field naming the library.
pub const LIB_NAME_FIELD: &str = "lib.name";

/// The parts of the crate manifest the build pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
  /// Declared output library name, guaranteed non-empty.
  pub library_name: String,
}

/// Errors that can occur while reading the crate manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
  /// The manifest file could not be read.
  #[error("failed to read manifest {}: {source}", .path.display())]
  Missing {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The manifest is not valid TOML.
  #[error("failed to parse manifest {}: {message}", .path.display())]
  Parse { path: PathBuf, message: String },

  /// A required field is absent or unusable.
  #[error("manifest {} has invalid `{field}`: {reason}", .path.display())]
  Invalid {
    path: PathBuf,
    field: &'static str,
    reason: String,
  },
}

/// Raw view of `Cargo.toml`; unknown tables are skipped by serde.
#[derive(Debug, Default, Deserialize)]
pub(super) struct RawManifest {
  pub lib: Option<RawLib>,
}

/// Raw `[lib]` table. `name` stays untyped so a wrong type reports the field.
#[derive(Debug, Default, Deserialize)]
pub(super) struct RawLib {
  pub name: Option<toml::Value>,
}
