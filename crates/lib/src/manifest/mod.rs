//! Crate manifest reader.
//!
//! Loads `native/Cargo.toml` under a project root and extracts the library
//! name that determines the build output's file name.

mod types;

use std::path::Path;

use tracing::debug;

pub use types::*;
use types::RawManifest;

use crate::consts::{MANIFEST_FILE, NATIVE_DIR};

/// Read and validate the manifest of the crate under `root`.
///
/// Fails with [`ManifestError::Missing`] if the file can't be read and with
/// [`ManifestError::Invalid`] if `[lib] name` is absent, not a string, or empty.
pub async fn read_manifest(root: &Path) -> Result<Manifest, ManifestError> {
  let path = root.join(NATIVE_DIR).join(MANIFEST_FILE);

  let content = tokio::fs::read_to_string(&path)
    .await
    .map_err(|source| ManifestError::Missing {
      path: path.clone(),
      source,
    })?;

  let manifest = parse_manifest(&content, &path)?;
  debug!(path = %path.display(), library = %manifest.library_name, "read manifest");
  Ok(manifest)
}

/// Parse manifest text. `path` is only used for error context.
pub fn parse_manifest(content: &str, path: &Path) -> Result<Manifest, ManifestError> {
  let raw: RawManifest = toml::from_str(content).map_err(|e| ManifestError::Parse {
    path: path.to_path_buf(),
    message: e.message().to_string(),
  })?;

  let invalid = |reason: &str| ManifestError::Invalid {
    path: path.to_path_buf(),
    field: LIB_NAME_FIELD,
    reason: reason.to_string(),
  };

  let lib = raw.lib.ok_or_else(|| invalid("missing [lib] section"))?;
  let name = match lib.name {
    Some(toml::Value::String(name)) => name,
    Some(other) => return Err(invalid(&format!("expected a string, found {}", other.type_str()))),
    None => return Err(invalid("missing field")),
  };

  if name.trim().is_empty() {
    return Err(invalid("must not be empty"));
  }

  Ok(Manifest { library_name: name })
}
