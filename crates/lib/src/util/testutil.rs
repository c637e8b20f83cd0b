//! Test utilities for neon-build-lib.
//!
//! Helpers for laying out a project root and standing in for cargo and node.

use std::path::{Path, PathBuf};

/// Write `native/Cargo.toml` declaring library `name`.
pub fn write_manifest(root: &Path, name: &str) {
  let native = root.join("native");
  std::fs::create_dir_all(&native).unwrap();
  std::fs::write(
    native.join("Cargo.toml"),
    format!("[package]\nname = \"{name}-crate\"\nversion = \"0.1.0\"\n\n[lib]\nname = \"{name}\"\ncrate-type = [\"cdylib\"]\n"),
  )
  .unwrap();
}

/// Write a file relative to `root`, creating parent directories.
pub fn write_file(root: &Path, relative_path: &str, content: &[u8]) -> PathBuf {
  let path = root.join(relative_path);
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }
  std::fs::write(&path, content).unwrap();
  path
}

/// Create an executable shell script standing in for cargo.
///
/// The script runs `body` with cargo's arguments and working directory.
#[cfg(unix)]
pub fn fake_cargo(dir: &Path, body: &str) -> PathBuf {
  fake_program(dir, "cargo", body)
}

/// Create an executable shell script `fake-<name>` in `dir` that runs `body`.
#[cfg(unix)]
pub fn fake_program(dir: &Path, name: &str, body: &str) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let path = dir.join(format!("fake-{name}"));
  std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
  std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  path
}
