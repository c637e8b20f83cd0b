//! Cargo command line construction.
//!
//! Everything here is pure: the command is computed from the request and the
//! resolved platform, so it can be inspected and logged before it runs.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::build::{BuildRequest, Configuration, Toolchain};
use crate::consts::{ABI_ENV_VAR, CARGO, NATIVE_DIR};
use crate::platform::ResolvedPlatform;

/// Linker arguments that defer undefined symbols to load time on macOS.
pub const DYNAMIC_LOOKUP_ARGS: [&str; 2] = ["-C", "link-args=-Wl,-undefined,dynamic_lookup"];

/// Variables added on top of the inherited environment for the child process.
///
/// Never applied to the current process; see [`CargoCommand::apply_env`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverlay(BTreeMap<String, String>);

impl EnvOverlay {
  pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.0.insert(key.into(), value.into());
    self
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.0.get(key).map(String::as_str)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
    self.0.iter()
  }
}

/// A fully resolved cargo invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CargoCommand {
  args: Vec<String>,
  cwd: PathBuf,
  env: EnvOverlay,
}

impl CargoCommand {
  /// Compose the invocation for `request` on `platform`.
  ///
  /// `abi_version` is injected as `NEON_NODE_ABI` when known.
  pub fn new(request: &BuildRequest, platform: &ResolvedPlatform, abi_version: Option<&str>) -> Self {
    let mut args = Vec::new();

    if let Toolchain::Named(name) = &request.toolchain {
      args.push(format!("+{name}"));
    }

    let dynamic_lookup = platform.needs_dynamic_lookup();
    args.push(if dynamic_lookup { "rustc" } else { "build" }.to_string());

    if request.configuration == Configuration::Release {
      args.push("--release".to_string());
    }

    // Must precede `--`, after which arguments go to rustc.
    if let Some(target) = &platform.target {
      args.push(format!("--target={target}"));
    }

    if dynamic_lookup {
      args.push("--".to_string());
      args.extend(DYNAMIC_LOOKUP_ARGS.iter().map(|arg| arg.to_string()));
    }

    let env = match abi_version {
      Some(abi) => EnvOverlay::default().with(ABI_ENV_VAR, abi),
      None => EnvOverlay::default(),
    };

    Self {
      args,
      cwd: request.root.join(NATIVE_DIR),
      env,
    }
  }

  pub fn args(&self) -> &[String] {
    &self.args
  }

  /// Directory cargo runs in (`root/native`).
  pub fn cwd(&self) -> &Path {
    &self.cwd
  }

  pub fn env(&self) -> &EnvOverlay {
    &self.env
  }

  /// Add the overlay to a process builder that otherwise inherits our environment.
  pub fn apply_env(&self, command: &mut tokio::process::Command) {
    command.envs(self.env.iter());
  }
}

impl fmt::Display for CargoCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(CARGO)?;
    for arg in &self.args {
      write!(f, " {arg}")?;
    }
    Ok(())
  }
}
