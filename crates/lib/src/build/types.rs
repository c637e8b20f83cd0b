//! Build request types and errors.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Sentinel toolchain selector meaning "whatever rustup picks".
pub const DEFAULT_TOOLCHAIN: &str = "default";

/// Which Rust toolchain cargo should use.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Toolchain {
  /// No `+toolchain` argument; rustup's default applies.
  #[default]
  Default,
  /// An explicit toolchain such as `nightly` or `1.80.0`.
  Named(String),
}

impl Toolchain {
  /// `"default"` (or an empty selector) maps to [`Toolchain::Default`].
  pub fn parse(selector: &str) -> Self {
    if selector.is_empty() || selector == DEFAULT_TOOLCHAIN {
      Self::Default
    } else {
      Self::Named(selector.to_string())
    }
  }
}

impl fmt::Display for Toolchain {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Default => f.write_str(DEFAULT_TOOLCHAIN),
      Self::Named(name) => f.write_str(name),
    }
  }
}

/// Cargo build profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Configuration {
  #[default]
  Debug,
  Release,
}

impl Configuration {
  /// Name of the profile directory under `target/`.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Debug => "debug",
      Self::Release => "release",
    }
  }
}

impl fmt::Display for Configuration {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Inputs for one orchestration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
  /// Project root; the crate lives in `root/native`.
  pub root: PathBuf,
  pub toolchain: Toolchain,
  pub configuration: Configuration,
  /// Module ABI version to build against. Falls back to the host runtime's.
  pub abi_version: Option<String>,
}

impl BuildRequest {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      toolchain: Toolchain::Default,
      configuration: Configuration::Debug,
      abi_version: None,
    }
  }

  pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
    self.toolchain = toolchain;
    self
  }

  pub fn with_configuration(mut self, configuration: Configuration) -> Self {
    self.configuration = configuration;
    self
  }

  pub fn with_abi_version(mut self, abi_version: impl Into<String>) -> Self {
    self.abi_version = Some(abi_version.into());
    self
  }
}

/// Exit status of a finished cargo invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildStatus {
  /// `None` when the process was terminated by a signal.
  pub code: Option<i32>,
}

impl BuildStatus {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }
}

/// Errors that can occur while running cargo.
#[derive(Debug, Error)]
pub enum BuildError {
  /// Cargo could not be started at all.
  #[error("failed to run {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// Waiting on the child process failed.
  #[error("failed waiting for `{command}`: {source}")]
  Wait {
    command: String,
    #[source]
    source: std::io::Error,
  },

  /// Cargo ran and reported failure.
  #[error("`{command}` failed with {}", describe_exit(.code))]
  Failed { command: String, code: Option<i32> },

  /// The caller cancelled the run; the child was killed.
  #[error("`{command}` was cancelled")]
  Cancelled { command: String },
}

fn describe_exit(code: &Option<i32>) -> String {
  match code {
    Some(code) => format!("exit code {code}"),
    None => "no exit code (terminated by signal)".to_string(),
  }
}
