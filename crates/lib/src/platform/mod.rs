//! Platform resolution.
//!
//! Maps the host operating system to the library naming convention cargo
//! uses for `cdylib` outputs, and decides whether cargo needs an explicit
//! `--target` to pick the right architecture.

pub mod arch;
pub mod os;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub use arch::Arch;
pub use os::Os;

/// 32-bit Windows target triple.
pub const WINDOWS_32_TARGET: &str = "i686-pc-windows-msvc";

/// 64-bit Windows target triple.
pub const WINDOWS_64_TARGET: &str = "x86_64-pc-windows-msvc";

/// Errors that can occur while resolving the host platform
#[derive(Debug, Error)]
pub enum PlatformError {
  #[error("unsupported platform: {0}")]
  UnsupportedOs(String),
}

/// File name prefix and suffix cargo gives a dynamic library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformProfile {
  pub prefix: &'static str,
  pub suffix: &'static str,
}

impl PlatformProfile {
  pub fn for_os(os: Os) -> Self {
    let (prefix, suffix) = match os {
      Os::Darwin => ("lib", ".dylib"),
      Os::FreeBsd | Os::Linux | Os::SunOs => ("lib", ".so"),
      Os::Windows => ("", ".dll"),
    };
    Self { prefix, suffix }
  }

  /// File name of library `name` on this platform (e.g. `libaddon.so`).
  pub fn library_file_name(&self, name: &str) -> String {
    format!("{}{}{}", self.prefix, name, self.suffix)
  }
}

/// Target triple passed to cargo when its default target is ambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExplicitTarget(pub String);

impl ExplicitTarget {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ExplicitTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Pick the explicit target for `os`, if it needs one.
///
/// Only Windows disambiguates: `arch_override` wins over `host_arch`. The
/// override is npm's raw value, so only the exact string `ia32` selects the
/// 32-bit triple; Rust's `x86` name is only mapped for the host architecture.
pub fn explicit_target(os: Os, arch_override: Option<&str>, host_arch: &Arch) -> Option<ExplicitTarget> {
  match os {
    Os::Windows => {
      let wants_32_bit = match arch_override {
        Some(arch) => arch == "ia32",
        None => *host_arch == Arch::Ia32,
      };
      let triple = if wants_32_bit {
        WINDOWS_32_TARGET
      } else {
        WINDOWS_64_TARGET
      };
      Some(ExplicitTarget(triple.to_string()))
    }
    Os::Darwin | Os::FreeBsd | Os::Linux | Os::SunOs => None,
  }
}

/// Everything the pipeline needs to know about the host platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPlatform {
  pub os: Os,
  pub profile: PlatformProfile,
  pub target: Option<ExplicitTarget>,
}

impl ResolvedPlatform {
  /// Resolve naming and target for host OS `os_id`.
  ///
  /// Unknown OS identifiers fail with [`PlatformError::UnsupportedOs`].
  pub fn resolve(os_id: &str, arch_override: Option<&str>, host_arch: &Arch) -> Result<Self, PlatformError> {
    let os = Os::from_id(os_id)?;
    Ok(Self {
      os,
      profile: PlatformProfile::for_os(os),
      target: explicit_target(os, arch_override, host_arch),
    })
  }

  /// macOS links through `cargo rustc` so undefined symbols can be deferred to load time.
  pub fn needs_dynamic_lookup(&self) -> bool {
    self.os == Os::Darwin
  }
}
