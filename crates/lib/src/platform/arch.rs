use std::fmt;

use serde::Serialize;

/// CPU architecture, named the way the host runtime reports it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Arch {
  Ia32,
  X64,
  Arm,
  Arm64,
  Other(String),
}

impl Arch {
  /// Parse an architecture identifier.
  ///
  /// Accepts the runtime's names (`ia32`, `x64`, ...) and Rust's
  /// `std::env::consts::ARCH` names (`x86`, `x86_64`, ...).
  pub fn from_id(id: &str) -> Self {
    match id {
      "ia32" | "x86" => Self::Ia32,
      "x64" | "x86_64" => Self::X64,
      "arm" => Self::Arm,
      "arm64" | "aarch64" => Self::Arm64,
      other => Self::Other(other.to_string()),
    }
  }

  /// Detect the current CPU architecture at runtime
  pub fn current() -> Self {
    Self::from_id(std::env::consts::ARCH)
  }

  pub fn as_str(&self) -> &str {
    match self {
      Self::Ia32 => "ia32",
      Self::X64 => "x64",
      Self::Arm => "arm",
      Self::Arm64 => "arm64",
      Self::Other(id) => id,
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl From<Arch> for String {
  fn from(arch: Arch) -> Self {
    arch.as_str().to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rust_names_map_to_runtime_names() {
    assert_eq!(Arch::from_id("x86"), Arch::Ia32);
    assert_eq!(Arch::from_id("x86_64"), Arch::X64);
    assert_eq!(Arch::from_id("aarch64"), Arch::Arm64);
  }

  #[test]
  fn unknown_arch_is_preserved() {
    let arch = Arch::from_id("riscv64");
    assert_eq!(arch.as_str(), "riscv64");
  }
}
