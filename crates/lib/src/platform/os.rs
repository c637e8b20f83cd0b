use std::fmt;

use serde::Serialize;

use super::PlatformError;

/// Host operating systems that can build and load native modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
  Darwin,
  FreeBsd,
  Linux,
  SunOs,
  #[serde(rename = "win32")]
  Windows,
}

impl Os {
  pub const ALL: [Os; 5] = [Os::Darwin, Os::FreeBsd, Os::Linux, Os::SunOs, Os::Windows];

  /// Parse a host OS identifier.
  ///
  /// Accepts the runtime's identifiers (`darwin`, `win32`, ...) as well as
  /// Rust's `std::env::consts::OS` names (`macos`, `windows`, ...).
  pub fn from_id(id: &str) -> Result<Self, PlatformError> {
    match id {
      "darwin" | "macos" => Ok(Self::Darwin),
      "freebsd" => Ok(Self::FreeBsd),
      "linux" => Ok(Self::Linux),
      "sunos" | "solaris" | "illumos" => Ok(Self::SunOs),
      "win32" | "windows" => Ok(Self::Windows),
      other => Err(PlatformError::UnsupportedOs(other.to_string())),
    }
  }

  /// Returns the runtime's identifier for this OS
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Darwin => "darwin",
      Self::FreeBsd => "freebsd",
      Self::Linux => "linux",
      Self::SunOs => "sunos",
      Self::Windows => "win32",
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rust_and_runtime_ids_agree() {
    assert_eq!(Os::from_id("macos").unwrap(), Os::from_id("darwin").unwrap());
    assert_eq!(Os::from_id("windows").unwrap(), Os::from_id("win32").unwrap());
    assert_eq!(Os::from_id("illumos").unwrap(), Os::SunOs);
  }

  #[test]
  fn as_str_round_trips() {
    for os in Os::ALL {
      assert_eq!(Os::from_id(os.as_str()).unwrap(), os);
    }
  }

  #[test]
  fn serializes_as_runtime_id() {
    for os in Os::ALL {
      assert_eq!(serde_json::to_value(os).unwrap(), os.as_str());
    }
  }

  #[test]
  fn unknown_os_is_rejected() {
    let err = Os::from_id("aix").unwrap_err();
    assert!(matches!(err, PlatformError::UnsupportedOs(ref id) if id == "aix"));
  }
}
