//! Host environment snapshot.
//!
//! Collects the values the pipeline falls back to when the build request
//! doesn't specify them: OS, architecture, the npm architecture override and
//! the module ABI version reported by the installed Node.js runtime.

use std::process::Stdio;

use serde::Serialize;
use tokio::process::Command;
use tracing::debug;

use crate::consts::{ARCH_OVERRIDE_ENV_VAR, NODE};
use crate::platform::Arch;

/// Values detected from the host once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostInfo {
  /// OS identifier, unvalidated until platform resolution.
  pub os_id: String,
  pub arch: Arch,
  /// Value of `npm_config_arch`, if set and non-empty.
  pub arch_override: Option<String>,
  /// `process.versions.modules` of the host runtime, if already known.
  pub module_abi: Option<String>,
  /// Runtime queried on demand when `module_abi` is unknown.
  #[serde(skip)]
  pub runtime: Option<String>,
}

impl HostInfo {
  /// Detect the host without spawning anything.
  ///
  /// `module_abi` is left unknown; [`HostInfo::resolve_module_abi`] asks
  /// `node` for it only when a build actually needs it.
  pub fn current() -> Self {
    Self {
      os_id: std::env::consts::OS.to_string(),
      arch: Arch::current(),
      arch_override: arch_override(),
      module_abi: None,
      runtime: Some(NODE.to_string()),
    }
  }

  /// Detect the host, querying `node` for its module ABI version up front.
  pub async fn detect() -> Self {
    let mut host = Self::current();
    host.module_abi = host.resolve_module_abi().await;
    host
  }

  /// The known module ABI, or the runtime's answer if it has to be asked.
  pub async fn resolve_module_abi(&self) -> Option<String> {
    if let Some(abi) = &self.module_abi {
      return Some(abi.clone());
    }
    match &self.runtime {
      Some(program) => runtime_module_abi(program).await,
      None => None,
    }
  }
}

/// Read the architecture override from the environment.
pub fn arch_override() -> Option<String> {
  std::env::var(ARCH_OVERRIDE_ENV_VAR)
    .ok()
    .map(|value| value.trim().to_string())
    .filter(|value| !value.is_empty())
}

/// Ask the runtime at `program` for its module ABI version.
///
/// Returns `None` if the runtime isn't installed or prints nothing useful.
pub async fn runtime_module_abi(program: &str) -> Option<String> {
  let output = Command::new(program)
    .args(["-p", "process.versions.modules"])
    .stdin(Stdio::null())
    .stderr(Stdio::null())
    .output()
    .await;

  let output = match output {
    Ok(output) if output.status.success() => output,
    Ok(output) => {
      debug!(program, code = ?output.status.code(), "runtime ABI query failed");
      return None;
    }
    Err(e) => {
      debug!(program, error = %e, "runtime not available");
      return None;
    }
  };

  let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
  if version.is_empty() || version == "undefined" {
    return None;
  }
  Some(version)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn arch_override_reads_env() {
    temp_env::with_var(ARCH_OVERRIDE_ENV_VAR, Some("ia32"), || {
      assert_eq!(arch_override().as_deref(), Some("ia32"));
    });
  }

  #[test]
  #[serial]
  fn blank_arch_override_is_ignored() {
    temp_env::with_var(ARCH_OVERRIDE_ENV_VAR, Some("  "), || {
      assert_eq!(arch_override(), None);
    });
    temp_env::with_var_unset(ARCH_OVERRIDE_ENV_VAR, || {
      assert_eq!(arch_override(), None);
    });
  }

  #[tokio::test]
  #[serial]
  async fn missing_runtime_yields_no_abi() {
    assert_eq!(runtime_module_abi("neon-build-no-such-runtime").await, None);
  }

  #[tokio::test]
  async fn known_abi_skips_runtime() {
    let host = HostInfo {
      module_abi: Some("108".to_string()),
      runtime: Some("neon-build-no-such-runtime".to_string()),
      ..HostInfo::current()
    };
    assert_eq!(host.resolve_module_abi().await.as_deref(), Some("108"));

    let host = HostInfo {
      module_abi: None,
      runtime: None,
      ..HostInfo::current()
    };
    assert_eq!(host.resolve_module_abi().await, None);
  }

  #[cfg(unix)]
  mod runtime {
    use super::*;
    use crate::util::testutil::fake_program;
    use tempfile::TempDir;

    async fn query(body: &str) -> Option<String> {
      let temp = TempDir::new().unwrap();
      let node = fake_program(temp.path(), "node", body);
      runtime_module_abi(node.to_str().unwrap()).await
    }

    #[tokio::test]
    #[serial]
    async fn reads_trimmed_version() {
      assert_eq!(query(r#"printf '  115\n\n'"#).await.as_deref(), Some("115"));
    }

    #[tokio::test]
    #[serial]
    async fn passes_print_expression() {
      let body = r#"[ "$1" = "-p" ] && [ "$2" = "process.versions.modules" ] && echo 127"#;
      assert_eq!(query(body).await.as_deref(), Some("127"));
    }

    #[tokio::test]
    #[serial]
    async fn undefined_is_unknown() {
      assert_eq!(query("echo undefined").await, None);
    }

    #[tokio::test]
    #[serial]
    async fn empty_output_is_unknown() {
      assert_eq!(query("printf '  \n'").await, None);
    }

    #[tokio::test]
    #[serial]
    async fn nonzero_exit_is_unknown() {
      assert_eq!(query("echo 115\nexit 1").await, None);
    }

    #[tokio::test]
    #[serial]
    async fn host_queries_configured_runtime() {
      let temp = TempDir::new().unwrap();
      let node = fake_program(temp.path(), "node", "echo 131");
      let host = HostInfo {
        module_abi: None,
        runtime: Some(node.to_str().unwrap().to_string()),
        ..HostInfo::current()
      };

      assert_eq!(host.resolve_module_abi().await.as_deref(), Some("131"));
    }
  }

  #[test]
  #[serial]
  fn current_uses_compiled_os() {
    temp_env::with_var(ARCH_OVERRIDE_ENV_VAR, Some("ia32"), || {
      let host = HostInfo::current();
      assert_eq!(host.os_id, std::env::consts::OS);
      assert_eq!(host.arch, Arch::current());
      assert_eq!(host.arch_override.as_deref(), Some("ia32"));
      assert_eq!(host.module_abi, None);
      assert_eq!(host.runtime.as_deref(), Some(NODE));
    });
  }
}
