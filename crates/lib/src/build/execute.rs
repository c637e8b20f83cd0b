//! Cargo execution.
//!
//! The [`Invoker`] trait is the seam between command construction and the
//! process boundary, so the pipeline can be driven without a real toolchain.

use std::future::Future;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::build::command::CargoCommand;
use crate::build::{BuildError, BuildStatus};
use crate::consts::CARGO;

/// Runs a [`CargoCommand`] to completion.
pub trait Invoker {
  /// Execute `command` and report its exit status.
  ///
  /// Dropping the returned future before it completes must stop the build.
  fn invoke(&self, command: &CargoCommand) -> impl Future<Output = Result<BuildStatus, BuildError>> + Send;
}

/// Spawns the toolchain as a child process with inherited stdio.
#[derive(Debug, Clone)]
pub struct ProcessInvoker {
  program: String,
}

impl ProcessInvoker {
  /// Use `program` in place of `cargo`.
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
    }
  }
}

impl Default for ProcessInvoker {
  fn default() -> Self {
    Self::new(CARGO)
  }
}

impl Invoker for ProcessInvoker {
  async fn invoke(&self, command: &CargoCommand) -> Result<BuildStatus, BuildError> {
    let mut process = Command::new(&self.program);
    process
      .args(command.args())
      .current_dir(command.cwd())
      .stdin(Stdio::inherit())
      .stdout(Stdio::inherit())
      .stderr(Stdio::inherit())
      // Cancellation drops this future; the child must not outlive it.
      .kill_on_drop(true);
    command.apply_env(&mut process);

    debug!(program = %self.program, cwd = %command.cwd().display(), "spawning process");

    let mut child = process.spawn().map_err(|source| BuildError::Spawn {
      program: self.program.clone(),
      source,
    })?;

    let status = child.wait().await.map_err(|source| BuildError::Wait {
      command: command.to_string(),
      source,
    })?;

    Ok(BuildStatus { code: status.code() })
  }
}

/// Run cargo through `invoker`, failing unless it exits with status 0.
///
/// If `cancel` completes first the invocation is dropped, which kills the
/// child, and [`BuildError::Cancelled`] is returned.
pub async fn run_cargo(
  invoker: &impl Invoker,
  command: &CargoCommand,
  cancel: impl Future<Output = ()>,
) -> Result<(), BuildError> {
  info!(command = %command, "running cargo");
  for (key, value) in command.env().iter() {
    debug!(key = %key, value = %value, "environment overlay");
  }

  let status = tokio::select! {
    status = invoker.invoke(command) => status?,
    _ = cancel => {
      return Err(BuildError::Cancelled {
        command: command.to_string(),
      });
    }
  };

  if !status.success() {
    return Err(BuildError::Failed {
      command: command.to_string(),
      code: status.code,
    });
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::build::BuildRequest;
  use crate::platform::{Arch, ResolvedPlatform};
  use std::time::Duration;

  struct FixedInvoker(Option<i32>);

  impl Invoker for FixedInvoker {
    async fn invoke(&self, _command: &CargoCommand) -> Result<BuildStatus, BuildError> {
      Ok(BuildStatus { code: self.0 })
    }
  }

  struct HangingInvoker;

  impl Invoker for HangingInvoker {
    async fn invoke(&self, _command: &CargoCommand) -> Result<BuildStatus, BuildError> {
      std::future::pending().await
    }
  }

  fn command(root: &std::path::Path, abi: Option<&str>) -> CargoCommand {
    let platform = ResolvedPlatform::resolve("linux", None, &Arch::X64).unwrap();
    CargoCommand::new(&BuildRequest::new(root), &platform, abi)
  }

  #[tokio::test]
  async fn zero_exit_is_success() {
    let cmd = command(std::path::Path::new("/project"), None);
    run_cargo(&FixedInvoker(Some(0)), &cmd, std::future::pending()).await.unwrap();
  }

  #[tokio::test]
  async fn nonzero_exit_fails_with_code() {
    let cmd = command(std::path::Path::new("/project"), None);
    let err = run_cargo(&FixedInvoker(Some(101)), &cmd, std::future::pending())
      .await
      .unwrap_err();

    assert!(matches!(err, BuildError::Failed { code: Some(101), ref command } if command == "cargo build"));
  }

  #[tokio::test]
  async fn signal_termination_fails() {
    let cmd = command(std::path::Path::new("/project"), None);
    let err = run_cargo(&FixedInvoker(None), &cmd, std::future::pending()).await.unwrap_err();

    assert!(matches!(err, BuildError::Failed { code: None, .. }));
  }

  #[tokio::test]
  async fn cancel_wins_over_hung_build() {
    let cmd = command(std::path::Path::new("/project"), None);
    let err = run_cargo(&HangingInvoker, &cmd, tokio::time::sleep(Duration::from_millis(10)))
      .await
      .unwrap_err();

    assert!(matches!(err, BuildError::Cancelled { .. }));
  }

  #[tokio::test]
  #[tracing_test::traced_test]
  async fn logs_exact_command_line() {
    let platform = ResolvedPlatform::resolve("linux", None, &Arch::X64).unwrap();
    let request = BuildRequest::new("/project").with_configuration(crate::build::Configuration::Release);
    let cmd = CargoCommand::new(&request, &platform, None);

    run_cargo(&FixedInvoker(Some(0)), &cmd, std::future::pending()).await.unwrap();

    assert!(logs_contain("cargo build --release"));
  }

  #[cfg(unix)]
  mod process {
    use super::*;
    use crate::util::testutil::fake_cargo;
    use serial_test::serial;
    use tempfile::TempDir;

    #[tokio::test]
    #[serial]
    async fn missing_program_is_spawn_error() {
      let temp = TempDir::new().unwrap();
      std::fs::create_dir_all(temp.path().join("native")).unwrap();
      let cmd = command(temp.path(), None);

      let err = ProcessInvoker::new("/nonexistent/cargo").invoke(&cmd).await.unwrap_err();

      assert!(matches!(err, BuildError::Spawn { ref program, .. } if program == "/nonexistent/cargo"));
    }

    #[tokio::test]
    #[serial]
    async fn runs_in_native_dir_with_abi_overlay() {
      let temp = TempDir::new().unwrap();
      let native = temp.path().join("native");
      std::fs::create_dir_all(&native).unwrap();
      let cargo = fake_cargo(
        temp.path(),
        r#"pwd > seen_cwd
echo "$NEON_NODE_ABI" > seen_abi
echo "$@" > seen_args"#,
      );
      let cmd = command(temp.path(), Some("127"));

      let status = ProcessInvoker::new(cargo.to_str().unwrap()).invoke(&cmd).await.unwrap();

      assert!(status.success());
      let seen_cwd = std::fs::read_to_string(native.join("seen_cwd")).unwrap();
      assert_eq!(
        std::fs::canonicalize(seen_cwd.trim()).unwrap(),
        std::fs::canonicalize(&native).unwrap()
      );
      assert_eq!(std::fs::read_to_string(native.join("seen_abi")).unwrap().trim(), "127");
      assert_eq!(std::fs::read_to_string(native.join("seen_args")).unwrap().trim(), "build");
      assert!(std::env::var("NEON_NODE_ABI").is_err(), "overlay leaked into parent environment");
    }

    #[tokio::test]
    #[serial]
    async fn exit_code_is_reported() {
      let temp = TempDir::new().unwrap();
      std::fs::create_dir_all(temp.path().join("native")).unwrap();
      let cargo = fake_cargo(temp.path(), "exit 3");
      let cmd = command(temp.path(), None);

      let status = ProcessInvoker::new(cargo.to_str().unwrap()).invoke(&cmd).await.unwrap();

      assert_eq!(status.code, Some(3));
    }
  }
}
