use anyhow::{Context, Result};
use serde::Serialize;

use neon_build_lib::HostInfo;
use neon_build_lib::platform::{PlatformError, ResolvedPlatform};

use crate::output::{OutputFormat, print_info, print_json, print_stat, print_warning};

#[derive(Serialize)]
struct InfoReport {
  host: HostInfo,
  platform: Option<ResolvedPlatform>,
}

/// Print what a build on this host would use.
pub fn cmd_info(output: OutputFormat) -> Result<()> {
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let host = rt.block_on(HostInfo::detect());
  let platform = ResolvedPlatform::resolve(&host.os_id, host.arch_override.as_deref(), &host.arch);

  if output.is_json() {
    return print_json(&InfoReport {
      platform: platform.ok(),
      host,
    });
  }

  print_info("Host:");
  print_stat("OS", &host.os_id);
  print_stat("Arch", host.arch.as_str());
  print_stat("Arch override", host.arch_override.as_deref().unwrap_or("(none)"));
  print_stat("Module ABI", host.module_abi.as_deref().unwrap_or("(unknown)"));

  match platform {
    Ok(platform) => {
      print_info("Build:");
      print_stat("Library", &platform.profile.library_file_name("<name>"));
      print_stat(
        "Target",
        platform.target.as_ref().map_or("(cargo default)", |target| target.as_str()),
      );
    }
    Err(PlatformError::UnsupportedOs(os)) => {
      print_warning(&format!("Native modules can't be built on '{os}'"));
    }
  }

  Ok(())
}
