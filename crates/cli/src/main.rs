mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{cmd_build, cmd_info};
use output::{OutputFormat, print_error};

/// neon-build - Build a Rust crate into a loadable Node.js native module
#[derive(Parser)]
#[command(name = "neon-build")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build native/ with cargo and stage it as native/index.node
  Build {
    /// Project directory containing native/Cargo.toml
    #[arg(short, long, default_value = ".")]
    path: PathBuf,

    /// Build with the release profile
    #[arg(short, long)]
    release: bool,

    /// Rust toolchain to build with (e.g. nightly)
    #[arg(long, default_value = "default")]
    rust: String,

    /// Module ABI version to target (defaults to the installed node's)
    #[arg(long)]
    abi: Option<String>,
  },

  /// Show the detected platform and what a build would produce
  Info {
    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    output: OutputFormat,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .with_target(false)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Build {
      path,
      release,
      rust,
      abi,
    } => cmd_build(&path, release, &rust, abi),
    Commands::Info { output } => cmd_info(output),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{err:#}"));
      ExitCode::FAILURE
    }
  }
}
