//! Cargo build invocation.
//!
//! # Submodules
//!
//! - [`command`] - Builds the cargo command line and environment overlay
//! - [`execute`] - Runs the command and interprets its exit status

pub mod command;
pub mod execute;
mod types;

pub use command::{CargoCommand, EnvOverlay};
pub use execute::{Invoker, ProcessInvoker, run_cargo};
pub use types::*;
