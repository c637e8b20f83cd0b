//! neon-build-lib: builds a Rust crate as a Node.js native module
//!
//! This crate drives cargo to produce the platform's dynamic library and
//! stages it at `native/index.node`, the stable path the runtime loads:
//! - [`manifest`]: reads the library name from `native/Cargo.toml`
//! - [`platform`]: library naming and explicit target per host OS
//! - [`build`]: composes and runs the cargo invocation
//! - [`stage`]: copies the build output into place
//! - [`pipeline`]: runs the stages in order

pub mod build;
pub mod consts;
pub mod error;
pub mod host;
pub mod manifest;
pub mod pipeline;
pub mod platform;
pub mod stage;
#[cfg(test)]
mod util;

pub use build::{BuildRequest, Configuration, Toolchain};
pub use error::{Error, Result};
pub use host::HostInfo;
pub use pipeline::{BuildOutcome, build, build_with, build_with_cancel};
