//! Fixed names shared by the build pipeline.

/// Subdirectory of the project root holding the Rust crate.
pub const NATIVE_DIR: &str = "native";

/// Manifest file inside [`NATIVE_DIR`].
pub const MANIFEST_FILE: &str = "Cargo.toml";

/// Cargo's output directory inside [`NATIVE_DIR`].
pub const TARGET_DIR: &str = "target";

/// Runtime-facing module that the host loads.
pub const STAGED_ARTIFACT: &str = "index.node";

/// Program used to build the crate.
pub const CARGO: &str = "cargo";

/// Program queried for the runtime's module ABI version.
pub const NODE: &str = "node";

/// Injected into cargo's environment with the target module ABI version.
pub const ABI_ENV_VAR: &str = "NEON_NODE_ABI";

/// Architecture override consulted on Windows (set by npm).
pub const ARCH_OVERRIDE_ENV_VAR: &str = "npm_config_arch";
