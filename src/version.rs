//! Harness version information.
//!
//! Taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time so the CLI and any report
//! headers agree on the same value.

/// The solver-oracle version string (for example, `0.1.0`).
pub const HARNESS_VERSION: &str = env!("CARGO_PKG_VERSION");
