//! PatentSafe MCP launcher
//!
//! Resolves an explicit launch context (launcher directory, runtime
//! environment, wrapper executable, log directory) and delegates to the
//! `mcp-wrapper` binary with the caller's arguments forwarded verbatim.
//! The launcher itself never parses or interprets the forwarded arguments.

pub mod launch;
pub mod types;

pub use launch::LaunchContext;
pub use types::{LauncherError, LauncherResult};
