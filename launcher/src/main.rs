//! PatentSafe MCP launcher binary
//!
//! Thin entrypoint: parse flags, resolve the launch context, delegate to
//! the wrapper, and exit with the delegated process's exit code unchanged.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use psmcp_launcher::launch::{LaunchContext, LaunchOptions};

#[derive(Parser)]
#[command(name = "psmcp-launcher")]
#[command(about = "Launch the PatentSafe MCP server through the log wrapper")]
struct Cli {
    /// Path to the wrapper executable (default: mcp-wrapper next to the
    /// launcher, then PATH)
    #[arg(long, env = "PSMCP_WRAPPER")]
    wrapper: Option<PathBuf>,

    /// Runtime environment directory (default: .venv next to the launcher)
    #[arg(long, env = "PSMCP_RUNTIME_DIR")]
    runtime_dir: Option<PathBuf>,

    /// Log directory passed to the wrapper
    #[arg(long, env = "PSMCP_LOG_DIR", default_value = "logs")]
    log_dir: PathBuf,

    /// Delegated command name
    #[arg(long, env = "PSMCP_COMMAND", default_value = "patentsafe-mcp")]
    command: String,

    /// Arguments forwarded verbatim to the delegated command. Every
    /// positional lands here; the launcher never interprets them.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<OsString>,
}

fn main() -> Result<()> {
    // Logs go to stderr; the child's stdout may carry the MCP protocol
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .init();

    let cli = Cli::parse();

    let context = LaunchContext::resolve(LaunchOptions {
        wrapper: cli.wrapper,
        runtime_dir: cli.runtime_dir,
        log_dir: cli.log_dir,
        command: cli.command,
        args: cli.args,
    })?;

    let code = context.run()?;
    std::process::exit(code);
}
