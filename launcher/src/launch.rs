//! Launch context resolution and process delegation
//!
//! The original deployment relied on ambient shell state (`source
//! .venv/bin/activate` before exec). Here the environment is an explicit
//! object: the runtime directory is resolved up front and its `bin/` is
//! prepended to the child's PATH, so the delegated process sees the same
//! search path regardless of the caller's shell.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::types::{LauncherError, LauncherResult};

/// Name of the wrapper executable expected next to the launcher
pub const WRAPPER_NAME: &str = "mcp-wrapper";

/// Default runtime environment directory, relative to the launcher
pub const DEFAULT_RUNTIME_DIR: &str = ".venv";

/// Caller-supplied overrides before resolution
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Explicit wrapper executable path
    pub wrapper: Option<PathBuf>,
    /// Explicit runtime environment directory
    pub runtime_dir: Option<PathBuf>,
    /// Log directory handed to the wrapper via `--log-dir`
    pub log_dir: PathBuf,
    /// Delegated command name
    pub command: String,
    /// Arguments forwarded verbatim after the command name
    pub args: Vec<OsString>,
}

/// Fully resolved launch context
#[derive(Debug, Clone)]
pub struct LaunchContext {
    /// Directory containing the launcher executable
    pub launcher_dir: PathBuf,
    /// Runtime environment root
    pub runtime_dir: PathBuf,
    /// `bin/` of the runtime environment, prepended to the child's PATH
    pub runtime_bin: PathBuf,
    /// Resolved wrapper executable
    pub wrapper: PathBuf,
    /// Log directory handed to the wrapper
    pub log_dir: PathBuf,
    /// Delegated command name
    pub command: String,
    /// Forwarded arguments, untouched
    pub args: Vec<OsString>,
}

impl LaunchContext {
    /// Resolve the launch context from the launcher's own location.
    ///
    /// Changes the working directory to the directory containing the
    /// launcher executable so relative resources (runtime dir, log dir)
    /// resolve the same way no matter where the caller invoked us from.
    pub fn resolve(options: LaunchOptions) -> LauncherResult<Self> {
        let exe = env::current_exe()?.canonicalize()?;
        let launcher_dir = containing_dir(&exe)?;
        env::set_current_dir(&launcher_dir)?;
        Self::resolve_in(&launcher_dir, options)
    }

    /// Resolve against an explicit launcher directory.
    ///
    /// The runtime environment check happens here, before anything is
    /// spawned: a missing runtime aborts the launch outright.
    pub fn resolve_in(launcher_dir: &Path, options: LaunchOptions) -> LauncherResult<Self> {
        let runtime_dir = options
            .runtime_dir
            .unwrap_or_else(|| launcher_dir.join(DEFAULT_RUNTIME_DIR));
        let runtime_bin = runtime_dir.join("bin");
        if !runtime_bin.is_dir() {
            return Err(LauncherError::MissingRuntime(runtime_dir));
        }

        let wrapper = match options.wrapper {
            Some(path) => {
                if !is_executable(&path) {
                    return Err(LauncherError::MissingWrapper(path));
                }
                path
            }
            None => find_wrapper(launcher_dir)?,
        };

        Ok(Self {
            launcher_dir: launcher_dir.to_path_buf(),
            runtime_dir,
            runtime_bin,
            wrapper,
            log_dir: options.log_dir,
            command: options.command,
            args: options.args,
        })
    }

    /// Argument vector handed to the wrapper: the fixed log-dir flag, the
    /// delegated command name, then the caller's arguments in order.
    pub fn argv(&self) -> Vec<OsString> {
        let mut argv: Vec<OsString> = vec![
            OsString::from("--log-dir"),
            self.log_dir.clone().into_os_string(),
            OsString::from(&self.command),
        ];
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// PATH for the delegated process, with the runtime `bin/` first.
    fn child_path(&self) -> OsString {
        let mut entries = vec![self.runtime_bin.clone()];
        if let Some(existing) = env::var_os("PATH") {
            entries.extend(env::split_paths(&existing));
        }
        // Entries come from the filesystem and PATH itself, join cannot fail
        env::join_paths(entries).unwrap_or_else(|_| self.runtime_bin.clone().into_os_string())
    }

    /// Spawn the wrapper, block until it exits, and return its exit code.
    ///
    /// Stdio is inherited so the MCP protocol on stdout passes straight
    /// through; log capture is the wrapper's job (hence `--log-dir`).
    pub fn run(&self) -> LauncherResult<i32> {
        tracing::debug!(
            wrapper = %self.wrapper.display(),
            command = %self.command,
            forwarded = self.args.len(),
            "delegating"
        );

        let status = Command::new(&self.wrapper)
            .args(self.argv())
            .env("PATH", self.child_path())
            .env("VIRTUAL_ENV", &self.runtime_dir)
            .status()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                    LauncherError::MissingWrapper(self.wrapper.clone())
                }
                _ => LauncherError::Spawn {
                    command: self.wrapper.display().to_string(),
                    source: e,
                },
            })?;

        // A signal death has no code; surface it as a plain failure
        Ok(status.code().unwrap_or(1))
    }
}

/// Directory holding the launcher executable. A rootless path here is an
/// IO-level anomaly, not a missing dependency.
fn containing_dir(exe: &Path) -> LauncherResult<PathBuf> {
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        LauncherError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no containing directory for {}", exe.display()),
        ))
    })
}

/// Locate the wrapper: next to the launcher first, then on PATH.
fn find_wrapper(launcher_dir: &Path) -> LauncherResult<PathBuf> {
    let local = launcher_dir.join(WRAPPER_NAME);
    if is_executable(&local) {
        return Ok(local);
    }

    if let Some(path_var) = env::var_os("PATH") {
        for dir in env::split_paths(&path_var) {
            let candidate = dir.join(WRAPPER_NAME);
            if is_executable(&candidate) {
                return Ok(candidate);
            }
        }
    }

    Err(LauncherError::MissingWrapper(local))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
