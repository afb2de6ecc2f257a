//! Integration tests for the launcher binary
//!
//! A stub wrapper script records its working directory and argument
//! vector, so these tests cover the delegation contract end to end:
//! argument order, working-directory resolution, runtime checks, and
//! exit-code passthrough.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

fn launcher_bin() -> &'static str {
    env!("CARGO_BIN_EXE_psmcp-launcher")
}

/// Write a stub wrapper that records cwd and args, then exits with
/// `$WRAPPER_EXIT` (default 0).
fn write_stub_wrapper(dir: &Path) -> PathBuf {
    let wrapper = dir.join("stub-wrapper");
    let script = "#!/bin/sh\n\
                  pwd > \"$STUB_OUT/cwd.txt\"\n\
                  printf '%s\\n' \"$@\" > \"$STUB_OUT/args.txt\"\n\
                  exit \"${WRAPPER_EXIT:-0}\"\n";
    fs::write(&wrapper, script).unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&wrapper, fs::Permissions::from_mode(0o755)).unwrap();
    }
    wrapper
}

fn make_runtime(dir: &Path) -> PathBuf {
    let runtime = dir.join("runtime");
    fs::create_dir_all(runtime.join("bin")).unwrap();
    runtime
}

struct Stub {
    tmp: TempDir,
    wrapper: PathBuf,
    runtime: PathBuf,
}

impl Stub {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let wrapper = write_stub_wrapper(tmp.path());
        let runtime = make_runtime(tmp.path());
        Self { tmp, wrapper, runtime }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(launcher_bin());
        cmd.arg("--wrapper")
            .arg(&self.wrapper)
            .arg("--runtime-dir")
            .arg(&self.runtime)
            .env("STUB_OUT", self.tmp.path());
        cmd
    }

    fn recorded_args(&self) -> Vec<String> {
        let content = fs::read_to_string(self.tmp.path().join("args.txt")).unwrap();
        content.lines().map(str::to_string).collect()
    }
}

#[test]
fn forwards_arguments_verbatim_after_flag_and_command() {
    let stub = Stub::new();

    let status = stub
        .command()
        .args(["--base-url", "http://localhost:8089", "secret token", "-v"])
        .status()
        .unwrap();

    assert!(status.success());
    assert_eq!(
        stub.recorded_args(),
        vec![
            "--log-dir",
            "logs",
            "patentsafe-mcp",
            "--base-url",
            "http://localhost:8089",
            "secret token",
            "-v",
        ]
    );
}

#[test]
fn bare_positionals_are_forwarded_after_the_fixed_command() {
    let stub = Stub::new();

    // Arguments that look like a command name still belong to the
    // delegated process, never to the launcher
    let status = stub
        .command()
        .args(["http://localhost:8089", "mytoken"])
        .status()
        .unwrap();

    assert!(status.success());
    assert_eq!(
        stub.recorded_args(),
        vec![
            "--log-dir",
            "logs",
            "patentsafe-mcp",
            "http://localhost:8089",
            "mytoken",
        ]
    );
}

#[test]
fn delegated_command_is_selected_by_flag() {
    let stub = Stub::new();

    let status = stub
        .command()
        .args(["--command", "other-server", "one", "two"])
        .status()
        .unwrap();

    assert!(status.success());
    assert_eq!(
        stub.recorded_args(),
        vec!["--log-dir", "logs", "other-server", "one", "two"]
    );
}

#[test]
fn working_directory_is_the_launcher_binary_directory() {
    let stub = Stub::new();

    let status = stub.command().status().unwrap();
    assert!(status.success());

    let cwd = fs::read_to_string(stub.tmp.path().join("cwd.txt")).unwrap();
    let expected = PathBuf::from(launcher_bin())
        .canonicalize()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf();
    assert_eq!(PathBuf::from(cwd.trim()).canonicalize().unwrap(), expected);
}

#[test]
fn exit_code_is_propagated_unchanged() {
    let stub = Stub::new();

    let status = stub.command().env("WRAPPER_EXIT", "3").status().unwrap();
    assert_eq!(status.code(), Some(3));

    let stub_ok = Stub::new();
    let status = stub_ok.command().env("WRAPPER_EXIT", "0").status().unwrap();
    assert_eq!(status.code(), Some(0));
}

#[test]
fn missing_runtime_fails_before_invoking_the_wrapper() {
    let tmp = TempDir::new().unwrap();
    let wrapper = write_stub_wrapper(tmp.path());

    let status = Command::new(launcher_bin())
        .arg("--wrapper")
        .arg(&wrapper)
        .arg("--runtime-dir")
        .arg(tmp.path().join("absent"))
        .env("STUB_OUT", tmp.path())
        .status()
        .unwrap();

    assert!(!status.success());
    // The wrapper never ran, so nothing was recorded
    assert!(!tmp.path().join("args.txt").exists());
}

#[test]
fn custom_log_dir_is_forwarded() {
    let stub = Stub::new();

    let status = stub
        .command()
        .args(["--log-dir", "/var/log/psmcp"])
        .status()
        .unwrap();

    assert!(status.success());
    let args = stub.recorded_args();
    assert_eq!(&args[..3], ["--log-dir", "/var/log/psmcp", "patentsafe-mcp"]);
}
