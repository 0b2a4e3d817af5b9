use crate::command::{ExitCode, Outcome, Stdout};
use crate::io_adapters::describe_io_error;
use anyhow::{Context, Result, anyhow};
use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tracing::debug;

/// A program found on disk, ready to be spawned.
pub struct ExternalCommand {
    /// Name as typed; becomes `argv[0]` of the child.
    name: String,
    path: PathBuf,
    args: Vec<String>,
}

impl ExternalCommand {
    pub fn new(name: impl Into<String>, path: PathBuf, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            path,
            args,
        }
    }

    /// Spawns the program and blocks until it terminates.
    ///
    /// Standard input and standard error are inherited; standard output goes to
    /// `stdout`. A nonzero status terminates the shell with that same status.
    pub fn run(self, stdout: Box<dyn Stdout>) -> Result<Outcome> {
        let mut cmd = std::process::Command::new(&self.path);
        cmd.args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(stdout.stdio())
            .stderr(Stdio::inherit());
        set_arg0(&mut cmd, &self.name);

        debug!(program = %self.path.display(), args = ?self.args, "spawning");
        let mut child = cmd
            .spawn()
            .map_err(|e| anyhow!("{}: {}", self.name, describe_io_error(&e)))?;
        let exit_status = child
            .wait()
            .with_context(|| format!("{}: failed to wait for process", self.name))?;

        let code = match exit_status.code() {
            Some(x) => x,
            None => terminated_by_signal(exit_status),
        };
        debug!(name = %self.name, code, "process finished");
        Ok(status_outcome(code))
    }
}

/// Maps a child's exit status to what the shell does next.
pub fn status_outcome(code: ExitCode) -> Outcome {
    if code == 0 {
        Outcome::Continue(0)
    } else {
        Outcome::Terminate(code)
    }
}

#[cfg(unix)]
fn set_arg0(cmd: &mut std::process::Command, name: &str) {
    use std::os::unix::process::CommandExt;
    cmd.arg0(name);
}

#[cfg(not(unix))]
fn set_arg0(_cmd: &mut std::process::Command, _name: &str) {}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    1
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returns it if it exists.
/// - Relative with multiple components (e.g., `bin/sh` or `./foo`): returns it if it exists.
/// - Only executable regular files count; on Unix an execute bit must be set.
/// - Single path component (no separators): search each directory in `search_paths` (PATH)
///   and return the first executable match. Empty PATH entries are skipped.
/// - Empty path: returns `None`.
///
/// Returns either a borrowed reference to the provided `path` or an owned `PathBuf`
/// when the result is discovered via PATH lookup.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let mut components = path.components();
    let first = components.next();
    let second = components.next();
    match (first, second) {
        // Empty path -> not found
        (None, None) => None,
        (Some(x), None) => find_in_path(search_paths, x.as_os_str()).map(Cow::Owned),
        // Multiple components -> relative to current dir
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(cmd))
        .find(|path| is_executable(path))
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if is_executable(path) { Some(path) } else { None }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
