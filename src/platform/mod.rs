use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use nix::unistd::{access, AccessFlags};

use crate::error::Result;

pub mod inspect;
mod system;

pub use inspect::{ProcessInspector, PsInspector};

/// Captured result of one external command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Exit code, or `None` when the child was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Runs external commands to completion.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &Path, args: &[&str]) -> Result<CommandOutput>;
}

/// Locations of the external utilities.
#[derive(Debug, Clone)]
pub struct ToolPaths {
    /// Port-listing utility; `None` when it could not be found.
    pub lsof: Option<PathBuf>,
    /// Process-inspection utility; `None` when it could not be found.
    pub ps: Option<PathBuf>,
}

impl ToolPaths {
    /// Resolve tool paths from explicit overrides, falling back to `PATH`.
    pub fn discover(lsof: Option<PathBuf>, ps: Option<PathBuf>) -> Self {
        let path_var = std::env::var_os("PATH");
        Self {
            lsof: resolve_tool("lsof", lsof, path_var.as_ref()),
            ps: resolve_tool("ps", ps, path_var.as_ref()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Upper bound for a single subprocess.
    pub timeout: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
        }
    }
}

pub fn create_runner(config: RunnerConfig) -> Result<Box<dyn CommandRunner>> {
    Ok(Box::new(system::SystemRunner::new(config)?))
}

fn resolve_tool(name: &str, explicit: Option<PathBuf>, path_var: Option<&OsString>) -> Option<PathBuf> {
    match explicit {
        Some(path) if path.components().count() > 1 => is_executable(&path).then_some(path),
        Some(path) => search_path(&path.to_string_lossy(), path_var),
        None => search_path(name, path_var),
    }
}

/// Find an executable named `name` in the directories of `path_var`.
fn search_path(name: &str, path_var: Option<&OsString>) -> Option<PathBuf> {
    let path_var = path_var?;
    let found = std::env::split_paths(path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate));
    if found.is_none() {
        log::debug!("{} not found on PATH", name);
    }
    found
}

fn is_executable(path: &Path) -> bool {
    path.is_file() && access(path, AccessFlags::X_OK).is_ok()
}
