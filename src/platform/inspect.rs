use std::path::Path;

use super::{CommandRunner, ToolPaths};

/// Per-PID attribute lookups. Every method returns `None` instead of failing.
pub trait ProcessInspector: Send + Sync {
    fn full_command(&self, pid: u32) -> Option<String>;
    fn parent_pid(&self, pid: u32) -> Option<u32>;
    fn working_dir(&self, pid: u32) -> Option<String>;
}

/// Inspects processes with `ps` (command line, parent PID) and `lsof`
/// (working directory).
pub struct PsInspector<'a> {
    runner: &'a dyn CommandRunner,
    tools: &'a ToolPaths,
}

impl<'a> PsInspector<'a> {
    pub fn new(runner: &'a dyn CommandRunner, tools: &'a ToolPaths) -> Self {
        Self { runner, tools }
    }

    /// Run `program` and return its trimmed stdout when it succeeded with
    /// non-empty output.
    fn query(&self, program: Option<&Path>, args: &[&str]) -> Option<String> {
        let program = program?;
        match self.runner.run(program, args) {
            Ok(out) if out.success() => {
                let text = out.stdout.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            Ok(out) => {
                log::debug!(
                    "{} {:?} exited with {:?}: {}",
                    program.display(),
                    args,
                    out.status,
                    out.stderr.trim()
                );
                None
            }
            Err(e) => {
                log::debug!("{} {:?} failed: {}", program.display(), args, e);
                None
            }
        }
    }

    fn ps_field(&self, pid: u32, field: &str) -> Option<String> {
        let pid = pid.to_string();
        self.query(self.tools.ps.as_deref(), &["-p", &pid, "-o", field])
    }
}

impl ProcessInspector for PsInspector<'_> {
    fn full_command(&self, pid: u32) -> Option<String> {
        self.ps_field(pid, "command=")
    }

    fn parent_pid(&self, pid: u32) -> Option<u32> {
        parse_ppid(&self.ps_field(pid, "ppid=")?)
    }

    fn working_dir(&self, pid: u32) -> Option<String> {
        let pid = pid.to_string();
        let out = self.query(
            self.tools.lsof.as_deref(),
            &["-a", "-p", &pid, "-d", "cwd", "-Fn"],
        )?;
        parse_cwd(&out)
    }
}

/// A parent PID must be a plain unsigned integer.
fn parse_ppid(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// First `n` field of `lsof -Fn` output.
fn parse_cwd(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| line.strip_prefix('n'))
        .map(str::trim)
        .filter(|cwd| !cwd.is_empty())
        .map(str::to_string)
}
