use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tokio::runtime::{Builder, Runtime};

use super::{CommandOutput, CommandRunner, RunnerConfig};
use crate::error::{Result, ScoutError};

/// Runs commands on a private current-thread runtime so each call can be
/// bounded by a timeout. A child that outlives the timeout is killed.
pub struct SystemRunner {
    runtime: Runtime,
    config: RunnerConfig,
}

impl SystemRunner {
    pub fn new(config: RunnerConfig) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { runtime, config })
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[&str]) -> Result<CommandOutput> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let timeout = self.config.timeout;
        let output = self
            .runtime
            .block_on(async { tokio::time::timeout(timeout, command.output()).await })
            .map_err(|_| {
                log::warn!("{} {:?} timed out after {:?}", program.display(), args, timeout);
                ScoutError::Timeout {
                    program: program.display().to_string(),
                    timeout,
                }
            })??;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
