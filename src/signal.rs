use std::fmt;

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    /// Polite shutdown (SIGTERM).
    Terminate,
    /// Immediate termination (SIGKILL).
    Kill,
}

impl SignalKind {
    fn signal(self) -> Signal {
        match self {
            SignalKind::Terminate => Signal::SIGTERM,
            SignalKind::Kill => Signal::SIGKILL,
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signal().as_str())
    }
}

/// Result of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KillOutcome {
    Sent,
    NotFound,
    Forbidden,
    Unexpected(String),
}

impl KillOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            KillOutcome::Sent => "sent",
            KillOutcome::NotFound => "not_found",
            KillOutcome::Forbidden => "forbidden",
            KillOutcome::Unexpected(_) => "error",
        }
    }

    /// Process exit status for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            KillOutcome::Sent => 0,
            KillOutcome::Unexpected(_) => 1,
            KillOutcome::NotFound => 3,
            KillOutcome::Forbidden => 4,
        }
    }

    fn from_errno(errno: Errno) -> Self {
        match errno {
            Errno::ESRCH => KillOutcome::NotFound,
            Errno::EPERM => KillOutcome::Forbidden,
            other => KillOutcome::Unexpected(other.desc().to_string()),
        }
    }
}

/// `{outcome, message}` as reported to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct KillReport {
    pub pid: u32,
    pub outcome: &'static str,
    pub message: String,
    #[serde(skip)]
    pub exit_code: i32,
}

impl KillReport {
    pub fn new(pid: u32, kind: SignalKind, outcome: &KillOutcome) -> Self {
        let message = match outcome {
            KillOutcome::Sent => format!("Sent {} to process {}.", kind, pid),
            KillOutcome::NotFound => format!("Process {} was not found.", pid),
            KillOutcome::Forbidden => {
                format!("Insufficient permissions to signal process {}.", pid)
            }
            KillOutcome::Unexpected(detail) => {
                format!("Failed to signal process {}: {}", pid, detail)
            }
        };
        Self {
            pid,
            outcome: outcome.label(),
            message,
            exit_code: outcome.exit_code(),
        }
    }
}

/// Deliver `kind` to `pid` without waiting for the process to exit.
pub fn send(pid: u32, kind: SignalKind) -> KillOutcome {
    // 0 and anything past i32::MAX would address a process group.
    let raw = match i32::try_from(pid) {
        Ok(raw) if raw > 0 => raw,
        _ => return KillOutcome::Unexpected(format!("invalid PID {}", pid)),
    };

    match kill(Pid::from_raw(raw), kind.signal()) {
        Ok(()) => {
            log::info!("sent {} to PID {}", kind, pid);
            KillOutcome::Sent
        }
        Err(errno) => {
            log::warn!("sending {} to PID {} failed: {}", kind, pid, errno);
            KillOutcome::from_errno(errno)
        }
    }
}
