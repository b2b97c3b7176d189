use std::path::PathBuf;

use clap::Parser;

use crate::cache::DEFAULT_CAPACITY;

#[derive(Parser, Debug)]
#[command(
    name = "portscout",
    version,
    about = "List TCP/UDP sockets per process and terminate their owners"
)]
pub struct CliArgs {
    /// Select by PID (comma-separated, prefix ^ to exclude)
    #[arg(short = 'p', value_name = "PID")]
    pub pid: Option<String>,

    /// Select by user (comma-separated, prefix ^ to exclude)
    #[arg(short = 'u', value_name = "USER")]
    pub user: Option<String>,

    /// Select by command name (prefix match, prefix ^ to exclude)
    #[arg(short = 'c', value_name = "CMD")]
    pub command: Option<String>,

    /// Select by port (comma-separated, prefix ^ to exclude)
    #[arg(long = "port", value_name = "PORT")]
    pub port: Option<String>,

    /// Only show processes with listening sockets
    #[arg(short = 'l', long = "listen")]
    pub listen: bool,

    /// Sort ports in descending order
    #[arg(long = "desc")]
    pub desc: bool,

    /// One line per socket instead of one per process and port
    #[arg(long = "raw")]
    pub raw: bool,

    /// JSON output
    #[arg(short = 'j', long = "json")]
    pub json: bool,

    /// Send SIGTERM to a process
    #[arg(short = 'k', long = "kill", value_name = "PID", conflicts_with = "force_kill")]
    pub kill: Option<u32>,

    /// Send SIGKILL to a process
    #[arg(short = 'K', long = "force-kill", value_name = "PID")]
    pub force_kill: Option<u32>,

    /// Do not ask for confirmation before signalling
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    /// Enter interactive TUI mode
    #[arg(short = 'I', long = "interactive", conflicts_with_all = ["kill", "force_kill", "json", "raw"])]
    pub interactive: bool,

    /// Path to lsof
    #[arg(long = "lsof", value_name = "PATH", env = "PORTSCOUT_LSOF")]
    pub lsof: Option<PathBuf>,

    /// Path to ps
    #[arg(long = "ps", value_name = "PATH", env = "PORTSCOUT_PS")]
    pub ps: Option<PathBuf>,

    /// Timeout for each external command, in seconds
    #[arg(long = "timeout", value_name = "SECONDS", env = "PORTSCOUT_TIMEOUT", default_value_t = 5)]
    pub timeout: u64,

    /// Maximum number of processes kept in the detail cache
    #[arg(long = "cache-size", value_name = "N", default_value_t = DEFAULT_CAPACITY)]
    pub cache_size: usize,

    /// Verbose logging (repeat for more)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CliArgs {
    /// The PID and signal requested by `-k`/`-K`, if any.
    pub fn kill_request(&self) -> Option<(u32, crate::signal::SignalKind)> {
        use crate::signal::SignalKind;
        match (self.kill, self.force_kill) {
            (_, Some(pid)) => Some((pid, SignalKind::Kill)),
            (Some(pid), None) => Some((pid, SignalKind::Terminate)),
            (None, None) => None,
        }
    }

    pub fn sort_direction(&self) -> crate::model::SortDirection {
        if self.desc {
            crate::model::SortDirection::Descending
        } else {
            crate::model::SortDirection::Ascending
        }
    }
}
