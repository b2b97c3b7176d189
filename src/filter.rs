use crate::cli::CliArgs;
use crate::error::{Result, ScoutError};
use crate::model::{DisplayRow, EnrichedSocketEntry, ProcessGroup};

/// Row selection built from CLI arguments. Active filters are ANDed.
#[derive(Debug, Default)]
pub struct FilterConfig {
    pub pids: Option<Selection<u32>>,
    pub users: Option<Selection<String>>,
    pub commands: Option<Selection<String>>,
    pub ports: Option<Selection<String>>,
    pub listen_only: bool,
}

/// Include/exclude lists. An empty include list admits everything not
/// excluded.
#[derive(Debug, PartialEq)]
pub struct Selection<T> {
    pub include: Vec<T>,
    pub exclude: Vec<T>,
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl<T> Selection<T> {
    fn admits(&self, pred: impl Fn(&T) -> bool) -> bool {
        if self.exclude.iter().any(&pred) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(&pred)
    }
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Parse a comma-separated list where a `^` prefix marks an exclusion.
///
/// Examples: "1234,5678", "^1234", "root,^nobody"
fn parse_selection<T>(s: &str, parse: impl Fn(&str) -> Result<T>) -> Result<Selection<T>> {
    let mut selection = Selection::default();
    for token in s.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if let Some(rest) = token.strip_prefix('^') {
            selection.exclude.push(parse(rest.trim())?);
        } else {
            selection.include.push(parse(token)?);
        }
    }
    Ok(selection)
}

fn parse_pid(s: &str) -> Result<u32> {
    s.parse()
        .map_err(|_| ScoutError::Parse(format!("invalid PID: {}", s)))
}

fn parse_port(s: &str) -> Result<String> {
    match s.parse::<u16>() {
        Ok(_) => Ok(s.to_string()),
        Err(_) => Err(ScoutError::Parse(format!("invalid port: {}", s))),
    }
}

fn parse_name(s: &str) -> Result<String> {
    Ok(s.to_string())
}

impl FilterConfig {
    /// Build a `FilterConfig` from parsed CLI arguments.
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        Ok(FilterConfig {
            pids: args.pid.as_deref().map(|s| parse_selection(s, parse_pid)).transpose()?,
            users: args.user.as_deref().map(|s| parse_selection(s, parse_name)).transpose()?,
            commands: args
                .command
                .as_deref()
                .map(|s| parse_selection(s, parse_name))
                .transpose()?,
            ports: args.port.as_deref().map(|s| parse_selection(s, parse_port)).transpose()?,
            listen_only: args.listen,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.pids.is_none()
            && self.users.is_none()
            && self.commands.is_none()
            && self.ports.is_none()
            && !self.listen_only
    }

    /// Check the process-level criteria (PID, user, command prefix, listening).
    pub fn matches_group(&self, group: &ProcessGroup) -> bool {
        if self.listen_only && !group.has_listeners() {
            return false;
        }
        let pid_ok = self.pids.as_ref().map_or(true, |f| f.admits(|p| *p == group.pid));
        let user_ok = self
            .users
            .as_ref()
            .map_or(true, |f| f.admits(|u| *u == group.user));
        let cmd_ok = self
            .commands
            .as_ref()
            .map_or(true, |f| f.admits(|c| group.command.starts_with(c.as_str())));
        pid_ok && user_ok && cmd_ok
    }

    /// Check the row-level criteria (port).
    pub fn matches_row(&self, row: &DisplayRow) -> bool {
        self.ports
            .as_ref()
            .map_or(true, |f| f.admits(|p| *p == row.display_port))
    }

    /// Port criterion applied to a single socket, for raw and JSON output.
    pub fn matches_socket(&self, entry: &EnrichedSocketEntry) -> bool {
        self.ports
            .as_ref()
            .map_or(true, |f| f.admits(|p| Some(p.as_str()) == entry.port()))
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
