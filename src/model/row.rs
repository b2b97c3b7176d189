use std::fmt;

use serde::Serialize;

use super::socket::{AddressFamily, EnrichedSocketEntry, Protocol};

/// Placeholder port for a process that reported no port at all.
pub const NO_PORT: &str = "—";

/// One table row: a process group paired with one of its ports.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayRow {
    pub command: String,
    pub pid: u32,
    pub user: String,
    pub full_command: Option<String>,
    pub cwd: Option<String>,
    #[serde(rename = "ppid")]
    pub parent_pid: Option<u32>,
    #[serde(rename = "port")]
    pub display_port: String,
    pub protocol: Option<Protocol>,
    pub family: Option<AddressFamily>,
    /// Sockets on `display_port`, or every socket of the group when none match.
    pub connections: Vec<EnrichedSocketEntry>,
    /// Every port this process holds, for kill confirmations.
    pub process_ports: Vec<String>,
    #[serde(skip)]
    pub sort_key: f64,
}

impl DisplayRow {
    /// Numeric sort key for a port: the port number, or `+inf` when the
    /// port is not numeric.
    pub fn port_sort_key(port: &str) -> f64 {
        port.trim()
            .parse::<u32>()
            .map(f64::from)
            .unwrap_or(f64::INFINITY)
    }

    pub fn state_summary(&self) -> String {
        let mut states: Vec<&str> = Vec::new();
        for state in self
            .connections
            .iter()
            .filter_map(|c| c.socket.address.state.as_deref())
        {
            if !states.contains(&state) {
                states.push(state);
            }
        }
        states.join(",")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Orient a finite key for this direction. Infinite keys stay maximal so
    /// non-numeric ports trail in both directions.
    pub fn orient(self, key: f64) -> f64 {
        match self {
            SortDirection::Descending if key.is_finite() => -key,
            _ => key,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}
