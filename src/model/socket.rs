use std::fmt;

use serde::{Serialize, Serializer};

/// Local endpoint of a socket as reported by the listing utility.
///
/// `*` and empty components are normalised to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SocketAddress {
    pub host: Option<String>,
    pub port: Option<String>,
    pub state: Option<String>,
}

impl SocketAddress {
    /// Whether the socket state marks a listening socket.
    ///
    /// Matches `listen` anywhere in the state, ignoring case. A missing state
    /// is never listening.
    pub fn is_listening(&self) -> bool {
        self.state
            .as_deref()
            .map(|s| s.to_ascii_lowercase().contains("listen"))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Protocol {
    Tcp,
    Udp,
    Other(String),
}

impl Protocol {
    pub fn from_field(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "TCP" => Protocol::Tcp,
            "UDP" => Protocol::Udp,
            _ => Protocol::Other(s.to_string()),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "TCP"),
            Protocol::Udp => write!(f, "UDP"),
            Protocol::Other(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for Protocol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressFamily {
    IPv4,
    IPv6,
    Other(String),
}

impl AddressFamily {
    pub fn from_field(s: &str) -> Self {
        match s {
            "IPv4" => AddressFamily::IPv4,
            "IPv6" => AddressFamily::IPv6,
            _ => AddressFamily::Other(s.to_string()),
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::IPv4 => write!(f, "IPv4"),
            AddressFamily::IPv6 => write!(f, "IPv6"),
            AddressFamily::Other(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for AddressFamily {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One socket as reported by the listing utility, before enrichment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawSocketRecord {
    pub command: String,
    pub pid: u32,
    pub user: String,
    pub fd: Option<String>,
    pub protocol: Option<Protocol>,
    #[serde(rename = "type")]
    pub family: Option<AddressFamily>,
    #[serde(flatten)]
    pub address: SocketAddress,
    #[serde(rename = "address")]
    pub raw_address: String,
}

/// Per-PID attributes looked up through the process-inspection commands.
///
/// A `None` field means the lookup failed or produced nothing usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessDetails {
    pub full_command: Option<String>,
    #[serde(rename = "ppid")]
    pub parent_pid: Option<u32>,
    pub cwd: Option<String>,
}

/// A socket record joined with the details of its owning process.
///
/// Serialises to the flat wire shape consumed by the presentation layer:
/// `command, pid, user, protocol, type, host, port, state, address,
/// full_command, cwd, ppid`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedSocketEntry {
    #[serde(flatten)]
    pub socket: RawSocketRecord,
    #[serde(flatten)]
    pub details: ProcessDetails,
}

impl EnrichedSocketEntry {
    pub fn port(&self) -> Option<&str> {
        self.socket.address.port.as_deref()
    }

    pub fn is_listening(&self) -> bool {
        self.socket.address.is_listening()
    }
}

/// Point-in-time result of one collection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub ports: Vec<EnrichedSocketEntry>,
    pub count: usize,
}

impl Snapshot {
    pub fn new(ports: Vec<EnrichedSocketEntry>) -> Self {
        let count = ports.len();
        Self { ports, count }
    }
}
