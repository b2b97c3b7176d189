use super::row::NO_PORT;
use super::socket::EnrichedSocketEntry;

/// All sockets owned by one `(command, pid, user)` identity.
#[derive(Debug, Clone)]
pub struct ProcessGroup {
    pub command: String,
    pub pid: u32,
    pub user: String,
    pub full_command: Option<String>,
    pub cwd: Option<String>,
    pub parent_pid: Option<u32>,
    /// Sockets in arrival order.
    pub sockets: Vec<EnrichedSocketEntry>,
    /// Unique ports of listening sockets, in insertion order.
    pub listening_ports: Vec<String>,
    /// `listening_ports` if any, else every unique port, else `[NO_PORT]`.
    pub process_ports: Vec<String>,
}

impl ProcessGroup {
    /// Start a group from its first socket, seeding the detail fields.
    pub fn seed(entry: EnrichedSocketEntry) -> Self {
        let mut group = Self {
            command: entry.socket.command.clone(),
            pid: entry.socket.pid,
            user: entry.socket.user.clone(),
            full_command: None,
            cwd: None,
            parent_pid: None,
            sockets: Vec::new(),
            listening_ports: Vec::new(),
            process_ports: Vec::new(),
        };
        group.absorb(entry);
        group
    }

    /// Append a socket and fill detail fields that are still empty.
    ///
    /// A field that already holds a value is never overwritten.
    pub fn absorb(&mut self, entry: EnrichedSocketEntry) {
        if self.full_command.is_none() {
            self.full_command = non_empty(entry.details.full_command.as_deref());
        }
        if self.cwd.is_none() {
            self.cwd = non_empty(entry.details.cwd.as_deref());
        }
        if self.parent_pid.is_none() {
            self.parent_pid = entry.details.parent_pid;
        }
        self.sockets.push(entry);
    }

    /// Compute `listening_ports` and `process_ports` from the sockets.
    pub fn derive_ports(&mut self) {
        self.listening_ports = unique_ports(self.sockets.iter().filter(|s| s.is_listening()));
        self.process_ports = if !self.listening_ports.is_empty() {
            self.listening_ports.clone()
        } else {
            let all = unique_ports(self.sockets.iter());
            if all.is_empty() {
                vec![NO_PORT.to_string()]
            } else {
                all
            }
        };
    }

    pub fn has_listeners(&self) -> bool {
        !self.listening_ports.is_empty()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn unique_ports<'a>(sockets: impl Iterator<Item = &'a EnrichedSocketEntry>) -> Vec<String> {
    let mut ports: Vec<String> = Vec::new();
    for port in sockets.filter_map(|s| s.port()) {
        if !ports.iter().any(|p| p == port) {
            ports.push(port.to_string());
        }
    }
    ports
}
