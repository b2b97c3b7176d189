use crate::model::{DisplayRow, EnrichedSocketEntry, ProcessGroup, SortDirection};

/// Expand each group into one row per relevant port.
///
/// Listening ports are used when the group has any, otherwise every port the
/// process holds (or the placeholder when it holds none).
pub fn build_rows(groups: &[ProcessGroup]) -> Vec<DisplayRow> {
    let mut rows = Vec::new();
    for group in groups {
        let targets = if group.has_listeners() {
            &group.listening_ports
        } else {
            &group.process_ports
        };
        for port in targets {
            rows.push(build_row(group, port));
        }
    }
    rows
}

fn build_row(group: &ProcessGroup, port: &str) -> DisplayRow {
    let matching: Vec<EnrichedSocketEntry> = group
        .sockets
        .iter()
        .filter(|s| s.port() == Some(port))
        .cloned()
        .collect();
    let connections = if matching.is_empty() {
        group.sockets.clone()
    } else {
        matching
    };

    // Prefer the listening socket when describing the row.
    let primary = connections
        .iter()
        .find(|s| s.is_listening())
        .or_else(|| connections.first());

    DisplayRow {
        command: group.command.clone(),
        pid: group.pid,
        user: group.user.clone(),
        full_command: group.full_command.clone(),
        cwd: group.cwd.clone(),
        parent_pid: group.parent_pid,
        display_port: port.to_string(),
        protocol: primary.and_then(|s| s.socket.protocol.clone()),
        family: primary.and_then(|s| s.socket.family.clone()),
        process_ports: group.process_ports.clone(),
        sort_key: DisplayRow::port_sort_key(port),
        connections,
    }
}

/// Stable sort by port in `direction`, ties broken by command name.
///
/// Non-numeric ports carry an infinite key and stay last either way.
pub fn sort_rows(mut rows: Vec<DisplayRow>, direction: SortDirection) -> Vec<DisplayRow> {
    rows.sort_by(|a, b| {
        direction
            .orient(a.sort_key)
            .total_cmp(&direction.orient(b.sort_key))
            .then_with(|| a.command.cmp(&b.command))
    });
    rows
}
