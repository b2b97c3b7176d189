use std::collections::HashMap;

use crate::model::{EnrichedSocketEntry, ProcessGroup};

/// Consolidate sockets into one group per `(command, pid, user)`.
///
/// Groups appear in the order their first socket arrived. Detail fields are
/// taken from the first socket that carries a non-empty value.
pub fn group(entries: impl IntoIterator<Item = EnrichedSocketEntry>) -> Vec<ProcessGroup> {
    let mut groups: Vec<ProcessGroup> = Vec::new();
    let mut index: HashMap<(String, u32, String), usize> = HashMap::new();

    for entry in entries {
        let key = (
            entry.socket.command.clone(),
            entry.socket.pid,
            entry.socket.user.clone(),
        );
        match index.get(&key) {
            Some(&i) => groups[i].absorb(entry),
            None => {
                index.insert(key, groups.len());
                groups.push(ProcessGroup::seed(entry));
            }
        }
    }

    for group in &mut groups {
        group.derive_ports();
    }
    groups
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{
        AddressFamily, ProcessDetails, Protocol, RawSocketRecord, SocketAddress, NO_PORT,
    };

    pub(crate) fn socket(
        command: &str,
        pid: u32,
        user: &str,
        port: Option<&str>,
        state: Option<&str>,
    ) -> EnrichedSocketEntry {
        EnrichedSocketEntry {
            socket: RawSocketRecord {
                command: command.to_string(),
                pid,
                user: user.to_string(),
                fd: None,
                protocol: Some(Protocol::Tcp),
                family: Some(AddressFamily::IPv4),
                address: SocketAddress {
                    host: None,
                    port: port.map(String::from),
                    state: state.map(String::from),
                },
                raw_address: format!("*:{}", port.unwrap_or("*")),
            },
            details: ProcessDetails::default(),
        }
    }

    fn with_details(
        mut entry: EnrichedSocketEntry,
        full_command: Option<&str>,
        cwd: Option<&str>,
        ppid: Option<u32>,
    ) -> EnrichedSocketEntry {
        entry.details = ProcessDetails {
            full_command: full_command.map(String::from),
            parent_pid: ppid,
            cwd: cwd.map(String::from),
        };
        entry
    }

    #[test]
    fn test_same_identity_collapses() {
        let groups = group(vec![
            socket("nginx", 100, "root", Some("80"), Some("LISTEN")),
            socket("nginx", 100, "root", Some("443"), Some("LISTEN")),
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].sockets.len(), 2);
        assert_eq!(groups[0].listening_ports, vec!["80", "443"]);
        assert_eq!(groups[0].process_ports, vec!["80", "443"]);
    }

    #[test]
    fn test_identity_includes_user_and_command() {
        let groups = group(vec![
            socket("nginx", 100, "root", Some("80"), Some("LISTEN")),
            socket("nginx", 100, "www", Some("80"), Some("LISTEN")),
            socket("nginx-w", 100, "root", Some("80"), Some("LISTEN")),
            socket("nginx", 101, "root", Some("80"), Some("LISTEN")),
        ]);
        assert_eq!(groups.len(), 4);
    }

    #[test]
    fn test_groups_keep_arrival_order() {
        let groups = group(vec![
            socket("b", 2, "u", Some("2"), None),
            socket("a", 1, "u", Some("1"), None),
            socket("b", 2, "u", Some("3"), None),
        ]);
        let pids: Vec<u32> = groups.iter().map(|g| g.pid).collect();
        assert_eq!(pids, vec![2, 1]);
    }

    #[test]
    fn test_listening_excludes_other_states() {
        let groups = group(vec![
            socket("node", 7, "dev", Some("3000"), Some("LISTEN")),
            socket("node", 7, "dev", Some("3000"), Some("ESTABLISHED")),
            socket("node", 7, "dev", Some("51234"), Some("ESTABLISHED")),
            socket("node", 7, "dev", Some("9229"), Some("listen")),
            socket("node", 7, "dev", Some("5353"), None),
        ]);
        assert_eq!(groups[0].listening_ports, vec!["3000", "9229"]);
        assert_eq!(groups[0].process_ports, vec!["3000", "9229"]);
    }

    #[test]
    fn test_no_listeners_falls_back_to_all_ports() {
        let groups = group(vec![
            socket("curl", 8, "dev", Some("50000"), Some("ESTABLISHED")),
            socket("curl", 8, "dev", Some("50001"), Some("CLOSE_WAIT")),
            socket("curl", 8, "dev", Some("50000"), Some("ESTABLISHED")),
        ]);
        assert!(groups[0].listening_ports.is_empty());
        assert_eq!(groups[0].process_ports, vec!["50000", "50001"]);
    }

    #[test]
    fn test_no_ports_uses_placeholder() {
        let groups = group(vec![socket("weird", 9, "dev", None, None)]);
        assert!(groups[0].listening_ports.is_empty());
        assert_eq!(groups[0].process_ports, vec![NO_PORT]);
    }

    #[test]
    fn test_details_first_wins() {
        let groups = group(vec![
            with_details(socket("app", 5, "u", Some("1"), None), None, Some(""), None),
            with_details(
                socket("app", 5, "u", Some("2"), None),
                Some("/opt/app --first"),
                Some("/srv/first"),
                Some(10),
            ),
            with_details(
                socket("app", 5, "u", Some("3"), None),
                Some("/opt/app --second"),
                Some("/srv/second"),
                Some(20),
            ),
        ]);
        let g = &groups[0];
        assert_eq!(g.full_command.as_deref(), Some("/opt/app --first"));
        assert_eq!(g.cwd.as_deref(), Some("/srv/first"));
        assert_eq!(g.parent_pid, Some(10));
    }

    #[test]
    fn test_empty_input() {
        assert!(group(Vec::new()).is_empty());
    }
}
