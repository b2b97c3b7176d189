use crate::model::SocketAddress;

/// Parse one lsof address token into host, port and state.
///
/// Accepted shapes include `*:5000`, `127.0.0.1:5000`, `[::1]:8080`,
/// `10.0.0.2:5000->10.0.0.9:41000 (ESTABLISHED)` and the empty string.
/// Only the local side of a connection is kept. Malformed input yields an
/// all-absent address instead of an error.
pub fn parse_address(token: &str) -> SocketAddress {
    let token = token.trim();
    if token.is_empty() {
        return SocketAddress::default();
    }

    let (endpoint, state) = split_state(token);
    let local = match endpoint.split_once("->") {
        Some((local, _remote)) => local.trim(),
        None => endpoint,
    };

    match split_host_port(local) {
        Some((host, port)) => SocketAddress {
            host: normalize(host),
            port: normalize(port),
            state,
        },
        None => SocketAddress::default(),
    }
}

/// Strip a trailing `(STATE)` suffix from the full token.
fn split_state(token: &str) -> (&str, Option<String>) {
    if let Some(body) = token.strip_suffix(')') {
        if let Some(open) = body.rfind('(') {
            let state = body[open + 1..].trim();
            let rest = body[..open].trim_end();
            return (rest, normalize(state));
        }
    }
    (token, None)
}

/// Split the local endpoint into `(host, port)`.
///
/// Returns `None` only for an unterminated IPv6 bracket.
fn split_host_port(local: &str) -> Option<(&str, &str)> {
    if let Some(rest) = local.strip_prefix('[') {
        let close = rest.find(']')?;
        let host = &rest[..close];
        let port = rest[close + 1..].strip_prefix(':').unwrap_or("");
        return Some((host, port));
    }

    match local.rsplit_once(':') {
        Some((host, port)) => Some((host, port)),
        None => Some((local, "")),
    }
}

fn normalize(part: &str) -> Option<String> {
    let part = part.trim();
    if part.is_empty() || part == "*" {
        None
    } else {
        Some(part.to_string())
    }
}
