//! Parser for lsof field output (`-F`).
//!
//! Each line (or NUL-separated chunk) carries one field whose first character
//! names it: `p` PID, `c` command, `L` login, `u` UID, `f` descriptor,
//! `t` type, `P` protocol, `n` address, `T` TCP info. Process fields are
//! shared by every socket that follows them until the next process.

use crate::model::{AddressFamily, Protocol, RawSocketRecord};

use super::address::parse_address;

/// Fields identifying the owning process.
#[derive(Debug, Default, Clone)]
struct ProcessFields<'a> {
    pid: Option<&'a str>,
    command: Option<&'a str>,
    login: Option<&'a str>,
    uid: Option<&'a str>,
}

impl ProcessFields<'_> {
    fn is_empty(&self) -> bool {
        self.pid.is_none() && self.command.is_none() && self.login.is_none() && self.uid.is_none()
    }
}

/// Fields describing one socket.
#[derive(Debug, Default, Clone)]
struct SocketFields<'a> {
    fd: Option<&'a str>,
    family: Option<&'a str>,
    protocol: Option<&'a str>,
    name: Option<&'a str>,
    state: Option<&'a str>,
}

impl SocketFields<'_> {
    fn is_empty(&self) -> bool {
        self.fd.is_none()
            && self.family.is_none()
            && self.protocol.is_none()
            && self.name.is_none()
            && self.state.is_none()
    }
}

/// One recognised field line.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Field<'a> {
    Pid(&'a str),
    Command(&'a str),
    Login(&'a str),
    Uid(&'a str),
    Fd(&'a str),
    Family(&'a str),
    Protocol(&'a str),
    Name(&'a str),
    State(&'a str),
    Blank,
    Ignored,
}

fn classify(line: &str) -> Field<'_> {
    let line = line.trim();
    let mut chars = line.chars();
    let Some(tag) = chars.next() else {
        return Field::Blank;
    };
    let value = chars.as_str().trim();
    match tag {
        'p' => Field::Pid(value),
        'c' => Field::Command(value),
        'L' => Field::Login(value),
        'u' => Field::Uid(value),
        'f' => Field::Fd(value),
        't' => Field::Family(value),
        'P' => Field::Protocol(value),
        'n' => Field::Name(value),
        'T' => match value.strip_prefix("ST=") {
            Some(state) => Field::State(state.trim()),
            None => Field::Ignored,
        },
        _ => Field::Ignored,
    }
}

/// Lazy, single-pass iterator over the socket records in lsof field output.
///
/// Groups without a numeric PID or without an address are skipped.
pub struct SocketRecords<'a> {
    lines: std::str::Split<'a, char>,
    chunks: Option<std::str::Split<'a, char>>,
    process: ProcessFields<'a>,
    socket: SocketFields<'a>,
    finished: bool,
    resolve_uid: fn(&str) -> Option<String>,
}

/// Iterate over the socket records in `text`.
pub fn parse_records(text: &str) -> SocketRecords<'_> {
    SocketRecords::new(text, resolve_uid)
}

impl<'a> SocketRecords<'a> {
    fn new(text: &'a str, resolve_uid: fn(&str) -> Option<String>) -> Self {
        Self {
            lines: text.split('\n'),
            chunks: None,
            process: ProcessFields::default(),
            socket: SocketFields::default(),
            finished: false,
            resolve_uid,
        }
    }

    /// Close the pending socket, returning its record if it is complete.
    fn take_socket(&mut self) -> Option<RawSocketRecord> {
        if self.socket.is_empty() {
            return None;
        }
        let socket = std::mem::take(&mut self.socket);
        build_record(&self.process, &socket, self.resolve_uid)
    }

    /// Close both the pending socket and the current process.
    fn take_group(&mut self) -> Option<RawSocketRecord> {
        let record = self.take_socket();
        self.process = ProcessFields::default();
        record
    }

    /// Apply one field, returning a record when the field closes one.
    fn apply(&mut self, field: Field<'a>) -> Option<RawSocketRecord> {
        match field {
            Field::Blank => {
                if self.process.is_empty() && self.socket.is_empty() {
                    None
                } else {
                    self.take_group()
                }
            }
            Field::Ignored => None,
            Field::Pid(v) => {
                let out = if self.process.pid.is_some() { self.take_group() } else { None };
                self.process.pid = Some(v);
                out
            }
            Field::Command(v) => {
                let out = if self.process.command.is_some() { self.take_group() } else { None };
                self.process.command = Some(v);
                out
            }
            Field::Login(v) => {
                self.process.login = Some(v);
                None
            }
            Field::Uid(v) => {
                self.process.uid = Some(v);
                None
            }
            Field::Fd(v) => {
                let out = self.take_socket();
                self.socket.fd = Some(v);
                out
            }
            Field::Family(v) => self.set_socket_field(v, |s| &mut s.family),
            Field::Protocol(v) => self.set_socket_field(v, |s| &mut s.protocol),
            Field::Name(v) => self.set_socket_field(v, |s| &mut s.name),
            Field::State(v) => self.set_socket_field(v, |s| &mut s.state),
        }
    }

    /// Set a socket-level field; a repeated field starts the next socket.
    fn set_socket_field(
        &mut self,
        value: &'a str,
        slot: for<'s> fn(&'s mut SocketFields<'a>) -> &'s mut Option<&'a str>,
    ) -> Option<RawSocketRecord> {
        let out = if slot(&mut self.socket).is_some() {
            self.take_socket()
        } else {
            None
        };
        *slot(&mut self.socket) = Some(value);
        out
    }
}

impl Iterator for SocketRecords<'_> {
    type Item = RawSocketRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            // Fields of `-F0` output share a line, separated by NUL.
            if let Some(chunk) = self.chunks.as_mut().and_then(Iterator::next) {
                if chunk.trim().is_empty() {
                    continue;
                }
                if let Some(record) = self.apply(classify(chunk)) {
                    return Some(record);
                }
                continue;
            }
            self.chunks = None;

            match self.lines.next() {
                Some(line) if line.trim().is_empty() => {
                    if let Some(record) = self.apply(Field::Blank) {
                        return Some(record);
                    }
                }
                Some(line) => self.chunks = Some(line.split('\0')),
                None => {
                    self.finished = true;
                    return self.take_group();
                }
            }
        }
    }
}

/// Turn one closed group of fields into a record, or `None` if it carries no
/// usable socket.
fn build_record(
    process: &ProcessFields<'_>,
    socket: &SocketFields<'_>,
    resolve_uid: fn(&str) -> Option<String>,
) -> Option<RawSocketRecord> {
    let Some(pid) = process.pid.and_then(|p| p.parse::<u32>().ok()) else {
        log::debug!("dropping socket record without numeric PID: {:?}", process.pid);
        return None;
    };
    let raw_address = match socket.name {
        Some(name) if !name.is_empty() => name,
        _ => {
            log::debug!("dropping socket record for PID {} without address", pid);
            return None;
        }
    };

    let user = match (process.login, process.uid) {
        (Some(login), _) if !login.is_empty() => login.to_string(),
        (_, Some(uid)) => resolve_uid(uid).unwrap_or_else(|| uid.to_string()),
        _ => String::new(),
    };

    let mut address = parse_address(raw_address);
    if let Some(state) = socket.state.filter(|s| !s.is_empty()) {
        address.state = Some(state.to_string());
    }

    Some(RawSocketRecord {
        command: process.command.unwrap_or_default().to_string(),
        pid,
        user,
        fd: socket.fd.filter(|f| !f.is_empty()).map(str::to_string),
        protocol: socket
            .protocol
            .filter(|p| !p.is_empty())
            .map(Protocol::from_field),
        family: socket
            .family
            .filter(|t| !t.is_empty())
            .map(AddressFamily::from_field),
        address,
        raw_address: raw_address.to_string(),
    })
}

/// Resolve a numeric UID to a login name.
fn resolve_uid(uid: &str) -> Option<String> {
    let uid: u32 = uid.parse().ok()?;
    users::get_user_by_uid(uid).map(|u| u.name().to_string_lossy().into_owned())
}
