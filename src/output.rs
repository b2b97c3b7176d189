use std::io::{self, Write};

use crate::cli::CliArgs;
use crate::model::{DisplayRow, EnrichedSocketEntry, Snapshot};
use crate::signal::KillReport;

/// Width of the COMMAND column.
const CMD_WIDTH: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// One line per process and port.
    Table,
    /// One line per socket.
    Raw,
    Json,
}

/// Formats rows, sockets and kill reports for the terminal.
pub struct OutputFormatter {
    pub mode: OutputMode,
    pub cmd_width: usize,
}

impl OutputFormatter {
    pub fn from_cli(args: &CliArgs) -> Self {
        let mode = if args.json {
            OutputMode::Json
        } else if args.raw {
            OutputMode::Raw
        } else {
            OutputMode::Table
        };
        OutputFormatter {
            mode,
            cmd_width: CMD_WIDTH,
        }
    }

    /// Write the listing in the configured mode. `rows` drives the table,
    /// `sockets` the raw and JSON forms.
    pub fn write_listing<W: Write>(
        &self,
        out: &mut W,
        rows: &[DisplayRow],
        sockets: &[EnrichedSocketEntry],
    ) -> io::Result<()> {
        match self.mode {
            OutputMode::Table => self.write_rows(out, rows),
            OutputMode::Raw => self.write_sockets(out, sockets),
            OutputMode::Json => write_json(out, &Snapshot::new(sockets.to_vec())),
        }
    }

    pub fn write_rows<W: Write>(&self, out: &mut W, rows: &[DisplayRow]) -> io::Result<()> {
        writeln!(
            out,
            "{:<6} {:<5} {:<5} {:>7} {:>7} {:<10} {} {:<12} {}",
            "PORT",
            "PROTO",
            "TYPE",
            "PID",
            "PPID",
            "USER",
            fit_str("COMMAND", self.cmd_width),
            "STATE",
            "CWD",
        )?;
        for row in rows {
            writeln!(
                out,
                "{:<6} {:<5} {:<5} {:>7} {:>7} {:<10} {} {:<12} {}",
                row.display_port,
                display_opt(row.protocol.as_ref()),
                display_opt(row.family.as_ref()),
                row.pid,
                display_opt(row.parent_pid.as_ref()),
                fit_str(&row.user, 10),
                fit_str(&row.command, self.cmd_width),
                row.state_summary(),
                row.cwd.as_deref().unwrap_or("-"),
            )?;
        }
        Ok(())
    }

    pub fn write_sockets<W: Write>(
        &self,
        out: &mut W,
        sockets: &[EnrichedSocketEntry],
    ) -> io::Result<()> {
        writeln!(
            out,
            "{} {:>7} {:<10} {:>4} {:<5} {:<5} {:<12} {}",
            fit_str("COMMAND", self.cmd_width),
            "PID",
            "USER",
            "FD",
            "PROTO",
            "TYPE",
            "STATE",
            "ADDRESS",
        )?;
        for entry in sockets {
            let s = &entry.socket;
            writeln!(
                out,
                "{} {:>7} {:<10} {:>4} {:<5} {:<5} {:<12} {}",
                fit_str(&s.command, self.cmd_width),
                s.pid,
                fit_str(&s.user, 10),
                s.fd.as_deref().unwrap_or("-"),
                display_opt(s.protocol.as_ref()),
                display_opt(s.family.as_ref()),
                s.address.state.as_deref().unwrap_or("-"),
                s.raw_address,
            )?;
        }
        Ok(())
    }

    pub fn write_kill<W: Write>(&self, out: &mut W, report: &KillReport) -> io::Result<()> {
        match self.mode {
            OutputMode::Json => write_json(out, report),
            OutputMode::Table | OutputMode::Raw => writeln!(out, "{}", report.message),
        }
    }
}

fn write_json<W: Write, T: serde::Serialize>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(io::Error::other)?;
    writeln!(out)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Truncate or pad a string to exactly `width` characters.
fn fit_str(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        s.chars().take(width).collect()
    } else {
        format!("{:<width$}", s, width = width)
    }
}

fn display_opt<T: std::fmt::Display>(value: Option<&T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
