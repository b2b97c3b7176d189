mod app;
mod cache;
mod cli;
mod collector;
mod error;
mod event;
mod filter;
mod grouping;
mod inventory;
mod model;
mod output;
mod parse;
mod platform;
mod rows;
mod signal;
mod ui;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use app::action::map_key_to_action;
use app::{Action, AppState};
use cache::ProcessInfoCache;
use cli::CliArgs;
use collector::PortCollector;
use error::ScoutError;
use event::{AppEvent, EventSource};
use filter::FilterConfig;
use inventory::{Inventory, RowSource};
use model::SortDirection;
use output::OutputFormatter;
use platform::{create_runner, RunnerConfig, ToolPaths};
use signal::{KillReport, SignalKind};

/// Exit status for a failed collection (missing tool, lsof failure).
const EXIT_COLLECTION: u8 = 2;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    let filter_config = match FilterConfig::from_cli(&args) {
        Ok(fc) => fc,
        Err(e) => {
            eprintln!("Error parsing filters: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if !filter_config.is_empty() {
        log::debug!("active filters: {:?}", filter_config);
    }

    let runner = match create_runner(RunnerConfig {
        timeout: Duration::from_secs(args.timeout),
    }) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let tools = ToolPaths::discover(args.lsof.clone(), args.ps.clone());
    log::debug!("using lsof={:?} ps={:?}", tools.lsof, tools.ps);
    let cache = ProcessInfoCache::new(args.cache_size);
    let inventory = Inventory::new(PortCollector::new(&*runner, &tools, &cache), &filter_config);
    let formatter = OutputFormatter::from_cli(&args);

    if args.interactive {
        return match run_tui(&inventory, args.sort_direction()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                ratatui::restore();
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    if let Some((pid, kind)) = args.kill_request() {
        return run_kill(&inventory, &formatter, pid, kind, args.yes);
    }

    match run_list(&inventory, &formatter, args.sort_direction()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_status(&e))
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn exit_status(err: &ScoutError) -> u8 {
    match err {
        ScoutError::ToolNotFound(_) | ScoutError::CollectionFailed(_) => EXIT_COLLECTION,
        _ => 1,
    }
}

fn run_list(
    inventory: &Inventory<'_>,
    formatter: &OutputFormatter,
    direction: SortDirection,
) -> error::Result<()> {
    let listing = inventory.listing()?;
    let rows = rows::sort_rows(listing.rows, direction);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    formatter.write_listing(&mut out, &rows, &listing.sockets)?;
    out.flush()?;
    Ok(())
}

fn run_kill(
    inventory: &Inventory<'_>,
    formatter: &OutputFormatter,
    pid: u32,
    kind: SignalKind,
    assume_yes: bool,
) -> ExitCode {
    // The port listing is informational; signalling still works without lsof.
    let ports = match inventory.ports_of(pid) {
        Ok(ports) => ports,
        Err(e) => {
            log::warn!("could not list ports of PID {}: {}", pid, e);
            Vec::new()
        }
    };

    if ports.is_empty() {
        eprintln!("PID {} holds no TCP/UDP ports.", pid);
    } else {
        eprintln!("PID {} holds ports: {}", pid, ports.join(", "));
    }

    if !assume_yes && !confirm(&format!("Send {} to process {}? [y/N] ", kind, pid)) {
        eprintln!("Aborted.");
        return ExitCode::FAILURE;
    }

    let outcome = signal::send(pid, kind);
    let report = KillReport::new(pid, kind, &outcome);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = formatter.write_kill(&mut out, &report) {
        eprintln!("Error: {}", e);
    }
    ExitCode::from(report.exit_code as u8)
}

/// Ask on stderr and read one answer from stdin. Anything but yes declines.
fn confirm(prompt: &str) -> bool {
    eprint!("{}", prompt);
    let _ = io::stderr().flush();
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

fn run_tui(source: &dyn RowSource, direction: SortDirection) -> io::Result<()> {
    let mut state = match source.fetch_rows() {
        Ok(rows) => AppState::new(rows, direction),
        Err(e) => {
            let mut state = AppState::new(Vec::new(), direction);
            state.status = Some(e.to_string());
            state
        }
    };
    let events = EventSource::new(Duration::from_millis(100));

    let mut terminal = ratatui::init();

    loop {
        terminal.draw(|frame| {
            ui::render(frame, &mut state);
        })?;

        match events.next()? {
            AppEvent::Key(key) => {
                let search_empty = state.search_input.is_empty();
                if let Some(action) = map_key_to_action(key, state.mode, search_empty) {
                    dispatch_action(&mut state, action, source);
                }
            }
            AppEvent::Redraw | AppEvent::Idle => {}
        }

        if state.should_quit {
            break;
        }
    }

    ratatui::restore();
    Ok(())
}

fn dispatch_action(state: &mut AppState, action: Action, source: &dyn RowSource) {
    match action {
        Action::Quit => {
            state.should_quit = true;
        }
        Action::SearchInput(c) => {
            state.search_input.push(c);
            state.update_filter();
        }
        Action::SearchBackspace => {
            state.search_input.pop();
            state.update_filter();
        }
        Action::SearchClear => {
            state.search_input.clear();
            state.update_filter();
        }
        Action::MoveUp => state.move_up(),
        Action::MoveDown => state.move_down(),
        Action::PageUp => state.page_up(),
        Action::PageDown => state.page_down(),
        Action::Select => state.select_current(),
        Action::Back => state.go_back(),
        Action::ToggleSort => state.toggle_sort(),
        Action::Refresh => {
            state.status = None;
            state.refresh(source);
        }
        Action::RequestKill(kind) => state.request_kill(kind),
        Action::CancelKill => state.cancel_kill(),
        Action::ConfirmKill => {
            if let Some(pending) = state.confirm_kill() {
                let outcome = signal::send(pending.pid, pending.kind);
                let report = KillReport::new(pending.pid, pending.kind, &outcome);
                state.refresh(source);
                state.status = Some(report.message);
            }
        }
    }
}
