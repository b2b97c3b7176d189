use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

pub enum AppEvent {
    Key(KeyEvent),
    /// Terminal geometry changed or focus returned.
    Redraw,
    /// Nothing arrived within the poll window.
    Idle,
}

/// Blocking terminal event reader with a poll timeout.
pub struct EventSource {
    poll_timeout: Duration,
}

impl EventSource {
    pub fn new(poll_timeout: Duration) -> Self {
        Self { poll_timeout }
    }

    pub fn next(&self) -> io::Result<AppEvent> {
        if !event::poll(self.poll_timeout)? {
            return Ok(AppEvent::Idle);
        }
        Ok(match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
            Event::Resize(..) | Event::FocusGained => AppEvent::Redraw,
            _ => AppEvent::Idle,
        })
    }
}
