use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::theme;
use super::widgets;
use crate::app::AppState;

pub fn render(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Row header
            Constraint::Length(7), // Process summary
            Constraint::Min(3),    // Connections
            Constraint::Length(1), // Status line
        ])
        .split(area);

    render_header(frame, state, chunks[0]);
    widgets::summary::render(frame, state, chunks[1]);
    widgets::conn_table::render(frame, state, chunks[2]);
    render_status(frame, state, chunks[3]);
}

fn render_header(frame: &mut Frame, state: &AppState, area: Rect) {
    let Some(row) = &state.selected_row else {
        return;
    };

    let line = Line::from(vec![
        Span::styled(" PORT ", theme::header_style()),
        Span::styled(row.display_port.as_str(), theme::normal_style()),
        Span::styled("  PID ", theme::header_style()),
        Span::styled(row.pid.to_string(), theme::normal_style()),
        Span::styled("  CMD ", theme::header_style()),
        Span::styled(row.command.as_str(), theme::normal_style()),
        Span::styled(
            format!("  sockets {}", row.connections.len()),
            theme::status_style(),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_status(frame: &mut Frame, state: &AppState, area: Rect) {
    let mut spans = vec![Span::styled(
        "  j/k: scroll | r: refresh | x/X: terminate/kill | Esc: back | q: quit",
        theme::status_style(),
    )];
    if let Some(message) = &state.status {
        spans.push(Span::styled(format!("  {}", message), theme::message_style()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
