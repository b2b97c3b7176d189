use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, Paragraph};
use ratatui::Frame;

use super::{theme, truncate_str};
use crate::app::AppState;

const ROW_FORMAT_WIDTHS: (usize, usize, usize, usize, usize) = (7, 5, 8, 18, 10);

pub fn render(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Port rows
            Constraint::Length(1), // Search input line
            Constraint::Length(1), // Status line
        ])
        .split(area);

    render_rows(frame, state, chunks[0]);
    render_search_input(frame, state, chunks[1]);
    render_status_line(frame, state, chunks[2]);
}

fn render_rows(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let (port_w, proto_w, pid_w, cmd_w, user_w) = ROW_FORMAT_WIDTHS;
    let header_text = format!(
        "  {:<port_w$} {:<proto_w$} {:>pid_w$}  {:<cmd_w$} {:<user_w$} {}",
        "PORT", "PROTO", "PID", "COMMAND", "USER", "STATE",
    );
    let header_line = Line::from(Span::styled(header_text, theme::header_style()));

    let items: Vec<ListItem> = state
        .filtered_indices
        .iter()
        .map(|&idx| {
            let row = &state.rows[idx];
            let summary = row.state_summary();
            let text = format!(
                "  {:<port_w$} {:<proto_w$} {:>pid_w$}  {:<cmd_w$} {:<user_w$} ",
                row.display_port,
                row.protocol.as_ref().map(|p| p.to_string()).unwrap_or_default(),
                row.pid,
                truncate_str(&row.command, cmd_w),
                truncate_str(&row.user, user_w),
            );
            let state_style = theme::state_style(summary.split(',').next());
            ListItem::new(Line::from(vec![
                Span::styled(text, theme::normal_style()),
                Span::styled(summary, state_style),
            ]))
        })
        .collect();

    let list_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    frame.render_widget(Paragraph::new(header_line), list_chunks[0]);

    let list = List::new(items)
        .highlight_style(theme::selected_style())
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, list_chunks[1], &mut state.list_state);
}

fn render_search_input(frame: &mut Frame, state: &AppState, area: Rect) {
    let input_text = Line::from(vec![
        Span::styled("> ", theme::search_style().add_modifier(Modifier::BOLD)),
        Span::styled(&state.search_input, theme::search_style()),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]);
    frame.render_widget(Paragraph::new(input_text), area);
}

fn render_status_line(frame: &mut Frame, state: &AppState, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(
            "  {}/{}  sort:{}  s:sort r:refresh x/X:kill Enter:details q:quit",
            state.match_count, state.total_count, state.sort
        ),
        theme::status_style(),
    )];
    if let Some(message) = &state.status {
        spans.push(Span::styled(format!("  {}", message), theme::message_style()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
