use ratatui::layout::{Constraint, Rect};
use ratatui::style::Modifier;
use ratatui::text::Span;
use ratatui::widgets::{Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::app::AppState;
use crate::ui::theme;

/// Sockets behind the selected row.
pub fn render(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let Some(row) = &state.selected_row else {
        return;
    };

    if row.connections.is_empty() {
        let msg = Paragraph::new(Span::styled("  No sockets", theme::status_style()));
        frame.render_widget(msg, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("FD"),
        Cell::from("PROTO"),
        Cell::from("TYPE"),
        Cell::from("STATE"),
        Cell::from("ADDRESS"),
    ])
    .style(theme::header_style());

    let rows: Vec<Row> = row
        .connections
        .iter()
        .map(|entry| {
            let s = &entry.socket;
            let style = theme::state_style(s.address.state.as_deref());
            Row::new(vec![
                Cell::from(s.fd.clone().unwrap_or_default()),
                Cell::from(s.protocol.as_ref().map(|p| p.to_string()).unwrap_or_default()),
                Cell::from(s.family.as_ref().map(|f| f.to_string()).unwrap_or_default()),
                Cell::from(Span::styled(
                    s.address.state.clone().unwrap_or_else(|| "-".to_string()),
                    style,
                )),
                Cell::from(Span::styled(s.raw_address.clone(), style)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(13),
        Constraint::Min(30),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(theme::selected_style().add_modifier(Modifier::BOLD));

    frame.render_stateful_widget(table, area, &mut state.conn_table_state);
}
