use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::ui::theme;

pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let Some(row) = &state.selected_row else {
        return;
    };

    let field = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(label, theme::header_style()),
            Span::styled(value, theme::normal_style()),
        ])
    };
    let or_dash = |value: Option<&str>| value.unwrap_or("-").to_string();

    let lines = vec![
        field("  User:     ", row.user.clone()),
        field(
            "  PPID:     ",
            row.parent_pid.map(|p| p.to_string()).unwrap_or_else(|| "-".into()),
        ),
        field("  Command:  ", or_dash(row.full_command.as_deref())),
        field("  CWD:      ", or_dash(row.cwd.as_deref())),
        field("  Ports:    ", row.process_ports.join(", ")),
        field("  States:   ", row.state_summary()),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}
