use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::theme;
use crate::app::AppState;

pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let Some(pending) = &state.pending_kill else {
        return;
    };

    let popup = centered(area, 60, 7);
    let lines = vec![
        Line::from(vec![
            Span::styled(format!("Send {} to ", pending.kind), theme::normal_style()),
            Span::styled(
                format!("{} ({})", pending.command, pending.pid),
                theme::danger_style(),
            ),
            Span::styled("?", theme::normal_style()),
        ]),
        Line::from(Span::styled(
            format!("Affected ports: {}", pending.ports.join(", ")),
            theme::normal_style(),
        )),
        Line::from(""),
        Line::from(Span::styled("y: confirm   n/Esc: cancel", theme::status_style())),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Confirm ")
        .border_style(theme::danger_style());
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        popup,
    );
}

/// A `width` x `height` rectangle centred in `area`, clipped to it.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
