use ratatui::style::{Color, Modifier, Style};

pub fn header_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(Color::DarkGray)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

pub fn normal_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn search_style() -> Style {
    Style::default().fg(Color::Green)
}

pub fn status_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn message_style() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn danger_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

/// Colour a socket by its connection state.
pub fn state_style(state: Option<&str>) -> Style {
    let Some(state) = state else {
        return Style::default().fg(Color::Gray);
    };
    let upper = state.to_ascii_uppercase();
    if upper.contains("LISTEN") {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else if upper == "ESTABLISHED" {
        Style::default().fg(Color::Cyan)
    } else if upper.contains("WAIT") || upper.contains("CLOS") {
        Style::default().fg(Color::LightRed)
    } else {
        Style::default().fg(Color::White)
    }
}
