pub mod confirm_dialog;
pub mod detail_view;
pub mod port_view;
pub mod theme;
pub mod widgets;

use ratatui::Frame;

use crate::app::state::ViewMode;
use crate::app::AppState;

pub fn render(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();
    match state.mode {
        ViewMode::List => port_view::render(frame, state),
        ViewMode::Detail => detail_view::render(frame, state, area),
        ViewMode::Confirm => {
            // Keep whichever view opened the dialog visible beneath it.
            if state.selected_row.is_some() {
                detail_view::render(frame, state, area);
            } else {
                port_view::render(frame, state);
            }
            confirm_dialog::render(frame, state, area);
        }
    }
}

/// Truncate a string to fit within a given width, appending ".." if truncated.
pub(crate) fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 2 {
        let head: String = s.chars().take(max_len - 2).collect();
        format!("{}..", head)
    } else {
        s.chars().take(max_len).collect()
    }
}
