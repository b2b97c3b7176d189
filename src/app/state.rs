use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use ratatui::widgets::{ListState, TableState};

use crate::inventory::{affected_ports, RowSource};
use crate::model::{DisplayRow, SortDirection};
use crate::rows::sort_rows;
use crate::signal::SignalKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    List,
    Detail,
    Confirm,
}

/// A signal waiting for the user's confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingKill {
    pub pid: u32,
    pub command: String,
    pub kind: SignalKind,
    pub ports: Vec<String>,
}

pub struct AppState {
    pub mode: ViewMode,
    /// View to return to when the confirmation dialog closes.
    return_mode: ViewMode,
    pub search_input: String,
    pub rows: Vec<DisplayRow>,
    pub filtered_indices: Vec<usize>,
    pub list_state: ListState,
    pub selected_row: Option<DisplayRow>,
    pub conn_table_state: TableState,
    pub pending_kill: Option<PendingKill>,
    pub sort: SortDirection,
    pub status: Option<String>,
    pub should_quit: bool,
    pub match_count: usize,
    pub total_count: usize,
}

impl AppState {
    pub fn new(rows: Vec<DisplayRow>, sort: SortDirection) -> Self {
        let mut state = Self {
            mode: ViewMode::List,
            return_mode: ViewMode::List,
            search_input: String::new(),
            rows: Vec::new(),
            filtered_indices: Vec::new(),
            list_state: ListState::default(),
            selected_row: None,
            conn_table_state: TableState::default(),
            pending_kill: None,
            sort,
            status: None,
            should_quit: false,
            match_count: 0,
            total_count: 0,
        };
        state.replace_rows(rows);
        state
    }

    /// Swap in a new row set, keeping the search query and sort order.
    pub fn replace_rows(&mut self, rows: Vec<DisplayRow>) {
        self.rows = sort_rows(rows, self.sort);
        self.total_count = self.rows.len();
        self.update_filter();
    }

    /// Apply fuzzy search to the rows based on current search_input.
    pub fn update_filter(&mut self) {
        if self.search_input.is_empty() {
            self.filtered_indices = (0..self.rows.len()).collect();
        } else {
            let matcher = SkimMatcherV2::default();
            let query = &self.search_input;

            let mut scored: Vec<(usize, i64)> = self
                .rows
                .iter()
                .enumerate()
                .filter_map(|(i, r)| {
                    let haystack = format!(
                        "{} {} {} {} {}",
                        r.display_port,
                        r.pid,
                        r.command,
                        r.user,
                        r.full_command.as_deref().unwrap_or("")
                    );
                    matcher.fuzzy_match(&haystack, query).map(|score| (i, score))
                })
                .collect();

            // Stable, so equal scores keep port order.
            scored.sort_by(|a, b| b.1.cmp(&a.1));
            self.filtered_indices = scored.into_iter().map(|(i, _)| i).collect();
        }

        self.match_count = self.filtered_indices.len();

        if self.filtered_indices.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(0));
        }
    }

    pub fn toggle_sort(&mut self) {
        self.sort = self.sort.toggle();
        let rows = std::mem::take(&mut self.rows);
        self.replace_rows(rows);
        self.status = Some(format!("sorted by port ({})", self.sort));
    }

    /// Reload rows from `source`. Failures land in the status line.
    pub fn refresh(&mut self, source: &dyn RowSource) {
        match source.fetch_rows() {
            Ok(rows) => {
                self.replace_rows(rows);
                if let Some(selected) = self.selected_row.take() {
                    self.selected_row = self
                        .rows
                        .iter()
                        .find(|r| r.pid == selected.pid && r.display_port == selected.display_port)
                        .cloned();
                    if self.selected_row.is_none() && self.mode == ViewMode::Detail {
                        self.mode = ViewMode::List;
                    }
                }
            }
            Err(e) => {
                log::warn!("refresh failed: {}", e);
                self.status = Some(e.to_string());
            }
        }
    }

    /// Row under the cursor in the list view.
    pub fn current_row(&self) -> Option<&DisplayRow> {
        let selected = self.list_state.selected()?;
        let idx = *self.filtered_indices.get(selected)?;
        self.rows.get(idx)
    }

    /// Enter detail view for the currently selected row.
    pub fn select_current(&mut self) {
        if let Some(row) = self.current_row().cloned() {
            self.selected_row = Some(row);
            self.mode = ViewMode::Detail;
            self.conn_table_state = TableState::default();
            self.conn_table_state.select(Some(0));
        }
    }

    pub fn go_back(&mut self) {
        self.mode = ViewMode::List;
        self.selected_row = None;
    }

    /// Open the confirmation dialog for the focused process.
    pub fn request_kill(&mut self, kind: SignalKind) {
        let target = match self.mode {
            ViewMode::Detail => self.selected_row.as_ref(),
            ViewMode::List => self.current_row(),
            ViewMode::Confirm => return,
        };
        let Some((pid, command, own_ports)) =
            target.map(|r| (r.pid, r.command.clone(), r.process_ports.clone()))
        else {
            return;
        };

        let mut ports = affected_ports(&self.rows, pid);
        if ports.is_empty() {
            ports = own_ports;
        }
        self.pending_kill = Some(PendingKill {
            pid,
            command,
            kind,
            ports,
        });
        self.return_mode = self.mode;
        self.mode = ViewMode::Confirm;
    }

    pub fn cancel_kill(&mut self) {
        self.pending_kill = None;
        self.mode = self.return_mode;
        self.status = Some("cancelled".to_string());
    }

    /// Close the dialog and hand back the confirmed request.
    pub fn confirm_kill(&mut self) -> Option<PendingKill> {
        let pending = self.pending_kill.take()?;
        self.mode = self.return_mode;
        Some(pending)
    }

    pub fn move_up(&mut self) {
        self.move_by(-1);
    }

    pub fn move_down(&mut self) {
        self.move_by(1);
    }

    pub fn page_up(&mut self) {
        self.move_by(-10);
    }

    pub fn page_down(&mut self) {
        self.move_by(10);
    }

    fn move_by(&mut self, delta: i32) {
        match self.mode {
            ViewMode::List => self.list_move(delta),
            ViewMode::Detail => self.detail_move(delta),
            ViewMode::Confirm => {}
        }
    }

    fn list_move(&mut self, delta: i32) {
        if self.filtered_indices.is_empty() {
            return;
        }
        let len = self.filtered_indices.len() as i32;
        let current = self.list_state.selected().unwrap_or(0) as i32;
        let next = ((current + delta) % len + len) % len;
        self.list_state.select(Some(next as usize));
    }

    fn detail_move(&mut self, delta: i32) {
        let count = self
            .selected_row
            .as_ref()
            .map_or(0, |r| r.connections.len());
        if count == 0 {
            return;
        }
        let len = count as i32;
        let current = self.conn_table_state.selected().unwrap_or(0) as i32;
        let next = (current + delta).clamp(0, len - 1);
        self.conn_table_state.select(Some(next as usize));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, ScoutError};
    use crate::grouping::group;
    use crate::grouping::tests::socket;
    use crate::rows::build_rows;

    fn sample_rows() -> Vec<DisplayRow> {
        build_rows(&group(vec![
            socket("nginx", 10, "root", Some("443"), Some("LISTEN")),
            socket("nginx", 10, "root", Some("80"), Some("LISTEN")),
            socket("redis", 20, "redis", Some("6379"), Some("LISTEN")),
        ]))
    }

    fn ports(state: &AppState) -> Vec<&str> {
        state
            .filtered_indices
            .iter()
            .map(|&i| state.rows[i].display_port.as_str())
            .collect()
    }

    struct Fixed(Vec<DisplayRow>);

    impl RowSource for Fixed {
        fn fetch_rows(&self) -> Result<Vec<DisplayRow>> {
            Ok(self.0.clone())
        }
    }

    struct Broken;

    impl RowSource for Broken {
        fn fetch_rows(&self) -> Result<Vec<DisplayRow>> {
            Err(ScoutError::ToolNotFound("lsof".to_string()))
        }
    }

    #[test]
    fn test_rows_sorted_on_load() {
        let state = AppState::new(sample_rows(), SortDirection::Ascending);
        assert_eq!(ports(&state), vec!["80", "443", "6379"]);
        assert_eq!(state.total_count, 3);
        assert_eq!(state.list_state.selected(), Some(0));
    }

    #[test]
    fn test_toggle_sort() {
        let mut state = AppState::new(sample_rows(), SortDirection::Ascending);
        state.toggle_sort();
        assert_eq!(state.sort, SortDirection::Descending);
        assert_eq!(ports(&state), vec!["6379", "443", "80"]);
    }

    #[test]
    fn test_fuzzy_search() {
        let mut state = AppState::new(sample_rows(), SortDirection::Ascending);
        state.search_input = "redis".to_string();
        state.update_filter();
        assert_eq!(state.match_count, 1);
        assert_eq!(state.current_row().map(|r| r.pid), Some(20));

        state.search_input = "zzzz".to_string();
        state.update_filter();
        assert_eq!(state.match_count, 0);
        assert!(state.current_row().is_none());
    }

    #[test]
    fn test_list_navigation_wraps() {
        let mut state = AppState::new(sample_rows(), SortDirection::Ascending);
        state.move_up();
        assert_eq!(state.list_state.selected(), Some(2));
        state.move_down();
        assert_eq!(state.list_state.selected(), Some(0));
    }

    #[test]
    fn test_kill_confirmation_lists_every_port() {
        let mut state = AppState::new(sample_rows(), SortDirection::Ascending);
        state.request_kill(SignalKind::Terminate);
        assert_eq!(state.mode, ViewMode::Confirm);
        let pending = state.pending_kill.clone().unwrap();
        assert_eq!(pending.pid, 10);
        assert_eq!(pending.ports, vec!["443", "80"]);

        let confirmed = state.confirm_kill().unwrap();
        assert_eq!(confirmed.kind, SignalKind::Terminate);
        assert_eq!(state.mode, ViewMode::List);
        assert!(state.pending_kill.is_none());
    }

    #[test]
    fn test_cancel_returns_to_detail() {
        let mut state = AppState::new(sample_rows(), SortDirection::Ascending);
        state.select_current();
        assert_eq!(state.mode, ViewMode::Detail);
        state.request_kill(SignalKind::Kill);
        state.cancel_kill();
        assert_eq!(state.mode, ViewMode::Detail);
        assert!(state.pending_kill.is_none());
    }

    #[test]
    fn test_refresh_drops_vanished_selection() {
        let mut state = AppState::new(sample_rows(), SortDirection::Ascending);
        state.select_current();
        let remaining: Vec<DisplayRow> = sample_rows().into_iter().filter(|r| r.pid == 20).collect();
        state.refresh(&Fixed(remaining));
        assert_eq!(state.total_count, 1);
        assert!(state.selected_row.is_none());
        assert_eq!(state.mode, ViewMode::List);
    }

    #[test]
    fn test_refresh_error_goes_to_status() {
        let mut state = AppState::new(sample_rows(), SortDirection::Ascending);
        state.refresh(&Broken);
        assert_eq!(state.total_count, 3);
        assert!(state.status.as_deref().unwrap().contains("lsof"));
    }
}
