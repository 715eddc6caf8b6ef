//! Screen layout for the adventure TUI.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Computed areas for one frame (70/30 main/sidebar split).
pub struct AppLayout {
    pub title_area: Rect,
    pub story_area: Rect,
    pub illustration_area: Rect,
    pub choices_area: Rect,
    pub sidebar_area: Rect,
    pub input_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    pub fn calculate(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Min(10),   // main
                Constraint::Length(3), // input
                Constraint::Length(1), // status
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(rows[1]);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(6),    // story
                Constraint::Length(3), // illustration
                Constraint::Length(8), // choices
            ])
            .split(columns[0]);

        Self {
            title_area: rows[0],
            story_area: left[0],
            illustration_area: left[1],
            choices_area: left[2],
            sidebar_area: columns[1],
            input_area: rows[2],
            status_area: rows[3],
        }
    }
}
