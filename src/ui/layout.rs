use ratatui::prelude::*;

/// Terminals at least this wide get the inline desktop filter bar,
/// narrower ones the popup filter menu
pub const DESKTOP_MIN_WIDTH: u16 = 100;

/// Header, body and footer
pub fn main_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Header
            Constraint::Min(0),     // Body
            Constraint::Length(1),  // Footer/status bar
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Split header into title and counts
pub fn header_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(16), Constraint::Length(48)])
        .split(area);

    (chunks[0], chunks[1])
}

/// Filter bar on top of the container view
pub fn filter_bar_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    (chunks[0], chunks[1])
}

/// File list on the left, content on the right
pub fn split_pane(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    (chunks[0], chunks[1])
}

/// Centered modal area
pub fn centered_modal(area: Rect, width_percent: u16, height: u16) -> Rect {
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width_percent.min(100)) / 2),
            Constraint::Percentage(width_percent.min(100)),
            Constraint::Percentage((100 - width_percent.min(100)) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

pub fn is_desktop(area: Rect) -> bool {
    area.width >= DESKTOP_MIN_WIDTH
}
