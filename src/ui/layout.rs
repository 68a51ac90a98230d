//! Layout management for the TUI.

use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

const TOAST_WIDTH: u16 = 48;
const TOAST_HEIGHT: u16 = 3;

/// UI layout areas.
pub struct Layout {
    /// Status bar area (top).
    pub status_area: Rect,
    /// Tab bar area.
    pub tab_area: Rect,
    /// Trading summary banner.
    pub summary_area: Rect,
    /// Main content area.
    pub main_area: Rect,
    /// Key hint line; zero height when disabled.
    pub hint_area: Rect,
    /// Notification toast, bottom right of the main area.
    pub notification_area: Rect,
}

impl Layout {
    /// Create a new layout from the terminal area.
    pub fn new(area: Rect, show_hint_bar: bool) -> Self {
        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Status bar
                Constraint::Length(1), // Tab bar
                Constraint::Length(3), // Summary
                Constraint::Min(0),    // Main content
                Constraint::Length(u16::from(show_hint_bar)),
            ])
            .split(area);

        let main_area = chunks[3];
        let width = TOAST_WIDTH.min(main_area.width);
        let height = TOAST_HEIGHT.min(main_area.height);
        let notification_area = Rect {
            x: main_area.x + main_area.width - width,
            y: main_area.y + main_area.height - height,
            width,
            height,
        };

        Self {
            status_area: chunks[0],
            tab_area: chunks[1],
            summary_area: chunks[2],
            main_area,
            hint_area: chunks[4],
            notification_area,
        }
    }
}

/// Create a centered popup area.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    RatatuiLayout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
