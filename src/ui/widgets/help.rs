//! Help panel widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::super::layout::centered_rect;
use crate::config::KeyBindings;

/// Help panel showing the configured key bindings.
pub struct HelpPanel;

impl HelpPanel {
    /// Render the help panel.
    pub fn render(frame: &mut Frame, area: Rect, keys: &KeyBindings) {
        let popup_area = centered_rect(60, 80, area);
        frame.render_widget(Clear, popup_area);

        let help = Paragraph::new(help_lines(keys))
            .block(
                Block::default()
                    .title(" Help ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        frame.render_widget(help, popup_area);
    }
}

fn section(title: &'static str) -> [Line<'static>; 2] {
    [
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ]
}

fn entry(keys: String, description: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {keys:<12}"), Style::default().fg(Color::Cyan)),
        Span::raw(description),
    ])
}

pub fn help_lines(keys: &KeyBindings) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    lines.extend(section("Navigation"));
    lines.push(entry(format!("{}/↓", keys.down), "Move down"));
    lines.push(entry(format!("{}/↑", keys.up), "Move up"));
    lines.push(entry(format!("{}/Home", keys.top), "Go to top"));
    lines.push(entry(format!("{}/End", keys.bottom), "Go to bottom"));
    lines.push(entry("PgUp/PgDn".to_string(), "Page up/down"));
    lines.push(entry("Tab".to_string(), "Switch view"));
    lines.push(Line::from(""));

    lines.extend(section("Views"));
    lines.push(entry(keys.feed.clone(), "Post feed"));
    lines.push(entry(keys.trades.clone(), "Trades"));
    lines.push(Line::from(""));

    lines.extend(section("Actions"));
    lines.push(entry(keys.refresh.clone(), "Refresh from the first page"));
    lines.push(entry(keys.load_more.clone(), "Load more posts"));
    lines.push(entry(keys.help.clone(), "Toggle help"));
    lines.push(entry("Esc".to_string(), "Dismiss notification"));
    lines.push(entry(keys.quit.clone(), "Quit"));

    lines
}
