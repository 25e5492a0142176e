use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::fleet::{ControlField, ControlStateSync, Surface};
use crate::ui::Palette;

/// Shown for a select control with no value
const ALL: &str = "all";

/// Inline filter controls for wide terminals
pub struct FilterBar;

impl FilterBar {
    /// Render the desktop surface's controls. `editing` puts a cursor after
    /// the search text.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        sync: &ControlStateSync,
        editing: bool,
        match_count: usize,
        total_count: usize,
        palette: &Palette,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if editing {
                Style::default().fg(palette.teal)
            } else {
                palette.border_style(false)
            })
            .style(Style::default().bg(palette.bg_dark));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let value = |field| sync.control_value(Surface::Desktop, field);
        let search = value(ControlField::Search);

        let mut spans = vec![
            Span::styled(" / ", Style::default().fg(palette.teal).add_modifier(Modifier::BOLD)),
            Span::styled(search, Style::default().fg(palette.fg)),
        ];
        if editing {
            spans.push(Span::styled("│", Style::default().fg(palette.teal)));
        }

        for field in [
            ControlField::Status,
            ControlField::Tag,
            ControlField::Stack,
            ControlField::Host,
            ControlField::Group,
        ] {
            let current = value(field);
            let shown = if current.is_empty() { ALL.to_string() } else { current.clone() };
            spans.push(Span::styled(
                format!("  {} ", field.label()),
                Style::default().fg(palette.fg_dark),
            ));
            spans.push(Span::styled(
                shown,
                if current.is_empty() {
                    Style::default().fg(palette.overlay)
                } else {
                    Style::default().fg(palette.yellow).add_modifier(Modifier::BOLD)
                },
            ));
        }

        let arrow = if value(ControlField::SortDirection) == "asc" { "↑" } else { "↓" };
        spans.push(Span::styled("  Sort ", Style::default().fg(palette.fg_dark)));
        spans.push(Span::styled(
            format!("{} {}", value(ControlField::SortKey), arrow),
            Style::default().fg(palette.lavender),
        ));
        spans.push(Span::styled(
            format!("  ({}/{})", match_count, total_count),
            Style::default().fg(palette.fg_dark),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)), inner);
    }
}
