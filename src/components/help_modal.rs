use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::ui::{centered_modal, Palette};

const SHORTCUTS: &[(&str, &str)] = &[
    ("↑↓←→", "Move selection"),
    ("/", "Search by name"),
    ("s", "Cycle status filter"),
    ("t", "Cycle tag filter"),
    ("k", "Cycle stack filter"),
    ("h", "Cycle host filter"),
    ("g", "Cycle grouping (none/stack/tag/host)"),
    ("o", "Cycle sort key"),
    ("O", "Flip sort direction"),
    ("f", "Filter menu"),
    ("v", "Switch grid/table"),
    ("T", "Switch theme"),
    ("e", "Open the stack's compose file"),
    ("Tab", "Containers / compose files"),
    ("r", "Refresh"),
    ("q", "Quit"),
];

/// Help modal component
pub struct HelpModal;

impl HelpModal {
    pub fn render(frame: &mut Frame, area: Rect, palette: &Palette) {
        let modal_area = centered_modal(area, 60, SHORTCUTS.len() as u16 + 6);
        frame.render_widget(Clear, modal_area);

        let mut lines = vec![
            Line::styled("Keyboard Shortcuts", Style::default().bold().fg(palette.teal)),
            Line::raw(""),
        ];
        lines.extend(SHORTCUTS.iter().map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("  {:<7}", key), Style::default().fg(palette.yellow)),
                Span::styled(*desc, Style::default().fg(palette.fg)),
            ])
        }));
        lines.push(Line::raw(""));
        lines.push(Line::styled("Press Esc to close", Style::default().fg(palette.overlay)));

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.mauve))
            .style(Style::default().bg(palette.bg_dark));

        frame.render_widget(Paragraph::new(lines).block(block), modal_area);
    }
}
