use ratatui::{prelude::*, widgets::Paragraph};

use crate::models::GroupStats;
use crate::ui::layout::header_layout;
use crate::ui::Palette;

/// Title on the left, fleet counts on the right
pub struct Header;

impl Header {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        fleet: &GroupStats,
        refreshing: bool,
        palette: &Palette,
    ) {
        let (title_area, stats_area) = header_layout(area);

        let title = Paragraph::new(" Composr ")
            .style(Style::default().fg(palette.blue).add_modifier(Modifier::BOLD));
        frame.render_widget(title, title_area);

        let separator = Span::styled(" │ ", Style::default().fg(palette.surface0));
        let mut spans = vec![
            Span::styled("UP ", Style::default().fg(palette.fg_dark)),
            Span::styled(fleet.running_display(), Style::default().fg(palette.green)),
            separator.clone(),
            Span::styled("CPU ", Style::default().fg(palette.fg_dark)),
            Span::styled(fleet.cpu_display(), Style::default().fg(palette.usage_color(fleet.cpu_sum))),
            separator,
            Span::styled("MEM ", Style::default().fg(palette.fg_dark)),
            Span::styled(format!("{} MB", fleet.memory_sum_mb), Style::default().fg(palette.fg)),
        ];
        if refreshing {
            spans.push(Span::styled(" ↻", Style::default().fg(palette.yellow)));
        }

        let stats = Paragraph::new(Line::from(spans)).alignment(Alignment::Right);
        frame.render_widget(stats, stats_area);
    }
}
