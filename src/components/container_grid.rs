use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use super::{make_bar, truncate, usage_cells};
use crate::fleet::{stack, Group, ViewModel};
use crate::models::{ContainerRecord, GroupStats};
use crate::ui::{status_icon, Palette};

const CARD_WIDTH: u16 = 36;
const CARD_HEIGHT: u16 = 5;

/// One visual line band of the grid
enum Band<'a> {
    Header(&'a Group),
    /// Cards with the display index of the first one
    Cards(Vec<&'a ContainerRecord>, usize),
}

impl Band<'_> {
    fn height(&self) -> u16 {
        match self {
            Band::Header(_) => 1,
            Band::Cards(..) => CARD_HEIGHT,
        }
    }

    fn contains(&self, index: usize) -> bool {
        match self {
            Band::Header(_) => false,
            Band::Cards(cards, first) => (*first..first + cards.len()).contains(&index),
        }
    }
}

/// Card grid render surface
#[derive(Default)]
pub struct ContainerGrid {
    /// First band drawn
    offset: usize,
    columns: usize,
}

impl ContainerGrid {
    pub fn new() -> Self {
        Self {
            offset: 0,
            columns: 1,
        }
    }

    /// Cards per row as of the last render, for up/down navigation
    pub fn columns(&self) -> usize {
        self.columns.max(1)
    }

    fn bands<'a>(view: &'a ViewModel, columns: usize) -> Vec<Band<'a>> {
        let mut bands = Vec::new();
        let mut index = 0;
        let mut push_cards = |bands: &mut Vec<Band<'a>>, records: Vec<&'a ContainerRecord>| {
            for chunk in records.chunks(columns) {
                bands.push(Band::Cards(chunk.to_vec(), index));
                index += chunk.len();
            }
        };

        match view {
            ViewModel::Empty => {}
            ViewModel::Flat(records) => push_cards(&mut bands, records.iter().collect()),
            ViewModel::Grouped(groups) => {
                for group in groups {
                    bands.push(Band::Header(group));
                    push_cards(&mut bands, group.members.iter().collect());
                }
            }
        }
        bands
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        view: &ViewModel,
        selected: usize,
        palette: &Palette,
    ) {
        let block = Block::default()
            .title(format!(" Containers ({}) ", view.len()))
            .title_style(palette.title_style(true))
            .borders(Borders::ALL)
            .border_style(palette.border_style(true));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if view.is_empty() {
            let empty = Paragraph::new("No containers match the current filters")
                .style(Style::default().fg(palette.overlay))
                .alignment(Alignment::Center);
            frame.render_widget(empty, inner);
            return;
        }

        self.columns = (inner.width / CARD_WIDTH).max(1) as usize;
        let bands = Self::bands(view, self.columns);
        self.scroll_to(&bands, selected, inner.height);

        let mut y = inner.y;
        for band in bands.iter().skip(self.offset) {
            if y + band.height() > inner.y + inner.height {
                break;
            }
            match band {
                Band::Header(group) => {
                    let area = Rect::new(inner.x, y, inner.width, 1);
                    frame.render_widget(group_header(group, palette), area);
                }
                Band::Cards(cards, first) => {
                    for (i, record) in cards.iter().enumerate() {
                        let x = inner.x + i as u16 * CARD_WIDTH;
                        let area = Rect::new(x, y, CARD_WIDTH.min(inner.width), CARD_HEIGHT);
                        render_card(frame, area, record, first + i == selected, palette);
                    }
                }
            }
            y += band.height();
        }
    }

    /// Keep the band holding `selected` on screen
    fn scroll_to(&mut self, bands: &[Band], selected: usize, height: u16) {
        let Some(target) = bands.iter().position(|b| b.contains(selected)) else {
            self.offset = 0;
            return;
        };
        // show the group header above the first card row too
        let target_top = if target > 0 && matches!(bands[target - 1], Band::Header(_)) {
            target - 1
        } else {
            target
        };
        if target_top < self.offset {
            self.offset = target_top;
        }
        loop {
            let used: u16 = bands[self.offset..=target].iter().map(Band::height).sum();
            if used <= height || self.offset >= target {
                break;
            }
            self.offset += 1;
        }
    }
}

fn group_summary(stats: &GroupStats) -> String {
    format!(
        " {} │ CPU {} │ MEM {} MB",
        stats.running_display(),
        stats.cpu_display(),
        stats.memory_sum_mb
    )
}

fn group_header<'a>(group: &'a Group, palette: &Palette) -> Paragraph<'a> {
    Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", group.key),
            Style::default().fg(palette.mauve).add_modifier(Modifier::BOLD),
        ),
        Span::styled(group_summary(&group.stats), Style::default().fg(palette.fg_dark)),
    ]))
}

fn render_card(
    frame: &mut Frame,
    area: Rect,
    record: &ContainerRecord,
    selected: bool,
    palette: &Palette,
) {
    let status_color = palette.status_color(&record.status);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style(selected))
        .title(Line::from(vec![
            Span::styled(format!(" {} ", status_icon(&record.status)), Style::default().fg(status_color)),
            Span::styled(
                format!("{} ", truncate(&record.name, CARD_WIDTH as usize - 8)),
                if selected {
                    palette.selected_style()
                } else {
                    Style::default().fg(palette.teal).add_modifier(Modifier::BOLD)
                },
            ),
        ]));

    let (cpu, mem, uptime) = usage_cells(record);
    let width = CARD_WIDTH as usize - 4;
    let lines = vec![
        Line::from(vec![
            Span::styled(format!("{:<10}", record.status.as_str()), Style::default().fg(status_color)),
            Span::styled(
                truncate(&format!("{} @ {}", stack::resolve(record), record.host()), width - 10),
                Style::default().fg(palette.fg_dark),
            ),
        ]),
        Line::from(vec![
            Span::styled("CPU ", Style::default().fg(palette.fg_dark)),
            Span::styled(make_bar(record.cpu(), 8), Style::default().fg(palette.sapphire)),
            Span::styled(format!(" {:<7}", cpu), Style::default().fg(palette.usage_color(record.cpu()))),
            Span::styled(mem, Style::default().fg(palette.fg)),
        ]),
        Line::from(vec![
            Span::styled(format!("up {:<9}", uptime), Style::default().fg(palette.fg_dark)),
            Span::styled(truncate(&record.tags.join(", "), width - 12), Style::default().fg(palette.yellow)),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::view::build;
    use crate::fleet::{FilterState, GroupMode};

    fn records(names: &[&str]) -> Vec<ContainerRecord> {
        names
            .iter()
            .map(|n| {
                let mut r = ContainerRecord::new(*n, *n);
                r.compose_project = Some(n[..1].to_string());
                r
            })
            .collect()
    }

    #[test]
    fn test_bands_chunk_each_group_separately() {
        let state = FilterState {
            group: GroupMode::Stack,
            ..Default::default()
        };
        let view = build(&records(&["a1", "a2", "a3", "b1"]), &state);
        let bands = ContainerGrid::bands(&view, 2);

        let shape: Vec<String> = bands
            .iter()
            .map(|b| match b {
                Band::Header(g) => format!("#{}", g.key),
                Band::Cards(cards, first) => format!("{}@{}", cards.len(), first),
            })
            .collect();
        assert_eq!(shape, vec!["#a", "2@0", "1@2", "#b", "1@3"]);
    }

    #[test]
    fn test_scroll_keeps_selection_visible() {
        let view = build(&records(&["a", "b", "c", "d", "e", "f"]), &FilterState::default());
        let mut grid = ContainerGrid::new();
        let bands = ContainerGrid::bands(&view, 1);

        grid.scroll_to(&bands, 5, CARD_HEIGHT * 2);
        assert_eq!(grid.offset, 4);
        grid.scroll_to(&bands, 0, CARD_HEIGHT * 2);
        assert_eq!(grid.offset, 0);
    }

    #[test]
    fn test_group_summary_says_running_once() {
        let stats = GroupStats {
            total: 3,
            running: 2,
            cpu_sum: 12.5,
            memory_sum_mb: 300,
        };
        assert_eq!(group_summary(&stats), " 2/3 running │ CPU 12.5% │ MEM 300 MB");
    }
}
