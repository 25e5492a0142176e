use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use super::{truncate, usage_cells};
use crate::fleet::{stack, ViewModel};
use crate::models::ContainerRecord;
use crate::ui::{status_icon, Palette};

/// Row table render surface
#[derive(Default)]
pub struct ContainerTable {
    state: TableState,
}

impl ContainerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table row of each record, in display order. Group headers take a
    /// row of their own.
    fn row_positions(view: &ViewModel) -> Vec<usize> {
        match view {
            ViewModel::Grouped(groups) => {
                let mut positions = Vec::with_capacity(view.len());
                let mut row = 0;
                for group in groups {
                    row += 1;
                    for _ in &group.members {
                        positions.push(row);
                        row += 1;
                    }
                }
                positions
            }
            _ => (0..view.len()).collect(),
        }
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

        if view.is_empty() {
            let empty = Paragraph::new("No containers match the current filters")
                .style(Style::default().fg(palette.overlay))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let mut rows = Vec::new();
        match view {
            ViewModel::Grouped(groups) => {
                for group in groups {
                    rows.push(
                        Row::new(vec![
                            Cell::from(""),
                            Cell::from(group.key.clone()),
                            Cell::from(""),
                            Cell::from(""),
                            Cell::from(group.stats.running_display()),
                            Cell::from(group.stats.cpu_display()),
                            Cell::from(format!("{} MB", group.stats.memory_sum_mb)),
                            Cell::from(""),
                            Cell::from(""),
                        ])
                        .style(Style::default().fg(palette.mauve).add_modifier(Modifier::BOLD)),
                    );
                    rows.extend(group.members.iter().map(|r| record_row(r, palette)));
                }
            }
            _ => rows.extend(view.records().map(|r| record_row(r, palette))),
        }

        let header = Row::new(vec![
            "", "NAME", "STACK", "HOST", "STATUS", "CPU", "MEMORY", "UPTIME", "TAGS",
        ])
        .style(Style::default().fg(palette.fg_dark).add_modifier(Modifier::BOLD));

        let widths = [
            Constraint::Length(2),
            Constraint::Min(18),
            Constraint::Length(16),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(8),
            Constraint::Min(10),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(palette.selected_style())
            .highlight_symbol("▶");

        let positions = Self::row_positions(view);
        self.state.select(positions.get(selected).copied());
        frame.render_stateful_widget(table, area, &mut self.state);
    }
}

fn record_row<'a>(record: &'a ContainerRecord, palette: &Palette) -> Row<'a> {
    let (cpu, mem, uptime) = usage_cells(record);
    let status_color = palette.status_color(&record.status);

    Row::new(vec![
        Cell::from(status_icon(&record.status)).style(Style::default().fg(status_color)),
        Cell::from(truncate(&record.name, 32)).style(Style::default().fg(palette.teal)),
        Cell::from(truncate(&stack::resolve(record), 16)),
        Cell::from(record.host()),
        Cell::from(record.status.as_str()).style(Style::default().fg(status_color)),
        Cell::from(cpu).style(Style::default().fg(palette.usage_color(record.cpu()))),
        Cell::from(mem),
        Cell::from(uptime),
        Cell::from(record.tags.join(", ")).style(Style::default().fg(palette.yellow)),
    ])
    .style(Style::default().fg(palette.fg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::{FilterState, GroupMode};
    use crate::fleet::view::build;

    #[test]
    fn test_row_positions_skip_group_headers() {
        let records: Vec<ContainerRecord> = ["a1", "a2", "b1"]
            .iter()
            .map(|n| {
                let mut r = ContainerRecord::new(*n, *n);
                r.compose_project = Some(n[..1].to_string());
                r
            })
            .collect();
        let state = FilterState {
            group: GroupMode::Stack,
            ..Default::default()
        };
        let view = build(&records, &state);
        assert_eq!(ContainerTable::row_positions(&view), vec![1, 2, 4]);

        let flat = build(&records, &FilterState::default());
        assert_eq!(ContainerTable::row_positions(&flat), vec![0, 1, 2]);
    }
}
