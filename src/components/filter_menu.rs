use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};

use super::step;
use crate::fleet::{ControlField, ControlStateSync, Surface};
use crate::ui::{centered_modal, Palette};

/// Popup filter menu for narrow terminals. Lists every control of the
/// mobile surface; the selected row is cycled or, for search, edited.
#[derive(Debug, Default)]
pub struct FilterMenu {
    pub open: bool,
    pub editing: bool,
    selected: usize,
}

impl FilterMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self) {
        self.open = true;
        self.editing = false;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.editing = false;
    }

    pub fn previous(&mut self) {
        self.selected = step(self.selected, ControlField::ALL.len(), false);
    }

    pub fn next(&mut self) {
        self.selected = step(self.selected, ControlField::ALL.len(), true);
    }

    pub fn focus(&mut self, field: ControlField) {
        self.selected = ControlField::ALL
            .iter()
            .position(|f| *f == field)
            .unwrap_or(0);
    }

    pub fn field(&self) -> ControlField {
        ControlField::ALL[self.selected.min(ControlField::ALL.len() - 1)]
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, sync: &ControlStateSync, palette: &Palette) {
        let modal_area = centered_modal(area, 80, ControlField::ALL.len() as u16 + 4);
        frame.render_widget(Clear, modal_area);

        let items: Vec<ListItem> = ControlField::ALL
            .iter()
            .map(|field| {
                let value = sync.control_value(Surface::Mobile, *field);
                let shown = match (value.is_empty(), field.is_free_text()) {
                    (true, true) => String::new(),
                    (true, false) => "all".to_string(),
                    (false, _) => value,
                };
                let cursor = if self.editing && *field == self.field() { "│" } else { "" };
                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {:<8}", field.label()), Style::default().fg(palette.fg_dark)),
                    Span::styled(shown, Style::default().fg(palette.fg)),
                    Span::styled(cursor, Style::default().fg(palette.teal)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(" Filters ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.mauve))
                    .style(Style::default().bg(palette.bg_dark)),
            )
            .highlight_style(palette.selected_style())
            .highlight_symbol("▶");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, modal_area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_wraps_over_all_fields() {
        let mut menu = FilterMenu::new();
        assert_eq!(menu.field(), ControlField::Search);
        menu.previous();
        assert_eq!(menu.field(), ControlField::SortDirection);
        menu.next();
        menu.next();
        assert_eq!(menu.field(), ControlField::Status);
    }
}
