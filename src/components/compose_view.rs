use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::step;
use crate::ui::{split_pane, Palette};

/// Compose file list and the content of the open file
#[derive(Debug, Default)]
pub struct ComposeView {
    pub files: Vec<String>,
    pub selected: usize,
    /// Identifier and content of the open file
    pub open: Option<(String, String)>,
    pub scroll: u16,
    pub loading: bool,
}

impl ComposeView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_files(&mut self, files: Vec<String>) {
        let keep = self.selected_file().map(str::to_string);
        self.files = files;
        self.selected = keep
            .and_then(|id| self.files.iter().position(|f| *f == id))
            .unwrap_or(0);
        self.loading = false;
    }

    pub fn selected_file(&self) -> Option<&str> {
        self.files.get(self.selected).map(String::as_str)
    }

    /// Select a file by identifier. Returns false if it is not listed.
    pub fn select(&mut self, id: &str) -> bool {
        match self.files.iter().position(|f| f == id) {
            Some(i) => {
                self.selected = i;
                true
            }
            None => false,
        }
    }

    pub fn previous(&mut self) {
        self.selected = step(self.selected, self.files.len(), false);
    }

    pub fn next(&mut self) {
        self.selected = step(self.selected, self.files.len(), true);
    }

    pub fn show_content(&mut self, id: String, content: String) {
        self.open = Some((id, content));
        self.scroll = 0;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max = self
            .open
            .as_ref()
            .map(|(_, c)| c.lines().count().saturating_sub(1) as u16)
            .unwrap_or(0);
        self.scroll = (self.scroll + lines).min(max);
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let (list_area, content_area) = split_pane(area);

        let items: Vec<ListItem> = self
            .files
            .iter()
            .map(|f| {
                let is_open = self.open.as_ref().is_some_and(|(id, _)| id == f);
                let style = if is_open {
                    Style::default().fg(palette.green)
                } else {
                    Style::default().fg(palette.fg)
                };
                ListItem::new(Span::styled(f.as_str(), style))
            })
            .collect();

        let title = if self.loading {
            " Compose files (scanning…) ".to_string()
        } else {
            format!(" Compose files ({}) ", self.files.len())
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .title(title)
                    .title_style(palette.title_style(true))
                    .borders(Borders::ALL)
                    .border_style(palette.border_style(true)),
            )
            .highlight_style(palette.selected_style())
            .highlight_symbol("▶");
        let mut state = ListState::default();
        state.select((!self.files.is_empty()).then_some(self.selected));
        frame.render_stateful_widget(list, list_area, &mut state);

        let (title, body) = match &self.open {
            Some((id, content)) => (format!(" {} ", id), content.as_str()),
            None => (" No file open ".to_string(), "Select a file and press Enter"),
        };
        let content = Paragraph::new(body)
            .style(Style::default().fg(palette.fg))
            .scroll((self.scroll, 0))
            .block(
                Block::default()
                    .title(title)
                    .title_style(palette.title_style(false))
                    .borders(Borders::ALL)
                    .border_style(palette.border_style(false)),
            );
        frame.render_widget(content, content_area);
    }
}
