use ratatui::{prelude::*, widgets::Paragraph};

use crate::ui::Palette;

/// Keybinding definition
pub struct KeyBinding {
    pub key: &'static str,
    pub desc: &'static str,
}

/// Which keybindings the status bar shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    Containers,
    Search,
    FilterMenu,
    Compose,
}

/// Bottom line: the last message when there is one, keybindings otherwise
pub struct StatusBar;

impl StatusBar {
    pub fn keybindings(context: KeyContext) -> Vec<KeyBinding> {
        match context {
            KeyContext::Containers => vec![
                KeyBinding { key: "↑↓←→", desc: "nav" },
                KeyBinding { key: "/", desc: "search" },
                KeyBinding { key: "s/t/k/h", desc: "filter" },
                KeyBinding { key: "g", desc: "group" },
                KeyBinding { key: "o/O", desc: "sort" },
                KeyBinding { key: "v", desc: "grid/table" },
                KeyBinding { key: "e", desc: "compose" },
                KeyBinding { key: "?", desc: "help" },
            ],
            KeyContext::Search => vec![
                KeyBinding { key: "Enter", desc: "done" },
                KeyBinding { key: "Esc", desc: "clear" },
            ],
            KeyContext::FilterMenu => vec![
                KeyBinding { key: "↑↓", desc: "select" },
                KeyBinding { key: "Enter", desc: "change" },
                KeyBinding { key: "Esc", desc: "close" },
            ],
            KeyContext::Compose => vec![
                KeyBinding { key: "↑↓", desc: "select" },
                KeyBinding { key: "PgUp/PgDn", desc: "scroll" },
                KeyBinding { key: "r", desc: "rescan" },
                KeyBinding { key: "Tab", desc: "containers" },
                KeyBinding { key: "q", desc: "quit" },
            ],
        }
    }

    pub fn render(
        frame: &mut Frame,
        area: Rect,
        context: KeyContext,
        message: Option<&str>,
        palette: &Palette,
    ) {
        let line = match message {
            Some(message) => Line::from(vec![
                Span::styled(" ! ", Style::default().bg(palette.red).fg(palette.bg_dark)),
                Span::styled(format!(" {}", message), Style::default().fg(palette.red)),
            ]),
            None => Line::from(
                Self::keybindings(context)
                    .into_iter()
                    .flat_map(|kb| [palette.key_span(kb.key), palette.key_desc_span(kb.desc)])
                    .collect::<Vec<_>>(),
            ),
        };

        let widget = Paragraph::new(line)
            .style(Style::default().bg(palette.bg_dark))
            .alignment(Alignment::Center);
        frame.render_widget(widget, area);
    }
}
