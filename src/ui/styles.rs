use ratatui::prelude::*;

use crate::models::ContainerStatus;

/// Color palette for one Catppuccin flavor
/// https://github.com/catppuccin/catppuccin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    pub bg: Color,
    pub bg_dark: Color,
    pub surface0: Color,
    pub surface1: Color,
    pub fg: Color,
    pub fg_dark: Color,
    pub overlay: Color,
    pub mauve: Color,
    pub red: Color,
    pub peach: Color,
    pub yellow: Color,
    pub green: Color,
    pub teal: Color,
    pub sapphire: Color,
    pub blue: Color,
    pub lavender: Color,
}

impl Palette {
    pub const MOCHA: Palette = Palette {
        name: "mocha",
        bg: Color::Rgb(17, 17, 27),          // #11111b crust
        bg_dark: Color::Rgb(12, 12, 20),
        surface0: Color::Rgb(49, 50, 68),    // #313244
        surface1: Color::Rgb(69, 71, 90),    // #45475a
        fg: Color::Rgb(205, 214, 244),       // #cdd6f4
        fg_dark: Color::Rgb(147, 153, 178),  // #9399b2
        overlay: Color::Rgb(127, 132, 156),  // #7f849c
        mauve: Color::Rgb(203, 166, 247),    // #cba6f7
        red: Color::Rgb(243, 139, 168),      // #f38ba8
        peach: Color::Rgb(250, 179, 135),    // #fab387
        yellow: Color::Rgb(249, 226, 175),   // #f9e2af
        green: Color::Rgb(166, 227, 161),    // #a6e3a1
        teal: Color::Rgb(148, 226, 213),     // #94e2d5
        sapphire: Color::Rgb(116, 199, 236), // #74c7ec
        blue: Color::Rgb(137, 180, 250),     // #89b4fa
        lavender: Color::Rgb(180, 190, 254), // #b4befe
    };

    pub const LATTE: Palette = Palette {
        name: "latte",
        bg: Color::Rgb(239, 241, 245),       // #eff1f5 base
        bg_dark: Color::Rgb(220, 224, 232),  // #dce0e8 crust
        surface0: Color::Rgb(204, 208, 218), // #ccd0da
        surface1: Color::Rgb(188, 192, 204), // #bcc0cc
        fg: Color::Rgb(76, 79, 105),         // #4c4f69
        fg_dark: Color::Rgb(92, 95, 119),    // #5c5f77
        overlay: Color::Rgb(140, 143, 161),  // #8c8fa1
        mauve: Color::Rgb(136, 57, 239),     // #8839ef
        red: Color::Rgb(210, 15, 57),        // #d20f39
        peach: Color::Rgb(254, 100, 11),     // #fe640b
        yellow: Color::Rgb(223, 142, 29),    // #df8e1d
        green: Color::Rgb(64, 160, 43),      // #40a02b
        teal: Color::Rgb(23, 146, 153),      // #179299
        sapphire: Color::Rgb(32, 159, 181),  // #209fb5
        blue: Color::Rgb(30, 102, 245),      // #1e66f5
        lavender: Color::Rgb(114, 135, 253), // #7287fd
    };

    /// Palette for a stored theme name; anything unknown is mocha
    pub fn from_name(name: Option<&str>) -> Palette {
        match name {
            Some("latte") => Self::LATTE,
            _ => Self::MOCHA,
        }
    }

    pub fn toggled(&self) -> Palette {
        if self.name == Self::LATTE.name {
            Self::MOCHA
        } else {
            Self::LATTE
        }
    }

    pub fn status_color(&self, status: &ContainerStatus) -> Color {
        match status {
            ContainerStatus::Running => self.green,
            ContainerStatus::Exited | ContainerStatus::Removing | ContainerStatus::Dead => self.red,
            ContainerStatus::Paused | ContainerStatus::Restarting => self.yellow,
            ContainerStatus::Created => self.peach,
            ContainerStatus::Unknown => self.overlay,
        }
    }

    /// Green, yellow, peach, red as usage climbs
    pub fn usage_color(&self, percent: f64) -> Color {
        if percent > 80.0 {
            self.red
        } else if percent > 60.0 {
            self.peach
        } else if percent > 40.0 {
            self.yellow
        } else {
            self.green
        }
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .bg(self.surface0)
            .fg(self.lavender)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.mauve)
        } else {
            Style::default().fg(self.surface0)
        }
    }

    pub fn title_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.lavender).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.overlay)
        }
    }

    /// Highlighted key in a keybinding bar
    pub fn key_span<'a>(&self, key: &'a str) -> Span<'a> {
        Span::styled(
            format!(" {} ", key),
            Style::default()
                .bg(self.mauve)
                .fg(self.bg_dark)
                .add_modifier(Modifier::BOLD),
        )
    }

    /// Description after a key, with trailing separator
    pub fn key_desc_span<'a>(&self, desc: &'a str) -> Span<'a> {
        Span::styled(format!(" {}   ", desc), Style::default().fg(self.fg_dark))
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::MOCHA
    }
}

/// Status icon for a container
pub fn status_icon(status: &ContainerStatus) -> &'static str {
    match status {
        ContainerStatus::Running => "●",
        ContainerStatus::Exited => "○",
        ContainerStatus::Paused => "◐",
        ContainerStatus::Created => "◌",
        ContainerStatus::Restarting => "↻",
        ContainerStatus::Removing => "✕",
        ContainerStatus::Dead => "✖",
        ContainerStatus::Unknown => "◯",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_names() {
        assert_eq!(Palette::from_name(Some("latte")), Palette::LATTE);
        assert_eq!(Palette::from_name(Some("dracula")), Palette::MOCHA);
        assert_eq!(Palette::from_name(None).toggled(), Palette::LATTE);
    }
}
