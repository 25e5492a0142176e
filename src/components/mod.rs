pub mod compose_view;
pub mod container_grid;
pub mod container_table;
pub mod filter_bar;
pub mod filter_menu;
pub mod header;
pub mod help_modal;
pub mod status_bar;

pub use compose_view::ComposeView;
pub use container_grid::ContainerGrid;
pub use container_table::ContainerTable;
pub use filter_bar::FilterBar;
pub use filter_menu::FilterMenu;
pub use header::Header;
pub use help_modal::HelpModal;
pub use status_bar::StatusBar;

use crate::models::ContainerRecord;

/// Progress bar string of `width` cells
pub(crate) fn make_bar(percent: f64, width: usize) -> String {
    const PARTIAL: &[char] = &[' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

    let clamped = if percent.is_finite() { percent.clamp(0.0, 100.0) } else { 0.0 };
    let filled = (clamped / 100.0) * width as f64;
    let full = filled as usize;
    let partial = ((filled - full as f64) * 8.0).round() as usize;

    (0..width)
        .map(|i| {
            if i < full {
                '█'
            } else if i == full && partial > 0 {
                PARTIAL[partial]
            } else {
                '░'
            }
        })
        .collect()
}

/// Truncate to `max` characters with an ellipsis
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else if max == 0 {
        String::new()
    } else {
        let kept: String = text.chars().take(max - 1).collect();
        format!("{}…", kept)
    }
}

/// CPU, memory and uptime cells. Stopped containers show dashes.
pub(crate) fn usage_cells(record: &ContainerRecord) -> (String, String, String) {
    if !record.status.is_running() {
        return ("-".into(), "-".into(), "-".into());
    }
    let cpu = match record.cpu_percent {
        Some(_) => format!("{:.1}%", record.cpu()),
        None => "...".into(),
    };
    let mem = match record.memory_usage_mb {
        Some(_) => format!("{:.0} MB", record.memory_mb()),
        None => "...".into(),
    };
    let uptime = record
        .uptime
        .as_ref()
        .map(|u| u.display.clone())
        .unwrap_or_else(|| "N/A".into());
    (cpu, mem, uptime)
}

/// Wrapping cursor movement shared by the list-like components
pub(crate) fn step(selected: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    match (forward, selected) {
        (true, i) if i + 1 >= len => 0,
        (true, i) => i + 1,
        (false, 0) => len - 1,
        (false, i) => (i - 1).min(len - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContainerStatus;

    #[test]
    fn test_make_bar() {
        assert_eq!(make_bar(0.0, 4), "░░░░");
        assert_eq!(make_bar(100.0, 4), "████");
        assert_eq!(make_bar(50.0, 4), "██░░");
        assert_eq!(make_bar(f64::NAN, 2), "░░");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("immich_server", 6), "immic…");
        assert_eq!(truncate("héllo", 5), "héllo");
    }

    #[test]
    fn test_usage_cells() {
        let mut r = ContainerRecord::new("1", "web");
        assert_eq!(usage_cells(&r), ("-".into(), "-".into(), "-".into()));
        r.status = ContainerStatus::Running;
        r.cpu_percent = Some(12.345);
        assert_eq!(usage_cells(&r).0, "12.3%");
        assert_eq!(usage_cells(&r).1, "...");
    }

    #[test]
    fn test_step_wraps() {
        assert_eq!(step(2, 3, true), 0);
        assert_eq!(step(0, 3, false), 2);
        assert_eq!(step(5, 3, false), 2);
        assert_eq!(step(0, 0, true), 0);
    }
}
