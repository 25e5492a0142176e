use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use composr_tui::action::Action;
use composr_tui::app::{App, ModalState, ViewMode};
use composr_tui::compose::ComposeFiles;
use composr_tui::config::{self, Settings};
use composr_tui::docker::FleetClient;
use composr_tui::fleet::ControlField;
use composr_tui::store::{PreferenceStore, PREFS_FILE};
use composr_tui::{logging, tui};

type DashboardApp = App<FleetClient, ComposeFiles>;

#[tokio::main]
async fn main() -> Result<()> {
    let data_dir = config::data_dir();
    let log_file = logging::init(data_dir.as_deref())?;

    let settings = Settings::load_default()?;
    tracing::info!(
        compose_dir = %settings.compose_dir.display(),
        hosts = settings.hosts.len(),
        log = ?log_file,
        "starting composr-tui"
    );

    let client = FleetClient::connect(&settings.hosts, settings.compose_dir.clone())
        .context("Failed to set up Docker connections")?;
    let files = ComposeFiles::from_settings(&settings);
    let prefs = match &data_dir {
        Some(dir) => PreferenceStore::open(dir.join(PREFS_FILE)),
        None => PreferenceStore::in_memory(),
    };
    let tick_rate = settings.tick_rate();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(settings, client, files, prefs, tx);
    app.start();

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app, &mut rx, tick_rate);
    tui::restore()?;
    result
}

fn run(
    terminal: &mut tui::Tui,
    app: &mut DashboardApp,
    rx: &mut mpsc::UnboundedReceiver<composr_tui::event::AppEvent>,
    tick_rate: Duration,
) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        // Wake up for the next debounced rebuild if it comes before the tick
        let timeout = app
            .next_deadline()
            .map(|due| due.saturating_duration_since(Instant::now()).min(tick_rate))
            .unwrap_or(tick_rate);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let action = handle_key_event(app, key);
                    app.handle_action(action, Instant::now())?;
                }
            }
        }

        while let Ok(event) = rx.try_recv() {
            app.handle_event(event);
        }
        app.tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Convert key events to actions based on current state
fn handle_key_event(app: &DashboardApp, key: KeyEvent) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    if app.modal != ModalState::None {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => Action::CloseModal,
            _ => Action::None,
        };
    }

    if app.searching || app.menu.editing {
        return handle_search_key(key);
    }

    if app.menu.open {
        return match key.code {
            KeyCode::Up => Action::Up,
            KeyCode::Down => Action::Down,
            KeyCode::Enter | KeyCode::Right | KeyCode::Char(' ') => Action::MenuActivate,
            KeyCode::Esc | KeyCode::Char('f') => Action::CloseModal,
            KeyCode::Char('q') => Action::Quit,
            _ => Action::None,
        };
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('?') => return Action::ShowHelp,
        KeyCode::Tab => return Action::SwitchView,
        KeyCode::Char('r') => return Action::Refresh,
        KeyCode::Char('T') => return Action::ToggleTheme,
        KeyCode::Esc => return Action::CloseModal,
        _ => {}
    }

    match app.view_mode {
        ViewMode::Containers => handle_containers_key(key),
        ViewMode::Compose => handle_compose_key(key),
    }
}

fn handle_search_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::EndSearch,
        KeyCode::Esc => Action::CancelSearch,
        KeyCode::Backspace => Action::SearchBackspace,
        KeyCode::Char(c) => Action::SearchInput(c),
        _ => Action::None,
    }
}

fn handle_containers_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Up => Action::Up,
        KeyCode::Down => Action::Down,
        KeyCode::Left => Action::Left,
        KeyCode::Right => Action::Right,
        KeyCode::Home => Action::Top,
        KeyCode::End => Action::Bottom,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,

        KeyCode::Char('/') => Action::StartSearch,
        KeyCode::Char('s') => Action::CycleField(ControlField::Status),
        KeyCode::Char('t') => Action::CycleField(ControlField::Tag),
        KeyCode::Char('k') => Action::CycleField(ControlField::Stack),
        KeyCode::Char('h') => Action::CycleField(ControlField::Host),
        KeyCode::Char('g') => Action::CycleField(ControlField::Group),
        KeyCode::Char('o') => Action::CycleField(ControlField::SortKey),
        KeyCode::Char('O') => Action::ToggleSortDirection,
        KeyCode::Char('f') => Action::OpenFilterMenu,
        KeyCode::Char('v') => Action::ToggleSurface,
        KeyCode::Char('e') | KeyCode::Enter => Action::OpenStackCompose,
        _ => Action::None,
    }
}

fn handle_compose_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Up => Action::Up,
        KeyCode::Down => Action::Down,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Enter => Action::OpenSelectedFile,
        _ => Action::None,
    }
}
