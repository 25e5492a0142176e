use anyhow::Result;
use std::str::FromStr;
use std::time::Instant;
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;
use crate::components::status_bar::KeyContext;
use crate::components::{
    ComposeView, ContainerGrid, ContainerTable, FilterBar, FilterMenu, Header, HelpModal,
    StatusBar,
};
use crate::config::Settings;
use crate::event::AppEvent;
use crate::fleet::pending::fetch_fallback;
use crate::fleet::{
    stack, Attempt, ControlField, FilterState, PendingReferenceResolver, RefreshTracker,
    Resolution, SortDirection, Surface,
};
use crate::models::{ContainerRecord, GroupStats};
use crate::poller::Poller;
use crate::source::{ContainerSource, FileSource};
use crate::state::AppState;
use crate::store::{PreferenceStore, RenderSurface};
use crate::ui::{filter_bar_layout, is_desktop, main_layout, Palette};

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Containers,
    Compose,
}

/// Active modal state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    None,
    Help,
}

/// Main application state
pub struct App<C, F> {
    source: C,
    files: F,
    tx: UnboundedSender<AppEvent>,
    settings: Settings,
    prefs: PreferenceStore,
    pending: PendingReferenceResolver<PreferenceStore>,

    // View state
    pub view_mode: ViewMode,
    pub modal: ModalState,
    pub should_quit: bool,
    /// Editing search in the desktop filter bar
    pub searching: bool,
    pub surface: RenderSurface,
    pub palette: Palette,

    pub state: AppState,
    pub compose: ComposeView,
    pub menu: FilterMenu,
    grid: ContainerGrid,
    table: ContainerTable,
    selected: usize,
    desktop: bool,

    poller: Option<Poller>,
    file_refresh: RefreshTracker,
    message: Option<String>,
}

impl<C, F> App<C, F>
where
    C: ContainerSource + Clone + Send + Sync + 'static,
    F: FileSource + Clone + Send + Sync + 'static,
{
    pub fn new(
        settings: Settings,
        source: C,
        files: F,
        prefs: PreferenceStore,
        tx: UnboundedSender<AppEvent>,
    ) -> Self {
        let surface = prefs.render_surface();
        let palette = Palette::from_name(prefs.theme().as_deref());
        let state = AppState::new(FilterState::default(), settings.search_debounce());

        Self {
            source,
            files,
            tx,
            pending: PendingReferenceResolver::new(prefs.clone()),
            prefs,
            settings,
            view_mode: ViewMode::Containers,
            modal: ModalState::None,
            should_quit: false,
            searching: false,
            surface,
            palette,
            state,
            compose: ComposeView::new(),
            menu: FilterMenu::new(),
            grid: ContainerGrid::new(),
            table: ContainerTable::new(),
            selected: 0,
            desktop: true,
            poller: None,
            file_refresh: RefreshTracker::new(),
            message: None,
        }
    }

    /// Show the first view. Needs a running tokio runtime.
    pub fn start(&mut self) {
        self.show_view(ViewMode::Containers);
    }

    /// Desktop or mobile controls, as the last render decided
    pub fn set_desktop(&mut self, desktop: bool) {
        self.desktop = desktop;
        if !desktop {
            self.searching = false;
        }
    }

    fn control_surface(&self) -> Surface {
        if self.menu.open || !self.desktop {
            Surface::Mobile
        } else {
            Surface::Desktop
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_record(&self) -> Option<&ContainerRecord> {
        self.state.view().record_at(self.selected)
    }

    /// Last warning or error for the status line
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().or(self.state.last_error())
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(Poller::is_running)
    }

    fn show_view(&mut self, mode: ViewMode) {
        self.view_mode = mode;
        match mode {
            ViewMode::Containers => {
                self.poller = Some(Poller::start(self.settings.refresh_interval(), self.tx.clone()));
                self.refresh_containers();
            }
            ViewMode::Compose => {
                // dropping the poller stops it
                self.poller = None;
                self.refresh_files();
            }
        }
    }

    pub fn refresh_containers(&mut self) {
        let generation = self.state.begin_refresh();
        let source = self.source.clone();
        let filters = self.state.filters().clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let result = source.fetch_containers(&filters).await;
            let _ = tx.send(AppEvent::Containers { generation, result });
        });
    }

    pub fn refresh_files(&mut self) {
        let generation = self.file_refresh.begin();
        let files = self.files.clone();
        let tx = self.tx.clone();
        self.compose.loading = true;

        tokio::spawn(async move {
            let result = files.fetch_file_list().await;
            let _ = tx.send(AppEvent::FileList { generation, result });
        });
    }

    fn load_file(&mut self, id: String) {
        let files = self.files.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let result = files.fetch_file_content(&id).await;
            let _ = tx.send(AppEvent::FileContent { id, result });
        });
    }

    /// Jump to the compose file of the selected container's stack. The
    /// target is remembered and picked up once the compose list arrives.
    pub fn open_stack_compose(&mut self) {
        let Some(record) = self.selected_record() else {
            return;
        };
        let key = stack::resolve(record);
        let members: Vec<ContainerRecord> = self
            .state
            .records()
            .iter()
            .filter(|r| stack::resolve(r) == key)
            .cloned()
            .collect();
        let Some(path) = stack::compose_file_for_stack(&members) else {
            return;
        };

        if let Err(e) = self.pending.remember(&path) {
            tracing::warn!(error = %e, "failed to store compose reference");
            self.message = Some(format!("Could not open compose file: {}", e));
            return;
        }
        tracing::info!(stack = %key, path = %path, "opening stack compose file");
        self.show_view(ViewMode::Compose);
    }

    fn resolve_pending(&mut self) {
        match self.pending.attempt(&self.compose.files) {
            Attempt::Idle => {}
            Attempt::Matched(id) => {
                self.compose.select(&id);
                self.load_file(id);
            }
            Attempt::Unmatched(reference) => {
                let files = self.files.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let resolution = fetch_fallback(&files, &reference).await;
                    let _ = tx.send(AppEvent::Resolved(resolution));
                });
            }
        }
    }

    /// Apply a message from a background task
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::PollTick => {
                if self.view_mode == ViewMode::Containers {
                    self.refresh_containers();
                }
            }
            AppEvent::Containers { generation, result } => {
                if self.state.apply_containers(generation, result) {
                    self.clamp_selection();
                }
            }
            AppEvent::FileList { generation, result } => {
                if !self.file_refresh.accept(generation) {
                    return;
                }
                match result {
                    Ok(files) => {
                        self.compose.set_files(files);
                        self.resolve_pending();
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "compose scan failed");
                        self.compose.loading = false;
                        self.message = Some(format!("Compose scan failed: {}", e));
                    }
                }
            }
            AppEvent::FileContent { id, result } => match result {
                Ok(content) => self.compose.show_content(id, content),
                Err(e) => {
                    tracing::warn!(file = %id, error = %e, "failed to read compose file");
                    self.message = Some(e.to_string());
                }
            },
            AppEvent::Resolved(resolution) => match resolution {
                Resolution::Matched(id) => {
                    self.compose.select(&id);
                    self.load_file(id);
                }
                Resolution::Fetched { id, content } => self.compose.show_content(id, content),
                Resolution::NotFound(reference) => {
                    self.message = Some(format!("Compose file not found: {}", reference));
                }
            },
        }
    }

    /// Run a due control rebuild, then refetch with the settled filters
    pub fn tick(&mut self, now: Instant) {
        if self.state.poll_rebuild(now) {
            self.clamp_selection();
            if self.view_mode == ViewMode::Containers {
                self.refresh_containers();
            }
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.state.next_deadline()
    }

    fn clamp_selection(&mut self) {
        let len = self.state.view().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn set_control(&mut self, surface: Surface, field: ControlField, value: &str, now: Instant) {
        if let Err(e) = self.state.set_field(surface, field, value, now) {
            self.message = Some(e.to_string());
        }
    }

    fn cycle_control(&mut self, surface: Surface, field: ControlField, now: Instant) {
        if let Err(e) = self.state.cycle_field(surface, field, now) {
            self.message = Some(e.to_string());
        }
    }

    fn move_selection(&mut self, action: &Action) {
        let len = self.state.view().len();
        if len == 0 {
            return;
        }
        let last = len - 1;
        let columns = match self.surface {
            RenderSurface::Grid => self.grid.columns(),
            RenderSurface::Table => 1,
        };
        self.selected = match action {
            Action::Up => self.selected.saturating_sub(columns),
            Action::Down => (self.selected + columns).min(last),
            Action::Left if columns > 1 => self.selected.saturating_sub(1),
            Action::Right if columns > 1 => (self.selected + 1).min(last),
            Action::PageUp => self.selected.saturating_sub(columns * 5),
            Action::PageDown => (self.selected + columns * 5).min(last),
            Action::Top => 0,
            Action::Bottom => last,
            _ => self.selected,
        };
    }

    pub fn handle_action(&mut self, action: Action, now: Instant) -> Result<()> {
        match action {
            Action::Quit => self.should_quit = true,

            Action::Up | Action::Down if self.menu.open => {
                if action == Action::Up {
                    self.menu.previous();
                } else {
                    self.menu.next();
                }
            }

            Action::Up
            | Action::Down
            | Action::Left
            | Action::Right
            | Action::Top
            | Action::Bottom
            | Action::PageUp
            | Action::PageDown => match self.view_mode {
                ViewMode::Containers => self.move_selection(&action),
                ViewMode::Compose => match action {
                    Action::Up => self.compose.previous(),
                    Action::Down => self.compose.next(),
                    Action::PageUp => self.compose.scroll_up(10),
                    Action::PageDown => self.compose.scroll_down(10),
                    _ => {}
                },
            },

            Action::StartSearch => {
                if self.desktop {
                    self.searching = true;
                } else {
                    self.menu.show();
                    self.menu.focus(ControlField::Search);
                    self.menu.editing = true;
                }
            }

            Action::SearchInput(c) => {
                let surface = self.control_surface();
                let mut query = self.state.sync().control_value(surface, ControlField::Search);
                query.push(c);
                self.set_control(surface, ControlField::Search, &query, now);
            }

            Action::SearchBackspace => {
                let surface = self.control_surface();
                let mut query = self.state.sync().control_value(surface, ControlField::Search);
                query.pop();
                self.set_control(surface, ControlField::Search, &query, now);
            }

            Action::EndSearch => {
                self.searching = false;
                self.menu.editing = false;
            }

            Action::CancelSearch => {
                let surface = self.control_surface();
                self.set_control(surface, ControlField::Search, "", now);
                self.searching = false;
                self.menu.editing = false;
            }

            Action::CycleField(field) => {
                let surface = self.control_surface();
                self.cycle_control(surface, field, now);
            }

            Action::ToggleSortDirection => {
                let surface = self.control_surface();
                let current = self.state.sync().control_value(surface, ControlField::SortDirection);
                let next = SortDirection::from_str(&current)?.toggled();
                self.set_control(surface, ControlField::SortDirection, next.as_str(), now);
            }

            Action::OpenFilterMenu => self.menu.show(),

            Action::MenuActivate => {
                let field = self.menu.field();
                if field.is_free_text() {
                    self.menu.editing = true;
                } else {
                    self.cycle_control(Surface::Mobile, field, now);
                }
            }

            Action::ToggleSurface => {
                self.surface = self.surface.toggled();
                if let Err(e) = self.prefs.set_render_surface(self.surface) {
                    tracing::warn!(error = %e, "failed to save view preference");
                }
            }

            Action::ToggleTheme => {
                self.palette = self.palette.toggled();
                if let Err(e) = self.prefs.set_theme(self.palette.name) {
                    tracing::warn!(error = %e, "failed to save theme");
                }
            }

            Action::SwitchView => {
                let next = match self.view_mode {
                    ViewMode::Containers => ViewMode::Compose,
                    ViewMode::Compose => ViewMode::Containers,
                };
                self.show_view(next);
            }

            Action::OpenStackCompose => self.open_stack_compose(),

            Action::OpenSelectedFile => {
                if let Some(id) = self.compose.selected_file().map(str::to_string) {
                    self.load_file(id);
                }
            }

            Action::ShowHelp => self.modal = ModalState::Help,

            Action::CloseModal => {
                self.modal = ModalState::None;
                self.menu.close();
                self.message = None;
                self.state.clear_error();
            }

            Action::Refresh => {
                self.message = None;
                match self.view_mode {
                    ViewMode::Containers => self.refresh_containers(),
                    ViewMode::Compose => self.refresh_files(),
                }
            }

            Action::None => {}
        }

        Ok(())
    }

    pub fn render(&mut self, frame: &mut ratatui::Frame) {
        use ratatui::prelude::Style;
        use ratatui::widgets::Block;

        let area = frame.area();
        self.set_desktop(is_desktop(area));

        frame.render_widget(Block::default().style(Style::default().bg(self.palette.bg)), area);

        let (header_area, body, footer) = main_layout(area);

        let fleet = GroupStats::from_members(self.state.records());
        let busy = self.state.is_refreshing() || self.compose.loading;
        Header::render(frame, header_area, &fleet, busy, &self.palette);

        match self.view_mode {
            ViewMode::Containers => {
                let content = if self.desktop {
                    let (bar, rest) = filter_bar_layout(body);
                    FilterBar::render(
                        frame,
                        bar,
                        self.state.sync(),
                        self.searching,
                        self.state.view().len(),
                        self.state.records().len(),
                        &self.palette,
                    );
                    rest
                } else {
                    body
                };

                match self.surface {
                    RenderSurface::Grid => {
                        self.grid.render(frame, content, self.state.view(), self.selected, &self.palette)
                    }
                    RenderSurface::Table => {
                        self.table.render(frame, content, self.state.view(), self.selected, &self.palette)
                    }
                }

                if self.menu.open {
                    self.menu.render(frame, body, self.state.sync(), &self.palette);
                }
            }
            ViewMode::Compose => self.compose.render(frame, body, &self.palette),
        }

        let context = if self.searching || self.menu.editing {
            KeyContext::Search
        } else if self.menu.open {
            KeyContext::FilterMenu
        } else if self.view_mode == ViewMode::Compose {
            KeyContext::Compose
        } else {
            KeyContext::Containers
        };
        StatusBar::render(frame, footer, context, self.message(), &self.palette);

        if self.modal == ModalState::Help {
            HelpModal::render(frame, area, &self.palette);
        }
    }
}
