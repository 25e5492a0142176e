//! Application state for the containers view: the control state, the last
//! good record set and the view built from it.

use std::time::{Duration, Instant};

use crate::error::Result;
use crate::fleet::{
    view, ControlField, ControlStateSync, FilterOptions, FilterState, Generation, RefreshTracker,
    Surface, ViewModel,
};
use crate::models::ContainerRecord;

pub struct AppState {
    sync: ControlStateSync,
    records: Vec<ContainerRecord>,
    view: ViewModel,
    options: FilterOptions,
    refresh: RefreshTracker,
    loaded: bool,
    last_error: Option<String>,
}

impl AppState {
    pub fn new(initial: FilterState, debounce: Duration) -> Self {
        Self {
            sync: ControlStateSync::new(initial, debounce),
            records: Vec::new(),
            view: ViewModel::Empty,
            options: FilterOptions::default(),
            refresh: RefreshTracker::new(),
            loaded: false,
            last_error: None,
        }
    }

    pub fn filters(&self) -> &FilterState {
        self.sync.state()
    }

    pub fn sync(&self) -> &ControlStateSync {
        &self.sync
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn records(&self) -> &[ContainerRecord] {
        &self.records
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    /// Whether any container list has been applied yet
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh.in_flight()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Change a control from one surface. The view itself is rebuilt by
    /// [`poll_rebuild`](Self::poll_rebuild) once the change is due.
    pub fn set_field(
        &mut self,
        surface: Surface,
        field: ControlField,
        value: &str,
        now: Instant,
    ) -> Result<bool> {
        self.sync.set_field(surface, field, value, now)
    }

    /// Advance a select control to its next choice
    pub fn cycle_field(&mut self, surface: Surface, field: ControlField, now: Instant) -> Result<bool> {
        let current = self.sync.control_value(surface, field);
        match self.options.cycle(field, &current) {
            Some(next) => self.sync.set_field(surface, field, &next, now),
            None => Ok(false),
        }
    }

    /// Start a container fetch; the returned generation goes with it
    pub fn begin_refresh(&mut self) -> Generation {
        self.refresh.begin()
    }

    /// Apply a fetch result. Returns false when the response was stale and
    /// dropped. A failed fetch keeps the current records and view.
    pub fn apply_containers(
        &mut self,
        generation: Generation,
        result: Result<Vec<ContainerRecord>>,
    ) -> bool {
        if !self.refresh.accept(generation) {
            return false;
        }

        match result {
            Ok(records) => {
                self.records = records;
                self.options = FilterOptions::collect(&self.records);
                self.loaded = true;
                self.last_error = None;
                self.rebuild();
            }
            Err(e) => {
                tracing::warn!(error = %e, "container refresh failed, keeping last view");
                self.last_error = Some(e.to_string());
            }
        }
        true
    }

    /// Rebuild if a control change is due. Returns whether it did.
    pub fn poll_rebuild(&mut self, now: Instant) -> bool {
        match self.sync.poll_rebuild(now) {
            Some(state) => {
                self.view = view::build(&self.records, &state);
                true
            }
            None => false,
        }
    }

    /// Rebuild from the current records and state right away
    pub fn rebuild(&mut self) {
        self.view = view::build(&self.records, self.sync.state());
    }

    /// When the next debounced rebuild is due
    pub fn next_deadline(&self) -> Option<Instant> {
        self.sync.next_deadline()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(FilterState::default(), crate::fleet::sync::DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::fleet::GroupMode;

    fn record(name: &str, project: &str) -> ContainerRecord {
        let mut r = ContainerRecord::new(format!("id-{}", name), name);
        r.compose_project = Some(project.to_string());
        r
    }

    #[test]
    fn test_failed_refresh_keeps_last_view() {
        let mut state = AppState::default();
        let gen = state.begin_refresh();
        state.apply_containers(gen, Ok(vec![record("web", "site"), record("db", "site")]));
        assert_eq!(state.view().len(), 2);

        let gen = state.begin_refresh();
        state.apply_containers(gen, Err(Error::AllHostsFailed(1)));
        assert_eq!(state.view().len(), 2);
        assert!(state.last_error().unwrap().contains("No Docker host"));
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut state = AppState::default();
        let slow = state.begin_refresh();
        let fast = state.begin_refresh();

        assert!(state.apply_containers(fast, Ok(vec![record("new", "a")])));
        assert!(!state.apply_containers(slow, Ok(vec![record("old", "a")])));
        assert_eq!(state.view().records().next().unwrap().name, "new");
    }

    #[test]
    fn test_control_change_rebuilds_when_due() {
        let mut state = AppState::default();
        let gen = state.begin_refresh();
        state.apply_containers(gen, Ok(vec![record("web", "site"), record("cache", "infra")]));

        let now = Instant::now();
        state.set_field(Surface::Desktop, ControlField::Group, "stack", now).unwrap();
        assert!(state.poll_rebuild(now));
        assert_eq!(state.view().groups().len(), 2);
        assert_eq!(state.filters().group, GroupMode::Stack);

        state.set_field(Surface::Mobile, ControlField::Search, "web", now).unwrap();
        assert!(!state.poll_rebuild(now));
        assert!(state.poll_rebuild(now + Duration::from_millis(300)));
        assert_eq!(state.view().len(), 1);
    }

    #[test]
    fn test_cycle_uses_unfiltered_options() {
        let mut state = AppState::default();
        let gen = state.begin_refresh();
        state.apply_containers(gen, Ok(vec![record("web", "site"), record("cache", "infra")]));

        let now = Instant::now();
        state.cycle_field(Surface::Desktop, ControlField::Stack, now).unwrap();
        assert_eq!(state.filters().stack, "infra");
        state.poll_rebuild(now);
        state.cycle_field(Surface::Desktop, ControlField::Stack, now).unwrap();
        assert_eq!(state.filters().stack, "site");
        state.cycle_field(Surface::Mobile, ControlField::Stack, now).unwrap();
        assert_eq!(state.filters().stack, "");
    }
}
