use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::mpsc::{self, UnboundedReceiver};

use composr_tui::action::Action;
use composr_tui::app::{App, ViewMode};
use composr_tui::config::Settings;
use composr_tui::event::AppEvent;
use composr_tui::fleet::{ControlField, FilterState, GroupMode, Surface};
use composr_tui::models::{ContainerRecord, ContainerStatus};
use composr_tui::source::{ContainerSource, FileSource};
use composr_tui::store::PreferenceStore;
use composr_tui::{Error, Result};

#[derive(Clone)]
struct FakeFleet {
    records: Arc<Vec<ContainerRecord>>,
    fail: Arc<AtomicBool>,
    fetches: Arc<AtomicUsize>,
    last_filters: Arc<Mutex<Option<FilterState>>>,
}

impl ContainerSource for FakeFleet {
    async fn fetch_containers(&self, filters: &FilterState) -> Result<Vec<ContainerRecord>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        *self.last_filters.lock().unwrap() = Some(filters.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::AllHostsFailed(1));
        }
        Ok(self.records.as_ref().clone())
    }
}

#[derive(Clone)]
struct FakeFiles {
    list: Vec<String>,
    contents: Arc<HashMap<String, String>>,
}

impl FileSource for FakeFiles {
    async fn fetch_file_list(&self) -> Result<Vec<String>> {
        Ok(self.list.clone())
    }

    async fn fetch_file_content(&self, id: &str) -> Result<String> {
        self.contents
            .get(id)
            .cloned()
            .ok_or_else(|| Error::FileNotFound(id.to_string()))
    }
}

type TestApp = App<FakeFleet, FakeFiles>;

fn record(name: &str, project: &str, compose_file: Option<&str>) -> ContainerRecord {
    let mut r = ContainerRecord::new(format!("id-{}", name), name);
    r.status = ContainerStatus::Running;
    r.compose_project = Some(project.to_string());
    r.compose_file = compose_file.map(str::to_string);
    r
}

struct Harness {
    app: TestApp,
    rx: UnboundedReceiver<AppEvent>,
    prefs: PreferenceStore,
    fail: Arc<AtomicBool>,
    fleet: FakeFleet,
}

impl Harness {
    fn fetches(&self) -> usize {
        self.fleet.fetches.load(Ordering::SeqCst)
    }
}

fn harness(records: Vec<ContainerRecord>, list: &[&str], contents: &[(&str, &str)]) -> Harness {
    let fail = Arc::new(AtomicBool::new(false));
    let fleet = FakeFleet {
        records: Arc::new(records),
        fail: fail.clone(),
        fetches: Arc::new(AtomicUsize::new(0)),
        last_filters: Arc::new(Mutex::new(None)),
    };
    let files = FakeFiles {
        list: list.iter().map(|s| s.to_string()).collect(),
        contents: Arc::new(
            contents
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ),
    };
    let prefs = PreferenceStore::in_memory();
    let (tx, rx) = mpsc::unbounded_channel();
    let app = App::new(Settings::default(), fleet.clone(), files, prefs.clone(), tx);

    Harness {
        app,
        rx,
        prefs,
        fail,
        fleet,
    }
}

/// Feed background events into the app until `done` holds
async fn pump(h: &mut Harness, done: impl Fn(&TestApp) -> bool) {
    while !done(&h.app) {
        let event = tokio::time::timeout(Duration::from_secs(2), h.rx.recv())
            .await
            .expect("timed out waiting for an app event")
            .expect("event channel closed");
        h.app.handle_event(event);
    }
}

async fn started(h: &mut Harness) {
    h.app.start();
    assert!(h.app.is_polling());
    pump(h, |app| app.state.is_loaded()).await;
}

#[tokio::test]
async fn test_stack_compose_navigation_matches_extension_variant() {
    let mut h = harness(
        vec![
            record("immich-db", "immich", None),
            record("immich-server", "immich", Some("immich/docker-compose.yml")),
        ],
        &["media/compose.yml", "immich/docker-compose.yaml"],
        &[("immich/docker-compose.yaml", "services: {}")],
    );
    started(&mut h).await;

    h.app.handle_action(Action::OpenStackCompose, Instant::now()).unwrap();
    assert_eq!(h.app.view_mode, ViewMode::Compose);
    assert!(!h.app.is_polling());
    assert!(h.prefs.snapshot().pending_compose_file.is_some());

    pump(&mut h, |app| app.compose.open.is_some()).await;

    assert_eq!(
        h.app.compose.open,
        Some(("immich/docker-compose.yaml".to_string(), "services: {}".to_string()))
    );
    assert_eq!(h.app.compose.selected_file(), Some("immich/docker-compose.yaml"));
    assert!(h.prefs.snapshot().pending_compose_file.is_none());
}

#[tokio::test]
async fn test_unmatched_reference_falls_back_to_direct_fetch() {
    let mut h = harness(
        vec![record("ghost", "ghost", Some("ghost/compose.yml"))],
        &["media/docker-compose.yml"],
        &[("ghost/compose.yaml", "services:\n  ghost: {}\n")],
    );
    started(&mut h).await;

    h.app.handle_action(Action::OpenStackCompose, Instant::now()).unwrap();
    pump(&mut h, |app| app.compose.open.is_some()).await;

    let (id, content) = h.app.compose.open.clone().unwrap();
    assert_eq!(id, "ghost/compose.yaml");
    assert!(content.contains("ghost"));
    assert!(h.prefs.snapshot().pending_compose_file.is_none());
}

#[tokio::test]
async fn test_missing_compose_file_reports_once() {
    let mut h = harness(
        vec![record("ghost", "ghost", Some("ghost/compose.yml"))],
        &["media/docker-compose.yml"],
        &[],
    );
    started(&mut h).await;

    h.app.handle_action(Action::OpenStackCompose, Instant::now()).unwrap();
    pump(&mut h, |app| app.message().is_some()).await;

    assert_eq!(
        h.app.message(),
        Some("Compose file not found: ghost/compose.yml")
    );
    assert!(h.app.compose.open.is_none());

    // A second scan has nothing left to resolve
    h.app.handle_action(Action::CloseModal, Instant::now()).unwrap();
    h.app.handle_action(Action::Refresh, Instant::now()).unwrap();
    pump(&mut h, |app| !app.compose.loading).await;
    assert_eq!(h.app.message(), None);
}

#[tokio::test]
async fn test_failed_refresh_keeps_the_view() {
    let mut h = harness(
        vec![record("web", "site", None), record("db", "site", None)],
        &[],
        &[],
    );
    started(&mut h).await;
    assert_eq!(h.app.state.view().len(), 2);

    h.fail.store(true, Ordering::SeqCst);
    h.app.handle_action(Action::Refresh, Instant::now()).unwrap();
    pump(&mut h, |app| !app.state.is_refreshing()).await;

    assert_eq!(h.app.state.view().len(), 2);
    assert_eq!(h.app.state.records().len(), 2);
    let message = h.app.message().unwrap_or_default();
    assert!(message.contains("No Docker host"), "got {:?}", message);

    h.fail.store(false, Ordering::SeqCst);
    h.app.handle_action(Action::Refresh, Instant::now()).unwrap();
    pump(&mut h, |app| !app.state.is_refreshing()).await;
    assert_eq!(h.app.message(), None);
}

#[tokio::test]
async fn test_search_rebuilds_after_quiet_period() {
    let mut h = harness(
        vec![record("web", "site", None), record("db", "site", None)],
        &[],
        &[],
    );
    started(&mut h).await;

    let t0 = Instant::now();
    h.app.handle_action(Action::StartSearch, t0).unwrap();
    assert!(h.app.searching);
    h.app.handle_action(Action::SearchInput('w'), t0).unwrap();

    assert_eq!(
        h.app.state.sync().control_value(Surface::Mobile, ControlField::Search),
        "w"
    );
    assert_eq!(h.app.next_deadline(), Some(t0 + Duration::from_millis(300)));

    h.app.tick(t0 + Duration::from_millis(100));
    assert_eq!(h.app.state.view().len(), 2);

    h.app.tick(t0 + Duration::from_millis(300));
    assert_eq!(h.app.state.view().len(), 1);
    assert_eq!(h.app.selected_record().map(|r| r.name.as_str()), Some("web"));

    h.app.handle_action(Action::EndSearch, t0).unwrap();
    assert!(!h.app.searching);
}

#[tokio::test]
async fn test_switching_views_restarts_polling() {
    let mut h = harness(vec![record("web", "site", None)], &["site/compose.yml"], &[]);
    started(&mut h).await;

    h.app.handle_action(Action::SwitchView, Instant::now()).unwrap();
    assert_eq!(h.app.view_mode, ViewMode::Compose);
    assert!(!h.app.is_polling());
    pump(&mut h, |app| !app.compose.files.is_empty()).await;

    h.app.handle_action(Action::SwitchView, Instant::now()).unwrap();
    assert_eq!(h.app.view_mode, ViewMode::Containers);
    assert!(h.app.is_polling());
}

#[tokio::test]
async fn test_settled_control_changes_refetch_with_current_filters() {
    let mut h = harness(
        vec![record("web", "site", None), record("db", "site", None)],
        &[],
        &[],
    );
    started(&mut h).await;
    assert_eq!(h.fetches(), 1);

    let t0 = Instant::now();
    h.app.handle_action(Action::CycleField(ControlField::Group), t0).unwrap();
    h.app.tick(t0);
    pump(&mut h, |app| !app.state.is_refreshing()).await;
    assert_eq!(h.fetches(), 2);

    h.app.handle_action(Action::StartSearch, t0).unwrap();
    h.app.handle_action(Action::SearchInput('w'), t0).unwrap();
    h.app.handle_action(Action::SearchInput('e'), t0 + Duration::from_millis(100)).unwrap();
    h.app.tick(t0 + Duration::from_millis(300));
    assert_eq!(h.fetches(), 2);

    h.app.tick(t0 + Duration::from_millis(400));
    pump(&mut h, |app| !app.state.is_refreshing()).await;
    assert_eq!(h.fetches(), 3);

    let seen = h.fleet.last_filters.lock().unwrap().clone().unwrap();
    assert_eq!(seen.search, "we");
    assert_eq!(seen.group, GroupMode::Stack);
    assert_eq!(h.app.state.view().len(), 1);
}
