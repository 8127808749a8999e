//! Recording doubles for the window host seam.

use std::{
    fmt,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use url::Url;

use crate::{
    preferences::PreferenceSource,
    window_host::{GeometryEvent, GeometryListener, HostWindow, WindowHost},
    window_options::WindowOptions,
    window_state::{StateKeeper, WindowBounds, WindowState, WindowStateAdapter, WindowStateError},
};

pub(crate) type Journal = Arc<Mutex<Vec<String>>>;

pub(crate) fn entry_url() -> Url {
    Url::parse("tauri://localhost/index.html").expect("valid entry url")
}

struct MockWindowInner {
    id: String,
    journal: Journal,
    options: Option<WindowOptions>,
    created_url: Option<Url>,
    visible: AtomicBool,
    destroyed: AtomicBool,
    devtools_opened: AtomicBool,
    loads: Mutex<Vec<Url>>,
    geometry_listeners: Mutex<Vec<GeometryListener>>,
}

#[derive(Clone)]
pub(crate) struct MockWindow {
    inner: Arc<MockWindowInner>,
}

impl fmt::Debug for MockWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockWindow")
            .field("id", &self.inner.id)
            .finish()
    }
}

impl MockWindow {
    fn build(id: &str, journal: Journal, url: Option<Url>, options: Option<WindowOptions>) -> Self {
        let visible = options.map(|options| options.show).unwrap_or(false);
        Self {
            inner: Arc::new(MockWindowInner {
                id: id.to_string(),
                journal,
                options,
                created_url: url,
                visible: AtomicBool::new(visible),
                destroyed: AtomicBool::new(false),
                devtools_opened: AtomicBool::new(false),
                loads: Mutex::new(Vec::new()),
                geometry_listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// A window not created through a `MockHost`, with its own journal.
    pub(crate) fn detached(id: &str) -> Self {
        Self::build(id, Journal::default(), None, None)
    }

    fn record(&self, operation: &str) {
        self.inner
            .journal
            .lock()
            .expect("journal lock")
            .push(format!("{operation}:{}", self.inner.id));
    }

    pub(crate) fn set_visible(&self, visible: bool) {
        self.inner.visible.store(visible, Ordering::SeqCst);
    }

    pub(crate) fn options(&self) -> Option<WindowOptions> {
        self.inner.options
    }

    pub(crate) fn created_url(&self) -> Option<Url> {
        self.inner.created_url.clone()
    }

    pub(crate) fn loads(&self) -> Vec<Url> {
        self.inner.loads.lock().expect("loads lock").clone()
    }

    pub(crate) fn geometry_listener_count(&self) -> usize {
        self.inner
            .geometry_listeners
            .lock()
            .expect("listener lock")
            .len()
    }

    pub(crate) fn emit_geometry(&self, event: GeometryEvent) {
        for listener in self
            .inner
            .geometry_listeners
            .lock()
            .expect("listener lock")
            .iter()
        {
            listener(event);
        }
    }

    pub(crate) fn devtools_opened(&self) -> bool {
        self.inner.devtools_opened.load(Ordering::SeqCst)
    }
}

impl HostWindow for MockWindow {
    fn id(&self) -> String {
        self.inner.id.clone()
    }

    fn load_url(&self, url: &Url) -> Result<(), String> {
        self.record("load");
        self.inner.loads.lock().expect("loads lock").push(url.clone());
        Ok(())
    }

    fn show(&self) -> Result<(), String> {
        self.record("show");
        self.set_visible(true);
        Ok(())
    }

    fn hide(&self) -> Result<(), String> {
        self.record("hide");
        self.set_visible(false);
        Ok(())
    }

    fn close(&self) -> Result<(), String> {
        self.record("close");
        Ok(())
    }

    fn destroy(&self) -> Result<(), String> {
        self.record("destroy");
        self.inner.destroyed.store(true, Ordering::SeqCst);
        self.set_visible(false);
        Ok(())
    }

    fn is_visible(&self) -> bool {
        self.inner.visible.load(Ordering::SeqCst)
    }

    fn is_destroyed(&self) -> bool {
        self.inner.destroyed.load(Ordering::SeqCst)
    }

    fn on_geometry_event(&self, listener: GeometryListener) {
        self.record("manage");
        self.inner
            .geometry_listeners
            .lock()
            .expect("listener lock")
            .push(listener);
    }

    fn open_devtools(&self) {
        self.record("devtools");
        self.inner.devtools_opened.store(true, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub(crate) struct MockHost {
    journal: Journal,
    fail_next_create: AtomicBool,
    quit_calls: AtomicUsize,
    forced_exits: Mutex<Vec<Duration>>,
}

impl MockHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn journal(&self) -> Vec<String> {
        self.journal.lock().expect("journal lock").clone()
    }

    pub(crate) fn clear_journal(&self) {
        self.journal.lock().expect("journal lock").clear();
    }

    pub(crate) fn fail_next_create(&self) {
        self.fail_next_create.store(true, Ordering::SeqCst);
    }

    pub(crate) fn quit_calls(&self) -> usize {
        self.quit_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn forced_exits(&self) -> Vec<Duration> {
        self.forced_exits.lock().expect("forced exit lock").clone()
    }
}

impl WindowHost for MockHost {
    type Window = MockWindow;

    fn create_window(
        &self,
        label: &str,
        url: &Url,
        options: &WindowOptions,
    ) -> Result<MockWindow, String> {
        if self.fail_next_create.swap(false, Ordering::SeqCst) {
            self.journal
                .lock()
                .expect("journal lock")
                .push(format!("create-failed:{label}"));
            return Err(format!("simulated failure creating {label}"));
        }

        let window = MockWindow::build(
            label,
            self.journal.clone(),
            Some(url.clone()),
            Some(*options),
        );
        window.record("create");
        Ok(window)
    }

    fn quit(&self) {
        self.journal.lock().expect("journal lock").push("quit".to_string());
        self.quit_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn schedule_forced_exit(&self, after: Duration) {
        self.journal
            .lock()
            .expect("journal lock")
            .push(format!("forced-exit:{}ms", after.as_millis()));
        self.forced_exits
            .lock()
            .expect("forced exit lock")
            .push(after);
    }
}

pub(crate) enum MockStateAdapter {
    Bounds { bounds: WindowBounds, path: PathBuf },
    Failing,
}

impl WindowStateAdapter for MockStateAdapter {
    fn fetch_window_state(&self) -> Result<WindowState, WindowStateError> {
        match self {
            Self::Bounds { bounds, path } => Ok(WindowState {
                usable_state: *bounds,
                state_keeper: StateKeeper::new(path.clone(), *bounds),
            }),
            Self::Failing => Err(WindowStateError::InvalidBounds(
                "simulated adapter failure".to_string(),
            )),
        }
    }
}

pub(crate) struct StaticPreferences(pub(crate) bool);

impl PreferenceSource for StaticPreferences {
    fn is_vibrancy_enabled(&self) -> bool {
        self.0
    }
}
