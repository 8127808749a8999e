use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
};

use url::Url;

use crate::{
    window_host::HostWindow,
    window_state::{StateKeeper, WindowStateError},
    MAIN_WINDOW_LABEL_PREFIX,
};

pub(crate) type TauriShellContext = ShellContext<tauri::WebviewWindow>;

/// Process-wide shell state: which window is the main window and which
/// windows currently have lifecycle listeners attached.
///
/// Only mutated from the host's main thread; the locks exist because managed
/// state has to be `Send + Sync`.
#[derive(Debug)]
pub(crate) struct ShellContext<W> {
    entry_url: Url,
    main_window: Mutex<Option<W>>,
    bound_windows: Mutex<HashSet<String>>,
    pending_shell_loads: Mutex<HashSet<String>>,
    pending_announcements: Mutex<HashSet<String>>,
    state_keepers: Mutex<HashMap<String, StateKeeper>>,
    app_listeners_attached: AtomicBool,
    next_window_seq: AtomicU64,
    pub(crate) is_reloading: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<W: HostWindow> ShellContext<W> {
    pub(crate) fn new(entry_url: Url) -> Self {
        Self {
            entry_url,
            main_window: Mutex::new(None),
            bound_windows: Mutex::new(HashSet::new()),
            pending_shell_loads: Mutex::new(HashSet::new()),
            pending_announcements: Mutex::new(HashSet::new()),
            state_keepers: Mutex::new(HashMap::new()),
            app_listeners_attached: AtomicBool::new(false),
            next_window_seq: AtomicU64::new(1),
            is_reloading: AtomicBool::new(false),
        }
    }

    pub(crate) fn entry_url(&self) -> &Url {
        &self.entry_url
    }

    pub(crate) fn next_window_label(&self) -> String {
        let seq = self.next_window_seq.fetch_add(1, Ordering::Relaxed);
        format!("{MAIN_WINDOW_LABEL_PREFIX}-{seq}")
    }

    pub(crate) fn main_window(&self) -> Option<W> {
        lock(&self.main_window).clone()
    }

    pub(crate) fn main_window_id(&self) -> Option<String> {
        lock(&self.main_window).as_ref().map(HostWindow::id)
    }

    /// Makes `window` the main window and hands back the one it replaced.
    pub(crate) fn replace_main_window(&self, window: W) -> Option<W> {
        lock(&self.main_window).replace(window)
    }

    pub(crate) fn bind_listeners(&self, window_id: &str) {
        lock(&self.bound_windows).insert(window_id.to_string());
        self.app_listeners_attached.store(true, Ordering::Relaxed);
    }

    pub(crate) fn unbind_listeners(&self, window_id: &str) -> bool {
        lock(&self.bound_windows).remove(window_id)
    }

    pub(crate) fn listeners_bound(&self, window_id: &str) -> bool {
        lock(&self.bound_windows).contains(window_id)
    }

    pub(crate) fn app_listeners_attached(&self) -> bool {
        self.app_listeners_attached.load(Ordering::Relaxed)
    }

    /// Marks the next navigation of `window_id` as initiated by the shell.
    pub(crate) fn expect_shell_load(&self, window_id: &str) {
        lock(&self.pending_shell_loads).insert(window_id.to_string());
    }

    pub(crate) fn take_shell_load(&self, window_id: &str) -> bool {
        lock(&self.pending_shell_loads).remove(window_id)
    }

    /// Marks `window_id` as owing a main-window announcement once its
    /// content has loaded.
    pub(crate) fn expect_announcement(&self, window_id: &str) {
        lock(&self.pending_announcements).insert(window_id.to_string());
    }

    pub(crate) fn take_announcement(&self, window_id: &str) -> bool {
        lock(&self.pending_announcements).remove(window_id)
    }

    pub(crate) fn track_state_keeper(&self, window_id: &str, state_keeper: StateKeeper) {
        lock(&self.state_keepers).insert(window_id.to_string(), state_keeper);
    }

    /// Persists the tracked geometry of `window_id`. Windows without a state
    /// keeper have nothing to write.
    pub(crate) fn flush_window_state(&self, window_id: &str) -> Result<(), WindowStateError> {
        let state_keeper = lock(&self.state_keepers).get(window_id).cloned();
        match state_keeper {
            Some(state_keeper) => state_keeper.flush(),
            None => Ok(()),
        }
    }

    pub(crate) fn forget_window(&self, window_id: &str) {
        self.unbind_listeners(window_id);
        self.take_shell_load(window_id);
        self.take_announcement(window_id);
        lock(&self.state_keepers).remove(window_id);
    }
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct ShellBridgeResult {
    pub(crate) ok: bool,
    pub(crate) reason: Option<String>,
}

impl ShellBridgeResult {
    pub(crate) fn success() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    pub(crate) fn failure(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
        }
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MainWindowInfo {
    pub(crate) label: Option<String>,
}

pub(crate) struct AtomicFlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AtomicFlagGuard<'a> {
    pub(crate) fn try_set(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { flag })
    }
}

impl Drop for AtomicFlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}
