use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, PoisonError,
    },
    thread,
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{
    append_window_log,
    window_host::{GeometryEvent, HostWindow},
    DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH,
    WINDOW_STATE_SAVE_DEBOUNCE,
};

/// Persisted geometry of the main window, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WindowBounds {
    #[serde(default)]
    pub(crate) x: Option<f64>,
    #[serde(default)]
    pub(crate) y: Option<f64>,
    pub(crate) width: f64,
    pub(crate) height: f64,
    #[serde(default)]
    pub(crate) is_maximized: bool,
    #[serde(default)]
    pub(crate) is_full_screen: bool,
}

impl WindowBounds {
    pub(crate) fn default_size() -> Self {
        Self {
            x: None,
            y: None,
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
            is_maximized: false,
            is_full_screen: false,
        }
    }

    pub(crate) fn validated(self) -> Result<Self, WindowStateError> {
        let size_ok = self.width.is_finite()
            && self.height.is_finite()
            && self.width >= MIN_WINDOW_WIDTH
            && self.height >= MIN_WINDOW_HEIGHT;
        if !size_ok {
            return Err(WindowStateError::InvalidBounds(format!(
                "size {}x{} is below {}x{} or not finite",
                self.width, self.height, MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT
            )));
        }

        let position_ok = [self.x, self.y]
            .into_iter()
            .flatten()
            .all(|coordinate| coordinate.is_finite());
        if !position_ok {
            return Err(WindowStateError::InvalidBounds(
                "position is not finite".to_string(),
            ));
        }

        Ok(self)
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum WindowStateError {
    #[error("window state path is unavailable")]
    PathUnavailable,
    #[error("failed to read window state {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse window state {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid window bounds: {0}")]
    InvalidBounds(String),
    #[error("failed to serialize window state: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write window state {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

pub(crate) struct WindowState {
    pub(crate) usable_state: WindowBounds,
    pub(crate) state_keeper: StateKeeper,
}

pub(crate) trait WindowStateAdapter {
    fn fetch_window_state(&self) -> Result<WindowState, WindowStateError>;
}

/// Tracks the geometry of one window. Moves and resizes are written back
/// after a quiet period; closing writes immediately.
#[derive(Debug, Clone)]
pub(crate) struct StateKeeper {
    path: PathBuf,
    current: Arc<Mutex<WindowBounds>>,
    save_seq: Arc<AtomicU64>,
    save_debounce: Duration,
}

impl StateKeeper {
    pub(crate) fn new(path: PathBuf, initial: WindowBounds) -> Self {
        Self {
            path,
            current: Arc::new(Mutex::new(initial)),
            save_seq: Arc::new(AtomicU64::new(0)),
            save_debounce: WINDOW_STATE_SAVE_DEBOUNCE,
        }
    }

    pub(crate) fn with_save_debounce(mut self, save_debounce: Duration) -> Self {
        self.save_debounce = save_debounce;
        self
    }

    pub(crate) fn bounds(&self) -> WindowBounds {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Maximized and full-screen geometry is not remembered as the normal
    /// size, only the flags are, so un-maximizing after a restart lands on
    /// the last normal bounds.
    pub(crate) fn record(&self, observed: WindowBounds) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if observed.is_maximized || observed.is_full_screen {
            current.is_maximized = observed.is_maximized;
            current.is_full_screen = observed.is_full_screen;
            return;
        }

        if observed.validated().is_ok() {
            *current = observed;
        }
    }

    pub(crate) fn save(&self) -> Result<(), WindowStateError> {
        write_bounds(&self.path, &self.bounds())
    }

    /// Writes the current bounds now and drops any pending debounced save.
    pub(crate) fn flush(&self) -> Result<(), WindowStateError> {
        self.save_seq.fetch_add(1, Ordering::SeqCst);
        self.save()
    }

    fn schedule_save(&self) {
        let seq = self.save_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let keeper = self.clone();
        let spawned = thread::Builder::new()
            .name("window-state-save".to_string())
            .spawn(move || {
                thread::sleep(keeper.save_debounce);
                if keeper.save_seq.load(Ordering::SeqCst) != seq {
                    return;
                }
                if let Err(error) = keeper.save() {
                    append_window_log(&format!("failed to persist window state: {error}"));
                }
            });
        if let Err(error) = spawned {
            append_window_log(&format!("failed to schedule window state save: {error}"));
        }
    }

    pub(crate) fn manage<W: HostWindow>(&self, window: &W) {
        let keeper = self.clone();
        window.on_geometry_event(Box::new(move |event| match event {
            GeometryEvent::Changed(bounds) => {
                keeper.record(bounds);
                keeper.schedule_save();
            }
            GeometryEvent::Closing => {
                if let Err(error) = keeper.flush() {
                    append_window_log(&format!("failed to persist window state: {error}"));
                }
            }
        }));
    }
}

fn write_bounds(path: &Path, bounds: &WindowBounds) -> Result<(), WindowStateError> {
    if let Some(parent_dir) = path.parent() {
        fs::create_dir_all(parent_dir).map_err(|source| WindowStateError::Write {
            path: parent_dir.to_path_buf(),
            source,
        })?;
    }

    let serialized = serde_json::to_string_pretty(bounds).map_err(WindowStateError::Serialize)?;
    fs::write(path, serialized).map_err(|source| WindowStateError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) struct FileWindowStateAdapter {
    path: Option<PathBuf>,
}

impl FileWindowStateAdapter {
    pub(crate) fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Removes the persisted bounds. Returns whether a file was deleted.
    pub(crate) fn reset(&self) -> Result<bool, WindowStateError> {
        let path = self.path.as_ref().ok_or(WindowStateError::PathUnavailable)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(WindowStateError::Write {
                path: path.clone(),
                source,
            }),
        }
    }
}

impl WindowStateAdapter for FileWindowStateAdapter {
    fn fetch_window_state(&self) -> Result<WindowState, WindowStateError> {
        let path = self.path.clone().ok_or(WindowStateError::PathUnavailable)?;
        let usable_state = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str::<WindowBounds>(&raw)
                .map_err(|source| WindowStateError::Parse {
                    path: path.clone(),
                    source,
                })?
                .validated()?,
            Err(error) if error.kind() == io::ErrorKind::NotFound => WindowBounds::default_size(),
            Err(source) => return Err(WindowStateError::Read { path, source }),
        };

        Ok(WindowState {
            usable_state,
            state_keeper: StateKeeper::new(path, usable_state),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockWindow;

    fn bounds(width: f64, height: f64) -> WindowBounds {
        WindowBounds {
            x: Some(40.0),
            y: Some(60.0),
            width,
            height,
            is_maximized: false,
            is_full_screen: false,
        }
    }

    #[test]
    fn fetch_window_state_defaults_when_file_is_missing() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let adapter = FileWindowStateAdapter::new(Some(temp.path().join("window-state.json")));

        let state = adapter.fetch_window_state().expect("missing file is not an error");

        assert_eq!(state.usable_state, WindowBounds::default_size());
        assert_eq!(state.state_keeper.bounds(), WindowBounds::default_size());
    }

    #[test]
    fn fetch_window_state_reads_camel_case_bounds() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("window-state.json");
        fs::write(
            &path,
            r#"{"x":12,"y":34,"width":1280,"height":720,"isMaximized":true}"#,
        )
        .expect("write window state");

        let state = FileWindowStateAdapter::new(Some(path))
            .fetch_window_state()
            .expect("valid window state");

        assert_eq!(
            state.usable_state,
            WindowBounds {
                x: Some(12.0),
                y: Some(34.0),
                width: 1280.0,
                height: 720.0,
                is_maximized: true,
                is_full_screen: false,
            }
        );
    }

    #[test]
    fn fetch_window_state_rejects_corrupt_file() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("window-state.json");
        fs::write(&path, "{not json").expect("write window state");

        let error = FileWindowStateAdapter::new(Some(path))
            .fetch_window_state()
            .err()
            .expect("corrupt file should fail");

        assert!(matches!(error, WindowStateError::Parse { .. }));
    }

    #[test]
    fn fetch_window_state_rejects_degenerate_bounds() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("window-state.json");
        fs::write(&path, r#"{"width":10,"height":10}"#).expect("write window state");

        let error = FileWindowStateAdapter::new(Some(path))
            .fetch_window_state()
            .err()
            .expect("tiny window should fail");

        assert!(matches!(error, WindowStateError::InvalidBounds(_)));
    }

    #[test]
    fn fetch_window_state_without_path_fails() {
        let error = FileWindowStateAdapter::new(None)
            .fetch_window_state()
            .err()
            .expect("no path should fail");
        assert!(matches!(error, WindowStateError::PathUnavailable));
    }

    #[test]
    fn state_keeper_keeps_normal_bounds_while_maximized() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let keeper = StateKeeper::new(temp.path().join("state.json"), bounds(900.0, 700.0));

        keeper.record(WindowBounds {
            x: Some(0.0),
            y: Some(0.0),
            width: 2560.0,
            height: 1440.0,
            is_maximized: true,
            is_full_screen: false,
        });

        let current = keeper.bounds();
        assert!(current.is_maximized);
        assert_eq!((current.width, current.height), (900.0, 700.0));
        assert_eq!((current.x, current.y), (Some(40.0), Some(60.0)));
    }

    #[test]
    fn state_keeper_ignores_degenerate_observations() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let keeper = StateKeeper::new(temp.path().join("state.json"), bounds(900.0, 700.0));

        keeper.record(bounds(0.0, 0.0));

        assert_eq!(keeper.bounds(), bounds(900.0, 700.0));
    }

    #[test]
    fn managed_window_persists_bounds_when_closing() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("data").join("window-state.json");
        let keeper = StateKeeper::new(path.clone(), WindowBounds::default_size());
        let window = MockWindow::detached("main-1");

        keeper.manage(&window);
        assert_eq!(window.geometry_listener_count(), 1);

        window.emit_geometry(GeometryEvent::Changed(bounds(1024.0, 768.0)));
        window.emit_geometry(GeometryEvent::Closing);

        let restored = FileWindowStateAdapter::new(Some(path))
            .fetch_window_state()
            .expect("persisted state should load");
        assert_eq!(restored.usable_state, bounds(1024.0, 768.0));
    }

    #[test]
    fn managed_window_persists_moves_without_closing() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("window-state.json");
        let keeper = StateKeeper::new(path.clone(), bounds(900.0, 700.0))
            .with_save_debounce(Duration::from_millis(20));
        let window = MockWindow::detached("main-1");
        keeper.manage(&window);

        window.emit_geometry(GeometryEvent::Changed(bounds(1000.0, 750.0)));
        window.emit_geometry(GeometryEvent::Changed(bounds(1280.0, 800.0)));

        let adapter = FileWindowStateAdapter::new(Some(path));
        let mut restored = None;
        for _ in 0..100 {
            thread::sleep(Duration::from_millis(20));
            if let Ok(state) = adapter.fetch_window_state() {
                if state.usable_state.width == 1280.0 {
                    restored = Some(state.usable_state);
                    break;
                }
            }
        }
        assert_eq!(restored, Some(bounds(1280.0, 800.0)));
    }

    #[test]
    fn flush_writes_immediately_and_cancels_pending_save() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("window-state.json");
        let keeper = StateKeeper::new(path.clone(), bounds(900.0, 700.0))
            .with_save_debounce(Duration::from_millis(50));
        let window = MockWindow::detached("main-1");
        keeper.manage(&window);

        window.emit_geometry(GeometryEvent::Changed(bounds(1100.0, 720.0)));
        keeper.flush().expect("flush window state");
        fs::remove_file(&path).expect("remove flushed state");
        thread::sleep(Duration::from_millis(150));

        assert!(!path.exists());
    }

    #[test]
    fn reset_removes_persisted_state() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("window-state.json");
        fs::write(&path, r#"{"width":900,"height":700}"#).expect("write window state");
        let adapter = FileWindowStateAdapter::new(Some(path.clone()));

        assert!(adapter.reset().expect("reset existing file"));
        assert!(!path.exists());
        assert!(!adapter.reset().expect("reset missing file"));
    }
}
