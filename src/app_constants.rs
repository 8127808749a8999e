use std::time::Duration;

pub(crate) const APP_TITLE: &str = "Ghost";
pub(crate) const MAIN_WINDOW_LABEL_PREFIX: &str = "main";
pub(crate) const ENTRY_DOCUMENT: &str = "index.html";
pub(crate) const FORCED_EXIT_GRACE: Duration = Duration::from_secs(2);
pub(crate) const MAIN_WINDOW_CHANGED_EVENT: &str = "ghost://main-window-changed";

pub(crate) const SHELL_ROOT_ENV: &str = "GHOST_DESKTOP_ROOT";
pub(crate) const SHELL_ROOT_DIR_NAME: &str = ".ghost-desktop";
pub(crate) const WINDOW_STATE_FILE: &str = "window-state.json";
pub(crate) const PREFERENCES_FILE: &str = "preferences.json";
pub(crate) const WINDOW_STATE_SAVE_DEBOUNCE: Duration = Duration::from_millis(400);

pub(crate) const DESKTOP_LOG_FILE: &str = "desktop.log";
pub(crate) const DESKTOP_LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;
pub(crate) const LOG_BACKUP_COUNT: usize = 5;

pub(crate) const DEFAULT_WINDOW_WIDTH: f64 = 1000.0;
pub(crate) const DEFAULT_WINDOW_HEIGHT: f64 = 800.0;
pub(crate) const MIN_WINDOW_WIDTH: f64 = 400.0;
pub(crate) const MIN_WINDOW_HEIGHT: f64 = 300.0;
