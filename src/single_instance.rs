use tauri::{plugin::TauriPlugin, Wry};

use crate::{append_startup_log, window_actions};

/// Must be the first plugin registered on the builder.
pub(crate) fn plugin() -> TauriPlugin<Wry> {
    tauri_plugin_single_instance::init(|app_handle, argv, cwd| {
        append_startup_log(&format!(
            "second instance launched from {cwd} with {} argument(s); focusing main window",
            argv.len()
        ));
        window_actions::focus_main_window(app_handle, append_startup_log);
    })
}
