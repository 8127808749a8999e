use tauri::RunEvent;

use crate::{
    append_startup_log, bootstrap, exit_events, installer_gate, lifecycle, single_instance,
    DESKTOP_LOG_FILE,
};

pub(crate) fn run() {
    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        crate::logging::resolve_desktop_log_path(
            crate::runtime_paths::default_shell_root_dir(),
            DESKTOP_LOG_FILE,
        )
        .display()
    ));

    if installer_gate::should_skip_bootstrap(append_startup_log) {
        append_startup_log("installer event handled; exiting without starting the shell");
        return;
    }

    tauri::Builder::default()
        .plugin(single_instance::plugin())
        .plugin(tauri_plugin_process::init())
        .invoke_handler(tauri::generate_handler![
            crate::ipc_commands::shell_is_desktop_runtime,
            crate::ipc_commands::shell_get_main_window,
            crate::ipc_commands::shell_reload_main_window,
            crate::ipc_commands::shell_get_preferences,
            crate::ipc_commands::shell_set_vibrancy_enabled,
            crate::ipc_commands::shell_open_external_url,
            crate::ipc_commands::shell_basic_auth_remember,
            crate::ipc_commands::shell_basic_auth_forget,
            crate::ipc_commands::shell_basic_auth_header,
        ])
        .on_page_load(|webview, payload| lifecycle::handle_page_load(webview, payload))
        .setup(|app| {
            if let Err(error) = bootstrap::on_ready(app) {
                append_startup_log(&format!("bootstrap failed: {error}"));
                return Err(error.into());
            }
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested { code, .. } => {
                exit_events::handle_exit_requested(app_handle, code);
            }
            RunEvent::Exit => {
                exit_events::handle_exit_event(app_handle);
            }
            _ => {}
        });
}
