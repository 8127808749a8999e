use tauri::{AppHandle, Manager};

use crate::{main_window, window_host::TauriHost, TauriShellContext};

pub fn focus_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(ctx) = app_handle.try_state::<TauriShellContext>() else {
        log("focus_main_window skipped: shell context missing");
        return;
    };
    let Some(window) = ctx.main_window() else {
        log("focus_main_window skipped: main window not found");
        return;
    };

    if let Err(error) = window.unminimize() {
        log(&format!("failed to unminimize main window: {error}"));
    }
    if let Err(error) = window.show() {
        log(&format!("failed to show main window: {error}"));
    }
    if let Err(error) = window.set_focus() {
        log(&format!("failed to focus main window: {error}"));
    }
}

/// Replaces the main window and returns the label of the new one. Must run
/// on the main thread. The new window is announced once its page has loaded.
pub fn reload_main_window<F>(app_handle: &AppHandle, log: F) -> Result<String, String>
where
    F: Fn(&str),
{
    let Some(ctx) = app_handle.try_state::<TauriShellContext>() else {
        return Err("Shell context is not initialized.".to_string());
    };

    let factory = main_window::tauri_window_factory(app_handle);
    let window = main_window::reload_main_window(
        &TauriHost::new(app_handle),
        ctx.inner(),
        &factory,
        &log,
    )?;

    Ok(window.label().to_string())
}
