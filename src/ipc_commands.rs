use std::{
    process::{Command, Stdio},
    sync::atomic::Ordering,
};
use tauri::{AppHandle, Manager};
use url::Url;

use crate::{
    append_desktop_log,
    basic_auth::BasicAuthState,
    ipc,
    preferences::{FilePreferences, Preferences},
    runtime_paths, ui_dispatch, window_actions, MainWindowInfo, ShellBridgeResult,
    TauriShellContext,
};

fn parse_openable_url(raw_url: &str) -> Result<Url, String> {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return Err("Missing external URL.".to_string());
    }

    let parsed = Url::parse(trimmed).map_err(|error| format!("Invalid URL: {error}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(format!(
            "Unsupported URL scheme '{scheme}', only http/https are allowed."
        )),
    }
}

#[cfg(target_os = "macos")]
fn open_url_with_system_browser(url: &str) -> Result<(), String> {
    Command::new("open")
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run 'open': {error}"))
}

#[cfg(target_os = "windows")]
fn open_url_with_system_browser(url: &str) -> Result<(), String> {
    Command::new("rundll32")
        .args(["url.dll,FileProtocolHandler", url])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run 'rundll32': {error}"))
}

#[cfg(all(unix, not(target_os = "macos")))]
fn open_url_with_system_browser(url: &str) -> Result<(), String> {
    Command::new("xdg-open")
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run 'xdg-open': {error}"))
}

#[cfg(not(any(target_os = "macos", target_os = "windows", unix)))]
fn open_url_with_system_browser(_url: &str) -> Result<(), String> {
    Err("Opening external URLs is not supported on this platform.".to_string())
}

fn shell_preferences() -> FilePreferences {
    let root_dir = runtime_paths::default_shell_root_dir();
    FilePreferences::new(runtime_paths::preferences_path(root_dir.as_deref()))
}

/// Waits for the main-thread reload on a blocking worker.
async fn dispatch_reload(app_handle: AppHandle) -> ShellBridgeResult {
    let result = tauri::async_runtime::spawn_blocking(move || {
        ui_dispatch::run_on_main_thread_dispatch(&app_handle, "main window reload", |app_handle| {
            window_actions::reload_main_window(app_handle, append_desktop_log)
        })
    })
    .await;

    match result {
        Ok(Ok(Ok(label))) => {
            append_desktop_log(&format!("main window reloaded via ipc: {label}"));
            ShellBridgeResult::success()
        }
        Ok(Ok(Err(error))) | Ok(Err(error)) => ShellBridgeResult::failure(error),
        Err(error) => ShellBridgeResult::failure(format!("Reload task failed: {error}")),
    }
}

fn reload_in_progress(app_handle: &AppHandle) -> bool {
    app_handle
        .try_state::<TauriShellContext>()
        .is_some_and(|ctx| ctx.is_reloading.load(Ordering::Acquire))
}

#[tauri::command]
pub(crate) fn shell_is_desktop_runtime() -> bool {
    true
}

#[tauri::command]
pub(crate) fn shell_get_main_window(app_handle: AppHandle) -> MainWindowInfo {
    MainWindowInfo {
        label: ipc::current_main_window_label(&app_handle),
    }
}

#[tauri::command]
pub(crate) async fn shell_reload_main_window(app_handle: AppHandle) -> ShellBridgeResult {
    if reload_in_progress(&app_handle) {
        return ShellBridgeResult::failure("Main window reload already in progress.");
    }

    dispatch_reload(app_handle).await
}

#[tauri::command]
pub(crate) fn shell_get_preferences() -> Preferences {
    shell_preferences().read_preferences()
}

#[tauri::command]
pub(crate) async fn shell_set_vibrancy_enabled(
    app_handle: AppHandle,
    enabled: bool,
) -> ShellBridgeResult {
    match shell_preferences().write_vibrancy_enabled(enabled) {
        Ok(true) => {
            append_desktop_log(&format!(
                "vibrancy preference changed to {enabled}; reloading main window"
            ));
            dispatch_reload(app_handle).await
        }
        Ok(false) => ShellBridgeResult::success(),
        Err(error) => {
            append_desktop_log(&format!("failed to persist vibrancy preference: {error}"));
            ShellBridgeResult::failure(error)
        }
    }
}

#[tauri::command]
pub(crate) fn shell_open_external_url(url: String) -> ShellBridgeResult {
    let parsed = match parse_openable_url(&url) {
        Ok(parsed) => parsed,
        Err(error) => return ShellBridgeResult::failure(error),
    };

    match open_url_with_system_browser(parsed.as_ref()) {
        Ok(()) => ShellBridgeResult::success(),
        Err(error) => {
            append_desktop_log(&format!("failed to open external url {parsed}: {error}"));
            ShellBridgeResult::failure(error)
        }
    }
}

#[tauri::command]
pub(crate) fn shell_basic_auth_remember(
    app_handle: AppHandle,
    url: String,
    username: String,
    password: String,
) -> ShellBridgeResult {
    let Some(state) = app_handle.try_state::<BasicAuthState>() else {
        return ShellBridgeResult::failure("Basic auth is not active.");
    };

    match state.remember(&url, &username, &password) {
        Ok(origin) => {
            append_desktop_log(&format!("remembered basic-auth credentials for {origin}"));
            ShellBridgeResult::success()
        }
        Err(error) => ShellBridgeResult::failure(error),
    }
}

#[tauri::command]
pub(crate) fn shell_basic_auth_forget(app_handle: AppHandle, url: String) -> ShellBridgeResult {
    let Some(state) = app_handle.try_state::<BasicAuthState>() else {
        return ShellBridgeResult::failure("Basic auth is not active.");
    };

    match state.forget(&url) {
        Ok(_) => ShellBridgeResult::success(),
        Err(error) => ShellBridgeResult::failure(error),
    }
}

#[tauri::command]
pub(crate) fn shell_basic_auth_header(app_handle: AppHandle, url: String) -> Option<String> {
    app_handle
        .try_state::<BasicAuthState>()
        .and_then(|state| state.header_for(&url))
}
