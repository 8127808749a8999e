use tauri::{AppHandle, Emitter, Manager};

use crate::{TauriShellContext, MAIN_WINDOW_CHANGED_EVENT};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MainWindowChanged {
    pub(crate) label: String,
}

pub(crate) fn current_main_window_label(app_handle: &AppHandle) -> Option<String> {
    app_handle
        .try_state::<TauriShellContext>()
        .and_then(|ctx| ctx.main_window_id())
}

/// Tells every webview which window is now the main one. Sent from the
/// page-load hook so the new main window's own page receives it.
pub(crate) fn announce_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(label) = current_main_window_label(app_handle) else {
        log("main window announcement skipped: no main window");
        return;
    };

    if let Err(error) = app_handle.emit(MAIN_WINDOW_CHANGED_EVENT, MainWindowChanged { label }) {
        log(&format!("failed to emit {MAIN_WINDOW_CHANGED_EVENT}: {error}"));
    }
}

pub(crate) fn activate<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(ctx) = app_handle.try_state::<TauriShellContext>() else {
        log("ipc activation skipped: shell context missing");
        return;
    };
    match ctx.main_window() {
        Some(window) => log(&format!(
            "ipc active; {} is announced on its first load",
            window.label()
        )),
        None => log("ipc active without a main window"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_window_changed_payload_is_camel_case_json() {
        let payload = MainWindowChanged {
            label: "main-2".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&payload).expect("serialize payload"),
            serde_json::json!({ "label": "main-2" })
        );
    }
}
