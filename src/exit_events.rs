use tauri::{AppHandle, Manager};

use crate::{
    append_shutdown_log,
    lifecycle::{self, LifecycleEvent},
    window_host::TauriHost,
    TauriShellContext,
};

/// `None` exit code with no window left is the last window closing; anything
/// else is an explicit quit.
pub(crate) fn exit_request_event(exit_code: Option<i32>, open_windows: usize) -> LifecycleEvent {
    if exit_code.is_none() && open_windows == 0 {
        LifecycleEvent::AllWindowsClosed
    } else {
        LifecycleEvent::BeforeQuit
    }
}

pub(crate) fn handle_exit_requested(app_handle: &AppHandle, exit_code: Option<i32>) {
    let Some(ctx) = app_handle.try_state::<TauriShellContext>() else {
        append_shutdown_log("exit requested before shell context was ready");
        return;
    };

    let event = exit_request_event(exit_code, app_handle.webview_windows().len());
    append_shutdown_log(&format!(
        "exit requested (code={exit_code:?}), dispatching {event:?}"
    ));
    lifecycle::dispatch_app_event(
        &TauriHost::new(app_handle),
        ctx.inner(),
        event,
        append_shutdown_log,
    );
}

pub(crate) fn handle_exit_event(app_handle: &AppHandle) {
    let main_window = app_handle
        .try_state::<TauriShellContext>()
        .and_then(|ctx| ctx.main_window_id());
    append_shutdown_log(&format!(
        "desktop process exiting (main window: {})",
        main_window.as_deref().unwrap_or("none")
    ));
}
