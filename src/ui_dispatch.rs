use std::sync::mpsc;

use tauri::AppHandle;

/// Runs `f` on the main thread and hands its result back to the caller.
pub(crate) fn run_on_main_thread_dispatch<T, F>(
    app_handle: &AppHandle,
    task: &str,
    f: F,
) -> Result<T, String>
where
    T: Send + 'static,
    F: FnOnce(&AppHandle) -> T + Send + 'static,
{
    let (sender, receiver) = mpsc::channel();
    let main_thread_handle = app_handle.clone();
    app_handle
        .run_on_main_thread(move || {
            let _ = sender.send(f(&main_thread_handle));
        })
        .map_err(|error| format!("Failed to schedule {task} on main thread: {error}"))?;

    receiver
        .recv()
        .map_err(|error| format!("{task} was dropped before completing: {error}"))
}
