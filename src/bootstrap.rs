use tauri::{App, Manager};

use crate::{
    append_startup_log, basic_auth, ipc,
    launch_args::{self, LaunchOptions},
    main_window, origin_policy,
    platform::HostPlatform,
    window_host::TauriHost,
    TauriShellContext,
};

/// Ready handler. Single instance is already registered as the first plugin
/// by the time `setup` runs.
pub(crate) fn on_ready(app: &mut App) -> Result<(), String> {
    let app_handle = app.handle().clone();

    let launch_options = launch_args::parse_launch_args(std::env::args_os());
    append_startup_log(&format!("launch options: {launch_options:?}"));
    let reset_window_state = launch_options.reset_window_state;
    app_handle.manage::<LaunchOptions>(launch_options);

    let dev_url = app_handle.config().build.dev_url.clone();
    let entry_url =
        origin_policy::resolve_entry_url(dev_url.as_ref(), tauri::is_dev(), cfg!(windows))?;
    append_startup_log(&format!("entry url: {entry_url}"));
    app_handle.manage(TauriShellContext::new(entry_url));

    let factory = main_window::tauri_window_factory(&app_handle);
    if reset_window_state {
        match factory.state_adapter().reset() {
            Ok(true) => append_startup_log("persisted window state removed"),
            Ok(false) => append_startup_log("no persisted window state to remove"),
            Err(error) => append_startup_log(&format!("failed to reset window state: {error}")),
        }
    }

    let ctx = app_handle.state::<TauriShellContext>();
    let window = main_window::bootstrap_main_window(
        &TauriHost::new(&app_handle),
        ctx.inner(),
        &factory,
        HostPlatform::current(),
        append_startup_log,
    )?;
    append_startup_log(&format!("main window {} bootstrapped", window.label()));

    ipc::activate(&app_handle, append_startup_log);
    basic_auth::activate(&app_handle, append_startup_log);
    Ok(())
}
