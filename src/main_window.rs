use tauri::{AppHandle, Manager};

use crate::{
    launch_args::LaunchOptions,
    lifecycle,
    platform::{self, HostPlatform, PlatformCapabilities},
    preferences::{FilePreferences, PreferenceSource},
    runtime_paths,
    window_host::{HostWindow, WindowHost},
    window_options::WindowOptions,
    window_state::{FileWindowStateAdapter, WindowState, WindowStateAdapter},
    AtomicFlagGuard, ShellContext,
};

pub(crate) type TauriWindowFactory = MainWindowFactory<FileWindowStateAdapter, FilePreferences>;

pub(crate) struct MainWindowFactory<A, P> {
    capabilities: PlatformCapabilities,
    state_adapter: A,
    preferences: P,
    open_devtools: bool,
}

impl<A, P> MainWindowFactory<A, P>
where
    A: WindowStateAdapter,
    P: PreferenceSource,
{
    pub(crate) fn new(capabilities: PlatformCapabilities, state_adapter: A, preferences: P) -> Self {
        Self {
            capabilities,
            state_adapter,
            preferences,
            open_devtools: false,
        }
    }

    pub(crate) fn with_devtools(mut self, open_devtools: bool) -> Self {
        self.open_devtools = open_devtools;
        self
    }

    pub(crate) fn state_adapter(&self) -> &A {
        &self.state_adapter
    }

    pub(crate) fn default_options(&self) -> WindowOptions {
        WindowOptions::defaults(self.capabilities, self.preferences.is_vibrancy_enabled())
    }

    /// Creates a hidden main window pointed at the entry URL. A failing window
    /// state adapter degrades to default options without persistence.
    pub(crate) fn create<H, F>(
        &self,
        host: &H,
        ctx: &ShellContext<H::Window>,
        log: F,
    ) -> Result<H::Window, String>
    where
        H: WindowHost,
        F: Fn(&str),
    {
        let defaults = self.default_options();
        let (options, state_keeper) = match self.state_adapter.fetch_window_state() {
            Ok(WindowState {
                usable_state,
                state_keeper,
            }) => (defaults.with_bounds(usable_state), Some(state_keeper)),
            Err(error) => {
                log(&format!("window state keeper failed: {error}"));
                (defaults, None)
            }
        };

        let label = ctx.next_window_label();
        ctx.expect_shell_load(&label);
        let window = match host.create_window(&label, ctx.entry_url(), &options) {
            Ok(window) => window,
            Err(error) => {
                ctx.take_shell_load(&label);
                return Err(error);
            }
        };

        if let Some(state_keeper) = state_keeper {
            state_keeper.manage(&window);
            ctx.track_state_keeper(&label, state_keeper);
        }
        if self.open_devtools {
            window.open_devtools();
        }

        log(&format!("created main window {label}"));
        Ok(window)
    }
}

pub(crate) fn tauri_window_factory(app_handle: &AppHandle) -> TauriWindowFactory {
    let root_dir = runtime_paths::default_shell_root_dir();
    let open_devtools = app_handle
        .try_state::<LaunchOptions>()
        .map(|options| options.devtools)
        .unwrap_or(false);

    MainWindowFactory::new(
        PlatformCapabilities::current(),
        FileWindowStateAdapter::new(runtime_paths::window_state_path(root_dir.as_deref())),
        FilePreferences::new(runtime_paths::preferences_path(root_dir.as_deref())),
    )
    .with_devtools(open_devtools)
}

/// First window of the process: create, greet, track, listen.
pub(crate) fn bootstrap_main_window<H, A, P, F>(
    host: &H,
    ctx: &ShellContext<H::Window>,
    factory: &MainWindowFactory<A, P>,
    host_platform: HostPlatform,
    log: F,
) -> Result<H::Window, String>
where
    H: WindowHost,
    A: WindowStateAdapter,
    P: PreferenceSource,
    F: Fn(&str),
{
    let window = factory.create(host, ctx, &log)?;

    println!("{}", platform::greeting_for(host_platform));

    if let Some(previous) = ctx.replace_main_window(window.clone()) {
        log(&format!(
            "bootstrap replaced an existing main window {}",
            previous.id()
        ));
    }
    ctx.expect_announcement(&window.id());
    lifecycle::bind_lifecycle_listeners(ctx, &window);
    Ok(window)
}

/// Swaps in a freshly created main window. The old window is hidden first and
/// destroyed only once the new one is tracked, so there is never a moment
/// without a main window.
pub(crate) fn reload_main_window<H, A, P, F>(
    host: &H,
    ctx: &ShellContext<H::Window>,
    factory: &MainWindowFactory<A, P>,
    log: F,
) -> Result<H::Window, String>
where
    H: WindowHost,
    A: WindowStateAdapter,
    P: PreferenceSource,
    F: Fn(&str),
{
    let Some(_reload_guard) = AtomicFlagGuard::try_set(&ctx.is_reloading) else {
        log("main window reload skipped: reload already in progress");
        return Err("Main window reload already in progress.".to_string());
    };

    let old_window = ctx.main_window();
    if let Some(old_window) = &old_window {
        if let Err(error) = ctx.flush_window_state(&old_window.id()) {
            log(&format!("failed to persist window state before reload: {error}"));
        }
        if let Err(error) = old_window.hide() {
            log(&format!("failed to hide main window before reload: {error}"));
        }
    }

    let window = match factory.create(host, ctx, &log) {
        Ok(window) => window,
        Err(error) => {
            log(&format!("main window reload failed: {error}"));
            if let Some(old_window) = &old_window {
                if let Err(show_error) = old_window.show() {
                    log(&format!("failed to restore previous main window: {show_error}"));
                }
            }
            return Err(error);
        }
    };
    lifecycle::bind_lifecycle_listeners(ctx, &window);

    ctx.expect_announcement(&window.id());
    if let Some(replaced) = ctx.replace_main_window(window.clone()) {
        ctx.forget_window(&replaced.id());
        if let Err(error) = replaced.destroy() {
            log(&format!("failed to destroy previous main window: {error}"));
        }
    }

    log(&format!("main window reloaded as {}", window.id()));
    Ok(window)
}
