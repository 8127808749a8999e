//! Main window lifecycle events and the commands they translate into.
//!
//! `commands_for_event` is pure; the dispatch functions decide whether a
//! window currently listens and apply the resulting commands to the host.

use std::time::Duration;

use tauri::{
    webview::{PageLoadEvent, PageLoadPayload},
    AppHandle, Manager, Webview,
};
use url::Url;

use crate::{
    append_window_log, ipc,
    origin_policy::{self, PageLoadOutcome},
    window_host::{HostWindow, TauriHost, WindowHost},
    ShellContext, TauriShellContext, FORCED_EXIT_GRACE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LifecycleEvent {
    LoadFailed,
    LoadFinished,
    NavigationAttempted,
    AllWindowsClosed,
    BeforeQuit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ShellCommand {
    Navigate(Url),
    Show,
    CancelNavigation,
    RemoveAllListeners,
    Close,
    Quit,
    ScheduleForcedExit(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WindowSnapshot {
    pub(crate) destroyed: bool,
    pub(crate) visible: bool,
}

impl WindowSnapshot {
    pub(crate) fn of<W: HostWindow>(window: &W) -> Self {
        let destroyed = window.is_destroyed();
        Self {
            destroyed,
            visible: !destroyed && window.is_visible(),
        }
    }
}

pub(crate) fn commands_for_event(
    event: LifecycleEvent,
    window: Option<WindowSnapshot>,
    entry_url: &Url,
) -> Vec<ShellCommand> {
    match event {
        LifecycleEvent::LoadFailed => vec![ShellCommand::Navigate(entry_url.clone())],
        LifecycleEvent::LoadFinished => vec![ShellCommand::Show],
        LifecycleEvent::NavigationAttempted => vec![ShellCommand::CancelNavigation],
        LifecycleEvent::AllWindowsClosed => vec![ShellCommand::Quit],
        LifecycleEvent::BeforeQuit => match window {
            Some(snapshot) if !snapshot.destroyed && snapshot.visible => vec![
                ShellCommand::RemoveAllListeners,
                ShellCommand::Close,
                ShellCommand::ScheduleForcedExit(FORCED_EXIT_GRACE),
            ],
            _ => Vec::new(),
        },
    }
}

pub(crate) fn bind_lifecycle_listeners<W: HostWindow>(ctx: &ShellContext<W>, window: &W) {
    ctx.bind_listeners(&window.id());
}

/// Runs a window-scoped event (load or navigation) for `window`. Windows
/// without bound listeners ignore it.
pub(crate) fn dispatch_window_event<H, F>(
    host: &H,
    ctx: &ShellContext<H::Window>,
    window: &H::Window,
    event: LifecycleEvent,
    log: F,
) -> Vec<ShellCommand>
where
    H: WindowHost,
    F: Fn(&str),
{
    if !ctx.listeners_bound(&window.id()) {
        return Vec::new();
    }

    let commands = commands_for_event(event, Some(WindowSnapshot::of(window)), ctx.entry_url());
    apply_commands(host, ctx, Some(window), &commands, &log);
    commands
}

/// Runs a process-wide event against the current main window.
pub(crate) fn dispatch_app_event<H, F>(
    host: &H,
    ctx: &ShellContext<H::Window>,
    event: LifecycleEvent,
    log: F,
) -> Vec<ShellCommand>
where
    H: WindowHost,
    F: Fn(&str),
{
    if !ctx.app_listeners_attached() {
        return Vec::new();
    }

    let window = ctx.main_window();
    let snapshot = window.as_ref().map(WindowSnapshot::of);
    let commands = commands_for_event(event, snapshot, ctx.entry_url());
    apply_commands(host, ctx, window.as_ref(), &commands, &log);
    commands
}

/// True on the first shown load of the current main window after it became
/// the main window, the earliest point its own page can hear about it.
pub(crate) fn main_window_announcement_due<W: HostWindow>(
    ctx: &ShellContext<W>,
    window: &W,
    commands: &[ShellCommand],
) -> bool {
    let window_id = window.id();
    commands.contains(&ShellCommand::Show)
        && ctx.main_window_id().as_deref() == Some(window_id.as_str())
        && ctx.take_announcement(&window_id)
}

fn apply_commands<H, F>(
    host: &H,
    ctx: &ShellContext<H::Window>,
    window: Option<&H::Window>,
    commands: &[ShellCommand],
    log: &F,
) where
    H: WindowHost,
    F: Fn(&str),
{
    for command in commands {
        let result = match (command, window) {
            (ShellCommand::Navigate(url), Some(window)) => {
                ctx.expect_shell_load(&window.id());
                window.load_url(url)
            }
            (ShellCommand::Show, Some(window)) => window.show(),
            (ShellCommand::RemoveAllListeners, Some(window)) => {
                ctx.unbind_listeners(&window.id());
                Ok(())
            }
            (ShellCommand::Close, Some(window)) => window.close(),
            (ShellCommand::Quit, _) => {
                host.quit();
                Ok(())
            }
            (ShellCommand::ScheduleForcedExit(after), _) => {
                host.schedule_forced_exit(*after);
                Ok(())
            }
            (ShellCommand::CancelNavigation, _) => Ok(()),
            (command, None) => Err(format!("{command:?} skipped: no window")),
        };

        if let Err(error) = result {
            log(&format!("lifecycle command failed: {error}"));
        }
    }
}

pub(crate) fn handle_page_load(webview: &Webview, payload: &PageLoadPayload<'_>) {
    if !matches!(payload.event(), PageLoadEvent::Finished) {
        return;
    }

    let app_handle = webview.app_handle();
    let Some(ctx) = app_handle.try_state::<TauriShellContext>() else {
        return;
    };
    let Some(window) = app_handle.get_webview_window(webview.label()) else {
        return;
    };

    let event = match origin_policy::classify_finished_load(payload.url(), ctx.entry_url()) {
        PageLoadOutcome::Loaded => LifecycleEvent::LoadFinished,
        PageLoadOutcome::Failed => LifecycleEvent::LoadFailed,
        PageLoadOutcome::Ignored => return,
    };
    append_window_log(&format!(
        "page-load finished for {}: {} ({event:?})",
        webview.label(),
        payload.url()
    ));

    let commands = dispatch_window_event(
        &TauriHost::new(app_handle),
        ctx.inner(),
        &window,
        event,
        append_window_log,
    );
    if main_window_announcement_due(ctx.inner(), &window, &commands) {
        ipc::announce_main_window(app_handle, append_window_log);
    }
}

/// Navigation hook installed on every main window. Loads started by the shell
/// and plain reloads pass; anything else counts as a navigation attempt.
pub(crate) fn allow_navigation(app_handle: &AppHandle, label: &str, target: &Url) -> bool {
    let Some(ctx) = app_handle.try_state::<TauriShellContext>() else {
        return true;
    };
    if ctx.take_shell_load(label) && origin_policy::is_same_document(target, ctx.entry_url()) {
        return true;
    }
    let Some(window) = app_handle.get_webview_window(label) else {
        return true;
    };
    if window
        .url()
        .is_ok_and(|current| origin_policy::is_same_document(target, &current))
    {
        return true;
    }

    let commands = dispatch_window_event(
        &TauriHost::new(app_handle),
        ctx.inner(),
        &window,
        LifecycleEvent::NavigationAttempted,
        append_window_log,
    );
    let cancelled = commands.contains(&ShellCommand::CancelNavigation);
    if cancelled {
        append_window_log(&format!("blocked navigation of {label} to {target}"));
    }
    !cancelled
}
