//! Seam between the shell's window lifecycle logic and the GUI host.
//!
//! Everything above this module talks to `WindowHost`/`HostWindow`; the Tauri
//! implementation lives here and a recording double lives in `test_support`.

use std::{thread, time::Duration};

use tauri::{
    window::{Effect, EffectState, EffectsBuilder},
    AppHandle, Manager, WebviewWindow, WebviewWindowBuilder, WindowEvent,
};
use url::Url;

use crate::{
    append_shutdown_log, lifecycle, origin_policy,
    window_options::{Vibrancy, WindowOptions},
    window_state::WindowBounds,
    APP_TITLE, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum GeometryEvent {
    Changed(WindowBounds),
    Closing,
}

pub(crate) type GeometryListener = Box<dyn Fn(GeometryEvent) + Send + Sync + 'static>;

pub(crate) trait HostWindow: Clone + Send + Sync + 'static {
    fn id(&self) -> String;
    fn load_url(&self, url: &Url) -> Result<(), String>;
    fn show(&self) -> Result<(), String>;
    fn hide(&self) -> Result<(), String>;
    fn close(&self) -> Result<(), String>;
    fn destroy(&self) -> Result<(), String>;
    fn is_visible(&self) -> bool;
    fn is_destroyed(&self) -> bool;
    fn on_geometry_event(&self, listener: GeometryListener);
    fn open_devtools(&self);
}

pub(crate) trait WindowHost {
    type Window: HostWindow;

    fn create_window(
        &self,
        label: &str,
        url: &Url,
        options: &WindowOptions,
    ) -> Result<Self::Window, String>;
    fn quit(&self);
    fn schedule_forced_exit(&self, after: Duration);
}

pub(crate) struct TauriHost<'a> {
    app_handle: &'a AppHandle,
}

impl<'a> TauriHost<'a> {
    pub(crate) fn new(app_handle: &'a AppHandle) -> Self {
        Self { app_handle }
    }
}

impl WindowHost for TauriHost<'_> {
    type Window = WebviewWindow;

    fn create_window(
        &self,
        label: &str,
        url: &Url,
        options: &WindowOptions,
    ) -> Result<WebviewWindow, String> {
        let navigation_app = self.app_handle.clone();
        let navigation_label = label.to_string();
        let mut builder =
            WebviewWindowBuilder::new(self.app_handle, label, origin_policy::webview_url_for(url))
                .title(APP_TITLE)
                .visible(options.show)
                .decorations(options.frame)
                .min_inner_size(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT)
                .on_navigation(move |target| {
                    lifecycle::allow_navigation(&navigation_app, &navigation_label, target)
                });

        if let Some(bounds) = options.bounds {
            builder = builder
                .inner_size(bounds.width, bounds.height)
                .maximized(bounds.is_maximized)
                .fullscreen(bounds.is_full_screen);
            if let (Some(x), Some(y)) = (bounds.x, bounds.y) {
                builder = builder.position(x, y);
            }
        }

        #[cfg(target_os = "macos")]
        {
            if options.title_bar_style == crate::window_options::TitleBarStyle::Hidden {
                builder = builder
                    .title_bar_style(tauri::TitleBarStyle::Overlay)
                    .hidden_title(true);
            }
        }

        if options.transparent {
            builder = builder.transparent(true);
        }
        if options.vibrancy == Some(Vibrancy::Dark) {
            builder = builder.effects(
                EffectsBuilder::new()
                    .effect(Effect::HudWindow)
                    .state(EffectState::FollowsWindowActiveState)
                    .build(),
            );
        }

        builder
            .build()
            .map_err(|error| format!("Failed to create window {label}: {error}"))
    }

    fn quit(&self) {
        self.app_handle.exit(0);
    }

    fn schedule_forced_exit(&self, after: Duration) {
        let spawned = thread::Builder::new()
            .name("forced-exit".to_string())
            .spawn(move || {
                thread::sleep(after);
                append_shutdown_log(&format!(
                    "graceful shutdown did not finish within {}ms, forcing exit",
                    after.as_millis()
                ));
                std::process::exit(0);
            });
        if let Err(error) = spawned {
            append_shutdown_log(&format!("failed to schedule forced exit: {error}"));
        }
    }
}

/// Logical bounds of the window, `None` while minimized or unreadable.
fn bounds_of(window: &WebviewWindow) -> Option<WindowBounds> {
    if window.is_minimized().unwrap_or(false) {
        return None;
    }

    let scale_factor = window.scale_factor().ok()?;
    let size = window.inner_size().ok()?.to_logical::<f64>(scale_factor);
    let position = window
        .outer_position()
        .ok()
        .map(|position| position.to_logical::<f64>(scale_factor));

    Some(WindowBounds {
        x: position.map(|position| position.x),
        y: position.map(|position| position.y),
        width: size.width,
        height: size.height,
        is_maximized: window.is_maximized().unwrap_or(false),
        is_full_screen: window.is_fullscreen().unwrap_or(false),
    })
}

impl HostWindow for WebviewWindow {
    fn id(&self) -> String {
        self.label().to_string()
    }

    fn load_url(&self, url: &Url) -> Result<(), String> {
        WebviewWindow::navigate(self, url.clone())
            .map_err(|error| format!("Failed to load {url} into {}: {error}", self.label()))
    }

    fn show(&self) -> Result<(), String> {
        WebviewWindow::show(self)
            .map_err(|error| format!("Failed to show {}: {error}", self.label()))
    }

    fn hide(&self) -> Result<(), String> {
        WebviewWindow::hide(self)
            .map_err(|error| format!("Failed to hide {}: {error}", self.label()))
    }

    fn close(&self) -> Result<(), String> {
        WebviewWindow::close(self)
            .map_err(|error| format!("Failed to close {}: {error}", self.label()))
    }

    fn destroy(&self) -> Result<(), String> {
        WebviewWindow::destroy(self)
            .map_err(|error| format!("Failed to destroy {}: {error}", self.label()))
    }

    fn is_visible(&self) -> bool {
        WebviewWindow::is_visible(self).unwrap_or(false)
    }

    fn is_destroyed(&self) -> bool {
        self.app_handle().get_webview_window(self.label()).is_none()
    }

    fn on_geometry_event(&self, listener: GeometryListener) {
        let window = self.clone();
        self.on_window_event(move |event| match event {
            WindowEvent::Moved(_) | WindowEvent::Resized(_) => {
                if let Some(bounds) = bounds_of(&window) {
                    listener(GeometryEvent::Changed(bounds));
                }
            }
            WindowEvent::CloseRequested { .. } | WindowEvent::Destroyed => {
                listener(GeometryEvent::Closing);
            }
            _ => {}
        });
    }

    fn open_devtools(&self) {
        #[cfg(debug_assertions)]
        {
            WebviewWindow::open_devtools(self);
        }
        #[cfg(not(debug_assertions))]
        {
            crate::append_window_log(&format!(
                "devtools requested for {} but are unavailable in release builds",
                self.label()
            ));
        }
    }
}
