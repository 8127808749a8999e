#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_helpers;
mod app_runtime;
mod app_types;
mod basic_auth;
mod bootstrap;
mod exit_events;
mod installer_gate;
mod ipc;
mod ipc_commands;
mod launch_args;
mod lifecycle;
mod logging;
mod main_window;
mod origin_policy;
mod platform;
mod preferences;
mod runtime_paths;
mod single_instance;
#[cfg(test)]
mod test_support;
mod ui_dispatch;
mod window_actions;
mod window_host;
mod window_options;
mod window_state;

pub(crate) use app_constants::*;
pub(crate) use app_helpers::{
    append_desktop_log, append_shutdown_log, append_startup_log, append_window_log,
};
pub(crate) use app_types::{
    AtomicFlagGuard, MainWindowInfo, ShellBridgeResult, ShellContext, TauriShellContext,
};

fn main() {
    app_runtime::run();
}
