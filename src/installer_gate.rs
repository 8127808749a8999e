//! Squirrel.Windows installer hooks. The installer launches the app with a
//! single `--squirrel-*` argument and expects it to exit quickly.

use std::{
    env,
    ffi::OsStr,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InstallerEvent {
    Install,
    Updated,
    Uninstall,
    Obsolete,
    FirstRun,
}

impl InstallerEvent {
    pub(crate) fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "--squirrel-install" => Some(Self::Install),
            "--squirrel-updated" => Some(Self::Updated),
            "--squirrel-uninstall" => Some(Self::Uninstall),
            "--squirrel-obsolete" => Some(Self::Obsolete),
            "--squirrel-firstrun" => Some(Self::FirstRun),
            _ => None,
        }
    }

    /// First run after install continues into the normal app.
    pub(crate) fn skips_bootstrap(self) -> bool {
        !matches!(self, Self::FirstRun)
    }

    pub(crate) fn shortcut_action(self) -> Option<&'static str> {
        match self {
            Self::Install | Self::Updated => Some("--createShortcut"),
            Self::Uninstall => Some("--removeShortcut"),
            Self::Obsolete | Self::FirstRun => None,
        }
    }
}

pub(crate) fn detect_installer_event<I, S>(args: I) -> Option<InstallerEvent>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let flag = args.into_iter().nth(1)?;
    flag.as_ref().to_str().and_then(InstallerEvent::from_flag)
}

/// `Update.exe` sits one directory above the versioned `app-x.y.z` folder.
pub(crate) fn update_executable_path(current_exe: &Path) -> Option<PathBuf> {
    current_exe
        .parent()?
        .parent()
        .map(|root| root.join("Update.exe"))
}

fn spawn_update_action(action: &str) -> Result<(), String> {
    let current_exe = env::current_exe()
        .map_err(|error| format!("Failed to resolve current executable: {error}"))?;
    let update_exe = update_executable_path(&current_exe)
        .ok_or_else(|| format!("No Update.exe next to {}", current_exe.display()))?;
    let exe_name = current_exe
        .file_name()
        .ok_or_else(|| format!("Executable has no file name: {}", current_exe.display()))?;

    Command::new(&update_exe)
        .arg(action)
        .arg(exe_name)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run '{}': {error}", update_exe.display()))
}

/// Handles an installer launch. Returns true when the process must exit
/// without starting the shell.
pub(crate) fn should_skip_bootstrap<F>(log: F) -> bool
where
    F: Fn(&str),
{
    if !cfg!(target_os = "windows") {
        return false;
    }
    let Some(event) = detect_installer_event(env::args_os()) else {
        return false;
    };

    log(&format!("installer event detected: {event:?}"));
    if let Some(action) = event.shortcut_action() {
        if let Err(error) = spawn_update_action(action) {
            log(&format!("installer shortcut action {action} failed: {error}"));
        }
    }
    event.skips_bootstrap()
}
