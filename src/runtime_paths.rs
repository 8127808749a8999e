use std::{
    env,
    path::{Path, PathBuf},
};

use crate::{PREFERENCES_FILE, SHELL_ROOT_DIR_NAME, SHELL_ROOT_ENV, WINDOW_STATE_FILE};

pub(crate) fn default_shell_root_dir() -> Option<PathBuf> {
    if let Ok(root) = env::var(SHELL_ROOT_ENV) {
        let path = PathBuf::from(root.trim());
        if !path.as_os_str().is_empty() {
            return Some(path);
        }
    }

    home::home_dir().map(|home| home.join(SHELL_ROOT_DIR_NAME))
}

fn data_file(root_dir: Option<&Path>, file_name: &str) -> Option<PathBuf> {
    root_dir.map(|root| root.join("data").join(file_name))
}

pub(crate) fn window_state_path(root_dir: Option<&Path>) -> Option<PathBuf> {
    data_file(root_dir, WINDOW_STATE_FILE)
}

pub(crate) fn preferences_path(root_dir: Option<&Path>) -> Option<PathBuf> {
    data_file(root_dir, PREFERENCES_FILE)
}
