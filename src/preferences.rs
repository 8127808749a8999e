use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};

const VIBRANCY_FIELD: &str = "isVibrancyEnabled";

pub(crate) trait PreferenceSource {
    fn is_vibrancy_enabled(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Preferences {
    pub(crate) is_vibrancy_enabled: bool,
}

/// Preferences document shared with the web app. The shell only owns the
/// fields it reads; every other key is preserved on write.
pub(crate) struct FilePreferences {
    path: Option<PathBuf>,
}

fn read_document(path: &Path) -> Result<Option<Value>, String> {
    match fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str::<Value>(&raw)
            .map(Some)
            .map_err(|error| format!("Failed to parse preferences {}: {}", path.display(), error)),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(format!(
            "Failed to read preferences {}: {}",
            path.display(),
            error
        )),
    }
}

impl FilePreferences {
    pub(crate) fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub(crate) fn read_preferences(&self) -> Preferences {
        let Some(path) = self.path.as_deref() else {
            return Preferences::default();
        };

        let document = match read_document(path) {
            Ok(document) => document,
            Err(error) => {
                crate::append_desktop_log(&format!("{error}; using default preferences"));
                None
            }
        };

        Preferences {
            is_vibrancy_enabled: document
                .as_ref()
                .and_then(|value| value.get(VIBRANCY_FIELD))
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }

    /// Persists the vibrancy flag. Returns whether the stored value changed.
    pub(crate) fn write_vibrancy_enabled(&self, enabled: bool) -> Result<bool, String> {
        let Some(path) = self.path.as_deref() else {
            return Err("Preferences path is unavailable.".to_string());
        };

        let mut object = match read_document(path) {
            Ok(Some(Value::Object(map))) => map,
            Ok(Some(_)) => {
                crate::append_desktop_log(&format!(
                    "preferences {} has non-object root; resetting file",
                    path.display()
                ));
                Map::new()
            }
            Ok(None) => Map::new(),
            Err(error) => {
                crate::append_desktop_log(&format!("{error}; resetting file"));
                Map::new()
            }
        };

        let previous = object.get(VIBRANCY_FIELD).and_then(Value::as_bool);
        object.insert(VIBRANCY_FIELD.to_string(), Value::Bool(enabled));

        if let Some(parent_dir) = path.parent() {
            fs::create_dir_all(parent_dir).map_err(|error| {
                format!(
                    "Failed to create preferences directory {}: {}",
                    parent_dir.display(),
                    error
                )
            })?;
        }
        let serialized = serde_json::to_string_pretty(&Value::Object(object))
            .map_err(|error| format!("Failed to serialize preferences: {error}"))?;
        fs::write(path, serialized).map_err(|error| {
            format!(
                "Failed to write preferences {}: {}",
                path.display(),
                error
            )
        })?;

        Ok(previous.unwrap_or(false) != enabled)
    }
}

impl PreferenceSource for FilePreferences {
    fn is_vibrancy_enabled(&self) -> bool {
        self.read_preferences().is_vibrancy_enabled
    }
}
