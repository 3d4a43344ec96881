use std::{fs, path::Path};

use log::warn;
use serde::Deserialize;

/// Locally persisted display preferences. Read-only in this flow; the only
/// field the submission cares about is the timezone-display toggle.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplaySettings {
    /// Whether times are shown in the airport's local timezone. Passed to
    /// the creation endpoint as the `timezones` query parameter.
    pub local_airport_time: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            local_airport_time: true,
        }
    }
}

impl DisplaySettings {
    /// Reads settings from the given JSON file, falling back to defaults
    /// when the file is absent or unreadable
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => return Self::default(),
        };

        serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!("Ignoring malformed settings file {}: {}", path.display(), e);
            Self::default()
        })
    }
}
