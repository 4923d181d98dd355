use std::fs;

use serde::Deserialize;
use shared::domain::FilterDimension;

/// Console settings: `console.toml` in the working directory, overridden
/// by environment variables, overridden by command-line flags.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_url: String,
    pub filter: FilterDimension,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            filter: FilterDimension::Ui,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("console.toml") {
        match toml::from_str::<Settings>(&raw) {
            Ok(file_settings) => settings = file_settings,
            Err(err) => tracing::warn!(error = %err, "ignoring malformed console.toml"),
        }
    }

    if let Ok(v) = std::env::var("TASKS_SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("TASKS_FILTER") {
        match v.parse() {
            Ok(filter) => settings.filter = filter,
            Err(err) => tracing::warn!(error = %err, "ignoring TASKS_FILTER"),
        }
    }

    settings
}
