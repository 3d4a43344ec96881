use std::{env, path::PathBuf};

/// Where the logbook API lives when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Environment-driven client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the logbook API, from `CONTRAIL_API_URL`
    pub api_url: String,
    /// Bearer token for the API, from `CONTRAIL_TOKEN`
    pub token: Option<String>,
    /// Path of the display settings file, from `CONTRAIL_SETTINGS`
    pub settings_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let api_url =
            env::var("CONTRAIL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let token = env::var("CONTRAIL_TOKEN").ok().filter(|t| !t.is_empty());

        let settings_path = env::var("CONTRAIL_SETTINGS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_settings_path());

        Self {
            api_url,
            token,
            settings_path,
        }
    }
}

fn default_settings_path() -> PathBuf {
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".config/contrail/settings.json")
}
