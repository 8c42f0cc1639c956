use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::model::Session;

// Default configuration
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5005/";

const KEYRING_SERVICE: &str = "slackr-client";
const KEYRING_ENTRY: &str = "session";

/// Settings persisted between runs
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Settings {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Prefills the login form
    #[serde(default)]
    pub last_email: String,
    #[serde(default)]
    pub theme: String,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            last_email: String::new(),
            theme: "dark".to_string(),
        }
    }
}

pub fn settings_path() -> Result<PathBuf, ConfigError> {
    let proj = ProjectDirs::from("com", "slackr", "slackr-client").ok_or(ConfigError::NoConfigDir)?;
    let dir = proj.config_dir();
    fs::create_dir_all(dir)?;
    Ok(dir.join("settings.json"))
}

/// Load settings, falling back to defaults when the file is missing or unreadable
pub fn load_settings() -> Settings {
    match settings_path().and_then(|path| read_settings(&path)) {
        Ok(settings) => settings,
        Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
        Err(e) => {
            tracing::warn!("using default settings: {}", e);
            Settings::default()
        }
    }
}

fn read_settings(path: &std::path::Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_settings(settings: &Settings) -> Result<(), ConfigError> {
    let path = settings_path()?;
    let data = serde_json::to_string_pretty(settings)?;
    let mut file = fs::File::create(path)?;
    file.write_all(data.as_bytes())?;
    Ok(())
}

fn session_entry() -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(KEYRING_SERVICE, KEYRING_ENTRY)?)
}

/// Session saved by a previous run, if the keyring has one
pub fn load_session() -> Option<Session> {
    let secret = match session_entry().and_then(|entry| Ok(entry.get_password()?)) {
        Ok(secret) => secret,
        Err(ConfigError::Keyring(keyring::Error::NoEntry)) => return None,
        Err(e) => {
            tracing::warn!("could not read stored session: {}", e);
            return None;
        }
    };
    serde_json::from_str(&secret).ok()
}

pub fn save_session(session: &Session) -> Result<(), ConfigError> {
    let secret = serde_json::to_string(session)?;
    session_entry()?.set_password(&secret)?;
    Ok(())
}

pub fn clear_session() -> Result<(), ConfigError> {
    match session_entry()?.delete_password() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.backend_url, DEFAULT_BACKEND_URL);
        assert!(settings.last_email.is_empty());
    }

    #[test]
    fn test_settings_roundtrip_file() {
        let dir = std::env::temp_dir().join(format!("slackr-settings-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");
        let settings = Settings {
            backend_url: "http://example.test:5005/".into(),
            last_email: "alice@example.com".into(),
            theme: "light".into(),
        };
        fs::write(&path, serde_json::to_string_pretty(&settings).unwrap()).unwrap();
        assert_eq!(read_settings(&path).unwrap(), settings);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_corrupt_settings_is_format_error() {
        let dir = std::env::temp_dir().join(format!("slackr-corrupt-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(read_settings(&path), Err(ConfigError::Format(_))));
        fs::remove_dir_all(&dir).unwrap();
    }
}
