//! Configuration structures and loading logic.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name of the session file inside the data directory.
const SESSION_FILE_NAME: &str = "session.json";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Remote hosts and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the photo-sharing API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL of the identity provider.
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_url: default_auth_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Where the session is persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session file path. Defaults to the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Feed download options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Directory that relative path templates are resolved against.
    #[serde(default)]
    pub base_directory: Option<PathBuf>,

    /// chrono format used for `{date}` and `{post_date}` of posts and realmojis.
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Keep going with the next item when one item fails.
    #[serde(default)]
    pub continue_on_error: bool,

    /// Whether to show a progress spinner.
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            base_directory: None,
            date_format: default_date_format(),
            continue_on_error: false,
            show_progress: true,
        }
    }
}

fn default_base_url() -> String {
    "https://mobile.bereal.com/api/".to_string()
}

fn default_auth_url() -> String {
    "https://auth.bereal.team/".to_string()
}

fn default_user_agent() -> String {
    "BeReal/1.0.1 (AlexisBarreyat.BeReal; build:9513; iOS 16.0.2) 1.0.0/BRApriKit".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_date_format() -> String {
    "%Y-%m-%d_%H-%M-%S".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("Configuration file not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the effective base directory for relative templates.
    pub fn base_directory(&self) -> PathBuf {
        self.options
            .base_directory
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Get the session file path, falling back to the platform data directory.
    pub fn session_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.session.path {
            return Ok(path.clone());
        }

        let dirs = ProjectDirs::from("", "", "befake").ok_or_else(|| {
            Error::Config(
                "Could not determine a data directory, set [session] path in the config".into(),
            )
        })?;
        Ok(dirs.data_dir().join(SESSION_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.options.date_format, "%Y-%m-%d_%H-%M-%S");
        assert!(!config.options.continue_on_error);
        assert!(config.options.show_progress);
        assert_eq!(config.api.timeout_seconds, 30);
        assert!(config.session.path.is_none());
    }

    #[test]
    fn test_load_and_save_roundtrip_keeps_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[session]
path = "/tmp/befake/session.json"

[options]
base_directory = "/data/bereal"
continue_on_error = true
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(
            config.session_path().unwrap(),
            PathBuf::from("/tmp/befake/session.json")
        );
        assert_eq!(config.base_directory(), PathBuf::from("/data/bereal"));
        assert!(config.options.continue_on_error);

        config.save(&path).unwrap();
        let reloaded = Config::load(&path).unwrap();
        assert_eq!(reloaded.options.base_directory, config.options.base_directory);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/befake.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
