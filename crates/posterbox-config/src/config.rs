//! Configuration structures and loading.

use crate::credentials::{MailCredentials, SERVER_VAR};
use crate::error::{ConfigError, ConfigResult};
use crate::paths::AppPaths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mail: MailConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub ocr: OcrConfig,

    #[serde(default)]
    pub tagging: TaggingConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration from the default location, then apply environment
    /// overrides. A `.env` file in the working directory is read first.
    pub fn load() -> ConfigResult<Self> {
        if let Ok(path) = dotenv::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }

        let paths = AppPaths::new().ok_or(ConfigError::NoConfigDir)?;
        let mut config = Self::load_from(&paths.config_file)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every pass fail.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.mail.port == 0 {
            return Err(ConfigError::Invalid("mail.port must not be 0".to_string()));
        }
        if self.mail.inbox.trim().is_empty() || self.mail.processed_folder.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "mail.inbox and mail.processed_folder must not be empty".to_string(),
            ));
        }
        if self.mail.inbox == self.mail.processed_folder {
            return Err(ConfigError::Invalid(format!(
                "mail.processed_folder must differ from mail.inbox ('{}')",
                self.mail.inbox
            )));
        }
        Ok(())
    }

    /// Apply environment-sourced settings on top of the file values.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(server) = lookup(SERVER_VAR).filter(|s| !s.trim().is_empty()) {
            self.mail.server = server.trim().to_string();
        }
    }

    /// Mail credentials from the environment. Must succeed before any
    /// connection attempt.
    pub fn credentials(&self) -> ConfigResult<MailCredentials> {
        MailCredentials::from_env()
    }

    /// Create a default config file with comments.
    pub fn create_default_file(path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, Self::default_config_string())?;
        Ok(())
    }

    /// Generate a default config file with helpful comments.
    pub fn default_config_string() -> String {
        r#"# Posterbox Configuration
# Credentials are never read from this file: set EMAIL_ACCOUNT and
# EMAIL_PASSWORD in the environment (or a .env file).

[mail]
# IMAP server (IMAP_SERVER overrides this)
server = "imap.gmail.com"
port = 993

# Folder scanned for unseen messages
inbox = "INBOX"

# Folder that receives processed messages
processed_folder = "Processed"

[storage]
# Defaults live in the platform data directory
# attachment_dir = "~/posterbox/attachments"
# database_file = "~/posterbox/posters.db"
# export_file = "~/posterbox/frontend/posters.json"

[ocr]
enabled = true
language = "eng"
page_segmentation = 1

[tagging]
enabled = true
host = "http://localhost:11434"
model = "llama3.2"
timeout_seconds = 60
entity_kinds = ["places", "organizations", "events", "facilities", "locations"]

[ui]
color = true
"#
        .to_string()
    }
}

/// Mailbox settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub server: String,
    pub port: u16,
    pub inbox: String,
    pub processed_folder: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            server: "imap.gmail.com".to_string(),
            port: 993,
            inbox: "INBOX".to_string(),
            processed_folder: "Processed".to_string(),
        }
    }
}

/// Where attachments, the database and the export are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub attachment_dir: Option<String>,
    pub database_file: Option<String>,
    pub export_file: Option<String>,
}

impl StorageConfig {
    pub fn attachment_dir(&self, paths: &AppPaths) -> PathBuf {
        resolve(self.attachment_dir.as_deref(), &paths.attachment_dir)
    }

    pub fn database_file(&self, paths: &AppPaths) -> PathBuf {
        resolve(self.database_file.as_deref(), &paths.database_file)
    }

    pub fn export_file(&self, paths: &AppPaths) -> PathBuf {
        resolve(self.export_file.as_deref(), &paths.export_file)
    }
}

fn resolve(configured: Option<&str>, default: &Path) -> PathBuf {
    match configured {
        Some(path) => PathBuf::from(shellexpand::tilde(path).into_owned()),
        None => default.to_path_buf(),
    }
}

/// Text recognition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub enabled: bool,
    pub language: String,
    pub page_segmentation: u8,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            language: "eng".to_string(),
            page_segmentation: 1,
        }
    }
}

/// Tag extraction settings (Ollama-backed entity recognition).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggingConfig {
    pub enabled: bool,
    pub host: String,
    pub model: String,
    pub timeout_seconds: u64,
    pub entity_kinds: Vec<String>,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            timeout_seconds: 60,
            entity_kinds: vec![
                "places".to_string(),
                "organizations".to_string(),
                "events".to_string(),
                "facilities".to_string(),
                "locations".to_string(),
            ],
        }
    }
}

/// UI/Display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub color: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.mail.server, "imap.gmail.com");
        assert_eq!(config.mail.port, 993);
        assert_eq!(config.mail.processed_folder, "Processed");
        assert!(config.ocr.enabled);
        assert_eq!(config.tagging.entity_kinds.len(), 5);
    }

    #[test]
    fn test_default_config_string_parses() {
        let config: Config = toml::from_str(&Config::default_config_string()).unwrap();
        assert_eq!(config.mail.inbox, "INBOX");
        assert_eq!(config.tagging.host, "http://localhost:11434");
        assert!(config.storage.database_file.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
            [mail]
            server = "imap.example.org"

            [storage]
            database_file = "/var/lib/posterbox/posters.db"
            "#
        )
        .unwrap();

        let config = Config::load_from(temp_file.path()).unwrap();

        assert_eq!(config.mail.server, "imap.example.org");
        // Defaults should still work
        assert_eq!(config.mail.port, 993);
        assert_eq!(config.mail.processed_folder, "Processed");

        let paths = AppPaths::new().unwrap();
        assert_eq!(
            config.storage.database_file(&paths),
            PathBuf::from("/var/lib/posterbox/posters.db")
        );
        assert_eq!(config.storage.attachment_dir(&paths), paths.attachment_dir);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.mail.server, "imap.gmail.com");
    }

    #[test]
    fn test_env_override_server() {
        let mut config = Config::default();
        config.apply_env_overrides(|key| {
            (key == SERVER_VAR).then(|| " imap.fastmail.com ".to_string())
        });
        assert_eq!(config.mail.server, "imap.fastmail.com");

        config.apply_env_overrides(|_| Some(String::new()));
        assert_eq!(config.mail.server, "imap.fastmail.com");
    }

    #[test]
    fn test_invalid_mail_settings_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[mail]\ninbox = \"INBOX\"\nprocessed_folder = \"INBOX\"").unwrap();

        let err = Config::load_from(temp_file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let mut config = Config::default();
        config.mail.port = 0;
        assert!(config.validate().is_err());
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_create_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        Config::create_default_file(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.mail.processed_folder, "Processed");
        assert_eq!(loaded.tagging.model, "llama3.2");
    }
}
