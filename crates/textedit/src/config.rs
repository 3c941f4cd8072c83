use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs::try_exists;

use crate::recent::RecentFiles;

pub const DEFAULT_GEOMETRY: &str = "80x24";

/// Preferences persisted between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub recent_files: RecentFiles,
    #[serde(default = "default_geometry")]
    pub window_geometry: String,
    #[serde(default)]
    pub last_directory: String,
}

fn default_geometry() -> String {
    DEFAULT_GEOMETRY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recent_files: RecentFiles::new(),
            window_geometry: default_geometry(),
            last_directory: String::new(),
        }
    }
}

impl Config {
    /// Read the config at `path`, creating it with defaults when absent. A
    /// broken file is backed up to `.bak` and replaced.
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !try_exists(path).await? {
            log::info!("Config file does not exist, creating default");
            return Ok(Self::create_default(path).await);
        }

        let content = tokio::fs::read_to_string(path).await?;
        if content.trim().is_empty() {
            log::warn!("Config file is empty, creating new one");
            return Ok(Self::create_default(path).await);
        }

        match serde_json::from_str::<Self>(&content) {
            Ok(mut config) => {
                config.validate();
                log::info!("Successfully loaded config from: {}", path.display());
                Ok(config)
            }
            Err(json_err) => {
                log::error!("Failed to parse config file: {}", json_err);

                let backup_path = path.with_extension("bak");
                if let Err(e) = tokio::fs::copy(path, &backup_path).await {
                    log::warn!("Failed to backup broken config: {}", e);
                } else {
                    log::info!("Backed up broken config to: {}", backup_path.display());
                }

                Ok(Self::create_default(path).await)
            }
        }
    }

    /// Write to `path`. Keys already in the file that this version does not
    /// know about are kept; the known keys are overwritten.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        let mut config_to_save = self.clone();
        config_to_save.validate();

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                anyhow::anyhow!(
                    "Failed to create config directory: {} - {}",
                    parent.display(),
                    e
                )
            })?;
        }

        let mut merged = match tokio::fs::read_to_string(path).await {
            Ok(existing) => match serde_json::from_str::<serde_json::Value>(&existing) {
                Ok(serde_json::Value::Object(map)) => map,
                _ => serde_json::Map::new(),
            },
            Err(_) => serde_json::Map::new(),
        };

        if let serde_json::Value::Object(ours) = serde_json::to_value(&config_to_save)? {
            merged.extend(ours);
        }

        let content = serde_json::to_string_pretty(&serde_json::Value::Object(merged))?;
        tokio::fs::write(path, content).await.map_err(|e| {
            anyhow::anyhow!(
                "Failed to write config file: {} - {}",
                path.display(),
                e
            )
        })?;

        log::debug!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Repair values that would break the session.
    pub fn validate(&mut self) {
        if self.recent_files.normalize() {
            log::warn!("Dropped duplicate or excess recent files from config");
        }

        if self.window_geometry.trim().is_empty() {
            log::warn!("Empty window geometry, using default");
            self.window_geometry = default_geometry();
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("TEXTEDIT_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        if let Ok(dir) = std::env::var("TEXTEDIT_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("config.json"));
        }

        ProjectDirs::from("com", "textedit", "textedit")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Log file next to the config file, used while the terminal is taken
    /// over by the editor.
    pub fn log_path() -> Option<PathBuf> {
        let config_path = Self::config_path()?;
        let dir = config_path.parent()?;
        Some(dir.join("textedit.log"))
    }

    async fn create_default(path: &Path) -> Self {
        let default_config = Self::default();
        if let Err(e) = default_config.save_to(path).await {
            log::warn!("Failed to write default config: {}", e);
        }
        default_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};
    use tempfile::TempDir;

    fn config_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.recent_files.is_empty());
        assert_eq!(config.window_geometry, "80x24");
        assert_eq!(config.last_directory, "");
    }

    #[test]
    fn test_config_serialization_keys() {
        let json = serde_json::to_string_pretty(&Config::default()).unwrap();
        assert!(json.contains("\"recent_files\""));
        assert!(json.contains("\"window_geometry\""));
        assert!(json.contains("\"last_directory\""));
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    async fn test_load_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("config.json");

        let config = Config::load_from(&path).await.unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.recent_files = RecentFiles::from_paths(vec![PathBuf::from("/tmp/a.txt")]);
        config.window_geometry = "120x40".to_string();
        config.last_directory = "/tmp".to_string();
        config.save_to(&path).await.unwrap();

        let loaded = Config::load_from(&path).await.unwrap();
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn test_save_preserves_unknown_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"recent_files": ["/old"], "theme": "midnight", "window_geometry": "1x1"}"#,
        )
        .unwrap();

        Config::default().save_to(&path).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["theme"], "midnight");
        assert_eq!(raw["window_geometry"], "80x24");
        assert_eq!(raw["recent_files"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_broken_config_is_backed_up() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let config = Config::load_from(&path).await.unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(
            std::fs::read_to_string(path.with_extension("bak")).unwrap(),
            "{ not json"
        );
    }

    #[tokio::test]
    async fn test_load_validates_recent_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let entries: Vec<String> = (0..12).map(|i| format!("\"/f{}\"", i % 11)).collect();
        std::fs::write(
            &path,
            format!(r#"{{"recent_files": [{}], "window_geometry": ""}}"#, entries.join(",")),
        )
        .unwrap();

        let config = Config::load_from(&path).await.unwrap();
        assert_eq!(config.recent_files.len(), 10);
        assert_eq!(config.window_geometry, DEFAULT_GEOMETRY);
    }

    #[test]
    fn test_config_path_env_overrides() {
        let _guard = config_test_lock().lock().unwrap();
        let previous_dir = std::env::var("TEXTEDIT_CONFIG_DIR").ok();
        let previous_path = std::env::var("TEXTEDIT_CONFIG_PATH").ok();

        std::env::remove_var("TEXTEDIT_CONFIG_PATH");
        std::env::set_var("TEXTEDIT_CONFIG_DIR", "/tmp/textedit-test");
        assert_eq!(
            Config::config_path(),
            Some(PathBuf::from("/tmp/textedit-test/config.json"))
        );

        assert_eq!(
            Config::log_path(),
            Some(PathBuf::from("/tmp/textedit-test/textedit.log"))
        );

        std::env::set_var("TEXTEDIT_CONFIG_PATH", "/tmp/custom.json");
        assert_eq!(Config::config_path(), Some(PathBuf::from("/tmp/custom.json")));
        assert_eq!(Config::log_path(), Some(PathBuf::from("/tmp/textedit.log")));

        match previous_dir {
            Some(value) => std::env::set_var("TEXTEDIT_CONFIG_DIR", value),
            None => std::env::remove_var("TEXTEDIT_CONFIG_DIR"),
        }
        match previous_path {
            Some(value) => std::env::set_var("TEXTEDIT_CONFIG_PATH", value),
            None => std::env::remove_var("TEXTEDIT_CONFIG_PATH"),
        }
    }
}
