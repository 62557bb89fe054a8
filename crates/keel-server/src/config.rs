//! Server and store configuration.

use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding one JSON file per project.
    #[serde(default = "default_projects_dir")]
    pub projects_dir: PathBuf,
    /// Imported as a single project when the store starts out empty.
    #[serde(default)]
    pub legacy_watch_dirs: Vec<PathBuf>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5556
}

fn default_projects_dir() -> PathBuf {
    keel_core::default_dir()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            projects_dir: default_projects_dir(),
            legacy_watch_dirs: Vec::new(),
        }
    }
}

impl Config {
    /// Load config from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from config/default.toml, or fall back to defaults.
    pub fn load() -> Result<Self> {
        let config_path = PathBuf::from("config/default.toml");
        if config_path.exists() {
            return Self::load_from(&config_path);
        }

        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 5556);
        assert_eq!(config.host, "127.0.0.1");
        assert!(config.projects_dir.ends_with(".keel/projects"));
        assert!(config.legacy_watch_dirs.is_empty());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("keel.toml");
        std::fs::write(
            &path,
            "port = 9000\nprojects_dir = \"/srv/keel\"\nlegacy_watch_dirs = [\"/srv/app/src\"]\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.projects_dir, PathBuf::from("/srv/keel"));
        assert_eq!(config.legacy_watch_dirs, vec![PathBuf::from("/srv/app/src")]);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("keel.toml");
        std::fs::write(&path, "port = \"not a number\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
