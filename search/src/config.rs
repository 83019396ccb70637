//! Configuration for repository search.
//!
//! REGOV_ROOT resolution order:
//! 1. Explicit path passed to Config::load_from()
//! 2. REGOV_ROOT environment variable
//! 3. Default: platform data directory (e.g. ~/.local/share/regov)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const CONFIG_FILE: &str = "config.toml";

/// Search configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Root directory for regov data and configuration.
    #[serde(skip)]
    pub regov_root: PathBuf,

    /// Directory holding descriptor snapshots. Relative paths resolve
    /// against the root.
    #[serde(default = "default_descriptor_dir")]
    pub descriptor_dir: PathBuf,

    /// Output format for search results: table or json.
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Log filter used when RUST_LOG is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_descriptor_dir() -> PathBuf {
    PathBuf::from("descriptors")
}

fn default_output_format() -> String {
    "table".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Config {
    /// Create a new config with the given REGOV_ROOT.
    pub fn with_root(regov_root: impl Into<PathBuf>) -> Self {
        Self {
            regov_root: regov_root.into(),
            descriptor_dir: default_descriptor_dir(),
            output_format: default_output_format(),
            log_filter: default_log_filter(),
        }
    }

    /// Load config from REGOV_ROOT/config.toml, or create default.
    pub fn load() -> Result<Self> {
        let regov_root = resolve_regov_root()?;
        Self::load_from(&regov_root)
    }

    /// Load config from a specific REGOV_ROOT.
    pub fn load_from(regov_root: &Path) -> Result<Self> {
        let config_path = regov_root.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let mut config: Config = toml::from_str(&contents)
                .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
            config.regov_root = regov_root.to_path_buf();
            Ok(config)
        } else {
            Ok(Self::with_root(regov_root))
        }
    }

    /// Save config to REGOV_ROOT/config.toml.
    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(&self.regov_root)?;
        std::fs::write(self.config_path(), self.to_toml()?)?;
        Ok(())
    }

    /// Render the config as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }

    pub fn config_path(&self) -> PathBuf {
        self.regov_root.join(CONFIG_FILE)
    }

    /// Descriptor directory, resolved against the root.
    pub fn descriptors_path(&self) -> PathBuf {
        if self.descriptor_dir.is_absolute() {
            self.descriptor_dir.clone()
        } else {
            self.regov_root.join(&self.descriptor_dir)
        }
    }
}

/// Resolve REGOV_ROOT using the standard resolution order.
fn resolve_regov_root() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("REGOV_ROOT") {
        return Ok(PathBuf::from(path));
    }

    if let Some(proj_dirs) = ProjectDirs::from("", "", "regov") {
        return Ok(proj_dirs.data_dir().to_path_buf());
    }

    let home = std::env::var("HOME")
        .map_err(|_| Error::Config("Could not determine home directory".to_string()))?;
    Ok(PathBuf::from(home).join(".local/share/regov"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_with_root() {
        let config = Config::with_root("/tmp/test-regov");
        assert_eq!(config.regov_root, PathBuf::from("/tmp/test-regov"));
        assert_eq!(config.output_format, "table");
        assert_eq!(config.log_filter, "warn");
        assert_eq!(config.descriptors_path(), PathBuf::from("/tmp/test-regov/descriptors"));
    }

    #[test]
    fn test_absolute_descriptor_dir() {
        let mut config = Config::with_root("/tmp/test-regov");
        config.descriptor_dir = PathBuf::from("/srv/descriptors");
        assert_eq!(config.descriptors_path(), PathBuf::from("/srv/descriptors"));
    }

    #[test]
    fn test_load_missing_config_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_from(tmp.path()).unwrap();
        assert_eq!(config, Config::with_root(tmp.path()));
    }

    #[test]
    fn test_config_save_load() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("regov");

        let mut config = Config::with_root(&root);
        config.output_format = "json".to_string();
        config.save().unwrap();

        let loaded = Config::load_from(&root).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_file() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE), "log_filter = \"debug\"\n").unwrap();

        let config = Config::load_from(tmp.path()).unwrap();
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.output_format, "table");
    }

    #[test]
    fn test_invalid_config_file() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE), "output_format = [").unwrap();

        let result = Config::load_from(tmp.path());
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
