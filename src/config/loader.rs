//! Configuration loader with tier-based merging.
//!
//! Loads configuration from multiple tiers and merges them field-by-field.

use super::merge::deep_merge_all;
use super::types::{Config, TOKEN_ENV};
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Configuration tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    /// Built-in defaults (lowest priority)
    Defaults = 0,
    /// Project-level config ($CWD/taskbot/)
    Project = 1,
    /// User-level config (~/.taskbot/)
    User = 2,
    /// Environment variables (highest priority)
    Environment = 3,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Defaults => write!(f, "defaults"),
            ConfigTier::Project => write!(f, "project"),
            ConfigTier::User => write!(f, "user"),
            ConfigTier::Environment => write!(f, "environment"),
        }
    }
}

/// Paths for each configuration tier.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project-level config directory
    pub project_dir: Option<PathBuf>,
    /// User-level config directory
    pub user_dir: Option<PathBuf>,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::discover()
    }
}

impl ConfigPaths {
    /// Discover configuration paths from environment and defaults.
    pub fn discover() -> Self {
        // User dir: TASKBOT_USER_DIR or ~/.taskbot
        let user_dir = std::env::var("TASKBOT_USER_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".taskbot")));

        // Project dir: TASKBOT_PROJECT_DIR or $CWD/taskbot
        let project_dir = std::env::var("TASKBOT_PROJECT_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from("taskbot")));

        Self {
            project_dir,
            user_dir,
        }
    }

    /// Create paths with explicit directories.
    pub fn with_dirs(project_dir: Option<PathBuf>, user_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            user_dir,
        }
    }

    /// The config file for a tier, if that tier has a directory.
    pub fn config_file(&self, tier: ConfigTier) -> Option<PathBuf> {
        match tier {
            ConfigTier::Project => self.project_dir.as_ref().map(|d| d.join("config.yaml")),
            ConfigTier::User => self.user_dir.as_ref().map(|d| d.join("config.yaml")),
            ConfigTier::Defaults | ConfigTier::Environment => None,
        }
    }
}

/// Read a YAML tier file as a JSON value. Missing files are skipped silently,
/// unreadable ones with a warning.
fn read_tier(path: &Path, tier: ConfigTier) -> Option<Value> {
    if !path.exists() {
        return None;
    }
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), %tier, error = %e, "Skipping unreadable config file");
            return None;
        }
    };
    match serde_yaml::from_str::<Value>(&content) {
        Ok(value) => {
            debug!(path = %path.display(), %tier, "Loaded config tier");
            Some(value)
        }
        Err(e) => {
            warn!(path = %path.display(), %tier, error = %e, "Skipping malformed config file");
            None
        }
    }
}

/// Configuration loader that handles tier-based merging.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Paths for each tier
    pub paths: ConfigPaths,
    /// Loaded configuration
    config: Config,
    /// Path to the highest-priority config file that was used (if any)
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Load configuration from all tiers with proper merging.
    pub fn load() -> Result<Self> {
        Self::load_with_paths(ConfigPaths::discover())
    }

    /// Load configuration with explicit paths.
    pub fn load_with_paths(paths: ConfigPaths) -> Result<Self> {
        // An explicit config file replaces every file tier
        if let Ok(explicit_path) = std::env::var("TASKBOT_CONFIG_PATH") {
            let path = PathBuf::from(&explicit_path);
            let mut config = Config::load(&path)
                .with_context(|| format!("failed to load config file {}", path.display()))?;
            Self::apply_env_overrides(&mut config);
            return Ok(Self {
                paths,
                config,
                config_path: Some(path),
            });
        }

        let mut configs: Vec<Value> = Vec::new();
        let mut config_path = None;

        // Tier 1: Defaults
        configs.push(serde_json::to_value(Config::default())?);

        // Tier 2 and 3: Project, then user
        for tier in [ConfigTier::Project, ConfigTier::User] {
            if let Some(file) = paths.config_file(tier)
                && let Some(value) = read_tier(&file, tier)
            {
                configs.push(value);
                config_path = Some(file);
            }
        }

        let merged = deep_merge_all(configs);
        let mut config: Config =
            serde_json::from_value(merged).context("invalid merged configuration")?;

        // Tier 4: Environment variable overrides
        Self::apply_env_overrides(&mut config);

        Ok(Self {
            paths,
            config,
            config_path,
        })
    }

    /// Apply environment variable overrides to config.
    fn apply_env_overrides(config: &mut Config) {
        if let Ok(db_path) = std::env::var("TASKBOT_DB_PATH") {
            config.store.db_path = PathBuf::from(db_path);
        }

        if let Ok(token) = std::env::var(TOKEN_ENV) {
            config.telegram.token = Some(token);
        }
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get mutable access to the configuration.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }

    /// Get the config file path that was used.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_paths_discover() {
        let paths = ConfigPaths::discover();
        assert!(paths.project_dir.is_some());
    }

    #[test]
    fn test_load_defaults_only() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::with_dirs(
            Some(temp.path().join("project")),
            Some(temp.path().join("user")),
        );

        let loader = ConfigLoader::load_with_paths(paths).unwrap();

        assert_eq!(loader.config().replies.task_created, "Task added");
        assert!(loader.config_path().is_none());
    }

    #[test]
    fn test_project_config_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("taskbot");
        std::fs::create_dir_all(&project_dir).unwrap();
        std::fs::write(
            project_dir.join("config.yaml"),
            r#"
store:
  db_path: /var/lib/taskbot/tasks.db
replies:
  task_deleted: "Задание удалено"
"#,
        )
        .unwrap();

        let paths = ConfigPaths::with_dirs(Some(project_dir.clone()), Some(temp.path().join("user")));
        let loader = ConfigLoader::load_with_paths(paths).unwrap();
        let config = loader.config();

        assert_eq!(config.store.db_path, PathBuf::from("/var/lib/taskbot/tasks.db"));
        assert_eq!(config.replies.task_deleted, "Задание удалено");
        assert_eq!(config.replies.task_created, "Task added");
        assert_eq!(loader.config_path(), Some(project_dir.join("config.yaml").as_path()));
    }

    #[test]
    fn test_user_config_overrides_project() {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("taskbot");
        let user_dir = temp.path().join("user");
        std::fs::create_dir_all(&project_dir).unwrap();
        std::fs::create_dir_all(&user_dir).unwrap();

        std::fs::write(
            project_dir.join("config.yaml"),
            r#"
replies:
  greeting: project hello
  help: project help
"#,
        )
        .unwrap();
        std::fs::write(
            user_dir.join("config.yaml"),
            r#"
replies:
  greeting: user hello
"#,
        )
        .unwrap();

        let paths = ConfigPaths::with_dirs(Some(project_dir), Some(user_dir));
        let loader = ConfigLoader::load_with_paths(paths).unwrap();
        let replies = &loader.config().replies;

        assert_eq!(replies.greeting, "user hello");
        assert_eq!(replies.help, "project help");
    }

    #[test]
    fn test_malformed_tier_is_skipped() {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("taskbot");
        std::fs::create_dir_all(&project_dir).unwrap();
        std::fs::write(project_dir.join("config.yaml"), "replies: [unclosed").unwrap();

        let paths = ConfigPaths::with_dirs(Some(project_dir), None);
        let loader = ConfigLoader::load_with_paths(paths).unwrap();

        assert_eq!(loader.config().replies.greeting, "Hello, user!");
        assert!(loader.config_path().is_none());
    }
}
