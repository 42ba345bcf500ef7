//! Configuration types and structures.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the Telegram bot token.
pub const TOKEN_ENV: &str = "TASKBOT_TOKEN";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub replies: RepliesConfig,
}

/// Task store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("taskbot/tasks.db")
}

/// Telegram transport configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token. Usually supplied through `TASKBOT_TOKEN` instead of a file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Texts the bot replies with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepliesConfig {
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Usage text listing every command.
    #[serde(default = "default_help")]
    pub help: String,

    #[serde(default = "default_task_created")]
    pub task_created: String,

    #[serde(default = "default_task_deleted")]
    pub task_deleted: String,

    #[serde(default = "default_description_added")]
    pub description_added: String,

    /// Sent instead of the delete/describe confirmation when no row matched.
    /// Only used with `report_missing`.
    #[serde(default = "default_task_not_found")]
    pub task_not_found: String,

    /// Prefix for replies to unrecognized commands; the raw text follows.
    #[serde(default = "default_unknown_command")]
    pub unknown_command: String,

    /// Prefix for replies to malformed arguments; the reason follows.
    #[serde(default = "default_invalid_arguments")]
    pub invalid_arguments: String,

    #[serde(default = "default_store_unavailable")]
    pub store_unavailable: String,

    /// Reply with `task_not_found` when `/delete` or `/add` touched no rows.
    /// Off by default: both always confirm.
    #[serde(default)]
    pub report_missing: bool,
}

impl Default for RepliesConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            help: default_help(),
            task_created: default_task_created(),
            task_deleted: default_task_deleted(),
            description_added: default_description_added(),
            task_not_found: default_task_not_found(),
            unknown_command: default_unknown_command(),
            invalid_arguments: default_invalid_arguments(),
            store_unavailable: default_store_unavailable(),
            report_missing: false,
        }
    }
}

fn default_greeting() -> String {
    "Hello, user!".to_string()
}

fn default_help() -> String {
    "I know the following commands:\n\
     /start - say hello\n\
     /help - show this message\n\
     /new_item <task name> - add a task\n\
     /all - list all your tasks\n\
     /delete <task number> - delete the given task\n\
     /add <task name> <description> - set the description of a task"
        .to_string()
}

fn default_task_created() -> String {
    "Task added".to_string()
}

fn default_task_deleted() -> String {
    "Task deleted".to_string()
}

fn default_description_added() -> String {
    "Description added".to_string()
}

fn default_task_not_found() -> String {
    "No matching task".to_string()
}

fn default_unknown_command() -> String {
    "Unknown command".to_string()
}

fn default_invalid_arguments() -> String {
    "Invalid arguments".to_string()
}

fn default_store_unavailable() -> String {
    "Task storage is unavailable right now, please try again later".to_string()
}

impl Config {
    /// Load configuration from a single YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        // Empty or comment-only files parse as null
        let config: Option<Config> = serde_yaml::from_str(&content)?;
        Ok(config.unwrap_or_default())
    }

    /// Ensure the database directory exists.
    pub fn ensure_db_dir(&self) -> Result<()> {
        if let Some(parent) = self.store.db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// The bot token, if one is configured.
    pub fn token(&self) -> Option<&str> {
        self.telegram
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str(
            r#"
replies:
  greeting: "Привет, пользователь!"
  report_missing: true
"#,
        )
        .unwrap();
        assert_eq!(config.replies.greeting, "Привет, пользователь!");
        assert!(config.replies.report_missing);
        assert_eq!(config.replies.task_created, "Task added");
        assert_eq!(config.store.db_path, PathBuf::from("taskbot/tasks.db"));
    }

    #[test]
    fn help_lists_every_command() {
        let help = RepliesConfig::default().help;
        for verb in ["/start", "/help", "/new_item", "/all", "/delete", "/add"] {
            assert!(help.contains(verb), "help is missing {}", verb);
        }
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let mut config = Config::default();
        assert_eq!(config.token(), None);
        config.telegram.token = Some("   ".to_string());
        assert_eq!(config.token(), None);
        config.telegram.token = Some("123:abc".to_string());
        assert_eq!(config.token(), Some("123:abc"));
    }

    #[test]
    fn load_empty_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "# nothing here\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert!(!config.replies.report_missing);
    }

    #[test]
    fn ensure_db_dir_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.store.db_path = dir.path().join("nested/deeper/tasks.db");
        config.ensure_db_dir().unwrap();
        assert!(dir.path().join("nested/deeper").is_dir());
    }
}
