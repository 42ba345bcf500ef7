//! Layered configuration.
//!
//! Configuration is merged field-by-field from four tiers, later tiers winning:
//! 1. **Defaults** - built into the binary
//! 2. **Project** - `$CWD/taskbot/config.yaml`
//! 3. **User** - `~/.taskbot/config.yaml`
//! 4. **Environment** - variables below
//!
//! CLI flags are applied on top by `main`.
//!
//! ## Environment Variables
//! - `TASKBOT_CONFIG_PATH` - Explicit config file (replaces the file tiers)
//! - `TASKBOT_DB_PATH` - Database path
//! - `TASKBOT_TOKEN` - Telegram bot token
//! - `TASKBOT_USER_DIR` - User config dir (default: `~/.taskbot`)
//! - `TASKBOT_PROJECT_DIR` - Project config dir (default: `./taskbot`)

mod loader;
mod merge;
mod types;

pub use loader::{ConfigLoader, ConfigPaths, ConfigTier};
pub use merge::deep_merge;
pub use types::*;
