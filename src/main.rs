//! taskbot
//!
//! A chat bot for personal task lists, persisted in SQLite.

use anyhow::{Context, Result, bail};
use clap::Parser;
use taskbot::cli::{Cli, Command, ConsoleArgs};
use taskbot::config::{Config, ConfigLoader, TOKEN_ENV};
use taskbot::db::Database;
use taskbot::dispatch::Dispatcher;
use taskbot::logging;
use taskbot::transport::{console, telegram};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log, cli.verbose)?;

    // SAFETY: set before any other threads touch the environment
    if let Some(config_path) = &cli.config {
        unsafe {
            std::env::set_var("TASKBOT_CONFIG_PATH", config_path);
        }
    }
    let mut loader = ConfigLoader::load()?;
    if let Some(path) = loader.config_path() {
        info!("Config file: {}", path.display());
    }

    if let Some(db_path) = &cli.database {
        loader.config_mut().store.db_path = db_path.into();
    }
    let config = loader.into_config();

    match cli.command {
        Some(Command::Console(args)) => run_console(config, args).await,
        Some(Command::Serve) | None => run_server(config).await,
    }
}

fn open_store(config: &Config) -> Result<Database> {
    config.ensure_db_dir()?;
    info!("Database: {:?}", config.store.db_path);
    let db = Database::open(&config.store.db_path)
        .with_context(|| format!("failed to open database {}", config.store.db_path.display()))?;
    info!("Database initialized successfully");
    Ok(db)
}

/// Run the Telegram bot.
async fn run_server(config: Config) -> Result<()> {
    let Some(token) = config.token().map(str::to_string) else {
        bail!(
            "no Telegram bot token configured; set {} or telegram.token in config.yaml",
            TOKEN_ENV
        );
    };

    info!("Starting taskbot v{}", env!("CARGO_PKG_VERSION"));

    let db = open_store(&config)?;
    let dispatcher = Dispatcher::new(db.clone(), config.replies);

    telegram::run(&token, dispatcher).await?;

    db.close()
}

/// Run the stdin/stdout transport.
async fn run_console(config: Config, args: ConsoleArgs) -> Result<()> {
    let db = if args.in_memory {
        Database::open_in_memory()?
    } else {
        open_store(&config)?
    };
    let dispatcher = Dispatcher::new(db.clone(), config.replies);

    console::run_stdio(&dispatcher, args.sender).await?;

    drop(dispatcher);
    db.close()
}
