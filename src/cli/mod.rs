//! CLI command definitions for taskbot
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

use crate::logging::LogTarget;
use crate::types::SenderId;
use clap::{Args, Parser, Subcommand};

/// Sender id used by the console transport when none is given.
pub const DEFAULT_CONSOLE_SENDER: SenderId = 1;

/// Task-tracking chat bot
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Path to database file (overrides config)
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: LogTarget,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the Telegram bot (default if no subcommand given)
    Serve,

    /// Read commands from stdin and print replies to stdout
    Console(ConsoleArgs),
}

/// Arguments for the console transport.
#[derive(Args, Debug)]
pub struct ConsoleArgs {
    /// Sender id the commands are attributed to
    #[arg(short, long, default_value_t = DEFAULT_CONSOLE_SENDER)]
    pub sender: SenderId,

    /// Use a throwaway in-memory database instead of the configured one
    #[arg(long)]
    pub in_memory: bool,
}
