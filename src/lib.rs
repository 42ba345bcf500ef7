//! taskbot library
//!
//! Command parsing, dispatch and persistence for a task-tracking chat bot,
//! plus the transports that feed it.

pub mod cli;
pub mod command;
pub mod config;
pub mod db;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod transport;
pub mod types;
