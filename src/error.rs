//! Structured error types for command handling.

use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// A recognized command with a malformed argument.
    ParseError,
    /// The leading verb is not one the bot knows.
    UnknownCommand,
    /// The store could not execute the statement.
    StoreUnavailable,
}

/// Structured error surfaced to the user as a reply.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct BotError {
    pub code: ErrorCode,
    pub message: String,
    pub field: Option<String>,
}

impl BotError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    // Convenience constructors

    pub fn missing_argument(command: &str, field: &str) -> Self {
        Self::new(
            ErrorCode::ParseError,
            format!("{} needs a {}", command, field),
        )
        .with_field(field)
    }

    pub fn invalid_value(field: &str, reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, reason).with_field(field)
    }

    /// Carries the raw message text so it can be echoed back.
    pub fn unknown_command(raw: &str) -> Self {
        Self::new(ErrorCode::UnknownCommand, raw)
    }

    pub fn store(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::StoreUnavailable, err.to_string())
    }
}

// Store calls return anyhow errors; anything not already a BotError is a store failure.
impl From<anyhow::Error> for BotError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<BotError>() {
            Ok(bot_err) => bot_err,
            Err(err) => BotError::store(err),
        }
    }
}

/// Result type for command operations.
pub type BotResult<T> = std::result::Result<T, BotError>;
