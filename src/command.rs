//! Command parsing.
//!
//! Turns the raw text of an inbound chat message into a [`Request`]. The
//! leading whitespace-delimited token is the verb; each verb has its own
//! argument grammar:
//!
//! | Verb        | Arguments                                      |
//! |-------------|------------------------------------------------|
//! | `/start`    | none                                           |
//! | `/help`     | none                                           |
//! | `/new_item` | rest of the line, trimmed (may contain spaces) |
//! | `/all`      | none                                           |
//! | `/delete`   | exactly one integer token                      |
//! | `/add`      | first two tokens; further tokens are ignored   |
//!
//! Verbs are case-sensitive. A Telegram bot mention on the verb
//! (`/all@my_bot`) is stripped before matching.

use crate::error::{BotError, BotResult};
use crate::types::{SenderId, TaskId};

pub const START: &str = "/start";
pub const HELP: &str = "/help";
pub const NEW_ITEM: &str = "/new_item";
pub const ALL: &str = "/all";
pub const DELETE: &str = "/delete";
pub const ADD: &str = "/add";

/// A parsed command, ready for the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Greet { sender_id: SenderId },
    Help,
    CreateTask { owner_id: SenderId, name: String },
    ListTasks { owner_id: SenderId },
    DeleteTask { task_id: TaskId },
    SetDescription { name: String, description: String },
}

impl Request {
    /// The verb this request was parsed from.
    pub fn verb(&self) -> &'static str {
        match self {
            Request::Greet { .. } => START,
            Request::Help => HELP,
            Request::CreateTask { .. } => NEW_ITEM,
            Request::ListTasks { .. } => ALL,
            Request::DeleteTask { .. } => DELETE,
            Request::SetDescription { .. } => ADD,
        }
    }
}

/// Split a message into its verb (mention stripped) and the remaining text.
fn split_verb(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    let (verb, rest) = text
        .split_once(char::is_whitespace)
        .unwrap_or((text, ""));
    let verb = verb.split_once('@').map_or(verb, |(bare, _mention)| bare);
    (verb, rest)
}

/// Parse raw message text sent by `sender_id`.
pub fn parse(text: &str, sender_id: SenderId) -> BotResult<Request> {
    let (verb, rest) = split_verb(text);

    match verb {
        START => Ok(Request::Greet { sender_id }),
        HELP => Ok(Request::Help),
        NEW_ITEM => parse_new_item(rest, sender_id),
        ALL => Ok(Request::ListTasks { owner_id: sender_id }),
        DELETE => parse_delete(rest),
        ADD => parse_add(rest),
        _ => Err(BotError::unknown_command(text)),
    }
}

fn parse_new_item(rest: &str, owner_id: SenderId) -> BotResult<Request> {
    let name = rest.trim();
    if name.is_empty() {
        return Err(BotError::missing_argument(NEW_ITEM, "task name"));
    }
    Ok(Request::CreateTask {
        owner_id,
        name: name.to_string(),
    })
}

fn parse_delete(rest: &str) -> BotResult<Request> {
    let mut tokens = rest.split_whitespace();
    let raw_id = tokens
        .next()
        .ok_or_else(|| BotError::missing_argument(DELETE, "task id"))?;
    if tokens.next().is_some() {
        return Err(BotError::invalid_value(
            "task id",
            format!("{} takes a single task id", DELETE),
        ));
    }
    let task_id = raw_id.parse::<TaskId>().map_err(|_| {
        BotError::invalid_value("task id", format!("'{}' is not a valid task id", raw_id))
    })?;
    Ok(Request::DeleteTask { task_id })
}

fn parse_add(rest: &str) -> BotResult<Request> {
    let mut tokens = rest.split_whitespace();
    let name = tokens
        .next()
        .ok_or_else(|| BotError::missing_argument(ADD, "task name"))?;
    let description = tokens
        .next()
        .ok_or_else(|| BotError::missing_argument(ADD, "description"))?;
    Ok(Request::SetDescription {
        name: name.to_string(),
        description: description.to_string(),
    })
}
