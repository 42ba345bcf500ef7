//! Command dispatch.
//!
//! Maps each parsed [`Request`] onto the matching store call and renders the
//! outcome as reply lines. Errors never escape [`Dispatcher::dispatch`]: they
//! are turned into a single reply line so the transport loop keeps running.

use crate::command::{self, Request};
use crate::config::RepliesConfig;
use crate::db::Database;
use crate::error::{BotError, BotResult, ErrorCode};
use crate::types::SenderId;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Executes commands against the task store.
#[derive(Clone)]
pub struct Dispatcher {
    db: Database,
    replies: Arc<RepliesConfig>,
}

impl Dispatcher {
    pub fn new(db: Database, replies: RepliesConfig) -> Self {
        Self {
            db,
            replies: Arc::new(replies),
        }
    }

    /// Parse and execute one inbound message. Always yields the replies to
    /// send, which may be empty (listing a user with no tasks).
    pub fn dispatch(&self, sender_id: SenderId, text: &str) -> Vec<String> {
        let start = Instant::now();

        let result = command::parse(text, sender_id).and_then(|request| {
            let verb = request.verb();
            self.execute(&request).map(|replies| (verb, replies))
        });

        match result {
            Ok((verb, replies)) => {
                debug!(
                    verb,
                    sender_id,
                    replies = replies.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Command handled"
                );
                replies
            }
            Err(err) => {
                warn!(
                    sender_id,
                    error_code = ?err.code,
                    error_message = %err.message,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Command failed"
                );
                vec![self.error_reply(&err)]
            }
        }
    }

    /// Execute an already-parsed request.
    pub fn execute(&self, request: &Request) -> BotResult<Vec<String>> {
        match request {
            Request::Greet { sender_id } => {
                debug!(sender_id, "Greeting user");
                Ok(vec![self.replies.greeting.clone()])
            }
            Request::Help => Ok(vec![self.replies.help.clone()]),
            Request::CreateTask { owner_id, name } => {
                let task_id = self.db.create_task(*owner_id, name)?;
                info!(task_id, owner_id, "Task added");
                Ok(vec![self.replies.task_created.clone()])
            }
            Request::ListTasks { owner_id } => {
                let tasks = self.db.list_tasks(*owner_id)?;
                Ok(tasks.iter().map(|t| t.to_reply_line()).collect())
            }
            Request::DeleteTask { task_id } => {
                let affected = self.db.delete_task(*task_id)?;
                info!(task_id, affected, "Task delete requested");
                Ok(vec![self.confirm(affected, &self.replies.task_deleted)])
            }
            Request::SetDescription { name, description } => {
                let affected = self.db.set_description(name, description)?;
                if affected > 1 {
                    warn!(
                        task_name = %name,
                        affected,
                        "Description applied to several tasks sharing a name"
                    );
                } else {
                    info!(task_name = %name, affected, "Description update requested");
                }
                Ok(vec![self.confirm(affected, &self.replies.description_added)])
            }
        }
    }

    fn confirm(&self, affected: usize, confirmation: &str) -> String {
        if affected == 0 && self.replies.report_missing {
            self.replies.task_not_found.clone()
        } else {
            confirmation.to_string()
        }
    }

    /// Render an error as the reply the user sees. Store details stay in the log.
    pub fn error_reply(&self, err: &BotError) -> String {
        match err.code {
            ErrorCode::UnknownCommand => {
                format!("{}: {}", self.replies.unknown_command, err.message)
            }
            ErrorCode::ParseError => {
                format!("{}: {}", self.replies.invalid_arguments, err.message)
            }
            ErrorCode::StoreUnavailable => self.replies.store_unavailable.clone(),
        }
    }
}
