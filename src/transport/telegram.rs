//! Telegram transport.
//!
//! Long-polls the Bot API through teloxide. Text messages starting with `/`
//! are handled as commands from their sender; other chat text is ignored.
//! Replies go back to the sender's private chat.

use super::{ReplySink, handle_command};
use crate::command;
use crate::dispatch::Dispatcher as CommandDispatcher;
use crate::types::SenderId;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use teloxide::{
    Bot,
    dispatching::{Dispatcher, UpdateFilterExt},
    dptree,
    error_handlers::LoggingErrorHandler,
    requests::{Requester, ResponseResult},
    types::{BotCommand, ChatId, Message, Update},
};
use tracing::{debug, info, warn};

/// Sends replies through the Bot API.
pub struct TelegramSink {
    bot: Bot,
}

impl TelegramSink {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ReplySink for TelegramSink {
    async fn send_reply(&self, sender_id: SenderId, text: &str) -> Result<()> {
        self.bot.send_message(ChatId(sender_id), text).await?;
        Ok(())
    }
}

/// Command menu advertised to Telegram clients.
pub fn bot_commands() -> Vec<BotCommand> {
    [
        (command::START, "say hello"),
        (command::HELP, "list the commands"),
        (command::NEW_ITEM, "add a task: /new_item <name>"),
        (command::ALL, "list your tasks"),
        (command::DELETE, "delete a task: /delete <number>"),
        (command::ADD, "describe a task: /add <name> <description>"),
    ]
    .into_iter()
    .map(|(verb, description)| BotCommand::new(verb.trim_start_matches('/'), description))
    .collect()
}

/// Whether a message is addressed to the bot as a command.
fn is_command(text: &str) -> bool {
    text.trim_start().starts_with('/')
}

/// Message handler endpoint for the dispatcher.
async fn message_handler(
    bot: Bot,
    msg: Message,
    dispatcher: Arc<CommandDispatcher>,
) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        debug!(chat_id = msg.chat.id.0, "Ignoring non-text message");
        return Ok(());
    };
    let Some(user) = msg.from.as_ref() else {
        debug!(chat_id = msg.chat.id.0, "Ignoring message without a sender");
        return Ok(());
    };
    let sender_id = user.id.0 as SenderId;

    if !is_command(text) {
        debug!(sender_id, chat_id = msg.chat.id.0, "Ignoring non-command text");
        return Ok(());
    }

    debug!(sender_id, chat_id = msg.chat.id.0, "Command received");

    let sink = TelegramSink::new(bot);
    handle_command(&dispatcher, &sink, sender_id, text).await;
    Ok(())
}

/// Run the bot until interrupted.
pub async fn run(token: &str, dispatcher: CommandDispatcher) -> Result<()> {
    let bot = Bot::new(token);

    let me = bot
        .get_me()
        .await
        .context("failed to reach Telegram with the configured token")?;
    info!(username = ?me.user.username, "Connected to Telegram");

    if let Err(e) = bot.set_my_commands(bot_commands()).await {
        warn!(error = %e, "Failed to register the command menu");
    }

    let handler = dptree::entry().branch(Update::filter_message().endpoint(message_handler));

    info!("Starting dispatcher with long polling");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![Arc::new(dispatcher)])
        .default_handler(|upd| async move {
            debug!("Unhandled update: {:?}", upd);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "Error in message handler",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Dispatcher stopped");
    Ok(())
}
