//! Chat transports.
//!
//! A transport receives `(sender, text)` pairs from somewhere, hands them to
//! the [`Dispatcher`], and delivers each reply through a [`ReplySink`].

pub mod console;
pub mod telegram;

use crate::dispatch::Dispatcher;
use crate::types::SenderId;
use anyhow::Result;
use async_trait::async_trait;
use tracing::{error, warn};

/// Delivers reply text back to a chat user.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send_reply(&self, sender_id: SenderId, text: &str) -> Result<()>;
}

/// Handle one inbound command: dispatch it and send every reply in order.
///
/// Store work runs on the blocking pool. A failed send is logged and the
/// remaining replies are still attempted. Returns the number of replies
/// delivered.
pub async fn handle_command<S>(
    dispatcher: &Dispatcher,
    sink: &S,
    sender_id: SenderId,
    text: &str,
) -> usize
where
    S: ReplySink + ?Sized,
{
    let replies = {
        let dispatcher = dispatcher.clone();
        let text = text.to_owned();
        match tokio::task::spawn_blocking(move || dispatcher.dispatch(sender_id, &text)).await {
            Ok(replies) => replies,
            Err(e) => {
                error!(sender_id, error = %e, "Command handler panicked");
                return 0;
            }
        }
    };
    let mut delivered = 0;
    for reply in &replies {
        match sink.send_reply(sender_id, reply).await {
            Ok(()) => delivered += 1,
            Err(e) => warn!(sender_id, error = %e, "Failed to send reply"),
        }
    }
    delivered
}
