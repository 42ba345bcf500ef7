//! Line-oriented console transport.
//!
//! Reads one command per line and prints every reply on its own line. All
//! commands are attributed to a single sender id chosen at startup.

use super::{ReplySink, handle_command};
use crate::dispatch::Dispatcher;
use crate::types::SenderId;
use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::info;

/// Writes replies as lines to any async writer.
pub struct ConsoleSink<W> {
    out: Mutex<W>,
}

impl<W> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

#[async_trait]
impl<W> ReplySink for ConsoleSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send_reply(&self, _sender_id: SenderId, text: &str) -> Result<()> {
        let mut out = self.out.lock().await;
        out.write_all(text.as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await?;
        Ok(())
    }
}

/// Feed every non-blank line of `input` to the dispatcher until EOF.
/// Returns the number of commands handled.
pub async fn run<R, S>(
    dispatcher: &Dispatcher,
    sender_id: SenderId,
    input: R,
    sink: &S,
) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    S: ReplySink + ?Sized,
{
    let mut lines = input.lines();
    let mut handled = 0;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        handle_command(dispatcher, sink, sender_id, line).await;
        handled += 1;
    }
    Ok(handled)
}

/// Run the console transport on stdin/stdout.
pub async fn run_stdio(dispatcher: &Dispatcher, sender_id: SenderId) -> Result<()> {
    info!(sender_id, "Console transport reading commands from stdin");
    let sink = ConsoleSink::new(tokio::io::stdout());
    let handled = run(dispatcher, sender_id, BufReader::new(tokio::io::stdin()), &sink).await?;
    info!(handled, "Console input closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepliesConfig;
    use crate::db::Database;

    #[tokio::test]
    async fn replays_script_and_prints_replies() {
        let d = Dispatcher::new(Database::open_in_memory().unwrap(), RepliesConfig::default());
        let script = b"/new_item Walk the dog\n\n   \n/all\n/delete 1\n/all\n";
        let sink = ConsoleSink::new(Vec::new());

        let handled = run(&d, 42, BufReader::new(&script[..]), &sink).await.unwrap();

        assert_eq!(handled, 4);
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output, "Task added\nWalk the dog,empty\nTask deleted\n");
    }
}
