//! Console transport: the customer types on stdin, replies are written to stdout.

use anyhow::Result;
use assistant::{handle_inbound, AssistantOrchestrator, DispatchOutcome};
use async_trait::async_trait;
use shopbot_core::{BotError, InboundMessage, Transport};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

/// Lines that end the chat session.
pub const EXIT_COMMANDS: [&str; 2] = ["/salir", "/exit"];

pub struct ConsoleTransport<W> {
    out: Mutex<W>,
    /// Printed before every reply, e.g. the store name.
    label: String,
}

impl<W> ConsoleTransport<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(out: W, label: impl Into<String>) -> Self {
        Self {
            out: Mutex::new(out),
            label: label.into(),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

#[async_trait]
impl<W> Transport for ConsoleTransport<W>
where
    W: AsyncWrite + Unpin + Send,
{
    fn name(&self) -> &str {
        "console"
    }

    async fn send_text(&self, _recipient_id: &str, text: &str) -> shopbot_core::Result<()> {
        let mut out = self.out.lock().await;
        out.write_all(format!("{}: {}\n\n", self.label, text).as_bytes())
            .await?;
        out.flush().await.map_err(BotError::from)
    }
}

/// Reads one customer message per line until EOF or an exit command and answers each through
/// `transport`. Blank lines are skipped. Returns the number of messages answered.
pub async fn run_chat<R, W>(
    input: R,
    transport: &ConsoleTransport<W>,
    orchestrator: &AssistantOrchestrator,
    user_id: &str,
) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send,
{
    let mut lines = input.lines();
    let mut answered = 0;
    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if EXIT_COMMANDS.contains(&text) {
            break;
        }
        let message = InboundMessage::direct(user_id, text);
        if handle_inbound(transport, orchestrator, &message).await == DispatchOutcome::Replied {
            answered += 1;
        }
    }
    Ok(answered)
}
