//! Long-polling runner: connects (with retries while the failure is transient), then hands every
//! text update to [`assistant::handle_inbound_in_turn`] in its own task.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use assistant::{handle_inbound_in_turn, AssistantOrchestrator};
use shopbot_core::ConnectionState;
use teloxide::prelude::*;
use teloxide::types::UserId;
use teloxide::RequestError;
use tracing::{error, info, instrument, warn};

use crate::adapters::inbound_from_message;
use crate::transport::TelegramTransport;

/// Wait before a new connection attempt after a recoverable failure.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Maps a `getMe` failure to the connection state it leaves the bot in. API errors (revoked or
/// invalid token) are terminal; network and other request failures are recoverable.
fn closed_state(e: &RequestError) -> ConnectionState {
    match e {
        RequestError::Api(_) => ConnectionState::ClosedTerminal,
        _ => ConnectionState::ClosedRecoverable,
    }
}

/// Calls `getMe` until it succeeds or fails terminally. Returns the bot's own user id.
#[instrument(skip(bot))]
pub async fn connect(bot: &teloxide::Bot) -> Result<UserId> {
    loop {
        info!(state = ?ConnectionState::Connecting, "Connection state changed");
        match bot.get_me().await {
            Ok(me) => {
                info!(
                    state = ?ConnectionState::Open,
                    username = ?me.user.username,
                    "Connection state changed"
                );
                return Ok(me.user.id);
            }
            Err(e) => {
                let state = closed_state(&e);
                if state.should_reconnect() {
                    warn!(error = %e, ?state, delay_secs = RECONNECT_DELAY.as_secs(), "Connection failed; retrying");
                    tokio::time::sleep(RECONNECT_DELAY).await;
                } else {
                    error!(error = %e, ?state, "Connection closed; not reconnecting");
                    return Err(anyhow::anyhow!("Telegram connection closed: {}", e));
                }
            }
        }
    }
}

/// Connects and runs long polling until shutdown (Ctrl-C). Each update is processed in a spawned
/// task so a slow reply never blocks other chats. The sender's turn is reserved before spawning,
/// so one chat's messages are answered in arrival order. Failed `getUpdates` calls are retried by
/// teloxide's polling loop; only the initial connection goes through [`connect`].
#[instrument(skip(bot, orchestrator))]
pub async fn run_polling(bot: teloxide::Bot, orchestrator: Arc<AssistantOrchestrator>) -> Result<()> {
    let bot_id = connect(&bot).await?;

    teloxide::repl(bot, move |bot: Bot, msg: Message| {
        let orchestrator = orchestrator.clone();

        async move {
            let Some(inbound) = inbound_from_message(&msg, Some(bot_id)) else {
                info!(chat_id = msg.chat.id.0, "Received non-text message");
                return respond(());
            };

            let slot = orchestrator.reserve(&inbound.sender_id);
            tokio::spawn(async move {
                info!(
                    chat_id = msg.chat.id.0,
                    message_id = msg.id.0,
                    "step: processing message"
                );
                let transport = TelegramTransport::new(bot);
                let outcome =
                    handle_inbound_in_turn(&transport, &orchestrator, &inbound, slot).await;
                info!(?outcome, "step: message done");
            });

            respond(())
        }
    })
    .await;

    info!(state = ?ConnectionState::ClosedTerminal, "Polling stopped");
    Ok(())
}
