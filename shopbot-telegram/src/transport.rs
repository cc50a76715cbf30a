//! Wraps teloxide::Bot and implements [`shopbot_core::Transport`].

use async_trait::async_trait;
use shopbot_core::{BotError, Result, Transport};
use teloxide::{prelude::*, types::ChatAction, types::ChatId};

/// Thin wrapper around teloxide::Bot; recipient ids are Telegram chat ids in decimal form.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: teloxide::Bot,
}

impl TelegramTransport {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

fn chat_id(recipient_id: &str) -> Result<ChatId> {
    recipient_id
        .parse::<i64>()
        .map(ChatId)
        .map_err(|_| BotError::Transport(format!("Invalid Telegram chat id: {}", recipient_id)))
}

#[async_trait]
impl Transport for TelegramTransport {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send_text(&self, recipient_id: &str, text: &str) -> Result<()> {
        self.bot
            .send_message(chat_id(recipient_id)?, text.to_string())
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;
        Ok(())
    }

    async fn send_typing(&self, recipient_id: &str) -> Result<()> {
        self.bot
            .send_chat_action(chat_id(recipient_id)?, ChatAction::Typing)
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;
        Ok(())
    }
}
