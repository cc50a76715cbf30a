//! Adapters from Telegram (teloxide) types to shopbot_core types.

use shopbot_core::InboundMessage;
use teloxide::types::{Chat, Message, UserId};

/// Group, supergroup and channel chats are not answered; only private chats are.
pub fn is_group_chat(chat: &Chat) -> bool {
    !chat.is_private()
}

/// Converts a teloxide message into an [`InboundMessage`]. Returns `None` for non-text updates
/// (stickers, photos, service messages).
///
/// The sender id is the chat id, so the reply goes back to the same chat. `bot_id` is the bot's own
/// user id when known; messages from it, or from any other bot account, are marked `from_self`.
pub fn inbound_from_message(msg: &Message, bot_id: Option<UserId>) -> Option<InboundMessage> {
    let text = msg.text()?;
    let from_self = msg
        .from
        .as_ref()
        .map(|u| u.is_bot || Some(u.id) == bot_id)
        .unwrap_or(false);

    Some(InboundMessage {
        sender_id: msg.chat.id.0.to_string(),
        text: text.to_string(),
        from_self,
        is_group: is_group_chat(&msg.chat),
    })
}
