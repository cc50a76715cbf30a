//! Inbound message dispatch: filter, typing indicator, reply, send.

use shopbot_core::{InboundMessage, Transport};
use tracing::{info, instrument, warn};

use crate::orchestrator::AssistantOrchestrator;
use crate::user_locks::TurnSlot;

/// What happened to one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Self-sent, group, or blank message; nothing was done.
    Skipped,
    /// The reply was produced and handed to the transport.
    Replied,
    /// The reply was produced but the transport failed to send it.
    SendFailed,
}

/// Answers `message` through `transport`. Never returns an error: failures are logged and reported
/// in the outcome so the transport's event loop keeps running.
pub async fn handle_inbound(
    transport: &dyn Transport,
    orchestrator: &AssistantOrchestrator,
    message: &InboundMessage,
) -> DispatchOutcome {
    let slot = orchestrator.reserve(&message.sender_id);
    handle_inbound_in_turn(transport, orchestrator, message, slot).await
}

/// [`handle_inbound`] for a message whose place in the sender's queue was reserved with
/// [`AssistantOrchestrator::reserve`]. Transports that process updates in spawned tasks reserve
/// before spawning so the sender's messages are answered in arrival order. The slot is held until
/// the reply has been handed to the transport.
#[instrument(skip(transport, orchestrator, message, slot), fields(transport = transport.name(), sender_id = %message.sender_id))]
pub async fn handle_inbound_in_turn(
    transport: &dyn Transport,
    orchestrator: &AssistantOrchestrator,
    message: &InboundMessage,
    mut slot: TurnSlot,
) -> DispatchOutcome {
    if !message.should_answer() {
        info!(
            from_self = message.from_self,
            is_group = message.is_group,
            "Skipping message"
        );
        return DispatchOutcome::Skipped;
    }

    info!(message_content = %message.text, "Received message");

    if let Err(e) = transport.send_typing(&message.sender_id).await {
        warn!(error = %e, "Failed to send typing indicator");
    }

    let reply = orchestrator
        .reply_in_turn(&mut slot, &message.sender_id, &message.text)
        .await;

    match transport.send_text(&message.sender_id, &reply).await {
        Ok(()) => {
            info!(reply_len = reply.len(), "Reply sent");
            DispatchOutcome::Replied
        }
        Err(e) => {
            warn!(error = %e, "Failed to send reply");
            DispatchOutcome::SendFailed
        }
    }
}
