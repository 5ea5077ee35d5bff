//! Classifies an upstream message and extracts its card, if any.

use alert_common::Card;

use crate::message::Message;

/// A message is considered a webhook message, not a human chat message,
/// when it arrived `from.application` rather than `from.user`.
pub fn is_webhook_origin(message: &Message) -> bool {
    message.from.application.is_some()
}

/// An attachment counts as a card if its content type contains the
/// `o365connector` token, case-insensitively. Adaptive-card attachments are
/// an accepted extension point but are not parsed today.
pub fn is_card_attachment(message: &Message) -> bool {
    message
        .attachments
        .iter()
        .any(|attachment| attachment.content_type.to_lowercase().contains("o365connector"))
}

/// Picks the first attachment whose content type satisfies the card rule,
/// decodes its `content` string, and parses it as a [`Card`]. Any decoding
/// or validation failure yields `None` rather than propagating — a
/// malformed upstream payload is dropped, not a pipeline error.
pub fn parse_card(message: &Message) -> Option<Card> {
    let attachment = message
        .attachments
        .iter()
        .find(|attachment| attachment.content_type.to_lowercase().contains("o365connector"))?;

    Card::parse(&attachment.content).ok()
}
