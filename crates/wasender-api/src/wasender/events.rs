//! Typed webhook events and the dispatch seam to the host application.
//!
//! The `event` discriminator of an inbound webhook selects one variant of
//! [`WebhookEvent`] through a fixed lookup table. Discriminators outside
//! the table become [`WebhookEvent::Generic`], which keeps the original
//! string.

use async_trait::async_trait;
use log::{debug, info};
use serde_json::Value;
use tokio::sync::broadcast;

/// A webhook delivered by WasenderAPI. Every variant carries the complete
/// request body, `event` key included.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    ChatsUpserted(Value),
    ChatsUpdated(Value),
    ChatsDeleted(Value),
    GroupsUpserted(Value),
    GroupsUpdated(Value),
    GroupParticipantsUpdated(Value),
    ContactsUpserted(Value),
    ContactsUpdated(Value),
    MessagesUpserted(Value),
    MessagesUpdated(Value),
    MessagesDeleted(Value),
    MessagesReaction(Value),
    MessageReceiptUpdated(Value),
    MessageSent(Value),
    SessionStatus(Value),
    QrCodeUpdated(Value),
    /// Discriminator not in the table.
    Generic { event: String, payload: Value },
}

type EventCtor = fn(Value) -> WebhookEvent;

/// Discriminator → variant constructor.
pub const EVENT_TABLE: [(&str, EventCtor); 16] = [
    ("chats.upsert", WebhookEvent::ChatsUpserted),
    ("chats.update", WebhookEvent::ChatsUpdated),
    ("chats.delete", WebhookEvent::ChatsDeleted),
    ("groups.upsert", WebhookEvent::GroupsUpserted),
    ("groups.update", WebhookEvent::GroupsUpdated),
    ("group-participants.update", WebhookEvent::GroupParticipantsUpdated),
    ("contacts.upsert", WebhookEvent::ContactsUpserted),
    ("contacts.update", WebhookEvent::ContactsUpdated),
    ("messages.upsert", WebhookEvent::MessagesUpserted),
    ("messages.update", WebhookEvent::MessagesUpdated),
    ("messages.delete", WebhookEvent::MessagesDeleted),
    ("messages.reaction", WebhookEvent::MessagesReaction),
    ("message-receipt.update", WebhookEvent::MessageReceiptUpdated),
    ("message.sent", WebhookEvent::MessageSent),
    ("session.status", WebhookEvent::SessionStatus),
    ("qrcode.updated", WebhookEvent::QrCodeUpdated),
];

impl WebhookEvent {
    /// Map a discriminator and payload to its event.
    pub fn from_discriminator(event: &str, payload: Value) -> Self {
        match EVENT_TABLE.iter().find(|(name, _)| *name == event) {
            Some((_, ctor)) => ctor(payload),
            None => WebhookEvent::Generic {
                event: event.to_string(),
                payload,
            },
        }
    }

    /// The discriminator this event was resolved from.
    pub fn discriminator(&self) -> &str {
        match self {
            Self::ChatsUpserted(_) => "chats.upsert",
            Self::ChatsUpdated(_) => "chats.update",
            Self::ChatsDeleted(_) => "chats.delete",
            Self::GroupsUpserted(_) => "groups.upsert",
            Self::GroupsUpdated(_) => "groups.update",
            Self::GroupParticipantsUpdated(_) => "group-participants.update",
            Self::ContactsUpserted(_) => "contacts.upsert",
            Self::ContactsUpdated(_) => "contacts.update",
            Self::MessagesUpserted(_) => "messages.upsert",
            Self::MessagesUpdated(_) => "messages.update",
            Self::MessagesDeleted(_) => "messages.delete",
            Self::MessagesReaction(_) => "messages.reaction",
            Self::MessageReceiptUpdated(_) => "message-receipt.update",
            Self::MessageSent(_) => "message.sent",
            Self::SessionStatus(_) => "session.status",
            Self::QrCodeUpdated(_) => "qrcode.updated",
            Self::Generic { event, .. } => event,
        }
    }

    pub fn payload(&self) -> &Value {
        match self {
            Self::ChatsUpserted(p)
            | Self::ChatsUpdated(p)
            | Self::ChatsDeleted(p)
            | Self::GroupsUpserted(p)
            | Self::GroupsUpdated(p)
            | Self::GroupParticipantsUpdated(p)
            | Self::ContactsUpserted(p)
            | Self::ContactsUpdated(p)
            | Self::MessagesUpserted(p)
            | Self::MessagesUpdated(p)
            | Self::MessagesDeleted(p)
            | Self::MessagesReaction(p)
            | Self::MessageReceiptUpdated(p)
            | Self::MessageSent(p)
            | Self::SessionStatus(p)
            | Self::QrCodeUpdated(p) => p,
            Self::Generic { payload, .. } => payload,
        }
    }

    pub fn into_payload(self) -> Value {
        match self {
            Self::ChatsUpserted(p)
            | Self::ChatsUpdated(p)
            | Self::ChatsDeleted(p)
            | Self::GroupsUpserted(p)
            | Self::GroupsUpdated(p)
            | Self::GroupParticipantsUpdated(p)
            | Self::ContactsUpserted(p)
            | Self::ContactsUpdated(p)
            | Self::MessagesUpserted(p)
            | Self::MessagesUpdated(p)
            | Self::MessagesDeleted(p)
            | Self::MessagesReaction(p)
            | Self::MessageReceiptUpdated(p)
            | Self::MessageSent(p)
            | Self::SessionStatus(p)
            | Self::QrCodeUpdated(p) => p,
            Self::Generic { payload, .. } => payload,
        }
    }

    /// The `data` member of the payload, where WasenderAPI puts the event
    /// body.
    pub fn data(&self) -> Option<&Value> {
        self.payload().get("data")
    }

    pub fn is_generic(&self) -> bool {
        matches!(self, Self::Generic { .. })
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Dispatch
// ═══════════════════════════════════════════════════════════════════════

/// Receives every accepted webhook event. Implemented by the host.
#[async_trait]
pub trait EventDispatcher: Send + Sync {
    async fn dispatch(&self, event: WebhookEvent);
}

/// Fans events out to any number of `tokio` broadcast subscribers.
#[derive(Debug, Clone)]
pub struct BroadcastDispatcher {
    tx: broadcast::Sender<WebhookEvent>,
}

impl BroadcastDispatcher {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WebhookEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastDispatcher {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl EventDispatcher for BroadcastDispatcher {
    async fn dispatch(&self, event: WebhookEvent) {
        let name = event.discriminator().to_string();
        match self.tx.send(event) {
            Ok(n) => info!("Dispatched webhook event {} to {} subscriber(s)", name, n),
            Err(_) => debug!("No subscribers for webhook event {}, dropped", name),
        }
    }
}

/// Dispatches by calling a closure.
pub struct FnDispatcher<F>(pub F);

#[async_trait]
impl<F> EventDispatcher for FnDispatcher<F>
where
    F: Fn(WebhookEvent) + Send + Sync,
{
    async fn dispatch(&self, event: WebhookEvent) {
        (self.0)(event)
    }
}
