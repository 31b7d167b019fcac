//! In-process activity bus backed by a `tokio::sync::broadcast` channel.
//!
//! Shared via `Arc<ActivityBus>` across the application. Publishing never
//! blocks and never fails the request that triggered it.

use answer_core::content::ContentKind;
use answer_core::operation::{activity_key, ActivityAction};
use answer_core::types::DbId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// ActivityEvent
// ---------------------------------------------------------------------------

/// An authoring or moderation activity on one content item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// `{object_type}.{action}`, e.g. `"question.closed"`.
    pub activity_type: String,

    pub object_type: String,

    pub object_id: DbId,

    /// Owner of the item.
    pub user_id: Option<DbId>,

    /// User who performed the action.
    pub trigger_user_id: Option<DbId>,

    /// Action-specific data, e.g. the close reason.
    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl ActivityEvent {
    pub fn new(kind: ContentKind, action: ActivityAction, object_id: DbId) -> Self {
        Self {
            activity_type: activity_key(kind, action),
            object_type: kind.object_type().to_string(),
            object_id,
            user_id: None,
            trigger_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Set the owner of the item.
    pub fn with_owner(mut self, user_id: DbId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Set the acting user.
    pub fn with_trigger(mut self, user_id: DbId) -> Self {
        self.trigger_user_id = Some(user_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// ActivityBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out bus for [`ActivityEvent`]s.
pub struct ActivityBus {
    sender: broadcast::Sender<ActivityEvent>,
}

impl ActivityBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest messages are dropped and slow
    /// receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers. Dropped silently when
    /// nobody is subscribed.
    pub fn publish(&self, event: ActivityEvent) {
        tracing::debug!(
            activity_type = %event.activity_type,
            object_id = event.object_id,
            "Activity published"
        );
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ActivityEvent> {
        self.sender.subscribe()
    }
}

impl Default for ActivityBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = ActivityBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            ActivityEvent::new(ContentKind::Question, ActivityAction::Closed, 42)
                .with_owner(7)
                .with_trigger(1)
                .with_payload(serde_json::json!({"close_type": 1})),
        );

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.activity_type, "question.closed");
        assert_eq!(received.object_type, "question");
        assert_eq!(received.object_id, 42);
        assert_eq!(received.user_id, Some(7));
        assert_eq!(received.trigger_user_id, Some(1));
        assert_eq!(received.payload["close_type"], 1);
    }

    #[tokio::test]
    async fn every_subscriber_receives_the_event() {
        let bus = ActivityBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(ActivityEvent::new(ContentKind::QuoteAuthor, ActivityAction::Pin, 3));

        assert_eq!(rx1.recv().await.unwrap().activity_type, "quote_author.pin");
        assert_eq!(rx2.recv().await.unwrap().activity_type, "quote_author.pin");
    }

    #[test]
    fn publish_without_subscribers_is_fine() {
        let bus = ActivityBus::default();
        bus.publish(ActivityEvent::new(ContentKind::Article, ActivityAction::Deleted, 1));
    }

    #[test]
    fn new_event_has_empty_payload() {
        let event = ActivityEvent::new(ContentKind::Quote, ActivityAction::Asked, 5);
        assert_eq!(event.activity_type, "quote.asked");
        assert!(event.user_id.is_none());
        assert!(event.payload.is_object());
    }
}
