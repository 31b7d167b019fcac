//! Durable activity persistence.
//!
//! [`ActivityPersistence`] subscribes to the [`ActivityBus`](crate::bus::ActivityBus)
//! and writes every received event to the `activities` table. The loop ends
//! when the bus is dropped.

use answer_db::models::activity::CreateActivity;
use answer_db::repositories::ActivityRepo;
use answer_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::ActivityEvent;

/// Background service that persists activities.
pub struct ActivityPersistence;

impl ActivityPersistence {
    /// Run the persistence loop until the channel closes.
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<ActivityEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::persist(&pool, &event).await {
                        tracing::error!(
                            error = %e,
                            activity_type = %event.activity_type,
                            object_id = event.object_id,
                            "Failed to persist activity"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Activity persistence lagged, some activities were not persisted"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Activity bus closed, persistence shutting down");
                    break;
                }
            }
        }
    }

    async fn persist(pool: &DbPool, event: &ActivityEvent) -> Result<(), sqlx::Error> {
        ActivityRepo::create(
            pool,
            &CreateActivity {
                activity_type: event.activity_type.clone(),
                object_type: event.object_type.clone(),
                object_id: event.object_id,
                user_id: event.user_id,
                trigger_user_id: event.trigger_user_id,
                payload: event.payload.clone(),
            },
        )
        .await?;
        Ok(())
    }
}
