//! Notification Repository Implementation
//!
//! PostgreSQL implementation of the NotificationStore trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::domain::{Notification, NotificationStore, NotificationType};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    id: i64,
    notification_type: String,
    trip_id: i64,
    user_id: i64,
    created_at: DateTime<Utc>,
}

impl NotificationRow {
    fn into_notification(self) -> Result<Notification, AppError> {
        let notification_type = NotificationType::from_str(&self.notification_type)
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Unknown notification type {:?}",
                    self.notification_type
                ))
            })?;

        Ok(Notification {
            id: self.id,
            notification_type,
            trip_id: self.trip_id,
            user_id: self.user_id,
            created_at: self.created_at,
        })
    }
}

/// Insert a notification on an open connection or transaction.
pub(crate) async fn insert_notification(
    conn: &mut PgConnection,
    notification: &Notification,
) -> Result<Notification, AppError> {
    let row = sqlx::query_as::<_, NotificationRow>(
        r#"
        INSERT INTO notifications (notification_type, trip_id, user_id, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, notification_type, trip_id, user_id, created_at
        "#,
    )
    .bind(notification.notification_type.as_str())
    .bind(notification.trip_id)
    .bind(notification.user_id)
    .bind(notification.created_at)
    .fetch_one(&mut *conn)
    .await?;

    row.into_notification()
}

/// PostgreSQL notification repository implementation.
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationRepository {
    async fn save(&self, notification: &Notification) -> Result<Notification, AppError> {
        let mut conn = self.pool.acquire().await?;
        insert_notification(&mut conn, notification).await
    }
}
