//! Notification entity and repository trait.
//!
//! Maps to the `notifications` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Kind of event a notification records, matching the
/// `notifications.notification_type` VARCHAR values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationType {
    /// The user was added to a trip by a member
    Invitation,
    /// A trip the user belongs to starts soon
    Reminder,
}

impl NotificationType {
    /// Convert from database string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "INVITATION" => Some(Self::Invitation),
            "REMINDER" => Some(Self::Reminder),
            _ => None,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invitation => "INVITATION",
            Self::Reminder => "REMINDER",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted record of an event concerning a user and a trip.
///
/// Maps to the `notifications` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - notification_type: VARCHAR(32) NOT NULL
/// - trip_id: BIGINT NOT NULL REFERENCES trips(id) ON DELETE CASCADE
/// - user_id: BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// - created_at: TIMESTAMPTZ NOT NULL
///
/// Notifications are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// 0 until stored
    pub id: i64,
    pub notification_type: NotificationType,
    pub trip_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Create an unsaved notification timestamped now.
    pub fn new(notification_type: NotificationType, trip_id: i64, user_id: i64) -> Self {
        Self {
            id: 0,
            notification_type,
            trip_id,
            user_id,
            created_at: Utc::now(),
        }
    }
}

/// Repository trait for Notification data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Insert a notification and return it with its generated id.
    async fn save(&self, notification: &Notification) -> Result<Notification, AppError>;
}
